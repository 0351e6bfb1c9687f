#![cfg(feature = "use_glam")]

use adjmesh::{
    EH, PH, PolyShape, PolygonMeshT,
    use_glam::{BuiltInAdaptorF64, PolygonmeshF64, TetmeshF64, TrimeshF64},
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Edit {
    Split(u32),
    Collapse(u32),
    Flip(u32),
    Remove(u32, bool),
    PolySplit(u32),
}

type MeshF64<S> = PolygonMeshT<BuiltInAdaptorF64, S>;

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<u32>().prop_map(Edit::Split),
        any::<u32>().prop_map(Edit::Collapse),
        any::<u32>().prop_map(Edit::Flip),
        (any::<u32>(), any::<bool>()).prop_map(|(p, v)| Edit::Remove(p, v)),
        any::<u32>().prop_map(Edit::PolySplit),
    ]
}

/// Edits that keep a closed surface closed.
fn closed_edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<u32>().prop_map(Edit::Split),
        any::<u32>().prop_map(Edit::Collapse),
        any::<u32>().prop_map(Edit::Flip),
        any::<u32>().prop_map(Edit::PolySplit),
    ]
}

fn snapshot<S: PolyShape>(mesh: &MeshF64<S>) -> String {
    format!("{:?} {:?}", mesh.topol(), mesh.points())
}

/// Applies the edit with handles wrapped into range. Returns whether the edit
/// was applied, or `None` if the mesh has nothing to edit.
fn apply<S: PolyShape>(mesh: &mut MeshF64<S>, edit: Edit) -> Option<bool> {
    let (ne, np) = (mesh.num_edges() as u32, mesh.num_polys() as u32);
    let result = match edit {
        Edit::Split(e) if ne > 0 => mesh.edge_split(EH::from(e % ne), 0.5).is_ok(),
        Edit::Collapse(e) if ne > 0 => mesh.edge_collapse(EH::from(e % ne), 0.5).is_ok(),
        Edit::Flip(e) if ne > 0 => mesh.edge_flip(EH::from(e % ne)).is_ok(),
        Edit::Remove(p, verts) if np > 0 => mesh.poly_remove(PH::from(p % np), verts).is_ok(),
        Edit::PolySplit(p) if np > 0 => mesh.poly_split(PH::from(p % np)).is_ok(),
        _ => return None,
    };
    Some(result)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn t_random_edits_keep_topology_valid(
        nx in 1usize..5,
        ny in 1usize..5,
        edits in prop::collection::vec(edit_strategy(), 1..40),
    ) {
        let mut mesh = TrimeshF64::triangle_grid(nx, ny).expect("Cannot create grid");
        for edit in edits {
            let before = snapshot(&mesh);
            match apply(&mut mesh, edit) {
                None => break,
                Some(true) => {}
                // A rejected edit must not touch the mesh.
                Some(false) => prop_assert_eq!(&before, &snapshot(&mesh), "{:?}", edit),
            }
            prop_assert!(mesh.check_topology().is_ok(), "{:?}", edit);
        }
    }

    #[test]
    fn t_random_edits_keep_box_closed(
        edits in prop::collection::vec(closed_edit_strategy(), 1..40),
    ) {
        let mut mesh = PolygonmeshF64::unit_box().expect("Cannot create box");
        for edit in edits {
            let before = snapshot(&mesh);
            match apply(&mut mesh, edit) {
                None => break,
                Some(true) => {}
                Some(false) => prop_assert_eq!(&before, &snapshot(&mesh), "{:?}", edit),
            }
            prop_assert!(mesh.check_topology().is_ok(), "{:?}", edit);
            prop_assert!(mesh.topol().is_manifold(), "{:?}", edit);
            prop_assert!(mesh.topol().is_consistently_oriented(), "{:?}", edit);
            prop_assert_eq!(mesh.topol().boundary_edges().count(), 0, "{:?}", edit);
        }
    }

    #[test]
    fn t_random_tet_splits_keep_volume(
        edits in prop::collection::vec(any::<u32>(), 1..12),
    ) {
        let mut mesh = TetmeshF64::tetrahedron().expect("Cannot create tetrahedron");
        let volume = mesh.total_volume();
        for (i, e) in edits.into_iter().enumerate() {
            let e = EH::from(e % mesh.num_edges() as u32);
            let t = 0.25 + 0.25 * (i % 3) as f64;
            mesh.edge_split(e, t).expect("Cannot split edge");
            prop_assert!(mesh.check_topology().is_ok());
            prop_assert!(mesh.polys().all(|p| mesh.poly_volume(p) > 0.0));
        }
        prop_assert!((mesh.total_volume() - volume).abs() < 1e-12);
    }
}
