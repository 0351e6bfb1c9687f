use std::marker::PhantomData;

use crate::{
    adaptor::Adaptor,
    attrib::{Attribs, EdgeAttr, PolyAttr, VertexAttr},
    element::{EH, PH, VH},
    error::Error,
    shape::{PolyShape, Polygons},
    topol::PolyTopology,
};

/// A polygon mesh: topology, vertex positions and per-element attributes.
///
/// The shape policy `S` fixes the number of vertices per poly for
/// [`Triangles`](crate::shape::Triangles) and [`Quads`](crate::shape::Quads),
/// or allows any polygon for [`Polygons`]. All edits are local and keep the
/// topology, positions and attributes in sync. Element indices stay dense:
/// removing an element moves the last element of its kind into the freed
/// slot.
pub struct PolygonMeshT<A, S = Polygons>
where
    A: Adaptor,
    S: PolyShape,
{
    pub(crate) topol: PolyTopology,
    pub(crate) attribs: Attribs<A>,
    shape: PhantomData<S>,
}

impl<A, S> Clone for PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    fn clone(&self) -> Self {
        PolygonMeshT {
            topol: self.topol.clone(),
            attribs: self.attribs.clone(),
            shape: PhantomData,
        }
    }
}

impl<A, S> Default for PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    /// Empty mesh.
    pub fn new() -> Self {
        PolygonMeshT {
            topol: PolyTopology::new(S::ARITY),
            attribs: Attribs::new(Vec::new(), 0, 0, 0),
            shape: PhantomData,
        }
    }

    /// Create a mesh from vertex positions and polys given as indices into
    /// the positions.
    pub fn from_polys<P: AsRef<[u32]>>(points: Vec<A::Vector>, polys: &[P]) -> Result<Self, Error> {
        let topol = PolyTopology::from_polys(points.len(), polys, S::ARITY)?;
        let attribs = Attribs::new(points, topol.num_edges(), 0, topol.num_polys());
        Ok(PolygonMeshT {
            topol,
            attribs,
            shape: PhantomData,
        })
    }

    /// Read only access to the topology. This is where all connectivity
    /// queries live.
    pub fn topol(&self) -> &PolyTopology {
        &self.topol
    }

    pub fn num_verts(&self) -> usize {
        self.topol.num_verts()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_polys(&self) -> usize {
        self.topol.num_polys()
    }

    pub fn verts(&self) -> impl Iterator<Item = VH> + use<A, S> {
        self.topol.verts()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<A, S> {
        self.topol.edges()
    }

    pub fn polys(&self) -> impl Iterator<Item = PH> + use<A, S> {
        self.topol.polys()
    }

    pub fn point(&self, v: VH) -> A::Vector {
        self.attribs.points[v.ui()]
    }

    pub fn set_point(&mut self, v: VH, pos: A::Vector) {
        self.attribs.points[v.ui()] = pos;
    }

    /// Positions of all vertices, indexed by vertex.
    pub fn points(&self) -> &[A::Vector] {
        &self.attribs.points
    }

    pub fn points_mut(&mut self) -> &mut [A::Vector] {
        &mut self.attribs.points
    }

    pub fn vert_attr(&self, v: VH) -> &VertexAttr<A::Vector> {
        &self.attribs.verts[v.ui()]
    }

    pub fn vert_attr_mut(&mut self, v: VH) -> &mut VertexAttr<A::Vector> {
        &mut self.attribs.verts[v.ui()]
    }

    pub fn edge_attr(&self, e: EH) -> &EdgeAttr {
        &self.attribs.edges[e.ui()]
    }

    pub fn edge_attr_mut(&mut self, e: EH) -> &mut EdgeAttr {
        &mut self.attribs.edges[e.ui()]
    }

    pub fn poly_attr(&self, p: PH) -> &PolyAttr<A::Vector> {
        &self.attribs.polys[p.ui()]
    }

    pub fn poly_attr_mut(&mut self, p: PH) -> &mut PolyAttr<A::Vector> {
        &mut self.attribs.polys[p.ui()]
    }

    /// Run an edit on the topology with the attributes kept in sync. Rejected
    /// edits are logged.
    pub(crate) fn apply_edit<T>(
        &mut self,
        what: &str,
        edit: impl FnOnce(&mut PolyTopology, &mut Attribs<A>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let result = edit(&mut self.topol, &mut self.attribs);
        match &result {
            Err(err) => log::debug!("Rejected {what}: {err}"),
            Ok(_) => self.verify_after_edit(what),
        }
        result
    }

    #[cfg(feature = "check-invariants")]
    fn verify_after_edit(&self, what: &str) {
        if let Err(err) = self.check_topology() {
            panic!("Mesh is corrupt after {what}: {err}");
        }
    }

    #[cfg(not(feature = "check-invariants"))]
    fn verify_after_edit(&self, _what: &str) {}
}

#[cfg(all(test, feature = "use_glam"))]
mod test {
    use crate::{
        element::{Handle, VH},
        error::Error,
        use_glam::{PolygonmeshF32, TrimeshF32},
    };
    use glam::vec3;

    #[test]
    fn t_from_polys() {
        let mesh = PolygonmeshF32::from_polys(
            vec![
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(1.0, 1.0, 0.0),
                vec3(0.0, 1.0, 0.0),
                vec3(0.5, 1.5, 0.0),
            ],
            &[vec![0u32, 1, 2, 3], vec![3, 2, 4]],
        )
        .expect("Cannot create mesh");
        assert_eq!(mesh.num_verts(), 5);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_polys(), 2);
        assert_eq!(mesh.point(4.into()), vec3(0.5, 1.5, 0.0));
        assert_eq!(
            mesh.verts().map(|v| v.index()).collect::<Vec<_>>(),
            (0..5).collect::<Vec<u32>>()
        );
        mesh.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_arity_enforced() {
        let points = vec![vec3(0.0, 0.0, 0.0); 4];
        assert_eq!(
            TrimeshF32::from_polys(points, &[[0u32, 1, 2, 3]]).err(),
            Some(Error::ArityMismatch {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn t_clone_is_deep() {
        let mut mesh = TrimeshF32::triangle_grid(1, 1).expect("Cannot create grid");
        let copy = mesh.clone();
        mesh.vert_attr_mut(0.into()).label = 9;
        mesh.set_point(VH::from(0u32), vec3(5.0, 5.0, 5.0));
        mesh.poly_remove(0.into(), true).expect("Cannot remove poly");
        assert_eq!(copy.num_polys(), 2);
        assert_eq!(copy.vert_attr(0.into()).label, 0);
        assert_eq!(copy.point(0.into()), vec3(0.0, 0.0, 0.0));
        assert_eq!(mesh.num_polys(), 1);
        mesh.check_topology().expect("Topology check failed");
        copy.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_vert_add_and_poly_add() {
        let mut mesh = TrimeshF32::new();
        let verts: Vec<VH> = [
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|p| mesh.vert_add(p))
        .collect();
        let p = mesh.poly_add(&verts).expect("Cannot add triangle");
        assert_eq!(p, 0.into());
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.point(verts[1]), vec3(1.0, 0.0, 0.0));
        assert_eq!(
            mesh.poly_add(&[verts[0], verts[1]]),
            Err(Error::DegeneratePoly(1))
        );
        mesh.check_topology().expect("Topology check failed");
    }
}
