use super::VolumeTopology;
use crate::{
    adaptor::{Adaptor, FloatScalarAdaptor},
    attrib::AttribSync,
    edit::sorted_desc,
    element::{EH, FH, PH, VH},
    error::Error,
    shape::{CellShape, TET_TEMPLATE},
    topol::clean_cycle,
    volmesh::PolyhedralMeshT,
};

impl VolumeTopology {
    /// Add an isolated vertex.
    pub fn vert_add(&mut self, sync: &mut impl AttribSync) -> VH {
        self.push_vert(sync)
    }

    /// Add a face with the given vertex loop. If a face with the same set of
    /// vertices exists, that face is returned instead.
    pub fn face_add(&mut self, verts: &[VH], sync: &mut impl AttribSync) -> Result<FH, Error> {
        for &v in verts {
            self.check_vert(v)?;
        }
        let verts = clean_cycle(verts).ok_or(Error::DegenerateFace(self.num_faces()))?;
        Ok(self.face_get_or_insert(verts, None, sync))
    }

    /// Add a cell bounded by existing faces. `winding[i]` tells whether the
    /// stored order of `faces[i]` is counter-clockwise seen from outside the
    /// new cell.
    pub fn poly_add(
        &mut self,
        faces: &[FH],
        winding: &[bool],
        sync: &mut impl AttribSync,
    ) -> Result<PH, Error> {
        if faces.len() != winding.len() {
            return Err(Error::MismatchedArrayLengths(faces.len(), winding.len()));
        }
        self.check_cell_faces(faces, self.num_polys())?;
        Ok(self.push_poly(faces.to_vec(), winding.to_vec(), None, sync))
    }

    /// Add a cell from its vertices, using the cell template of this
    /// topology to create the faces.
    pub fn poly_add_cell(&mut self, verts: &[VH], sync: &mut impl AttribSync) -> Result<PH, Error> {
        let template = self.template().ok_or(Error::NoCellTemplate)?;
        self.check_cell_verts(verts, self.num_polys(), template)?;
        Ok(self.push_cell(verts, template, None, sync))
    }

    fn remove_poly_unchecked(
        &mut self,
        p: PH,
        remove_unreferenced_verts: bool,
        sync: &mut impl AttribSync,
    ) {
        let faces = self.poly_faces(p).to_vec();
        let edges = self.poly_edges(p).to_vec();
        let verts = self.poly_verts(p).to_vec();
        self.unlink_poly(p);
        self.swap_remove_unlinked_poly(p, sync);
        let dangling: Vec<FH> = faces
            .into_iter()
            .filter(|&f| self.adj_f2p(f).is_empty())
            .collect();
        for f in sorted_desc(dangling) {
            self.swap_remove_dangling_face(f, sync);
        }
        let dangling: Vec<EH> = edges
            .into_iter()
            .filter(|&e| self.adj_e2f(e).is_empty())
            .collect();
        for e in sorted_desc(dangling) {
            self.swap_remove_dangling_edge(e, sync);
        }
        if remove_unreferenced_verts {
            let isolated: Vec<VH> = verts
                .into_iter()
                .filter(|&v| self.adj_v2e(v).is_empty())
                .collect();
            for v in sorted_desc(isolated) {
                self.swap_remove_isolated_vert(v, sync);
            }
        }
    }

    /// Remove a cell, along with its faces and edges that no other cell
    /// uses. The last cell moves into the freed slot, and so do the last
    /// faces and edges. Vertices left without edges are removed too if
    /// `remove_unreferenced_verts` is set.
    pub fn poly_remove(
        &mut self,
        p: PH,
        remove_unreferenced_verts: bool,
        sync: &mut impl AttribSync,
    ) -> Result<(), Error> {
        self.check_poly(p)?;
        self.remove_poly_unchecked(p, remove_unreferenced_verts, sync);
        Ok(())
    }

    /// Remove several cells at once. The handles refer to the cells before any
    /// of them is removed.
    pub fn polys_remove(
        &mut self,
        polys: &[PH],
        remove_unreferenced_verts: bool,
        sync: &mut impl AttribSync,
    ) -> Result<(), Error> {
        for &p in polys {
            self.check_poly(p)?;
        }
        for p in sorted_desc(polys.to_vec()) {
            self.remove_poly_unchecked(p, remove_unreferenced_verts, sync);
        }
        Ok(())
    }

    /**
     * Split an edge whose incident cells are all tetrahedra.
     *
     * A new vertex is inserted on the edge, and every tetrahedron around the
     * edge is replaced by two. The first half keeps the index of the
     * original cell and the second half is appended. The faces that used the
     * edge are removed along with the edge itself.
     *
     * Returns the new vertex.
     */
    pub fn edge_split(&mut self, e: EH, sync: &mut impl AttribSync) -> Result<VH, Error> {
        self.check_edge(e)?;
        let mut tets = Vec::with_capacity(self.adj_e2p(e).len());
        for &p in self.adj_e2p(e) {
            tets.push((p, self.tet_verts(p).ok_or(Error::NotATetrahedron(p))?));
        }
        if let Some(&f) = self.adj_e2f(e).iter().find(|&&f| self.adj_f2p(f).is_empty()) {
            return Err(Error::UnreferencedFace(f));
        }
        let [a, b] = self.edge_verts(e);
        let m = self.push_vert(sync);
        // The halves of the edge and of the faces around it inherit their
        // attributes. Building the new cells below finds them.
        self.edge_get_or_insert(a, m, Some(e), sync);
        self.edge_get_or_insert(m, b, Some(e), sync);
        for f in self.adj_e2f(e).to_vec() {
            let verts = self.face_verts(f).to_vec();
            let first = verts.iter().map(|&v| if v == b { m } else { v }).collect();
            let second = verts.iter().map(|&v| if v == a { m } else { v }).collect();
            self.face_get_or_insert(first, Some(f), sync);
            self.face_get_or_insert(second, Some(f), sync);
        }
        for (p, verts) in tets {
            self.unlink_poly(p);
            let first = verts.map(|v| if v == b { m } else { v });
            let second = verts.map(|v| if v == a { m } else { v });
            let (faces, winding) = self.cell_faces(&first, TET_TEMPLATE, sync);
            self.polys[p.ui()] = faces;
            self.winding[p.ui()] = winding;
            self.link_poly(p);
            self.push_cell(&second, TET_TEMPLATE, Some(p), sync);
        }
        // No cell uses the edge anymore.
        for f in sorted_desc(self.adj_e2f(e).to_vec()) {
            self.swap_remove_dangling_face(f, sync);
        }
        self.swap_remove_dangling_edge(e, sync);
        log::trace!("Split edge {e} of a tetrahedral mesh at new vertex {m}");
        Ok(m)
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    /// Add an isolated vertex at the given position.
    pub fn vert_add(&mut self, pos: A::Vector) -> VH {
        let v = self.topol.vert_add(&mut self.attribs);
        self.attribs.points[v.ui()] = pos;
        v
    }

    /// See [`VolumeTopology::face_add`].
    pub fn face_add(&mut self, verts: &[VH]) -> Result<FH, Error> {
        self.apply_edit("face add", |topol, attribs| topol.face_add(verts, attribs))
    }

    /// See [`VolumeTopology::poly_add`].
    pub fn poly_add(&mut self, faces: &[FH], winding: &[bool]) -> Result<PH, Error> {
        self.apply_edit("poly add", |topol, attribs| {
            topol.poly_add(faces, winding, attribs)
        })
    }

    pub fn poly_add_cell(&mut self, verts: &[VH]) -> Result<PH, Error> {
        self.apply_edit("cell add", |topol, attribs| topol.poly_add_cell(verts, attribs))
    }

    pub fn poly_remove(&mut self, p: PH, remove_unreferenced_verts: bool) -> Result<(), Error> {
        self.apply_edit("poly remove", |topol, attribs| {
            topol.poly_remove(p, remove_unreferenced_verts, attribs)
        })
    }

    pub fn polys_remove(&mut self, polys: &[PH], remove_unreferenced_verts: bool) -> Result<(), Error> {
        self.apply_edit("polys remove", |topol, attribs| {
            topol.polys_remove(polys, remove_unreferenced_verts, attribs)
        })
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: CellShape,
{
    /// Split the edge at parameter `t`, measured from the first vertex of the
    /// edge towards the second. See [`VolumeTopology::edge_split`].
    pub fn edge_split(&mut self, e: EH, t: f64) -> Result<VH, Error> {
        let pos = self.topol.check_edge(e).map(|_| self.edge_sample(e, t));
        self.apply_edit("edge split", |topol, attribs| {
            let pos = pos?;
            let v = topol.edge_split(e, attribs)?;
            attribs.points[v.ui()] = pos;
            Ok(v)
        })
    }
}

#[cfg(test)]
mod test {
    use crate::{
        attrib::AttribSync,
        element::{FH, PH, VH},
        error::Error,
        shape::TET_TEMPLATE,
        volume::{
            VolumeTopology,
            test::{two_hexes, two_tets},
        },
    };

    /// Face labels kept in sync with the topology.
    struct FaceLabels(Vec<i32>);

    impl AttribSync for FaceLabels {
        fn push_face(&mut self, src: Option<FH>) {
            let label = src.map_or(0, |f| self.0[f.ui()]);
            self.0.push(label);
        }

        fn swap_remove_face(&mut self, f: FH) {
            self.0.swap_remove(f.ui());
        }
    }

    #[test]
    fn t_split_shared_edge() {
        let mut topol = two_tets();
        let e = topol.edge_id(0.into(), 1.into()).expect("Cannot find edge");
        let m = topol.edge_split(e, &mut ()).expect("Cannot split edge");
        assert_eq!(m, 5.into());
        assert_eq!(topol.num_verts(), 6);
        assert_eq!(topol.num_edges(), 13);
        assert_eq!(topol.num_faces(), 12);
        assert_eq!(topol.num_polys(), 4);
        assert!(topol.edge_id(0.into(), 1.into()).is_none());
        assert_eq!(topol.adj_v2p(m).len(), 4);
        assert_eq!(topol.adj_v2v(m).len(), 5);
        assert!(topol.faces().all(|f| topol.face_winding_is_consistent(f)));
        assert!(topol.polys().all(|p| topol.tet_verts(p).is_some()));
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_face_attributes_follow_split() {
        let mut topol = two_tets();
        let mut labels = FaceLabels((1..=topol.num_faces() as i32).collect());
        let apexes = [VH::from(2u32), VH::from(3u32), VH::from(4u32)];
        let before: Vec<i32> = apexes
            .iter()
            .map(|&c| {
                let f = topol
                    .face_id(&[0.into(), 1.into(), c])
                    .expect("Cannot find face");
                labels.0[f.ui()]
            })
            .collect();
        let e = topol.edge_id(0.into(), 1.into()).expect("Cannot find edge");
        let m = topol.edge_split(e, &mut labels).expect("Cannot split edge");
        assert_eq!(labels.0.len(), topol.num_faces());
        for (&c, &label) in apexes.iter().zip(before.iter()) {
            for half in [[0.into(), m, c], [m, 1.into(), c]] {
                let f = topol.face_id(&half).expect("Cannot find half face");
                assert_eq!(labels.0[f.ui()], label);
            }
        }
        // Faces cutting through the old cells are new.
        for c in [VH::from(3u32), VH::from(4u32)] {
            let f = topol
                .face_id(&[m, 2.into(), c])
                .expect("Cannot find inner face");
            assert_eq!(labels.0[f.ui()], 0);
        }
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_split_single_tet() {
        let mut topol = VolumeTopology::from_cells(4, &[[0u32, 1, 2, 3]], TET_TEMPLATE)
            .expect("Cannot build tetrahedron");
        let e = topol.edge_id(2.into(), 3.into()).expect("Cannot find edge");
        let m = topol.edge_split(e, &mut ()).expect("Cannot split edge");
        assert_eq!(topol.num_edges(), 9);
        assert_eq!(topol.num_faces(), 7);
        assert_eq!(topol.num_polys(), 2);
        let shared = topol
            .poly_shared_face(0.into(), 1.into())
            .expect("Halves must share a face");
        assert!(topol.face_verts(shared).contains(&m));
        assert!(!topol.face_is_boundary(shared));
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_split_rejects_hexahedra() {
        let mut topol = two_hexes();
        let before = format!("{topol:?}");
        let e = topol.edge_id(4.into(), 5.into()).expect("Cannot find edge");
        assert!(matches!(
            topol.edge_split(e, &mut ()),
            Err(Error::NotATetrahedron(_))
        ));
        assert_eq!(before, format!("{topol:?}"));
    }

    #[test]
    fn t_split_rejects_dangling_face() {
        let mut topol = two_tets();
        let f = topol
            .face_add(&[0u32, 1, 4, 3].map(VH::from), &mut ())
            .expect("Cannot add face");
        let e = topol.edge_id(0.into(), 1.into()).expect("Cannot find edge");
        assert_eq!(topol.edge_split(e, &mut ()), Err(Error::UnreferencedFace(f)));
    }

    #[test]
    fn t_add_cells() {
        let mut topol = VolumeTopology::new(Some(TET_TEMPLATE));
        let verts: Vec<VH> = (0..5).map(|_| topol.vert_add(&mut ())).collect();
        topol
            .poly_add_cell(&verts[..4], &mut ())
            .expect("Cannot add cell");
        let p = topol
            .poly_add_cell(&[verts[0], verts[2], verts[1], verts[4]], &mut ())
            .expect("Cannot add cell");
        assert_eq!(p, 1.into());
        assert_eq!(topol.num_faces(), 7);
        assert_eq!(
            topol.poly_add_cell(&verts[..3], &mut ()),
            Err(Error::ArityMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            topol.poly_add_cell(&[verts[0], verts[1], verts[2], verts[2]], &mut ()),
            Err(Error::DegeneratePoly(2))
        );
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_add_faces_then_poly() {
        let mut topol = VolumeTopology::new(None);
        let v: Vec<VH> = (0..4).map(|_| topol.vert_add(&mut ())).collect();
        let faces: Vec<FH> = [[0usize, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]
            .into_iter()
            .map(|f| topol.face_add(&f.map(|i| v[i]), &mut ()))
            .collect::<Result<_, _>>()
            .expect("Cannot add faces");
        // Same vertex set, so the existing face comes back.
        assert_eq!(
            topol.face_add(&[v[1], v[0], v[2]], &mut ()),
            Ok(faces[0])
        );
        assert_eq!(
            topol.face_add(&[v[1], v[1], v[2]], &mut ()),
            Err(Error::DegenerateFace(4))
        );
        // Dangling faces are allowed.
        topol.check().expect("Topology check failed");
        assert_eq!(
            topol.poly_add(&faces[..3], &[true; 3], &mut ()),
            Err(Error::DegeneratePoly(0))
        );
        assert_eq!(
            topol.poly_add(&faces, &[true; 3], &mut ()),
            Err(Error::MismatchedArrayLengths(4, 3))
        );
        let p = topol
            .poly_add(&faces, &[true; 4], &mut ())
            .expect("Cannot add cell");
        assert_eq!(topol.poly_verts(p).len(), 4);
        assert_eq!(topol.poly_add_cell(&v, &mut ()), Err(Error::NoCellTemplate));
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_poly_remove() {
        let mut topol = two_tets();
        topol
            .poly_remove(0.into(), true, &mut ())
            .expect("Cannot remove cell");
        assert_eq!(topol.num_polys(), 1);
        assert_eq!(topol.num_faces(), 4);
        assert_eq!(topol.num_edges(), 6);
        assert_eq!(topol.num_verts(), 4);
        // The vertex below the shared face took the slot of the removed one.
        assert_eq!(
            topol.tet_verts(0.into()),
            Some([1u32, 0, 2, 3].map(VH::from))
        );
        assert!(topol.faces().all(|f| topol.face_is_boundary(f)));
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_poly_remove_keeps_verts() {
        let mut topol = two_tets();
        topol
            .poly_remove(1.into(), false, &mut ())
            .expect("Cannot remove cell");
        assert_eq!(topol.num_verts(), 5);
        assert!(topol.adj_v2e(4.into()).is_empty());
        assert_eq!(
            topol.poly_remove(3.into(), false, &mut ()),
            Err(Error::InvalidPoly(3.into()))
        );
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_polys_remove() {
        let mut topol = two_hexes();
        topol
            .polys_remove(&[PH::from(1u32), PH::from(0u32)], true, &mut ())
            .expect("Cannot remove cells");
        assert_eq!(topol.num_verts(), 0);
        assert_eq!(topol.num_edges(), 0);
        assert_eq!(topol.num_faces(), 0);
        assert_eq!(topol.num_polys(), 0);
        topol.check().expect("Topology check failed");
    }
}
