use super::{VolumeTopology, face_key, has_duplicates};
use crate::{
    adaptor::Adaptor,
    element::{FH, PH},
    error::Error,
    shape::CellShape,
    topol::clean_cycle,
    volmesh::PolyhedralMeshT,
};

fn count<T: PartialEq>(items: &[T], item: T) -> usize {
    items.iter().filter(|x| **x == item).count()
}

/// Both lists hold the same items, ignoring order.
fn same_set<T: Ord + Copy>(a: &[T], b: &[T]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

fn check_sizes(topol: &VolumeTopology) -> Result<(), Error> {
    let nv = topol.num_verts();
    for len in [topol.v2e.len(), topol.v2f.len(), topol.v2p.len()] {
        if len != nv {
            return Err(Error::MismatchedArrayLengths(nv, len));
        }
    }
    let ne = topol.num_edges();
    for len in [topol.e2f.len(), topol.e2p.len(), topol.edge_map.len()] {
        if len != ne {
            return Err(Error::MismatchedArrayLengths(ne, len));
        }
    }
    let nf = topol.num_faces();
    for len in [topol.f2e.len(), topol.f2p.len(), topol.face_map.len()] {
        if len != nf {
            return Err(Error::MismatchedArrayLengths(nf, len));
        }
    }
    let np = topol.num_polys();
    for len in [
        topol.winding.len(),
        topol.p2v.len(),
        topol.p2e.len(),
        topol.p2p.len(),
    ] {
        if len != np {
            return Err(Error::MismatchedArrayLengths(np, len));
        }
    }
    Ok(())
}

fn check_edges(topol: &VolumeTopology) -> Result<(), Error> {
    let nv = topol.num_verts();
    let nf = topol.num_faces();
    for e in topol.edges() {
        let [a, b] = topol.edges[e.ui()];
        if a >= b || b.ui() >= nv || topol.edge_map.get(&(a, b)) != Some(&e) {
            return Err(Error::CorruptEdge(e));
        }
        if count(&topol.v2e[a.ui()], e) != 1 || count(&topol.v2e[b.ui()], e) != 1 {
            return Err(Error::CorruptEdge(e));
        }
        if count(&topol.v2v[a.ui()], b) != 1 || count(&topol.v2v[b.ui()], a) != 1 {
            return Err(Error::CorruptEdge(e));
        }
        // Edges only exist as sides of faces.
        let faces = &topol.e2f[e.ui()];
        if faces.is_empty() || has_duplicates(faces) {
            return Err(Error::CorruptEdge(e));
        }
        if faces
            .iter()
            .any(|f| f.ui() >= nf || !topol.f2e[f.ui()].contains(&e))
        {
            return Err(Error::CorruptEdge(e));
        }
        let mut expected: Vec<PH> = faces
            .iter()
            .flat_map(|f| topol.f2p[f.ui()].iter().copied())
            .collect();
        expected.sort_unstable();
        expected.dedup();
        let cells = &topol.e2p[e.ui()];
        if has_duplicates(cells) || !same_set(cells, &expected) {
            return Err(Error::CorruptEdge(e));
        }
    }
    Ok(())
}

fn check_verts(topol: &VolumeTopology) -> Result<(), Error> {
    for v in topol.verts() {
        let edges = &topol.v2e[v.ui()];
        let nbrs = &topol.v2v[v.ui()];
        if has_duplicates(edges) || has_duplicates(nbrs) || edges.len() != nbrs.len() {
            return Err(Error::CorruptVertex(v));
        }
        let reachable = nbrs
            .iter()
            .all(|&w| topol.edge_id(v, w).is_some_and(|e| edges.contains(&e)));
        if !reachable {
            return Err(Error::CorruptVertex(v));
        }
        let faces = &topol.v2f[v.ui()];
        if has_duplicates(faces)
            || faces
                .iter()
                .any(|f| f.ui() >= topol.num_faces() || !topol.faces[f.ui()].contains(&v))
        {
            return Err(Error::CorruptVertex(v));
        }
        let cells = &topol.v2p[v.ui()];
        if has_duplicates(cells)
            || cells
                .iter()
                .any(|p| p.ui() >= topol.num_polys() || !topol.p2v[p.ui()].contains(&v))
        {
            return Err(Error::CorruptVertex(v));
        }
    }
    Ok(())
}

fn check_faces(topol: &VolumeTopology) -> Result<(), Error> {
    for f in topol.faces() {
        let verts = &topol.faces[f.ui()];
        if verts.iter().any(|v| v.ui() >= topol.num_verts())
            || clean_cycle(verts).as_ref() != Some(verts)
            || topol.face_map.get(&face_key(verts)) != Some(&f)
        {
            return Err(Error::CorruptFace(f));
        }
        let edges = &topol.f2e[f.ui()];
        if edges.len() != verts.len() {
            return Err(Error::CorruptFace(f));
        }
        for (i, &e) in edges.iter().enumerate() {
            let a = verts[i];
            let b = verts[(i + 1) % verts.len()];
            if topol.edge_id(a, b) != Some(e) || count(&topol.e2f[e.ui()], f) != 1 {
                return Err(Error::CorruptFace(f));
            }
        }
        if verts.iter().any(|v| !topol.v2f[v.ui()].contains(&f)) {
            return Err(Error::CorruptFace(f));
        }
        let cells = &topol.f2p[f.ui()];
        if has_duplicates(cells)
            || cells
                .iter()
                .any(|p| p.ui() >= topol.num_polys() || count(&topol.polys[p.ui()], f) != 1)
        {
            return Err(Error::CorruptFace(f));
        }
        if let [p, q] = cells.as_slice() {
            if topol.poly_face_is_ccw(*p, f) == topol.poly_face_is_ccw(*q, f) {
                return Err(Error::CorruptWinding(*q, f));
            }
        }
    }
    Ok(())
}

fn check_polys(topol: &VolumeTopology) -> Result<(), Error> {
    for p in topol.polys() {
        let faces: &[FH] = &topol.polys[p.ui()];
        if faces.len() < 4
            || faces.len() != topol.winding[p.ui()].len()
            || has_duplicates(faces)
            || faces.iter().any(|f| f.ui() >= topol.num_faces())
        {
            return Err(Error::CorruptPoly(p));
        }
        if let Some((_, tfaces)) = topol.template() {
            if tfaces.len() != faces.len() {
                return Err(Error::CorruptPoly(p));
            }
        }
        if faces.iter().any(|f| !topol.f2p[f.ui()].contains(&p)) {
            return Err(Error::CorruptPoly(p));
        }
        let mut verts: Vec<_> = faces
            .iter()
            .flat_map(|f| topol.faces[f.ui()].iter().copied())
            .collect();
        verts.sort_unstable();
        verts.dedup();
        if has_duplicates(&topol.p2v[p.ui()]) || !same_set(&topol.p2v[p.ui()], &verts) {
            return Err(Error::CorruptPoly(p));
        }
        let mut edges: Vec<_> = faces
            .iter()
            .flat_map(|f| topol.f2e[f.ui()].iter().copied())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        if has_duplicates(&topol.p2e[p.ui()]) || !same_set(&topol.p2e[p.ui()], &edges) {
            return Err(Error::CorruptPoly(p));
        }
        if verts.iter().any(|v| !topol.v2p[v.ui()].contains(&p))
            || edges.iter().any(|e| !topol.e2p[e.ui()].contains(&p))
        {
            return Err(Error::CorruptPoly(p));
        }
        let mut nbrs: Vec<PH> = faces
            .iter()
            .flat_map(|f| topol.f2p[f.ui()].iter().copied())
            .filter(|&q| q != p)
            .collect();
        nbrs.sort_unstable();
        nbrs.dedup();
        let actual = &topol.p2p[p.ui()];
        if has_duplicates(actual)
            || !same_set(actual, &nbrs)
            || actual.iter().any(|q| !topol.p2p[q.ui()].contains(&p))
        {
            return Err(Error::CorruptPoly(p));
        }
    }
    Ok(())
}

impl VolumeTopology {
    /// Check every adjacency table against the element stores, and that cells
    /// sharing a face see it with opposite windings.
    ///
    /// Vertices without cells and faces without cells are allowed. Edges that
    /// are not a side of any face are not.
    pub fn check(&self) -> Result<(), Error> {
        check_sizes(self)?;
        check_edges(self)?;
        check_verts(self)?;
        check_faces(self)?;
        check_polys(self)?;
        Ok(())
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    /// Check the topology of the mesh, and that there is exactly one attribute
    /// entry per element.
    pub fn check_topology(&self) -> Result<(), Error> {
        self.topol.check()?;
        let attribs = &self.attribs;
        for (expected, len) in [
            (self.topol.num_verts(), attribs.points.len()),
            (self.topol.num_verts(), attribs.verts.len()),
            (self.topol.num_edges(), attribs.edges.len()),
            (self.topol.num_faces(), attribs.faces.len()),
            (self.topol.num_polys(), attribs.polys.len()),
        ] {
            if expected != len {
                return Err(Error::MismatchedArrayLengths(expected, len));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{FH, PH, VH},
        error::Error,
        volume::test::{two_hexes, two_tets},
    };

    #[test]
    fn t_valid_meshes() {
        two_tets().check().expect("Topology check failed");
        two_hexes().check().expect("Topology check failed");
    }

    #[test]
    fn t_inconsistent_winding() {
        let mut topol = two_tets();
        let f = topol
            .face_id(&[0u32, 1, 2].map(VH::from))
            .expect("Cannot find face");
        let i = topol.polys[1]
            .iter()
            .position(|&x| x == f)
            .expect("Face missing from cell");
        topol.winding[1][i] = true;
        assert_eq!(topol.check(), Err(Error::CorruptWinding(1.into(), f)));
    }

    #[test]
    fn t_stale_face_map() {
        let mut topol = two_hexes();
        let key = {
            let mut key = topol.face_verts(0.into()).to_vec();
            key.sort_unstable();
            key
        };
        topol.face_map.insert(key, FH::from(1u32));
        assert_eq!(topol.check(), Err(Error::CorruptFace(0.into())));
    }

    #[test]
    fn t_missing_cell_neighbour() {
        let mut topol = two_hexes();
        topol.p2p[0].clear();
        assert_eq!(topol.check(), Err(Error::CorruptPoly(0.into())));
    }

    #[test]
    fn t_edge_cells_out_of_sync() {
        let mut topol = two_tets();
        let e = topol.edge_id(0.into(), 3.into()).expect("Cannot find edge");
        topol.e2p[e.ui()].push(PH::from(1u32));
        assert_eq!(topol.check(), Err(Error::CorruptEdge(e)));
    }
}
