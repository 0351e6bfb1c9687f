use crate::{
    adaptor::Adaptor,
    element::{EH, PH, VH},
    error::Error,
    mesh::PolygonMeshT,
    shape::PolyShape,
    topol::{PolyTopology, clean_cycle},
};

fn count<T: PartialEq>(items: &[T], item: T) -> usize {
    items.iter().filter(|x| **x == item).count()
}

fn has_duplicates<T: Ord + Copy>(items: &[T]) -> bool {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}

fn check_sizes(topol: &PolyTopology) -> Result<(), Error> {
    let nv = topol.num_verts();
    for len in [topol.v2e.len(), topol.v2p.len()] {
        if len != nv {
            return Err(Error::MismatchedArrayLengths(nv, len));
        }
    }
    let ne = topol.num_edges();
    for len in [topol.e2p.len(), topol.edge_map.len()] {
        if len != ne {
            return Err(Error::MismatchedArrayLengths(ne, len));
        }
    }
    let np = topol.num_polys();
    for len in [topol.p2e.len(), topol.p2p.len()] {
        if len != np {
            return Err(Error::MismatchedArrayLengths(np, len));
        }
    }
    Ok(())
}

fn check_edges(topol: &PolyTopology) -> Result<(), Error> {
    let nv = topol.num_verts();
    let np = topol.num_polys();
    for e in topol.edges() {
        let [a, b] = topol.edges[e.ui()];
        // Canonical order, and the lookup map must agree.
        if a >= b || b.ui() >= nv || topol.edge_map.get(&(a, b)) != Some(&e) {
            return Err(Error::CorruptEdge(e));
        }
        // Listed exactly once by each of its end points.
        if count(&topol.v2e[a.ui()], e) != 1 || count(&topol.v2e[b.ui()], e) != 1 {
            return Err(Error::CorruptEdge(e));
        }
        if count(&topol.v2v[a.ui()], b) != 1 || count(&topol.v2v[b.ui()], a) != 1 {
            return Err(Error::CorruptEdge(e));
        }
        let polys = &topol.e2p[e.ui()];
        if polys.is_empty() || has_duplicates(polys) {
            return Err(Error::CorruptEdge(e));
        }
        if polys
            .iter()
            .any(|p| p.ui() >= np || !topol.p2e[p.ui()].contains(&e))
        {
            return Err(Error::CorruptEdge(e));
        }
    }
    Ok(())
}

fn check_verts(topol: &PolyTopology) -> Result<(), Error> {
    let ne = topol.num_edges();
    let np = topol.num_polys();
    for v in topol.verts() {
        let edges = &topol.v2e[v.ui()];
        let nbrs = &topol.v2v[v.ui()];
        if has_duplicates(edges) || has_duplicates(nbrs) || edges.len() != nbrs.len() {
            return Err(Error::CorruptVertex(v));
        }
        if edges
            .iter()
            .any(|e| e.ui() >= ne || !topol.edges[e.ui()].contains(&v))
        {
            return Err(Error::CorruptVertex(v));
        }
        // Every neighbour must be reachable through an incident edge.
        let reachable = nbrs.iter().all(|&w| {
            topol
                .edge_id(v, w)
                .is_some_and(|e| edges.contains(&e) && topol.v2v[w.ui()].contains(&v))
        });
        if !reachable {
            return Err(Error::CorruptVertex(v));
        }
        let polys = &topol.v2p[v.ui()];
        if has_duplicates(polys)
            || polys
                .iter()
                .any(|p| p.ui() >= np || !topol.polys[p.ui()].contains(&v))
        {
            return Err(Error::CorruptVertex(v));
        }
    }
    Ok(())
}

fn check_polys(topol: &PolyTopology) -> Result<(), Error> {
    for p in topol.polys() {
        let verts: &[VH] = &topol.polys[p.ui()];
        if verts.iter().any(|v| v.ui() >= topol.num_verts())
            || clean_cycle(verts).as_deref() != Some(verts)
            || topol.check_arity(verts.len()).is_err()
        {
            return Err(Error::CorruptPoly(p));
        }
        let edges = &topol.p2e[p.ui()];
        if edges.len() != verts.len() {
            return Err(Error::CorruptPoly(p));
        }
        for (i, &e) in edges.iter().enumerate() {
            let a = verts[i];
            let b = verts[(i + 1) % verts.len()];
            if topol.edge_id(a, b) != Some(e) || count(&topol.e2p[e.ui()], p) != 1 {
                return Err(Error::CorruptPoly(p));
            }
        }
        if verts.iter().any(|v| !topol.v2p[v.ui()].contains(&p)) {
            return Err(Error::CorruptPoly(p));
        }
        // Neighbours are exactly the other polys on the edges of this poly.
        let mut expected: Vec<PH> = edges
            .iter()
            .flat_map(|e| topol.e2p[e.ui()].iter().copied())
            .filter(|&q| q != p)
            .collect();
        expected.sort_unstable();
        expected.dedup();
        let actual = &topol.p2p[p.ui()];
        let mut sorted = actual.clone();
        sorted.sort_unstable();
        if sorted.len() != actual.len() || sorted != expected {
            return Err(Error::CorruptPoly(p));
        }
        if actual
            .iter()
            .any(|q| !topol.p2p[q.ui()].contains(&p))
        {
            return Err(Error::CorruptPoly(p));
        }
    }
    Ok(())
}

impl PolyTopology {
    /// Check every adjacency table against the element stores.
    ///
    /// Returns the first inconsistency found. Vertices without polys are
    /// allowed, edges without polys are not.
    pub fn check(&self) -> Result<(), Error> {
        check_sizes(self)?;
        check_edges(self)?;
        check_verts(self)?;
        check_polys(self)?;
        Ok(())
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
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
        element::{EH, PH, VH},
        error::Error,
        topol::{PolyTopology, test::quad_box},
    };

    #[test]
    fn t_box_check() {
        quad_box().check().expect("Topology check failed");
    }

    #[test]
    fn t_isolated_vertex_is_fine() {
        let mut topol = quad_box();
        topol.vert_add(&mut ());
        topol.check().expect("Topology check failed");
    }

    #[test]
    fn t_asymmetric_neighbours() {
        let mut topol = quad_box();
        topol.v2v[0].retain(|&w| w != VH::from(1u32));
        let e = topol.edge_id(0.into(), 1.into()).expect("Cannot find edge");
        assert_eq!(topol.check(), Err(Error::CorruptEdge(e)));
    }

    #[test]
    fn t_edge_poly_not_mutual() {
        let mut topol = quad_box();
        topol.e2p[3].push(PH::from(5u32));
        assert_eq!(topol.check(), Err(Error::CorruptEdge(3.into())));
    }

    #[test]
    fn t_stale_poly_neighbour() {
        let mut topol = quad_box();
        // Polys 0 and 5 are opposite faces of the box.
        topol.p2p[0].push(5.into());
        assert_eq!(topol.check(), Err(Error::CorruptPoly(0.into())));
    }

    #[test]
    fn t_wrong_edge_map() {
        let mut topol = quad_box();
        let [a, b] = topol.edge_verts(0.into());
        topol.edge_map.insert((a, b), EH::from(1u32));
        assert_eq!(topol.check(), Err(Error::CorruptEdge(0.into())));
    }

    #[test]
    fn t_missing_vertex_poly() {
        let mut topol = PolyTopology::from_polys(3, &[[0u32, 1, 2]], None)
            .expect("Cannot build triangle");
        topol.v2p[2].clear();
        assert_eq!(topol.check(), Err(Error::CorruptPoly(0.into())));
    }
}
