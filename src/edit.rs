use crate::{
    adaptor::{Adaptor, FloatScalarAdaptor},
    attrib::AttribSync,
    element::{EH, PH, VH},
    error::Error,
    mesh::PolygonMeshT,
    shape::PolyShape,
    topol::{PolyTopology, clean_cycle, dedup_cycle},
};

/// The vertices that take part in flipping an edge shared by two triangles
/// `(x, y, c)` and `(y, x, d)`.
struct FlipStencil {
    p0: PH,
    p1: PH,
    x: VH,
    y: VH,
    c: VH,
    d: VH,
}

pub(crate) fn sorted_desc<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort_unstable_by(|a, b| b.cmp(a));
    items.dedup();
    items
}

impl PolyTopology {
    /// Add an isolated vertex.
    pub fn vert_add(&mut self, sync: &mut impl AttribSync) -> VH {
        self.push_vert(sync)
    }

    /// Add a poly with the given vertex loop. Edges are created as needed, and
    /// existing edges are reused.
    pub fn poly_add(&mut self, verts: &[VH], sync: &mut impl AttribSync) -> Result<PH, Error> {
        for &v in verts {
            self.check_vert(v)?;
        }
        let verts = clean_cycle(verts).ok_or(Error::DegeneratePoly(self.num_polys()))?;
        self.check_arity(verts.len())?;
        Ok(self.push_poly(verts, None, sync))
    }

    fn remove_poly_unchecked(
        &mut self,
        p: PH,
        remove_unreferenced_verts: bool,
        sync: &mut impl AttribSync,
    ) {
        let verts = self.poly_verts(p).to_vec();
        let edges = self.poly_edges(p).to_vec();
        self.unlink_poly(p);
        self.swap_remove_unlinked_poly(p, sync);
        let dangling: Vec<EH> = edges
            .into_iter()
            .filter(|&e| self.adj_e2p(e).is_empty())
            .collect();
        for e in sorted_desc(dangling) {
            self.swap_remove_dangling_edge(e, sync);
        }
        if remove_unreferenced_verts {
            let isolated: Vec<VH> = verts
                .into_iter()
                .filter(|&v| self.adj_v2p(v).is_empty() && self.adj_v2e(v).is_empty())
                .collect();
            for v in sorted_desc(isolated) {
                self.swap_remove_isolated_vert(v, sync);
            }
        }
    }

    /// Remove a poly, along with the edges that are not used by any other
    /// poly. The last poly takes the index of the removed poly. Vertices left
    /// without polys are removed too if `remove_unreferenced_verts` is set,
    /// the same way.
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

    /// Remove many polys at once. They are removed in descending order of
    /// their indices, so the handles in `polys` don't go stale halfway.
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

    /// Remove the vertex along with all the polys incident on it.
    pub fn vert_remove(&mut self, v: VH, sync: &mut impl AttribSync) -> Result<(), Error> {
        self.check_vert(v)?;
        for p in sorted_desc(self.adj_v2p(v).to_vec()) {
            self.remove_poly_unchecked(p, false, sync);
        }
        for e in sorted_desc(self.adj_v2e(v).to_vec()) {
            self.swap_remove_dangling_edge(e, sync);
        }
        self.swap_remove_isolated_vert(v, sync);
        Ok(())
    }

    /// Remove the edge along with all the polys incident on it.
    pub fn edge_remove(&mut self, e: EH, sync: &mut impl AttribSync) -> Result<(), Error> {
        self.check_edge(e)?;
        let [a, b] = self.edge_verts(e);
        for p in sorted_desc(self.adj_e2p(e).to_vec()) {
            self.remove_poly_unchecked(p, false, sync);
        }
        // Removing the polys usually takes the edge with it.
        if let Some(e) = self.edge_id(a, b) {
            self.swap_remove_dangling_edge(e, sync);
        }
        Ok(())
    }

    /// Split the edge by inserting a new vertex on it. The new vertex is
    /// returned.
    ///
    /// Every triangle incident on the edge is split in two by connecting the
    /// new vertex to the opposite vertex. The half containing the first vertex
    /// of the edge, in the winding of the triangle, keeps the index of the
    /// triangle, the other half is appended. Other polys get the new vertex
    /// spliced into their loop.
    pub fn edge_split(&mut self, e: EH, sync: &mut impl AttribSync) -> Result<VH, Error> {
        self.check_edge(e)?;
        let polys = self.adj_e2p(e).to_vec();
        if polys.len() > 2 {
            return Err(Error::NonManifoldEdge(e));
        }
        if let Some(arity) = self.arity() {
            if let Some(&p) = polys.iter().find(|&&p| self.poly_arity(p) != 3) {
                return Err(Error::ArityMismatch {
                    expected: arity,
                    found: self.poly_arity(p) + 1,
                });
            }
        }
        let m = self.push_vert(sync);
        // The halves of the edge inherit its attributes. Linking the polys
        // below finds them instead of creating fresh edges.
        let [a, b] = self.edge_verts(e);
        self.edge_get_or_insert(a, m, Some(e), sync);
        self.edge_get_or_insert(m, b, Some(e), sync);
        for p in polys {
            let Some(i) = self.poly_edges(p).iter().position(|&x| x == e) else {
                continue;
            };
            let verts = self.poly_verts(p);
            let n = verts.len();
            let (x, y) = (verts[i], verts[(i + 1) % n]);
            if n == 3 {
                let c = verts[(i + 2) % 3];
                self.set_poly_verts(p, vec![x, m, c], sync);
                self.push_poly(vec![m, y, c], Some(p), sync);
            } else {
                let mut verts = verts.to_vec();
                verts.insert(i + 1, m);
                self.set_poly_verts(p, verts, sync);
            }
        }
        self.swap_remove_dangling_edge(e, sync);
        Ok(m)
    }

    /// Check whether the edge can be collapsed without breaking the topology.
    ///
    /// The collapse is rejected if:
    /// - The edge is non-manifold.
    /// - A poly contains both vertices of the edge, but not the edge.
    /// - The two vertices share a neighbor that is not the apex of a triangle
    ///   incident on the edge (link condition).
    /// - The edge is interior, but both its vertices are on the boundary.
    /// - An incident triangle would leave behind an edge with no polys, or
    ///   with more than two polys.
    /// - Both incident triangles have the same apex.
    /// - A poly would become a duplicate of another poly.
    /// - The polys have a fixed arity other than 3, so the incident polys
    ///   would lose a vertex.
    pub fn edge_collapse_check(&self, e: EH) -> Result<(), Error> {
        self.check_edge(e)?;
        let polys = self.adj_e2p(e);
        if polys.len() > 2 {
            return Err(Error::NonManifoldEdge(e));
        }
        if let Some(arity) = self.arity() {
            if polys.iter().any(|&p| self.poly_arity(p) != 3) {
                return Err(Error::ArityMismatch {
                    expected: arity,
                    found: arity - 1,
                });
            }
        }
        let [a, b] = self.edge_verts(e);
        if self
            .adj_v2p(a)
            .iter()
            .any(|&p| !polys.contains(&p) && self.poly_contains_vert(p, b))
        {
            return Err(Error::UnsafeCollapse(e));
        }
        let tris: Vec<PH> = polys
            .iter()
            .copied()
            .filter(|&p| self.poly_arity(p) == 3)
            .collect();
        let apexes: Vec<VH> = tris
            .iter()
            .filter_map(|&p| self.tri_vert_opposite_to(p, e))
            .collect();
        if let [c, d] = apexes.as_slice() {
            if c == d {
                return Err(Error::UnsafeCollapse(e));
            }
        }
        if self
            .adj_v2v(a)
            .iter()
            .any(|&c| c != b && self.adj_v2v(b).contains(&c) && !apexes.contains(&c))
        {
            return Err(Error::LinkCondition(e));
        }
        if polys.len() == 2 && self.vert_is_boundary(a) && self.vert_is_boundary(b) {
            return Err(Error::LinkCondition(e));
        }
        // The edges (a, c) and (b, c) of an incident triangle are merged.
        for (&t, &c) in tris.iter().zip(apexes.iter()) {
            let mut merged: Vec<PH> = [self.edge_id(a, c), self.edge_id(b, c)]
                .into_iter()
                .flatten()
                .flat_map(|ec| self.adj_e2p(ec).iter().copied())
                .filter(|&q| q != t)
                .collect();
            merged.sort_unstable();
            merged.dedup();
            if merged.is_empty() || merged.len() > 2 {
                return Err(Error::UnsafeCollapse(e));
            }
        }
        // No two surviving polys may end up with the same vertex set. Only
        // polys around a or b change, so only those can collide.
        let mut keys: Vec<Vec<VH>> = Vec::new();
        let around_a = self.adj_v2p(a);
        let only_b = self.adj_v2p(b).iter().filter(|p| !around_a.contains(p));
        for &p in around_a.iter().chain(only_b) {
            if tris.contains(&p) {
                continue;
            }
            let mut key: Vec<VH> = self
                .poly_verts(p)
                .iter()
                .map(|&v| if v == b { a } else { v })
                .collect();
            key.sort_unstable();
            key.dedup();
            keys.push(key);
        }
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        if keys.len() != before {
            return Err(Error::UnsafeCollapse(e));
        }
        Ok(())
    }

    /// Collapse the edge by merging its higher indexed vertex into the lower
    /// indexed one, which is returned.
    ///
    /// Triangles incident on the edge are removed, other incident polys lose
    /// one vertex. The removed vertex is swapped with the last vertex, exactly
    /// like removing a poly.
    pub fn edge_collapse(&mut self, e: EH, sync: &mut impl AttribSync) -> Result<VH, Error> {
        self.edge_collapse_check(e)?;
        let [a, b] = self.edge_verts(e);
        let tris: Vec<PH> = self
            .adj_e2p(e)
            .iter()
            .copied()
            .filter(|&p| self.poly_arity(p) == 3)
            .collect();
        let mut candidates = self.adj_v2e(b).to_vec();
        for &t in &tris {
            candidates.extend_from_slice(self.poly_edges(t));
            self.unlink_poly(t);
        }
        for p in self.adj_v2p(b).to_vec() {
            let mut verts: Vec<VH> = self
                .poly_verts(p)
                .iter()
                .map(|&v| if v == b { a } else { v })
                .collect();
            dedup_cycle(&mut verts);
            self.set_poly_verts(p, verts, sync);
        }
        for e in sorted_desc(candidates) {
            if self.adj_e2p(e).is_empty() {
                self.swap_remove_dangling_edge(e, sync);
            }
        }
        for t in sorted_desc(tris) {
            self.swap_remove_unlinked_poly(t, sync);
        }
        self.swap_remove_isolated_vert(b, sync);
        Ok(a)
    }

    fn flip_stencil(&self, e: EH) -> Result<FlipStencil, Error> {
        self.check_edge(e)?;
        let &[p0, p1] = self.adj_e2p(e) else {
            return Err(Error::NotInteriorEdge(e));
        };
        if let Some(&p) = [p0, p1].iter().find(|&&p| self.poly_arity(p) != 3) {
            return Err(Error::NotATriangle(p));
        }
        let i = self
            .poly_edges(p0)
            .iter()
            .position(|&x| x == e)
            .ok_or(Error::NotInteriorEdge(e))?;
        let (x, y, c) = (
            self.poly_vert_at(p0, i),
            self.poly_vert_at(p0, i + 1),
            self.poly_vert_at(p0, i + 2),
        );
        let d = self
            .tri_vert_opposite_to(p1, e)
            .ok_or(Error::NotATriangle(p1))?;
        if c == d {
            return Err(Error::DegenerateFlip(e));
        }
        if self.edge_id(c, d).is_some() {
            return Err(Error::DuplicateEdge(c, d));
        }
        Ok(FlipStencil {
            p0,
            p1,
            x,
            y,
            c,
            d,
        })
    }

    /// Check whether the edge can be flipped.
    pub fn edge_flip_check(&self, e: EH) -> Result<(), Error> {
        self.flip_stencil(e).map(|_| ())
    }

    /// Replace the edge shared by two triangles with the other diagonal of the
    /// quad they form.
    /// ```text
    ///       c                 c
    ///      / \               /|\
    ///     / p0\             / | \
    ///    x-----y    =>     x p0|p1y
    ///     \ p1/             \ | /
    ///      \ /               \|/
    ///       d                 d
    /// ```
    /// `p0` is the first poly incident on the edge, and `x -> y` is the
    /// direction in which `p0` walks the edge. The triangles become
    /// `(c, x, d)` and `(c, d, y)`. The edge keeps its index, so the returned
    /// handle is always `e`.
    pub fn edge_flip(&mut self, e: EH, sync: &mut impl AttribSync) -> Result<EH, Error> {
        let FlipStencil {
            p0,
            p1,
            x,
            y,
            c,
            d,
        } = self.flip_stencil(e)?;
        self.unlink_poly(p0);
        self.unlink_poly(p1);
        self.rehome_dangling_edge(e, c, d);
        self.set_poly_verts(p0, vec![c, x, d], sync);
        self.set_poly_verts(p1, vec![c, d, y], sync);
        Ok(e)
    }

    /// Split the poly into a fan of triangles around a new vertex, which is
    /// returned. The first triangle keeps the index of the poly.
    pub fn poly_split(&mut self, p: PH, sync: &mut impl AttribSync) -> Result<VH, Error> {
        self.check_poly(p)?;
        if let Some(arity) = self.arity() {
            if arity != 3 {
                return Err(Error::ArityMismatch {
                    expected: arity,
                    found: 3,
                });
            }
        }
        let verts = self.poly_verts(p).to_vec();
        let n = verts.len();
        let m = self.push_vert(sync);
        self.set_poly_verts(p, vec![verts[0], verts[1], m], sync);
        for i in 1..n {
            self.push_poly(vec![verts[i], verts[(i + 1) % n], m], Some(p), sync);
        }
        Ok(m)
    }

    /// Reverse the winding of the poly.
    pub fn poly_flip_winding(&mut self, p: PH, sync: &mut impl AttribSync) -> Result<(), Error> {
        self.check_poly(p)?;
        self.reverse_poly(p, sync);
        Ok(())
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    /// Add an isolated vertex at the given position.
    pub fn vert_add(&mut self, pos: A::Vector) -> VH {
        let v = self.topol.vert_add(&mut self.attribs);
        self.attribs.points[v.ui()] = pos;
        v
    }

    pub fn poly_add(&mut self, verts: &[VH]) -> Result<PH, Error> {
        self.apply_edit("poly add", |topol, attribs| topol.poly_add(verts, attribs))
    }

    /// See [`PolyTopology::poly_remove`].
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

    pub fn vert_remove(&mut self, v: VH) -> Result<(), Error> {
        self.apply_edit("vertex remove", |topol, attribs| topol.vert_remove(v, attribs))
    }

    pub fn edge_remove(&mut self, e: EH) -> Result<(), Error> {
        self.apply_edit("edge remove", |topol, attribs| topol.edge_remove(e, attribs))
    }

    /// See [`PolyTopology::edge_flip`].
    pub fn edge_flip(&mut self, e: EH) -> Result<EH, Error> {
        self.apply_edit("edge flip", |topol, attribs| topol.edge_flip(e, attribs))
    }

    pub fn poly_flip_winding(&mut self, p: PH) -> Result<(), Error> {
        self.apply_edit("poly winding flip", |topol, attribs| {
            topol.poly_flip_winding(p, attribs)
        })
    }

    /// Split the poly into a fan of triangles around a new vertex placed at
    /// `pos`.
    pub fn poly_split_at(&mut self, p: PH, pos: A::Vector) -> Result<VH, Error> {
        self.apply_edit("poly split", |topol, attribs| {
            let v = topol.poly_split(p, attribs)?;
            attribs.points[v.ui()] = pos;
            Ok(v)
        })
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: PolyShape,
{
    /// Split the edge at parameter `t`, measured from the first vertex of the
    /// edge towards the second. See [`PolyTopology::edge_split`].
    pub fn edge_split(&mut self, e: EH, t: f64) -> Result<VH, Error> {
        let pos = self.topol.check_edge(e).map(|_| self.edge_sample(e, t));
        self.apply_edit("edge split", |topol, attribs| {
            let pos = pos?;
            let v = topol.edge_split(e, attribs)?;
            attribs.points[v.ui()] = pos;
            Ok(v)
        })
    }

    /// Collapse the edge and move the surviving vertex to parameter `t`,
    /// measured from the first vertex of the edge towards the second. See
    /// [`PolyTopology::edge_collapse`].
    pub fn edge_collapse(&mut self, e: EH, t: f64) -> Result<VH, Error> {
        let pos = self.topol.check_edge(e).map(|_| self.edge_sample(e, t));
        self.apply_edit("edge collapse", |topol, attribs| {
            let pos = pos?;
            let v = topol.edge_collapse(e, attribs)?;
            attribs.points[v.ui()] = pos;
            Ok(v)
        })
    }

    /// Split the poly into a fan of triangles around its centroid.
    pub fn poly_split(&mut self, p: PH) -> Result<VH, Error> {
        let pos = self.topol.check_poly(p).map(|_| self.poly_centroid(p));
        self.apply_edit("poly split", |topol, attribs| {
            let pos = pos?;
            let v = topol.poly_split(p, attribs)?;
            attribs.points[v.ui()] = pos;
            Ok(v)
        })
    }
}
