use crate::{
    attrib::AttribSync,
    element::{EH, PH, VH},
    error::Error,
};
use ahash::AHashMap;

/// Classification of an edge by the number of polys incident on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    /// No incident polys. Only exists transiently inside edits.
    Dangling,
    /// Exactly one incident poly.
    Boundary,
    /// Exactly two incident polys.
    Interior,
    /// More than two incident polys.
    NonManifold,
}

impl EdgeClass {
    pub(crate) fn from_count(n: usize) -> Self {
        match n {
            0 => EdgeClass::Dangling,
            1 => EdgeClass::Boundary,
            2 => EdgeClass::Interior,
            _ => EdgeClass::NonManifold,
        }
    }
}

pub(crate) fn canonical(a: VH, b: VH) -> (VH, VH) {
    if a < b { (a, b) } else { (b, a) }
}

/// Remove the first occurrence of `item`, preserving the order of the rest.
pub(crate) fn remove_item<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    match items.iter().position(|x| *x == item) {
        Some(i) => {
            items.remove(i);
            true
        }
        None => false,
    }
}

pub(crate) fn replace_item<T: PartialEq + Copy>(items: &mut [T], old: T, new: T) {
    for x in items.iter_mut().filter(|x| **x == old) {
        *x = new;
    }
}

pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Collapse consecutive repeated vertices of a closed loop, including the
/// pair that wraps around.
pub(crate) fn dedup_cycle(verts: &mut Vec<VH>) {
    verts.dedup();
    while verts.len() > 1 && verts.first() == verts.last() {
        verts.pop();
    }
}

/// Returns `None` if the loop has fewer than 3 distinct vertices after
/// collapsing consecutive repeats, or still repeats a vertex.
pub(crate) fn clean_cycle(verts: &[VH]) -> Option<Vec<VH>> {
    let mut out = verts.to_vec();
    dedup_cycle(&mut out);
    if out.len() < 3 {
        return None;
    }
    let mut sorted = out.clone();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }
    Some(out)
}

/// Element stores and adjacency of a polygon mesh.
///
/// Vertices are implicit, only their count is stored. Edges are stored with
/// their end points in canonical `(min, max)` order and deduplicated through a
/// hash map. Polys are stored as closed loops of vertices. All the `v2*`, `e2*`
/// and `p2*` tables are caches derived from these, and are updated
/// incrementally by the edit operators.
///
/// The `i`-th entry of `adj_p2e(p)` is always the edge between the `i`-th and
/// the `(i + 1) % n`-th vertex of `p`.
#[derive(Debug, Clone, Default)]
pub struct PolyTopology {
    arity: Option<usize>,
    pub(crate) edges: Vec<[VH; 2]>,
    pub(crate) polys: Vec<Vec<VH>>,
    pub(crate) edge_map: AHashMap<(VH, VH), EH>,
    pub(crate) v2v: Vec<Vec<VH>>,
    pub(crate) v2e: Vec<Vec<EH>>,
    pub(crate) v2p: Vec<Vec<PH>>,
    pub(crate) e2p: Vec<Vec<PH>>,
    pub(crate) p2e: Vec<Vec<EH>>,
    pub(crate) p2p: Vec<Vec<PH>>,
}

impl PolyTopology {
    /// Empty topology. `arity` restricts the number of vertices per poly,
    /// `None` allows any polygon.
    pub fn new(arity: Option<usize>) -> Self {
        PolyTopology {
            arity,
            ..Default::default()
        }
    }

    /// Build the full topology from a list of polys given as vertex indices.
    ///
    /// Consecutive repeated vertices are collapsed. Every one of the
    /// `num_verts` vertices has to be referenced by at least one poly.
    pub fn from_polys<P: AsRef<[u32]>>(
        num_verts: usize,
        polys: &[P],
        arity: Option<usize>,
    ) -> Result<Self, Error> {
        let mut topol = PolyTopology::new(arity);
        topol.v2v.reserve(num_verts);
        topol.v2e.reserve(num_verts);
        topol.v2p.reserve(num_verts);
        topol.polys.reserve(polys.len());
        for _ in 0..num_verts {
            topol.push_vert(&mut ());
        }
        for (i, poly) in polys.iter().enumerate() {
            let raw = poly.as_ref();
            if let Some(&v) = raw.iter().find(|&&v| v as usize >= num_verts) {
                return Err(Error::InvalidVertex(v.into()));
            }
            let raw: Vec<VH> = raw.iter().map(|&v| VH::from(v)).collect();
            let verts = clean_cycle(&raw).ok_or(Error::DegeneratePoly(i))?;
            topol.check_arity(verts.len())?;
            topol.push_poly(verts, None, &mut ());
        }
        if let Some(v) = topol.verts().find(|v| topol.v2p[v.ui()].is_empty()) {
            return Err(Error::UnreferencedVertex(v));
        }
        log::trace!(
            "Built polygon topology with {} vertices, {} edges and {} polys",
            topol.num_verts(),
            topol.num_edges(),
            topol.num_polys()
        );
        Ok(topol)
    }

    pub(crate) fn check_arity(&self, n: usize) -> Result<(), Error> {
        match self.arity {
            Some(expected) if expected != n => Err(Error::ArityMismatch { expected, found: n }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_vert(&self, v: VH) -> Result<(), Error> {
        if v.ui() < self.num_verts() {
            Ok(())
        } else {
            Err(Error::InvalidVertex(v))
        }
    }

    pub(crate) fn check_edge(&self, e: EH) -> Result<(), Error> {
        if e.ui() < self.num_edges() {
            Ok(())
        } else {
            Err(Error::InvalidEdge(e))
        }
    }

    pub(crate) fn check_poly(&self, p: PH) -> Result<(), Error> {
        if p.ui() < self.num_polys() {
            Ok(())
        } else {
            Err(Error::InvalidPoly(p))
        }
    }

    /* Mutation primitives. None of these validate anything, the edit
     * operators do that before calling them. */

    pub(crate) fn push_vert(&mut self, sync: &mut impl AttribSync) -> VH {
        let v = VH::new(self.v2v.len());
        self.v2v.push(Vec::new());
        self.v2e.push(Vec::new());
        self.v2p.push(Vec::new());
        sync.push_vert();
        v
    }

    /// A new edge copies the attributes of `src`, if given.
    pub(crate) fn edge_get_or_insert(
        &mut self,
        a: VH,
        b: VH,
        src: Option<EH>,
        sync: &mut impl AttribSync,
    ) -> EH {
        let key = canonical(a, b);
        if let Some(&e) = self.edge_map.get(&key) {
            return e;
        }
        let e = EH::new(self.edges.len());
        self.edges.push([key.0, key.1]);
        self.e2p.push(Vec::new());
        self.edge_map.insert(key, e);
        self.v2e[a.ui()].push(e);
        self.v2e[b.ui()].push(e);
        self.v2v[a.ui()].push(b);
        self.v2v[b.ui()].push(a);
        sync.push_edge(src);
        e
    }

    /// Register the poly's vertex loop in all adjacency tables, creating
    /// missing edges.
    pub(crate) fn link_poly(&mut self, p: PH, sync: &mut impl AttribSync) {
        let n = self.polys[p.ui()].len();
        let mut pedges = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.polys[p.ui()][i];
            let b = self.polys[p.ui()][(i + 1) % n];
            pedges.push(self.edge_get_or_insert(a, b, None, sync));
        }
        for &v in &self.polys[p.ui()] {
            push_unique(&mut self.v2p[v.ui()], p);
        }
        let mut nbrs = Vec::new();
        for &e in &pedges {
            for &q in &self.e2p[e.ui()] {
                if q != p {
                    push_unique(&mut nbrs, q);
                }
            }
            self.e2p[e.ui()].push(p);
        }
        for &q in &nbrs {
            push_unique(&mut self.p2p[q.ui()], p);
        }
        self.p2e[p.ui()] = pedges;
        self.p2p[p.ui()] = nbrs;
    }

    /// Remove every reference to the poly from the adjacency tables. The vertex
    /// loop and the slot remain. Edges may be left dangling.
    pub(crate) fn unlink_poly(&mut self, p: PH) {
        for e in std::mem::take(&mut self.p2e[p.ui()]) {
            remove_item(&mut self.e2p[e.ui()], p);
        }
        for q in std::mem::take(&mut self.p2p[p.ui()]) {
            remove_item(&mut self.p2p[q.ui()], p);
        }
        for &v in &self.polys[p.ui()] {
            remove_item(&mut self.v2p[v.ui()], p);
        }
    }

    pub(crate) fn push_poly(
        &mut self,
        verts: Vec<VH>,
        src: Option<PH>,
        sync: &mut impl AttribSync,
    ) -> PH {
        let p = PH::new(self.polys.len());
        self.polys.push(verts);
        self.p2e.push(Vec::new());
        self.p2p.push(Vec::new());
        sync.push_poly(src);
        self.link_poly(p, sync);
        p
    }

    pub(crate) fn set_poly_verts(&mut self, p: PH, verts: Vec<VH>, sync: &mut impl AttribSync) {
        self.unlink_poly(p);
        self.polys[p.ui()] = verts;
        self.link_poly(p, sync);
    }

    pub(crate) fn reverse_poly(&mut self, p: PH, sync: &mut impl AttribSync) {
        self.unlink_poly(p);
        self.polys[p.ui()].reverse();
        self.link_poly(p, sync);
    }

    /// Swap-remove a poly that was already unlinked. The last poly takes its
    /// index.
    pub(crate) fn swap_remove_unlinked_poly(&mut self, p: PH, sync: &mut impl AttribSync) {
        let last = PH::new(self.polys.len() - 1);
        self.polys.swap_remove(p.ui());
        self.p2e.swap_remove(p.ui());
        self.p2p.swap_remove(p.ui());
        sync.swap_remove_poly(p);
        if last == p {
            return;
        }
        for &e in &self.p2e[p.ui()] {
            replace_item(&mut self.e2p[e.ui()], last, p);
        }
        for &v in &self.polys[p.ui()] {
            replace_item(&mut self.v2p[v.ui()], last, p);
        }
        let nbrs = self.p2p[p.ui()].clone();
        for q in nbrs {
            replace_item(&mut self.p2p[q.ui()], last, p);
        }
    }

    /// Unlink and swap-remove a poly, without touching edges or vertices.
    pub(crate) fn remove_poly_slot(&mut self, p: PH, sync: &mut impl AttribSync) {
        self.unlink_poly(p);
        self.swap_remove_unlinked_poly(p, sync);
    }

    /// Swap-remove an edge with no incident polys. The last edge takes its
    /// index.
    pub(crate) fn swap_remove_dangling_edge(&mut self, e: EH, sync: &mut impl AttribSync) {
        let [a, b] = self.edges[e.ui()];
        self.edge_map.remove(&(a, b));
        remove_item(&mut self.v2e[a.ui()], e);
        remove_item(&mut self.v2e[b.ui()], e);
        remove_item(&mut self.v2v[a.ui()], b);
        remove_item(&mut self.v2v[b.ui()], a);
        let last = EH::new(self.edges.len() - 1);
        self.edges.swap_remove(e.ui());
        self.e2p.swap_remove(e.ui());
        sync.swap_remove_edge(e);
        if last == e {
            return;
        }
        let [a, b] = self.edges[e.ui()];
        self.edge_map.insert((a, b), e);
        replace_item(&mut self.v2e[a.ui()], last, e);
        replace_item(&mut self.v2e[b.ui()], last, e);
        for &p in &self.e2p[e.ui()] {
            replace_item(&mut self.p2e[p.ui()], last, e);
        }
    }

    /// Swap-remove a vertex with no incident edges or polys. The last vertex
    /// takes its index.
    pub(crate) fn swap_remove_isolated_vert(&mut self, v: VH, sync: &mut impl AttribSync) {
        let last = VH::new(self.v2v.len() - 1);
        self.v2v.swap_remove(v.ui());
        self.v2e.swap_remove(v.ui());
        self.v2p.swap_remove(v.ui());
        sync.swap_remove_vert(v);
        if last == v {
            return;
        }
        let nbrs = self.v2v[v.ui()].clone();
        for w in nbrs {
            replace_item(&mut self.v2v[w.ui()], last, v);
        }
        for &e in &self.v2e[v.ui()] {
            let [a, b] = self.edges[e.ui()];
            self.edge_map.remove(&(a, b));
            let (a, b) = canonical(
                if a == last { v } else { a },
                if b == last { v } else { b },
            );
            self.edges[e.ui()] = [a, b];
            self.edge_map.insert((a, b), e);
        }
        for &p in &self.v2p[v.ui()] {
            replace_item(&mut self.polys[p.ui()], last, v);
        }
    }

    /// Reuse the slot of an edge with no incident polys for a different pair
    /// of vertices that are not connected yet.
    pub(crate) fn rehome_dangling_edge(&mut self, e: EH, a: VH, b: VH) {
        let [oa, ob] = self.edges[e.ui()];
        self.edge_map.remove(&(oa, ob));
        remove_item(&mut self.v2e[oa.ui()], e);
        remove_item(&mut self.v2e[ob.ui()], e);
        remove_item(&mut self.v2v[oa.ui()], ob);
        remove_item(&mut self.v2v[ob.ui()], oa);
        let (a, b) = canonical(a, b);
        self.edges[e.ui()] = [a, b];
        self.edge_map.insert((a, b), e);
        self.v2e[a.ui()].push(e);
        self.v2e[b.ui()].push(e);
        self.v2v[a.ui()].push(b);
        self.v2v[b.ui()].push(a);
    }

    /* Queries. */

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub fn num_verts(&self) -> usize {
        self.v2v.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_polys(&self) -> usize {
        self.polys.len()
    }

    pub fn verts(&self) -> impl Iterator<Item = VH> + use<> {
        (0..self.num_verts() as u32).map(VH::from)
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        (0..self.num_edges() as u32).map(EH::from)
    }

    pub fn polys(&self) -> impl Iterator<Item = PH> + use<> {
        (0..self.num_polys() as u32).map(PH::from)
    }

    /// End points of the edge, lower index first.
    pub fn edge_verts(&self, e: EH) -> [VH; 2] {
        self.edges[e.ui()]
    }

    pub fn poly_verts(&self, p: PH) -> &[VH] {
        &self.polys[p.ui()]
    }

    pub fn poly_arity(&self, p: PH) -> usize {
        self.polys[p.ui()].len()
    }

    pub fn poly_edges(&self, p: PH) -> &[EH] {
        &self.p2e[p.ui()]
    }

    pub fn adj_v2v(&self, v: VH) -> &[VH] {
        &self.v2v[v.ui()]
    }

    pub fn adj_v2e(&self, v: VH) -> &[EH] {
        &self.v2e[v.ui()]
    }

    pub fn adj_v2p(&self, v: VH) -> &[PH] {
        &self.v2p[v.ui()]
    }

    pub fn adj_e2p(&self, e: EH) -> &[PH] {
        &self.e2p[e.ui()]
    }

    pub fn adj_p2e(&self, p: PH) -> &[EH] {
        &self.p2e[p.ui()]
    }

    pub fn adj_p2p(&self, p: PH) -> &[PH] {
        &self.p2p[p.ui()]
    }

    /// Edges sharing at least one end point with `e`, not including `e`.
    pub fn adj_e2e(&self, e: EH) -> Vec<EH> {
        let [a, b] = self.edges[e.ui()];
        let mut out: Vec<EH> = self.v2e[a.ui()]
            .iter()
            .chain(self.v2e[b.ui()].iter())
            .copied()
            .filter(|&x| x != e)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Find the edge between the two vertices.
    pub fn edge_id(&self, a: VH, b: VH) -> Option<EH> {
        self.edge_map.get(&canonical(a, b)).copied()
    }

    /// Find a poly with exactly the given set of vertices, in any order.
    pub fn poly_id(&self, verts: &[VH]) -> Option<PH> {
        let first = *verts.first()?;
        if first.ui() >= self.num_verts() {
            return None;
        }
        let mut key = verts.to_vec();
        key.sort_unstable();
        key.dedup();
        self.v2p[first.ui()].iter().copied().find(|p| {
            let mut pv = self.polys[p.ui()].clone();
            pv.sort_unstable();
            pv == key
        })
    }

    pub fn edge_contains_vert(&self, e: EH, v: VH) -> bool {
        self.edges[e.ui()].contains(&v)
    }

    pub fn poly_contains_vert(&self, p: PH, v: VH) -> bool {
        self.polys[p.ui()].contains(&v)
    }

    pub fn poly_contains_edge(&self, p: PH, e: EH) -> bool {
        self.p2e[p.ui()].contains(&e)
    }

    /// Position of the vertex in the poly's loop.
    pub fn poly_vert_offset(&self, p: PH, v: VH) -> Option<usize> {
        self.polys[p.ui()].iter().position(|&x| x == v)
    }

    /// The other end point of `e`, if `v` is one of its end points.
    pub fn vert_opposite_to(&self, e: EH, v: VH) -> Option<VH> {
        match self.edges[e.ui()] {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => None,
        }
    }

    /// The vertex of triangle `p` that is not on edge `e`.
    pub fn tri_vert_opposite_to(&self, p: PH, e: EH) -> Option<VH> {
        let verts = &self.polys[p.ui()];
        if verts.len() != 3 || !self.poly_contains_edge(p, e) {
            return None;
        }
        verts.iter().copied().find(|&v| !self.edge_contains_vert(e, v))
    }

    /// Whether the poly's winding walks the edge from its first end point to
    /// its second, i.e. in the direction of [`Self::edge_verts`]. `None` if
    /// the edge is not on the poly.
    pub fn poly_edge_is_ccw(&self, p: PH, e: EH) -> Option<bool> {
        let i = self.p2e[p.ui()].iter().position(|&x| x == e)?;
        Some(self.polys[p.ui()][i] == self.edges[e.ui()][0])
    }

    /// An edge is consistently oriented if its two polys walk it in opposite
    /// directions. Boundary edges are trivially consistent, non-manifold edges
    /// never are.
    pub fn edge_is_consistently_oriented(&self, e: EH) -> bool {
        match self.e2p[e.ui()].as_slice() {
            [p, q] => self.poly_edge_is_ccw(*p, e) != self.poly_edge_is_ccw(*q, e),
            polys => polys.len() < 3,
        }
    }

    pub fn is_consistently_oriented(&self) -> bool {
        self.edges().all(|e| self.edge_is_consistently_oriented(e))
    }

    pub fn edge_class(&self, e: EH) -> EdgeClass {
        EdgeClass::from_count(self.e2p[e.ui()].len())
    }

    pub fn edge_is_boundary(&self, e: EH) -> bool {
        self.e2p[e.ui()].len() == 1
    }

    pub fn edge_is_manifold(&self, e: EH) -> bool {
        self.e2p[e.ui()].len() <= 2
    }

    pub fn vert_is_boundary(&self, v: VH) -> bool {
        self.v2e[v.ui()].iter().any(|&e| self.edge_is_boundary(e))
    }

    /// The polys around a manifold vertex form a single fan, that is either
    /// closed, or open and bounded by two boundary edges. Isolated vertices
    /// are manifold.
    pub fn vert_is_manifold(&self, v: VH) -> bool {
        let mut nboundary = 0usize;
        for &e in &self.v2e[v.ui()] {
            match self.edge_class(e) {
                EdgeClass::NonManifold => return false,
                EdgeClass::Boundary => nboundary += 1,
                EdgeClass::Interior | EdgeClass::Dangling => {}
            }
        }
        if nboundary != 0 && nboundary != 2 {
            return false;
        }
        // Walk across the edges incident on v, the fan must be connected.
        let polys = &self.v2p[v.ui()];
        if polys.is_empty() {
            return true;
        }
        let mut visited = vec![false; polys.len()];
        let mut stack = vec![0usize];
        visited[0] = true;
        let mut count = 1usize;
        while let Some(i) = stack.pop() {
            for &e in &self.p2e[polys[i].ui()] {
                if !self.edge_contains_vert(e, v) {
                    continue;
                }
                for q in &self.e2p[e.ui()] {
                    if let Some(j) = polys.iter().position(|x| x == q) {
                        if !std::mem::replace(&mut visited[j], true) {
                            count += 1;
                            stack.push(j);
                        }
                    }
                }
            }
        }
        count == polys.len()
    }

    pub fn poly_is_boundary(&self, p: PH) -> bool {
        self.p2e[p.ui()].iter().any(|&e| self.edge_is_boundary(e))
    }

    pub fn is_manifold(&self) -> bool {
        self.edges().all(|e| self.edge_is_manifold(e)) && self.verts().all(|v| self.vert_is_manifold(v))
    }

    /// A closed mesh has no boundary edges.
    pub fn is_closed(&self) -> bool {
        self.e2p.iter().all(|polys| polys.len() >= 2)
    }

    pub fn boundary_edges(&self) -> impl Iterator<Item = EH> {
        self.edges().filter(|&e| self.edge_is_boundary(e))
    }

    /// Number of edges incident on the vertex.
    pub fn vert_valence(&self, v: VH) -> usize {
        self.v2e[v.ui()].len()
    }

    /// Vertex `i` of the poly's loop, wrapping around.
    pub(crate) fn poly_vert_at(&self, p: PH, i: usize) -> VH {
        let verts = &self.polys[p.ui()];
        verts[i % verts.len()]
    }
}
