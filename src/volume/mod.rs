/*!
Topology of polyhedral meshes.

Cells are bounded by faces, and faces are closed loops of vertices. A face can
be shared by two cells which see it from opposite sides, so the orientation of
a face is recorded per cell: the winding flag of a face in a cell is `true`
when the stored vertex order of the face is counter-clockwise when seen from
outside that cell.
*/

mod check;
mod edit;

use crate::{
    attrib::AttribSync,
    element::{EH, FH, PH, VH},
    error::Error,
    shape::CellTemplate,
    topol::{EdgeClass, canonical, clean_cycle, push_unique, remove_item, replace_item},
};
use ahash::AHashMap;

/// Faces are deduplicated by their vertex set.
fn face_key(verts: &[VH]) -> Vec<VH> {
    let mut key = verts.to_vec();
    key.sort_unstable();
    key
}

/// Whether `b` is a cyclic rotation of `a`.
pub(crate) fn same_cycle(a: &[VH], b: &[VH]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let Some(offset) = a.first().and_then(|first| b.iter().position(|x| x == first)) else {
        return a.is_empty();
    };
    (0..a.len()).all(|i| a[i] == b[(i + offset) % b.len()])
}

fn has_duplicates<T: Ord + Copy>(items: &[T]) -> bool {
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// Element stores and adjacency of a polyhedral mesh.
#[derive(Debug, Clone, Default)]
pub struct VolumeTopology {
    template: Option<CellTemplate>,
    pub(crate) edges: Vec<[VH; 2]>,
    pub(crate) edge_map: AHashMap<(VH, VH), EH>,
    pub(crate) faces: Vec<Vec<VH>>,
    pub(crate) face_map: AHashMap<Vec<VH>, FH>,
    pub(crate) polys: Vec<Vec<FH>>,
    pub(crate) winding: Vec<Vec<bool>>,
    pub(crate) v2v: Vec<Vec<VH>>,
    pub(crate) v2e: Vec<Vec<EH>>,
    pub(crate) v2f: Vec<Vec<FH>>,
    pub(crate) v2p: Vec<Vec<PH>>,
    pub(crate) e2f: Vec<Vec<FH>>,
    pub(crate) e2p: Vec<Vec<PH>>,
    pub(crate) f2e: Vec<Vec<EH>>,
    pub(crate) f2p: Vec<Vec<PH>>,
    pub(crate) p2v: Vec<Vec<VH>>,
    pub(crate) p2e: Vec<Vec<EH>>,
    pub(crate) p2p: Vec<Vec<PH>>,
}

impl VolumeTopology {
    /// Empty topology. With a `template`, every cell must have the template's
    /// shape.
    pub fn new(template: Option<CellTemplate>) -> Self {
        VolumeTopology {
            template,
            ..Default::default()
        }
    }

    /// Build the topology from explicit faces and cells.
    ///
    /// Cells are given as indices into `faces`, and `winding[i][j]` tells
    /// whether the `j`-th face of the `i`-th cell, in the vertex order given
    /// in `faces`, is counter-clockwise when seen from outside the cell. Faces
    /// with the same vertex set are merged. A face that repeats the vertex set
    /// of an earlier face must list the same cycle, in either direction,
    /// otherwise it is rejected as degenerate.
    pub fn from_faces<F, P, W>(
        num_verts: usize,
        faces: &[F],
        polys: &[P],
        winding: &[W],
        template: Option<CellTemplate>,
    ) -> Result<Self, Error>
    where
        F: AsRef<[u32]>,
        P: AsRef<[u32]>,
        W: AsRef<[bool]>,
    {
        if polys.len() != winding.len() {
            return Err(Error::MismatchedArrayLengths(polys.len(), winding.len()));
        }
        let mut topol = VolumeTopology::new(template);
        for _ in 0..num_verts {
            topol.push_vert(&mut ());
        }
        // The face each input face was merged into, and whether it was merged
        // with the opposite orientation.
        let mut merged: Vec<(FH, bool)> = Vec::with_capacity(faces.len());
        for (i, face) in faces.iter().enumerate() {
            let raw = face.as_ref();
            if let Some(&v) = raw.iter().find(|&&v| v as usize >= num_verts) {
                return Err(Error::InvalidVertex(v.into()));
            }
            let raw: Vec<VH> = raw.iter().map(|&v| VH::from(v)).collect();
            let verts = clean_cycle(&raw).ok_or(Error::DegenerateFace(i))?;
            let f = topol.face_get_or_insert(verts.clone(), None, &mut ());
            let stored = &topol.faces[f.ui()];
            let reversed = if same_cycle(stored, &verts) {
                false
            } else {
                let rev: Vec<VH> = verts.iter().rev().copied().collect();
                if !same_cycle(stored, &rev) {
                    return Err(Error::DegenerateFace(i));
                }
                true
            };
            merged.push((f, reversed));
        }
        for (i, (cell, wind)) in polys.iter().zip(winding.iter()).enumerate() {
            let (cell, wind) = (cell.as_ref(), wind.as_ref());
            if cell.len() != wind.len() {
                return Err(Error::MismatchedArrayLengths(cell.len(), wind.len()));
            }
            let mut cfaces = Vec::with_capacity(cell.len());
            let mut cwinding = Vec::with_capacity(cell.len());
            for (&fi, &w) in cell.iter().zip(wind.iter()) {
                let &(f, reversed) = merged
                    .get(fi as usize)
                    .ok_or(Error::InvalidFace(fi.into()))?;
                cfaces.push(f);
                cwinding.push(w != reversed);
            }
            topol.check_cell_faces(&cfaces, i)?;
            topol.push_poly(cfaces, cwinding, None, &mut ());
        }
        if let Some(f) = topol.faces().find(|f| topol.f2p[f.ui()].is_empty()) {
            return Err(Error::UnreferencedFace(f));
        }
        topol.check_all_verts_referenced()?;
        log::trace!(
            "Built polyhedral topology with {} vertices, {} faces and {} cells",
            topol.num_verts(),
            topol.num_faces(),
            topol.num_polys()
        );
        Ok(topol)
    }

    /// Build the topology from cells given as vertex lists. The faces of each
    /// cell are created from the template.
    pub fn from_cells<C: AsRef<[u32]>>(
        num_verts: usize,
        cells: &[C],
        template: CellTemplate,
    ) -> Result<Self, Error> {
        let mut topol = VolumeTopology::new(Some(template));
        for _ in 0..num_verts {
            topol.push_vert(&mut ());
        }
        for (i, cell) in cells.iter().enumerate() {
            let verts: Vec<VH> = cell.as_ref().iter().map(|&v| VH::from(v)).collect();
            topol.check_cell_verts(&verts, i, template)?;
            topol.push_cell(&verts, template, None, &mut ());
        }
        topol.check_all_verts_referenced()?;
        log::trace!(
            "Built polyhedral topology with {} vertices and {} cells from a template",
            topol.num_verts(),
            topol.num_polys()
        );
        Ok(topol)
    }

    fn check_all_verts_referenced(&self) -> Result<(), Error> {
        match self.verts().find(|v| self.v2p[v.ui()].is_empty()) {
            Some(v) => Err(Error::UnreferencedVertex(v)),
            None => Ok(()),
        }
    }

    /// `index` is only used for reporting.
    pub(crate) fn check_cell_faces(&self, faces: &[FH], index: usize) -> Result<(), Error> {
        for &f in faces {
            self.check_face(f)?;
        }
        if faces.len() < 4 || has_duplicates(faces) {
            return Err(Error::DegeneratePoly(index));
        }
        match self.template {
            Some((_, tfaces)) if tfaces.len() != faces.len() => Err(Error::ArityMismatch {
                expected: tfaces.len(),
                found: faces.len(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_cell_verts(
        &self,
        verts: &[VH],
        index: usize,
        template: CellTemplate,
    ) -> Result<(), Error> {
        for &v in verts {
            self.check_vert(v)?;
        }
        if verts.len() != template.0 {
            return Err(Error::ArityMismatch {
                expected: template.0,
                found: verts.len(),
            });
        }
        if has_duplicates(verts) {
            return Err(Error::DegeneratePoly(index));
        }
        Ok(())
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

    pub(crate) fn check_face(&self, f: FH) -> Result<(), Error> {
        if f.ui() < self.num_faces() {
            Ok(())
        } else {
            Err(Error::InvalidFace(f))
        }
    }

    pub(crate) fn check_poly(&self, p: PH) -> Result<(), Error> {
        if p.ui() < self.num_polys() {
            Ok(())
        } else {
            Err(Error::InvalidPoly(p))
        }
    }

    /* Mutation primitives, no validation. */

    pub(crate) fn push_vert(&mut self, sync: &mut impl AttribSync) -> VH {
        let v = VH::new(self.v2v.len());
        self.v2v.push(Vec::new());
        self.v2e.push(Vec::new());
        self.v2f.push(Vec::new());
        self.v2p.push(Vec::new());
        sync.push_vert();
        v
    }

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
        self.e2f.push(Vec::new());
        self.e2p.push(Vec::new());
        self.edge_map.insert(key, e);
        self.v2e[a.ui()].push(e);
        self.v2e[b.ui()].push(e);
        self.v2v[a.ui()].push(b);
        self.v2v[b.ui()].push(a);
        sync.push_edge(src);
        e
    }

    /// Returns the existing face with the same vertex set, if there is one.
    /// Otherwise the new face copies the attributes of `src`, if given.
    pub(crate) fn face_get_or_insert(
        &mut self,
        verts: Vec<VH>,
        src: Option<FH>,
        sync: &mut impl AttribSync,
    ) -> FH {
        let key = face_key(&verts);
        if let Some(&f) = self.face_map.get(&key) {
            return f;
        }
        let f = FH::new(self.faces.len());
        let n = verts.len();
        let fedges: Vec<EH> = (0..n)
            .map(|i| self.edge_get_or_insert(verts[i], verts[(i + 1) % n], None, sync))
            .collect();
        for &e in &fedges {
            self.e2f[e.ui()].push(f);
        }
        for &v in &verts {
            self.v2f[v.ui()].push(f);
        }
        self.faces.push(verts);
        self.f2e.push(fedges);
        self.f2p.push(Vec::new());
        self.face_map.insert(key, f);
        sync.push_face(src);
        f
    }

    pub(crate) fn link_poly(&mut self, p: PH) {
        let mut pverts = Vec::new();
        let mut pedges = Vec::new();
        let mut nbrs = Vec::new();
        for &f in &self.polys[p.ui()] {
            for &q in &self.f2p[f.ui()] {
                if q != p {
                    push_unique(&mut nbrs, q);
                }
            }
            self.f2p[f.ui()].push(p);
            for &v in &self.faces[f.ui()] {
                push_unique(&mut pverts, v);
            }
            for &e in &self.f2e[f.ui()] {
                push_unique(&mut pedges, e);
            }
        }
        for &v in &pverts {
            self.v2p[v.ui()].push(p);
        }
        for &e in &pedges {
            self.e2p[e.ui()].push(p);
        }
        for &q in &nbrs {
            push_unique(&mut self.p2p[q.ui()], p);
        }
        self.p2v[p.ui()] = pverts;
        self.p2e[p.ui()] = pedges;
        self.p2p[p.ui()] = nbrs;
    }

    pub(crate) fn unlink_poly(&mut self, p: PH) {
        for &f in &self.polys[p.ui()] {
            remove_item(&mut self.f2p[f.ui()], p);
        }
        for v in std::mem::take(&mut self.p2v[p.ui()]) {
            remove_item(&mut self.v2p[v.ui()], p);
        }
        for e in std::mem::take(&mut self.p2e[p.ui()]) {
            remove_item(&mut self.e2p[e.ui()], p);
        }
        for q in std::mem::take(&mut self.p2p[p.ui()]) {
            remove_item(&mut self.p2p[q.ui()], p);
        }
    }

    pub(crate) fn push_poly(
        &mut self,
        faces: Vec<FH>,
        winding: Vec<bool>,
        src: Option<PH>,
        sync: &mut impl AttribSync,
    ) -> PH {
        let p = PH::new(self.polys.len());
        self.polys.push(faces);
        self.winding.push(winding);
        self.p2v.push(Vec::new());
        self.p2e.push(Vec::new());
        self.p2p.push(Vec::new());
        sync.push_poly(src);
        self.link_poly(p);
        p
    }

    /// Faces and winding of a cell with the given vertices, creating the
    /// faces that don't exist yet.
    pub(crate) fn cell_faces(
        &mut self,
        verts: &[VH],
        template: CellTemplate,
        sync: &mut impl AttribSync,
    ) -> (Vec<FH>, Vec<bool>) {
        let (_, tfaces) = template;
        let mut faces = Vec::with_capacity(tfaces.len());
        let mut winding = Vec::with_capacity(tfaces.len());
        for tface in tfaces {
            let outward: Vec<VH> = tface.iter().map(|&k| verts[k]).collect();
            let f = self.face_get_or_insert(outward.clone(), None, sync);
            winding.push(same_cycle(&self.faces[f.ui()], &outward));
            faces.push(f);
        }
        (faces, winding)
    }

    pub(crate) fn push_cell(
        &mut self,
        verts: &[VH],
        template: CellTemplate,
        src: Option<PH>,
        sync: &mut impl AttribSync,
    ) -> PH {
        let (faces, winding) = self.cell_faces(verts, template, sync);
        self.push_poly(faces, winding, src, sync)
    }

    pub(crate) fn swap_remove_unlinked_poly(&mut self, p: PH, sync: &mut impl AttribSync) {
        let last = PH::new(self.polys.len() - 1);
        self.polys.swap_remove(p.ui());
        self.winding.swap_remove(p.ui());
        self.p2v.swap_remove(p.ui());
        self.p2e.swap_remove(p.ui());
        self.p2p.swap_remove(p.ui());
        sync.swap_remove_poly(p);
        if last == p {
            return;
        }
        for &f in &self.polys[p.ui()] {
            replace_item(&mut self.f2p[f.ui()], last, p);
        }
        for &v in &self.p2v[p.ui()] {
            replace_item(&mut self.v2p[v.ui()], last, p);
        }
        for &e in &self.p2e[p.ui()] {
            replace_item(&mut self.e2p[e.ui()], last, p);
        }
        let nbrs = self.p2p[p.ui()].clone();
        for q in nbrs {
            replace_item(&mut self.p2p[q.ui()], last, p);
        }
    }

    /// Swap-remove a face that no cell uses.
    pub(crate) fn swap_remove_dangling_face(&mut self, f: FH, sync: &mut impl AttribSync) {
        self.face_map.remove(&face_key(&self.faces[f.ui()]));
        for &e in &self.f2e[f.ui()] {
            remove_item(&mut self.e2f[e.ui()], f);
        }
        for &v in &self.faces[f.ui()] {
            remove_item(&mut self.v2f[v.ui()], f);
        }
        let last = FH::new(self.faces.len() - 1);
        self.faces.swap_remove(f.ui());
        self.f2e.swap_remove(f.ui());
        self.f2p.swap_remove(f.ui());
        sync.swap_remove_face(f);
        if last == f {
            return;
        }
        self.face_map.insert(face_key(&self.faces[f.ui()]), f);
        for &e in &self.f2e[f.ui()] {
            replace_item(&mut self.e2f[e.ui()], last, f);
        }
        for &v in &self.faces[f.ui()] {
            replace_item(&mut self.v2f[v.ui()], last, f);
        }
        for &p in &self.f2p[f.ui()] {
            replace_item(&mut self.polys[p.ui()], last, f);
        }
    }

    /// Swap-remove an edge that no face uses.
    pub(crate) fn swap_remove_dangling_edge(&mut self, e: EH, sync: &mut impl AttribSync) {
        let [a, b] = self.edges[e.ui()];
        self.edge_map.remove(&(a, b));
        remove_item(&mut self.v2e[a.ui()], e);
        remove_item(&mut self.v2e[b.ui()], e);
        remove_item(&mut self.v2v[a.ui()], b);
        remove_item(&mut self.v2v[b.ui()], a);
        let last = EH::new(self.edges.len() - 1);
        self.edges.swap_remove(e.ui());
        self.e2f.swap_remove(e.ui());
        self.e2p.swap_remove(e.ui());
        sync.swap_remove_edge(e);
        if last == e {
            return;
        }
        let [a, b] = self.edges[e.ui()];
        self.edge_map.insert((a, b), e);
        replace_item(&mut self.v2e[a.ui()], last, e);
        replace_item(&mut self.v2e[b.ui()], last, e);
        for &f in &self.e2f[e.ui()] {
            replace_item(&mut self.f2e[f.ui()], last, e);
        }
        for &p in &self.e2p[e.ui()] {
            replace_item(&mut self.p2e[p.ui()], last, e);
        }
    }

    /// Swap-remove a vertex that no edge, face or cell uses.
    pub(crate) fn swap_remove_isolated_vert(&mut self, v: VH, sync: &mut impl AttribSync) {
        let last = VH::new(self.v2v.len() - 1);
        self.v2v.swap_remove(v.ui());
        self.v2e.swap_remove(v.ui());
        self.v2f.swap_remove(v.ui());
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
        for &f in &self.v2f[v.ui()] {
            self.face_map.remove(&face_key(&self.faces[f.ui()]));
            replace_item(&mut self.faces[f.ui()], last, v);
            self.face_map.insert(face_key(&self.faces[f.ui()]), f);
        }
        for &p in &self.v2p[v.ui()] {
            replace_item(&mut self.p2v[p.ui()], last, v);
        }
    }

    /* Queries. */

    /// Shape every cell is required to have, if any.
    pub fn template(&self) -> Option<CellTemplate> {
        self.template
    }

    pub fn num_verts(&self) -> usize {
        self.v2v.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
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

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        (0..self.num_faces() as u32).map(FH::from)
    }

    pub fn polys(&self) -> impl Iterator<Item = PH> + use<> {
        (0..self.num_polys() as u32).map(PH::from)
    }

    /// End points of the edge, lower index first.
    pub fn edge_verts(&self, e: EH) -> [VH; 2] {
        self.edges[e.ui()]
    }

    /// Vertices of the face in their stored order.
    pub fn face_verts(&self, f: FH) -> &[VH] {
        &self.faces[f.ui()]
    }

    /// The `i`-th edge joins the `i`-th and the `(i + 1) % n`-th vertex of
    /// the face.
    pub fn face_edges(&self, f: FH) -> &[EH] {
        &self.f2e[f.ui()]
    }

    pub fn poly_faces(&self, p: PH) -> &[FH] {
        &self.polys[p.ui()]
    }

    pub fn poly_winding(&self, p: PH) -> &[bool] {
        &self.winding[p.ui()]
    }

    /// Winding flag of the `i`-th face of the cell.
    pub fn poly_face_winding(&self, p: PH, i: usize) -> bool {
        self.winding[p.ui()][i]
    }

    /// Whether the stored order of face `f` is counter-clockwise seen from
    /// outside the cell. `None` if the face does not bound the cell.
    pub fn poly_face_is_ccw(&self, p: PH, f: FH) -> Option<bool> {
        let i = self.polys[p.ui()].iter().position(|&x| x == f)?;
        Some(self.winding[p.ui()][i])
    }

    /// Vertices of the `i`-th face of the cell, ordered counter-clockwise as
    /// seen from outside the cell.
    pub fn poly_face_verts_outward(&self, p: PH, i: usize) -> Vec<VH> {
        let mut verts = self.faces[self.polys[p.ui()][i].ui()].clone();
        if !self.winding[p.ui()][i] {
            verts.reverse();
        }
        verts
    }

    /// Distinct vertices of the cell.
    pub fn poly_verts(&self, p: PH) -> &[VH] {
        &self.p2v[p.ui()]
    }

    /// Distinct edges of the cell.
    pub fn poly_edges(&self, p: PH) -> &[EH] {
        &self.p2e[p.ui()]
    }

    pub fn adj_v2v(&self, v: VH) -> &[VH] {
        &self.v2v[v.ui()]
    }

    pub fn adj_v2e(&self, v: VH) -> &[EH] {
        &self.v2e[v.ui()]
    }

    pub fn adj_v2f(&self, v: VH) -> &[FH] {
        &self.v2f[v.ui()]
    }

    pub fn adj_v2p(&self, v: VH) -> &[PH] {
        &self.v2p[v.ui()]
    }

    pub fn adj_e2f(&self, e: EH) -> &[FH] {
        &self.e2f[e.ui()]
    }

    pub fn adj_e2p(&self, e: EH) -> &[PH] {
        &self.e2p[e.ui()]
    }

    pub fn adj_f2e(&self, f: FH) -> &[EH] {
        self.face_edges(f)
    }

    pub fn adj_f2p(&self, f: FH) -> &[PH] {
        &self.f2p[f.ui()]
    }

    pub fn adj_p2v(&self, p: PH) -> &[VH] {
        self.poly_verts(p)
    }

    pub fn adj_p2e(&self, p: PH) -> &[EH] {
        self.poly_edges(p)
    }

    pub fn adj_p2f(&self, p: PH) -> &[FH] {
        self.poly_faces(p)
    }

    /// Cells sharing a face with this cell.
    pub fn adj_p2p(&self, p: PH) -> &[PH] {
        &self.p2p[p.ui()]
    }

    pub fn edge_id(&self, a: VH, b: VH) -> Option<EH> {
        self.edge_map.get(&canonical(a, b)).copied()
    }

    /// Find the face with the given set of vertices, in any order.
    pub fn face_id(&self, verts: &[VH]) -> Option<FH> {
        let mut key = face_key(verts);
        key.dedup();
        self.face_map.get(&key).copied()
    }

    /// Classification of the face by the number of cells it bounds.
    pub fn face_class(&self, f: FH) -> EdgeClass {
        EdgeClass::from_count(self.f2p[f.ui()].len())
    }

    pub fn face_is_boundary(&self, f: FH) -> bool {
        self.f2p[f.ui()].len() == 1
    }

    pub fn edge_is_boundary(&self, e: EH) -> bool {
        self.e2f[e.ui()].iter().any(|&f| self.face_is_boundary(f))
    }

    pub fn vert_is_boundary(&self, v: VH) -> bool {
        self.v2f[v.ui()].iter().any(|&f| self.face_is_boundary(f))
    }

    pub fn poly_is_boundary(&self, p: PH) -> bool {
        self.polys[p.ui()].iter().any(|&f| self.face_is_boundary(f))
    }

    pub fn poly_shared_face(&self, p: PH, q: PH) -> Option<FH> {
        self.polys[p.ui()]
            .iter()
            .copied()
            .find(|f| self.polys[q.ui()].contains(f))
    }

    /// Two cells sharing a face must see it from opposite sides.
    pub fn face_winding_is_consistent(&self, f: FH) -> bool {
        match self.f2p[f.ui()].as_slice() {
            [p, q] => self.poly_face_is_ccw(*p, f) != self.poly_face_is_ccw(*q, f),
            cells => cells.len() < 2,
        }
    }

    pub fn boundary_faces(&self) -> impl Iterator<Item = FH> {
        self.faces().filter(|&f| self.face_is_boundary(f))
    }

    /// A closed mesh has no boundary faces.
    pub fn is_closed(&self) -> bool {
        self.f2p.iter().all(|cells| cells.len() >= 2)
    }

    /// The vertices of a tetrahedral cell, ordered so that its faces match
    /// [`TET_FACES`](crate::shape::TET_FACES). `None` if the cell is not a
    /// tetrahedron.
    pub fn tet_verts(&self, p: PH) -> Option<[VH; 4]> {
        let faces = &self.polys[p.ui()];
        if faces.len() != 4 || self.p2v[p.ui()].len() != 4 {
            return None;
        }
        if faces.iter().any(|f| self.faces[f.ui()].len() != 3) {
            return None;
        }
        let outward = self.poly_face_verts_outward(p, 0);
        let apex = self.p2v[p.ui()]
            .iter()
            .copied()
            .find(|v| !outward.contains(v))?;
        // The first template face is (0, 2, 1).
        Some([outward[0], outward[2], outward[1], apex])
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::{VolumeTopology, same_cycle};
    use crate::{
        element::{FH, PH, VH},
        error::Error,
        shape::{HEX_TEMPLATE, TET_TEMPLATE},
        topol::EdgeClass,
    };

    /**
     * Two tetrahedra sharing the face (0, 1, 2). Vertex 3 is above the
     * face and vertex 4 below it.
     */
    pub(crate) fn two_tets() -> VolumeTopology {
        VolumeTopology::from_cells(5, &[[0u32, 1, 2, 3], [0, 2, 1, 4]], TET_TEMPLATE)
            .expect("Cannot build tetrahedra")
    }

    /**
     * Two unit cubes stacked along z, sharing the face (4, 5, 6, 7).
     * ```text
     *       11----------10
     *      /|          /|
     *     8-----------9 |
     *     | 7---------|-6
     *     |/|         |/|
     *     4-----------5 |
     *     | 3---------|-2
     *     |/          |/
     *     0-----------1
     * ```
     */
    pub(crate) fn two_hexes() -> VolumeTopology {
        VolumeTopology::from_cells(
            12,
            &[[0u32, 1, 2, 3, 4, 5, 6, 7], [4, 5, 6, 7, 8, 9, 10, 11]],
            HEX_TEMPLATE,
        )
        .expect("Cannot build hexahedra")
    }

    fn vhs(indices: &[u32]) -> Vec<VH> {
        indices.iter().map(|&i| i.into()).collect()
    }

    #[test]
    fn t_same_cycle() {
        assert!(same_cycle(&vhs(&[0, 1, 2]), &vhs(&[1, 2, 0])));
        assert!(!same_cycle(&vhs(&[0, 1, 2]), &vhs(&[0, 2, 1])));
        assert!(!same_cycle(&vhs(&[0, 1, 2]), &vhs(&[0, 1, 2, 3])));
    }

    #[test]
    fn t_single_tet() {
        let topol = VolumeTopology::from_cells(4, &[[0u32, 1, 2, 3]], TET_TEMPLATE)
            .expect("Cannot build tetrahedron");
        assert_eq!(topol.num_verts(), 4);
        assert_eq!(topol.num_edges(), 6);
        assert_eq!(topol.num_faces(), 4);
        assert_eq!(topol.num_polys(), 1);
        assert!(topol.faces().all(|f| topol.face_is_boundary(f)));
        assert!(topol.poly_winding(0.into()).iter().all(|&w| w));
        assert_eq!(topol.poly_verts(0.into()).len(), 4);
        assert_eq!(topol.poly_edges(0.into()).len(), 6);
        assert_eq!(
            topol.tet_verts(0.into()),
            Some([0u32, 1, 2, 3].map(VH::from))
        );
        for e in topol.edges() {
            assert_eq!(topol.adj_e2f(e).len(), 2);
            assert!(topol.edge_is_boundary(e));
        }
        assert!(!topol.is_closed());
    }

    #[test]
    fn t_two_tets_share_face() {
        let topol = two_tets();
        assert_eq!(topol.num_faces(), 7);
        assert_eq!(topol.num_edges(), 9);
        let f = topol
            .face_id(&vhs(&[2, 1, 0]))
            .expect("Cannot find shared face");
        assert_eq!(topol.face_class(f), EdgeClass::Interior);
        assert_eq!(topol.adj_f2p(f), &[PH::from(0u32), PH::from(1u32)]);
        assert_eq!(topol.poly_shared_face(0.into(), 1.into()), Some(f));
        assert_eq!(topol.poly_face_is_ccw(0.into(), f), Some(true));
        assert_eq!(topol.poly_face_is_ccw(1.into(), f), Some(false));
        assert!(topol.face_winding_is_consistent(f));
        assert_eq!(topol.adj_p2p(0.into()), &[PH::from(1u32)]);
        assert_eq!(topol.boundary_faces().count(), 6);
        assert!(topol.verts().all(|v| topol.vert_is_boundary(v)));
        // The same cell, starting from the outward loop of the shared face.
        assert_eq!(
            topol.tet_verts(1.into()),
            Some([1u32, 0, 2, 4].map(VH::from))
        );
        // The outward loop of the shared face, as seen from the second cell.
        let i = topol
            .poly_faces(1.into())
            .iter()
            .position(|&x| x == f)
            .expect("Shared face missing");
        let outward = topol.poly_face_verts_outward(1.into(), i);
        assert!(same_cycle(&outward, &vhs(&[0, 1, 2])));
    }

    #[test]
    fn t_two_hexes() {
        let topol = two_hexes();
        assert_eq!(topol.num_verts(), 12);
        assert_eq!(topol.num_faces(), 11);
        assert_eq!(topol.num_edges(), 20);
        assert_eq!(topol.num_polys(), 2);
        assert_eq!(topol.boundary_faces().count(), 10);
        assert!(topol.faces().all(|f| topol.face_winding_is_consistent(f)));
        assert_eq!(topol.poly_verts(1.into()).len(), 8);
        assert_eq!(topol.poly_edges(1.into()).len(), 12);
        assert_eq!(topol.adj_v2p(5.into()).len(), 2);
        assert_eq!(topol.adj_v2p(1.into()).len(), 1);
    }

    #[test]
    fn t_from_faces_merges_duplicates() {
        // A tetrahedron where one face is given twice, the second time
        // reversed, and referenced through the reversed copy.
        let faces = [
            vec![0u32, 2, 1],
            vec![0, 1, 3],
            vec![0, 3, 2],
            vec![1, 2, 3],
            vec![3, 2, 1],
        ];
        let topol = VolumeTopology::from_faces(
            4,
            &faces[..4],
            &[[0u32, 1, 2, 3]],
            &[[true, true, true, true]],
            None,
        )
        .expect("Cannot build tetrahedron");
        assert_eq!(topol.num_faces(), 4);
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1, 2, 4]], &[[true, true, true, false]], None)
                .expect("Cannot build tetrahedron")
                .poly_winding(0.into()),
            &[true, true, true, true]
        );
    }

    #[test]
    fn t_from_faces_rejects_tangled_duplicate() {
        // Same vertex set, but [0, 2, 1, 3] is neither a rotation nor a
        // reversal of [0, 1, 2, 3].
        let faces = [[0u32, 1, 2, 3], [0, 2, 1, 3]];
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1]], &[[true, false]], None)
                .unwrap_err(),
            Error::DegenerateFace(1)
        );
        // A reversed copy is still merged.
        let faces = [[0u32, 1, 2, 3], [1, 0, 3, 2]];
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1]], &[[true, false]], None)
                .unwrap_err(),
            Error::DegeneratePoly(0)
        );
    }

    #[test]
    fn t_build_errors() {
        let faces = [[0u32, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1, 2]], &[[true; 3]], None).unwrap_err(),
            Error::DegeneratePoly(0)
        );
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1, 2, 2]], &[[true; 4]], None)
                .unwrap_err(),
            Error::DegeneratePoly(0)
        );
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1, 2, 7]], &[[true; 4]], None)
                .unwrap_err(),
            Error::InvalidFace(7.into())
        );
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[vec![0u32, 1, 2, 3]], &[vec![true; 3]], None)
                .unwrap_err(),
            Error::MismatchedArrayLengths(4, 3)
        );
        assert_eq!(
            VolumeTopology::from_faces(
                5,
                &[vec![0u32, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3], vec![0, 1, 4]],
                &[[0u32, 1, 2, 3]],
                &[[true; 4]],
                None
            )
            .unwrap_err(),
            Error::UnreferencedFace(4.into())
        );
        assert_eq!(
            VolumeTopology::from_faces(4, &[[0u32, 0, 1]], &[[0u32]], &[[true]], None).unwrap_err(),
            Error::DegenerateFace(0)
        );
        assert_eq!(
            VolumeTopology::from_cells(5, &[[0u32, 1, 2, 3]], TET_TEMPLATE).unwrap_err(),
            Error::UnreferencedVertex(4.into())
        );
        assert_eq!(
            VolumeTopology::from_cells(4, &[[0u32, 1, 2]], TET_TEMPLATE).unwrap_err(),
            Error::ArityMismatch {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(
            VolumeTopology::from_cells(4, &[[0u32, 1, 2, 2]], TET_TEMPLATE).unwrap_err(),
            Error::DegeneratePoly(0)
        );
        assert_eq!(
            VolumeTopology::from_faces(4, &faces, &[[0u32, 1, 2, 3]], &[[true; 4]], Some(HEX_TEMPLATE))
                .unwrap_err(),
            Error::ArityMismatch {
                expected: 6,
                found: 4
            }
        );
        assert_eq!(
            VolumeTopology::from_cells(4, &[[0u32, 1, 2, 9]], TET_TEMPLATE).unwrap_err(),
            Error::InvalidVertex(9.into())
        );
    }

    #[test]
    fn t_face_id() {
        let topol = two_hexes();
        let f = topol
            .face_id(&vhs(&[7, 6, 5, 4]))
            .expect("Cannot find face");
        assert_eq!(topol.adj_f2p(f).len(), 2);
        assert!(topol.face_id(&vhs(&[0, 1, 2])).is_none());
        assert_eq!(topol.adj_f2e(f).len(), 4);
        assert_eq!(topol.face_edges(f), topol.adj_f2e(f));
        assert_eq!(FH::from(0u32), topol.face_id(topol.face_verts(0.into())).expect("Missing face"));
    }
}
