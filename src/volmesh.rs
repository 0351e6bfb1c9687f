use std::marker::PhantomData;

use crate::{
    adaptor::Adaptor,
    attrib::{Attribs, EdgeAttr, FaceAttr, PolyAttr, VertexAttr},
    element::{EH, FH, PH, VH},
    error::Error,
    shape::{CellShape, Polyhedra},
    volume::VolumeTopology,
};

/// A polyhedral mesh: topology, vertex positions and per-element attributes.
///
/// The shape policy `S` decides whether cells can be created from a plain
/// vertex list. [`Tetrahedra`](crate::shape::Tetrahedra) and
/// [`Hexahedra`](crate::shape::Hexahedra) provide a face template, while
/// [`Polyhedra`] cells must be assembled from explicit faces.
pub struct PolyhedralMeshT<A, S = Polyhedra>
where
    A: Adaptor,
    S: CellShape,
{
    pub(crate) topol: VolumeTopology,
    pub(crate) attribs: Attribs<A>,
    shape: PhantomData<S>,
}

impl<A, S> Clone for PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    fn clone(&self) -> Self {
        PolyhedralMeshT {
            topol: self.topol.clone(),
            attribs: self.attribs.clone(),
            shape: PhantomData,
        }
    }
}

impl<A, S> Default for PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    pub fn new() -> Self {
        PolyhedralMeshT {
            topol: VolumeTopology::new(S::TEMPLATE),
            attribs: Attribs::new(Vec::new(), 0, 0, 0),
            shape: PhantomData,
        }
    }

    fn with_topology(points: Vec<A::Vector>, topol: VolumeTopology) -> Self {
        let attribs = Attribs::new(
            points,
            topol.num_edges(),
            topol.num_faces(),
            topol.num_polys(),
        );
        PolyhedralMeshT {
            topol,
            attribs,
            shape: PhantomData,
        }
    }

    /// Create a mesh from vertex positions and cells given as vertex lists.
    /// Only available for shapes with a cell template.
    pub fn from_cells<C: AsRef<[u32]>>(points: Vec<A::Vector>, cells: &[C]) -> Result<Self, Error> {
        let template = S::TEMPLATE.ok_or(Error::NoCellTemplate)?;
        let topol = VolumeTopology::from_cells(points.len(), cells, template)?;
        Ok(Self::with_topology(points, topol))
    }

    /// Create a mesh from vertex positions, faces, and cells given as lists of
    /// faces. See [`VolumeTopology::from_faces`].
    pub fn from_faces<F, P, W>(
        points: Vec<A::Vector>,
        faces: &[F],
        polys: &[P],
        winding: &[W],
    ) -> Result<Self, Error>
    where
        F: AsRef<[u32]>,
        P: AsRef<[u32]>,
        W: AsRef<[bool]>,
    {
        let topol = VolumeTopology::from_faces(points.len(), faces, polys, winding, S::TEMPLATE)?;
        Ok(Self::with_topology(points, topol))
    }

    /// Read only access to the topology.
    pub fn topol(&self) -> &VolumeTopology {
        &self.topol
    }

    pub fn num_verts(&self) -> usize {
        self.topol.num_verts()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
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

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<A, S> {
        self.topol.faces()
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

    pub fn face_attr(&self, f: FH) -> &FaceAttr<A::Vector> {
        &self.attribs.faces[f.ui()]
    }

    pub fn face_attr_mut(&mut self, f: FH) -> &mut FaceAttr<A::Vector> {
        &mut self.attribs.faces[f.ui()]
    }

    pub fn poly_attr(&self, p: PH) -> &PolyAttr<A::Vector> {
        &self.attribs.polys[p.ui()]
    }

    pub fn poly_attr_mut(&mut self, p: PH) -> &mut PolyAttr<A::Vector> {
        &mut self.attribs.polys[p.ui()]
    }

    pub(crate) fn apply_edit<T>(
        &mut self,
        what: &str,
        edit: impl FnOnce(&mut VolumeTopology, &mut Attribs<A>) -> Result<T, Error>,
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
