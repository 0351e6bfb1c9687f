use crate::element::{EH, FH, PH, VH};
use thiserror::Error;

/// Every fallible operation in this crate reports one of these.
///
/// Edit operators validate all their preconditions before mutating
/// anything. When an edit returns an error, the mesh is left exactly as it
/// was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Bounds.
    #[error("vertex {0} is out of bounds")]
    InvalidVertex(VH),
    #[error("edge {0} is out of bounds")]
    InvalidEdge(EH),
    #[error("face {0} is out of bounds")]
    InvalidFace(FH),
    #[error("poly {0} is out of bounds")]
    InvalidPoly(PH),
    // Input.
    #[error("poly #{0} is degenerate, it has too few distinct vertices or faces")]
    DegeneratePoly(usize),
    #[error("face #{0} has fewer than 3 distinct vertices or repeats a vertex")]
    DegenerateFace(usize),
    #[error("vertex {0} is not referenced by any poly")]
    UnreferencedVertex(VH),
    #[error("face {0} is not referenced by any poly")]
    UnreferencedFace(FH),
    #[error("expected {expected} vertices per element, found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("mismatched array lengths: {0} and {1}")]
    MismatchedArrayLengths(usize, usize),
    #[error("cells of this mesh have no fixed shape and must be built from faces")]
    NoCellTemplate,
    // Unsafe edits.
    #[error("edge {0} is non-manifold")]
    NonManifoldEdge(EH),
    #[error("edge {0} is not shared by exactly two polys")]
    NotInteriorEdge(EH),
    #[error("poly {0} is not a triangle")]
    NotATriangle(PH),
    #[error("poly {0} is not a tetrahedron")]
    NotATetrahedron(PH),
    #[error("an edge between {0} and {1} already exists")]
    DuplicateEdge(VH, VH),
    #[error("flipping edge {0} would produce a degenerate edge")]
    DegenerateFlip(EH),
    #[error("collapsing edge {0} violates the link condition")]
    LinkCondition(EH),
    #[error("collapsing edge {0} would leave the mesh topologically inconsistent")]
    UnsafeCollapse(EH),
    // Invariant violations found by the checker.
    #[error("edge {0} is corrupt")]
    CorruptEdge(EH),
    #[error("adjacency of vertex {0} is corrupt")]
    CorruptVertex(VH),
    #[error("adjacency of face {0} is corrupt")]
    CorruptFace(FH),
    #[error("adjacency of poly {0} is corrupt")]
    CorruptPoly(PH),
    #[error("winding of face {1} in poly {0} is inconsistent")]
    CorruptWinding(PH, FH),
}
