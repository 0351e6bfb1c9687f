/*!
An adjacency based mesh kernel for polygon and polyhedral meshes, with local
topological edits.

# Overview

+ Elements are identified by dense `u32` handles: [`VH`], [`EH`], [`FH`] and
  [`PH`]. Removing an element moves the last element of the same kind into the
  freed slot, so handles stay dense and a removal invalidates exactly one
  other handle.

+ [`PolyTopology`] stores the polys of a surface mesh as vertex loops, along
  with deduplicated edges and cached adjacency tables (vertex to vertex, vertex
  to edge, vertex to poly, edge to poly, poly to edge and poly to poly).
  [`VolumeTopology`] does the same for polyhedral meshes, with an extra layer
  of faces shared between cells.

+ The mesh types [`PolygonMeshT<A, S>`] and [`PolyhedralMeshT<A, S>`] own a
  topology, the vertex positions and per-element attributes. They are generic
  over an [`Adaptor`] that describes the geometric types, and over a shape
  policy: [`Triangles`], [`Quads`] or [`Polygons`] for surfaces, and
  [`Tetrahedra`], [`Hexahedra`] or [`Polyhedra`] for volumes.

+ Local edits (edge split, edge collapse, edge flip, poly add and remove, and
  more) check all their preconditions before touching anything. An edit that
  returns an [`Error`] leaves the mesh exactly as it was.

+ With the `use_glam` feature (on by default) the [`use_glam`] module provides
  adaptors backed by [`glam`](https://crates.io/crates/glam) and ready to use
  mesh types such as [`TrimeshF64`](use_glam::TrimeshF64) and
  [`TetmeshF64`](use_glam::TetmeshF64).

+ The `check-invariants` feature makes every edit on the mesh types verify the
  whole topology afterwards, and panic if it is corrupt.

Diagnostics go through the [`log`](https://crates.io/crates/log) facade.
*/

mod adaptor;
mod attrib;
mod check;
mod edit;
mod element;
mod error;
mod macros;
mod math;
mod mesh;
mod primitive;
mod shape;
mod status;
mod topol;
mod volmesh;
mod volume;

#[cfg(feature = "use_glam")]
pub mod use_glam;

pub use adaptor::{
    Adaptor, CrossProductAdaptor, DotProductAdaptor, FloatScalarAdaptor, VectorAngleAdaptor,
    VectorLengthAdaptor, VectorNormalizeAdaptor,
};
pub use attrib::{AttribSync, Color, EdgeAttr, FaceAttr, PolyAttr, VertexAttr, WHITE};
pub use element::{EH, FH, Handle, HasTopology, PH, VH};
pub use error::Error;
pub use mesh::PolygonMeshT;
pub use shape::{
    CellShape, CellTemplate, HEX_FACES, HEX_TEMPLATE, Hexahedra, PolyShape, Polygons, Polyhedra,
    Quads, TET_FACES, TET_TEMPLATE, Tetrahedra, Triangles,
};
pub use status::Status;
pub use topol::{EdgeClass, PolyTopology};
pub use volmesh::PolyhedralMeshT;
pub use volume::VolumeTopology;

mod assert_impls {
    use super::*;
    use static_assertions::{assert_eq_size, assert_impl_all};

    assert_eq_size!(VH, u32);
    assert_eq_size!(EH, u32);
    assert_eq_size!(FH, u32);
    assert_eq_size!(PH, u32);

    // Meshes are plain owned data and can be shared between threads.
    assert_impl_all!(PolyTopology: Send, Sync, Clone);
    assert_impl_all!(VolumeTopology: Send, Sync, Clone);
    assert_impl_all!(Error: Send, Sync, std::error::Error);

    #[cfg(feature = "use_glam")]
    assert_impl_all!(use_glam::TrimeshF64: Send, Sync, Clone);
    #[cfg(feature = "use_glam")]
    assert_impl_all!(use_glam::PolyhedralmeshF32: Send, Sync, Clone);
}
