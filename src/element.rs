use crate::{
    adaptor::Adaptor,
    mesh::PolygonMeshT,
    shape::PolyShape,
    topol::{EdgeClass, PolyTopology},
    volume::VolumeTopology,
};
use std::fmt::{Debug, Display};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl Handle for $name {
            fn index(&self) -> u32 {
                self.idx
            }
        }

        impl From<u32> for $name {
            fn from(idx: u32) -> Self {
                $name { idx }
            }
        }

        impl From<&u32> for $name {
            fn from(idx: &u32) -> Self {
                $name { idx: *idx }
            }
        }

        impl $name {
            pub(crate) fn new(idx: usize) -> Self {
                $name { idx: idx as u32 }
            }

            pub(crate) fn ui(self) -> usize {
                self.idx as usize
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $tag, self.idx)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $tag, self.idx)
            }
        }
    };
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VH {
    idx: u32,
}

/**
 * Edge handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EH {
    idx: u32,
}

/**
 * Face handle. Faces only exist in volumetric meshes, where they bound the
 * polyhedral cells.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FH {
    idx: u32,
}

/**
 * Poly handle. A poly is a polygon in a surface mesh, and a polyhedral cell in
 * a volumetric mesh.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PH {
    idx: u32,
}

impl_handle!(VH, "VH");
impl_handle!(EH, "EH");
impl_handle!(FH, "FH");
impl_handle!(PH, "PH");

/// Anything that owns a polygon mesh topology.
pub trait HasTopology {
    fn topology(&self) -> &PolyTopology;
}

impl HasTopology for PolyTopology {
    fn topology(&self) -> &PolyTopology {
        self
    }
}

impl<A, S> HasTopology for PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    fn topology(&self) -> &PolyTopology {
        self.topol()
    }
}

impl VH {
    /// Check if this vertex is valid for the `mesh`.
    ///
    /// The index has to be less than the number of vertices in the mesh.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        self.ui() < mesh.topology().num_verts()
    }

    /// Check if this vertex is manifold.
    ///
    /// A vertex is manifold if the polys around it form a single fan, that is
    /// either closed or bounded by exactly two boundary edges.
    /// ```text
    ///    .......|     .......|.......     ....\     /...
    ///    .......|     .......|.......     .....\   /....
    ///    .......|     .......|.......     ......\ /.....
    ///    -------v     -------v-------     -------v------
    ///    .......|     .......|.......     ....../ \.....
    ///    .......|     .......|.......     ...../   \....
    ///    .......|     .......|.......     ..../     \...
    ///    Manifold     Manifold            Not manifold
    /// ```
    pub fn is_manifold(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().vert_is_manifold(self)
    }

    /// Check if this vertex is on the boundary of the `mesh`.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().vert_is_boundary(self)
    }

    /// The number of edges incident on this vertex.
    pub fn valence(self, mesh: &impl HasTopology) -> usize {
        mesh.topology().vert_valence(self)
    }
}

impl EH {
    /// The two end points of this edge, lower index first.
    pub fn verts(self, mesh: &impl HasTopology) -> [VH; 2] {
        mesh.topology().edge_verts(self)
    }

    /// Check if this edge is valid for the `mesh`.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        self.ui() < mesh.topology().num_edges()
    }

    /// Check if the edge is a boundary edge, i.e. it has exactly one incident poly.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().edge_class(self) == EdgeClass::Boundary
    }

    pub fn class(self, mesh: &impl HasTopology) -> EdgeClass {
        mesh.topology().edge_class(self)
    }
}

impl PH {
    /// The vertices of this poly in their stored winding order.
    pub fn verts(self, mesh: &impl HasTopology) -> &[VH] {
        mesh.topology().poly_verts(self)
    }

    /// Check if this poly is valid for the `mesh`.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        self.ui() < mesh.topology().num_polys()
    }

    /// Number of vertices of this poly.
    pub fn arity(self, mesh: &impl HasTopology) -> usize {
        mesh.topology().poly_arity(self)
    }
}

impl FH {
    /// Check if this face is valid for the volumetric topology `topol`.
    pub fn is_valid(self, topol: &VolumeTopology) -> bool {
        self.ui() < topol.num_faces()
    }
}
