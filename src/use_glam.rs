/*!
This is an optional module that is enabled by the `use_glam` feature. It
provides adaptors and mesh types that can be used out of the box, that use
[`glam`](https://docs.rs/glam/latest/glam/) to represent the geometry.
*/

use crate::{
    adaptor::{
        Adaptor, CrossProductAdaptor, DotProductAdaptor, FloatScalarAdaptor, VectorAngleAdaptor,
        VectorLengthAdaptor, VectorNormalizeAdaptor,
    },
    mesh::PolygonMeshT,
    shape::{Hexahedra, Polygons, Polyhedra, Quads, Tetrahedra, Triangles},
    volmesh::PolyhedralMeshT,
};

// Both adaptors wrap a glam vector type with the same method names, so the
// impls only differ in the types.
macro_rules! glam_adaptor {
    ($name:ident, $vec:ty, $scalar:ty) => {
        impl Adaptor for $name {
            type Vector = $vec;
            type Scalar = $scalar;

            fn vector(coords: [$scalar; 3]) -> $vec {
                <$vec>::from_array(coords)
            }

            fn zero_vector() -> $vec {
                <$vec>::ZERO
            }

            fn vector_coord(v: &$vec, i: usize) -> $scalar {
                v[i]
            }
        }

        impl VectorLengthAdaptor for $name {
            fn vector_length(v: $vec) -> $scalar {
                v.length()
            }
        }

        impl VectorNormalizeAdaptor for $name {
            fn normalized_vec(v: $vec) -> $vec {
                v.normalize_or_zero()
            }
        }

        impl DotProductAdaptor for $name {
            fn dot_product(a: $vec, b: $vec) -> $scalar {
                a.dot(b)
            }
        }

        impl VectorAngleAdaptor for $name {
            fn vector_angle(a: $vec, b: $vec) -> $scalar {
                a.angle_between(b)
            }
        }

        impl CrossProductAdaptor for $name {
            fn cross_product(a: $vec, b: $vec) -> $vec {
                a.cross(b)
            }
        }

        impl FloatScalarAdaptor for $name {
            fn scalarf32(val: f32) -> $scalar {
                val as $scalar
            }

            fn scalarf64(val: f64) -> $scalar {
                val as $scalar
            }

            fn to_f64(val: $scalar) -> f64 {
                val as f64
            }
        }
    };
}

/// Built-in adaptor for meshes that use 32-bit floating point numbers to
/// represent the geometry of the mesh.
pub struct BuiltInAdaptorF32 {}

/// Built-in adaptor for meshes that use 64-bit floating point numbers to
/// represent the geometry of the mesh.
pub struct BuiltInAdaptorF64 {}

glam_adaptor!(BuiltInAdaptorF32, glam::Vec3, f32);
glam_adaptor!(BuiltInAdaptorF64, glam::DVec3, f64);

pub type TrimeshF32 = PolygonMeshT<BuiltInAdaptorF32, Triangles>;
pub type QuadmeshF32 = PolygonMeshT<BuiltInAdaptorF32, Quads>;
pub type PolygonmeshF32 = PolygonMeshT<BuiltInAdaptorF32, Polygons>;
pub type TetmeshF32 = PolyhedralMeshT<BuiltInAdaptorF32, Tetrahedra>;
pub type HexmeshF32 = PolyhedralMeshT<BuiltInAdaptorF32, Hexahedra>;
pub type PolyhedralmeshF32 = PolyhedralMeshT<BuiltInAdaptorF32, Polyhedra>;

pub type TrimeshF64 = PolygonMeshT<BuiltInAdaptorF64, Triangles>;
pub type QuadmeshF64 = PolygonMeshT<BuiltInAdaptorF64, Quads>;
pub type PolygonmeshF64 = PolygonMeshT<BuiltInAdaptorF64, Polygons>;
pub type TetmeshF64 = PolyhedralMeshT<BuiltInAdaptorF64, Tetrahedra>;
pub type HexmeshF64 = PolyhedralMeshT<BuiltInAdaptorF64, Hexahedra>;
pub type PolyhedralmeshF64 = PolyhedralMeshT<BuiltInAdaptorF64, Polyhedra>;
