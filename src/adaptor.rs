/*!
Geometric primitives are not owned by this crate. Meshes are generic over an
[`Adaptor`] that tells the kernel how to build and read the vector and scalar
types of the client's choice. The topology never looks at geometry, so the
base adaptor is all that is needed to build and edit meshes. The ancillary
adaptors unlock the geometric measurements in the [`math`](crate::math)
module.
*/

use std::fmt::Debug;

/// Basic adaptor for 3D geometry.
pub trait Adaptor {
    type Vector: Default + Clone + Copy + Debug;
    type Scalar: Default + Clone + Copy + PartialOrd + Debug;

    /// Create a vector from its coordinates.
    fn vector(coords: [Self::Scalar; 3]) -> Self::Vector;

    fn zero_vector() -> Self::Vector;

    /// Get the `i`-th coordinate of `v`.
    fn vector_coord(v: &Self::Vector, i: usize) -> Self::Scalar;
}

/// Adaptor for computing the length of vectors.
pub trait VectorLengthAdaptor: Adaptor {
    fn vector_length(v: Self::Vector) -> Self::Scalar;
}

/// Adaptor for normalizing vectors.
pub trait VectorNormalizeAdaptor: Adaptor {
    fn normalized_vec(v: Self::Vector) -> Self::Vector;
}

/// Adaptor for computing dot products of vectors.
pub trait DotProductAdaptor: Adaptor {
    fn dot_product(a: Self::Vector, b: Self::Vector) -> Self::Scalar;
}

/// Adaptor for computing the unsigned angle between two vectors.
pub trait VectorAngleAdaptor: Adaptor {
    fn vector_angle(a: Self::Vector, b: Self::Vector) -> Self::Scalar;
}

/// Adaptor for computing cross products of vectors.
pub trait CrossProductAdaptor: Adaptor {
    fn cross_product(a: Self::Vector, b: Self::Vector) -> Self::Vector;
}

/// Adaptor for converting to and from floating point scalars.
///
/// The edit operators need this to interpolate vertex positions along an
/// edge.
pub trait FloatScalarAdaptor: Adaptor {
    fn scalarf32(val: f32) -> Self::Scalar;

    fn scalarf64(val: f64) -> Self::Scalar;

    fn to_f64(val: Self::Scalar) -> f64;
}

/// Linear interpolation between `a` and `b` using only the base adaptors.
pub(crate) fn lerp<A>(a: A::Vector, b: A::Vector, t: f64) -> A::Vector
where
    A: FloatScalarAdaptor,
{
    A::vector(std::array::from_fn(|i| {
        let ca = A::to_f64(A::vector_coord(&a, i));
        let cb = A::to_f64(A::vector_coord(&b, i));
        A::scalarf64(ca + (cb - ca) * t)
    }))
}

/// Average of the given points. Returns the zero vector for an empty input.
pub(crate) fn average<A>(points: impl Iterator<Item = A::Vector>) -> A::Vector
where
    A: FloatScalarAdaptor,
{
    let (count, sum) = points.fold((0usize, [0f64; 3]), |(count, mut sum), p| {
        for (i, s) in sum.iter_mut().enumerate() {
            *s += A::to_f64(A::vector_coord(&p, i));
        }
        (count + 1, sum)
    });
    if count == 0 {
        return A::zero_vector();
    }
    A::vector(sum.map(|s| A::scalarf64(s / count as f64)))
}
