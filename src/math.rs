/*!
Geometric measurements.

The topology never looks at vertex positions, so everything in this module is
computed on demand from the positions stored in the mesh. Each group of
measurements is available as soon as the adaptor of the mesh implements the
ancillary adaptor traits it needs.
*/

use crate::{
    adaptor::{
        Adaptor, CrossProductAdaptor, DotProductAdaptor, FloatScalarAdaptor, VectorAngleAdaptor,
        VectorLengthAdaptor, VectorNormalizeAdaptor, average, lerp,
    },
    element::{EH, FH, PH, VH},
    mesh::PolygonMeshT,
    shape::{CellShape, PolyShape},
    volmesh::PolyhedralMeshT,
};
use std::ops::{Add, Mul, Sub};

/// Newell's method. For a planar polygon the length of the returned vector is
/// twice the area of the polygon.
fn newell_vector<A>(points: &[A::Vector], verts: &[VH]) -> A::Vector
where
    A: FloatScalarAdaptor,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    let n = verts.len();
    if n < 3 {
        return A::zero_vector();
    }
    let zero = A::scalarf64(0.0);
    let [x, y, z] = (0..n).fold([zero; 3], |[x, y, z], i| {
        let pc = points[verts[i].ui()];
        let pn = points[verts[(i + 1) % n].ui()];
        let (a, b) = (pc - pn, pc + pn);
        [
            x + A::vector_coord(&a, 1) * A::vector_coord(&b, 2),
            y + A::vector_coord(&a, 2) * A::vector_coord(&b, 0),
            z + A::vector_coord(&a, 0) * A::vector_coord(&b, 1),
        ]
    });
    A::vector([x, y, z])
}

/// Area of the polygon as half the length of its Newell vector. Exact for
/// planar polygons of any shape, convex or not. For a non-planar polygon this
/// is the area of its projection onto the plane of the Newell normal.
fn vector_area<A>(points: &[A::Vector], verts: &[VH]) -> A::Scalar
where
    A: VectorLengthAdaptor + FloatScalarAdaptor,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    A::vector_length(newell_vector::<A>(points, verts)) * A::scalarf64(0.5)
}

fn bounds<A: Adaptor>(points: &[A::Vector]) -> Option<(A::Vector, A::Vector)> {
    let (first, rest) = points.split_first()?;
    let mut lo: [A::Scalar; 3] = std::array::from_fn(|i| A::vector_coord(first, i));
    let mut hi = lo;
    for p in rest {
        for i in 0..3 {
            let c = A::vector_coord(p, i);
            if c < lo[i] {
                lo[i] = c;
            }
            if c > hi[i] {
                hi[i] = c;
            }
        }
    }
    Some((A::vector(lo), A::vector(hi)))
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
    A::Vector: Sub<Output = A::Vector>,
{
    /// Vector from the first vertex of the edge to the second.
    pub fn edge_vector(&self, e: EH) -> A::Vector {
        let [a, b] = self.topol.edge_verts(e);
        self.point(b) - self.point(a)
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: VectorLengthAdaptor,
    S: PolyShape,
    A::Vector: Sub<Output = A::Vector>,
{
    pub fn edge_length(&self, e: EH) -> A::Scalar {
        A::vector_length(self.edge_vector(e))
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    /// Smallest axis aligned box containing all vertices, as the min and max
    /// corners. `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(A::Vector, A::Vector)> {
        bounds::<A>(self.points())
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: PolyShape,
{
    /// Point at parameter `t` along the edge, measured from its first vertex.
    pub fn edge_sample(&self, e: EH, t: f64) -> A::Vector {
        let [a, b] = self.topol.edge_verts(e);
        lerp::<A>(self.point(a), self.point(b), t)
    }

    /// Average of the vertices of the poly.
    pub fn poly_centroid(&self, p: PH) -> A::Vector {
        average::<A>(self.topol.poly_verts(p).iter().map(|&v| self.point(v)))
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: VectorNormalizeAdaptor + FloatScalarAdaptor,
    S: PolyShape,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    /// Unit normal of the poly using Newell's method, which is robust for
    /// non-planar and non-convex polygons.
    pub fn poly_normal(&self, p: PH) -> A::Vector {
        A::normalized_vec(newell_vector::<A>(self.points(), self.topol.poly_verts(p)))
    }

    /// Unit vertex normal. Normals of the incident polys are weighted by
    /// their areas. An isolated vertex gets the zero vector.
    pub fn vert_normal(&self, v: VH) -> A::Vector {
        A::normalized_vec(
            self.topol
                .adj_v2p(v)
                .iter()
                .fold(A::zero_vector(), |total, &p| {
                    // Not normalized, so larger polys count more.
                    total + newell_vector::<A>(self.points(), self.topol.poly_verts(p))
                }),
        )
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: VectorLengthAdaptor + FloatScalarAdaptor,
    S: PolyShape,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    /// Area of the poly. A non-planar poly is measured by its projection
    /// along its Newell normal.
    pub fn poly_area(&self, p: PH) -> A::Scalar {
        vector_area::<A>(self.points(), self.topol.poly_verts(p))
    }

    pub fn total_area(&self) -> A::Scalar {
        self.polys()
            .fold(A::scalarf64(0.0), |total, p| total + self.poly_area(p))
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: VectorAngleAdaptor,
    S: PolyShape,
    A::Vector: Sub<Output = A::Vector>,
{
    /// Angle between the two sides of the poly that meet at vertex `v`, in
    /// `[0, pi]`. `None` if `v` is not a vertex of the poly.
    pub fn corner_angle(&self, p: PH, v: VH) -> Option<A::Scalar> {
        let verts = self.topol.poly_verts(p);
        let i = verts.iter().position(|&x| x == v)?;
        let n = verts.len();
        let prev = verts[(i + n - 1) % n];
        let next = verts[(i + 1) % n];
        let pos = self.point(v);
        Some(A::vector_angle(self.point(prev) - pos, self.point(next) - pos))
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: VectorAngleAdaptor + VectorNormalizeAdaptor + FloatScalarAdaptor,
    S: PolyShape,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    /// Angle between the normals of the two polys sharing an edge. This is
    /// zero when the polys are coplanar. `None` unless exactly two polys
    /// share the edge.
    pub fn dihedral_angle(&self, e: EH) -> Option<A::Scalar> {
        match self.topol.adj_e2p(e) {
            &[p, q] => Some(A::vector_angle(self.poly_normal(p), self.poly_normal(q))),
            _ => None,
        }
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: Adaptor,
    S: CellShape,
{
    pub fn bounding_box(&self) -> Option<(A::Vector, A::Vector)> {
        bounds::<A>(self.points())
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: VectorLengthAdaptor,
    S: CellShape,
    A::Vector: Sub<Output = A::Vector>,
{
    pub fn edge_length(&self, e: EH) -> A::Scalar {
        let [a, b] = self.topol.edge_verts(e);
        A::vector_length(self.point(b) - self.point(a))
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: CellShape,
{
    /// Point at parameter `t` along the edge, measured from its first vertex.
    pub fn edge_sample(&self, e: EH, t: f64) -> A::Vector {
        let [a, b] = self.topol.edge_verts(e);
        lerp::<A>(self.point(a), self.point(b), t)
    }

    pub fn face_centroid(&self, f: FH) -> A::Vector {
        average::<A>(self.topol.face_verts(f).iter().map(|&v| self.point(v)))
    }

    /// Average of the distinct vertices of the cell.
    pub fn poly_centroid(&self, p: PH) -> A::Vector {
        average::<A>(self.topol.poly_verts(p).iter().map(|&v| self.point(v)))
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: VectorNormalizeAdaptor + FloatScalarAdaptor,
    S: CellShape,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    /// Unit normal of the face in its stored vertex order.
    pub fn face_normal(&self, f: FH) -> A::Vector {
        A::normalized_vec(newell_vector::<A>(self.points(), self.topol.face_verts(f)))
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: VectorLengthAdaptor + FloatScalarAdaptor,
    S: CellShape,
    A::Vector: Add<Output = A::Vector> + Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    pub fn face_area(&self, f: FH) -> A::Scalar {
        vector_area::<A>(self.points(), self.topol.face_verts(f))
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: CrossProductAdaptor + DotProductAdaptor + FloatScalarAdaptor,
    S: CellShape,
    A::Vector: Sub<Output = A::Vector>,
    A::Scalar: Add<Output = A::Scalar> + Mul<Output = A::Scalar>,
{
    /// Volume of the cell, by the divergence theorem over its outward
    /// oriented faces. Inverted cells have negative volume.
    pub fn poly_volume(&self, p: PH) -> A::Scalar {
        let c = self.poly_centroid(p);
        let mut total = A::scalarf64(0.0);
        for i in 0..self.topol.poly_faces(p).len() {
            let outward = self.topol.poly_face_verts_outward(p, i);
            let Some((first, rest)) = outward.split_first() else {
                continue;
            };
            let q0 = self.point(*first) - c;
            for w in rest.windows(2) {
                let q1 = self.point(w[0]) - c;
                let q2 = self.point(w[1]) - c;
                total = total + A::dot_product(q0, A::cross_product(q1, q2));
            }
        }
        total * A::scalarf64(1.0 / 6.0)
    }

    pub fn total_volume(&self) -> A::Scalar {
        self.polys()
            .fold(A::scalarf64(0.0), |total, p| total + self.poly_volume(p))
    }
}
