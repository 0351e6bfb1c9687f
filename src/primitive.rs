use crate::{
    adaptor::{Adaptor, FloatScalarAdaptor},
    error::Error,
    mesh::PolygonMeshT,
    shape::{CellShape, PolyShape},
    volmesh::PolyhedralMeshT,
};

const BOX_POS: [(bool, bool, bool); 8] = [
    (false, false, false),
    (true, false, false),
    (true, true, false),
    (false, true, false),
    (false, false, true),
    (true, false, true),
    (true, true, true),
    (false, true, true),
];

fn box_points<A: Adaptor>(min: A::Vector, max: A::Vector) -> Vec<A::Vector> {
    BOX_POS
        .iter()
        .map(|&(xf, yf, zf)| {
            A::vector([
                A::vector_coord(if xf { &max } else { &min }, 0),
                A::vector_coord(if yf { &max } else { &min }, 1),
                A::vector_coord(if zf { &max } else { &min }, 2),
            ])
        })
        .collect()
}

impl<A, S> PolygonMeshT<A, S>
where
    A: Adaptor,
    S: PolyShape,
{
    /// Makes a box with the following topology, spanning from the min point to
    /// the max point. The quads are wound so their normals point out of the
    /// box.
    ///
    ///  ```text
    ///       7-----------6
    ///      /|          /|
    ///     / |         / |
    ///    4-----------5  |
    ///    |  |        |  |
    ///    |  3--------|--2
    ///    | /         | /
    ///    |/          |/
    ///    0-----------1
    ///  ```
    pub fn quad_box(min: A::Vector, max: A::Vector) -> Result<Self, Error> {
        const BOX_IDX: [[u32; 4]; 6] = [
            [0, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ];
        Self::from_polys(box_points::<A>(min, max), &BOX_IDX)
    }
}

impl<A, S> PolygonMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: PolyShape,
{
    /// Box of size 1, spanning from the origin to (1, 1, 1).
    pub fn unit_box() -> Result<Self, Error> {
        Self::quad_box(
            A::vector([A::scalarf64(0.0); 3]),
            A::vector([A::scalarf64(1.0); 3]),
        )
    }

    /// A single unit square quad in the XY plane, facing +Z.
    pub fn unit_quad() -> Result<Self, Error> {
        let (zero, one) = (A::scalarf64(0.0), A::scalarf64(1.0));
        Self::from_polys(
            vec![
                A::vector([zero, zero, zero]),
                A::vector([one, zero, zero]),
                A::vector([one, one, zero]),
                A::vector([zero, one, zero]),
            ],
            &[[0u32, 1, 2, 3]],
        )
    }

    /**
     * Triangulated grid covering the unit square in the XY plane, with `nx`
     * by `ny` cells. All triangles face +Z.
     *
     * Vertex `j * (nx + 1) + i` is at `(i / nx, j / ny, 0)`. The cell whose
     * lower left vertex is `a` is split along its diagonal into the triangles
     * `(a, a + 1, a + nx + 2)` and `(a, a + nx + 2, a + nx + 1)`, in that
     * order.
     */
    pub fn triangle_grid(nx: usize, ny: usize) -> Result<Self, Error> {
        let (sx, sy) = (nx.max(1) as f64, ny.max(1) as f64);
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(A::vector([
                    A::scalarf64(i as f64 / sx),
                    A::scalarf64(j as f64 / sy),
                    A::scalarf64(0.0),
                ]));
            }
        }
        let stride = nx as u32 + 1;
        let mut polys = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny as u32 {
            for i in 0..nx as u32 {
                let a = j * stride + i;
                polys.push([a, a + 1, a + stride + 1]);
                polys.push([a, a + stride + 1, a + stride]);
            }
        }
        Self::from_polys(points, &polys)
    }
}

impl<A, S> PolyhedralMeshT<A, S>
where
    A: FloatScalarAdaptor,
    S: CellShape,
{
    /// A single tetrahedron with its vertices at the origin and at the unit
    /// points of the X, Y and Z axes.
    pub fn tetrahedron() -> Result<Self, Error> {
        let (zero, one) = (A::scalarf64(0.0), A::scalarf64(1.0));
        Self::from_cells(
            vec![
                A::vector([zero, zero, zero]),
                A::vector([one, zero, zero]),
                A::vector([zero, one, zero]),
                A::vector([zero, zero, one]),
            ],
            &[[0u32, 1, 2, 3]],
        )
    }

    /// The unit cube as a single hexahedral cell, with the same vertex layout
    /// as [`PolygonMeshT::quad_box`].
    pub fn hexahedron() -> Result<Self, Error> {
        Self::from_cells(
            box_points::<A>(
                A::vector([A::scalarf64(0.0); 3]),
                A::vector([A::scalarf64(1.0); 3]),
            ),
            &[[0u32, 1, 2, 3, 4, 5, 6, 7]],
        )
    }
}
