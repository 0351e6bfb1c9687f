/*!
Element shape policies.

Instead of a class per mesh flavour, the mesh types are parameterized over a
shape policy. Surface meshes take a [`PolyShape`] that fixes (or leaves free)
the number of vertices per poly. Volumetric meshes take a [`CellShape`] that
optionally provides a face template, so cells can be created from a plain
list of vertices.
*/

/// Arity policy for the polys of a surface mesh.
pub trait PolyShape {
    /// Required number of vertices per poly, `None` if any arity >= 3 is allowed.
    const ARITY: Option<usize>;
}

/// Every poly is a triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangles;

/// Every poly is a quad.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quads;

/// Polys of any arity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polygons;

impl PolyShape for Triangles {
    const ARITY: Option<usize> = Some(3);
}

impl PolyShape for Quads {
    const ARITY: Option<usize> = Some(4);
}

impl PolyShape for Polygons {
    const ARITY: Option<usize> = None;
}

/// Outward oriented faces of a tetrahedron `(v0, v1, v2, v3)`, where `v3` lies
/// on the side of `(v0, v1, v2)` the right hand rule points to.
pub const TET_FACES: [&[usize]; 4] = [&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]];

/// Outward oriented faces of a hexahedron with the following vertex layout.
/// ```text
///       7-----------6
///      /|          /|
///     / |         / |
///    4-----------5  |
///    |  |        |  |
///    |  3--------|--2
///    | /         | /
///    |/          |/
///    0-----------1
/// ```
pub const HEX_FACES: [&[usize]; 6] = [
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];

/// Number of vertices per cell, and the outward oriented faces of the cell
/// given as offsets into its vertex list.
pub type CellTemplate = (usize, &'static [&'static [usize]]);

pub const TET_TEMPLATE: CellTemplate = (4, &TET_FACES);

pub const HEX_TEMPLATE: CellTemplate = (8, &HEX_FACES);

/// Shape policy for the cells of a volumetric mesh.
pub trait CellShape {
    /// `None` for general polyhedra, which must be built from explicit faces.
    const TEMPLATE: Option<CellTemplate>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tetrahedra;

#[derive(Debug, Clone, Copy, Default)]
pub struct Hexahedra;

#[derive(Debug, Clone, Copy, Default)]
pub struct Polyhedra;

impl CellShape for Tetrahedra {
    const TEMPLATE: Option<CellTemplate> = Some(TET_TEMPLATE);
}

impl CellShape for Hexahedra {
    const TEMPLATE: Option<CellTemplate> = Some(HEX_TEMPLATE);
}

impl CellShape for Polyhedra {
    const TEMPLATE: Option<CellTemplate> = None;
}
