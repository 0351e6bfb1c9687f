use crate::{
    adaptor::Adaptor,
    element::{EH, FH, PH, VH},
    status::Status,
};

/// RGBA color.
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

/// Per-vertex payload, stored next to the vertex position.
#[derive(Debug, Clone, Copy)]
pub struct VertexAttr<V> {
    pub normal: V,
    pub color: Color,
    pub label: i32,
    pub quality: f64,
    pub status: Status,
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeAttr {
    pub color: Color,
    pub status: Status,
}

/// Payload of a face of a volumetric mesh.
#[derive(Debug, Clone, Copy)]
pub struct FaceAttr<V> {
    pub normal: V,
    pub color: Color,
    pub label: i32,
    pub status: Status,
}

#[derive(Debug, Clone, Copy)]
pub struct PolyAttr<V> {
    pub normal: V,
    pub color: Color,
    pub label: i32,
    pub quality: f64,
    pub status: Status,
}

impl<V: Default> Default for VertexAttr<V> {
    fn default() -> Self {
        VertexAttr {
            normal: V::default(),
            color: WHITE,
            label: 0,
            quality: 0.0,
            status: Status::default(),
        }
    }
}

impl Default for EdgeAttr {
    fn default() -> Self {
        EdgeAttr {
            color: WHITE,
            status: Status::default(),
        }
    }
}

impl<V: Default> Default for FaceAttr<V> {
    fn default() -> Self {
        FaceAttr {
            normal: V::default(),
            color: WHITE,
            label: 0,
            status: Status::default(),
        }
    }
}

impl<V: Default> Default for PolyAttr<V> {
    fn default() -> Self {
        PolyAttr {
            normal: V::default(),
            color: WHITE,
            label: 0,
            quality: 0.0,
            status: Status::default(),
        }
    }
}

/// Receives every push and swap-remove the topology performs on its element
/// stores, so arrays indexed by element handles stay in sync.
///
/// A push may name a source element whose data the new element should
/// inherit, e.g. the poly that was split in two. A swap-remove of index `i`
/// moves the last element into slot `i`, exactly like [`Vec::swap_remove`].
/// The unit type ignores everything and can be used with a bare topology.
pub trait AttribSync {
    fn push_vert(&mut self) {}

    fn swap_remove_vert(&mut self, _v: VH) {}

    fn push_edge(&mut self, _src: Option<EH>) {}

    fn swap_remove_edge(&mut self, _e: EH) {}

    fn push_face(&mut self, _src: Option<FH>) {}

    fn swap_remove_face(&mut self, _f: FH) {}

    fn push_poly(&mut self, _src: Option<PH>) {}

    fn swap_remove_poly(&mut self, _p: PH) {}
}

impl AttribSync for () {}

/// Positions and attribute payloads of all elements of a mesh.
pub(crate) struct Attribs<A: Adaptor> {
    pub(crate) points: Vec<A::Vector>,
    pub(crate) verts: Vec<VertexAttr<A::Vector>>,
    pub(crate) edges: Vec<EdgeAttr>,
    pub(crate) faces: Vec<FaceAttr<A::Vector>>,
    pub(crate) polys: Vec<PolyAttr<A::Vector>>,
}

impl<A: Adaptor> Clone for Attribs<A> {
    fn clone(&self) -> Self {
        Attribs {
            points: self.points.clone(),
            verts: self.verts.clone(),
            edges: self.edges.clone(),
            faces: self.faces.clone(),
            polys: self.polys.clone(),
        }
    }
}

impl<A: Adaptor> Attribs<A> {
    pub(crate) fn new(points: Vec<A::Vector>, nedges: usize, nfaces: usize, npolys: usize) -> Self {
        let nverts = points.len();
        Attribs {
            points,
            verts: vec![VertexAttr::default(); nverts],
            edges: vec![EdgeAttr::default(); nedges],
            faces: vec![FaceAttr::default(); nfaces],
            polys: vec![PolyAttr::default(); npolys],
        }
    }
}

fn push_copy<T: Copy + Default>(buf: &mut Vec<T>, src: Option<usize>) {
    let val = src.and_then(|i| buf.get(i).copied()).unwrap_or_default();
    buf.push(val);
}

impl<A: Adaptor> AttribSync for Attribs<A> {
    fn push_vert(&mut self) {
        self.points.push(A::zero_vector());
        self.verts.push(VertexAttr::default());
    }

    fn swap_remove_vert(&mut self, v: VH) {
        self.points.swap_remove(v.ui());
        self.verts.swap_remove(v.ui());
    }

    fn push_edge(&mut self, src: Option<EH>) {
        push_copy(&mut self.edges, src.map(|e| e.ui()));
    }

    fn swap_remove_edge(&mut self, e: EH) {
        self.edges.swap_remove(e.ui());
    }

    fn push_face(&mut self, src: Option<FH>) {
        push_copy(&mut self.faces, src.map(|f| f.ui()));
    }

    fn swap_remove_face(&mut self, f: FH) {
        self.faces.swap_remove(f.ui());
    }

    fn push_poly(&mut self, src: Option<PH>) {
        push_copy(&mut self.polys, src.map(|p| p.ui()));
    }

    fn swap_remove_poly(&mut self, p: PH) {
        self.polys.swap_remove(p.ui());
    }
}

#[cfg(all(test, feature = "use_glam"))]
mod test {
    use super::{AttribSync, Attribs};
    use crate::{element::PH, use_glam::BuiltInAdaptorF64};

    #[test]
    fn t_attribs_push_copies_source() {
        let mut attr = Attribs::<BuiltInAdaptorF64>::new(vec![glam::DVec3::ZERO; 3], 3, 0, 1);
        attr.polys[0].label = 7;
        attr.push_poly(Some(PH::from(0u32)));
        attr.push_poly(None);
        assert_eq!(
            attr.polys.iter().map(|p| p.label).collect::<Vec<_>>(),
            &[7, 7, 0]
        );
        attr.swap_remove_poly(PH::from(0u32));
        assert_eq!(
            attr.polys.iter().map(|p| p.label).collect::<Vec<_>>(),
            &[0, 7]
        );
    }
}
