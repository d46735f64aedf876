use id_arena::Id;

use crate::scene_graph::Transformation;

pub type ObjectId<M> = Id<TransformNode<M>>;

/// A node of the parent-pointer scene tree: a local transformation plus
/// hierarchy links. Whether the node is renderable is not stored here; that
/// is decided by membership in the [`DrawableRegistry`](super::DrawableRegistry).
pub struct TransformNode<M: Transformation> {
    pub(crate) transformation: M,
    pub(crate) parent: Option<ObjectId<M>>,
    pub(crate) children: Vec<ObjectId<M>>,
}

impl<M: Transformation> TransformNode<M> {
    pub fn new() -> Self {
        Self {
            transformation: M::IDENTITY,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn transformation(&self) -> M {
        self.transformation
    }

    pub fn set_transformation(&mut self, transformation: M) {
        self.transformation = transformation;
    }

    pub fn reset_transformation(&mut self) {
        self.transformation = M::IDENTITY;
    }

    pub fn parent(&self) -> Option<ObjectId<M>> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId<M>] {
        &self.children
    }
}

impl<M: Transformation> Default for TransformNode<M> {
    fn default() -> Self {
        Self::new()
    }
}
