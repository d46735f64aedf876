use glam::Vec4;
use id_arena::Arena;

use crate::assets::{MeshId, TextureId};
use crate::scene_graph::drawable::{Drawable, DrawableRegistry, PhongMaterial};
use crate::scene_graph::node::{ObjectId, TransformNode};
use crate::scene_graph::Transformation;

/// The object tree: an arena of transform nodes plus the drawable registry
/// keyed by node identity.
///
/// A node is either a leaf (present in the registry, carries a drawable) or a
/// pure grouping node (absent from the registry). There is no separate flag:
/// registry membership *is* the distinction, and every mutator below
/// dispatches on it: applied to a leaf it hits the drawable directly, applied
/// to a group it broadcasts recursively to every drawable descendant.
pub struct ObjectTree<M: Transformation> {
    nodes: Arena<TransformNode<M>>,
    registry: DrawableRegistry<M>,
    root: ObjectId<M>,
}

impl<M: Transformation> ObjectTree<M> {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(TransformNode::new());
        Self {
            nodes,
            registry: DrawableRegistry::new(),
            root,
        }
    }

    /// The root grouping node; every object created without an explicit
    /// parent hangs off it.
    pub fn root(&self) -> ObjectId<M> {
        self.root
    }

    /// Allocates a new grouping node under `parent`. It becomes a leaf only
    /// once an entry for it is created in the registry.
    pub fn create_object(&mut self, parent: ObjectId<M>) -> ObjectId<M> {
        let id = self.nodes.alloc(TransformNode::new());
        self.nodes[id].parent = Some(parent);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// Moves `child` under `new_parent`, detaching it from its current
    /// parent first.
    pub fn attach(&mut self, child: ObjectId<M>, new_parent: ObjectId<M>) {
        if child == new_parent {
            log::warn!("cannot attach an object to itself");
            return;
        }
        if let Some(old_parent) = self.nodes.get(child).and_then(|node| node.parent) {
            if let Some(node) = self.nodes.get_mut(old_parent) {
                node.children.retain(|&entry| entry != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(new_parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(new_parent);
        }
    }

    /// Detaches `id` from its parent and erases the registry entries of the
    /// whole subtree. The arena slots themselves stay behind as inert
    /// orphans; ids into a removed subtree simply stop resolving to anything
    /// drawable.
    pub fn remove_object(&mut self, id: ObjectId<M>) {
        if id == self.root {
            return;
        }
        if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|&entry| entry != id);
            }
        }
        self.erase_subtree(id);
    }

    fn erase_subtree(&mut self, id: ObjectId<M>) {
        self.registry.remove(id);
        let children = match self.nodes.get_mut(id) {
            Some(node) => {
                node.parent = None;
                std::mem::take(&mut node.children)
            }
            None => return,
        };
        for child in children {
            self.erase_subtree(child);
        }
    }

    pub fn parent(&self, id: ObjectId<M>) -> Option<ObjectId<M>> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ObjectId<M>) -> &[ObjectId<M>] {
        self.nodes
            .get(id)
            .map(|node| node.children())
            .unwrap_or(&[])
    }

    pub fn transformation(&self, id: ObjectId<M>) -> M {
        self.nodes
            .get(id)
            .map(|node| node.transformation)
            .unwrap_or(M::IDENTITY)
    }

    pub fn set_transformation(&mut self, id: ObjectId<M>, transformation: M) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.transformation = transformation;
        }
    }

    pub fn reset_transformation(&mut self, id: ObjectId<M>) {
        self.set_transformation(id, M::IDENTITY);
    }

    /// The product of all transformations from the root down to `id`.
    pub fn world_transformation(&self, id: ObjectId<M>) -> M {
        let mut transformation = self.transformation(id);
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            let node = &self.nodes[ancestor];
            transformation = node.transformation * transformation;
            current = node.parent;
        }
        transformation
    }

    /// Whether `id` carries a drawable, i.e. is present as a key in the
    /// registry.
    pub fn is_drawable(&self, id: ObjectId<M>) -> bool {
        self.registry.contains(id)
    }

    pub fn registry(&self) -> &DrawableRegistry<M> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DrawableRegistry<M> {
        &mut self.registry
    }

    // === Mutator broadcast protocol ===
    //
    // Each operation applies directly when `id` is registered and otherwise
    // recurses into the children, so it reaches every drawable descendant
    // exactly once. A childless unregistered node is a silent no-op.

    fn broadcast<F>(&mut self, id: ObjectId<M>, apply: &mut F)
    where
        F: FnMut(&mut Drawable<M>),
    {
        if let Some(drawable) = self.registry.get_mut(id) {
            apply(drawable);
            return;
        }
        let children = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.broadcast(child, apply);
        }
    }

    pub fn set_mesh(&mut self, id: ObjectId<M>, mesh: MeshId) {
        self.broadcast(id, &mut |drawable| {
            drawable.set_mesh(mesh);
        });
    }

    pub fn set_texture(&mut self, id: ObjectId<M>, texture: TextureId) {
        self.broadcast(id, &mut |drawable| {
            drawable.set_texture(texture);
        });
    }

    pub fn set_material(&mut self, id: ObjectId<M>, material: PhongMaterial) {
        self.broadcast(id, &mut |drawable| {
            drawable.set_material(material);
        });
    }

    pub fn set_color(&mut self, id: ObjectId<M>, color: Vec4) {
        self.broadcast(id, &mut |drawable| {
            drawable.set_color(color);
        });
    }

    pub fn add_prior_transformation(&mut self, id: ObjectId<M>, transformation: M) {
        self.broadcast(id, &mut |drawable| {
            drawable.add_prior_transformation(transformation);
        });
    }

    /// Folds hierarchical transformations into drawable priors, pre-order.
    ///
    /// For each node the accumulated product of ancestor transformations is
    /// composed with the node's own local transformation; the result is added
    /// to the node's drawable prior (if it has one) and the local
    /// transformation is reset to identity. Afterwards every drawable in the
    /// subtree renders exactly as before, but all transformation state lives
    /// in the priors, so a single prior added at the subtree root later
    /// moves the whole thing rigidly without double-applying anything.
    pub fn flatten_into_prior(&mut self, id: ObjectId<M>, accumulated: M) {
        let transformation = match self.nodes.get_mut(id) {
            Some(node) => {
                let transformation = accumulated * node.transformation;
                node.transformation = M::IDENTITY;
                transformation
            }
            None => return,
        };
        if let Some(drawable) = self.registry.get_mut(id) {
            drawable.add_prior_transformation(transformation);
        }
        let children = self.nodes[id].children.clone();
        for child in children {
            self.flatten_into_prior(child, transformation);
        }
    }
}

impl<M: Transformation> Default for ObjectTree<M> {
    fn default() -> Self {
        Self::new()
    }
}
