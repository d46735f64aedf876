use glam::Vec4;

use crate::assets::{MeshId, TextureId};
use crate::scene_graph::drawable::PhongMaterial;
use crate::scene_graph::node::ObjectId;
use crate::scene_graph::tree::ObjectTree;
use crate::scene_graph::Transformation;

/// Chainable view of one object in an [`ObjectTree`].
///
/// Every mutator follows the broadcast protocol of the tree: applied to a
/// leaf it hits that drawable, applied to a group it reaches every drawable
/// descendant.
///
/// ```ignore
/// app.add_primitive(Primitive::Cube)
///     .set_color(color::by_name("red").unwrap())
///     .set_transformation(Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)));
/// ```
pub struct ObjectHandle<'a, M: Transformation> {
    tree: &'a mut ObjectTree<M>,
    id: ObjectId<M>,
}

impl<'a, M: Transformation> ObjectHandle<'a, M> {
    pub fn new(tree: &'a mut ObjectTree<M>, id: ObjectId<M>) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> ObjectId<M> {
        self.id
    }

    pub fn is_drawable(&self) -> bool {
        self.tree.is_drawable(self.id)
    }

    pub fn set_mesh(&mut self, mesh: MeshId) -> &mut Self {
        self.tree.set_mesh(self.id, mesh);
        self
    }

    pub fn set_texture(&mut self, texture: TextureId) -> &mut Self {
        self.tree.set_texture(self.id, texture);
        self
    }

    pub fn set_material(&mut self, material: PhongMaterial) -> &mut Self {
        self.tree.set_material(self.id, material);
        self
    }

    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.tree.set_color(self.id, color);
        self
    }

    pub fn add_prior_transformation(&mut self, transformation: M) -> &mut Self {
        self.tree.add_prior_transformation(self.id, transformation);
        self
    }

    pub fn transformation(&self) -> M {
        self.tree.transformation(self.id)
    }

    pub fn set_transformation(&mut self, transformation: M) -> &mut Self {
        self.tree.set_transformation(self.id, transformation);
        self
    }

    pub fn reset_transformation(&mut self) -> &mut Self {
        self.tree.reset_transformation(self.id);
        self
    }
}
