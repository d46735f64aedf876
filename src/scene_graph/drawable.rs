use std::collections::HashMap;

use glam::Vec4;

use crate::assets::{MeshId, TextureId};
use crate::scene_graph::{ObjectId, Transformation};

/// Shading mode of a drawable, derived from which optional fields are
/// populated. The order is a strict priority: a texture beats a material,
/// a material beats a flat color, and a drawable with none of the three is
/// drawn with the unlit per-vertex-color shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingMode {
    Textured,
    LitMaterial,
    LitColor,
    VertexColor,
}

/// Phong material parameters, decoded by the importer or set by the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhongMaterial {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            shininess: 80.0,
        }
    }
}

/// The renderable state bound to a single scene node: a mesh handle plus the
/// optional appearance fields and the accumulated prior transformation.
///
/// The prior transformation is applied *before* the node's live
/// transformation at draw time (`effective = view * prior`), which is what
/// lets an imported hierarchy be flattened into its leaves and then moved as
/// one rigid piece.
pub struct Drawable<M: Transformation> {
    mesh: Option<MeshId>,
    texture: Option<TextureId>,
    material: Option<PhongMaterial>,
    color: Option<Vec4>,
    prior: M,
}

impl<M: Transformation> Drawable<M> {
    pub fn new() -> Self {
        Self {
            mesh: None,
            texture: None,
            material: None,
            color: None,
            prior: M::IDENTITY,
        }
    }

    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn material(&self) -> Option<&PhongMaterial> {
        self.material.as_ref()
    }

    pub fn color(&self) -> Option<Vec4> {
        self.color
    }

    pub fn prior_transformation(&self) -> M {
        self.prior
    }

    pub fn set_mesh(&mut self, mesh: MeshId) -> &mut Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn set_texture(&mut self, texture: TextureId) -> &mut Self {
        self.texture = Some(texture);
        self
    }

    pub fn set_material(&mut self, material: PhongMaterial) -> &mut Self {
        self.material = Some(material);
        self
    }

    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = Some(color);
        self
    }

    /// Composes an additional transformation in front of the accumulated
    /// prior: `prior = transformation * prior`. Left-composition, because the
    /// incoming matrix is expressed in the parent's frame and imported
    /// hierarchies fold transformations root to leaf.
    pub fn add_prior_transformation(&mut self, transformation: M) -> &mut Self {
        self.prior = transformation * self.prior;
        self
    }

    /// The matrix actually handed to the shader for a given camera-relative
    /// node transformation.
    pub fn effective_transformation(&self, view_transformation: M) -> M {
        view_transformation * self.prior
    }

    pub fn shading_mode(&self) -> ShadingMode {
        if self.texture.is_some() {
            ShadingMode::Textured
        } else if self.material.is_some() {
            ShadingMode::LitMaterial
        } else if self.color.is_some() {
            ShadingMode::LitColor
        } else {
            ShadingMode::VertexColor
        }
    }
}

impl<M: Transformation> Default for Drawable<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed ownership table from node identity to at most one drawable.
///
/// Registration is idempotent: a second `get_or_create` for the same node
/// observes the existing entry and does not overwrite it. Iteration follows
/// insertion order, which is also the draw order within a shading group.
pub struct DrawableRegistry<M: Transformation> {
    entries: HashMap<ObjectId<M>, Drawable<M>>,
    order: Vec<ObjectId<M>>,
}

impl<M: Transformation> DrawableRegistry<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ObjectId<M>) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId<M>) -> Option<&Drawable<M>> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId<M>) -> Option<&mut Drawable<M>> {
        self.entries.get_mut(&id)
    }

    /// Inserts an empty drawable for `id` if absent. Returns whether the
    /// insertion happened together with the (new or pre-existing) entry;
    /// callers populate the drawable only on `true`.
    pub fn get_or_create(&mut self, id: ObjectId<M>) -> (bool, &mut Drawable<M>) {
        let mut inserted = false;
        let drawable = self.entries.entry(id).or_insert_with(|| {
            inserted = true;
            Drawable::new()
        });
        if inserted {
            self.order.push(id);
        }
        (inserted, drawable)
    }

    /// Erases the entry for `id`, dropping its drawable and removing it from
    /// the draw order. The relative order of the remaining entries is
    /// unchanged.
    pub fn remove(&mut self, id: ObjectId<M>) -> Option<Drawable<M>> {
        let drawable = self.entries.remove(&id)?;
        self.order.retain(|&entry| entry != id);
        Some(drawable)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId<M>, &Drawable<M>)> {
        self.order
            .iter()
            .filter_map(move |&id| self.entries.get(&id).map(|drawable| (id, drawable)))
    }
}

impl<M: Transformation> Default for DrawableRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}
