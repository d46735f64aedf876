use std::path::Path;

use anyhow::Context as _;
use id_arena::{Arena, Id};

use crate::rendering::mesh::MeshData;
use crate::rendering::texture::TextureImage;

pub type MeshId = Id<MeshData>;
pub type TextureId = Id<TextureImage>;

/// CPU-side storage for meshes and texture images.
///
/// Drawables hold copyable ids into these arenas, never the data itself, so
/// broadcasting `set_mesh` over a subtree shares one mesh between many
/// drawables. The renderer keeps its own id-keyed tables of uploaded GPU
/// resources.
#[derive(Default)]
pub struct Assets {
    meshes: Arena<MeshData>,
    textures: Arena<TextureImage>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.alloc(mesh)
    }

    pub fn add_texture(&mut self, texture: TextureImage) -> TextureId {
        self.textures.alloc(texture)
    }

    /// Decodes an image file into a texture usable with `set_texture`.
    pub fn load_texture(&mut self, path: &Path) -> anyhow::Result<TextureId> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image `{}`", path.display()))?;
        Ok(self.add_texture(TextureImage::from_image(image)))
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureImage> {
        self.textures.get(id)
    }
}
