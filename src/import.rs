//! Scene import: decoding a glTF file into flat asset/object arrays and
//! building an object subtree out of them.
//!
//! The two stages are deliberately separate: [`ImportedScene`] is plain data
//! (meshes, textures, materials, and a parent-indexed object list), and
//! [`spawn_scene`] turns that data into tree nodes and drawables. Only the
//! decode stage touches the filesystem.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use crate::assets::Assets;
use crate::color;
use crate::error::ImportError;
use crate::rendering::mesh::MeshData;
use crate::rendering::texture::TextureImage;
use crate::scene_graph::{ObjectId3, ObjectTree3, PhongMaterial};

/// One entry of the flat object list: parent index (`None` for scene roots),
/// local transformation, and optional mesh/material assignments.
#[derive(Debug, Default)]
pub struct ImportedObject {
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub transformation: Mat4,
    pub mesh: Option<usize>,
    pub material: Option<usize>,
}

pub struct ImportedMaterial {
    pub material: PhongMaterial,
    pub diffuse_texture: Option<usize>,
}

/// A decoded scene file, flattened into parallel arrays. `None` slots mark
/// assets that failed to decode; they degrade to defaults at spawn time.
#[derive(Default)]
pub struct ImportedScene {
    pub meshes: Vec<Option<MeshData>>,
    pub textures: Vec<Option<TextureImage>>,
    pub materials: Vec<Option<ImportedMaterial>>,
    pub objects: Vec<ImportedObject>,
}

impl ImportedScene {
    pub fn from_file(path: &Path) -> Result<Self, ImportError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("gltf") | Some("glb") => {}
            _ => {
                return Err(ImportError::NoImporter {
                    path: path.to_path_buf(),
                })
            }
        }

        log::debug!("opening file {}", path.display());
        let (document, buffers, images) = gltf::import(path).map_err(|error| match error {
            gltf::Error::Io(source) => ImportError::OpenFile {
                path: path.to_path_buf(),
                source,
            },
            source => ImportError::InvalidScene {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let mut scene = ImportedScene::default();

        // Meshes: one entry per document mesh, all primitives merged so each
        // object ends up with at most one drawable.
        let mut mesh_materials: Vec<Option<usize>> = Vec::new();
        for mesh in document.meshes() {
            let data = load_mesh(&mesh, &buffers);
            if data.is_none() {
                log::warn!("cannot load mesh {}, skipping", mesh.index());
            }
            mesh_materials.push(
                mesh.primitives()
                    .find_map(|primitive| primitive.material().index()),
            );
            scene.meshes.push(data);
        }

        // Textures resolve through their source image.
        for texture in document.textures() {
            let image = images.get(texture.source().index()).and_then(decode_image);
            if image.is_none() {
                log::warn!("cannot load texture {}, skipping", texture.index());
            }
            scene.textures.push(image);
        }

        for material in document.materials() {
            scene.materials.push(Some(convert_material(&material)));
        }

        // Objects: allocate the flat list first, then derive the parent
        // array from the child links (children never precede their parents
        // in glTF, but nothing here depends on that).
        for node in document.nodes() {
            scene.objects.push(ImportedObject {
                name: node.name().map(String::from),
                parent: None,
                transformation: Mat4::from_cols_array_2d(&node.transform().matrix()),
                mesh: node.mesh().map(|mesh| mesh.index()),
                material: node
                    .mesh()
                    .and_then(|mesh| mesh_materials.get(mesh.index()).copied().flatten()),
            });
        }
        for node in document.nodes() {
            for child in node.children() {
                if let Some(object) = scene.objects.get_mut(child.index()) {
                    object.parent = Some(node.index());
                }
            }
        }

        Ok(scene)
    }
}

fn load_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Option<MeshData> {
    let mut data = MeshData::triangles();
    let mut missing_normals = false;

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "unsupported primitive mode {:?} in mesh {}, skipping primitive",
                primitive.mode(),
                mesh.index()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|slice| &**slice));
        let Some(positions) = reader.read_positions() else {
            log::warn!("primitive without positions in mesh {}, skipping", mesh.index());
            continue;
        };

        let base = data.positions.len() as u32;
        data.positions.extend(positions.map(Vec3::from));

        if let Some(normals) = reader.read_normals() {
            data.normals.extend(normals.map(Vec3::from));
        } else {
            missing_normals = true;
        }
        data.normals.resize(data.positions.len(), Vec3::Z);

        if let Some(colors) = reader.read_colors(0) {
            data.colors
                .extend(colors.into_rgb_f32().map(Vec3::from));
        }
        data.colors.resize(data.positions.len(), Vec3::ONE);

        if let Some(uvs) = reader.read_tex_coords(0) {
            data.uvs.extend(uvs.into_f32().map(glam::Vec2::from));
        }
        data.uvs.resize(data.positions.len(), glam::Vec2::ZERO);

        match reader.read_indices() {
            Some(indices) => data.indices.extend(indices.into_u32().map(|i| i + base)),
            None => data
                .indices
                .extend(base..data.positions.len() as u32),
        }
    }

    if data.positions.is_empty() {
        return None;
    }
    if missing_normals {
        data.compute_normals();
    }
    Some(data)
}

fn decode_image(image: &gltf::image::Data) -> Option<TextureImage> {
    use gltf::image::Format;

    let pixel_count = (image.width * image.height) as usize;
    let pixels = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for rgb in image.pixels.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(u8::MAX);
            }
            rgba
        }
        Format::R8 => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for &luminance in &image.pixels {
                rgba.extend_from_slice(&[luminance, luminance, luminance, u8::MAX]);
            }
            rgba
        }
        format => {
            log::warn!("unsupported image format {format:?}");
            return None;
        }
    };

    Some(TextureImage::from_rgba8(image.width, image.height, pixels))
}

fn convert_material(material: &gltf::Material) -> ImportedMaterial {
    let pbr = material.pbr_metallic_roughness();
    let diffuse = Vec4::from(pbr.base_color_factor());
    let roughness = pbr.roughness_factor().clamp(0.0, 1.0);

    ImportedMaterial {
        material: PhongMaterial {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse,
            specular: Vec4::new(1.0 - roughness, 1.0 - roughness, 1.0 - roughness, 1.0),
            shininess: ((1.0 - roughness) * 128.0).max(4.0),
        },
        diffuse_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().index()),
    }
}

/// Builds an object subtree out of a decoded scene, under a dedicated
/// container node, and flattens the imported hierarchy into drawable priors
/// so the container moves the whole import as one rigid piece.
///
/// Returns the container's id.
pub fn spawn_scene(
    tree: &mut ObjectTree3,
    assets: &mut Assets,
    parent: ObjectId3,
    imported: ImportedScene,
) -> ObjectId3 {
    let container = tree.create_object(parent);

    let mesh_ids: Vec<_> = imported
        .meshes
        .into_iter()
        .map(|mesh| mesh.map(|mesh| assets.add_mesh(mesh)))
        .collect();
    let texture_ids: Vec<_> = imported
        .textures
        .into_iter()
        .map(|texture| texture.map(|texture| assets.add_texture(texture)))
        .collect();

    // A format without scene support: show the first loaded mesh with the
    // default material and be done with it.
    if imported.objects.is_empty() {
        if let Some(mesh) = mesh_ids.iter().find_map(|id| *id) {
            let object = tree.create_object(container);
            let (inserted, drawable) = tree.registry_mut().get_or_create(object);
            if inserted {
                drawable.set_mesh(mesh).set_color(color::WHITE);
            }
        }
        return container;
    }

    // Allocate every object first, then link: parents are not guaranteed to
    // precede their children in the flat list.
    let ids: Vec<ObjectId3> = imported
        .objects
        .iter()
        .map(|_| tree.create_object(container))
        .collect();

    for (index, object) in imported.objects.iter().enumerate() {
        if let Some(parent_index) = object.parent {
            match ids.get(parent_index) {
                Some(&parent_id) => tree.attach(ids[index], parent_id),
                None => log::warn!(
                    "object {index} names missing parent {parent_index}, keeping it at the import root"
                ),
            }
        }
        tree.set_transformation(ids[index], object.transformation);

        let Some(mesh_index) = object.mesh else {
            continue;
        };
        let Some(mesh) = mesh_ids.get(mesh_index).copied().flatten() else {
            log::warn!(
                "object {index} references mesh {mesh_index} which did not load, leaving it empty"
            );
            continue;
        };

        let (inserted, drawable) = tree.registry_mut().get_or_create(ids[index]);
        if !inserted {
            continue;
        }
        drawable.set_mesh(mesh);

        match object
            .material
            .and_then(|index| imported.materials.get(index))
            .and_then(|slot| slot.as_ref())
        {
            // Material not available / not loaded: default material
            None => {
                drawable.set_color(color::WHITE);
            }
            Some(material) => match material.diffuse_texture {
                // Textured material, if the texture loaded correctly
                Some(texture_index) => match texture_ids.get(texture_index).copied().flatten() {
                    Some(texture) => {
                        drawable.set_texture(texture);
                    }
                    None => {
                        log::warn!(
                            "object {index} uses texture {texture_index} which did not load, using the default material"
                        );
                        drawable.set_color(color::WHITE);
                    }
                },
                // Color-only material
                None => {
                    drawable.set_material(material.material);
                }
            },
        }
    }

    // Fold the imported hierarchy into the drawables, seeded with the
    // container's own transformation.
    let base = tree.transformation(container);
    for child in tree.children(container).to_vec() {
        tree.flatten_into_prior(child, base);
    }

    container
}
