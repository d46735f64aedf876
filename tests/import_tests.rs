//! Hierarchy construction from flat importer arrays: parent linking,
//! shading-mode selection rules, graceful degradation, and the flattening of
//! imported transformations into drawable priors (Scenario B).

use glam::{Mat4, Vec3, Vec4};
use sciviz::import::{spawn_scene, ImportedMaterial, ImportedObject, ImportedScene};
use sciviz::{Assets, MeshData, ObjectTree3, PhongMaterial, ShadingMode, TextureImage};

const EPSILON: f32 = 1e-5;

fn mat4_approx(a: Mat4, b: Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() < EPSILON)
}

fn object(parent: Option<usize>, transformation: Mat4, mesh: Option<usize>) -> ImportedObject {
    ImportedObject {
        name: None,
        parent,
        transformation,
        mesh,
        material: None,
    }
}

#[test]
fn scenario_b_flattening_folds_parent_transforms_into_priors() {
    let t0 = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let t1 = Mat4::from_scale(Vec3::splat(2.0));
    let t2 = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0));

    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![],
        materials: vec![],
        objects: vec![
            object(None, t0, Some(0)),
            object(Some(0), t1, Some(0)),
            object(Some(0), t2, Some(0)),
        ],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    // Objects 1 and 2 were re-linked under object 0, which hangs off the
    // container.
    let roots = tree.children(container);
    assert_eq!(roots.len(), 1);
    let object_0 = roots[0];
    let children = tree.children(object_0).to_vec();
    assert_eq!(children.len(), 2);

    // All local transformations were reset, all state lives in the priors.
    assert!(mat4_approx(tree.transformation(object_0), Mat4::IDENTITY));
    for &child in &children {
        assert!(mat4_approx(tree.transformation(child), Mat4::IDENTITY));
    }

    let prior_0 = tree.registry().get(object_0).unwrap().prior_transformation();
    let prior_1 = tree.registry().get(children[0]).unwrap().prior_transformation();
    let prior_2 = tree.registry().get(children[1]).unwrap().prior_transformation();
    assert!(mat4_approx(prior_0, t0));
    assert!(mat4_approx(prior_1, t0 * t1));
    assert!(mat4_approx(prior_2, t0 * t2));
}

#[test]
fn linking_works_when_children_precede_parents() {
    let imported = ImportedScene {
        meshes: vec![],
        textures: vec![],
        materials: vec![],
        objects: vec![
            object(Some(2), Mat4::IDENTITY, None),
            object(Some(2), Mat4::IDENTITY, None),
            object(None, Mat4::IDENTITY, None),
        ],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let roots = tree.children(container);
    assert_eq!(roots.len(), 1);
    assert_eq!(tree.children(roots[0]).len(), 2);
}

#[test]
fn missing_material_defaults_to_flat_white() {
    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![],
        materials: vec![],
        objects: vec![object(None, Mat4::IDENTITY, Some(0))],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let leaf = tree.children(container)[0];
    let drawable = tree.registry().get(leaf).unwrap();
    assert_eq!(drawable.shading_mode(), ShadingMode::LitColor);
    assert_eq!(drawable.color(), Some(Vec4::ONE));
}

#[test]
fn material_without_texture_uses_full_material() {
    let diffuse = Vec4::new(0.8, 0.1, 0.1, 1.0);
    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![],
        materials: vec![Some(ImportedMaterial {
            material: PhongMaterial {
                diffuse,
                ..Default::default()
            },
            diffuse_texture: None,
        })],
        objects: vec![ImportedObject {
            material: Some(0),
            ..object(None, Mat4::IDENTITY, Some(0))
        }],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let leaf = tree.children(container)[0];
    let drawable = tree.registry().get(leaf).unwrap();
    assert_eq!(drawable.shading_mode(), ShadingMode::LitMaterial);
    assert_eq!(drawable.material().unwrap().diffuse, diffuse);
}

#[test]
fn textured_material_selects_textured_mode() {
    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![Some(TextureImage::from_rgba8(1, 1, vec![255; 4]))],
        materials: vec![Some(ImportedMaterial {
            material: PhongMaterial::default(),
            diffuse_texture: Some(0),
        })],
        objects: vec![ImportedObject {
            material: Some(0),
            ..object(None, Mat4::IDENTITY, Some(0))
        }],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let leaf = tree.children(container)[0];
    assert_eq!(
        tree.registry().get(leaf).unwrap().shading_mode(),
        ShadingMode::Textured
    );
}

#[test]
fn failed_texture_falls_back_to_flat_white() {
    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![None],
        materials: vec![Some(ImportedMaterial {
            material: PhongMaterial::default(),
            diffuse_texture: Some(0),
        })],
        objects: vec![ImportedObject {
            material: Some(0),
            ..object(None, Mat4::IDENTITY, Some(0))
        }],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let leaf = tree.children(container)[0];
    let drawable = tree.registry().get(leaf).unwrap();
    assert_eq!(drawable.shading_mode(), ShadingMode::LitColor);
    assert_eq!(drawable.color(), Some(Vec4::ONE));
}

#[test]
fn unresolved_mesh_leaves_the_node_a_group() {
    let imported = ImportedScene {
        meshes: vec![None],
        textures: vec![],
        materials: vec![],
        objects: vec![object(None, Mat4::IDENTITY, Some(0))],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let node = tree.children(container)[0];
    assert!(!tree.is_drawable(node));
    assert!(tree.registry().is_empty());
}

#[test]
fn sceneless_file_shows_first_loaded_mesh() {
    let imported = ImportedScene {
        meshes: vec![None, Some(MeshData::triangles())],
        textures: vec![],
        materials: vec![],
        objects: vec![],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    assert_eq!(tree.registry().len(), 1);
    let leaf = tree.children(container)[0];
    let drawable = tree.registry().get(leaf).unwrap();
    assert_eq!(drawable.shading_mode(), ShadingMode::LitColor);
    assert!(drawable.mesh().is_some());
}

#[test]
fn container_prior_moves_whole_import_rigidly() {
    let t1 = Mat4::from_translation(Vec3::X);
    let imported = ImportedScene {
        meshes: vec![Some(MeshData::triangles())],
        textures: vec![],
        materials: vec![],
        objects: vec![object(None, t1, Some(0))],
    };

    let mut tree = ObjectTree3::new();
    let mut assets = Assets::new();
    let root = tree.root();
    let container = spawn_scene(&mut tree, &mut assets, root, imported);

    let scale = Mat4::from_scale(Vec3::splat(0.05));
    tree.add_prior_transformation(container, scale);

    let leaf = tree.children(container)[0];
    let prior = tree.registry().get(leaf).unwrap().prior_transformation();
    assert!(mat4_approx(prior, scale * t1));
}
