//! Object tree, drawable registry, and flattening-pass tests:
//! - broadcast dispatch (leaf vs. group, no-op edge cases)
//! - registry idempotence and removal ordering
//! - prior-transformation composition order
//! - flattening preserving world-space results

use glam::{Mat4, Vec3, Vec4};
use sciviz::{Assets, Drawable, MeshData, MeshId, ObjectId3, ObjectTree3, ShadingMode, TextureImage};

const EPSILON: f32 = 1e-5;

fn mat4_approx(a: Mat4, b: Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() < EPSILON)
}

fn test_mesh(assets: &mut Assets) -> MeshId {
    assets.add_mesh(MeshData::triangles())
}

/// Builds a tree with two groups holding three drawable leaves total, plus
/// one empty group. Returns (tree, leaves).
fn tree_with_three_leaves(assets: &mut Assets) -> (ObjectTree3, Vec<ObjectId3>) {
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let group_a = tree.create_object(root);
    let group_b = tree.create_object(root);
    let _empty_group = tree.create_object(root);

    let mut leaves = Vec::new();
    for parent in [group_a, group_a, group_b] {
        let leaf = tree.create_object(parent);
        let mesh = test_mesh(assets);
        let (inserted, drawable) = tree.registry_mut().get_or_create(leaf);
        assert!(inserted);
        drawable.set_mesh(mesh);
        leaves.push(leaf);
    }

    (tree, leaves)
}

// ============================================================================
// Broadcast protocol
// ============================================================================

#[test]
fn broadcast_reaches_all_drawable_leaves() {
    let mut assets = Assets::new();
    let (mut tree, leaves) = tree_with_three_leaves(&mut assets);

    let color = Vec4::new(0.0, 1.0, 0.0, 1.0);
    let root = tree.root();
    tree.set_color(root, color);

    assert_eq!(tree.registry().len(), 3);
    for &leaf in &leaves {
        assert_eq!(tree.registry().get(leaf).unwrap().color(), Some(color));
    }

    // Each drawable descendant is reached exactly once: a broadcast prior
    // transformation composes a single time per leaf.
    let shift = Mat4::from_translation(Vec3::X);
    tree.add_prior_transformation(root, shift);
    for leaf in leaves {
        let prior = tree.registry().get(leaf).unwrap().prior_transformation();
        assert!(mat4_approx(prior, shift));
    }
}

#[test]
fn broadcast_on_childless_group_is_noop() {
    let mut tree = ObjectTree3::new();
    let root = tree.root();
    let group = tree.create_object(root);

    tree.set_color(group, Vec4::ONE);

    assert!(tree.registry().is_empty());
    assert!(!tree.is_drawable(group));
}

#[test]
fn broadcast_applies_directly_to_leaf_without_descending() {
    let mut assets = Assets::new();
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    // A registered node that also has a registered child: the mutator stops
    // at the first drawable it meets.
    let parent_leaf = tree.create_object(root);
    let child_leaf = tree.create_object(parent_leaf);
    for id in [parent_leaf, child_leaf] {
        let mesh = test_mesh(&mut assets);
        tree.registry_mut().get_or_create(id).1.set_mesh(mesh);
    }

    let color = Vec4::new(1.0, 0.0, 0.0, 1.0);
    tree.set_color(parent_leaf, color);

    assert_eq!(tree.registry().get(parent_leaf).unwrap().color(), Some(color));
    assert_eq!(tree.registry().get(child_leaf).unwrap().color(), None);
}

#[test]
fn is_drawable_follows_registry_membership() {
    let mut tree = ObjectTree3::new();
    let root = tree.root();
    let object = tree.create_object(root);

    assert!(!tree.is_drawable(object));
    tree.registry_mut().get_or_create(object);
    assert!(tree.is_drawable(object));
    tree.registry_mut().remove(object);
    assert!(!tree.is_drawable(object));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn registry_get_or_create_is_idempotent() {
    let mut tree = ObjectTree3::new();
    let root = tree.root();
    let object = tree.create_object(root);

    let color = Vec4::new(1.0, 0.0, 1.0, 1.0);
    let (inserted, drawable) = tree.registry_mut().get_or_create(object);
    assert!(inserted);
    drawable.set_color(color);

    let (inserted_again, existing) = tree.registry_mut().get_or_create(object);
    assert!(!inserted_again);
    assert_eq!(existing.color(), Some(color));
    assert_eq!(tree.registry().len(), 1);
}

#[test]
fn registry_removal_keeps_remaining_draw_order() {
    let mut assets = Assets::new();
    let (mut tree, leaves) = tree_with_three_leaves(&mut assets);

    // Split the three leaves over two shading groups: the outer two lit,
    // the middle one left vertex-colored.
    let grey = Vec4::new(0.5, 0.5, 0.5, 1.0);
    for &leaf in [&leaves[0], &leaves[2]] {
        tree.registry_mut().get_mut(leaf).unwrap().set_color(grey);
    }
    assert_eq!(
        tree.registry().get(leaves[1]).unwrap().shading_mode(),
        ShadingMode::VertexColor
    );

    tree.registry_mut().remove(leaves[1]);

    let order: Vec<_> = tree.registry().iter().map(|(id, _)| id).collect();
    assert_eq!(order, vec![leaves[0], leaves[2]]);
    for leaf in order {
        assert_eq!(tree.registry().get(leaf).unwrap().color(), Some(grey));
    }
}

#[test]
fn removing_a_subtree_erases_its_registry_entries() {
    let mut assets = Assets::new();
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let group = tree.create_object(root);
    let inner = tree.create_object(group);
    let kept = tree.create_object(root);
    for id in [inner, kept] {
        let mesh = test_mesh(&mut assets);
        tree.registry_mut().get_or_create(id).1.set_mesh(mesh);
    }

    tree.remove_object(group);

    assert!(!tree.is_drawable(inner));
    assert!(tree.is_drawable(kept));
    assert_eq!(tree.registry().len(), 1);
    assert!(!tree.children(root).contains(&group));
}

// ============================================================================
// Prior transformation composition
// ============================================================================

#[test]
fn prior_transformation_composes_on_the_left() {
    let a = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let b = Mat4::from_scale(Vec3::splat(2.0));

    let mut drawable = Drawable::<Mat4>::new();
    drawable.add_prior_transformation(a);
    drawable.add_prior_transformation(b);

    assert!(mat4_approx(drawable.prior_transformation(), b * a));
    assert!(!mat4_approx(drawable.prior_transformation(), a * b));
}

#[test]
fn effective_transformation_applies_prior_after_view() {
    let prior = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));
    let view = Mat4::from_scale(Vec3::splat(2.0));

    let mut drawable = Drawable::<Mat4>::new();
    drawable.add_prior_transformation(prior);

    assert!(mat4_approx(
        drawable.effective_transformation(view),
        view * prior
    ));
}

// ============================================================================
// Shading-mode priority
// ============================================================================

#[test]
fn shading_mode_priority_texture_beats_material_beats_color() {
    let mut assets = Assets::new();
    let texture = assets.add_texture(TextureImage::from_rgba8(1, 1, vec![255; 4]));

    let mut drawable = Drawable::<Mat4>::new();
    assert_eq!(drawable.shading_mode(), ShadingMode::VertexColor);

    drawable.set_color(Vec4::ONE);
    assert_eq!(drawable.shading_mode(), ShadingMode::LitColor);

    drawable.set_material(Default::default());
    assert_eq!(drawable.shading_mode(), ShadingMode::LitMaterial);

    drawable.set_texture(texture);
    assert_eq!(drawable.shading_mode(), ShadingMode::Textured);
}

// ============================================================================
// Flattening pass
// ============================================================================

#[test]
fn flattening_preserves_world_transform() {
    let mut assets = Assets::new();
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let r = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let c = Mat4::from_scale(Vec3::splat(0.5));

    let parent = tree.create_object(root);
    tree.set_transformation(parent, r);
    let child = tree.create_object(parent);
    tree.set_transformation(child, c);
    let mesh = test_mesh(&mut assets);
    tree.registry_mut().get_or_create(child).1.set_mesh(mesh);

    let view = Mat4::from_translation(Vec3::new(-4.0, 0.0, 1.0));
    let effective_before = tree
        .registry()
        .get(child)
        .unwrap()
        .effective_transformation(view * tree.world_transformation(child));

    tree.flatten_into_prior(parent, Mat4::IDENTITY);

    assert!(mat4_approx(tree.transformation(parent), Mat4::IDENTITY));
    assert!(mat4_approx(tree.transformation(child), Mat4::IDENTITY));

    let drawable = tree.registry().get(child).unwrap();
    assert!(mat4_approx(drawable.prior_transformation(), r * c));

    let effective_after =
        drawable.effective_transformation(view * tree.world_transformation(child));
    assert!(mat4_approx(effective_before, effective_after));
    assert!(mat4_approx(effective_after, view * r * c));
}

#[test]
fn flattening_lets_a_single_prior_move_the_subtree() {
    let mut assets = Assets::new();
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let container = tree.create_object(root);
    let leaf = tree.create_object(container);
    tree.set_transformation(leaf, Mat4::from_translation(Vec3::X));
    let mesh = test_mesh(&mut assets);
    tree.registry_mut().get_or_create(leaf).1.set_mesh(mesh);

    tree.flatten_into_prior(container, Mat4::IDENTITY);

    // One broadcastable transformation at the container scales the whole
    // import without re-walking the hierarchy.
    let scale = Mat4::from_scale(Vec3::splat(0.1));
    tree.add_prior_transformation(container, scale);

    let drawable = tree.registry().get(leaf).unwrap();
    assert!(mat4_approx(
        drawable.prior_transformation(),
        scale * Mat4::from_translation(Vec3::X)
    ));
}

// ============================================================================
// Scenario A: broadcast overwrites, last write wins
// ============================================================================

#[test]
fn scenario_a_root_broadcast_overwrites_leaf_color() {
    let mut assets = Assets::new();
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let leaf = tree.create_object(root);
    let mesh = test_mesh(&mut assets);
    let (_, drawable) = tree.registry_mut().get_or_create(leaf);
    drawable
        .set_mesh(mesh)
        .set_color(Vec4::new(1.0, 0.0, 0.0, 1.0));

    let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
    tree.set_color(root, green);

    assert_eq!(tree.registry().get(leaf).unwrap().color(), Some(green));
}

// ============================================================================
// World transformation accumulation
// ============================================================================

#[test]
fn world_transformation_is_root_to_leaf_product() {
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let a = tree.create_object(root);
    let b = tree.create_object(a);
    tree.set_transformation(a, Mat4::from_translation(Vec3::X));
    tree.set_transformation(b, Mat4::from_translation(Vec3::Y));

    let expected = Mat4::from_translation(Vec3::X) * Mat4::from_translation(Vec3::Y);
    assert!(mat4_approx(tree.world_transformation(b), expected));
}

#[test]
fn reattaching_changes_world_transformation() {
    let mut tree = ObjectTree3::new();
    let root = tree.root();

    let a = tree.create_object(root);
    let b = tree.create_object(root);
    let child = tree.create_object(a);
    tree.set_transformation(a, Mat4::from_translation(Vec3::X));
    tree.set_transformation(b, Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));

    tree.attach(child, b);

    assert_eq!(tree.parent(child), Some(b));
    assert!(!tree.children(a).contains(&child));
    assert!(mat4_approx(
        tree.world_transformation(child),
        Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0))
    ));
}
