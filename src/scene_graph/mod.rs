use std::fmt::Debug;
use std::ops::Mul;

use glam::{Mat3, Mat4};

pub mod drawable;
pub mod handle;
pub mod node;
pub mod tree;

pub use drawable::{Drawable, DrawableRegistry, PhongMaterial, ShadingMode};
pub use handle::ObjectHandle;
pub use node::{ObjectId, TransformNode};
pub use tree::ObjectTree;

/// Local transformation type of a scene dimension: `Mat4` for 3D trees,
/// `Mat3` for 2D trees. Composition is plain matrix multiplication with the
/// parent on the left.
pub trait Transformation:
    Copy + PartialEq + Mul<Output = Self> + Debug + Send + Sync + 'static
{
    const IDENTITY: Self;
}

impl Transformation for Mat4 {
    const IDENTITY: Self = Mat4::IDENTITY;
}

impl Transformation for Mat3 {
    const IDENTITY: Self = Mat3::IDENTITY;
}

pub type ObjectTree3 = ObjectTree<Mat4>;
pub type ObjectTree2 = ObjectTree<Mat3>;
pub type ObjectId3 = ObjectId<Mat4>;
pub type ObjectId2 = ObjectId<Mat3>;
pub type ObjectHandle3<'a> = ObjectHandle<'a, Mat4>;
pub type ObjectHandle2<'a> = ObjectHandle<'a, Mat3>;
