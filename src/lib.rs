//! Interactive 3D/2D scene visualization: primitives, imported mesh scenes,
//! trajectories, and color-mapped surfaces in a window with orbit-style
//! camera control.
//!
//! Scenes are built as a tree of objects. Each object is either a *leaf*
//! carrying one drawable (mesh + appearance + accumulated prior
//! transformation) or a pure *grouping* node; every mutating operation
//! applied to a group is broadcast to its drawable descendants. Imported
//! scene files are flattened so that the whole file moves as one rigid
//! piece.
//!
//! ```no_run
//! use sciviz::{App, Primitive};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = App::new();
//!     app.add_primitive(Primitive::Cube);
//!     app.run()
//! }
//! ```

pub mod app;
pub mod assets;
pub mod camera;
pub mod color;
pub mod colormap;
pub mod error;
pub mod geometry;
pub mod import;
pub mod plot;
pub mod rendering;
pub mod scene_graph;

pub use app::App;
pub use assets::{Assets, MeshId, TextureId};
pub use camera::OrbitCamera;
pub use colormap::Colormap;
pub use error::ImportError;
pub use geometry::Primitive;
pub use rendering::mesh::{MeshData, Topology};
pub use rendering::texture::TextureImage;
pub use scene_graph::{
    Drawable, DrawableRegistry, ObjectHandle, ObjectId, ObjectId2, ObjectId3, ObjectTree,
    ObjectTree2, ObjectTree3, PhongMaterial, ShadingMode, Transformation,
};
