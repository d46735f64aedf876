pub mod context;
pub mod mesh;
pub mod pipelines;
pub mod renderer;
pub mod texture;

pub use renderer::Renderer;
