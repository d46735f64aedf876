//! The application shell: owns the object trees, assets, and cameras,
//! exposes the user-facing scene operations, and drives the window loop.
//!
//! Scene construction happens before the window exists; all GPU resources
//! are created lazily on the first frame.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use glam::{Vec2, Vec3, Vec4};
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::assets::Assets;
use crate::camera::OrbitCamera;
use crate::color;
use crate::colormap::Colormap;
use crate::error::ImportError;
use crate::geometry::{self, Primitive};
use crate::import::{self, ImportedScene};
use crate::plot;
use crate::rendering::Renderer;
use crate::scene_graph::{
    ObjectHandle, ObjectHandle2, ObjectHandle3, ObjectId3, ObjectTree2, ObjectTree3,
};

pub struct App {
    tree_3d: ObjectTree3,
    tree_2d: ObjectTree2,
    assets: Assets,
    camera: OrbitCamera,
    background: Vec4,
}

impl App {
    pub fn new() -> Self {
        Self {
            tree_3d: ObjectTree3::new(),
            tree_2d: ObjectTree2::new(),
            assets: Assets::new(),
            camera: OrbitCamera::new(),
            background: Vec4::new(0.12, 0.12, 0.12, 1.0),
        }
    }

    /// Handle to the root of the 3D tree. A prior transformation added here
    /// rescales or moves every drawable in the scene at once.
    pub fn manipulator(&mut self) -> ObjectHandle3<'_> {
        let root = self.tree_3d.root();
        ObjectHandle::new(&mut self.tree_3d, root)
    }

    pub fn num_objects(&self) -> usize {
        self.tree_3d.registry().len() + self.tree_2d.registry().len()
    }

    pub fn tree_3d(&self) -> &ObjectTree3 {
        &self.tree_3d
    }

    pub fn tree_2d(&self) -> &ObjectTree2 {
        &self.tree_2d
    }

    /// Decodes an image file for use with `set_texture` on a drawable.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> anyhow::Result<crate::assets::TextureId> {
        self.assets.load_texture(path.as_ref())
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn set_background(&mut self, color_name: &str) -> &mut Self {
        self.background = color::named_or_white(color_name);
        self
    }

    /// Adds a primitive solid with the default white material.
    pub fn add_primitive(&mut self, primitive: Primitive) -> ObjectHandle3<'_> {
        let mesh = self.assets.add_mesh(primitive.mesh());
        let root = self.tree_3d.root();
        let object = self.tree_3d.create_object(root);

        let (inserted, drawable) = self.tree_3d.registry_mut().get_or_create(object);
        if inserted {
            drawable.set_mesh(mesh).set_color(color::WHITE);
        }

        ObjectHandle::new(&mut self.tree_3d, object)
    }

    /// Adds an RGB cartesian frame at the origin.
    pub fn add_frame(&mut self) -> ObjectHandle3<'_> {
        let mesh = self.assets.add_mesh(geometry::axis_frame());
        let root = self.tree_3d.root();
        let object = self.tree_3d.create_object(root);

        let (inserted, drawable) = self.tree_3d.registry_mut().get_or_create(object);
        if inserted {
            drawable.set_mesh(mesh);
        }

        ObjectHandle::new(&mut self.tree_3d, object)
    }

    /// Plots a polyline. The returned handle is a grouping node above the
    /// actual line drawable, so transformations and broadcasts applied to it
    /// reach the line through the usual dispatch.
    pub fn trajectory(&mut self, points: &[Vec3], color_name: &str) -> ObjectHandle3<'_> {
        let color = color::named_or_white(color_name);
        let mesh = self
            .assets
            .add_mesh(plot::trajectory_mesh(points, color.truncate()));

        let root = self.tree_3d.root();
        let group = self.tree_3d.create_object(root);
        let leaf = self.tree_3d.create_object(group);

        let (inserted, drawable) = self.tree_3d.registry_mut().get_or_create(leaf);
        if inserted {
            drawable.set_mesh(mesh);
        }

        ObjectHandle::new(&mut self.tree_3d, group)
    }

    /// Plots a color-mapped triangle surface. `values` are mapped linearly
    /// into `[min, max]` through the colormap, one entry per vertex.
    pub fn surface(
        &mut self,
        vertices: &[Vec3],
        values: &[f64],
        triangles: &[[u32; 3]],
        min: f64,
        max: f64,
        map: Colormap,
    ) -> ObjectHandle3<'_> {
        let mesh = self
            .assets
            .add_mesh(plot::surface_mesh(vertices, values, triangles, min, max, map));

        let root = self.tree_3d.root();
        let object = self.tree_3d.create_object(root);

        let (inserted, drawable) = self.tree_3d.registry_mut().get_or_create(object);
        if inserted {
            drawable.set_mesh(mesh);
        }

        ObjectHandle::new(&mut self.tree_3d, object)
    }

    /// Attaches a colorbar legend to the 2D overlay.
    pub fn colorbar(&mut self, min: f64, max: f64, map: Colormap) -> ObjectHandle2<'_> {
        log::debug!("colorbar range [{min}, {max}]");
        let mesh = self.assets.add_mesh(plot::colorbar_mesh(map));

        let root = self.tree_2d.root();
        let object = self.tree_2d.create_object(root);

        let (inserted, drawable) = self.tree_2d.registry_mut().get_or_create(object);
        if inserted {
            drawable.set_mesh(mesh);
        }

        ObjectHandle::new(&mut self.tree_2d, object)
    }

    /// Imports a scene file under a fresh container object and returns the
    /// container, so one transformation moves the whole import.
    ///
    /// Startup-precondition failures (unsupported format, unopenable file,
    /// unreadable scene) terminate the process with a cause-specific exit
    /// code; use [`try_import`](Self::try_import) to handle them instead.
    /// Per-asset decode failures degrade to defaults and only warn.
    pub fn import(&mut self, path: impl AsRef<Path>) -> ObjectHandle3<'_> {
        match self.try_import(path.as_ref()) {
            Ok(container) => ObjectHandle::new(&mut self.tree_3d, container),
            Err(error) => {
                log::error!("{error}");
                std::process::exit(error.exit_code());
            }
        }
    }

    pub fn try_import(&mut self, path: &Path) -> Result<ObjectId3, ImportError> {
        let imported = ImportedScene::from_file(path)?;
        let root = self.tree_3d.root();
        Ok(import::spawn_scene(
            &mut self.tree_3d,
            &mut self.assets,
            root,
            imported,
        ))
    }

    /// Opens the window and runs the event loop until the window closes.
    pub fn run(self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut shell = Shell {
            app: self,
            renderer: None,
            left_button_down: false,
            cursor_position: None,
        };
        event_loop.run_app(&mut shell)?;
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Winit driver around the [`App`] state: window creation on resume, orbit
/// camera input, and the per-frame render call.
struct Shell {
    app: App,
    renderer: Option<Renderer>,
    left_button_down: bool,
    cursor_position: Option<Vec2>,
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        let attributes = Window::default_attributes().with_title("Science Graphics");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                log::error!("failed to create window: {error}");
                event_loop.exit();
                return;
            }
        };
        match Renderer::new(window) {
            Ok(renderer) => {
                renderer.window.request_redraw();
                self.renderer = Some(renderer);
            }
            Err(error) => {
                log::error!("failed to initialize rendering: {error:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => renderer.resize(size),
            WindowEvent::RedrawRequested => {
                renderer.window.request_redraw();
                match renderer.render(
                    &self.app.tree_3d,
                    &self.app.tree_2d,
                    &self.app.assets,
                    &self.app.camera,
                    self.app.background,
                ) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = renderer.window.inner_size();
                        renderer.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => log::warn!("surface timeout"),
                    Err(other) => log::error!("unexpected surface error: {other:?}"),
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.left_button_down = state.is_pressed();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if self.left_button_down {
                    if let Some(previous) = self.cursor_position {
                        self.app.camera.orbit(position - previous);
                    }
                }
                self.cursor_position = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                self.app.camera.dolly(amount);
            }
            _ => {}
        }
    }
}
