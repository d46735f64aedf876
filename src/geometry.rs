//! Procedural primitive meshes.
//!
//! All solids are generated with outward normals, centered at the origin,
//! with their long axis along Y. Radii are 1.0; callers scale via the object
//! transformation.

use std::f32::consts::PI;

use glam::Vec3;

use crate::rendering::mesh::MeshData;

/// The built-in primitive shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Sphere,
    Capsule,
    Cone,
    Cylinder,
}

impl Primitive {
    pub fn mesh(self) -> MeshData {
        match self {
            Primitive::Cube => cube(),
            Primitive::Sphere => sphere(32, 16),
            Primitive::Capsule => capsule(10, 10, 30, 0.5),
            Primitive::Cone => cone(10, 30, 1.0),
            Primitive::Cylinder => cylinder(10, 30, 1.0),
        }
    }
}

/// Unit cube from -0.5 to 0.5, four vertices per face so each face gets a
/// flat normal.
pub fn cube() -> MeshData {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        // (normal, tangent u, tangent v)
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut mesh = MeshData::triangles();
    for (face, &(normal, u, v)) in faces.iter().enumerate() {
        let base = (face * 4) as u32;
        let center = normal * 0.5;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            mesh.positions.push(center + u * su + v * sv);
            mesh.normals.push(normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// Latitude/longitude sphere of radius 1.
pub fn sphere(segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut mesh = MeshData::triangles();
    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let point = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            mesh.positions.push(point);
            mesh.normals.push(point);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let first = ring * stride + segment;
            let second = first + stride;
            mesh.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }
    mesh
}

/// Capped cylinder of radius 1, extending `half_length` above and below the
/// origin along Y.
pub fn cylinder(rings: u32, segments: u32, half_length: f32) -> MeshData {
    let rings = rings.max(1);
    let segments = segments.max(3);

    let mut mesh = MeshData::triangles();

    // Side wall
    for ring in 0..=rings {
        let y = half_length - 2.0 * half_length * ring as f32 / rings as f32;
        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            mesh.positions.push(Vec3::new(cos_phi, y, sin_phi));
            mesh.normals.push(Vec3::new(cos_phi, 0.0, sin_phi));
        }
    }
    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let first = ring * stride + segment;
            let second = first + stride;
            mesh.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    add_cap(&mut mesh, segments, half_length, Vec3::Y);
    add_cap(&mut mesh, segments, -half_length, Vec3::NEG_Y);
    mesh
}

/// Cone of base radius 1 with apex at `+half_length` and a capped base at
/// `-half_length`.
pub fn cone(rings: u32, segments: u32, half_length: f32) -> MeshData {
    let rings = rings.max(1);
    let segments = segments.max(3);

    let mut mesh = MeshData::triangles();

    // Side wall, radius tapering to zero at the apex. The slope normal is
    // constant along a meridian: normalize((cos, r/h-ish, sin)).
    let slope = 2.0 * half_length;
    for ring in 0..=rings {
        let t = ring as f32 / rings as f32;
        let y = half_length - 2.0 * half_length * t;
        let radius = t;
        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            mesh.positions
                .push(Vec3::new(radius * cos_phi, y, radius * sin_phi));
            mesh.normals
                .push(Vec3::new(cos_phi * slope, 1.0, sin_phi * slope).normalize());
        }
    }
    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let first = ring * stride + segment;
            let second = first + stride;
            mesh.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    add_cap(&mut mesh, segments, -half_length, Vec3::NEG_Y);
    mesh
}

/// Capsule: a cylinder of `half_length` half-height with hemispherical end
/// caps of radius 1.
pub fn capsule(hemisphere_rings: u32, cylinder_rings: u32, segments: u32, half_length: f32) -> MeshData {
    let hemisphere_rings = hemisphere_rings.max(1);
    let cylinder_rings = cylinder_rings.max(1);
    let segments = segments.max(3);

    let mut mesh = MeshData::triangles();

    // One continuous vertex grid from the top pole to the bottom pole: top
    // hemisphere, cylinder wall, bottom hemisphere.
    for ring in 0..=hemisphere_rings {
        let theta = ring as f32 * 0.5 * PI / hemisphere_rings as f32;
        push_ring_sphere(&mut mesh, segments, theta, half_length);
    }
    for ring in 1..cylinder_rings {
        let y = half_length - 2.0 * half_length * ring as f32 / cylinder_rings as f32;
        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            mesh.positions.push(Vec3::new(cos_phi, y, sin_phi));
            mesh.normals.push(Vec3::new(cos_phi, 0.0, sin_phi));
        }
    }
    for ring in 0..=hemisphere_rings {
        let theta = 0.5 * PI + ring as f32 * 0.5 * PI / hemisphere_rings as f32;
        push_ring_sphere(&mut mesh, segments, theta, -half_length);
    }

    let total_rings = 2 * hemisphere_rings + cylinder_rings;
    let stride = segments + 1;
    for ring in 0..total_rings {
        for segment in 0..segments {
            let first = ring * stride + segment;
            let second = first + stride;
            mesh.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }
    mesh
}

fn push_ring_sphere(mesh: &mut MeshData, segments: u32, theta: f32, center_y: f32) {
    let (sin_theta, cos_theta) = theta.sin_cos();
    for segment in 0..=segments {
        let phi = segment as f32 * 2.0 * PI / segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
        mesh.positions.push(normal + Vec3::new(0.0, center_y, 0.0));
        mesh.normals.push(normal);
    }
}

fn add_cap(mesh: &mut MeshData, segments: u32, y: f32, normal: Vec3) {
    let base = mesh.positions.len() as u32;
    mesh.positions.push(Vec3::new(0.0, y, 0.0));
    mesh.normals.push(normal);
    for segment in 0..=segments {
        let phi = segment as f32 * 2.0 * PI / segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        mesh.positions.push(Vec3::new(cos_phi, y, sin_phi));
        mesh.normals.push(normal);
    }
    for segment in 0..segments {
        let (a, b) = (base + 1 + segment, base + 2 + segment);
        // Wind so the cap faces along `normal`
        if normal.y > 0.0 {
            mesh.indices.extend_from_slice(&[base, b, a]);
        } else {
            mesh.indices.extend_from_slice(&[base, a, b]);
        }
    }
}

/// RGB axis cross: X red, Y green, Z blue, as a vertex-colored line list.
pub fn axis_frame() -> MeshData {
    let mut mesh = MeshData::lines();
    let axes = [
        (Vec3::X, Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::Y, Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::Z, Vec3::new(0.0, 0.0, 1.0)),
    ];
    for (direction, color) in axes {
        mesh.positions.push(Vec3::ZERO);
        mesh.positions.push(direction);
        mesh.colors.push(color);
        mesh.colors.push(color);
    }
    mesh
}
