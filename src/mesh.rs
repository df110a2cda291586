//! Static geometry handed to the renderer.
//!
//! The interpreter treats mesh and material data as opaque values: a Draw action
//! copies them into its [`MeshGroup`](crate::interpreter::MeshGroup) and never
//! looks inside. The built-in [`MeshShape`] sources generate simple primitives
//! from `bevy_math` shape descriptions.

use bevy_math::primitives::{Cuboid, Cylinder, Rectangle, Sphere};
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// A single mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle list. Triangles wind counter-clockwise when seen from
/// outside the shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a quad `a b c d` (counter-clockwise) as two triangles.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&p| Vertex::new(p, normal)));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Surface appearance for a drawn shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGBA color.
    pub color: Vec4,
}

impl Material {
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: Vec4::new(r, g, b, a),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self { color: Vec4::ONE }
    }
}

/// Something that can produce [`MeshData`] for a Draw action.
pub trait MeshSource {
    /// Short human-readable label, e.g. `"Cylinder"`.
    fn name(&self) -> &str;

    fn generate_mesh(&self) -> MeshData;
}

impl MeshSource for MeshData {
    fn name(&self) -> &str {
        "Mesh"
    }

    fn generate_mesh(&self) -> MeshData {
        self.clone()
    }
}

/// Built-in primitive shapes.
///
/// Every shape is expressed in the turtle's local frame, where `+Y` is the
/// growth direction. Cylinders sit on the origin so that a Move of the same
/// length lands the turtle on the top cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshShape {
    /// A rectangle in the XY plane facing `+Z`.
    Quad(Rectangle),
    /// An axis-aligned box centered on the origin.
    Cuboid(Cuboid),
    /// A capped cylinder spanning `y = 0 ..= height`.
    Cylinder { shape: Cylinder, resolution: u32 },
    /// A UV sphere centered on the origin.
    Sphere {
        shape: Sphere,
        sectors: u32,
        stacks: u32,
    },
}

impl MeshShape {
    pub fn quad(width: f32, height: f32) -> Self {
        Self::Quad(Rectangle::new(width, height))
    }

    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Self::Cuboid(Cuboid::new(x, y, z))
    }

    /// A cylinder with 16 side segments.
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder {
            shape: Cylinder::new(radius, height),
            resolution: 16,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            shape: Sphere::new(radius),
            sectors: 16,
            stacks: 8,
        }
    }
}

impl MeshSource for MeshShape {
    fn name(&self) -> &str {
        match self {
            Self::Quad(_) => "Quad",
            Self::Cuboid(_) => "Cuboid",
            Self::Cylinder { .. } => "Cylinder",
            Self::Sphere { .. } => "Sphere",
        }
    }

    fn generate_mesh(&self) -> MeshData {
        match *self {
            Self::Quad(rect) => quad_mesh(rect),
            Self::Cuboid(cuboid) => cuboid_mesh(cuboid),
            Self::Cylinder { shape, resolution } => cylinder_mesh(shape, resolution.max(3)),
            Self::Sphere {
                shape,
                sectors,
                stacks,
            } => sphere_mesh(shape, sectors.max(3), stacks.max(2)),
        }
    }
}

fn quad_mesh(rect: Rectangle) -> MeshData {
    let (hx, hy) = (rect.half_size.x, rect.half_size.y);
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hx, -hy, 0.0),
            Vec3::new(hx, -hy, 0.0),
            Vec3::new(hx, hy, 0.0),
            Vec3::new(-hx, hy, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

fn cuboid_mesh(cuboid: Cuboid) -> MeshData {
    let half = cuboid.half_size;
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let (c, u, v) = (n * half, u * half, v * half);
        mesh.push_quad([c - u - v, c + u - v, c + u + v, c - u + v], n);
    }
    mesh
}

fn cylinder_mesh(cylinder: Cylinder, resolution: u32) -> MeshData {
    let radius = cylinder.radius;
    let height = cylinder.half_height * 2.0;
    let ring: Vec<Vec3> = (0..=resolution)
        .map(|i| {
            let angle = i as f32 / resolution as f32 * TAU;
            Vec3::new(angle.cos(), 0.0, angle.sin())
        })
        .collect();

    let mut mesh = MeshData::default();

    // Side: interleaved bottom/top pairs.
    for &dir in &ring {
        let bottom = dir * radius;
        mesh.vertices.push(Vertex::new(bottom, dir));
        mesh.vertices
            .push(Vertex::new(bottom + Vec3::Y * height, dir));
    }
    for i in 0..resolution {
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        mesh.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
    }

    // Caps: a center vertex fanned to its own ring.
    for (y, normal) in [(0.0, Vec3::NEG_Y), (height, Vec3::Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices
            .push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
        mesh.vertices.extend(
            ring.iter()
                .map(|&dir| Vertex::new(dir * radius + Vec3::Y * y, normal)),
        );
        for i in 0..resolution {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if normal.y < 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    mesh
}

fn sphere_mesh(sphere: Sphere, sectors: u32, stacks: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for i in 0..=stacks {
        let phi = i as f32 / stacks as f32 * PI;
        for j in 0..=sectors {
            let theta = j as f32 / sectors as f32 * TAU;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.vertices
                .push(Vertex::new(normal * sphere.radius, normal));
        }
    }

    let row = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * row + j;
            let k2 = k1 + row;
            mesh.indices
                .extend_from_slice(&[k1, k1 + 1, k2, k1 + 1, k2 + 1, k2]);
        }
    }
    mesh
}

/// A placement in world space.
///
/// Used both as the turtle's frame and as an emitted instance. `rotation` holds
/// Euler angles in degrees, applied around z, then y, then x.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// The Euler rotation as a quaternion (`Rz * Ry * Rx`).
    pub fn quat(&self) -> Quat {
        euler_quat(self.rotation)
    }

    /// Model matrix (translation * rotation * uniform scale) for instancing.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Converts Euler angles in degrees to a quaternion, rolling around z first,
/// then y, then x.
pub fn euler_quat(degrees: Vec3) -> Quat {
    Quat::from_rotation_z(degrees.z.to_radians())
        * Quat::from_rotation_y(degrees.y.to_radians())
        * Quat::from_rotation_x(degrees.x.to_radians())
}
