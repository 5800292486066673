use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::material::Material;
use crate::math::AABB;

/// Primitive geometry, centred on its local origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    /// Flat quad in the local XY plane
    Plane { width: f32, height: f32 },
}

impl Shape {
    pub fn cuboid(size: [f32; 3]) -> Self {
        Shape::Box {
            width: size[0],
            height: size[1],
            depth: size[2],
        }
    }

    /// (width, height, depth); planes have zero depth
    pub fn dimensions(&self) -> Vec3 {
        match *self {
            Shape::Box { width, height, depth } => Vec3::new(width, height, depth),
            Shape::Plane { width, height } => Vec3::new(width, height, 0.0),
        }
    }

    pub fn local_bounds(&self) -> AABB {
        AABB::from_center_size(Vec3::ZERO, self.dimensions())
    }
}

/// Position plus XYZ Euler rotation in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quat(), self.position)
    }
}

/// A leaf of the scene: one shape, one placement, one shared material
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub material: Arc<Material>,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
}

impl Primitive {
    pub fn new(name: impl Into<String>, shape: Shape, transform: Transform, material: &Arc<Material>) -> Self {
        Self {
            name: name.into(),
            shape,
            transform,
            material: Arc::clone(material),
            casts_shadow: false,
            receives_shadow: false,
        }
    }

    /// Unrotated box at `position`
    pub fn cuboid(name: impl Into<String>, size: [f32; 3], position: Vec3, material: &Arc<Material>) -> Self {
        Self::new(name, Shape::cuboid(size), Transform::at(position), material)
    }

    pub fn casting_shadow(mut self) -> Self {
        self.casts_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receives_shadow = true;
        self
    }

    pub fn world_bounds(&self) -> AABB {
        self.shape.local_bounds().transformed(&self.transform.matrix())
    }
}
