//! Surface material presets.
//!
//! Materials are created once per scene and shared through `Arc` by every
//! primitive that uses them.

use glam::Vec3;

use crate::math::hex_to_linear;

/// Parameters common to every material variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    /// Linear base color
    pub color: Vec3,
    /// 0.0 = mirror, 1.0 = fully diffuse
    pub roughness: f32,
    /// 0.0 = dielectric, 1.0 = metal
    pub metalness: f32,
}

impl SurfaceParams {
    pub fn from_hex(hex: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color: hex_to_linear(hex),
            roughness,
            metalness,
        }
    }
}

/// Semantic category of a material, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    OpaqueRough,
    TransmissiveGlazing,
    MetallicReflective,
    OpaqueWood,
    EmissiveAccent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Masonry, concrete, ground
    OpaqueRough(SurfaceParams),
    /// Glass with refraction parameters
    TransmissiveGlazing {
        surface: SurfaceParams,
        transmission: f32,
        thickness: f32,
        ior: f32,
        reflectivity: f32,
    },
    MetallicReflective(SurfaceParams),
    OpaqueWood(SurfaceParams),
    /// Self-lit accent (LED strips)
    EmissiveAccent {
        surface: SurfaceParams,
        emissive: Vec3,
        emissive_intensity: f32,
    },
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::OpaqueRough(_) => MaterialKind::OpaqueRough,
            Material::TransmissiveGlazing { .. } => MaterialKind::TransmissiveGlazing,
            Material::MetallicReflective(_) => MaterialKind::MetallicReflective,
            Material::OpaqueWood(_) => MaterialKind::OpaqueWood,
            Material::EmissiveAccent { .. } => MaterialKind::EmissiveAccent,
        }
    }

    pub fn surface(&self) -> &SurfaceParams {
        match self {
            Material::OpaqueRough(surface)
            | Material::MetallicReflective(surface)
            | Material::OpaqueWood(surface) => surface,
            Material::TransmissiveGlazing { surface, .. } | Material::EmissiveAccent { surface, .. } => {
                surface
            }
        }
    }

    /// Emitted radiance (zero for non-emissive materials)
    pub fn emission(&self) -> Vec3 {
        match self {
            Material::EmissiveAccent {
                emissive,
                emissive_intensity,
                ..
            } => *emissive * *emissive_intensity,
            _ => Vec3::ZERO,
        }
    }

    /// Fraction of light passing through the surface
    pub fn transmission(&self) -> f32 {
        match self {
            Material::TransmissiveGlazing { transmission, .. } => *transmission,
            _ => 0.0,
        }
    }

    /// Index of refraction; 1.5 for materials that do not declare one
    pub fn ior(&self) -> f32 {
        match self {
            Material::TransmissiveGlazing { ior, .. } => *ior,
            _ => 1.5,
        }
    }
}
