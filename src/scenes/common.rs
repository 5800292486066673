use std::sync::Arc;

use glam::Vec3;

use crate::material::{Material, SurfaceParams};
use crate::math::hex_to_linear;

pub const MULLION_COUNT: usize = 7;
pub const GLAZING_WIDTH: f32 = 8.4;

pub const FIN_COUNT: usize = 17;
pub const FIN_SPACING: f32 = 0.5;
pub const FIN_BASE_HEIGHT: f32 = 1.9;
pub const FIN_AMPLITUDE: f32 = 0.2;
pub const FIN_PHASE: f32 = 0.5;

/// Height of fin `index`: a sine perturbation that keeps the skyline irregular
pub fn fin_height(index: usize) -> f32 {
    FIN_BASE_HEIGHT + FIN_AMPLITUDE * (index as f32 * FIN_PHASE).sin()
}

/// Horizontal offset of fin `index` within the fin group
pub fn fin_offset(index: usize) -> f32 {
    -4.2 + index as f32 * FIN_SPACING
}

/// Horizontal offset of mullion `index`, evenly dividing the glazing band
pub fn mullion_offset(index: usize) -> f32 {
    -3.6 + index as f32 * (GLAZING_WIDTH / (MULLION_COUNT - 1) as f32)
}

/// Translation-only parent frame used to lay out related parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group {
    pub origin: Vec3,
}

impl Group {
    pub fn root() -> Self {
        Self { origin: Vec3::ZERO }
    }

    pub fn child(&self, offset: Vec3) -> Self {
        Self {
            origin: self.origin + offset,
        }
    }

    /// World position of a point given in this group's frame
    pub fn at(&self, local: Vec3) -> Vec3 {
        self.origin + local
    }
}

/// The six materials the facade is assembled from
#[derive(Debug, Clone)]
pub struct FacadePalette {
    pub concrete: Arc<Material>,
    pub glass: Arc<Material>,
    pub metal: Arc<Material>,
    pub wood: Arc<Material>,
    pub led: Arc<Material>,
    pub ground: Arc<Material>,
}

impl FacadePalette {
    pub fn new() -> Self {
        Self {
            concrete: Arc::new(Material::OpaqueRough(SurfaceParams::from_hex(0x8b8f94, 0.9, 0.05))),
            glass: Arc::new(Material::TransmissiveGlazing {
                surface: SurfaceParams::from_hex(0xbcd0ff, 0.05, 0.0),
                transmission: 1.0,
                thickness: 0.2,
                ior: 1.45,
                reflectivity: 0.9,
            }),
            metal: Arc::new(Material::MetallicReflective(SurfaceParams::from_hex(0xb5bcc6, 0.25, 1.0))),
            wood: Arc::new(Material::OpaqueWood(SurfaceParams::from_hex(0x9a6b3d, 0.8, 0.05))),
            led: Arc::new(Material::EmissiveAccent {
                surface: SurfaceParams::from_hex(0x111111, 0.4, 0.1),
                emissive: hex_to_linear(0xcfe8ff),
                emissive_intensity: 2.4,
            }),
            ground: Arc::new(Material::OpaqueRough(SurfaceParams::from_hex(0x1b1f24, 1.0, 0.0))),
        }
    }
}

impl Default for FacadePalette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fin_height_first_fin_is_base() {
        assert!((fin_height(0) - FIN_BASE_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn test_fin_height_bounded_by_amplitude() {
        for i in 0..FIN_COUNT {
            let h = fin_height(i);
            assert!(h >= FIN_BASE_HEIGHT - FIN_AMPLITUDE - 1e-6);
            assert!(h <= FIN_BASE_HEIGHT + FIN_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn test_mullions_span_glazing() {
        assert!((mullion_offset(0) + 3.6).abs() < 1e-6);
        let step = mullion_offset(1) - mullion_offset(0);
        assert!((step - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_fin_offsets_evenly_spaced() {
        assert!((fin_offset(0) + 4.2).abs() < 1e-6);
        assert!((fin_offset(FIN_COUNT - 1) - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_group_nesting_adds_offsets() {
        let facade = Group::root().child(Vec3::new(0.0, 1.8, 0.0));
        let glazing = facade.child(Vec3::new(0.0, 2.2, 2.02));
        let p = glazing.at(Vec3::new(0.0, 0.0, 0.06));
        assert!((p - Vec3::new(0.0, 4.0, 2.08)).length() < 1e-5);
    }
}
