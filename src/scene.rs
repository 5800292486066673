//! Scene description: primitives, lights, environment and the initial camera.

use glam::Vec3;

use crate::camera::Camera;
use crate::material::MaterialKind;
use crate::math::AABB;
use crate::types::Primitive;

/// Sky/ground ambient light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: Vec3,
    pub ground: Vec3,
    pub intensity: f32,
}

impl HemisphereLight {
    /// Ambient radiance arriving on a surface with normal `normal`
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        let w = 0.5 * normal.y + 0.5;
        self.ground.lerp(self.sky, w) * self.intensity
    }
}

/// The scene's single shadow-casting sun, aimed at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub shadow_map_size: u32,
}

impl DirectionalLight {
    /// Unit vector from a surface towards the light
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }
}

/// Procedural image-based lighting preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub zenith: Vec3,
    pub horizon: Vec3,
    pub ground: Vec3,
    /// Warm glow around the setting sun
    pub glow: Vec3,
    pub glow_direction: Vec3,
    pub intensity: f32,
    /// Draw the environment behind the scene instead of the background color
    pub show_background: bool,
}

impl Environment {
    pub const SUNSET: Environment = Environment {
        zenith: Vec3::new(0.16, 0.22, 0.42),
        horizon: Vec3::new(1.0, 0.52, 0.26),
        ground: Vec3::new(0.10, 0.08, 0.07),
        glow: Vec3::new(1.6, 0.75, 0.3),
        glow_direction: Vec3::new(0.8, 0.12, -0.59),
        intensity: 1.0,
        show_background: false,
    };

    /// Radiance arriving from direction `dir` (unit length)
    pub fn radiance(&self, dir: Vec3) -> Vec3 {
        let base = if dir.y >= 0.0 {
            self.horizon.lerp(self.zenith, dir.y.sqrt())
        } else {
            self.horizon.lerp(self.ground, (-dir.y).sqrt().min(1.0)) * 0.5
        };
        let glow = dir.dot(self.glow_direction.normalize()).max(0.0).powi(8);
        (base + self.glow * glow) * self.intensity
    }
}

/// Soft blob shadow under geometry, applied to shadow receivers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactShadows {
    /// Height of the receiving surface
    pub height: f32,
    pub opacity: f32,
    /// Side length of the square area the effect covers
    pub scale: f32,
    pub blur: f32,
    /// Occluders further above the surface than this cast nothing
    pub far: f32,
}

/// A complete, immutable scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub(crate) primitives: Vec<Primitive>,
    pub(crate) background: Vec3,
    pub(crate) hemisphere: HemisphereLight,
    pub(crate) sun: DirectionalLight,
    pub(crate) environment: Environment,
    pub(crate) contact_shadows: Option<ContactShadows>,
    pub(crate) camera: Camera,
}

impl Scene {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn background(&self) -> Vec3 {
        self.background
    }

    pub fn hemisphere(&self) -> &HemisphereLight {
        &self.hemisphere
    }

    pub fn sun(&self) -> &DirectionalLight {
        &self.sun
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn contact_shadows(&self) -> Option<&ContactShadows> {
        self.contact_shadows.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn primitive(&self, name: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.name == name)
    }

    pub fn count_by_kind(&self, kind: MaterialKind) -> usize {
        self.primitives
            .iter()
            .filter(|p| p.material.kind() == kind)
            .count()
    }

    /// Union of all primitive bounds, or `None` for an empty scene
    pub fn bounds(&self) -> Option<AABB> {
        self.primitives
            .iter()
            .map(Primitive::world_bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hemisphere_irradiance_extremes() {
        let light = HemisphereLight {
            sky: Vec3::ONE,
            ground: Vec3::ZERO,
            intensity: 0.5,
        };
        assert_eq!(light.irradiance(Vec3::Y), Vec3::splat(0.5));
        assert_eq!(light.irradiance(-Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn test_sun_direction_is_unit() {
        let sun = DirectionalLight {
            position: Vec3::new(8.0, 10.0, 6.0),
            color: Vec3::ONE,
            intensity: 1.25,
            shadow_map_size: 2048,
        };
        assert!((sun.direction().length() - 1.0).abs() < 1e-6);
        assert!(sun.direction().y > 0.0);
    }

    #[test]
    fn test_sunset_sky_brighter_than_ground() {
        let env = Environment::SUNSET;
        let up = env.radiance(Vec3::Y).length();
        let down = env.radiance(-Vec3::Y).length();
        assert!(up > down);
        assert!(env.radiance(Vec3::new(0.0, 0.3, 1.0).normalize()).is_finite());
    }
}
