use std::f32::consts::PI;

use glam::{Quat, Vec3};
use rayon::prelude::*;

use crate::camera::CameraView;
use crate::math::{aces_filmic, slab_interval, to_rgba8, Ray, AABB};
use crate::scene::Scene;
use crate::types::{Primitive, Shape};

const MAX_DEPTH: u32 = 4;
const HIT_EPSILON: f32 = 1e-4;
const SURFACE_OFFSET: f32 = 1e-3;
/// Share of the environment gradient used as diffuse ambient
const ENV_DIFFUSE: f32 = 0.35;

/// Primitive with its world bounds and inverse rotation cached
struct Prepared<'a> {
    primitive: &'a Primitive,
    bounds: AABB,
    position: Vec3,
    rotation: Quat,
    inverse_rotation: Quat,
    half_extents: Vec3,
}

impl<'a> Prepared<'a> {
    fn new(primitive: &'a Primitive) -> Self {
        let rotation = primitive.transform.quat();
        Self {
            primitive,
            bounds: primitive.world_bounds(),
            position: primitive.transform.position,
            rotation,
            inverse_rotation: rotation.inverse(),
            half_extents: primitive.shape.dimensions() * 0.5,
        }
    }

    /// Distance and world-space outward normal of the nearest hit in (`HIT_EPSILON`, `t_max`)
    fn intersect(&self, ray: &Ray, t_max: f32) -> Option<(f32, Vec3)> {
        let (near, far) = slab_interval(ray.origin, ray.dir, self.bounds.min, self.bounds.max)?;
        if near > t_max || far < HIT_EPSILON {
            return None;
        }

        let origin = self.inverse_rotation * (ray.origin - self.position);
        let dir = self.inverse_rotation * ray.dir;

        let (t, local_normal) = match self.primitive.shape {
            Shape::Plane { .. } => {
                if dir.z.abs() < 1e-8 {
                    return None;
                }
                let t = -origin.z / dir.z;
                let p = origin + dir * t;
                if p.x.abs() > self.half_extents.x || p.y.abs() > self.half_extents.y {
                    return None;
                }
                (t, Vec3::Z)
            }
            Shape::Box { .. } => {
                let (near, far) = slab_interval(origin, dir, -self.half_extents, self.half_extents)?;
                let t = if near > HIT_EPSILON { near } else { far };
                (t, box_normal(origin + dir * t, self.half_extents))
            }
        };

        (t > HIT_EPSILON && t < t_max).then(|| (t, self.rotation * local_normal))
    }
}

/// Face normal of the box side containing local point `p`
fn box_normal(p: Vec3, half_extents: Vec3) -> Vec3 {
    let d = (p / half_extents.max(Vec3::splat(1e-6))).abs();
    if d.x >= d.y && d.x >= d.z {
        Vec3::X * p.x.signum()
    } else if d.y >= d.z {
        Vec3::Y * p.y.signum()
    } else {
        Vec3::Z * p.z.signum()
    }
}

fn schlick(f0: Vec3, cos_theta: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5)
}

fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - normal * 2.0 * dir.dot(normal)
}

/// Closest intersection along a ray
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub t: f32,
    pub point: Vec3,
    /// Unit normal facing back against the incoming ray
    pub normal: Vec3,
    pub primitive: &'a Primitive,
}

/// CPU ray caster over one scene
pub struct Raycaster<'a> {
    scene: &'a Scene,
    prepared: Vec<Prepared<'a>>,
}

impl<'a> Raycaster<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            prepared: scene.primitives().iter().map(Prepared::new).collect(),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit<'a>> {
        self.closest(ray, f32::INFINITY, |_| true)
    }

    fn closest(&self, ray: &Ray, t_max: f32, filter: impl Fn(&Primitive) -> bool) -> Option<Hit<'a>> {
        let mut best: Option<(f32, Vec3, &'a Primitive)> = None;
        let mut limit = t_max;

        for item in self.prepared.iter().filter(|p| filter(p.primitive)) {
            if let Some((t, normal)) = item.intersect(ray, limit) {
                limit = t;
                best = Some((t, normal, item.primitive));
            }
        }

        best.map(|(t, normal, primitive)| Hit {
            t,
            point: ray.at(t),
            normal: if normal.dot(ray.dir) > 0.0 { -normal } else { normal },
            primitive,
        })
    }

    /// Distance to the first shadow caster within `distance` along `dir`
    fn occluded(&self, point: Vec3, dir: Vec3, distance: f32) -> Option<f32> {
        self.closest(&Ray::new(point, dir), distance, |p| p.casts_shadow)
            .map(|hit| hit.t)
    }

    /// Linear radiance arriving along `ray`
    pub fn trace(&self, ray: &Ray, depth: u32) -> Vec3 {
        match self.intersect(ray) {
            Some(hit) => self.shade(ray, &hit, depth),
            None => self.scene.environment().radiance(ray.dir),
        }
    }

    fn shade(&self, ray: &Ray, hit: &Hit, depth: u32) -> Vec3 {
        let material = hit.primitive.material.as_ref();
        let surface = material.surface();
        let n = hit.normal;
        let v = -ray.dir;
        let n_dot_v = n.dot(v).max(1e-4);
        let roughness = surface.roughness.clamp(0.02, 1.0);
        let env = self.scene.environment();

        let f0 = Vec3::splat(0.04).lerp(surface.color, surface.metalness);
        let diffuse_color = surface.color * (1.0 - surface.metalness);

        let ambient = self.scene.hemisphere().irradiance(n) + env.radiance(n) * ENV_DIFFUSE;
        let mut color = diffuse_color * ambient;

        let sun = self.scene.sun();
        let l = sun.direction();
        let n_dot_l = n.dot(l);
        if n_dot_l > 0.0 {
            let lit = !hit.primitive.receives_shadow
                || self
                    .occluded(hit.point + n * SURFACE_OFFSET, l, f32::INFINITY)
                    .is_none();
            if lit {
                let h = (l + v).normalize();
                let shininess = (2.0 / roughness.powi(4) - 2.0).clamp(1.0, 2048.0);
                let fresnel = schlick(f0, h.dot(v));
                let specular = fresnel * ((shininess + 8.0) / (8.0 * PI)) * n.dot(h).max(0.0).powf(shininess);
                color += (diffuse_color + specular) * sun.color * sun.intensity * n_dot_l;
            }
        }

        let reflected_dir = reflect(ray.dir, n);
        let transmission = material.transmission();

        if transmission > 0.0 {
            let ior = material.ior();
            let r0 = ((ior - 1.0) / (ior + 1.0)).powi(2);
            let fresnel = schlick(Vec3::splat(r0), n_dot_v);
            let through = Ray::new(hit.point - n * SURFACE_OFFSET, ray.dir);
            let tint = surface.color.powf(0.2);
            let transmitted = if depth < MAX_DEPTH {
                self.trace(&through, depth + 1) * tint
            } else {
                env.radiance(ray.dir) * tint
            };
            let reflected = self.reflection(hit, reflected_dir, roughness, depth);
            color = color * (1.0 - transmission)
                + (Vec3::ONE - fresnel) * transmitted * transmission
                + fresnel * reflected;
        } else if surface.metalness > 0.5 {
            let fresnel = schlick(f0, n_dot_v);
            color += fresnel * self.reflection(hit, reflected_dir, roughness, depth);
        } else {
            let fresnel = schlick(f0, n_dot_v);
            color += fresnel * env.radiance(reflected_dir) * (1.0 - roughness).powi(2);
        }

        if hit.primitive.receives_shadow {
            color *= 1.0 - self.contact_occlusion(hit.point);
        }

        color + material.emission()
    }

    /// Mirror reflection blurred towards the environment by roughness
    fn reflection(&self, hit: &Hit, dir: Vec3, roughness: f32, depth: u32) -> Vec3 {
        let env = self.scene.environment().radiance(dir);
        if depth >= MAX_DEPTH {
            return env;
        }
        let traced = self.trace(&Ray::new(hit.point + hit.normal * SURFACE_OFFSET, dir), depth + 1);
        traced.lerp(env, roughness)
    }

    /// Darkening from casters directly above a point on the contact plane
    fn contact_occlusion(&self, point: Vec3) -> f32 {
        let Some(contact) = self.scene.contact_shadows() else {
            return 0.0;
        };
        let half = contact.scale * 0.5;
        if (point.y - contact.height).abs() > 0.01 || point.x.abs() > half || point.z.abs() > half {
            return 0.0;
        }
        match self.occluded(point + Vec3::Y * SURFACE_OFFSET, Vec3::Y, contact.far) {
            Some(distance) => contact.opacity * (1.0 - distance / contact.far).max(0.0).powf(contact.blur),
            None => 0.0,
        }
    }

    /// Tone-mapped sRGB pixel for buffer coordinate (`x`, `y`)
    pub fn shade_pixel(&self, view: &CameraView, x: u32, y: u32, width: u32, height: u32) -> [u8; 4] {
        let ray = view.primary_ray(x, y, width, height);
        let env = self.scene.environment();
        match self.intersect(&ray) {
            Some(hit) => to_rgba8(aces_filmic(self.shade(&ray, &hit, 0))),
            None if env.show_background => to_rgba8(aces_filmic(env.radiance(ray.dir))),
            None => to_rgba8(self.scene.background()),
        }
    }

    /// Fill `pixels` (row-major, `width` x `height`), one rayon task per row
    pub fn render(&self, view: &CameraView, width: u32, height: u32, pixels: &mut [[u8; 4]]) {
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = self.shade_pixel(view, x as u32, y as u32, width, height);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::create_facade_scene;

    #[test]
    fn test_box_normal_picks_dominant_face() {
        let half = Vec3::new(1.0, 0.5, 0.1);
        assert_eq!(box_normal(Vec3::new(1.0, 0.1, 0.0), half), Vec3::X);
        assert_eq!(box_normal(Vec3::new(0.2, -0.5, 0.05), half), -Vec3::Y);
        assert_eq!(box_normal(Vec3::new(0.9, 0.4, 0.1), half), Vec3::Z);
    }

    #[test]
    fn test_ray_down_hits_ground() {
        let scene = create_facade_scene();
        let caster = Raycaster::new(&scene);
        let ray = Ray::new(Vec3::new(20.0, 5.0, 20.0), -Vec3::Y);

        let hit = caster.intersect(&ray).expect("ground below");
        assert_eq!(hit.primitive.name, "ground");
        assert!((hit.t - 5.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_ray_hits_base_volume_front() {
        let scene = create_facade_scene();
        let caster = Raycaster::new(&scene);
        // Below the glazing band and clear of the wood projection
        let ray = Ray::new(Vec3::new(-4.0, 2.5, 30.0), -Vec3::Z);

        let hit = caster.intersect(&ray).expect("facade ahead");
        assert_eq!(hit.primitive.name, "base-volume");
        assert!(hit.normal.z > 0.99);
        assert!((hit.point.z - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_into_sky_misses() {
        let scene = create_facade_scene();
        let caster = Raycaster::new(&scene);
        assert!(caster.intersect(&Ray::new(Vec3::new(0.0, 20.0, 0.0), Vec3::Y)).is_none());
    }

    #[test]
    fn test_shading_is_finite_and_non_negative() {
        let scene = create_facade_scene();
        let caster = Raycaster::new(&scene);
        let ray = Ray::new(Vec3::new(9.0, 5.0, 10.5), Vec3::new(-9.0, -3.0, -10.5));
        let color = caster.trace(&ray, 0);
        assert!(color.is_finite());
        assert!(color.min_element() >= 0.0);
    }

    #[test]
    fn test_render_fills_every_pixel_opaque() {
        let scene = create_facade_scene();
        let caster = Raycaster::new(&scene);
        let view = CameraView::from_camera(scene.camera());
        let mut pixels = vec![[0u8; 4]; 16 * 9];

        caster.render(&view, 16, 9, &mut pixels);
        assert!(pixels.iter().all(|p| p[3] == 255));
    }
}
