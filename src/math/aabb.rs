use glam::{Mat4, Vec3};

use super::ray::{intersect_aabb, Ray};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with full extents `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds of this box after an affine transform (all eight corners)
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        });

        corners.fold(
            AABB::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |acc, corner| {
                let p = matrix.transform_point3(corner);
                AABB::new(acc.min.min(p), acc.max.max(p))
            },
        )
    }

    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        intersect_aabb(ray.origin, ray.dir, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_new() {
        let min = Vec3::new(0.0, 0.0, 0.0);
        let max = Vec3::new(1.0, 1.0, 1.0);
        let aabb = AABB::new(min, max);
        assert_eq!(aabb.min, min);
        assert_eq!(aabb.max, max);
    }

    #[test]
    fn test_aabb_center() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_from_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(0.0, 1.8, 0.0), Vec3::new(10.0, 3.6, 4.0));
        assert!((aabb.min - Vec3::new(-5.0, 0.0, -2.0)).length() < 1e-6);
        assert!((aabb.max - Vec3::new(5.0, 3.6, 2.0)).length() < 1e-6);
        assert!((aabb.size() - Vec3::new(10.0, 3.6, 4.0)).length() < 1e-6);
    }

    #[test]
    fn test_aabb_union_non_overlapping() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let aabb2 = AABB::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        let union = aabb1.union(&aabb2);
        assert_eq!(union.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(union.max, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_aabb_union_contained() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0));
        let union = aabb1.union(&aabb2);
        assert_eq!(union, aabb1);
    }

    #[test]
    fn test_aabb_transformed_rotation() {
        // A flat 2x2 quad in XY rotated onto the XZ plane
        let quad = AABB::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let rotation = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        let bounds = quad.transformed(&rotation);
        assert!(bounds.size().y.abs() < 1e-5);
        assert!((bounds.size().x - 2.0).abs() < 1e-5);
        assert!((bounds.size().z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = aabb.hit(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }
}
