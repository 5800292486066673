use std::sync::Arc;

use facade_render::camera::OrbitControls;
use facade_render::material::MaterialKind;
use facade_render::scenes::{create_facade_scene, fin_height, FIN_COUNT, MULLION_COUNT};
use facade_render::types::Shape;

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn test_scene_construction_is_deterministic() {
        let a = create_facade_scene();
        let b = create_facade_scene();

        assert_eq!(a, b);
        let names_a: Vec<_> = a.primitives().iter().map(|p| p.name.as_str()).collect();
        let names_b: Vec<_> = b.primitives().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_fin_heights_follow_sine_profile() {
        let scene = create_facade_scene();

        for i in 0..=16 {
            let expected = 1.9 + 0.2 * (0.5 * i as f32).sin();
            assert!((fin_height(i) - expected).abs() < 1e-6, "fin {i}");

            let fin = scene.primitive(&format!("fin-{i}")).expect("fin present");
            let Shape::Box { width, height, depth } = fin.shape else {
                panic!("fin {i} is not a box");
            };
            assert!((height - expected).abs() < 1e-6, "fin {i} height {height}");
            assert_eq!((width, depth), (0.06, 0.12));
        }
        assert!(scene.primitive("fin-17").is_none());
    }

    #[test]
    fn test_primitive_counts_by_material() {
        let scene = create_facade_scene();

        // base, two accent boxes, ground
        assert_eq!(scene.count_by_kind(MaterialKind::OpaqueRough), 4);
        assert_eq!(scene.count_by_kind(MaterialKind::TransmissiveGlazing), 1);
        assert_eq!(scene.count_by_kind(MaterialKind::MetallicReflective), MULLION_COUNT + FIN_COUNT);
        assert_eq!(scene.count_by_kind(MaterialKind::OpaqueWood), 1);
        // wood underlight plus two overhang strips
        assert_eq!(scene.count_by_kind(MaterialKind::EmissiveAccent), 3);
        assert_eq!(scene.primitives().len(), 33);
    }

    #[test]
    fn test_material_instances_are_shared() {
        let scene = create_facade_scene();
        let mullion = scene.primitive("mullion-0").unwrap();
        let fin = scene.primitive("fin-9").unwrap();
        let strip = scene.primitive("overhang-led-1").unwrap();
        let underlight = scene.primitive("wood-underlight").unwrap();

        assert!(Arc::ptr_eq(&mullion.material, &fin.material));
        assert!(Arc::ptr_eq(&strip.material, &underlight.material));

        let base = scene.primitive("base-volume").unwrap();
        let ground = scene.primitive("ground").unwrap();
        assert!(!Arc::ptr_eq(&base.material, &ground.material));
    }

    #[test]
    fn test_shadow_flags() {
        let scene = create_facade_scene();
        let ground = scene.primitive("ground").unwrap();
        assert!(ground.receives_shadow);
        assert!(!ground.casts_shadow);

        for strip in ["overhang-led-0", "overhang-led-1", "wood-underlight"] {
            assert!(!scene.primitive(strip).unwrap().casts_shadow, "{strip}");
        }
        for i in 0..FIN_COUNT {
            assert!(scene.primitive(&format!("fin-{i}")).unwrap().casts_shadow);
        }
    }

    #[test]
    fn test_ground_is_horizontal_at_origin() {
        let scene = create_facade_scene();
        let bounds = scene.primitive("ground").unwrap().world_bounds();

        assert!(bounds.min.y.abs() < 1e-4);
        assert!(bounds.max.y.abs() < 1e-4);
        assert!((bounds.size().x - 100.0).abs() < 1e-3);
        assert!((bounds.size().z - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_lighting_and_camera_parameters() {
        let scene = create_facade_scene();

        assert_eq!(scene.sun().shadow_map_size, 2048);
        assert_eq!(scene.sun().intensity, 1.25);
        let contact = scene.contact_shadows().expect("contact shadows");
        assert_eq!(contact.opacity, 0.5);
        assert_eq!(contact.far, 10.0);

        let camera = scene.camera();
        assert_eq!(camera.fov_deg, 40.0);
        assert!((camera.max_polar_angle - std::f32::consts::PI / 2.05).abs() < 1e-6);
        assert_eq!(camera.damping_factor, 0.08);
    }

    #[test]
    fn test_orbit_never_passes_below_horizon() {
        let scene = create_facade_scene();
        let limit = scene.camera().max_polar_angle;
        let mut controls = OrbitControls::new(scene.camera());

        for _ in 0..50 {
            // Dragging up tilts the camera towards the horizon
            controls.rotate(0.0, -400.0, 720.0);
            for _ in 0..10 {
                controls.update();
                assert!(controls.polar_angle() <= limit + 1e-6);
                assert!(controls.eye().y > scene.camera().target.y - 1e-3);
            }
        }
    }

    #[test]
    fn test_damping_settles() {
        let scene = create_facade_scene();
        let mut controls = OrbitControls::new(scene.camera());
        controls.rotate(120.0, 0.0, 720.0);

        let mut frames = 0;
        while controls.is_settling() {
            controls.update();
            frames += 1;
            assert!(frames < 1000, "damping never converged");
        }
        assert!(!controls.update());
    }
}
