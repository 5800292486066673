use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use super::common::{
    fin_height, fin_offset, mullion_offset, FacadePalette, Group, FIN_COUNT, GLAZING_WIDTH, MULLION_COUNT,
};
use crate::camera::Camera;
use crate::math::hex_to_linear;
use crate::scene::{ContactShadows, DirectionalLight, Environment, HemisphereLight, Scene};
use crate::types::{Primitive, Shape, Transform};

const BACKGROUND: u32 = 0x0b0d10;

/// Builds the residential facade scene.
///
/// Every parameter is a constant, so repeated calls produce equal scenes.
pub fn create_facade_scene() -> Scene {
    let palette = FacadePalette::new();
    let facade = Group::root().child(Vec3::new(0.0, 1.8, 0.0));

    let base = Primitive::cuboid("base-volume", [10.0, 3.6, 4.0], facade.at(Vec3::new(0.0, 1.8, 0.0)), &palette.concrete)
        .casting_shadow()
        .receiving_shadow();

    // Recessed glass strip with mullions in front of it
    let glazing = facade.child(Vec3::new(0.0, 2.2, 2.02));
    let glass = Primitive::cuboid("glazing", [GLAZING_WIDTH, 2.0, 0.05], glazing.at(Vec3::ZERO), &palette.glass)
        .casting_shadow();
    let mullions = (0..MULLION_COUNT).map(|i| {
        Primitive::cuboid(
            format!("mullion-{i}"),
            [0.06, 2.0, 0.06],
            glazing.at(Vec3::new(mullion_offset(i), 0.0, 0.06)),
            &palette.metal,
        )
        .casting_shadow()
    });

    // Wood-clad projection with an LED underlight
    let projection = facade.child(Vec3::new(-2.2, 2.6, 0.8));
    let wood = Primitive::cuboid("wood-projection", [2.8, 1.6, 1.6], projection.at(Vec3::ZERO), &palette.wood)
        .casting_shadow()
        .receiving_shadow();
    let underlight = Primitive::cuboid(
        "wood-underlight",
        [2.6, 0.04, 0.04],
        projection.at(Vec3::new(0.0, -0.8, 0.8)),
        &palette.led,
    );

    let accents = [
        Primitive::cuboid("accent-box-upper", [1.6, 0.9, 1.2], facade.at(Vec3::new(2.8, 3.0, 1.0)), &palette.concrete),
        Primitive::cuboid("accent-box-lower", [0.8, 0.8, 0.8], facade.at(Vec3::new(3.4, 2.2, -0.3)), &palette.concrete),
    ]
    .map(Primitive::casting_shadow);

    let fin_group = facade.child(Vec3::new(0.0, 2.2, 2.12));
    let fins = (0..FIN_COUNT).map(|i| {
        Primitive::cuboid(
            format!("fin-{i}"),
            [0.06, fin_height(i), 0.12],
            fin_group.at(Vec3::new(fin_offset(i), 0.0, 0.0)),
            &palette.metal,
        )
        .casting_shadow()
    });

    // LED linear lights under the overhang, mirrored about x = 0
    let overhang = facade.child(Vec3::new(0.0, 0.9, 2.02));
    let strips = [-2.4, 2.4].into_iter().enumerate().map(|(i, x)| {
        Primitive::cuboid(
            format!("overhang-led-{i}"),
            [4.8, 0.03, 0.03],
            overhang.at(Vec3::new(x, -0.02, 0.0)),
            &palette.led,
        )
    });

    let ground = Primitive::new(
        "ground",
        Shape::Plane {
            width: 100.0,
            height: 100.0,
        },
        Transform::at(Vec3::ZERO).with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        &palette.ground,
    )
    .receiving_shadow();

    let primitives: Vec<Primitive> = std::iter::once(base)
        .chain(std::iter::once(glass))
        .chain(mullions)
        .chain([wood, underlight])
        .chain(accents)
        .chain(fins)
        .chain(strips)
        .chain(std::iter::once(ground))
        .collect();

    Scene {
        primitives,
        background: hex_to_linear(BACKGROUND),
        hemisphere: HemisphereLight {
            sky: Vec3::ONE,
            ground: hex_to_linear(BACKGROUND),
            intensity: 0.15,
        },
        sun: DirectionalLight {
            position: Vec3::new(8.0, 10.0, 6.0),
            color: Vec3::ONE,
            intensity: 1.25,
            shadow_map_size: 2048,
        },
        environment: Environment::SUNSET,
        contact_shadows: Some(ContactShadows {
            height: 0.001,
            opacity: 0.5,
            scale: 20.0,
            blur: 2.5,
            far: 10.0,
        }),
        camera: Camera::new(Vec3::new(9.0, 5.0, 10.5), 40.0, Vec3::new(0.0, 2.0, 0.0))
            .with_max_polar_angle(PI / 2.05)
            .with_damping(0.08),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    #[test]
    fn test_primitive_count() {
        // base + glass + 7 mullions + wood + underlight + 2 accents + 17 fins + 2 strips + ground
        assert_eq!(create_facade_scene().primitives().len(), 33);
    }

    #[test]
    fn test_base_volume_sits_on_ground() {
        let scene = create_facade_scene();
        let base = scene.primitive("base-volume").unwrap();
        let bounds = base.world_bounds();
        assert!((bounds.min.y - 1.8).abs() < 1e-5);
        assert_eq!(base.material.kind(), MaterialKind::OpaqueRough);
    }

    #[test]
    fn test_underlight_below_projection() {
        let scene = create_facade_scene();
        let wood = scene.primitive("wood-projection").unwrap();
        let led = scene.primitive("wood-underlight").unwrap();
        assert!((wood.transform.position.y - led.transform.position.y - 0.8).abs() < 1e-5);
        assert_eq!(led.material.kind(), MaterialKind::EmissiveAccent);
    }
}
