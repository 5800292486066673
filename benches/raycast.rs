use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use facade_render::camera::CameraView;
use facade_render::math::{intersect_aabb, Ray};
use facade_render::render::{RenderTarget, Raycaster, SoftwareTarget, TargetSize};
use facade_render::scenes::create_facade_scene;

/// Benchmark: slab test against a single box
fn bench_aabb_slab(c: &mut Criterion) {
    let min = Vec3::new(-1.0, -1.0, -6.0);
    let max = Vec3::new(1.0, 1.0, -4.0);
    let dir = Vec3::new(0.1, 0.05, -1.0).normalize();

    c.bench_function("aabb_slab_hit", |b| {
        b.iter(|| black_box(intersect_aabb(black_box(Vec3::ZERO), black_box(dir), min, max)))
    });
}

/// Benchmark: nearest hit against the full facade
fn bench_scene_intersection(c: &mut Criterion) {
    let scene = create_facade_scene();
    let caster = Raycaster::new(&scene);
    let view = CameraView::from_camera(scene.camera());
    let ray: Ray = view.primary_ray(320, 200, 640, 360);

    c.bench_function("facade_primary_ray", |b| b.iter(|| black_box(caster.intersect(black_box(&ray)))));
    c.bench_function("facade_shade_pixel", |b| {
        b.iter(|| black_box(caster.shade_pixel(&view, 320, 200, 640, 360)))
    });
}

/// Benchmark: full software frames at a few sizes
fn bench_software_frame(c: &mut Criterion) {
    let scene = create_facade_scene();
    let view = CameraView::from_camera(scene.camera());
    let mut group = c.benchmark_group("software_frame");
    group.sample_size(10);

    for (width, height) in [(320u32, 180u32), (1280, 720)] {
        let mut target = SoftwareTarget::new(TargetSize::new(width, height), 1.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, _| b.iter(|| target.render(&scene, &view)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_aabb_slab, bench_scene_intersection, bench_software_frame);
criterion_main!(benches);
