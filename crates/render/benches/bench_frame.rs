use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use voxcast_common::{Camera, EngineConfig, Rotation};
use voxcast_kernel::Scene;
use voxcast_render::{FrameBuffer, FrameRenderer, Ray, cast};

fn config(width: u32, height: u32) -> EngineConfig {
    EngineConfig {
        width,
        height,
        ..EngineConfig::default()
    }
}

fn bench_render(width: u32, height: u32, iterations: usize) {
    let config = config(width, height);
    let scene = Scene::generate(&config);
    let renderer = FrameRenderer::from_config(&config);
    let mut frame = FrameBuffer::new(width, height);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(renderer.render_into(black_box(&scene), &mut frame));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  render {width}x{height} ({iterations} iters): {per_iter:?}/frame, total {elapsed:?}");
}

fn bench_render_serial(width: u32, height: u32, iterations: usize) {
    let config = config(width, height);
    let scene = Scene::generate(&config);
    let renderer = FrameRenderer::from_config(&config);
    let mut frame = FrameBuffer::new(width, height);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(renderer.render_serial(black_box(&scene), &mut frame));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  serial render {width}x{height} ({iterations} iters): {per_iter:?}/frame, total {elapsed:?}"
    );
}

fn bench_cast(iterations: usize) {
    let config = EngineConfig::default();
    let mut scene = Scene::generate(&config);
    scene.camera = Camera::new(Vec3::new(0.5, 8.5, 0.5), Rotation::default());
    // Diagonal across the whole grid, so most casts run to the render distance.
    let ray = Ray::new(scene.camera.position, Vec3::new(1.0, 0.05, 1.0).normalize());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(cast(
            black_box(scene.grid()),
            black_box(ray),
            config.render_distance,
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  cast ({iterations} iters): {per_iter:?}/cast, total {elapsed:?}");
}

fn main() {
    println!("=== Frame Benchmarks ===\n");

    println!("Single ray:");
    bench_cast(100_000);

    println!("\nFull frame:");
    bench_render(160, 90, 100);
    bench_render(320, 180, 50);
    bench_render(640, 360, 10);

    println!("\nFull frame, one thread:");
    bench_render_serial(320, 180, 20);

    println!("\n=== Done ===");
}
