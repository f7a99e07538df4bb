use glam::{IVec3, Vec3};
use pretty_assertions::assert_eq;
use voxcast_common::{Camera, EngineConfig, Rgba};
use voxcast_input::InputState;
use voxcast_kernel::{Scene, Voxel, VoxelGrid};
use voxcast_render::{Engine, FrameBuffer, FrameRenderer, Ray, Renderer, Shader};

/// Entry distance of `ray` into the box `[min, max]`, if it reaches it.
fn slab(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray.direction.recip();
    let t0 = (min - ray.origin) * inv;
    let t1 = (max - ray.origin) * inv;
    let near = t0.min(t1).max_element();
    let far = t0.max(t1).min_element();
    (near <= far && far >= 0.0).then_some(near.max(0.0))
}

/// A white voxel at the origin cell, seen from (5, 5, 5).
fn single_voxel_scene(target: Vec3) -> Scene {
    let mut grid = VoxelGrid::new(2);
    grid.set(IVec3::ZERO, Voxel::solid(Rgba::WHITE)).unwrap();
    let camera = Camera::looking_at(Vec3::splat(5.0), target);
    Scene::new(grid, camera)
}

/// Every pixel whose ray clearly enters the voxel is drawn; every pixel whose
/// ray clearly misses it is background. Returns the number of covered pixels.
fn assert_silhouette(scene: &Scene, renderer: &FrameRenderer) -> usize {
    let frame = renderer.render(scene);
    let background = Rgba::BLACK.pack();
    let mut covered = 0;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let ray = renderer.projector().ray(&scene.camera, x, y);
            let pixel = frame.get(x, y);
            if slab(&ray, Vec3::splat(0.01), Vec3::splat(0.99)).is_some() {
                assert_ne!(pixel, background, "pixel ({x}, {y}) should see the voxel");
                covered += 1;
            }
            if slab(&ray, Vec3::splat(-0.01), Vec3::splat(1.01)).is_none() {
                assert_eq!(pixel, background, "pixel ({x}, {y}) should miss the voxel");
            }
        }
    }
    covered
}

fn config(width: u32, height: u32) -> EngineConfig {
    EngineConfig {
        width,
        height,
        light_direction: Vec3::ONE.normalize(),
        ..EngineConfig::default()
    }
}

#[test]
fn single_voxel_silhouette_matches_box() {
    let config = config(61, 41);
    let scene = single_voxel_scene(Vec3::splat(0.5));
    let renderer = FrameRenderer::from_config(&config);

    assert_ne!(renderer.render(&scene).get(30, 20), Rgba::BLACK.pack());
    assert!(assert_silhouette(&scene, &renderer) > 0);
}

#[test]
fn silhouette_when_aimed_at_origin_corner() {
    // Aimed at (0, 0, 0) itself: the centre ray grazes the near corner
    // (1, 1, 1), so only the box classification is checked.
    let config = config(61, 41);
    let scene = single_voxel_scene(Vec3::ZERO);
    let renderer = FrameRenderer::from_config(&config);

    assert!(assert_silhouette(&scene, &renderer) > 0);
}

#[test]
fn lit_faces_are_brighter_than_ambient() {
    // Light comes from +x+y+z and the camera sits in that octant, so all three
    // visible faces face the light.
    let config = config(61, 41);
    let scene = single_voxel_scene(Vec3::splat(0.5));
    let frame = FrameRenderer::from_config(&config).render(&scene);

    let ambient_only = Rgba::WHITE.scaled(Shader::from_config(&config).ambient);
    let center = frame.color(30, 20);
    assert!(center.r > ambient_only.r);
    assert_eq!(center.a, 255);
}

#[test]
fn parallel_frame_matches_serial() {
    let config = EngineConfig::default();
    let scene = Scene::generate(&config);
    let renderer = FrameRenderer::from_config(&config);

    let mut serial = FrameBuffer::new(config.width, config.height);
    renderer.render_serial(&scene, &mut serial).unwrap();
    assert_eq!(renderer.render(&scene), serial);
}

#[test]
fn engine_session_renders_each_tick() {
    let config = config(40, 24);
    let mut engine = Engine::new(&config);

    let still = engine.tick(&InputState::default()).clone();
    let mut input = InputState::new();
    input.add_pointer_motion(1500.0, 0.0);
    let turned = engine.tick(&input).clone();
    input.end_tick();

    assert_eq!(engine.ticks(), 2);
    assert!((engine.scene().camera.rotation.yaw() - 1.5).abs() < 1e-6);
    assert_eq!(engine.scene().camera.rotation.pitch(), 0.0);
    assert_ne!(still, turned);
}
