use bevy::prelude::*;
use bevy::math::primitives::{Sphere, Cuboid};

use crate::simulation::control::ControlCommand;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, NVec3};

/// Component tagging each sphere with the id of the body it draws
#[derive(Component)]
struct BodyTag(pub String);

/// World-space → screen-space scaling factor for positions
const SCALE3D: f32 = 1.0;

/// Screen length of a force arrow per newton
const FORCE_SCALE: f32 = 0.1;

/// Radius of every body sphere on screen
const BODY_RADIUS: f32 = 0.3;

/// Distance of the camera from the origin along +Z
const CAMERA_DISTANCE: f32 = 60.0;

/// Key bindings for continuous control commands (applied every frame while held)
const KEY_COMMANDS: [(KeyCode, ControlCommand); 6] = [
    (KeyCode::ArrowUp, ControlCommand::RaiseElevation),
    (KeyCode::ArrowDown, ControlCommand::LowerElevation),
    (KeyCode::ArrowLeft, ControlCommand::TurnLeft),
    (KeyCode::ArrowRight, ControlCommand::TurnRight),
    (KeyCode::Equal, ControlCommand::IncreaseThrust),
    (KeyCode::Minus, ControlCommand::DecreaseThrust),
];

pub fn run_3d(scenario: Scenario) {
    log::info!("run_3d: starting Bevy 3D viewer with {} bodies", scenario.world.len());

    App::new()
        .insert_resource(scenario)
        // `log` records go to env_logger, set up in main
        .add_plugins(DefaultPlugins.build().disable::<bevy::log::LogPlugin>())
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (handle_input, physics_step_3d, sync_transforms_3d, draw_vectors_3d).chain())
        .run();
}

fn to_screen(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32) * SCALE3D
}

/// Startup system: spawn camera, light, axes and one sphere per body
fn setup_3d(mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: Transform::from_xyz(20.0, 15.0, CAMERA_DISTANCE)
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 1000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(10.0, 10.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    spawn_axes(&mut commands, &mut meshes, &mut materials);

    for b in scenario.world.bodies() {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(BODY_RADIUS).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(1.0, 1.0, 1.0),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_screen(&b.position())),
                ..Default::default()
            },
            BodyTag(b.id().to_string()),
        ));
    }
}

/// Keyboard → control commands on the controlled body.
/// Tab cycles the controlled body, Delete removes it.
fn handle_input(keys: Res<ButtonInput<KeyCode>>, time: Res<Time>, mut scenario: ResMut<Scenario>) {
    let world = &mut scenario.world;
    let dt = time.delta_seconds_f64();

    if keys.just_pressed(KeyCode::Tab) {
        if let Some(id) = world.cycle_controlled() {
            log::info!("controlling `{id}`");
        }
    }

    if keys.just_pressed(KeyCode::Delete) {
        if let Some(id) = world.controlled_id().map(str::to_string) {
            if let Err(e) = world.delete_body(&id) {
                log::warn!("{e}");
            }
        }
    }

    for (key, command) in KEY_COMMANDS {
        if keys.pressed(key) {
            world.apply_control(command, dt);
        }
    }
}

/// Fixed-step physics: tick once the accumulated frame time crosses the step
fn physics_step_3d(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    let Scenario { world, clock, .. } = &mut *scenario;

    if clock.advance(time.delta_seconds_f64()) {
        let report = world.tick(clock.step());
        if !report.is_clean() {
            log::debug!("tick at t = {:.2} s: {} log appends failed", world.time(), report.log_failures.len());
        }
    }
}

fn color_for_body(b: &Body, controlled: Option<&str>) -> Color {
    if controlled == Some(b.id()) {
        Color::srgb(1.0, 0.85, 0.0) // controlled -> yellow
    } else {
        Color::srgb(1.0, 1.0, 1.0)
    }
}

/// Move spheres to body positions, recolor, and despawn spheres of deleted bodies
fn sync_transforms_3d(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &BodyTag, &mut Transform, &Handle<StandardMaterial>)>,
) {
    let world = &scenario.world;
    let controlled = world.controlled_id();

    for (entity, BodyTag(id), mut transform, mat_handle) in &mut query {
        let Some(b) = world.body(id) else {
            commands.entity(entity).despawn();
            continue;
        };

        transform.translation = to_screen(&b.position());

        if let Some(mat) = materials.get_mut(mat_handle) {
            mat.base_color = color_for_body(b, controlled);
        }
    }
}

/// Trajectories as line strips, force components as lines from each body
fn draw_vectors_3d(scenario: Res<Scenario>, mut gizmos: Gizmos) {
    for b in scenario.world.bodies() {
        gizmos.linestrip(b.trajectory().iter().map(to_screen), Color::srgb(0.4, 0.4, 0.4));

        let origin = to_screen(&b.position());
        let f = b.forces();
        for (force, color) in [
            (f.developed, Color::srgb(0.0, 1.0, 1.0)),
            (f.drag, Color::srgb(1.0, 0.0, 1.0)),
            (f.gravity, Color::srgb(1.0, 0.5, 0.0)),
            (f.normal, Color::srgb(0.5, 1.0, 0.5)),
        ] {
            if force != NVec3::zeros() {
                gizmos.line(origin, origin + to_screen(&force) * FORCE_SCALE, color);
            }
        }
    }
}

// =========================================================================================
// Draw 3D axes for visual reference
// =========================================================================================

fn spawn_axes(commands: &mut Commands, meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) {
    let axis_len = 200.0 * SCALE3D;
    let axis_thickness = 0.05 * SCALE3D;

    // X red, Y green, Z blue; cuboids are centered so each crosses the origin
    for (size, color) in [
        (Vec3::new(axis_len, axis_thickness, axis_thickness), Color::srgb(1.0, 0.0, 0.0)),
        (Vec3::new(axis_thickness, axis_len, axis_thickness), Color::srgb(0.0, 1.0, 0.0)),
        (Vec3::new(axis_thickness, axis_thickness, axis_len), Color::srgb(0.0, 0.0, 1.0)),
    ] {
        commands.spawn(PbrBundle {
            mesh: meshes.add(Cuboid::new(size.x, size.y, size.z).mesh()),
            material: materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..Default::default()
            }),
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        });
    }
}
