use kinematics::simulation::forces::{
    compute_forces, drag_force, mutual_gravity, DevelopedThrust, ForceSet, Gravitation,
};
use kinematics::{
    Body, ControlCommand, ControlRates, Environment, NVec3, Scenario, ScenarioConfig, Shape,
    SimError, Thrust, TrajectoryLog, World, G,
};

/// Free-space world without drag
pub fn vacuum_world() -> World {
    World::new(Environment::free_space(0.0)).unwrap()
}

/// Two equal masses separated along the x-axis
pub fn two_body_world(dist: f64, m: f64) -> World {
    let mut world = vacuum_world();
    world
        .create_body("a", m, Shape::Sphere, 0.0, NVec3::new(-dist / 2.0, 0.0, 0.0))
        .unwrap();
    world
        .create_body("b", m, Shape::Sphere, 0.0, NVec3::new(dist / 2.0, 0.0, 0.0))
        .unwrap();
    world
}

/// Forces on `id` against the current state of the whole world
pub fn forces_on(world: &World, id: &str) -> kinematics::Forces {
    compute_forces(world.body(id).unwrap(), world.bodies(), world.environment())
}

pub fn assert_vec_close(a: NVec3, b: NVec3, tol: f64) {
    assert!((a - b).norm() <= tol, "expected {:?}, got {:?}", b, a);
}

// ==================================================================================
// Force model tests
// ==================================================================================

#[test]
fn lone_body_at_rest_stays_put() {
    let mut world = vacuum_world();
    let start = NVec3::new(1.0, 2.0, 3.0);
    world.create_body("solo", 2.0, Shape::Cube, 1.0, start).unwrap();

    for _ in 0..100 {
        world.tick(0.01);
    }

    let b = world.body("solo").unwrap();
    assert_eq!(b.position(), start);
    assert_eq!(b.velocity(), NVec3::zeros());
    assert_eq!(b.trajectory().len(), 101);
}

#[test]
fn gravity_pair_magnitude_and_direction() {
    let m = 1000.0;
    let d = 2.0;
    let world = two_body_world(d, m);

    let fa = forces_on(&world, "a").gravity;
    let fb = forces_on(&world, "b").gravity;
    let expected = G * m * m / (d * d);

    assert!((fa.norm() - expected).abs() < expected * 1e-12);
    assert!((fb.norm() - expected).abs() < expected * 1e-12);

    // a sits at -x, so it is pulled toward +x; b the other way
    assert!(fa.x > 0.0, "a is not pulled toward b: {:?}", fa);
    assert!(fb.x < 0.0, "b is not pulled toward a: {:?}", fb);
    assert_vec_close(fa + fb, NVec3::zeros(), expected * 1e-12);
}

#[test]
fn gravity_superposition() {
    let mut world = two_body_world(2.0, 500.0);
    world
        .create_body("c", 800.0, Shape::Sphere, 0.0, NVec3::new(0.0, 3.0, -1.0))
        .unwrap();

    let a = world.body("a").unwrap();
    let b = world.body("b").unwrap();
    let c = world.body("c").unwrap();

    let pair_ab = mutual_gravity(a, &[b.clone()]);
    let pair_ac = mutual_gravity(a, &[c.clone()]);
    let total = forces_on(&world, "a").gravity;

    assert_vec_close(total, pair_ab + pair_ac, total.norm() * 1e-12);
}

#[test]
fn gravity_skips_self_by_id() {
    let world = two_body_world(1.0, 10.0);
    let a = world.body("a").unwrap();

    // A copy of `a` in the list must not attract `a`
    let alone = mutual_gravity(a, &[a.clone()]);
    assert_eq!(alone, NVec3::zeros());
}

#[test]
fn earth_masses_one_metre_apart() {
    let m = 5.972e24;
    let world = two_body_world(1.0, m);

    let f = forces_on(&world, "a").gravity;
    let expected = G * m * m;

    assert!((f.norm() - expected).abs() / expected < 1e-12);
    assert!((f.norm() - 2.38e39).abs() / 2.38e39 < 1e-2);
    assert!(f.x > 0.0);

    // a huge step is allowed and stays finite
    let mut world = world;
    world.tick(1e-6);
    assert!(world.body("a").unwrap().position().iter().all(|c| c.is_finite()));
}

#[test]
fn drag_opposes_velocity() {
    let mut world = World::new(Environment::free_space(1.2)).unwrap();
    let body = Body::new("d", 1.0, Shape::FlatPlate, 0.5, NVec3::zeros())
        .unwrap()
        .with_thrust(Thrust::from_degrees(5.0, 30.0, 45.0));
    world.insert_body(body).unwrap();
    world.tick(0.1);

    let b = world.body("d").unwrap();
    let v = b.velocity();
    let drag = drag_force(b, 1.2);

    assert!(v.norm() > 0.0);
    let speed = v.norm();
    let expected = 0.5 * Shape::FlatPlate.drag_coefficient() * 1.2 * speed * speed * 0.5;
    assert!((drag.norm() - expected).abs() < 1e-12);

    // anti-parallel: cos(angle) == -1
    let cos = drag.dot(&v) / (drag.norm() * v.norm());
    assert!((cos + 1.0).abs() < 1e-12, "drag not anti-parallel: cos = {cos}");
}

#[test]
fn drag_is_zero_at_rest() {
    let b = Body::new("still", 1.0, Shape::Sphere, 2.0, NVec3::zeros()).unwrap();
    let drag = drag_force(&b, 1000.0);

    assert_eq!(drag, NVec3::zeros());
    assert!(drag.iter().all(|c| c.is_finite()));
}

#[test]
fn resting_on_surface_has_no_net_vertical_force() {
    let mut world = World::new(Environment::earth()).unwrap();
    world.create_body("rock", 3.0, Shape::Cube, 0.2, NVec3::zeros()).unwrap();

    let f = forces_on(&world, "rock");
    assert!(f.gravity.y < 0.0);
    assert!(f.normal.y > 0.0);
    assert!(f.total().y.abs() < f.gravity.norm() * 1e-12);

    for _ in 0..10 {
        world.tick(0.01);
    }
    let b = world.body("rock").unwrap();
    assert!(b.position().y.abs() < 1e-9);
}

#[test]
fn normal_force_absent_above_surface() {
    let mut world = World::new(Environment::earth()).unwrap();
    world
        .create_body("ball", 1.0, Shape::Sphere, 0.01, NVec3::new(0.0, 10.0, 0.0))
        .unwrap();

    let f = forces_on(&world, "ball");
    assert_eq!(f.normal, NVec3::zeros());
    // ~9.82 N for 1 kg at 10 m above an Earth-sized body
    assert!((f.gravity.y + 9.82).abs() < 0.01, "{:?}", f.gravity);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn vertical_thrust_one_tick() {
    let mut world = vacuum_world();
    let body = Body::new("A", 1.0, Shape::Sphere, 0.0, NVec3::zeros())
        .unwrap()
        .with_thrust(Thrust::from_degrees(10.0, 90.0, 0.0));
    world.insert_body(body).unwrap();

    world.tick(1.0);

    let a = world.body("A").unwrap();
    assert_vec_close(a.acceleration(), NVec3::new(0.0, 10.0, 0.0), 1e-9);
    assert_vec_close(a.velocity(), NVec3::new(0.0, 10.0, 0.0), 1e-9);
    assert_vec_close(a.position(), NVec3::new(0.0, 10.0, 0.0), 1e-9);
    assert!((a.distance() - 10.0).abs() < 1e-9);
    assert_eq!(a.trajectory().len(), 2);
}

#[test]
fn zero_dt_only_duplicates_trajectory_point() {
    let mut world = vacuum_world();
    let body = Body::new("z", 2.0, Shape::Sphere, 0.0, NVec3::new(0.0, 1.0, 0.0))
        .unwrap()
        .with_thrust(Thrust::from_degrees(4.0, 0.0, 0.0));
    world.insert_body(body).unwrap();
    world.tick(0.5);

    let before = world.body("z").unwrap().clone();
    world.tick(0.0);
    let after = world.body("z").unwrap();

    assert_eq!(after.position(), before.position());
    assert_eq!(after.velocity(), before.velocity());
    assert_eq!(after.trajectory().len(), before.trajectory().len() + 1);
    let pts = after.trajectory().points();
    assert_eq!(pts[pts.len() - 1], pts[pts.len() - 2]);
}

#[test]
fn surface_clamp_stops_tunnelling() {
    let mut world = World::new(Environment::earth()).unwrap();
    world
        .create_body("drop", 1.0, Shape::Sphere, 0.0, NVec3::new(0.0, 0.001, 0.0))
        .unwrap();

    world.tick(1.0);

    let b = world.body("drop").unwrap();
    assert_eq!(b.position().y, 0.0);
    assert!(b.trajectory().iter().all(|p| p.y >= 0.0));
}

#[test]
fn tick_is_simultaneous() {
    // Same bodies, opposite insertion order, same result
    let mut ab = two_body_world(4.0, 1.0e9);
    let mut ba = vacuum_world();
    ba.create_body("b", 1.0e9, Shape::Sphere, 0.0, NVec3::new(2.0, 0.0, 0.0)).unwrap();
    ba.create_body("a", 1.0e9, Shape::Sphere, 0.0, NVec3::new(-2.0, 0.0, 0.0)).unwrap();

    for _ in 0..50 {
        ab.tick(0.1);
        ba.tick(0.1);
    }

    for id in ["a", "b"] {
        assert_eq!(ab.body(id).unwrap().position(), ba.body(id).unwrap().position());
    }

    // symmetric pair stays symmetric about the origin
    let pa = ab.body("a").unwrap().position();
    let pb = ab.body("b").unwrap().position();
    assert!((pa + pb).norm() < 1e-12);
    assert!(pa.x > -2.0, "bodies did not attract");
}

#[test]
fn empty_world_tick_still_advances_time() {
    let mut world = vacuum_world();
    let report = world.tick(0.01);
    assert!(report.is_clean());
    assert!(world.is_empty());
    world.tick(0.01);
    assert!((world.time() - 0.02).abs() < 1e-12);

    // A body created later joins a clock that kept running
    world.create_body("late", 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    world.tick(0.01);
    assert!((world.time() - 0.03).abs() < 1e-12);
}

#[test]
fn custom_force_set_drives_tick() {
    // Thrust only: the heavy neighbour exerts no pull
    let mut world = vacuum_world().with_forces(ForceSet::new().with(DevelopedThrust));
    let body = Body::new("a", 1.0, Shape::Sphere, 0.0, NVec3::zeros())
        .unwrap()
        .with_thrust(Thrust::from_degrees(2.0, 0.0, 0.0));
    world.insert_body(body).unwrap();
    world.create_body("heavy", 1.0e12, Shape::Sphere, 0.0, NVec3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(world.forces().len(), 1);

    world.tick(1.0);
    let a = world.body("a").unwrap();
    assert_vec_close(a.velocity(), NVec3::new(0.0, 0.0, 2.0), 1e-12);
    assert_eq!(a.forces().gravity, NVec3::zeros());
    assert_eq!(world.body("heavy").unwrap().velocity(), NVec3::zeros());

    // Gravity only: the pair attracts, thrust is ignored
    let mut world = two_body_world(1.0, 1.0e6).with_forces(ForceSet::new().with(Gravitation));
    world.apply_control_to("a", ControlCommand::IncreaseThrust, 0.0).unwrap();
    world.tick(1.0);
    let a = world.body("a").unwrap();
    assert_eq!(a.forces().developed, NVec3::zeros());
    assert!(a.velocity().x > 0.0);
}

// ==================================================================================
// World lifecycle and control tests
// ==================================================================================

#[test]
fn duplicate_id_rejected_and_original_untouched() {
    let mut world = vacuum_world();
    world.create_body("dup", 1.0, Shape::Sphere, 0.1, NVec3::new(1.0, 0.0, 0.0)).unwrap();

    let err = world
        .create_body("dup", 99.0, Shape::Cube, 5.0, NVec3::new(7.0, 7.0, 7.0))
        .unwrap_err();
    assert!(matches!(err, SimError::DuplicateId(ref id) if id == "dup"));

    let b = world.body("dup").unwrap();
    assert_eq!(world.len(), 1);
    assert_eq!(b.mass(), 1.0);
    assert_eq!(b.shape(), Shape::Sphere);
    assert_eq!(b.position(), NVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn invalid_mass_rejected() {
    let mut world = vacuum_world();
    for mass in [0.0, -1.0, f64::NAN] {
        let err = world.create_body("bad", mass, Shape::Sphere, 0.1, NVec3::zeros()).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter(_)));
    }
    let err = world.create_body("bad", 1.0, Shape::Sphere, -0.1, NVec3::zeros()).unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter(_)));
    assert!(world.is_empty());
}

#[test]
fn invalid_environment_rejected() {
    assert!(World::new(Environment::free_space(-1.0)).is_err());
    assert!(World::new(Environment::near_body(1.0, 0.0, 1.0, None)).is_err());
    assert!(World::new(Environment::near_body(1.0, 1.0, -1.0, None)).is_err());
    assert!(World::new(Environment::near_body(1.0, 1.0, 1.0, Some(-5.0))).is_err());
}

#[test]
fn ids_that_escape_the_log_dir_rejected() {
    let mut world = vacuum_world();
    for id in ["../escaped", "a/b", "a\\b", "..", ""] {
        let result = world.create_body(id, 1.0, Shape::Sphere, 0.0, NVec3::zeros());
        assert!(matches!(result, Err(SimError::InvalidParameter(_))), "id {id:?} accepted");
    }
    assert!(world.is_empty());

    // Plain ids still work, dots included
    world.create_body("stage.1", 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    assert_eq!(world.len(), 1);
}

#[test]
fn unknown_ids_are_not_found() {
    let mut world = vacuum_world();
    assert!(matches!(world.set_controlled("ghost"), Err(SimError::NotFound(_))));
    assert!(matches!(world.delete_body("ghost"), Err(SimError::NotFound(_))));
    assert!(matches!(
        world.apply_control_to("ghost", ControlCommand::IncreaseThrust, 0.0),
        Err(SimError::NotFound(_))
    ));
}

#[test]
fn deleting_controlled_body_clears_reference() {
    let mut world = two_body_world(1.0, 1.0);
    world.set_controlled("a").unwrap();
    world.apply_control(ControlCommand::IncreaseThrust, 0.01);
    assert_eq!(world.controlled().unwrap().thrust().magnitude, 1.0);

    let removed = world.delete_body("a").unwrap();
    assert_eq!(removed.id(), "a");
    assert!(world.controlled().is_none());
    assert!(world.controlled_id().is_none());

    // no target: commands are ignored, nothing else changes
    world.apply_control(ControlCommand::IncreaseThrust, 0.01);
    assert_eq!(world.body("b").unwrap().thrust().magnitude, 0.0);
}

#[test]
fn deleting_other_body_keeps_reference() {
    let mut world = two_body_world(1.0, 1.0);
    world.set_controlled("b").unwrap();
    world.delete_body("a").unwrap();
    assert_eq!(world.controlled_id(), Some("b"));
}

#[test]
fn control_commands_steer_thrust() {
    let mut world = vacuum_world();
    world.create_body("ship", 1.0, Shape::Ellipsoid, 0.0, NVec3::zeros()).unwrap();
    world.set_controlled("ship").unwrap();

    for _ in 0..5 {
        world.apply_control(ControlCommand::IncreaseThrust, 0.01);
    }
    world.apply_control(ControlCommand::DecreaseThrust, 0.01);
    for _ in 0..90 {
        world.apply_control(ControlCommand::RaiseElevation, 0.01);
    }
    world.apply_control(ControlCommand::TurnLeft, 0.01);
    world.apply_control(ControlCommand::TurnRight, 0.01);

    let t = world.controlled().unwrap().thrust();
    assert_eq!(t.magnitude, 4.0);
    assert!((t.elevation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    assert!(t.azimuth.abs() < 1e-12);

    // thrust straight up after steering
    world.tick(1.0);
    assert_vec_close(world.body("ship").unwrap().acceleration(), NVec3::new(0.0, 4.0, 0.0), 1e-9);
}

#[test]
fn dt_scaled_control_rates() {
    let mut world = vacuum_world().with_rates(ControlRates {
        magnitude_step: 20.0,
        angle_step: 1.0,
        scale_with_dt: true,
    });
    world.create_body("ship", 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    world.set_controlled("ship").unwrap();

    world.apply_control(ControlCommand::IncreaseThrust, 0.5);
    assert!((world.controlled().unwrap().thrust().magnitude - 10.0).abs() < 1e-12);
}

#[test]
fn cycle_controlled_wraps() {
    let mut world = two_body_world(1.0, 1.0);
    assert_eq!(world.cycle_controlled(), Some("a"));
    assert_eq!(world.cycle_controlled(), Some("b"));
    assert_eq!(world.cycle_controlled(), Some("a"));
}

#[test]
fn bodies_keep_insertion_order() {
    let mut world = vacuum_world();
    for id in ["c", "a", "b"] {
        world.create_body(id, 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    }
    let ids: Vec<&str> = world.bodies().iter().map(|b| b.id()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn shape_presets_have_fixed_coefficients() {
    let b = Body::new("plate", 1.0, Shape::FlatPlate, 1.0, NVec3::zeros()).unwrap();
    assert_eq!(b.drag_coefficient(), 1.28);
    assert!(Shape::ALL.iter().all(|s| s.drag_coefficient() > 0.0));
}

// ==================================================================================
// Trajectory log and scenario tests
// ==================================================================================

#[test]
fn world_writes_trajectory_log() {
    let dir = std::env::temp_dir().join(format!("kinematics-world-log-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let log = TrajectoryLog::create(&dir).unwrap();
    let path = log.path_for("lander");
    let mut world = vacuum_world().with_log(log);
    let body = Body::new("lander", 1.0, Shape::Sphere, 0.0, NVec3::zeros())
        .unwrap()
        .with_thrust(Thrust::from_degrees(1.0, 90.0, 0.0));
    world.insert_body(body).unwrap();

    for _ in 0..3 {
        assert!(world.tick(1.0).is_clean());
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "0 0 0");
    let last: Vec<f64> = lines[3].split(' ').map(|s| s.parse().unwrap()).collect();
    assert_eq!(last.len(), 3);
    assert!((last[1] - 6.0).abs() < 1e-9);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn log_failure_does_not_stop_tick() {
    let dir = std::env::temp_dir().join(format!("kinematics-broken-log-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let log = TrajectoryLog::create(&dir).unwrap();
    let mut world = vacuum_world().with_log(log);
    world.create_body("p", 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    let report = world.tick(0.01);
    assert_eq!(report.log_failures.len(), 1);
    assert_eq!(world.body("p").unwrap().trajectory().len(), 2);
}

const SCENARIO_YAML: &str = r#"
engine:
  tick: 0.02
  headless_ticks: 10
environment:
  ambient_density: 1.225
  gravity: "near_astronomical_body"
  astronomical_mass: 5.972e24
  astronomical_radius: 6.371e6
controls:
  angle_step_deg: 5.0
bodies:
  - id: "one"
    mass: 2.0
    shape: "cube"
    cross_section: 0.1
    x: [ 0.0, 5.0, 0.0 ]
  - id: "two"
    mass: 1.0
    x: [ 1.0, 0.0, 0.0 ]
    thrust: { magnitude: 30.0, elevation_deg: 90.0 }
    controlled: true
"#;

#[test]
fn scenario_from_yaml() {
    let cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    let mut scenario = Scenario::build_scenario(cfg).unwrap();

    assert_eq!(scenario.world.len(), 2);
    assert_eq!(scenario.world.controlled_id(), Some("two"));
    assert_eq!(scenario.clock.step(), 0.02);
    assert_eq!(scenario.world.body("one").unwrap().shape(), Shape::Cube);
    assert_eq!(scenario.world.body("two").unwrap().shape(), Shape::Sphere);
    assert!((scenario.world.rates().angle_step - 5.0_f64.to_radians()).abs() < 1e-12);

    let t = scenario.world.body("two").unwrap().thrust();
    assert!((t.elevation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

    assert_eq!(scenario.run_headless(), 0);
    assert!((scenario.world.time() - 0.2).abs() < 1e-9);
    // 30 N up against ~9.8 N of weight: "two" lifts off
    assert!(scenario.world.body("two").unwrap().position().y > 0.0);
    // "one" falls
    assert!(scenario.world.body("one").unwrap().position().y < 5.0);
}

#[test]
fn scenario_rejects_bad_bodies() {
    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.bodies[1].id = "one".into();
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::DuplicateId(_))));

    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.bodies[0].x = vec![1.0, 2.0];
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));

    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.environment.astronomical_radius = None;
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));
}

#[test]
fn scenario_rejects_bad_control_steps() {
    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.controls.magnitude_step = -5.0;
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));

    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.controls.angle_step_deg = f64::NAN;
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));

    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.engine.tick = 0.0;
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));

    let mut cfg: ScenarioConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    cfg.bodies[0].id = "../outside".into();
    assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidParameter(_))));
}

#[test]
fn increase_thrust_with_negative_dt_keeps_magnitude_non_negative() {
    let mut world = vacuum_world().with_rates(ControlRates {
        magnitude_step: 1.0,
        angle_step: 1.0,
        scale_with_dt: true,
    });
    world.create_body("a", 1.0, Shape::Sphere, 0.0, NVec3::zeros()).unwrap();
    world.set_controlled("a").unwrap();

    world.apply_control(ControlCommand::IncreaseThrust, -3.0);
    assert_eq!(world.controlled().unwrap().thrust().magnitude, 0.0);
}
