pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, Shape, Thrust, Forces, NVec3};
pub use simulation::params::{Environment, GravityMode, G};
pub use simulation::forces::{ForceSet, ForceTerm, DevelopedThrust, QuadraticDrag, Gravitation, SurfaceReaction, compute_forces, developed_force, drag_force, gravity_force, mutual_gravity, astronomical_gravity, normal_force, effective_density};
pub use simulation::integrator::euler_step;
pub use simulation::world::{World, TickReport};
pub use simulation::control::{ControlCommand, ControlRates};
pub use simulation::trajectory::{Trajectory, TrajectoryLog};
pub use simulation::engine::TickClock;
pub use simulation::scenario::Scenario;
pub use simulation::error::SimError;

pub use configuration::config::{ScenarioConfig, EngineConfig, EnvironmentConfig, GravityConfig, ControlsConfig, BodyConfig, ThrustConfig};

pub use visualization::kin_vis3d::run_3d;

pub use benchmark::benchmark::{bench_tick, bench_tick_curve};
