//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]      – tick size, headless run length, trajectory log directory
//! - [`EnvironmentConfig`] – ambient density and gravity mode
//! - [`ControlsConfig`]    – per-command control steps
//! - [`BodyConfig`]        – initial state for each body
//! - [`ScenarioConfig`]    – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   tick: 0.01              # fixed simulation step (s)
//!   headless_ticks: 1000    # ticks to run with --headless
//!   log_dir: "trajectories" # optional, one <id>.txt per body
//!
//! environment:
//!   ambient_density: 1.225
//!   gravity: "near_astronomical_body"  # or "free_space"
//!   astronomical_mass: 5.972e24
//!   astronomical_radius: 6.371e6
//!   soil_density: 1600.0
//!
//! controls:
//!   magnitude_step: 1.0     # N per key press
//!   angle_step_deg: 1.0     # degrees per key press
//!   scale_with_dt: false
//!
//! bodies:
//!   - id: "lander"
//!     mass: 1.0
//!     shape: "sphere"
//!     cross_section: 0.01
//!     x: [ 0.0, 0.0, 0.0 ]
//!     thrust: { magnitude: 12.0, elevation_deg: 60.0, azimuth_deg: 0.0 }
//!     controlled: true
//! ```
//!
//! [`crate::simulation::scenario::Scenario::build_scenario`] maps this into a
//! validated runtime `World`.

use serde::Deserialize;

use crate::simulation::engine::DEFAULT_TICK;
use crate::simulation::states::Shape;

/// Which gravity model the world uses
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityConfig {
    #[serde(rename = "free_space")] // Pairwise attraction between all bodies
    #[default]
    FreeSpace,

    #[serde(rename = "near_astronomical_body")] // One fixed body below the y = 0 surface
    NearAstronomicalBody,
}

fn default_tick() -> f64 {
    DEFAULT_TICK
}

#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_tick")]
    pub tick: f64, // fixed simulation step (s)
    pub headless_ticks: Option<u64>, // number of ticks for a headless run
    pub log_dir: Option<String>,     // trajectory log directory, no durable log when unset
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            headless_ticks: None,
            log_dir: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub ambient_density: f64, // kg/m³
    #[serde(default)]
    pub gravity: GravityConfig,
    pub astronomical_mass: Option<f64>,   // kg, required near an astronomical body
    pub astronomical_radius: Option<f64>, // m, required near an astronomical body
    pub soil_density: Option<f64>,        // kg/m³ below the surface
}

fn default_angle_step_deg() -> f64 {
    1.0
}

fn default_magnitude_step() -> f64 {
    1.0
}

#[derive(Deserialize, Debug, Clone)]
pub struct ControlsConfig {
    #[serde(default = "default_magnitude_step")]
    pub magnitude_step: f64, // N per command
    #[serde(default = "default_angle_step_deg")]
    pub angle_step_deg: f64, // degrees per command
    #[serde(default)]
    pub scale_with_dt: bool, // treat steps as per-second rates
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            magnitude_step: default_magnitude_step(),
            angle_step_deg: default_angle_step_deg(),
            scale_with_dt: false,
        }
    }
}

/// Initial developed force, angles in degrees
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ThrustConfig {
    #[serde(default)]
    pub magnitude: f64,
    #[serde(default)]
    pub elevation_deg: f64,
    #[serde(default)]
    pub azimuth_deg: f64,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub id: String,         // unique identifier, also the trajectory log file name
    pub mass: f64,          // kg
    #[serde(default)]
    pub shape: Shape,       // drag preset
    #[serde(default)]
    pub cross_section: f64, // m²
    pub x: Vec<f64>,        // initial position [x, y, z]
    #[serde(default)]
    pub thrust: ThrustConfig,
    #[serde(default)]
    pub controlled: bool,   // receives operator input at start
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}
