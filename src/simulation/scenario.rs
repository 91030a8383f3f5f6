//! Build a fully-initialized simulation scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`:
//! - the `World` with its environment, control rates, optional trajectory
//!   log and every configured body,
//! - the `TickClock` that paces `World::tick`,
//! - the number of ticks to run when no viewer is attached.
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! tick, input and drawing systems of the viewer.

use bevy::prelude::Resource;
use log::info;

use crate::configuration::config::{BodyConfig, EnvironmentConfig, GravityConfig, ScenarioConfig};
use crate::simulation::control::ControlRates;
use crate::simulation::engine::TickClock;
use crate::simulation::error::SimError;
use crate::simulation::params::Environment;
use crate::simulation::states::{Body, NVec3, Thrust};
use crate::simulation::trajectory::TrajectoryLog;
use crate::simulation::world::World;

/// Ticks run by `--headless` when the scenario does not say
pub const DEFAULT_HEADLESS_TICKS: u64 = 1000;

#[derive(Resource, Debug)]
pub struct Scenario {
    pub world: World,
    pub clock: TickClock,
    pub headless_ticks: u64,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        let clock = TickClock::new(cfg.engine.tick)?;

        // Environment (runtime) from EnvironmentConfig
        let environment = build_environment(&cfg.environment)?;

        // Control rates, angles converted to radians
        let rates = ControlRates {
            magnitude_step: cfg.controls.magnitude_step,
            angle_step: cfg.controls.angle_step_deg.to_radians(),
            scale_with_dt: cfg.controls.scale_with_dt,
        };
        rates.validate()?;

        let mut world = World::new(environment)?.with_rates(rates);
        if let Some(dir) = &cfg.engine.log_dir {
            world = world.with_log(TrajectoryLog::create(dir)?);
        }

        // Bodies: map `BodyConfig` -> runtime `Body`
        let mut controlled = None;
        for bc in &cfg.bodies {
            world.insert_body(build_body(bc)?)?;
            if bc.controlled && controlled.is_none() {
                controlled = Some(bc.id.clone());
            }
        }

        // Default to the first body so the keyboard always has a target
        match controlled {
            Some(id) => world.set_controlled(&id)?,
            None => {
                world.cycle_controlled();
            }
        }

        info!(
            "scenario ready: {} bodies, tick = {} s, gravity = {:?}",
            world.len(),
            cfg.engine.tick,
            world.environment().gravity
        );

        Ok(Self {
            world,
            clock,
            headless_ticks: cfg.engine.headless_ticks.unwrap_or(DEFAULT_HEADLESS_TICKS),
        })
    }

    /// Run the configured number of ticks without a viewer
    pub fn run_headless(&mut self) -> usize {
        let dt = self.clock.step();
        let mut log_failures = 0;
        for _ in 0..self.headless_ticks {
            log_failures += self.world.tick(dt).log_failures.len();
        }
        log_failures
    }
}

fn build_environment(cfg: &EnvironmentConfig) -> Result<Environment, SimError> {
    let environment = match cfg.gravity {
        GravityConfig::FreeSpace => Environment::free_space(cfg.ambient_density),
        GravityConfig::NearAstronomicalBody => {
            let mass = cfg.astronomical_mass.ok_or_else(|| {
                SimError::InvalidParameter("astronomical_mass is required near an astronomical body".into())
            })?;
            let radius = cfg.astronomical_radius.ok_or_else(|| {
                SimError::InvalidParameter("astronomical_radius is required near an astronomical body".into())
            })?;
            Environment::near_body(cfg.ambient_density, mass, radius, cfg.soil_density)
        }
    };
    environment.validate()?;
    Ok(environment)
}

fn build_body(bc: &BodyConfig) -> Result<Body, SimError> {
    let &[x, y, z] = bc.x.as_slice() else {
        return Err(SimError::InvalidParameter(format!(
            "body `{}`: position needs 3 components, got {}",
            bc.id,
            bc.x.len()
        )));
    };

    let thrust = Thrust::from_degrees(
        bc.thrust.magnitude,
        bc.thrust.elevation_deg,
        bc.thrust.azimuth_deg,
    );

    Ok(Body::new(bc.id.clone(), bc.mass, bc.shape, bc.cross_section, NVec3::new(x, y, z))?.with_thrust(thrust))
}
