//! The simulation world: owns every body and drives one tick at a time
//!
//! `World` replaces any notion of global simulation state. The viewer, the
//! input layer and the headless runner all go through it:
//! - create / delete bodies,
//! - select which body receives operator commands (by id, never by index),
//! - advance all bodies by one step with [`World::tick`].

use log::{debug, info, warn};

use crate::simulation::control::{ControlCommand, ControlRates};
use crate::simulation::error::SimError;
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Environment;
use crate::simulation::states::{Body, Forces, NVec3, Shape};
use crate::simulation::trajectory::TrajectoryLog;

/// Outcome of a tick. Log failures are non-fatal: the in-memory state has
/// already advanced when they are reported.
#[derive(Debug, Default)]
pub struct TickReport {
    pub log_failures: Vec<SimError>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.log_failures.is_empty()
    }
}

#[derive(Debug)]
pub struct World {
    bodies: Vec<Body>,          // insertion order = iteration and display order
    environment: Environment,
    forces: ForceSet,
    controlled: Option<String>, // id of the body receiving operator commands
    rates: ControlRates,
    log: Option<TrajectoryLog>,
    time: f64,
}

impl World {
    pub fn new(environment: Environment) -> Result<Self, SimError> {
        environment.validate()?;
        Ok(Self {
            bodies: Vec::new(),
            environment,
            forces: ForceSet::default(),
            controlled: None,
            rates: ControlRates::default(),
            log: None,
            time: 0.0,
        })
    }

    pub fn with_rates(mut self, rates: ControlRates) -> Self {
        self.rates = rates;
        self
    }

    /// Replace the force terms evaluated each tick
    pub fn with_forces(mut self, forces: ForceSet) -> Self {
        self.forces = forces;
        self
    }

    /// Persist every trajectory point of every body through `log`
    pub fn with_log(mut self, log: TrajectoryLog) -> Self {
        self.log = Some(log);
        self
    }

    // =========================================================================================
    // Body lifecycle
    // =========================================================================================

    /// Create a body at rest and add it to the world
    pub fn create_body(
        &mut self,
        id: impl Into<String>,
        mass: f64,
        shape: Shape,
        cross_section: f64,
        position: NVec3,
    ) -> Result<&Body, SimError> {
        let id = id.into();
        if self.contains(&id) {
            return Err(SimError::DuplicateId(id));
        }
        let body = Body::new(id, mass, shape, cross_section, position)?;
        self.insert_body(body)
    }

    /// Add an already-built body. Rejected if its id is taken
    pub fn insert_body(&mut self, body: Body) -> Result<&Body, SimError> {
        if self.contains(&body.id) {
            return Err(SimError::DuplicateId(body.id));
        }

        debug!(
            "created body `{}` (m = {} kg, {:?}, A = {} m²) at {:?}",
            body.id,
            body.mass,
            body.shape,
            body.cross_section,
            body.position.as_slice()
        );

        // The initial position is the first line of the durable log as well
        if let Some(log) = &self.log {
            if let Err(e) = log.append(&body.id, &body.position) {
                warn!("{e}");
            }
        }

        self.bodies.push(body);
        let last = self.bodies.len() - 1;
        Ok(&self.bodies[last])
    }

    /// Remove a body. Clears the controlled reference if it pointed here
    pub fn delete_body(&mut self, id: &str) -> Result<Body, SimError> {
        let index = self.index_of(id).ok_or_else(|| SimError::NotFound(id.to_string()))?;
        let body = self.bodies.remove(index);

        if self.controlled.as_deref() == Some(id) {
            self.controlled = None;
        }

        info!("deleted body `{id}`");
        Ok(body)
    }

    // =========================================================================================
    // Queries
    // =========================================================================================

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn set_environment(&mut self, environment: Environment) -> Result<(), SimError> {
        environment.validate()?;
        self.environment = environment;
        Ok(())
    }

    pub fn rates(&self) -> &ControlRates {
        &self.rates
    }

    pub fn set_rates(&mut self, rates: ControlRates) {
        self.rates = rates;
    }

    /// Simulated time accumulated over all ticks (s)
    pub fn time(&self) -> f64 {
        self.time
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    fn body_mut(&mut self, id: &str) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    // =========================================================================================
    // Operator control
    // =========================================================================================

    pub fn set_controlled(&mut self, id: &str) -> Result<(), SimError> {
        if !self.contains(id) {
            return Err(SimError::NotFound(id.to_string()));
        }
        debug!("controlling body `{id}`");
        self.controlled = Some(id.to_string());
        Ok(())
    }

    pub fn clear_controlled(&mut self) {
        self.controlled = None;
    }

    pub fn controlled_id(&self) -> Option<&str> {
        self.controlled.as_deref()
    }

    pub fn controlled(&self) -> Option<&Body> {
        self.controlled.as_deref().and_then(|id| self.body(id))
    }

    /// Move control to the body after the current one, wrapping around
    pub fn cycle_controlled(&mut self) -> Option<&str> {
        if self.bodies.is_empty() {
            self.controlled = None;
            return None;
        }
        let next = match self.controlled.as_deref().and_then(|id| self.index_of(id)) {
            Some(i) => (i + 1) % self.bodies.len(),
            None => 0,
        };
        self.controlled = Some(self.bodies[next].id.clone());
        self.controlled.as_deref()
    }

    /// Apply `command` to the controlled body. No controlled body → no-op
    pub fn apply_control(&mut self, command: ControlCommand, dt: f64) {
        let Some(id) = self.controlled.clone() else {
            return;
        };
        // controlled always names a live body; delete_body keeps that true
        let _ = self.apply_control_to(&id, command, dt);
    }

    pub fn apply_control_to(&mut self, id: &str, command: ControlCommand, dt: f64) -> Result<(), SimError> {
        let rates = self.rates;
        let body = self.body_mut(id).ok_or_else(|| SimError::NotFound(id.to_string()))?;
        rates.apply(&mut body.thrust, command, dt);
        debug!(
            "`{id}` {:?}: |F| = {:.3} N, elevation = {:.1}°, azimuth = {:.1}°",
            command,
            body.thrust.magnitude,
            body.thrust.elevation.to_degrees(),
            body.thrust.azimuth.to_degrees()
        );
        Ok(())
    }

    // =========================================================================================
    // Tick
    // =========================================================================================

    /// Advance every body by `dt` seconds.
    ///
    /// Forces are evaluated for all bodies against the same pre-tick state,
    /// then every body is integrated. The result does not
    /// depend on iteration order. With zero bodies only the clock advances.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let mut report = TickReport::default();

        // All forces come from the untouched pre-tick bodies; nothing is
        // integrated until every force is known
        let mut forces = vec![Forces::default(); self.bodies.len()];
        self.forces.accumulate(&self.bodies, &self.environment, &mut forces);

        let surface_clamp = self.environment.has_surface();
        for (body, f) in self.bodies.iter_mut().zip(forces.iter()) {
            euler_step(body, f, dt, surface_clamp);

            if let Some(log) = &self.log {
                if let Err(e) = log.append(&body.id, &body.position) {
                    warn!("{e}");
                    report.log_failures.push(e);
                }
            }
        }

        self.time += dt;
        report
    }
}
