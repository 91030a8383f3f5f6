//! Force contributors for the point-mass engine
//!
//! Every function here is a pure function of the state it is handed:
//! - developed (operator thrust),
//! - drag,
//! - gravity (mutual n-body or a single astronomical body),
//! - normal reaction from the surface.
//!
//! [`compute_forces`] evaluates all four for one body against the pre-tick state of
//! the whole body collection. [`ForceSet`] composes the same contributors as
//! [`ForceTerm`]s over every body at once; `World::tick` drives one.

use crate::simulation::params::{Environment, GravityMode, G};
use crate::simulation::states::{Body, Forces, NVec3, Thrust};

/// Spherical → Cartesian conversion of the operator thrust
/// - elevation is measured from the xz plane toward +y
/// - azimuth is measured from +z toward +x
pub fn developed_force(thrust: &Thrust) -> NVec3 {
    let m = thrust.magnitude.max(0.0);
    let (sin_el, cos_el) = thrust.elevation.sin_cos();
    let (sin_az, cos_az) = thrust.azimuth.sin_cos();

    NVec3::new(m * cos_el * sin_az, m * sin_el, m * cos_el * cos_az)
}

/// Density of the medium the body is moving through.
/// Below the surface of an astronomical body this is the soil density.
pub fn effective_density(body: &Body, env: &Environment) -> f64 {
    match env.gravity {
        GravityMode::NearAstronomicalBody { soil_density, .. } if body.position.y < 0.0 => {
            soil_density.unwrap_or(env.ambient_density)
        }
        _ => env.ambient_density,
    }
}

/// Quadratic drag: |F| = ½·Cd·ρ·|v|²·A, directed along -v̂
pub fn drag_force(body: &Body, density: f64) -> NVec3 {
    let speed = body.velocity.norm();

    // v̂ is undefined at rest
    if speed == 0.0 {
        return NVec3::zeros();
    }

    let magnitude = 0.5 * body.drag_coefficient * density * speed * speed * body.cross_section;

    // -v̂ · |F|
    -body.velocity * (magnitude / speed)
}

/// Newtonian attraction of `body` toward every other body in `bodies`.
///
/// `bodies` is usually the whole pre-tick collection, `body` included;
/// it is skipped by id. Coincident bodies contribute nothing.
pub fn mutual_gravity(body: &Body, bodies: &[Body]) -> NVec3 {
    let mut total = NVec3::zeros();

    for other in bodies {
        if other.id == body.id {
            continue;
        }

        // r points from body to other, so the pull is along +r
        let r = other.position - body.position;
        let r2 = r.norm_squared();
        if r2 == 0.0 {
            continue;
        }

        // G·m_i·m_j / |r|² along r̂  ==  G·m_i·m_j · r / |r|³
        let inv_r = r2.sqrt().recip();
        let coef = G * body.mass * other.mass * inv_r * inv_r * inv_r;
        total += coef * r;
    }

    total
}

/// Pull of a fixed astronomical body whose centre lies at y = -radius
pub fn astronomical_gravity(body: &Body, mass: f64, radius: f64) -> NVec3 {
    let d = radius + body.position.y;
    if d == 0.0 {
        return NVec3::zeros();
    }
    -NVec3::y() * (G * body.mass * mass / (d * d))
}

pub fn gravity_force(body: &Body, bodies: &[Body], env: &Environment) -> NVec3 {
    match env.gravity {
        GravityMode::FreeSpace => mutual_gravity(body, bodies),
        GravityMode::NearAstronomicalBody { mass, radius, .. } => {
            astronomical_gravity(body, mass, radius)
        }
    }
}

/// Support from the surface: cancels the surface-level pull while the body
/// is at or below y = 0. No friction, no restitution.
pub fn normal_force(body: &Body, env: &Environment) -> NVec3 {
    match env.gravity {
        GravityMode::NearAstronomicalBody { mass, radius, .. } if body.position.y <= 0.0 => {
            NVec3::y() * (body.mass * G * mass / (radius * radius))
        }
        _ => NVec3::zeros(),
    }
}

/// Evaluate all force components acting on `body`.
/// `bodies` must be the pre-tick collection so every body sees the same state.
pub fn compute_forces(body: &Body, bodies: &[Body], env: &Environment) -> Forces {
    Forces {
        developed: developed_force(&body.thrust),
        drag: drag_force(body, effective_density(body, env)),
        gravity: gravity_force(body, bodies, env),
        normal: normal_force(body, env),
    }
}

// =========================================================================================
// Composable force terms
// =========================================================================================

/// A force source evaluated for every body of the pre-tick collection.
/// Each term writes only its own component of `out[i]`.
pub trait ForceTerm {
    fn name(&self) -> &'static str;
    fn contribute(&self, bodies: &[Body], env: &Environment, out: &mut [Forces]);
}

/// Operator thrust
pub struct DevelopedThrust;

impl ForceTerm for DevelopedThrust {
    fn name(&self) -> &'static str {
        "developed"
    }

    fn contribute(&self, bodies: &[Body], _env: &Environment, out: &mut [Forces]) {
        for (body, f) in bodies.iter().zip(out.iter_mut()) {
            f.developed = developed_force(&body.thrust);
        }
    }
}

/// Quadratic drag in the ambient medium (soil below the surface)
pub struct QuadraticDrag;

impl ForceTerm for QuadraticDrag {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn contribute(&self, bodies: &[Body], env: &Environment, out: &mut [Forces]) {
        for (body, f) in bodies.iter().zip(out.iter_mut()) {
            f.drag = drag_force(body, effective_density(body, env));
        }
    }
}

/// Mutual or astronomical gravity, depending on the environment
pub struct Gravitation;

impl ForceTerm for Gravitation {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn contribute(&self, bodies: &[Body], env: &Environment, out: &mut [Forces]) {
        for (body, f) in bodies.iter().zip(out.iter_mut()) {
            f.gravity = gravity_force(body, bodies, env);
        }
    }
}

pub struct SurfaceReaction;

impl ForceTerm for SurfaceReaction {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn contribute(&self, bodies: &[Body], env: &Environment, out: &mut [Forces]) {
        for (body, f) in bodies.iter().zip(out.iter_mut()) {
            f.normal = normal_force(body, env);
        }
    }
}

/// Collection of force terms; components no term writes stay zero
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send + Sync>>,
}

impl Default for ForceSet {
    /// Every contributor: thrust, drag, gravity and the surface reaction
    fn default() -> Self {
        Self::new()
            .with(DevelopedThrust)
            .with(QuadraticDrag)
            .with(Gravitation)
            .with(SurfaceReaction)
    }
}

impl std::fmt::Debug for ForceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.terms.iter().map(|t| t.name())).finish()
    }
}

impl ForceSet {
    /// Empty set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with(mut self, term: impl ForceTerm + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Forces on every body of `bodies`; `out[i]` belongs to `bodies[i]`
    pub fn accumulate(&self, bodies: &[Body], env: &Environment, out: &mut [Forces]) {
        for f in out.iter_mut() {
            *f = Forces::default();
        }
        for term in &self.terms {
            term.contribute(bodies, env, out);
        }
    }
}
