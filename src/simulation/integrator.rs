//! Fixed-step time integrator for a single body
//!
//! Semi-implicit Euler: the velocity is kicked first and the position drifts
//! with the *new* velocity. One call appends exactly one trajectory point.

use crate::simulation::states::{Body, Forces};

/// Advance `body` by `dt` under `forces`.
///
/// `dt` is taken as given: `dt = 0` leaves the state unchanged apart from a
/// duplicate trajectory point, and large steps are simply unstable.
/// With `surface_clamp` set, the body is kept on or above the y = 0 plane.
pub fn euler_step(body: &mut Body, forces: &Forces, dt: f64, surface_clamp: bool) {
    body.forces = *forces;

    // a = ΣF / m
    body.acceleration = forces.total() / body.mass;

    // Kick: v_n+1 = v_n + a dt
    body.velocity += body.acceleration * dt;

    // Drift: x_n+1 = x_n + v_n+1 dt
    body.position += body.velocity * dt;

    if surface_clamp && body.position.y < 0.0 {
        body.position.y = 0.0;
    }

    body.distance += body.velocity.norm() * dt.abs();
    body.trajectory.push(body.position);
}
