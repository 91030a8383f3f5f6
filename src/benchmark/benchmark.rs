use std::time::Instant;

use crate::simulation::error::SimError;
use crate::simulation::params::Environment;
use crate::simulation::states::{NVec3, Shape};
use crate::simulation::world::World;

/// Helper to build a free-space world of `n` bodies
fn make_world(n: usize) -> Result<World, SimError> {
    // Free space with a thin atmosphere so drag is evaluated too
    let mut world = World::new(Environment::free_space(0.01))?;

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        world.create_body(format!("b{i}"), 1.0e6, Shape::Sphere, 0.1, x)?;
    }

    Ok(world)
}

/// Time `World::tick` (pairwise gravity + drag + integration) for a range of n
pub fn bench_tick() -> Result<(), SimError> {
    let ns = [50, 100, 200, 400, 800];
    let steps = 5; // ticks per size

    for n in ns {
        let mut world = make_world(n)?;

        // Warm up
        world.tick(0.01);

        let t0 = Instant::now();
        for _ in 0..steps {
            world.tick(0.01);
        }
        let per_tick = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {n:5}, tick = {:8.6} s", per_tick);
    }
    Ok(())
}

/// Same measurement over a finer n grid, printed as CSV for graphing
pub fn bench_tick_curve() -> Result<(), SimError> {
    println!("N,tick_ms");

    for n in (100..=2000).step_by(100) {
        // Large n: only 1 tick to avoid minutes of runtime
        let steps = if n <= 800 { 5 } else { 1 };

        let mut world = make_world(n)?;

        let t0 = Instant::now();
        for _ in 0..steps {
            world.tick(0.01);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
    Ok(())
}
