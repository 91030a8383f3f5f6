pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scenario;
pub mod world;
pub mod control;
pub mod trajectory;
pub mod error;
