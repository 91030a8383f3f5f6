//! Physical environment of the simulation
//!
//! `Environment` holds what every force evaluation reads besides the bodies
//! themselves:
//! - ambient fluid density used for drag,
//! - the gravity mode (mutual n-body or a single dominant body below y = 0).

use crate::simulation::error::SimError;

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.6743e-11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravityMode {
    /// Pairwise Newtonian attraction between all live bodies
    FreeSpace,
    /// One fixed astronomical body whose surface is the y = 0 plane
    NearAstronomicalBody {
        mass: f64,                 // kg
        radius: f64,               // m, centre sits at y = -radius
        soil_density: Option<f64>, // density used below the surface, ambient if unset
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub ambient_density: f64, // kg/m³
    pub gravity: GravityMode,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ambient_density: 0.0,
            gravity: GravityMode::FreeSpace,
        }
    }
}

impl Environment {
    pub fn free_space(ambient_density: f64) -> Self {
        Self {
            ambient_density,
            gravity: GravityMode::FreeSpace,
        }
    }

    pub fn near_body(ambient_density: f64, mass: f64, radius: f64, soil_density: Option<f64>) -> Self {
        Self {
            ambient_density,
            gravity: GravityMode::NearAstronomicalBody {
                mass,
                radius,
                soil_density,
            },
        }
    }

    /// Earth-like preset: sea-level air, Earth mass and mean radius
    pub fn earth() -> Self {
        Self::near_body(1.225, 5.972e24, 6.371e6, None)
    }

    /// True when a surface exists and positions are clamped to y >= 0
    pub fn has_surface(&self) -> bool {
        matches!(self.gravity, GravityMode::NearAstronomicalBody { .. })
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.ambient_density >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "ambient density must be non-negative, got {}",
                self.ambient_density
            )));
        }
        if let GravityMode::NearAstronomicalBody {
            mass,
            radius,
            soil_density,
        } = self.gravity
        {
            if !(mass > 0.0) {
                return Err(SimError::InvalidParameter(format!(
                    "astronomical mass must be positive, got {mass}"
                )));
            }
            if !(radius > 0.0) {
                return Err(SimError::InvalidParameter(format!(
                    "astronomical radius must be positive, got {radius}"
                )));
            }
            if let Some(rho) = soil_density {
                if !(rho >= 0.0) {
                    return Err(SimError::InvalidParameter(format!(
                        "soil density must be non-negative, got {rho}"
                    )));
                }
            }
        }
        Ok(())
    }
}
