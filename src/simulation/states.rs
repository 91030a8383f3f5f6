//! Core state types for the point-mass simulation.
//!
//! - `Body`   one simulated point mass with its kinematic state and history
//! - `Shape`  closed set of aerodynamic presets, each mapped to a drag coefficient
//! - `Thrust` operator-controlled developed force in spherical form
//! - `Forces` the four force components evaluated on the last tick
//!
//! All vectors are `NVec3` in SI units (m, m/s, m/s², N).

use nalgebra::Vector3;
use serde::Deserialize;

use crate::simulation::error::SimError;
use crate::simulation::trajectory::Trajectory;

pub type NVec3 = Vector3<f64>;

/// Aerodynamic shape presets
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    FlatPlate,
    #[default]
    Sphere,
    RoundedHemisphere,
    FlatHemisphere,
    Ellipsoid,
    Cube,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::FlatPlate,
        Shape::Sphere,
        Shape::RoundedHemisphere,
        Shape::FlatHemisphere,
        Shape::Ellipsoid,
        Shape::Cube,
    ];

    /// Drag coefficient of the preset (dimensionless)
    pub fn drag_coefficient(self) -> f64 {
        match self {
            Shape::FlatPlate => 1.28,
            Shape::Sphere => 0.47,
            Shape::RoundedHemisphere => 0.42,
            Shape::FlatHemisphere => 1.17,
            Shape::Ellipsoid => 0.59,
            Shape::Cube => 1.05,
        }
    }
}

/// Developed force controls. Angles are in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thrust {
    pub magnitude: f64, // N, never negative
    pub elevation: f64, // angle above the xz plane
    pub azimuth: f64,   // angle around +y, measured from +z toward +x
}

impl Thrust {
    /// Build from degrees, the unit used by scenario files and the viewer HUD
    pub fn from_degrees(magnitude: f64, elevation_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            magnitude: magnitude.max(0.0),
            elevation: elevation_deg.to_radians(),
            azimuth: azimuth_deg.to_radians(),
        }
    }
}

/// Force components acting on a body at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    pub developed: NVec3,
    pub drag: NVec3,
    pub gravity: NVec3,
    pub normal: NVec3,
}

impl Default for Forces {
    fn default() -> Self {
        Self {
            developed: NVec3::zeros(),
            drag: NVec3::zeros(),
            gravity: NVec3::zeros(),
            normal: NVec3::zeros(),
        }
    }
}

impl Forces {
    /// Net force. Each component already carries its own direction
    pub fn total(&self) -> NVec3 {
        self.developed + self.drag + self.gravity + self.normal
    }
}

/// One simulated point mass.
///
/// Fields are crate-private: the id is fixed at creation, the trajectory only
/// grows, and thrust only changes through control commands. Everything is
/// readable through the getters below, which is all the renderer needs.
#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) id: String,
    pub(crate) mass: f64,
    pub(crate) shape: Shape,
    pub(crate) drag_coefficient: f64,
    pub(crate) cross_section: f64,
    pub(crate) position: NVec3,
    pub(crate) velocity: NVec3,
    pub(crate) acceleration: NVec3,
    pub(crate) thrust: Thrust,
    pub(crate) forces: Forces,
    pub(crate) trajectory: Trajectory,
    pub(crate) distance: f64, // path length travelled so far
}

/// Ids double as trajectory file names: `<log dir>/<id>.txt`
fn validate_id(id: &str) -> Result<(), SimError> {
    if id.is_empty() {
        return Err(SimError::InvalidParameter("body id must not be empty".into()));
    }
    if id.contains(['/', '\\']) || id.contains("..") {
        return Err(SimError::InvalidParameter(format!(
            "body id `{id}` must not contain path separators or `..`"
        )));
    }
    Ok(())
}

impl Body {
    /// Create a body at rest at `position`.
    ///
    /// Fails with [`SimError::InvalidParameter`] when `mass <= 0`, the
    /// cross-section is negative or not finite, or the id is not usable as a
    /// trajectory file name. The initial position is recorded in the
    /// trajectory immediately.
    pub fn new(
        id: impl Into<String>,
        mass: f64,
        shape: Shape,
        cross_section: f64,
        position: NVec3,
    ) -> Result<Self, SimError> {
        let id = id.into();
        validate_id(&id)?;
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "body `{id}`: mass must be positive, got {mass}"
            )));
        }
        if !(cross_section >= 0.0) || !cross_section.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "body `{id}`: cross-section must be non-negative, got {cross_section}"
            )));
        }
        if !position.iter().all(|c| c.is_finite()) {
            return Err(SimError::InvalidParameter(format!(
                "body `{id}`: position must be finite"
            )));
        }

        let mut trajectory = Trajectory::new();
        trajectory.push(position);

        Ok(Self {
            id,
            mass,
            shape,
            drag_coefficient: shape.drag_coefficient(),
            cross_section,
            position,
            velocity: NVec3::zeros(),
            acceleration: NVec3::zeros(),
            thrust: Thrust::default(),
            forces: Forces::default(),
            trajectory,
            distance: 0.0,
        })
    }

    /// Set the initial developed-force controls (scenario loading)
    pub fn with_thrust(mut self, thrust: Thrust) -> Self {
        self.thrust = Thrust {
            magnitude: thrust.magnitude.max(0.0),
            ..thrust
        };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn cross_section(&self) -> f64 {
        self.cross_section
    }

    pub fn position(&self) -> NVec3 {
        self.position
    }

    pub fn velocity(&self) -> NVec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> NVec3 {
        self.acceleration
    }

    pub fn thrust(&self) -> Thrust {
        self.thrust
    }

    /// Force components from the most recent tick
    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}
