//! Operator control commands for the developed force

use crate::simulation::error::SimError;
use crate::simulation::states::Thrust;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    RaiseElevation,
    LowerElevation,
    TurnLeft,
    TurnRight,
    IncreaseThrust,
    DecreaseThrust,
}

/// Size of one control step.
///
/// With `scale_with_dt == false` every command moves the control by a fixed
/// amount regardless of frame time. With `scale_with_dt == true` the steps are
/// rates per second and get multiplied by the `dt` passed with the command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRates {
    pub magnitude_step: f64, // N
    pub angle_step: f64,     // rad
    pub scale_with_dt: bool,
}

impl Default for ControlRates {
    fn default() -> Self {
        Self {
            magnitude_step: 1.0,
            angle_step: 1.0_f64.to_radians(),
            scale_with_dt: false,
        }
    }
}

impl ControlRates {
    /// Steps must be finite and non-negative
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.magnitude_step >= 0.0) || !self.magnitude_step.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "magnitude step must be non-negative, got {}",
                self.magnitude_step
            )));
        }
        if !(self.angle_step >= 0.0) || !self.angle_step.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "angle step must be non-negative, got {}",
                self.angle_step
            )));
        }
        Ok(())
    }

    /// Apply `command` to `thrust`. Magnitude is clamped at zero
    pub fn apply(&self, thrust: &mut Thrust, command: ControlCommand, dt: f64) {
        let scale = if self.scale_with_dt { dt } else { 1.0 };
        let dm = self.magnitude_step * scale;
        let da = self.angle_step * scale;

        match command {
            ControlCommand::RaiseElevation => thrust.elevation += da,
            ControlCommand::LowerElevation => thrust.elevation -= da,
            ControlCommand::TurnLeft => thrust.azimuth += da,
            ControlCommand::TurnRight => thrust.azimuth -= da,
            ControlCommand::IncreaseThrust => thrust.magnitude = (thrust.magnitude + dm).max(0.0),
            ControlCommand::DecreaseThrust => thrust.magnitude = (thrust.magnitude - dm).max(0.0),
        }
    }
}
