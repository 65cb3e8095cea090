//! Stand-ins for machines without GPIO/I2C (dry runs and CLI tests).

use super::{MotionSensor, Thermometer};
use crate::errors::AppResult;

pub const SIMULATED_CELSIUS: f64 = 21.5;

/// Motion sensor stuck at one level.
pub struct FixedSensor {
    level: bool,
}

impl FixedSensor {
    pub fn new(level: bool) -> Self {
        Self { level }
    }
}

impl MotionSensor for FixedSensor {
    fn detected(&mut self) -> AppResult<bool> {
        Ok(self.level)
    }
}

pub struct FixedThermometer {
    celsius: f64,
}

impl FixedThermometer {
    pub fn new(celsius: f64) -> Self {
        Self { celsius }
    }
}

impl Thermometer for FixedThermometer {
    fn read_celsius(&mut self) -> AppResult<f64> {
        Ok(self.celsius)
    }
}
