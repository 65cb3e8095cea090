//! Sensor access.
//!
//! The monitor loop only sees the [`MotionSensor`] and [`Thermometer`]
//! traits. On a Raspberry Pi (feature `rpi`) they are backed by rppal's
//! GPIO and I2C drivers; everywhere else a simulated backend stands in.
//! Handles release the underlying device when dropped.

pub mod adt7410;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod simulated;

use crate::config::{Config, ThermometerConfig};
use crate::errors::AppResult;
use clap::ValueEnum;

/// Digital input of a PIR motion sensor (active-high).
pub trait MotionSensor {
    fn detected(&mut self) -> AppResult<bool>;
}

/// Temperature in degrees Celsius.
pub trait Thermometer {
    fn read_celsius(&mut self) -> AppResult<f64>;
}

/// Fixed level reported by the simulated motion sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimulatedLevel {
    High,
    Low,
}

/// Open the motion sensor on `pin`, or a simulated one when `simulate` is set.
pub fn open_motion_sensor(
    pin: u8,
    simulate: Option<SimulatedLevel>,
) -> AppResult<Box<dyn MotionSensor>> {
    if let Some(level) = simulate {
        log::info!("using simulated motion sensor ({:?})", level);
        return Ok(Box::new(simulated::FixedSensor::new(
            level == SimulatedLevel::High,
        )));
    }
    open_gpio_sensor(pin)
}

/// Open the I2C thermometer, or a simulated one reading a constant.
pub fn open_thermometer(
    cfg: &Config,
    simulate: Option<SimulatedLevel>,
) -> AppResult<Box<dyn Thermometer>> {
    if simulate.is_some() {
        return Ok(Box::new(simulated::FixedThermometer::new(
            simulated::SIMULATED_CELSIUS,
        )));
    }
    open_i2c_thermometer(&cfg.thermometer)
}

#[cfg(feature = "rpi")]
fn open_gpio_sensor(pin: u8) -> AppResult<Box<dyn MotionSensor>> {
    Ok(Box::new(rpi::GpioMotionSensor::open(pin)?))
}

#[cfg(not(feature = "rpi"))]
fn open_gpio_sensor(pin: u8) -> AppResult<Box<dyn MotionSensor>> {
    Err(crate::errors::AppError::Gpio(format!(
        "GPIO support not compiled in (pin {}); rebuild with --features rpi or use --simulate",
        pin
    )))
}

#[cfg(feature = "rpi")]
fn open_i2c_thermometer(cfg: &ThermometerConfig) -> AppResult<Box<dyn Thermometer>> {
    Ok(Box::new(rpi::Adt7410::open(cfg)?))
}

#[cfg(not(feature = "rpi"))]
fn open_i2c_thermometer(cfg: &ThermometerConfig) -> AppResult<Box<dyn Thermometer>> {
    Err(crate::errors::AppError::I2c(format!(
        "I2C support not compiled in (bus {}); rebuild with --features rpi or use --simulate",
        cfg.bus
    )))
}
