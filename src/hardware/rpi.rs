//! Raspberry Pi backend (rppal).

use super::{MotionSensor, Thermometer, adt7410};
use crate::config::ThermometerConfig;
use crate::errors::{AppError, AppResult};
use rppal::gpio::{Gpio, InputPin};
use rppal::i2c::I2c;

/// PIR sensor on a BCM-numbered input pin.
///
/// rppal restores the pin's previous mode when the `InputPin` is dropped,
/// which is the only cleanup the pin needs.
pub struct GpioMotionSensor {
    pin: InputPin,
}

impl GpioMotionSensor {
    pub fn open(bcm: u8) -> AppResult<Self> {
        let gpio = Gpio::new().map_err(|e| AppError::Gpio(e.to_string()))?;
        let pin = gpio
            .get(bcm)
            .map_err(|e| AppError::Gpio(format!("pin {}: {}", bcm, e)))?
            .into_input();
        log::debug!("GPIO{} configured as input", bcm);
        Ok(Self { pin })
    }
}

impl MotionSensor for GpioMotionSensor {
    fn detected(&mut self) -> AppResult<bool> {
        Ok(self.pin.is_high())
    }
}

impl Drop for GpioMotionSensor {
    fn drop(&mut self) {
        log::debug!("releasing GPIO{}", self.pin.pin());
    }
}

/// ADT7410 on the I2C bus.
pub struct Adt7410 {
    bus: I2c,
    register: u8,
}

impl Adt7410 {
    pub fn open(cfg: &ThermometerConfig) -> AppResult<Self> {
        let mut bus = I2c::with_bus(cfg.bus).map_err(|e| AppError::I2c(e.to_string()))?;
        bus.set_slave_address(cfg.address)
            .map_err(|e| AppError::I2c(format!("address {:#04x}: {}", cfg.address, e)))?;
        Ok(Self {
            bus,
            register: cfg.register,
        })
    }
}

impl Thermometer for Adt7410 {
    fn read_celsius(&mut self) -> AppResult<f64> {
        let word = self
            .bus
            .smbus_read_word(self.register)
            .map_err(|e| AppError::I2c(e.to_string()))?;
        Ok(adt7410::decode_word(word))
    }
}
