//! FRAM device driver
//!
//! [`FramDevice`] owns the bus handle, the optional write-protect pin and
//! the identification state of one physical chip. Construction runs the
//! identification step and applies the initial write-protect state; all
//! other operations are blocking single transactions on the bus.
//!
//! The driver keeps no lock. Sharing one chip between threads needs an
//! external mutex or a single owner.

mod access;
mod bits;
mod erase;

pub use access::CHUNK_SIZE;
pub use erase::{EraseProgress, NoProgress, ERASE_PROGRESS_STEP};

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::chip::{self, DeviceId, Geometry, IdField};
use crate::config::{FramConfig, SlaveAddress};
use crate::error::{Error, Result};
use crate::wp::{NoPin, WpStatus};

/// Driver for one MB85RC FRAM chip
pub struct FramDevice<I2C, WP = NoPin> {
    i2c: I2C,
    wp_pin: Option<WP>,
    config: FramConfig,
    wp_status: WpStatus,
    ready: bool,
    id: DeviceId,
    geometry: Geometry,
}

impl<I2C, WP> FramDevice<I2C, WP>
where
    I2C: I2c,
    WP: OutputPin,
{
    /// Create the driver, identify the chip and set up write protection
    ///
    /// A chip that cannot be identified does not make construction fail:
    /// the device is returned with [`is_ready`](Self::is_ready) false.
    /// Construction only fails on an inconsistent write-protect setup or
    /// when the WP pin cannot be driven.
    pub fn new(i2c: I2C, wp_pin: Option<WP>, config: FramConfig) -> Result<Self, I2C::Error> {
        if config.manage_wp && wp_pin.is_none() {
            return Err(Error::MissingWpPin);
        }

        let mut device = Self {
            i2c,
            wp_pin,
            config,
            wp_status: WpStatus::Disabled,
            ready: false,
            id: DeviceId::default(),
            geometry: Geometry::NONE,
        };

        match device.check_device() {
            Ok(()) => log::info!(
                "FRAM at {}: {} Kbit ({} bytes)",
                device.config.address,
                device.geometry.density_kbit,
                device.geometry.max_address
            ),
            Err(e) => log::warn!("FRAM at {} not found: {}", device.config.address, e),
        }

        device.init_wp()?;

        log::debug!(
            "FRAM at {}: WP pin {}, WP management {}, WP {}",
            device.config.address,
            if device.wp_pin.is_some() { "present" } else { "absent" },
            device.config.manage_wp,
            device.wp_status
        );

        Ok(device)
    }

    /// (Re)run chip detection and refresh the cached IDs and geometry
    ///
    /// With a configured density the device ID sequence is skipped and a
    /// one-byte read at offset 0 stands in as the presence check.
    pub fn check_device(&mut self) -> Result<(), I2C::Error> {
        self.ready = false;
        self.id = DeviceId::default();
        self.geometry = Geometry::NONE;

        match self.config.density {
            Some(density) => {
                self.id = DeviceId::manual();
                self.geometry = density.geometry();
                let mut probe = [0u8; 1];
                self.read_array(0, &mut probe)?;
                log::debug!("FRAM at {}: manual density {}", self.config.address, density);
            }
            None => {
                let id = chip::read_device_id(&mut self.i2c, self.config.address.get())
                    .map_err(Error::Bus)?;
                self.id = id;
                self.geometry = Geometry::from_density_code(id.density_code);
                log::debug!("FRAM at {}: {}", self.config.address, id);

                if !chip::is_recognised(&self.id, &self.geometry) {
                    // Keep the decoded IDs for display, but no usable range
                    self.geometry = Geometry::NONE;
                    return Err(Error::Unidentified);
                }
            }
        }

        self.ready = true;
        Ok(())
    }

    fn init_wp(&mut self) -> Result<(), I2C::Error> {
        if !self.config.manage_wp {
            self.wp_status = WpStatus::Disabled;
            return Ok(());
        }
        match self.config.initial_wp {
            WpStatus::Enabled => self.enable_wp(),
            WpStatus::Disabled => self.disable_wp(),
        }
    }

    fn managed_pin(&mut self) -> Result<&mut WP, I2C::Error> {
        if !self.config.manage_wp {
            return Err(Error::WpNotManaged);
        }
        self.wp_pin.as_mut().ok_or(Error::WpNotManaged)
    }

    /// Drive WP high, blocking writes in the chip
    pub fn enable_wp(&mut self) -> Result<(), I2C::Error> {
        self.managed_pin()?.set_high().map_err(|_| Error::Pin)?;
        self.wp_status = WpStatus::Enabled;
        Ok(())
    }

    /// Drive WP low, allowing writes
    pub fn disable_wp(&mut self) -> Result<(), I2C::Error> {
        self.managed_pin()?.set_low().map_err(|_| Error::Pin)?;
        self.wp_status = WpStatus::Disabled;
        Ok(())
    }

    /// Read one identification value by its numeric selector (1 to 4)
    pub fn read_id_field(&self, selector: u8) -> Result<u16, I2C::Error> {
        IdField::try_from(selector)
            .map(|field| self.id_field(field))
            .map_err(Error::InvalidIdField)
    }
}

impl<I2C, WP> FramDevice<I2C, WP> {
    /// Whether a usable chip was detected by the last identification
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// IDs from the last identification (zero when it failed on the bus)
    pub fn device_id(&self) -> DeviceId {
        self.id
    }

    /// One identification value
    pub fn id_field(&self, field: IdField) -> u16 {
        match field {
            IdField::Manufacturer => self.id.manufacturer,
            IdField::Product => self.id.product,
            IdField::DensityCode => self.id.density_code,
            IdField::Density => self.geometry.density_kbit,
        }
    }

    /// Geometry from the last identification
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Exclusive upper bound on memory offsets (0 when unidentified)
    pub fn max_address(&self) -> u32 {
        self.geometry.max_address
    }

    /// Bus address the device was configured with
    pub fn address(&self) -> SlaveAddress {
        self.config.address
    }

    /// Configuration the device was built with
    pub fn config(&self) -> &FramConfig {
        &self.config
    }

    /// Last commanded write-protect state
    ///
    /// Always `Disabled` when WP is not managed.
    pub fn wp_status(&self) -> WpStatus {
        self.wp_status
    }

    /// Whether WP operations drive a pin
    pub fn is_wp_managed(&self) -> bool {
        self.config.manage_wp && self.wp_pin.is_some()
    }

    /// Borrow the bus
    pub fn bus(&self) -> &I2C {
        &self.i2c
    }

    /// Mutably borrow the bus
    pub fn bus_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Give back the bus and the WP pin
    pub fn release(self) -> (I2C, Option<WP>) {
        (self.i2c, self.wp_pin)
    }
}
