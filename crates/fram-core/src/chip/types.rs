//! FRAM chip type definitions

use core::fmt;

/// Manufacturer codes reported in the 12-bit manufacturer field
pub mod manufacturer {
    /// Fujitsu
    pub const FUJITSU: u16 = 0x00A;
    /// Cypress (FM24 and CY15B series)
    pub const CYPRESS: u16 = 0x004;
    /// Placeholder stored when the density was configured manually
    pub const MANUAL: u16 = 0xF00;
}

/// Product ID stored when the density was configured manually
pub const MANUAL_PRODUCT_ID: u16 = 0xF00;

/// Density code stored when the density was configured manually
pub const MANUAL_DENSITY_CODE: u16 = 0xF00;

/// Fields decoded from the 3-byte device ID response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceId {
    /// 12-bit manufacturer code
    pub manufacturer: u16,
    /// 12-bit product code (density nibble + proprietary product ID)
    pub product: u16,
    /// 4-bit density code
    pub density_code: u16,
}

impl DeviceId {
    /// Decode the raw response bytes
    ///
    /// The density nibble is the top nibble of the product code, so the
    /// low nibble of `raw[1]` is used twice.
    pub const fn from_raw(raw: [u8; 3]) -> Self {
        let manufacturer = ((raw[0] as u16) << 4) | ((raw[1] as u16) >> 4);
        let density_code = (raw[1] & 0x0F) as u16;
        let product = (((raw[1] & 0x0F) as u16) << 8) | raw[2] as u16;
        Self {
            manufacturer,
            product,
            density_code,
        }
    }

    /// Encode back into the 3 bytes a chip would answer with
    pub const fn to_raw(&self) -> [u8; 3] {
        [
            (self.manufacturer >> 4) as u8,
            (((self.manufacturer & 0x0F) << 4) as u8) | ((self.product >> 8) & 0x0F) as u8,
            self.product as u8,
        ]
    }

    /// IDs recorded for a chip whose density was configured manually
    pub const fn manual() -> Self {
        Self {
            manufacturer: manufacturer::MANUAL,
            product: MANUAL_PRODUCT_ID,
            density_code: MANUAL_DENSITY_CODE,
        }
    }

    /// Whether these IDs were set from manual configuration
    pub fn is_manual(&self) -> bool {
        self.manufacturer == manufacturer::MANUAL
    }

    /// Human-readable vendor name
    pub fn vendor(&self) -> &'static str {
        match self.manufacturer {
            manufacturer::FUJITSU => "Fujitsu",
            manufacturer::CYPRESS => "Cypress",
            manufacturer::MANUAL => "manual",
            _ => "unknown",
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "manufacturer 0x{:03X} ({}), product 0x{:03X}, density code 0x{:X}",
            self.manufacturer,
            self.vendor(),
            self.product,
            self.density_code
        )
    }
}

/// Selector for a single identification value
///
/// The numeric values match the selectors of the classic `getOneDeviceID`
/// interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    /// Manufacturer code
    Manufacturer = 1,
    /// Product code
    Product = 2,
    /// Density code
    DensityCode = 3,
    /// Density in kilobits
    Density = 4,
}

impl TryFrom<u8> for IdField {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Manufacturer),
            2 => Ok(Self::Product),
            3 => Ok(Self::DensityCode),
            4 => Ok(Self::Density),
            other => Err(other),
        }
    }
}

/// How a memory offset is put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// 2-byte big-endian word address after the device address
    #[default]
    TwoByte,
    /// 1-byte word address; the upper offset bits ride in the low bits of
    /// the I2C device address (4K and 16K parts)
    OneByte {
        /// Number of offset bits above bit 7 carried in the device address
        page_bits: u8,
    },
}

impl AddressMode {
    /// Frame `offset` for a chip at `base`
    ///
    /// In one-byte mode the select pins overlapped by page bits are not
    /// connected on the chip, so those bits of `base` are replaced.
    /// Returns the I2C address to use, the header bytes and the number of
    /// header bytes actually used.
    pub fn frame(self, base: u8, offset: u16) -> (u8, [u8; 2], usize) {
        match self {
            Self::TwoByte => (base, offset.to_be_bytes(), 2),
            Self::OneByte { page_bits } => {
                let mask = (1u8 << page_bits) - 1;
                let page = (offset >> 8) as u8 & mask;
                ((base & !mask) | page, [offset as u8, 0], 1)
            }
        }
    }
}

/// Memory geometry derived from the density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Density in kilobits (0 when unknown)
    pub density_kbit: u16,
    /// Exclusive upper bound on valid memory offsets (0 when unknown)
    pub max_address: u32,
    /// Wire framing of memory offsets
    pub address_mode: AddressMode,
}

impl Geometry {
    /// Geometry of an unidentified chip
    pub const NONE: Self = Self {
        density_kbit: 0,
        max_address: 0,
        address_mode: AddressMode::TwoByte,
    };

    const fn two_byte(density_kbit: u16, max_address: u32) -> Self {
        Self {
            density_kbit,
            max_address,
            address_mode: AddressMode::TwoByte,
        }
    }

    /// Resolve the geometry for a density code from the device ID
    ///
    /// Codes 3 to 7 are recognised. The 1M part (code 7) is capped at
    /// 65536 bytes: its upper half answers on the next I2C address and is
    /// driven as a second device.
    pub const fn from_density_code(code: u16) -> Self {
        match code {
            0x03 => Self::two_byte(64, 8192),
            0x04 => Self::two_byte(128, 16384),
            0x05 => Self::two_byte(256, 32768),
            0x06 => Self::two_byte(512, 65536),
            0x07 => Self::two_byte(1024, 65536),
            _ => Self::NONE,
        }
    }

    /// Whether a chip with this geometry can be addressed
    pub const fn is_valid(&self) -> bool {
        self.max_address != 0
    }
}

/// Resolve `(density_kbit, max_address)` for a density code
pub const fn resolve_geometry(code: u16) -> (u16, u32) {
    let g = Geometry::from_density_code(code);
    (g.density_kbit, g.max_address)
}

/// Chip density for parts configured without the device ID sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    /// 4 Kbit (MB85RC04V, FM24C04B)
    K4,
    /// 16 Kbit (MB85RC16, FM24C16B)
    K16,
    /// 64 Kbit (MB85RC64A, FM24CL64B)
    K64,
    /// 128 Kbit (MB85RC128A)
    K128,
    /// 256 Kbit (FM24W256)
    K256,
    /// 512 Kbit
    K512,
    /// 1 Mbit, driven as two 512 Kbit halves
    K1024,
}

impl Density {
    /// All densities, smallest first
    pub const ALL: [Density; 7] = [
        Density::K4,
        Density::K16,
        Density::K64,
        Density::K128,
        Density::K256,
        Density::K512,
        Density::K1024,
    ];

    /// Density in kilobits
    pub const fn kbit(self) -> u16 {
        match self {
            Self::K4 => 4,
            Self::K16 => 16,
            Self::K64 => 64,
            Self::K128 => 128,
            Self::K256 => 256,
            Self::K512 => 512,
            Self::K1024 => 1024,
        }
    }

    /// Look up a density by its size in kilobits
    pub fn from_kbit(kbit: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.kbit() == kbit)
    }

    /// Geometry for this density
    pub const fn geometry(self) -> Geometry {
        match self {
            Self::K4 => Geometry {
                density_kbit: 4,
                max_address: 512,
                address_mode: AddressMode::OneByte { page_bits: 1 },
            },
            Self::K16 => Geometry {
                density_kbit: 16,
                max_address: 2048,
                address_mode: AddressMode::OneByte { page_bits: 3 },
            },
            Self::K64 => Geometry::two_byte(64, 8192),
            Self::K128 => Geometry::two_byte(128, 16384),
            Self::K256 => Geometry::two_byte(256, 32768),
            Self::K512 => Geometry::two_byte(512, 65536),
            Self::K1024 => Geometry::two_byte(1024, 65536),
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.kbit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_table() {
        assert_eq!(resolve_geometry(3), (64, 8192));
        assert_eq!(resolve_geometry(4), (128, 16384));
        assert_eq!(resolve_geometry(5), (256, 32768));
        assert_eq!(resolve_geometry(6), (512, 65536));
        assert_eq!(resolve_geometry(7), (1024, 65536));
    }

    #[test]
    fn test_unknown_density_codes() {
        for code in [0u16, 1, 2, 8, 9, 0x0F, MANUAL_DENSITY_CODE] {
            assert_eq!(resolve_geometry(code), (0, 0), "code {}", code);
            assert!(!Geometry::from_density_code(code).is_valid());
        }
    }

    #[test]
    fn test_decode_mb85rc256v() {
        // 0x00A manufacturer, product 0x510
        let id = DeviceId::from_raw([0x00, 0xA5, 0x10]);
        assert_eq!(id.manufacturer, manufacturer::FUJITSU);
        assert_eq!(id.density_code, 5);
        assert_eq!(id.product, 0x510);
        assert_eq!(id.vendor(), "Fujitsu");
    }

    #[test]
    fn test_product_overlaps_density_nibble() {
        let id = DeviceId::from_raw([0xAB, 0xCD, 0xEF]);
        assert_eq!(id.manufacturer, 0xABC);
        assert_eq!(id.density_code, 0xD);
        assert_eq!(id.product, 0xDEF);
        assert_eq!(id.product >> 8, id.density_code);
        assert_eq!(id.to_raw(), [0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_id_field_selectors() {
        assert_eq!(IdField::try_from(1), Ok(IdField::Manufacturer));
        assert_eq!(IdField::try_from(4), Ok(IdField::Density));
        assert_eq!(IdField::try_from(0), Err(0));
        assert_eq!(IdField::try_from(5), Err(5));
    }

    #[test]
    fn test_two_byte_framing() {
        let (addr, header, len) = AddressMode::TwoByte.frame(0x50, 0x1234);
        assert_eq!(addr, 0x50);
        assert_eq!(&header[..len], &[0x12, 0x34]);
    }

    #[test]
    fn test_one_byte_framing_carries_page_bits() {
        let mode = Density::K16.geometry().address_mode;
        let (addr, header, len) = mode.frame(0x50, 0x07AB);
        assert_eq!(addr, 0x57);
        assert_eq!(&header[..len], &[0xAB]);

        let mode = Density::K4.geometry().address_mode;
        let (addr, header, len) = mode.frame(0x50, 0x01FF);
        assert_eq!(addr, 0x51);
        assert_eq!(&header[..len], &[0xFF]);

        // A1/A2 still select the chip, A0 is the page bit
        let (addr, _, _) = mode.frame(0x53, 0x0010);
        assert_eq!(addr, 0x52);
    }

    #[test]
    fn test_density_lookup() {
        assert_eq!(Density::from_kbit(16), Some(Density::K16));
        assert_eq!(Density::from_kbit(32), None);
        assert_eq!(Density::K4.geometry().max_address, 512);
        assert_eq!(Density::K1024.geometry().max_address, 65536);
    }
}
