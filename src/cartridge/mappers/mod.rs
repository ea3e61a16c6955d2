// Mappers module - Implementations of the supported NES cartridge mappers
//
// Each mapper virtualizes the CPU's $4020-$FFFF window and the PPU's
// $0000-$1FFF pattern space over the cartridge image, and owns whatever
// bank-select state the board carries. MMC3 additionally snoops every PPU
// memory access through `ppu_tick` to derive its scanline IRQ.
//
// Dispatch is a tagged enum rather than a trait object: `ppu_tick` runs on
// every PPU memory access, and the match compiles to a jump with the state
// inline.

mod mapper0;
mod mapper1;
mod mapper2;
mod mapper3;
mod mapper4;

pub use mapper0::Nrom;
pub use mapper1::Mmc1;
pub use mapper2::Uxrom;
pub use mapper3::Cnrom;
pub use mapper4::Mmc3;

use super::{Cartridge, Mirroring};

/// Error type for mapper creation
#[derive(Debug)]
pub enum MapperError {
    /// The requested mapper number is not supported
    UnsupportedMapper(u8),
    /// Invalid cartridge configuration for the mapper
    InvalidConfiguration(String),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "Mapper {} is not supported", num)
            }
            MapperError::InvalidConfiguration(msg) => {
                write!(f, "Invalid mapper configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Cartridge mapper, one variant per supported board
pub enum Mapper {
    /// Mapper 0 - NROM
    Nrom(Nrom),
    /// Mapper 1 - MMC1
    Mmc1(Mmc1),
    /// Mapper 2 - UxROM
    Uxrom(Uxrom),
    /// Mapper 3 - CNROM
    Cnrom(Cnrom),
    /// Mapper 4 - MMC3
    Mmc3(Mmc3),
}

impl Mapper {
    /// Create the mapper matching the cartridge's mapper id
    ///
    /// # Errors
    ///
    /// Returns `MapperError::UnsupportedMapper` for ids outside the
    /// supported set, or `InvalidConfiguration` when the image does not fit
    /// the board (e.g. NROM with more than 32KB of PRG).
    pub fn new(cartridge: Cartridge) -> Result<Self, MapperError> {
        match cartridge.mapper {
            0 => Ok(Mapper::Nrom(Nrom::new(cartridge)?)),
            1 => Ok(Mapper::Mmc1(Mmc1::new(cartridge))),
            2 => Ok(Mapper::Uxrom(Uxrom::new(cartridge))),
            3 => Ok(Mapper::Cnrom(Cnrom::new(cartridge))),
            4 => Ok(Mapper::Mmc3(Mmc3::new(cartridge))),
            mapper_num => Err(MapperError::UnsupportedMapper(mapper_num)),
        }
    }

    /// Read from the CPU-side cartridge window ($4020-$FFFF)
    pub fn cpu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.cpu_read(addr),
            Mapper::Mmc1(m) => m.cpu_read(addr),
            Mapper::Uxrom(m) => m.cpu_read(addr),
            Mapper::Cnrom(m) => m.cpu_read(addr),
            Mapper::Mmc3(m) => m.cpu_read(addr),
        }
    }

    /// Write to the CPU-side cartridge window ($4020-$FFFF)
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::Nrom(m) => m.cpu_write(addr, value),
            Mapper::Mmc1(m) => m.cpu_write(addr, value),
            Mapper::Uxrom(m) => m.cpu_write(addr, value),
            Mapper::Cnrom(m) => m.cpu_write(addr, value),
            Mapper::Mmc3(m) => m.cpu_write(addr, value),
        }
    }

    /// Read from the PPU-side pattern space ($0000-$1FFF)
    pub fn ppu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.ppu_read(addr),
            Mapper::Mmc1(m) => m.ppu_read(addr),
            Mapper::Uxrom(m) => m.ppu_read(addr),
            Mapper::Cnrom(m) => m.ppu_read(addr),
            Mapper::Mmc3(m) => m.ppu_read(addr),
        }
    }

    /// Write to the PPU-side pattern space ($0000-$1FFF)
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::Nrom(m) => m.ppu_write(addr, value),
            Mapper::Mmc1(m) => m.ppu_write(addr, value),
            Mapper::Uxrom(m) => m.ppu_write(addr, value),
            Mapper::Cnrom(m) => m.ppu_write(addr, value),
            Mapper::Mmc3(m) => m.ppu_write(addr, value),
        }
    }

    /// Observe a PPU memory access (address-line snoop)
    ///
    /// Called for every PPU memory access; MMC3 derives its scanline IRQ
    /// from rising edges of address line 12, and MMC1's SNROM wiring tracks
    /// the same line for its work-RAM gate.
    #[inline]
    pub fn ppu_tick(&mut self, addr: u16) {
        match self {
            Mapper::Mmc1(m) => m.ppu_tick(addr),
            Mapper::Mmc3(m) => m.ppu_tick(addr),
            _ => {}
        }
    }

    /// Current nametable mirroring arrangement
    pub fn mirroring(&self) -> Mirroring {
        match self {
            Mapper::Nrom(m) => m.mirroring(),
            Mapper::Mmc1(m) => m.mirroring(),
            Mapper::Uxrom(m) => m.mirroring(),
            Mapper::Cnrom(m) => m.mirroring(),
            Mapper::Mmc3(m) => m.mirroring(),
        }
    }

    /// Whether the mapper is asserting the CPU IRQ line
    pub fn irq_pending(&self) -> bool {
        match self {
            Mapper::Mmc3(m) => m.irq_pending(),
            _ => false,
        }
    }

    /// Work RAM contents, for battery flushing and test-harness taps
    pub fn prg_ram(&self) -> Option<&[u8]> {
        match self {
            Mapper::Nrom(m) => m.prg_ram(),
            Mapper::Mmc1(m) => Some(m.prg_ram()),
            Mapper::Mmc3(m) => Some(m.prg_ram()),
            _ => None,
        }
    }
}
