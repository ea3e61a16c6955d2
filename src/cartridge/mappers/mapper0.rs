// Mapper 0 (NROM) - The simplest NES board, no bank switching
//
// Memory layout:
// - CPU $6000-$7FFF: optional 8KB work RAM
// - CPU $8000-$FFFF: PRG-ROM; a 16KB image mirrors at $C000
// - PPU $0000-$1FFF: 8KB CHR-ROM or CHR-RAM
//
// Writes to the PRG window have no effect.

use crate::cartridge::{Cartridge, MapperError, Mirroring};

const PRG_RAM_SIZE: usize = 8 * 1024;

/// Mapper 0 implementation (NROM)
///
/// Used by early titles (Super Mario Bros., Donkey Kong, Balloon Fight)
/// and by most CPU/APU test images.
pub struct Nrom {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    mirroring: Mirroring,
}

impl Nrom {
    /// Create a new NROM mapper from a cartridge
    ///
    /// # Errors
    ///
    /// Rejects PRG images that are not 16KB or 32KB.
    pub fn new(cartridge: Cartridge) -> Result<Self, MapperError> {
        let prg_len = cartridge.prg_rom.len();
        if prg_len != 16 * 1024 && prg_len != 32 * 1024 {
            return Err(MapperError::InvalidConfiguration(format!(
                "NROM requires 16KB or 32KB PRG-ROM, got {} bytes",
                prg_len
            )));
        }

        Ok(Nrom {
            prg_rom: cartridge.prg_rom,
            chr: cartridge.chr,
            chr_is_ram: cartridge.chr_is_ram,
            prg_ram: vec![0; PRG_RAM_SIZE],
            mirroring: cartridge.mirroring,
        })
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                // Modulo handles the $C000 mirror for 16KB images
                let index = (addr - 0x8000) as usize;
                self.prg_rom[index % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        if let 0x6000..=0x7FFF = addr {
            self.prg_ram[(addr - 0x6000) as usize] = value;
        }
        // PRG window writes are ignored: NROM has no registers
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.chr[addr as usize % self.chr.len()],
            _ => 0,
        }
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        if addr < 0x2000 && self.chr_is_ram {
            let len = self.chr.len();
            self.chr[addr as usize % len] = value;
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }
}
