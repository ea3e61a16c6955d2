// PPU memory access
//
// All of the PPU's 14-bit address space funnels through `vram_read` and
// `vram_write`. The mapper observes every access first (`ppu_tick`), which
// is what feeds MMC3's A12 edge counter; pattern fetches then go to the
// cartridge, nametable accesses into the aliased internal 2KB, and palette
// accesses into the 32-byte palette RAM.

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::{Mapper, Mirroring};

impl Ppu {
    /// The active mirroring arrangement
    ///
    /// Comes from the mapper (MMC1/MMC3 switch it at runtime); the
    /// fallback only applies with no cartridge inserted.
    pub(super) fn mirroring(&self, mapper: &Option<Mapper>) -> Mirroring {
        mapper
            .as_ref()
            .map_or(self.fallback_mirroring, |m| m.mirroring())
    }

    /// Fold a nametable address ($2000-$2FFF) onto the internal 2KB
    pub(super) fn mirror_nametable_addr(&self, mirroring: Mirroring, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical_table = match mirroring {
            // $2000=$2400, $2800=$2C00
            Mirroring::Horizontal => table / 2,
            // $2000=$2800, $2400=$2C00
            Mirroring::Vertical => table & 1,
            Mirroring::SingleScreenLow => 0,
            Mirroring::SingleScreenHigh => 1,
            // True four-screen needs cartridge VRAM; fold like vertical
            // over the internal 2KB
            Mirroring::FourScreen => table & 1,
        };

        physical_table * NAMETABLE_SIZE + offset
    }

    /// Fold a palette address onto the 32-byte palette RAM
    ///
    /// Entries $10/$14/$18/$1C alias $00/$04/$08/$0C: sprite palette slot
    /// 0 is the shared backdrop.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let index = (addr & 0x001F) as usize;
        if index >= 16 && index % 4 == 0 {
            index - 16
        } else {
            index
        }
    }

    /// Read from PPU memory, snooping the mapper
    pub(super) fn vram_read(&mut self, mapper: &mut Option<Mapper>, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        if let Some(m) = mapper.as_mut() {
            m.ppu_tick(addr);
        }

        match addr {
            0x0000..=0x1FFF => mapper.as_ref().map_or(0, |m| m.ppu_read(addr)),
            0x2000..=0x3EFF => {
                let mirroring = self.mirroring(mapper);
                self.nametables[self.mirror_nametable_addr(mirroring, addr)]
            }
            _ => self.palette_ram[self.mirror_palette_addr(addr)],
        }
    }

    /// Write to PPU memory, snooping the mapper
    pub(super) fn vram_write(&mut self, mapper: &mut Option<Mapper>, addr: u16, value: u8) {
        let addr = addr & 0x3FFF;

        if let Some(m) = mapper.as_mut() {
            m.ppu_tick(addr);
        }

        match addr {
            0x0000..=0x1FFF => {
                if let Some(m) = mapper.as_mut() {
                    m.ppu_write(addr, value);
                }
            }
            0x2000..=0x3EFF => {
                let mirroring = self.mirroring(mapper);
                let index = self.mirror_nametable_addr(mirroring, addr);
                self.nametables[index] = value;
            }
            _ => {
                let index = self.mirror_palette_addr(addr);
                self.palette_ram[index] = value;
            }
        }
    }

    /// Read a nametable byte without the mapper snoop
    ///
    /// Used to refill the $2007 buffer after a palette-range read, which
    /// loads the nametable byte "underneath" the palette.
    pub(super) fn nametable_under_palette(&self, mapper: &Option<Mapper>, addr: u16) -> u8 {
        let mirroring = self.mirroring(mapper);
        self.nametables[self.mirror_nametable_addr(mirroring, addr)]
    }
}
