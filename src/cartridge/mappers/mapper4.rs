// Mapper 4 (MMC3) - 8KB PRG / 1-2KB CHR banking with a scanline IRQ
//
// Register pairs (even/odd addresses):
// - $8000/$8001: bank select / bank data. Select bits 0-2 choose which of
//   six CHR registers (R0-R5) or two PRG registers (R6, R7) the next data
//   write updates; bit 6 swaps the PRG layout, bit 7 swaps the CHR layout.
// - $A000/$A001: mirroring / work-RAM protection
// - $C000/$C001: IRQ latch / arm a reload on the next A12 edge
// - $E000/$E001: IRQ disable (also deasserts the line) / IRQ enable
//
// The IRQ counter clocks on qualifying rising edges of PPU address line 12:
// a tick with A12 high after the line has been low for long enough. The
// background pattern table at $0000 keeps A12 low across a tile fetch, so
// the sprite fetches at $1000 produce exactly one qualifying edge per
// rendered scanline; too eager a filter double-clocks on the 8-dot fetch
// cadence, too lazy a filter misses lines entirely.

use crate::cartridge::{Cartridge, Mirroring};

const PRG_RAM_SIZE: usize = 8 * 1024;
const PRG_BANK_SIZE: usize = 8 * 1024;
const CHR_BANK_SIZE: usize = 1024;

/// Consecutive low ticks of A12 required before a rise counts as an edge
const A12_FILTER_TICKS: u8 = 7;

/// Mapper 4 implementation (MMC3)
pub struct Mmc3 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,

    // Banking
    bank_select: u8,
    bank_regs: [u8; 8],

    // $A000 mirroring bit; four-screen boards ignore it
    mirroring: Mirroring,
    four_screen: bool,

    // $A001 work-RAM protection
    wram_enabled: bool,
    wram_write_protected: bool,

    // IRQ unit
    irq_latch: u8,
    irq_counter: u8,
    irq_enabled: bool,
    irq_reload: bool,
    irq_pending: bool,

    // A12 edge filter: consecutive ticks observed with the line low
    a12_low_ticks: u8,
}

impl Mmc3 {
    pub fn new(cartridge: Cartridge) -> Self {
        let four_screen = cartridge.mirroring == Mirroring::FourScreen;
        Mmc3 {
            prg_rom: cartridge.prg_rom,
            chr: cartridge.chr,
            chr_is_ram: cartridge.chr_is_ram,
            prg_ram: vec![0; PRG_RAM_SIZE],
            bank_select: 0,
            bank_regs: [0; 8],
            mirroring: if four_screen {
                Mirroring::FourScreen
            } else {
                cartridge.mirroring
            },
            four_screen,
            wram_enabled: true,
            wram_write_protected: false,
            irq_latch: 0,
            irq_counter: 0,
            irq_enabled: false,
            irq_reload: false,
            irq_pending: false,
            a12_low_ticks: 0,
        }
    }

    fn prg_bank_count(&self) -> usize {
        self.prg_rom.len() / PRG_BANK_SIZE
    }

    /// Resolve the 8KB PRG bank mapped at each of the four CPU windows
    fn prg_offset(&self, addr: u16) -> usize {
        let count = self.prg_bank_count();
        let last = count - 1;
        let second_last = count - 2;
        let r6 = self.bank_regs[6] as usize % count;
        let r7 = self.bank_regs[7] as usize % count;
        let swap = self.bank_select & 0x40 != 0;

        let bank = match (addr >> 13) & 3 {
            0 => {
                // $8000-$9FFF
                if swap {
                    second_last
                } else {
                    r6
                }
            }
            1 => r7, // $A000-$BFFF
            2 => {
                // $C000-$DFFF
                if swap {
                    r6
                } else {
                    second_last
                }
            }
            _ => last, // $E000-$FFFF
        };
        bank * PRG_BANK_SIZE + (addr & 0x1FFF) as usize
    }

    /// Resolve the 1KB CHR bank behind a pattern-space address
    fn chr_offset(&self, addr: u16) -> usize {
        // Layout without inversion: two 2KB banks (R0, R1) at $0000-$0FFF,
        // four 1KB banks (R2-R5) at $1000-$1FFF. Bit 7 swaps the halves.
        let inverted = self.bank_select & 0x80 != 0;
        let addr = if inverted { addr ^ 0x1000 } else { addr } & 0x1FFF;

        let bank = if addr < 0x1000 {
            // 2KB banks ignore bit 0 of the register
            let reg = (addr >> 11) as usize; // R0 or R1
            (self.bank_regs[reg] & 0xFE) as usize + ((addr >> 10) & 1) as usize
        } else {
            let reg = 2 + ((addr - 0x1000) >> 10) as usize; // R2-R5
            self.bank_regs[reg] as usize
        };
        bank * CHR_BANK_SIZE + (addr & 0x03FF) as usize
    }

    /// One qualifying rising edge of A12: reload or decrement, then
    /// assert the IRQ line when the counter lands on zero.
    fn clock_irq_counter(&mut self) {
        if self.irq_counter == 0 || self.irq_reload {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_pending = true;
        }
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => {
                if self.wram_enabled {
                    self.prg_ram[(addr - 0x6000) as usize]
                } else {
                    0
                }
            }
            0x8000..=0xFFFF => {
                let offset = self.prg_offset(addr);
                if offset < self.prg_rom.len() {
                    self.prg_rom[offset]
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => {
                if self.wram_enabled && !self.wram_write_protected {
                    self.prg_ram[(addr - 0x6000) as usize] = value;
                }
            }
            0x8000..=0x9FFF => {
                if addr & 1 == 0 {
                    self.bank_select = value;
                } else {
                    let target = (self.bank_select & 0x07) as usize;
                    self.bank_regs[target] = value;
                }
            }
            0xA000..=0xBFFF => {
                if addr & 1 == 0 {
                    if !self.four_screen {
                        self.mirroring = if value & 1 != 0 {
                            Mirroring::Horizontal
                        } else {
                            Mirroring::Vertical
                        };
                    }
                } else {
                    self.wram_enabled = value & 0x80 != 0;
                    self.wram_write_protected = value & 0x40 != 0;
                }
            }
            0xC000..=0xDFFF => {
                if addr & 1 == 0 {
                    self.irq_latch = value;
                } else {
                    // Reload happens on the next qualifying edge
                    self.irq_counter = 0;
                    self.irq_reload = true;
                }
            }
            0xE000..=0xFFFF => {
                if addr & 1 == 0 {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                } else {
                    self.irq_enabled = true;
                }
            }
            _ => {}
        }
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        if addr < 0x2000 {
            self.chr[self.chr_offset(addr) % self.chr.len()]
        } else {
            0
        }
    }

    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        if addr < 0x2000 && self.chr_is_ram {
            let offset = self.chr_offset(addr) % self.chr.len();
            self.chr[offset] = value;
        }
    }

    /// Snoop one PPU memory access and run the A12 edge filter
    pub fn ppu_tick(&mut self, addr: u16) {
        if addr & 0x1000 == 0 {
            self.a12_low_ticks = self.a12_low_ticks.saturating_add(1);
        } else {
            if self.a12_low_ticks >= A12_FILTER_TICKS {
                self.clock_irq_counter();
            }
            self.a12_low_ticks = 0;
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    pub fn prg_ram(&self) -> &[u8] {
        &self.prg_ram
    }
}
