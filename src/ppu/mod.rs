// PPU module - Picture Processing Unit (2C02) emulation
//
// The PPU runs a fixed state machine of 262 scanlines by 341 dots and is
// stepped three dots for every CPU cycle by the bus. Scanlines 0-239 are
// visible, 240 is idle, 241 opens the vblank period (vblank flag, NMI if
// enabled), and 261 is the pre-render line that clears the status flags
// and reloads the vertical scroll.
//
// Scroll state is the usual v/t/x/w arrangement: `v` is the live 15-bit
// VRAM address with coarse X/Y, nametable select, and fine Y packed into
// it; `t` is the latched copy the registers write into; `x` is the 3-bit
// fine X; `w` is the shared write toggle for $2005/$2006.
//
// Every video memory access goes through `vram_read`/`vram_write`, which
// report the address to the mapper first; that snoop is what drives
// MMC3's scanline counter, so rendering must fetch through it and never
// peek at cartridge memory directly.

mod constants;
mod memory;
mod registers;
mod rendering;

#[cfg(test)]
mod tests;

pub use constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::cartridge::{Mapper, Mirroring};
use constants::*;

/// PPU state: registers, video memory, and the rendering pipeline
pub struct Ppu {
    // ========================================
    // Registers ($2000-$2002, OAM address)
    // ========================================
    /// $2000 PPUCTRL: nametable select, increment, pattern tables,
    /// sprite size, NMI enable
    pub(crate) ctrl: u8,

    /// $2001 PPUMASK: grayscale, left-edge clipping, layer enables,
    /// color emphasis
    pub(crate) mask: u8,

    /// $2002 PPUSTATUS: overflow, sprite-0 hit, vblank (bits 5-7)
    pub(crate) status: u8,

    /// $2003 OAMADDR latch
    pub(crate) oam_addr: u8,

    // ========================================
    // Scroll / address state (loopy registers)
    // ========================================
    /// v: current VRAM address (15 bits)
    pub(crate) v: u16,

    /// t: temporary VRAM address; the "top-left corner" latch
    pub(crate) t: u16,

    /// x: fine X scroll (3 bits)
    pub(crate) fine_x: u8,

    /// w: shared first/second write toggle for $2005/$2006
    ///
    /// Cleared by any $2002 read.
    pub(crate) write_latch: bool,

    /// $2007 read buffer; non-palette reads lag one access behind
    pub(crate) read_buffer: u8,

    // ========================================
    // Video memory
    // ========================================
    /// 2KB internal nametable memory, aliased per the mapper's mirroring
    pub(crate) nametables: [u8; NAMETABLE_SIZE * 2],

    /// 32-byte palette RAM; $3F10/$3F14/$3F18/$3F1C alias $3F00/04/08/0C
    pub(crate) palette_ram: [u8; PALETTE_SIZE],

    /// Mirroring used when no cartridge is present (tests)
    pub(crate) fallback_mirroring: Mirroring,

    // ========================================
    // Sprite memory
    // ========================================
    /// Primary OAM: 64 sprites, 4 bytes each (Y, tile, attributes, X)
    pub(crate) oam: [u8; 256],

    /// Secondary OAM: the up-to-8 sprites selected for the next scanline
    pub(crate) secondary_oam: [u8; 32],

    // ========================================
    // Output
    // ========================================
    /// 256x240 frame of 6-bit palette indices
    pub(crate) frame_buffer: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],

    // ========================================
    // Timing
    // ========================================
    /// Current scanline (0-261)
    pub(crate) scanline: u16,

    /// Current dot within the scanline (0-340)
    pub(crate) dot: u16,

    /// Frames completed since power-on; parity drives the odd-frame skip
    pub(crate) frame: u64,

    /// Latched NMI edge for the CPU to consume
    pub(crate) nmi_pending: bool,

    /// True only during the dot that set the vblank flag; a $2002 read
    /// landing here suppresses the NMI for this frame
    pub(crate) vblank_just_set: bool,

    // ========================================
    // Background pipeline
    // ========================================
    bg_next_tile_id: u8,
    bg_next_tile_attrib: u8,
    bg_next_tile_lsb: u8,
    bg_next_tile_msb: u8,

    bg_shifter_pattern_lo: u16,
    bg_shifter_pattern_hi: u16,
    bg_shifter_attrib_lo: u16,
    bg_shifter_attrib_hi: u16,

    // ========================================
    // Sprite pipeline
    // ========================================
    /// Sprites copied into secondary OAM during evaluation
    sprite_count: usize,

    /// Sprite 0 was selected during the evaluation in progress
    sprite_zero_selected: bool,

    /// Pattern pairs, attributes, and X countdowns for the line being drawn
    sprite_shifter_lo: [u8; 8],
    sprite_shifter_hi: [u8; 8],
    sprite_attrib: [u8; 8],
    sprite_x_counter: [u8; 8],

    /// Sprite count and sprite-0 presence for the line being drawn
    render_sprite_count: usize,
    render_sprite_zero: bool,
}

impl Ppu {
    /// Create a new PPU in its power-on state
    pub fn new() -> Self {
        Ppu {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,

            v: 0,
            t: 0,
            fine_x: 0,
            write_latch: false,
            read_buffer: 0,

            nametables: [0; NAMETABLE_SIZE * 2],
            palette_ram: [0; PALETTE_SIZE],
            fallback_mirroring: Mirroring::Horizontal,

            oam: [0; 256],
            secondary_oam: [0xFF; 32],

            frame_buffer: [0; SCREEN_WIDTH * SCREEN_HEIGHT],

            scanline: 0,
            dot: 0,
            frame: 0,
            nmi_pending: false,
            vblank_just_set: false,

            bg_next_tile_id: 0,
            bg_next_tile_attrib: 0,
            bg_next_tile_lsb: 0,
            bg_next_tile_msb: 0,
            bg_shifter_pattern_lo: 0,
            bg_shifter_pattern_hi: 0,
            bg_shifter_attrib_lo: 0,
            bg_shifter_attrib_hi: 0,

            sprite_count: 0,
            sprite_zero_selected: false,
            sprite_shifter_lo: [0; 8],
            sprite_shifter_hi: [0; 8],
            sprite_attrib: [0; 8],
            sprite_x_counter: [0xFF; 8],
            render_sprite_count: 0,
            render_sprite_zero: false,
        }
    }

    /// Reset to power-on state (mirroring fallback is preserved)
    pub fn reset(&mut self) {
        let mirroring = self.fallback_mirroring;
        *self = Self::new();
        self.fallback_mirroring = mirroring;
    }

    /// Set the mirroring used when no cartridge is inserted
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.fallback_mirroring = mirroring;
    }

    /// Advance the PPU by one dot
    ///
    /// Returns true when the frame completed (scanline counter wrapped
    /// from 261 back to 0); the finished image is in `frame()`.
    pub fn step(&mut self, mapper: &mut Option<Mapper>) -> bool {
        // The race window for $2002 is exactly one dot wide
        self.vblank_just_set = false;

        let rendering = self.rendering_enabled();

        if self.scanline <= LAST_VISIBLE_SCANLINE {
            self.sprite_pipeline_dot(mapper, rendering);
        }

        if self.scanline <= LAST_VISIBLE_SCANLINE || self.scanline == PRERENDER_SCANLINE {
            if self.scanline == PRERENDER_SCANLINE && self.dot == 1 {
                self.status &=
                    !(STATUS_VBLANK | STATUS_SPRITE_ZERO_HIT | STATUS_SPRITE_OVERFLOW);
                self.nmi_pending = false;
            }

            self.background_pipeline_dot(mapper, rendering);

            if self.scanline <= LAST_VISIBLE_SCANLINE && (1..=256).contains(&self.dot) {
                self.render_pixel();
            }

            // Pre-render: reload vertical scroll while the frame is parked
            if rendering
                && self.scanline == PRERENDER_SCANLINE
                && (280..=304).contains(&self.dot)
            {
                self.transfer_address_y();
            }
        }

        if self.scanline == VBLANK_SCANLINE && self.dot == 1 {
            self.status |= STATUS_VBLANK;
            self.vblank_just_set = true;
            if self.ctrl & CTRL_NMI_ENABLE != 0 {
                self.nmi_pending = true;
            }
        }

        // Advance the dot/scanline counters
        self.dot += 1;

        // Odd frames drop the last dot of the pre-render line when
        // rendering is enabled
        if self.scanline == PRERENDER_SCANLINE
            && self.dot == DOTS_PER_SCANLINE - 1
            && rendering
            && self.frame & 1 == 1
        {
            self.dot = DOTS_PER_SCANLINE;
        }

        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
                return true;
            }
        }

        false
    }

    /// Either layer enabled
    pub(crate) fn rendering_enabled(&self) -> bool {
        self.mask & (MASK_SHOW_BACKGROUND | MASK_SHOW_SPRITES) != 0
    }

    /// Take the latched NMI edge, if any
    pub fn take_nmi(&mut self) -> bool {
        let pending = self.nmi_pending;
        self.nmi_pending = false;
        pending
    }

    /// Whether an NMI is waiting (without consuming it)
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Write one byte through the OAM DMA port
    ///
    /// Lands at the current OAM address, which increments; a transfer
    /// started with OAMADDR != 0 wraps around the table.
    pub fn write_oam_dma(&mut self, value: u8) {
        self.oam[self.oam_addr as usize] = value;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    /// Direct OAM write (tests and debugging)
    pub fn write_oam(&mut self, addr: u8, value: u8) {
        self.oam[addr as usize] = value;
    }

    /// Direct OAM read (tests and debugging)
    pub fn read_oam(&self, addr: u8) -> u8 {
        self.oam[addr as usize]
    }

    /// The rendered frame: 256x240 palette indices
    pub fn frame(&self) -> &[u8] {
        &self.frame_buffer
    }

    /// Current scanline (0-261)
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Current dot within the scanline (0-340)
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Frames completed since power-on
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
