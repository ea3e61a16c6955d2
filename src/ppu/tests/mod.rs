// PPU test suites, split by concern

mod rendering;

use super::Ppu;
use crate::cartridge::{Cartridge, Mapper, Mirroring};

/// Build an NROM mapper whose CHR holds a recognizable pattern: tile $01
/// is solid color 1, tile $02 is solid color 2.
pub(super) fn test_mapper() -> Option<Mapper> {
    let mut chr = vec![0u8; 8 * 1024];
    // Tile 1: plane 0 all ones
    for row in 0..8 {
        chr[16 + row] = 0xFF;
    }
    // Tile 2: plane 1 all ones
    for row in 0..8 {
        chr[32 + 8 + row] = 0xFF;
    }
    let cartridge = Cartridge {
        prg_rom: vec![0; 16 * 1024],
        chr,
        chr_is_ram: false,
        mapper: 0,
        mirroring: Mirroring::Horizontal,
        has_battery: false,
    };
    Some(Mapper::new(cartridge).unwrap())
}

/// Step until the PPU reaches the given scanline and dot
///
/// Avoid targeting pre-render dot 340, which odd frames skip.
pub(super) fn step_to(ppu: &mut Ppu, mapper: &mut Option<Mapper>, scanline: u16, dot: u16) {
    let mut guard = 0u32;
    while !(ppu.scanline == scanline && ppu.dot == dot) {
        ppu.step(mapper);
        guard += 1;
        assert!(guard < 200_000, "PPU never reached ({}, {})", scanline, dot);
    }
}

/// Run to the next frame-complete edge
pub(super) fn run_frame(ppu: &mut Ppu, mapper: &mut Option<Mapper>) {
    let mut guard = 0u32;
    while !ppu.step(mapper) {
        guard += 1;
        assert!(guard < 200_000, "frame never completed");
    }
}
