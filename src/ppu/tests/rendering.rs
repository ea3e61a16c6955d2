// PPU rendering pipeline tests

use super::{run_frame, test_mapper};
use crate::ppu::{Ppu, SCREEN_WIDTH};

/// Fill the first nametable with one tile index
fn fill_nametable(ppu: &mut Ppu, mapper: &mut Option<crate::cartridge::Mapper>, tile: u8) {
    ppu.write_register(6, 0x20, mapper);
    ppu.write_register(6, 0x00, mapper);
    for _ in 0..0x3C0 {
        ppu.write_register(7, tile, mapper);
    }
    // Attribute table: palette 0 everywhere
    for _ in 0..0x40 {
        ppu.write_register(7, 0x00, mapper);
    }
}

fn set_palette(ppu: &mut Ppu, mapper: &mut Option<crate::cartridge::Mapper>, values: &[u8]) {
    ppu.write_register(6, 0x3F, mapper);
    ppu.write_register(6, 0x00, mapper);
    for &value in values {
        ppu.write_register(7, value, mapper);
    }
}

#[test]
fn test_disabled_rendering_emits_backdrop() {
    let mut ppu = Ppu::new();
    let mut mapper = None;

    set_palette(&mut ppu, &mut mapper, &[0x21]);
    run_frame(&mut ppu, &mut mapper);

    assert_eq!(ppu.frame()[0], 0x21);
    assert_eq!(ppu.frame()[120 * SCREEN_WIDTH + 100], 0x21);
}

#[test]
fn test_background_renders_solid_tile() {
    let mut ppu = Ppu::new();
    let mut mapper = test_mapper();

    // Tile 1 is solid color 1; palette 0 color 1 = 0x16
    fill_nametable(&mut ppu, &mut mapper, 0x01);
    set_palette(&mut ppu, &mut mapper, &[0x0F, 0x16, 0x27, 0x18]);

    // Reset the address so rendering starts from the frame origin
    let _ = ppu.read_register(2, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);

    ppu.write_register(1, 0x08, &mut mapper); // show background

    // Two frames: the first line of the first frame misses the prefetch
    run_frame(&mut ppu, &mut mapper);
    run_frame(&mut ppu, &mut mapper);

    let frame = ppu.frame();
    assert_eq!(frame[100 * SCREEN_WIDTH + 100], 0x16);
    assert_eq!(frame[50 * SCREEN_WIDTH + 200], 0x16);
}

#[test]
fn test_background_transparent_pixel_uses_backdrop() {
    let mut ppu = Ppu::new();
    let mut mapper = test_mapper();

    // Tile 0 is fully transparent in the test cartridge
    fill_nametable(&mut ppu, &mut mapper, 0x00);
    set_palette(&mut ppu, &mut mapper, &[0x0F, 0x16, 0x27, 0x18]);

    let _ = ppu.read_register(2, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(1, 0x08, &mut mapper);

    run_frame(&mut ppu, &mut mapper);
    run_frame(&mut ppu, &mut mapper);

    assert_eq!(ppu.frame()[100 * SCREEN_WIDTH + 100], 0x0F, "backdrop");
}

#[test]
fn test_sprite_renders_over_transparent_background() {
    let mut ppu = Ppu::new();
    let mut mapper = test_mapper();

    fill_nametable(&mut ppu, &mut mapper, 0x00);
    // Background palette + sprite palette 0
    set_palette(
        &mut ppu,
        &mut mapper,
        &[
            0x0F, 0x16, 0x27, 0x18, // BG palette 0
            0x00, 0x00, 0x00, 0x00, // BG palette 1
            0x00, 0x00, 0x00, 0x00, // BG palette 2
            0x00, 0x00, 0x00, 0x00, // BG palette 3
            0x0F, 0x2A, 0x15, 0x30, // sprite palette 0
        ],
    );

    // Sprite 0: tile 1 (solid color 1) at (100, 100); OAM Y is top-1
    ppu.write_oam(0, 99);
    ppu.write_oam(1, 0x01);
    ppu.write_oam(2, 0x00);
    ppu.write_oam(3, 100);

    let _ = ppu.read_register(2, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(1, 0x18, &mut mapper); // background + sprites

    run_frame(&mut ppu, &mut mapper);
    run_frame(&mut ppu, &mut mapper);

    let frame = ppu.frame();
    // Sprite palette 0, color 1 = 0x2A
    assert_eq!(frame[100 * SCREEN_WIDTH + 100], 0x2A);
    assert_eq!(frame[107 * SCREEN_WIDTH + 107], 0x2A, "8x8 extent");
    assert_eq!(frame[100 * SCREEN_WIDTH + 99], 0x0F, "left of sprite");
}

#[test]
fn test_sprite_zero_hit_set_when_layers_overlap() {
    let mut ppu = Ppu::new();
    let mut mapper = test_mapper();

    // Opaque background everywhere, opaque sprite 0 in the middle
    fill_nametable(&mut ppu, &mut mapper, 0x01);
    set_palette(&mut ppu, &mut mapper, &[0x0F, 0x16, 0x27, 0x18]);

    ppu.write_oam(0, 99);
    ppu.write_oam(1, 0x01);
    ppu.write_oam(2, 0x00);
    ppu.write_oam(3, 100);

    let _ = ppu.read_register(2, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(6, 0x00, &mut mapper);
    ppu.write_register(1, 0x18, &mut mapper);

    run_frame(&mut ppu, &mut mapper);
    run_frame(&mut ppu, &mut mapper);

    // The hit flag is set during the frame; it clears on pre-render, so
    // inspect right after the overlap line has rendered
    let mut hit = false;
    for _ in 0..(262 * 341) {
        ppu.step(&mut mapper);
        if ppu.scanline == 120 && ppu.status & 0x40 != 0 {
            hit = true;
            break;
        }
    }
    assert!(hit, "sprite-zero hit raised where the layers overlap");
}

#[test]
fn test_sprite_overflow_on_ninth_sprite() {
    let mut ppu = Ppu::new();
    let mut mapper = test_mapper();

    // Nine sprites on the same line
    for i in 0..9 {
        ppu.write_oam(i * 4, 99);
        ppu.write_oam(i * 4 + 1, 0x01);
        ppu.write_oam(i * 4 + 2, 0x00);
        ppu.write_oam(i * 4 + 3, (i * 8) as u8);
    }

    ppu.write_register(1, 0x18, &mut mapper);
    run_frame(&mut ppu, &mut mapper);

    let mut overflow = false;
    for _ in 0..(262 * 341) {
        ppu.step(&mut mapper);
        if ppu.scanline == 120 && ppu.status & 0x20 != 0 {
            overflow = true;
            break;
        }
    }
    assert!(overflow, "ninth in-range sprite raises the overflow flag");
}

#[test]
fn test_grayscale_masks_palette_index() {
    let mut ppu = Ppu::new();
    let mut mapper = None;

    set_palette(&mut ppu, &mut mapper, &[0x27]);
    ppu.write_register(1, 0x01, &mut mapper); // grayscale, rendering off

    run_frame(&mut ppu, &mut mapper);
    assert_eq!(ppu.frame()[0], 0x20, "0x27 & 0x30");
}
