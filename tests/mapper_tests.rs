// Mapper behavior driven by real programs
//
// Bank switching through CPU stores and the full MMC3 IRQ path: PPU
// rendering drives the A12 snoop, the mapper asserts the IRQ line, and
// the CPU vectors into the handler.

mod common;

use common::{RomBuilder, CHR_BANK, PRG_BANK};
use rusticom::Emulator;

/// A 64KB UxROM image whose banks are tagged with their index at a known
/// offset, program in the last (fixed) bank
fn uxrom_image() -> Vec<u8> {
    let mut prg = vec![0xEA; 4 * PRG_BANK];
    for (bank, chunk) in prg.chunks_mut(PRG_BANK).enumerate() {
        chunk[0] = bank as u8; // readable at $8000 when switched in
    }

    // Program in the fixed bank at $C000:
    //   LDA #$02 ; STA $C100 (any write switches banks)
    //   LDA $8000 ; STA $10 ; BRK
    let program = [
        0xA9, 0x02, 0x8D, 0x00, 0xC1, // bank select = 2
        0xAD, 0x00, 0x80, // read the tag byte
        0x85, 0x10, // store it
        0x00,
    ];
    let base = 3 * PRG_BANK; // last bank, mapped at $C000
    prg[base + 0x100..base + 0x100 + program.len()].copy_from_slice(&program);
    // Reset vector -> $C100
    prg[4 * PRG_BANK - 4] = 0x00;
    prg[4 * PRG_BANK - 3] = 0xC1;

    let mut image = vec![b'N', b'E', b'S', 0x1A, 4, 0, 0x20, 0x00]; // mapper 2
    image.resize(16, 0);
    image.extend_from_slice(&prg);
    image
}

#[test]
fn test_uxrom_bank_switch_from_program() {
    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&uxrom_image()).unwrap();
    common::run_until_brk(&mut emulator);

    assert_eq!(
        emulator.bus().peek(0x0010),
        2,
        "program switched bank 2 into $8000 and read its tag"
    );
}

/// A CNROM image with tagged CHR banks and a program that switches them
fn cnrom_image() -> Vec<u8> {
    let mut prg = vec![0xEA; PRG_BANK];
    // Program:
    //   LDA #$01 ; STA $8000 (CHR bank 1)
    //   $2006 <- $0000, read $2007 twice (buffered) -> $10 ; BRK
    let program = [
        0xA9, 0x01, 0x8D, 0x00, 0x80, // CHR bank 1
        0xA9, 0x00, 0x8D, 0x06, 0x20, // $2006 high
        0x8D, 0x06, 0x20, // $2006 low
        0xAD, 0x07, 0x20, // prime buffer
        0xAD, 0x07, 0x20, // real value
        0x85, 0x10, 0x00,
    ];
    prg[..program.len()].copy_from_slice(&program);
    prg[PRG_BANK - 4] = 0x00;
    prg[PRG_BANK - 3] = 0x80;

    let mut chr = vec![0u8; 2 * CHR_BANK];
    for (bank, chunk) in chr.chunks_mut(CHR_BANK).enumerate() {
        chunk.fill(0x10 + bank as u8);
    }

    let mut image = vec![b'N', b'E', b'S', 0x1A, 1, 2, 0x30, 0x00]; // mapper 3
    image.resize(16, 0);
    image.extend_from_slice(&prg);
    image.extend_from_slice(&chr);
    image
}

#[test]
fn test_cnrom_chr_bank_switch_from_program() {
    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&cnrom_image()).unwrap();
    common::run_until_brk(&mut emulator);

    assert_eq!(
        emulator.bus().peek(0x0010),
        0x11,
        "pattern reads come from CHR bank 1"
    );
}

/// An MMC1 image: serial-write a PRG bank, read its tag
fn mmc1_image() -> Vec<u8> {
    let mut prg = vec![0xEA; 8 * PRG_BANK];
    for (bank, chunk) in prg.chunks_mut(PRG_BANK).enumerate() {
        chunk[0] = 0x40 + bank as u8;
    }

    // In the fixed last bank at $C000: five serial writes of bank 3
    // (value %00011 -> bits 1,1,0,0,0), then read $8000
    let program = [
        0xA9, 0x01, 0x8D, 0x00, 0xE0, // bit 0 = 1
        0x8D, 0x00, 0xE0, // bit 1 = 1
        0xA9, 0x00, 0x8D, 0x00, 0xE0, // bit 2 = 0
        0x8D, 0x00, 0xE0, // bit 3 = 0
        0x8D, 0x00, 0xE0, // bit 4 = 0 -> commit PRG bank 3
        0xAD, 0x00, 0x80, // read tag
        0x85, 0x10, 0x00,
    ];
    let base = 7 * PRG_BANK;
    prg[base + 0x100..base + 0x100 + program.len()].copy_from_slice(&program);
    prg[8 * PRG_BANK - 4] = 0x00;
    prg[8 * PRG_BANK - 3] = 0xC1;

    let mut image = vec![b'N', b'E', b'S', 0x1A, 8, 0, 0x10, 0x00]; // mapper 1
    image.resize(16, 0);
    image.extend_from_slice(&prg);
    image
}

#[test]
fn test_mmc1_serial_bank_switch_from_program() {
    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&mmc1_image()).unwrap();
    common::run_until_brk(&mut emulator);

    assert_eq!(
        emulator.bus().peek(0x0010),
        0x43,
        "five serial writes committed PRG bank 3"
    );
}

#[test]
fn test_mmc3_scanline_irq_reaches_the_cpu() {
    // Enable rendering (BG at $0000, sprites at $1000), arm the IRQ with
    // a latch of 20, and count deliveries into $F0
    let image = RomBuilder::mmc3()
        .with_bytes(
            0x8000,
            &[
                0xA9, 0x08, 0x8D, 0x00, 0x20, // sprites at $1000
                0xA9, 0x18, 0x8D, 0x01, 0x20, // show background + sprites
                0xA9, 0x14, 0x8D, 0x00, 0xC0, // IRQ latch = 20
                0x8D, 0x01, 0xC0, // arm reload
                0x8D, 0x01, 0xE0, // enable IRQ
                0x58, // CLI
                0x4C, 0x16, 0x80, // spin
            ],
        )
        .with_bytes(
            0x8040,
            &[
                0xE6, 0xF0, // INC $F0
                0x8D, 0x00, 0xE0, // STA $E000 (acknowledge)
                0x8D, 0x01, 0xE0, // STA $E001 (re-enable)
                0x40, // RTI
            ],
        )
        .with_irq_vector(0x8040)
        .build();

    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&image).unwrap();

    // Three frames of rendering: one qualifying A12 edge per visible
    // scanline, one IRQ per 21 edges
    for _ in 0..3 {
        emulator.run_frame().unwrap();
    }

    let count = emulator.bus().peek(0x00F0);
    assert!(
        count >= 10,
        "scanline IRQs should fire steadily, got {}",
        count
    );
    assert!(count <= 40, "but not on every scanline, got {}", count);
}

#[test]
fn test_mmc3_irq_silent_without_rendering() {
    let image = RomBuilder::mmc3()
        .with_bytes(
            0x8000,
            &[
                0xA9, 0x01, 0x8D, 0x00, 0xC0, // latch 1
                0x8D, 0x01, 0xC0, // reload
                0x8D, 0x01, 0xE0, // enable
                0x58, // CLI
                0x4C, 0x0C, 0x80, // spin
            ],
        )
        .with_bytes(0x8040, &[0xE6, 0xF0, 0x8D, 0x00, 0xE0, 0x40])
        .with_irq_vector(0x8040)
        .build();

    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&image).unwrap();

    for _ in 0..2 {
        emulator.run_frame().unwrap();
    }

    assert_eq!(
        emulator.bus().peek(0x00F0),
        0,
        "no A12 activity without rendering, no IRQs"
    );
}

#[test]
fn test_mmc3_prg_ram_with_protection() {
    let image = RomBuilder::mmc3()
        .with_bytes(
            0x8000,
            &[
                0xA9, 0x80, 0x8D, 0x01, 0xA0, // WRAM enabled, writable
                0xA9, 0x42, 0x8D, 0x00, 0x60, // $6000 = $42
                0xA9, 0xC0, 0x8D, 0x01, 0xA0, // write-protect
                0xA9, 0x99, 0x8D, 0x00, 0x60, // blocked write
                0xAD, 0x00, 0x60, 0x85, 0x10, // read back -> $10
                0x00,
            ],
        )
        .build();

    let mut emulator = Emulator::new();
    emulator.load_rom_bytes(&image).unwrap();
    common::run_until_brk(&mut emulator);

    assert_eq!(
        emulator.bus().peek(0x0010),
        0x42,
        "write-protected WRAM kept the first value"
    );
}
