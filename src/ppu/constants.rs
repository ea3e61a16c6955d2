// PPU constants

/// Size of one nametable in bytes (1KB)
pub(super) const NAMETABLE_SIZE: usize = 1024;

/// Size of palette RAM in bytes
pub(super) const PALETTE_SIZE: usize = 32;

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 256;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

// ========================================
// Timing (NTSC)
// ========================================

/// Dots per scanline
pub(super) const DOTS_PER_SCANLINE: u16 = 341;

/// Scanlines per frame
pub(super) const SCANLINES_PER_FRAME: u16 = 262;

/// Last visible scanline
pub(super) const LAST_VISIBLE_SCANLINE: u16 = 239;

/// First vblank scanline; the vblank flag is raised at dot 1
pub(super) const VBLANK_SCANLINE: u16 = 241;

/// Pre-render scanline (sometimes written as scanline -1)
pub(super) const PRERENDER_SCANLINE: u16 = 261;

// ========================================
// Register bits
// ========================================

/// PPUCTRL: VRAM address increment (0: +1, 1: +32)
pub(super) const CTRL_VRAM_INCREMENT: u8 = 0x04;

/// PPUCTRL: sprite pattern table select (8x8 mode)
pub(super) const CTRL_SPRITE_TABLE: u8 = 0x08;

/// PPUCTRL: background pattern table select
pub(super) const CTRL_BACKGROUND_TABLE: u8 = 0x10;

/// PPUCTRL: sprite size (0: 8x8, 1: 8x16)
pub(super) const CTRL_SPRITE_SIZE: u8 = 0x20;

/// PPUCTRL: raise NMI at the start of vblank
pub(super) const CTRL_NMI_ENABLE: u8 = 0x80;

/// PPUMASK: grayscale
pub(super) const MASK_GRAYSCALE: u8 = 0x01;

/// PPUMASK: show background in the leftmost 8 pixels
pub(super) const MASK_BACKGROUND_LEFT: u8 = 0x02;

/// PPUMASK: show sprites in the leftmost 8 pixels
pub(super) const MASK_SPRITES_LEFT: u8 = 0x04;

/// PPUMASK: show background
pub(super) const MASK_SHOW_BACKGROUND: u8 = 0x08;

/// PPUMASK: show sprites
pub(super) const MASK_SHOW_SPRITES: u8 = 0x10;

/// PPUSTATUS: sprite overflow
pub(super) const STATUS_SPRITE_OVERFLOW: u8 = 0x20;

/// PPUSTATUS: sprite 0 hit
pub(super) const STATUS_SPRITE_ZERO_HIT: u8 = 0x40;

/// PPUSTATUS: vblank flag
pub(super) const STATUS_VBLANK: u8 = 0x80;
