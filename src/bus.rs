// Bus module - the synchronized memory fabric
//
// The bus owns everything the CPU talks to: the 2KB internal RAM, the
// PPU, the APU, the controller ports, and the cartridge mapper. It is
// also the system's clock distributor: every CPU memory access calls
// `tick` exactly once before the access is performed, and `tick` advances
// the PPU by three dots and the APU by one cycle. That nesting is what
// lets a $2002 read race the PPU reaching scanline 241 dot 1, and it must
// never be reordered into a post-instruction catch-up.
//
// # CPU Memory Map
//
// ```text
// $0000-$1FFF: 2KB internal RAM, mirrored every $0800
// $2000-$3FFF: eight PPU registers, mirrored every 8 bytes
// $4000-$4013: APU channel registers
// $4014      : OAM DMA trigger
// $4015      : APU status (R) / channel enables (W)
// $4016      : controller 1 (R) / strobe (W)
// $4017      : controller 2 (R) / APU frame counter (W)
// $4018-$401F: disabled test registers
// $4020-$FFFF: cartridge mapper
// ```
//
// Reads of regions nothing drives return 0; open-bus decay is not
// modeled.

use crate::apu::Apu;
use crate::cartridge::{Cartridge, Mapper, MapperError};
use crate::input::ControllerIO;
use crate::ppu::Ppu;
use crate::ram::Ram;

/// The system bus and everything hanging off it
pub struct Bus {
    ram: Ram,
    ppu: Ppu,
    apu: Apu,
    mapper: Option<Mapper>,
    controllers: ControllerIO,

    /// CPU cycles distributed through `tick`
    cycles: u64,

    /// Stall cycles the CPU still owes (DMC fetches)
    stall: u32,

    /// Latched frame-complete edge from the PPU
    frame_complete: bool,
}

impl Bus {
    /// Create a bus with no cartridge inserted
    ///
    /// RAM starts zeroed for deterministic behavior.
    pub fn new() -> Self {
        Bus {
            ram: Ram::with_zeros(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            mapper: None,
            controllers: ControllerIO::new(),
            cycles: 0,
            stall: 0,
            frame_complete: false,
        }
    }

    /// Insert a cartridge, constructing its mapper
    ///
    /// # Errors
    ///
    /// Fails for unsupported mapper ids; the bus stays in the
    /// no-cartridge state.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) -> Result<(), MapperError> {
        let mapper = Mapper::new(cartridge)?;
        self.ppu.set_mirroring(mapper.mirroring());
        self.mapper = Some(mapper);
        Ok(())
    }

    /// Whether a cartridge is inserted
    pub fn has_cartridge(&self) -> bool {
        self.mapper.is_some()
    }

    /// Advance the whole system by one CPU cycle
    ///
    /// Three PPU dots, one APU cycle, and any DMC fetch the APU asked
    /// for. The DMC read itself does not tick (it occupies one of the
    /// four stall cycles the CPU will burn).
    pub fn tick(&mut self) {
        self.cycles += 1;

        for _ in 0..3 {
            if self.ppu.step(&mut self.mapper) {
                self.frame_complete = true;
            }
        }

        if let Some(addr) = self.apu.clock() {
            let value = self.mem_read(addr);
            self.apu.dmc_load(value);
            self.stall += 4;
        }
    }

    /// Read a byte, ticking the system first
    pub fn read(&mut self, addr: u16) -> u8 {
        self.tick();
        self.mem_read(addr)
    }

    /// Write a byte, ticking the system first
    ///
    /// A write to $4014 performs the full OAM DMA transfer inline: 256
    /// source reads and 256 OAM writes, each ticking the system, plus one
    /// alignment cycle (513 cycles total on top of the store).
    pub fn write(&mut self, addr: u16, value: u8) {
        self.tick();
        if addr == 0x4014 {
            self.oam_dma(value);
        } else {
            self.mem_write(addr, value);
        }
    }

    /// Side-effect-free read for traces, tests, and debuggers
    ///
    /// PPU/APU registers are not consulted (their reads have side
    /// effects); those addresses return 0.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x4020..=0xFFFF => self.mapper.as_ref().map_or(0, |m| m.cpu_read(addr)),
            _ => 0,
        }
    }

    /// Route a read without ticking
    fn mem_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x2000..=0x3FFF => self.ppu.read_register(addr & 0x0007, &mut self.mapper),
            0x4015 => self.apu.read_status(),
            0x4016 => self.controllers.read_controller1(),
            0x4017 => self.controllers.read_controller2(),
            // Write-only APU registers, the DMA port, and the disabled
            // test range all read back as 0
            0x4000..=0x401F => 0,
            0x4020..=0xFFFF => self.mapper.as_ref().map_or(0, |m| m.cpu_read(addr)),
        }
    }

    /// Route a write without ticking
    fn mem_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, value),
            0x2000..=0x3FFF => {
                self.ppu
                    .write_register(addr & 0x0007, value, &mut self.mapper)
            }
            0x4016 => self.controllers.write_strobe(value),
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write_register(addr, value),
            0x4014 | 0x4018..=0x401F => {}
            0x4020..=0xFFFF => {
                if let Some(mapper) = self.mapper.as_mut() {
                    mapper.cpu_write(addr, value);
                }
            }
        }
    }

    /// OAM DMA: copy page (value * $100) into the PPU's OAM
    ///
    /// Every source read and every OAM write ticks the system, so the PPU
    /// keeps rendering underneath the transfer.
    fn oam_dma(&mut self, page: u8) {
        let base = (page as u16) << 8;

        // Alignment cycle
        self.tick();

        for offset in 0..256 {
            let value = self.read(base + offset);
            self.tick();
            self.ppu.write_oam_dma(value);
        }
    }

    // ========================================
    // Interrupt lines
    // ========================================

    /// Consume the PPU's NMI edge, if one is latched
    pub fn poll_nmi(&mut self) -> bool {
        self.ppu.take_nmi()
    }

    /// Level of the shared IRQ line (APU frame counter, DMC, mapper)
    pub fn irq_line(&self) -> bool {
        self.apu.irq_pending() || self.mapper.as_ref().is_some_and(|m| m.irq_pending())
    }

    // ========================================
    // Clock bookkeeping
    // ========================================

    /// Total CPU cycles ticked through the bus
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    /// Claim pending stall cycles (DMC fetches); resets to zero
    pub fn take_stall(&mut self) -> u32 {
        std::mem::take(&mut self.stall)
    }

    /// Consume the frame-complete edge
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    // ========================================
    // Component access
    // ========================================

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn apu(&self) -> &Apu {
        &self.apu
    }

    pub fn apu_mut(&mut self) -> &mut Apu {
        &mut self.apu
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerIO {
        &mut self.controllers
    }

    pub fn mapper(&self) -> Option<&Mapper> {
        self.mapper.as_ref()
    }

    /// Reset the resettable components (the cartridge keeps its banks)
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.apu.reset();
        self.controllers.reset();
        self.stall = 0;
        self.frame_complete = false;
        if let Some(mapper) = self.mapper.as_ref() {
            self.ppu.set_mirroring(mapper.mirroring());
        }
    }

    // ========================================
    // Test-image taps (blargg convention)
    // ========================================

    /// Status byte blargg-style test images write to $6000
    ///
    /// $80 means running, $00 pass, anything else a failure code.
    pub fn test_status(&self) -> Option<u8> {
        self.mapper.as_ref().map(|m| m.cpu_read(0x6000))
    }

    /// NUL-terminated message text starting at $6004
    pub fn test_message(&self) -> String {
        let mut message = String::new();
        if let Some(mapper) = self.mapper.as_ref() {
            for addr in 0x6004..0x7000u16 {
                let byte = mapper.cpu_read(addr);
                if byte == 0 {
                    break;
                }
                if byte.is_ascii() {
                    message.push(byte as char);
                }
            }
        }
        message
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Mirroring;

    fn test_cartridge() -> Cartridge {
        let mut prg_rom = vec![0xEA; 32 * 1024];
        prg_rom[0] = 0x42; // visible at $8000
        Cartridge {
            prg_rom,
            chr: vec![0; 8 * 1024],
            chr_is_ram: true,
            mapper: 0,
            mirroring: Mirroring::Horizontal,
            has_battery: false,
        }
    }

    #[test]
    fn test_ram_read_write_and_mirrors() {
        let mut bus = Bus::new();
        bus.write(0x0000, 0x42);
        assert_eq!(bus.read(0x0000), 0x42);
        assert_eq!(bus.read(0x0800), 0x42, "first RAM mirror");
        assert_eq!(bus.read(0x1800), 0x42, "third RAM mirror");
    }

    #[test]
    fn test_every_access_ticks_once() {
        let mut bus = Bus::new();
        let start = bus.cycle_count();

        bus.read(0x0000);
        bus.write(0x0000, 0x01);
        bus.read(0x2002);

        assert_eq!(bus.cycle_count() - start, 3, "one cycle per access");
    }

    #[test]
    fn test_tick_moves_ppu_three_dots() {
        let mut bus = Bus::new();
        let start_dot = bus.ppu().dot();

        bus.tick();
        assert_eq!(bus.ppu().dot(), start_dot + 3);
    }

    #[test]
    fn test_peek_has_no_side_effects() {
        let mut bus = Bus::new();
        let cycles = bus.cycle_count();

        bus.write(0x0100, 0x55);
        let before = bus.cycle_count();
        assert_eq!(bus.peek(0x0100), 0x55);
        assert_eq!(bus.cycle_count(), before, "peek never ticks");

        let _ = cycles;
    }

    #[test]
    fn test_ppu_register_mirroring() {
        let mut bus = Bus::new();

        // $2006 mirrors at $2026, $3FFE
        bus.write(0x2006, 0x21);
        bus.write(0x3FFE, 0x08);
        bus.write(0x2007, 0x42);

        bus.write(0x2006, 0x21);
        bus.write(0x2006, 0x08);
        let _ = bus.read(0x2007); // buffered
        assert_eq!(bus.read(0x2007), 0x42);
    }

    #[test]
    fn test_cartridge_window_and_missing_cartridge() {
        let mut bus = Bus::new();
        assert_eq!(bus.read(0x8000), 0, "no cartridge reads as 0");

        bus.insert_cartridge(test_cartridge()).unwrap();
        assert_eq!(bus.read(0x8000), 0x42);
    }

    #[test]
    fn test_unsupported_mapper_leaves_no_cartridge() {
        let mut bus = Bus::new();
        let mut cartridge = test_cartridge();
        cartridge.mapper = 99;

        assert!(bus.insert_cartridge(cartridge).is_err());
        assert!(!bus.has_cartridge());
    }

    #[test]
    fn test_disabled_region_reads_zero() {
        let mut bus = Bus::new();
        assert_eq!(bus.read(0x4018), 0);
        assert_eq!(bus.read(0x401F), 0);
        assert_eq!(bus.read(0x4000), 0, "write-only APU register");
    }

    #[test]
    fn test_oam_dma_copies_page_and_steals_cycles() {
        let mut bus = Bus::new();

        // Source page $02 with a recognizable ramp
        for i in 0..256u16 {
            bus.write(0x0200 + i, i as u8);
        }

        let before = bus.cycle_count();
        bus.write(0x4014, 0x02);
        let spent = bus.cycle_count() - before;

        assert_eq!(spent, 1 + 513, "store cycle plus 513 DMA cycles");
        assert_eq!(bus.ppu().read_oam(0), 0);
        assert_eq!(bus.ppu().read_oam(128), 128);
        assert_eq!(bus.ppu().read_oam(255), 255);
    }

    #[test]
    fn test_oam_dma_respects_oam_addr() {
        let mut bus = Bus::new();
        for i in 0..256u16 {
            bus.write(0x0300 + i, i as u8);
        }

        bus.write(0x2003, 0x10); // OAMADDR = $10
        bus.write(0x4014, 0x03);

        assert_eq!(bus.ppu().read_oam(0x10), 0, "first byte lands at $10");
        assert_eq!(bus.ppu().read_oam(0x0F), 0xFF, "transfer wraps around OAM");
    }

    #[test]
    fn test_controller_ports() {
        let mut bus = Bus::new();
        bus.controllers_mut().set_buttons_p1(0b0000_0001); // A pressed

        bus.write(0x4016, 1);
        bus.write(0x4016, 0);

        assert_eq!(bus.read(0x4016) & 1, 1, "A");
        assert_eq!(bus.read(0x4016) & 1, 0, "B");
    }

    #[test]
    fn test_blargg_taps_read_work_ram() {
        let mut bus = Bus::new();
        bus.insert_cartridge(test_cartridge()).unwrap();

        bus.write(0x6000, 0x80);
        for (i, byte) in b"Hello\0".iter().enumerate() {
            bus.write(0x6004 + i as u16, *byte);
        }

        assert_eq!(bus.test_status(), Some(0x80));
        assert_eq!(bus.test_message(), "Hello");
    }
}
