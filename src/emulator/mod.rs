// Emulator module - the top-level aggregate
//
// Owns the CPU and the bus (which owns everything else) and exposes the
// host contract: load an image, reset, run one frame at a time, feed
// controller snapshots, drain audio. An illegal opcode surfaces as a
// `CpuHalt` error from `run_frame` instead of taking the process down.

mod config;
mod recent_roms;
mod screenshot;

pub use config::{EmulatorConfig, HotkeyConfig, ScreenshotConfig, VideoConfig};
pub use recent_roms::RecentRomsList;
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::audio::SampleConsumer;
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::{Cpu, CpuHalt};
use crate::input::Controller;
use std::path::{Path, PathBuf};

/// The complete emulated machine
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    config: EmulatorConfig,
    rom_path: Option<PathBuf>,
    audio: Option<SampleConsumer>,
    paused: bool,
}

impl Emulator {
    /// Create an emulator with no cartridge loaded
    pub fn new() -> Self {
        let mut bus = Bus::new();
        let audio = bus.apu_mut().take_consumer();
        Emulator {
            cpu: Cpu::new(),
            bus,
            config: EmulatorConfig::load_or_default(),
            rom_path: None,
            audio,
            paused: false,
        }
    }

    /// Load an iNES image from disk
    ///
    /// On success the emulator is reset and the path is added to the
    /// recent-ROM list; on failure the previous state is untouched.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let cartridge = Cartridge::from_ines_file(path)?;
        self.insert(cartridge)?;
        self.rom_path = Some(path.to_path_buf());

        let mut recents = RecentRomsList::load_or_default();
        recents.add(path);
        if let Err(err) = recents.save() {
            eprintln!("Could not save recent ROM list: {}", err);
        }

        Ok(())
    }

    /// Load an iNES image already in memory
    pub fn load_rom_bytes(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let cartridge = Cartridge::from_ines_bytes(bytes)?;
        self.insert(cartridge)?;
        self.rom_path = None;
        Ok(())
    }

    fn insert(&mut self, cartridge: Cartridge) -> Result<(), Box<dyn std::error::Error>> {
        let mapper_id = cartridge.mapper;
        let prg_banks = cartridge.prg_bank_count();
        self.bus.insert_cartridge(cartridge)?;
        println!(
            "ROM loaded: mapper {}, {} PRG bank(s)",
            mapper_id, prg_banks
        );
        self.reset();
        Ok(())
    }

    /// Press the reset button
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
        self.paused = false;
    }

    /// Run the CPU until the PPU completes one frame
    ///
    /// # Errors
    ///
    /// Returns `CpuHalt` when the program hits an unsupported opcode; the
    /// program counter and opcode identify the fault.
    pub fn run_frame(&mut self) -> Result<(), CpuHalt> {
        while !self.bus.take_frame_complete() {
            self.cpu.step(&mut self.bus)?;
        }
        Ok(())
    }

    /// Execute a single instruction (debugging aid)
    pub fn step_instruction(&mut self) -> Result<u32, CpuHalt> {
        self.cpu.step(&mut self.bus)
    }

    /// The last completed frame: 256x240 palette indices
    pub fn frame(&self) -> &[u8] {
        self.bus.ppu().frame()
    }

    // ========================================
    // Host input
    // ========================================

    /// Update controller 1 from a host snapshot
    pub fn set_controller1(&mut self, state: Controller) {
        self.bus.controllers_mut().set_controller1(state);
    }

    /// Update controller 2 from a host snapshot
    pub fn set_controller2(&mut self, state: Controller) {
        self.bus.controllers_mut().set_controller2(state);
    }

    /// Packed-byte variant (bit 0 = A .. bit 7 = Right)
    pub fn set_buttons_p1(&mut self, bits: u8) {
        self.bus.controllers_mut().set_buttons_p1(bits);
    }

    pub fn set_buttons_p2(&mut self, bits: u8) {
        self.bus.controllers_mut().set_buttons_p2(bits);
    }

    // ========================================
    // Host audio
    // ========================================

    /// Hand the audio ring's consumer half to the host audio thread
    pub fn take_audio(&mut self) -> Option<SampleConsumer> {
        self.audio.take()
    }

    /// Pull audio samples directly (when no audio thread owns the ring)
    ///
    /// Fills `output`, substituting silence on underrun; returns the
    /// number of real samples delivered.
    pub fn drain_audio(&mut self, output: &mut [f32]) -> usize {
        match self.audio.as_ref() {
            Some(consumer) => consumer.fill(output),
            None => 0,
        }
    }

    /// Master volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.bus.apu_mut().set_volume(volume);
    }

    /// Output sample rate for the APU's downsampler
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.bus.apu_mut().set_sample_rate(sample_rate);
    }

    // ========================================
    // Shell features
    // ========================================

    /// Save the current frame as a PNG
    pub fn screenshot(&self) -> Result<PathBuf, ScreenshotError> {
        save_screenshot(
            self.frame(),
            &self.config.screenshot,
            self.rom_path.as_deref(),
        )
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EmulatorConfig {
        &mut self.config
    }

    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
