// rusticom - a cycle-ticked NES emulator
//
// The core is a single ownership tree: `Emulator` owns the CPU and the
// `Bus`, and the bus owns the RAM, PPU, APU, controller ports, and the
// cartridge mapper. The CPU is the master clock; every one of its memory
// accesses moves the PPU three dots and the APU one cycle before the
// access value settles.

pub mod apu;
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;
pub mod ram;

// Re-export the main types for convenience
pub use apu::Apu;
pub use audio::{sample_ring, HighPassFilter, Mixer, SampleConsumer, SampleProducer};
pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, MapperError, Mirroring};
pub use cpu::{Cpu, CpuHalt};
pub use display::{run_display, FrameBuffer, WindowConfig};
pub use emulator::{Emulator, EmulatorConfig, RecentRomsList};
pub use input::{Controller, ControllerIO, KeyboardHandler, Player};
pub use ppu::Ppu;
pub use ram::Ram;

#[cfg(feature = "audio")]
pub use audio::{AudioConfig, AudioOutput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components_instantiate() {
        let _cpu = Cpu::new();
        let _ppu = Ppu::new();
        let _apu = Apu::new();
        let _bus = Bus::new();
        let _controller = Controller::new();
        let _controller_io = ControllerIO::new();
        let _ram = Ram::new();
        let _emulator = Emulator::new();
    }
}
