// APU module - Audio Processing Unit (2A03) emulation
//
// Five voices: two pulses, a triangle, a noise channel, and the delta
// modulation channel. The bus clocks the APU once per CPU cycle; the
// triangle timer runs at that rate, everything else at half of it. A
// frame sequencer derives the quarter/half-frame envelope, linear, length
// and sweep clocks from the CPU cycle count and raises the frame IRQ in
// 4-step mode.
//
// The DMC's memory reader cannot reach the bus from in here, so `clock`
// hands the fetch address back to the bus, which performs the read,
// delivers the byte through `dmc_load`, and parks the four stall cycles
// on the CPU.
//
// # Register Map
//
// | Address       | Function                                 |
// |---------------|------------------------------------------|
// | $4000-$4003   | Pulse 1                                  |
// | $4004-$4007   | Pulse 2                                  |
// | $4008-$400B   | Triangle                                 |
// | $400C-$400F   | Noise                                    |
// | $4010-$4013   | DMC                                      |
// | $4015         | Channel enables (W) / status (R)         |
// | $4017         | Frame counter mode (W)                   |

pub mod channels;
pub mod components;
pub mod constants;

#[cfg(test)]
mod tests;

use crate::audio::{sample_ring, HighPassFilter, Mixer, SampleConsumer, SampleProducer};
use channels::{Dmc, NoiseChannel, PulseChannel, TriangleChannel};
use components::{FrameCounter, FrameEvent};
use constants::CPU_CLOCK_HZ;

/// Sample ring capacity (a comfortable fraction of a second at 44.1 kHz)
const AUDIO_RING_CAPACITY: usize = 8192;

/// Default audio sample rate in Hz
const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// APU state
pub struct Apu {
    pulse1: PulseChannel,
    pulse2: PulseChannel,
    triangle: TriangleChannel,
    noise: NoiseChannel,
    dmc: Dmc,

    frame_counter: FrameCounter,

    /// CPU cycles elapsed; parity gates the half-rate timers
    cycles: u64,

    /// A $4017 write waiting out its 3-4 cycle effect delay
    pending_frame_write: Option<(u8, u8)>,

    // Audio output path
    mixer: Mixer,
    filter: HighPassFilter,
    sample_accumulator: f64,
    cycles_per_sample: f64,
    ring: SampleProducer,
    consumer: Option<SampleConsumer>,
}

impl Apu {
    /// Create a new APU in its power-on state
    pub fn new() -> Self {
        let (producer, consumer) = sample_ring(AUDIO_RING_CAPACITY);
        Apu {
            pulse1: PulseChannel::new(1),
            pulse2: PulseChannel::new(2),
            triangle: TriangleChannel::new(),
            noise: NoiseChannel::new(),
            dmc: Dmc::new(),
            frame_counter: FrameCounter::new(),
            cycles: 0,
            pending_frame_write: None,
            mixer: Mixer::new(),
            filter: HighPassFilter::new(),
            sample_accumulator: 0.0,
            cycles_per_sample: CPU_CLOCK_HZ / DEFAULT_SAMPLE_RATE as f64,
            ring: producer,
            consumer: Some(consumer),
        }
    }

    /// Reset to power-on state (the audio ring is kept)
    pub fn reset(&mut self) {
        self.pulse1 = PulseChannel::new(1);
        self.pulse2 = PulseChannel::new(2);
        self.triangle = TriangleChannel::new();
        self.noise = NoiseChannel::new();
        self.dmc = Dmc::new();
        self.frame_counter.reset();
        self.cycles = 0;
        self.pending_frame_write = None;
        self.filter.reset();
        self.sample_accumulator = 0.0;
    }

    /// Take the consumer half of the sample ring (once)
    pub fn take_consumer(&mut self) -> Option<SampleConsumer> {
        self.consumer.take()
    }

    /// Configure the output sample rate
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.cycles_per_sample = CPU_CLOCK_HZ / sample_rate as f64;
    }

    /// Master volume control
    pub fn set_volume(&mut self, volume: f32) {
        self.mixer.set_volume(volume);
    }

    /// Advance one CPU cycle
    ///
    /// Returns the address the DMC reader wants fetched, if its sample
    /// buffer ran empty; the bus performs the read and calls `dmc_load`.
    pub fn clock(&mut self) -> Option<u16> {
        self.cycles += 1;

        // A $4017 write takes effect a few cycles after the store
        if let Some((value, delay)) = self.pending_frame_write {
            if delay == 0 {
                let events = self.frame_counter.write_control(value);
                self.apply_frame_events(&events);
                self.pending_frame_write = None;
            } else {
                self.pending_frame_write = Some((value, delay - 1));
            }
        }

        let events = self.frame_counter.clock();
        self.apply_frame_events(&events);

        // Triangle runs at CPU rate; the rest at half
        self.triangle.clock_timer();
        if self.cycles & 1 == 0 {
            self.pulse1.clock_timer();
            self.pulse2.clock_timer();
            self.noise.clock_timer();
            self.dmc.clock_timer();
        }

        // Fractional downsampler: one output sample per ~40.58 CPU cycles
        self.sample_accumulator += 1.0;
        if self.sample_accumulator >= self.cycles_per_sample {
            self.sample_accumulator -= self.cycles_per_sample;
            let mixed = self.mixer.mix(
                self.pulse1.output(),
                self.pulse2.output(),
                self.triangle.output(),
                self.noise.output(),
                self.dmc.output(),
            );
            let sample = self.filter.process(mixed);
            // Ring full: drop the sample rather than block the core
            let _ = self.ring.push(sample);
        }

        if self.dmc.needs_byte() {
            Some(self.dmc.current_address())
        } else {
            None
        }
    }

    /// Deliver a DMC sample byte fetched by the bus
    pub fn dmc_load(&mut self, value: u8) {
        self.dmc.load_byte(value);
    }

    /// Frame or DMC interrupt asserted
    pub fn irq_pending(&self) -> bool {
        self.frame_counter.irq_pending() || self.dmc.irq_pending()
    }

    /// Write an APU register ($4000-$4013, $4015, $4017)
    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x4000 => self.pulse1.write_control(value),
            0x4001 => self.pulse1.write_sweep(value),
            0x4002 => self.pulse1.write_timer_low(value),
            0x4003 => self.pulse1.write_timer_high(value),

            0x4004 => self.pulse2.write_control(value),
            0x4005 => self.pulse2.write_sweep(value),
            0x4006 => self.pulse2.write_timer_low(value),
            0x4007 => self.pulse2.write_timer_high(value),

            0x4008 => self.triangle.write_control(value),
            0x400A => self.triangle.write_timer_low(value),
            0x400B => self.triangle.write_timer_high(value),

            0x400C => self.noise.write_control(value),
            0x400E => self.noise.write_mode_period(value),
            0x400F => self.noise.write_length(value),

            0x4010 => self.dmc.write_control(value),
            0x4011 => self.dmc.write_direct_load(value),
            0x4012 => self.dmc.write_sample_address(value),
            0x4013 => self.dmc.write_sample_length(value),

            0x4015 => {
                self.pulse1.set_enabled(value & 0x01 != 0);
                self.pulse2.set_enabled(value & 0x02 != 0);
                self.triangle.set_enabled(value & 0x04 != 0);
                self.noise.set_enabled(value & 0x08 != 0);
                self.dmc.set_enabled(value & 0x10 != 0);
                self.dmc.clear_irq();
            }

            0x4017 => {
                // Takes effect after 3 cycles from an even cycle, 4 from
                // an odd one
                let delay = 3 + (self.cycles & 1) as u8;
                self.pending_frame_write = Some((value, delay));
            }

            _ => {}
        }
    }

    /// Read the $4015 status register
    ///
    /// Bits 0-3: length counters non-zero; bit 4: DMC bytes remaining;
    /// bit 6: frame IRQ (cleared by the read); bit 7: DMC IRQ.
    pub fn read_status(&mut self) -> u8 {
        let mut status = 0u8;
        if self.pulse1.is_active() {
            status |= 0x01;
        }
        if self.pulse2.is_active() {
            status |= 0x02;
        }
        if self.triangle.is_active() {
            status |= 0x04;
        }
        if self.noise.is_active() {
            status |= 0x08;
        }
        if self.dmc.is_active() {
            status |= 0x10;
        }
        if self.frame_counter.irq_pending() {
            status |= 0x40;
        }
        if self.dmc.irq_pending() {
            status |= 0x80;
        }

        self.frame_counter.clear_irq();
        status
    }

    /// Fan a frame-counter event out to the channels
    fn apply_frame_events(&mut self, events: &[FrameEvent]) {
        for event in events {
            match event {
                FrameEvent::QuarterFrame => self.clock_quarter_frame(),
                FrameEvent::HalfFrame => self.clock_half_frame(),
                FrameEvent::SetIrq => {}
            }
        }
    }

    /// Quarter-frame: envelopes and the triangle's linear counter
    fn clock_quarter_frame(&mut self) {
        self.pulse1.clock_envelope();
        self.pulse2.clock_envelope();
        self.noise.clock_envelope();
        self.triangle.clock_linear_counter();
    }

    /// Half-frame: the quarter-frame units fire here too, plus length
    /// counters and sweeps
    fn clock_half_frame(&mut self) {
        self.clock_quarter_frame();
        self.pulse1.clock_length_counter();
        self.pulse1.clock_sweep();
        self.pulse2.clock_length_counter();
        self.pulse2.clock_sweep();
        self.triangle.clock_length_counter();
        self.noise.clock_length_counter();
    }

    // Accessors for tests and debugging

    pub(crate) fn pulse1_length(&self) -> u8 {
        self.pulse1.length_value()
    }

    pub(crate) fn triangle_length(&self) -> u8 {
        self.triangle.length_value()
    }

    pub(crate) fn noise_length(&self) -> u8 {
        self.noise.length_value()
    }

    /// Samples waiting in the output ring
    pub fn queued_samples(&self) -> usize {
        self.ring.len()
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}
