// Pulse wave channel (both pulse 1 and pulse 2)
//
// A duty-masked square wave: the timer steps an 8-position duty sequence,
// and the output is the envelope (or constant) volume wherever the duty
// pattern is high. The timer is clocked once per APU cycle (every other
// CPU cycle).

use crate::apu::components::{Envelope, LengthCounter, Sweep, Timer};
use crate::apu::constants::DUTY_PATTERNS;

/// Pulse channel
#[derive(Debug, Clone)]
pub struct PulseChannel {
    enabled: bool,
    duty: u8,
    duty_position: u8,
    envelope: Envelope,
    sweep: Sweep,
    length_counter: LengthCounter,
    timer: Timer,
}

impl PulseChannel {
    /// `channel_number` is 1 or 2 and selects the sweep's negate flavor
    pub fn new(channel_number: u8) -> Self {
        Self {
            enabled: false,
            duty: 0,
            duty_position: 0,
            envelope: Envelope::new(),
            sweep: Sweep::new(channel_number),
            length_counter: LengthCounter::new(),
            timer: Timer::new(),
        }
    }

    /// $4000/$4004: duty, length halt, envelope control
    pub fn write_control(&mut self, value: u8) {
        self.duty = (value >> 6) & 0x03;
        self.length_counter.set_halt(value & 0x20 != 0);
        self.envelope.write_control(value);
    }

    /// $4001/$4005: sweep unit
    pub fn write_sweep(&mut self, value: u8) {
        self.sweep.write_control(value);
    }

    /// $4002/$4006: timer low byte
    pub fn write_timer_low(&mut self, value: u8) {
        self.timer.set_period_low(value);
    }

    /// $4003/$4007: length load and timer high bits
    ///
    /// Also restarts the envelope and resets the duty phase.
    pub fn write_timer_high(&mut self, value: u8) {
        self.timer.set_period_high(value);
        if self.enabled {
            self.length_counter.load(value >> 3);
        }
        self.envelope.restart();
        self.duty_position = 0;
    }

    /// $4015 enable bit
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length_counter.clear();
        }
    }

    /// Length counter still running
    pub fn is_active(&self) -> bool {
        self.enabled && self.length_counter.is_active()
    }

    /// One APU cycle
    pub fn clock_timer(&mut self) {
        if self.timer.clock() {
            self.duty_position = (self.duty_position + 1) & 7;
        }
    }

    /// Quarter-frame event
    pub fn clock_envelope(&mut self) {
        self.envelope.clock();
    }

    /// Half-frame events
    pub fn clock_length_counter(&mut self) {
        self.length_counter.clock();
    }

    pub fn clock_sweep(&mut self) {
        if let Some(period) = self.sweep.clock(self.timer.period()) {
            self.timer.set_period(period);
        }
    }

    /// Current sample (0 or the envelope volume)
    pub fn output(&self) -> u8 {
        if !self.is_active() || self.sweep.is_muting(self.timer.period()) {
            return 0;
        }
        if DUTY_PATTERNS[self.duty as usize][self.duty_position as usize] == 0 {
            0
        } else {
            self.envelope.volume()
        }
    }

    pub(crate) fn length_value(&self) -> u8 {
        self.length_counter.value()
    }
}
