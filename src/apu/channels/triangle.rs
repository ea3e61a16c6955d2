// Triangle wave channel
//
// Steps through a 32-entry ramp (15..0, 0..15). Unlike the other voices
// its timer runs at the full CPU rate, and the sequencer only advances
// while both the length counter and the linear counter are non-zero, so a
// halted triangle holds its last level instead of clicking.

use crate::apu::components::{LengthCounter, LinearCounter, Timer};
use crate::apu::constants::TRIANGLE_SEQUENCE;

/// Triangle channel
#[derive(Debug, Clone)]
pub struct TriangleChannel {
    enabled: bool,
    sequence_index: u8,
    linear_counter: LinearCounter,
    length_counter: LengthCounter,
    timer: Timer,
}

impl TriangleChannel {
    pub fn new() -> Self {
        Self {
            enabled: false,
            sequence_index: 0,
            linear_counter: LinearCounter::new(),
            length_counter: LengthCounter::new(),
            timer: Timer::new(),
        }
    }

    /// $4008: control flag and linear counter reload value
    pub fn write_control(&mut self, value: u8) {
        self.linear_counter.write_control(value);
        self.length_counter.set_halt(value & 0x80 != 0);
    }

    /// $400A: timer low byte
    pub fn write_timer_low(&mut self, value: u8) {
        self.timer.set_period_low(value);
    }

    /// $400B: length load, timer high bits, linear reload arm
    pub fn write_timer_high(&mut self, value: u8) {
        self.timer.set_period_high(value);
        if self.enabled {
            self.length_counter.load(value >> 3);
        }
        self.linear_counter.arm_reload();
    }

    /// $4015 enable bit
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length_counter.clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.length_counter.is_active()
    }

    /// One CPU cycle
    pub fn clock_timer(&mut self) {
        if self.timer.clock()
            && self.length_counter.is_active()
            && self.linear_counter.is_active()
        {
            self.sequence_index = (self.sequence_index + 1) & 31;
        }
    }

    /// Quarter-frame event
    pub fn clock_linear_counter(&mut self) {
        self.linear_counter.clock();
    }

    /// Half-frame event
    pub fn clock_length_counter(&mut self) {
        self.length_counter.clock();
    }

    /// Current sample (0-15)
    pub fn output(&self) -> u8 {
        if !self.is_active() || !self.linear_counter.is_active() {
            return 0;
        }
        TRIANGLE_SEQUENCE[self.sequence_index as usize]
    }

    pub(crate) fn length_value(&self) -> u8 {
        self.length_counter.value()
    }
}

impl Default for TriangleChannel {
    fn default() -> Self {
        Self::new()
    }
}
