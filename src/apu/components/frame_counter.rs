//! Frame counter
//!
//! The low-frequency sequencer driving envelopes, linear counters, length
//! counters, and sweeps, clocked off the CPU cycle count. In 4-step mode
//! quarter-frame events land at 7457/14913/22371/29829 within a
//! 29830-cycle frame and an IRQ is raised at the end unless inhibited;
//! 5-step mode stretches to 37282 cycles, skips the IRQ, and leaves step
//! four empty.

use crate::apu::constants::{
    FRAME_COUNTER_4_STEP_CYCLES, FRAME_COUNTER_4_STEP_PERIOD, FRAME_COUNTER_5_STEP_CYCLES,
    FRAME_COUNTER_5_STEP_PERIOD,
};

/// Events the frame counter can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Clock envelopes and linear counters
    QuarterFrame,
    /// Clock envelopes, linear counters, length counters, and sweeps
    HalfFrame,
    /// The frame IRQ flag was raised (4-step mode only)
    SetIrq,
}

/// Sequencer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    FourStep,
    FiveStep,
}

/// Frame counter state
#[derive(Debug, Clone)]
pub struct FrameCounter {
    mode: FrameMode,
    cycle: u32,
    step: usize,
    irq_inhibit: bool,
    irq_pending: bool,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self {
            mode: FrameMode::FourStep,
            cycle: 0,
            step: 0,
            irq_inhibit: false,
            irq_pending: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply a $4017 write (the caller is responsible for the 3-4 cycle
    /// write-effect delay)
    ///
    /// Bit 7 selects 5-step mode, bit 6 inhibits the IRQ (and clears a
    /// pending one). The sequencer restarts, and entering 5-step mode
    /// clocks the quarter- and half-frame units immediately.
    pub fn write_control(&mut self, value: u8) -> Vec<FrameEvent> {
        self.mode = if value & 0x80 != 0 {
            FrameMode::FiveStep
        } else {
            FrameMode::FourStep
        };
        self.irq_inhibit = value & 0x40 != 0;
        if self.irq_inhibit {
            self.irq_pending = false;
        }

        self.cycle = 0;
        self.step = 0;

        let mut events = Vec::new();
        if self.mode == FrameMode::FiveStep {
            // A half-frame event implies the quarter-frame units as well
            events.push(FrameEvent::HalfFrame);
        }
        events
    }

    /// Advance one CPU cycle
    pub fn clock(&mut self) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        self.cycle += 1;

        match self.mode {
            FrameMode::FourStep => self.clock_4_step(&mut events),
            FrameMode::FiveStep => self.clock_5_step(&mut events),
        }

        events
    }

    fn clock_4_step(&mut self, events: &mut Vec<FrameEvent>) {
        if self.step < 4 && self.cycle == FRAME_COUNTER_4_STEP_CYCLES[self.step] {
            match self.step {
                0 | 2 => events.push(FrameEvent::QuarterFrame),
                1 => events.push(FrameEvent::HalfFrame),
                _ => {
                    events.push(FrameEvent::HalfFrame);
                    if !self.irq_inhibit {
                        self.irq_pending = true;
                        events.push(FrameEvent::SetIrq);
                    }
                }
            }
            self.step += 1;
        }

        if self.cycle >= FRAME_COUNTER_4_STEP_PERIOD {
            // The IRQ flag is also raised as the sequence wraps
            if !self.irq_inhibit {
                self.irq_pending = true;
            }
            self.cycle = 0;
            self.step = 0;
        }
    }

    fn clock_5_step(&mut self, events: &mut Vec<FrameEvent>) {
        if self.step < 5 && self.cycle == FRAME_COUNTER_5_STEP_CYCLES[self.step] {
            match self.step {
                0 | 2 => events.push(FrameEvent::QuarterFrame),
                1 | 4 => events.push(FrameEvent::HalfFrame),
                // Step four of the 5-step sequence does nothing
                _ => {}
            }
            self.step += 1;
        }

        if self.cycle >= FRAME_COUNTER_5_STEP_PERIOD {
            self.cycle = 0;
            self.step = 0;
        }
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// Reading $4015 clears the frame IRQ flag
    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    pub fn irq_inhibited(&self) -> bool {
        self.irq_inhibit
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fc: &mut FrameCounter, cycles: u32) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        for _ in 0..cycles {
            events.extend(fc.clock());
        }
        events
    }

    #[test]
    fn test_4_step_event_offsets() {
        let mut fc = FrameCounter::new();

        let events = run(&mut fc, 7457);
        assert!(events.contains(&FrameEvent::QuarterFrame));
        assert!(!events.contains(&FrameEvent::HalfFrame));

        let events = run(&mut fc, 14913 - 7457);
        assert!(events.contains(&FrameEvent::HalfFrame));

        let events = run(&mut fc, 22371 - 14913);
        assert!(events.contains(&FrameEvent::QuarterFrame));

        let events = run(&mut fc, 29829 - 22371);
        assert!(events.contains(&FrameEvent::HalfFrame));
        assert!(events.contains(&FrameEvent::SetIrq));
        assert!(fc.irq_pending());
    }

    #[test]
    fn test_5_step_no_irq() {
        let mut fc = FrameCounter::new();
        fc.write_control(0x80);

        let events = run(&mut fc, FRAME_COUNTER_5_STEP_PERIOD);
        assert!(!events.contains(&FrameEvent::SetIrq));
        assert!(!fc.irq_pending());
        assert!(events.contains(&FrameEvent::HalfFrame));
    }

    #[test]
    fn test_5_step_final_event_at_37281() {
        let mut fc = FrameCounter::new();
        fc.write_control(0x80);

        let events = run(&mut fc, 29829);
        assert!(
            !events.contains(&FrameEvent::SetIrq),
            "step four is silent in 5-step mode"
        );

        run(&mut fc, 37281 - 29829 - 1);
        let events = run(&mut fc, 1);
        assert!(events.contains(&FrameEvent::HalfFrame));
    }

    #[test]
    fn test_irq_inhibit_blocks_and_clears() {
        let mut fc = FrameCounter::new();
        run(&mut fc, FRAME_COUNTER_4_STEP_PERIOD);
        assert!(fc.irq_pending());

        fc.write_control(0x40);
        assert!(!fc.irq_pending(), "inhibit clears the pending flag");

        run(&mut fc, FRAME_COUNTER_4_STEP_PERIOD);
        assert!(!fc.irq_pending(), "no IRQ while inhibited");
    }

    #[test]
    fn test_write_restarts_sequence() {
        let mut fc = FrameCounter::new();
        run(&mut fc, 7000);
        fc.write_control(0x00);

        let events = run(&mut fc, 457);
        assert!(events.is_empty(), "sequence restarted from zero");
        let events = run(&mut fc, 7000);
        assert!(events.contains(&FrameEvent::QuarterFrame));
    }

    #[test]
    fn test_entering_5_step_clocks_immediately() {
        let mut fc = FrameCounter::new();
        let events = fc.write_control(0x80);
        assert!(events.contains(&FrameEvent::HalfFrame));

        let events = fc.write_control(0x00);
        assert!(events.is_empty(), "4-step entry is silent");
    }
}
