// Input module - NES standard controller emulation
//
// Two controller ports share one strobe line at $4016. Writing bit 0 set
// puts both controllers in strobe mode, continuously reloading their
// shift registers from the live button state; writing bit 0 clear latches
// that state, and each read of $4016/$4017 then shifts out one button on
// bit 0 in the order A, B, Select, Start, Up, Down, Left, Right, followed
// by ones forever.

pub mod keyboard;

pub use keyboard::{Button, KeyboardHandler, Player};

/// Button state of one standard controller
#[derive(Debug, Clone, Copy, Default)]
pub struct Controller {
    pub button_a: bool,
    pub button_b: bool,
    pub select: bool,
    pub start: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a packed byte: bit 0 = A .. bit 7 = Right
    pub fn from_bits(bits: u8) -> Self {
        Controller {
            button_a: bits & 0x01 != 0,
            button_b: bits & 0x02 != 0,
            select: bits & 0x04 != 0,
            start: bits & 0x08 != 0,
            up: bits & 0x10 != 0,
            down: bits & 0x20 != 0,
            left: bits & 0x40 != 0,
            right: bits & 0x80 != 0,
        }
    }

    /// Pack into a byte: bit 0 = A .. bit 7 = Right
    pub fn to_bits(self) -> u8 {
        u8::from(self.button_a)
            | u8::from(self.button_b) << 1
            | u8::from(self.select) << 2
            | u8::from(self.start) << 3
            | u8::from(self.up) << 4
            | u8::from(self.down) << 5
            | u8::from(self.left) << 6
            | u8::from(self.right) << 7
    }
}

/// Both controller ports and the shared strobe/shift protocol
pub struct ControllerIO {
    controller1: Controller,
    controller2: Controller,

    /// While set, the shift registers continuously reload
    strobe: bool,

    /// Shift registers latched on the strobe's falling edge
    shift1: u8,
    shift2: u8,

    /// Bits shifted out so far
    reads1: u8,
    reads2: u8,
}

impl ControllerIO {
    pub fn new() -> Self {
        ControllerIO {
            controller1: Controller::new(),
            controller2: Controller::new(),
            strobe: false,
            shift1: 0,
            shift2: 0,
            reads1: 0,
            reads2: 0,
        }
    }

    pub fn reset(&mut self) {
        self.strobe = false;
        self.shift1 = 0;
        self.shift2 = 0;
        self.reads1 = 0;
        self.reads2 = 0;
    }

    /// Update controller 1's live state (host, once per frame)
    pub fn set_controller1(&mut self, state: Controller) {
        self.controller1 = state;
        if self.strobe {
            self.shift1 = state.to_bits();
        }
    }

    /// Update controller 2's live state
    pub fn set_controller2(&mut self, state: Controller) {
        self.controller2 = state;
        if self.strobe {
            self.shift2 = state.to_bits();
        }
    }

    /// Packed-byte variants of the host interface
    pub fn set_buttons_p1(&mut self, bits: u8) {
        self.set_controller1(Controller::from_bits(bits));
    }

    pub fn set_buttons_p2(&mut self, bits: u8) {
        self.set_controller2(Controller::from_bits(bits));
    }

    /// Write $4016: bit 0 drives the strobe line
    ///
    /// Setting it reloads continuously; clearing it latches the state for
    /// serial reads.
    pub fn write_strobe(&mut self, value: u8) {
        let new_strobe = value & 0x01 != 0;
        if new_strobe {
            self.shift1 = self.controller1.to_bits();
            self.shift2 = self.controller2.to_bits();
            self.reads1 = 0;
            self.reads2 = 0;
        } else if self.strobe {
            // Falling edge: latch for shifting
            self.shift1 = self.controller1.to_bits();
            self.shift2 = self.controller2.to_bits();
            self.reads1 = 0;
            self.reads2 = 0;
        }
        self.strobe = new_strobe;
    }

    /// Read $4016 (controller 1)
    pub fn read_controller1(&mut self) -> u8 {
        if self.strobe {
            // Live A button while strobing
            return u8::from(self.controller1.button_a);
        }

        if self.reads1 >= 8 {
            return 0x01;
        }
        let bit = self.shift1 & 0x01;
        self.shift1 >>= 1;
        self.reads1 += 1;
        bit
    }

    /// Read $4017 (controller 2)
    pub fn read_controller2(&mut self) -> u8 {
        if self.strobe {
            return u8::from(self.controller2.button_a);
        }

        if self.reads2 >= 8 {
            return 0x01;
        }
        let bit = self.shift2 & 0x01;
        self.shift2 >>= 1;
        self.reads2 += 1;
        bit
    }
}

impl Default for ControllerIO {
    fn default() -> Self {
        Self::new()
    }
}
