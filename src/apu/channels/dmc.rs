// Delta modulation channel
//
// Plays 1-bit delta PCM fetched from CPU address space: each timer
// underflow consumes one bit of the shift register, nudging the 7-bit
// output level by ±2. After eight bits the register reloads from the
// sample buffer, and whenever the buffer is empty with bytes remaining
// the memory reader asks the bus for the next byte (stalling the CPU for
// four cycles). Sample addresses wrap from $FFFF to $8000.

use crate::apu::constants::DMC_RATE_TABLE;

/// Delta modulation channel
#[derive(Debug, Clone)]
pub struct Dmc {
    irq_enabled: bool,
    irq_pending: bool,
    loop_flag: bool,

    timer_period: u16,
    timer: u16,

    /// Start address programmed through $4012
    sample_address: u16,
    /// Length programmed through $4013
    sample_length: u16,

    /// Reader cursor
    current_address: u16,
    bytes_remaining: u16,
    sample_buffer: u8,
    buffer_empty: bool,

    /// Output unit
    output_level: u8,
    shift_register: u8,
    bits_remaining: u8,
    silence: bool,
}

impl Dmc {
    pub fn new() -> Self {
        Self {
            irq_enabled: false,
            irq_pending: false,
            loop_flag: false,
            timer_period: DMC_RATE_TABLE[0] / 2,
            timer: 0,
            sample_address: 0xC000,
            sample_length: 1,
            current_address: 0xC000,
            bytes_remaining: 0,
            sample_buffer: 0,
            buffer_empty: true,
            output_level: 0,
            shift_register: 0,
            bits_remaining: 8,
            silence: true,
        }
    }

    /// $4010: IRQ enable, loop flag, rate index
    ///
    /// The rate table is in CPU cycles; this timer runs on the APU clock,
    /// so the period is halved here.
    pub fn write_control(&mut self, value: u8) {
        self.irq_enabled = value & 0x80 != 0;
        self.loop_flag = value & 0x40 != 0;
        self.timer_period = DMC_RATE_TABLE[(value & 0x0F) as usize] / 2;
        if !self.irq_enabled {
            self.irq_pending = false;
        }
    }

    /// $4011: direct load of the 7-bit output level
    pub fn write_direct_load(&mut self, value: u8) {
        self.output_level = value & 0x7F;
    }

    /// $4012: sample start = $C000 + value * 64
    pub fn write_sample_address(&mut self, value: u8) {
        self.sample_address = 0xC000 + (value as u16) * 64;
    }

    /// $4013: sample length = value * 16 + 1
    pub fn write_sample_length(&mut self, value: u8) {
        self.sample_length = (value as u16) * 16 + 1;
    }

    /// $4015 bit 4
    ///
    /// Clearing zeroes bytes-remaining; setting with bytes-remaining == 0
    /// restarts the sample from its programmed address.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.bytes_remaining = 0;
        } else if self.bytes_remaining == 0 {
            self.restart();
        }
    }

    /// Rewind the reader to the programmed sample
    fn restart(&mut self) {
        self.current_address = self.sample_address;
        self.bytes_remaining = self.sample_length;
    }

    /// The reader wants a byte from this address
    pub fn needs_byte(&self) -> bool {
        self.buffer_empty && self.bytes_remaining > 0
    }

    /// Address the next fetch should read
    pub fn current_address(&self) -> u16 {
        self.current_address
    }

    /// Deliver a fetched byte to the sample buffer
    pub fn load_byte(&mut self, value: u8) {
        self.sample_buffer = value;
        self.buffer_empty = false;

        // The address bus wraps from $FFFF back into the upper bank
        self.current_address = if self.current_address == 0xFFFF {
            0x8000
        } else {
            self.current_address + 1
        };

        self.bytes_remaining -= 1;
        if self.bytes_remaining == 0 {
            if self.loop_flag {
                self.restart();
            } else if self.irq_enabled {
                self.irq_pending = true;
            }
        }
    }

    /// One APU cycle
    pub fn clock_timer(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            return;
        }
        self.timer = self.timer_period;

        if !self.silence {
            if self.shift_register & 1 != 0 {
                if self.output_level <= 125 {
                    self.output_level += 2;
                }
            } else if self.output_level >= 2 {
                self.output_level -= 2;
            }
            self.shift_register >>= 1;
        }

        self.bits_remaining -= 1;
        if self.bits_remaining == 0 {
            self.bits_remaining = 8;
            if self.buffer_empty {
                self.silence = true;
            } else {
                self.silence = false;
                self.shift_register = self.sample_buffer;
                self.buffer_empty = true;
            }
        }
    }

    /// Current 7-bit output level
    pub fn output(&self) -> u8 {
        self.output_level
    }

    pub fn is_active(&self) -> bool {
        self.bytes_remaining > 0
    }

    pub fn bytes_remaining(&self) -> u16 {
        self.bytes_remaining
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }
}

impl Default for Dmc {
    fn default() -> Self {
        Self::new()
    }
}
