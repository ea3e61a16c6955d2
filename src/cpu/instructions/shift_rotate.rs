// Shift and rotate instructions
//
// Each comes in an accumulator form and memory forms; the `accumulator`
// flag selects the target.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    fn shift_target(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) -> u8 {
        if accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        }
    }

    fn shift_store(
        &mut self,
        bus: &mut Bus,
        addr_result: &AddressingResult,
        accumulator: bool,
        value: u8,
    ) {
        if accumulator {
            self.a = value;
        } else {
            bus.write(addr_result.address, value);
        }
        self.update_zero_and_negative_flags(value);
    }

    /// ASL - Arithmetic Shift Left
    ///
    /// Bit 7 moves into carry; bit 0 becomes 0.
    pub fn asl(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let value = self.shift_target(bus, addr_result, accumulator);
        self.set_carry(value & 0x80 != 0);
        self.shift_store(bus, addr_result, accumulator, value << 1);
    }

    /// LSR - Logical Shift Right
    ///
    /// Bit 0 moves into carry; bit 7 becomes 0.
    pub fn lsr(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let value = self.shift_target(bus, addr_result, accumulator);
        self.set_carry(value & 0x01 != 0);
        self.shift_store(bus, addr_result, accumulator, value >> 1);
    }

    /// ROL - Rotate Left through carry
    pub fn rol(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let value = self.shift_target(bus, addr_result, accumulator);
        let carry_in = u8::from(self.get_carry());
        self.set_carry(value & 0x80 != 0);
        self.shift_store(bus, addr_result, accumulator, (value << 1) | carry_in);
    }

    /// ROR - Rotate Right through carry
    pub fn ror(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let value = self.shift_target(bus, addr_result, accumulator);
        let carry_in = u8::from(self.get_carry()) << 7;
        self.set_carry(value & 0x01 != 0);
        self.shift_store(bus, addr_result, accumulator, (value >> 1) | carry_in);
    }
}
