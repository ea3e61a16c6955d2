// BRK, RTI, and the NOP family

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, AddressingResult};
use crate::cpu::{flags, vectors, Cpu};

impl Cpu {
    /// BRK - Software interrupt
    ///
    /// Pushes PC+1 (skipping the signature byte after the opcode) and the
    /// status with the break bit set, then vectors through $FFFE. Hardware
    /// interrupts push the same vector with B clear.
    pub fn brk(&mut self, bus: &mut Bus) {
        self.stack_push_u16(bus, self.pc.wrapping_add(1));
        self.stack_push(bus, self.status | flags::BREAK | flags::UNUSED);
        self.set_interrupt_disable(true);

        let lo = bus.read(vectors::IRQ) as u16;
        let hi = bus.read(vectors::IRQ.wrapping_add(1)) as u16;
        self.pc = (hi << 8) | lo;
    }

    /// RTI - Return from Interrupt
    ///
    /// Restores status (break bit ignored, unused forced) and PC.
    pub fn rti(&mut self, bus: &mut Bus) {
        let status = self.stack_pop(bus);
        self.status = (status & !flags::BREAK) | flags::UNUSED;
        self.pc = self.stack_pop_u16(bus);
    }

    /// NOP - No Operation
    ///
    /// The unofficial address-mode variants still perform their dummy
    /// operand read; that read is visible to the rest of the system.
    pub fn nop(&mut self, bus: &mut Bus, mode: AddressingMode, addr_result: &AddressingResult) {
        match mode {
            AddressingMode::Implied | AddressingMode::Immediate => {}
            _ => {
                let _ = bus.read(addr_result.address);
            }
        }
    }
}
