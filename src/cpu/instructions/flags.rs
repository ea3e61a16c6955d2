// Flag manipulation instructions

use crate::cpu::Cpu;

impl Cpu {
    /// CLC - Clear Carry
    pub fn clc(&mut self) {
        self.set_carry(false);
    }

    /// SEC - Set Carry
    pub fn sec(&mut self) {
        self.set_carry(true);
    }

    /// CLI - Clear Interrupt Disable
    pub fn cli(&mut self) {
        self.set_interrupt_disable(false);
    }

    /// SEI - Set Interrupt Disable
    pub fn sei(&mut self) {
        self.set_interrupt_disable(true);
    }

    /// CLV - Clear Overflow
    pub fn clv(&mut self) {
        self.set_overflow(false);
    }

    /// CLD - Clear Decimal (stored only; arithmetic ignores it)
    pub fn cld(&mut self) {
        self.update_flag(crate::cpu::flags::DECIMAL, false);
    }

    /// SED - Set Decimal (stored only; arithmetic ignores it)
    pub fn sed(&mut self) {
        self.update_flag(crate::cpu::flags::DECIMAL, true);
    }
}
