// Load and store instructions

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// LDA - Load Accumulator
    ///
    /// Flags affected: Z, N
    pub fn lda(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.a = value;
        self.update_zero_and_negative_flags(value);
    }

    /// LDX - Load X Register
    ///
    /// Flags affected: Z, N
    pub fn ldx(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.x = value;
        self.update_zero_and_negative_flags(value);
    }

    /// LDY - Load Y Register
    ///
    /// Flags affected: Z, N
    pub fn ldy(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.y = value;
        self.update_zero_and_negative_flags(value);
    }

    /// STA - Store Accumulator
    ///
    /// Flags affected: none
    pub fn sta(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.a);
    }

    /// STX - Store X Register
    pub fn stx(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.x);
    }

    /// STY - Store Y Register
    pub fn sty(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lda_sets_flags() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();

        cpu.lda(&mut bus, &AddressingResult::immediate(0x42));
        assert_eq!(cpu.a, 0x42);
        assert!(!cpu.get_zero());
        assert!(!cpu.get_negative());

        cpu.lda(&mut bus, &AddressingResult::immediate(0x00));
        assert!(cpu.get_zero());

        cpu.lda(&mut bus, &AddressingResult::immediate(0x80));
        assert!(cpu.get_negative());
    }

    #[test]
    fn test_lda_from_memory() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        bus.write(0x0010, 0x55);

        cpu.lda(&mut bus, &AddressingResult::new(0x0010));
        assert_eq!(cpu.a, 0x55);
    }

    #[test]
    fn test_ldx_ldy() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();

        cpu.ldx(&mut bus, &AddressingResult::immediate(0x11));
        cpu.ldy(&mut bus, &AddressingResult::immediate(0x22));
        assert_eq!(cpu.x, 0x11);
        assert_eq!(cpu.y, 0x22);
    }

    #[test]
    fn test_stores_do_not_touch_flags() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0x00;
        let status = cpu.status;

        cpu.sta(&mut bus, &AddressingResult::new(0x0200));
        assert_eq!(bus.peek(0x0200), 0x00);
        assert_eq!(cpu.status, status, "STA leaves flags alone");
    }

    #[test]
    fn test_stx_sty() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.x = 0xAB;
        cpu.y = 0xCD;

        cpu.stx(&mut bus, &AddressingResult::new(0x0020));
        cpu.sty(&mut bus, &AddressingResult::new(0x0021));
        assert_eq!(bus.peek(0x0020), 0xAB);
        assert_eq!(bus.peek(0x0021), 0xCD);
    }
}
