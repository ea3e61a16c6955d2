// CPU execution and trace logging
//
// `step` runs one instruction (or one interrupt entry) and guarantees the
// rest of the system advances by exactly the instruction's cycle count:
// bus accesses tick inline, and any cycles not covered by an access are
// padded with bare ticks afterwards. OAM DMA blows past the budget on
// purpose; its ticks all happen inline and the total is reported back.

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, AddressingResult};
use crate::cpu::opcodes::OPCODE_TABLE;
use crate::cpu::{Cpu, CpuHalt, INTERRUPT_CYCLES};

impl Cpu {
    /// Execute one instruction
    ///
    /// Interrupt lines are sampled first: NMI wins over IRQ, and IRQ is
    /// gated by the I flag. Each entry consumes 7 cycles.
    ///
    /// # Returns
    ///
    /// The number of cycles consumed, including DMA steals, or `CpuHalt`
    /// when an unsupported opcode is fetched.
    pub fn step(&mut self, bus: &mut Bus) -> Result<u32, CpuHalt> {
        // DMC fetches park stall cycles on the bus; burn them before the
        // next instruction so the PPU/APU keep moving underneath
        let stall = bus.take_stall();
        if stall > 0 {
            for _ in 0..stall {
                bus.tick();
            }
            self.cycles = self.cycles.wrapping_add(stall as u64);
        }

        let start_cycles = bus.cycle_count();

        if bus.poll_nmi() {
            self.nmi(bus);
            return Ok(stall + self.finish_cycles(bus, start_cycles, INTERRUPT_CYCLES));
        }
        if bus.irq_line() && !self.get_interrupt_disable() {
            self.irq(bus);
            return Ok(stall + self.finish_cycles(bus, start_cycles, INTERRUPT_CYCLES));
        }

        let opcode_pc = self.pc;
        let opcode = bus.read(self.pc);
        let info = &OPCODE_TABLE[opcode as usize];
        if !info.legal {
            return Err(CpuHalt {
                pc: opcode_pc,
                opcode,
            });
        }
        self.pc = self.pc.wrapping_add(1);

        let addr_result = match info.mode {
            AddressingMode::Implied => self.addr_implied(),
            AddressingMode::Accumulator => self.addr_accumulator(),
            AddressingMode::Immediate => self.addr_immediate(bus),
            AddressingMode::ZeroPage => self.addr_zero_page(bus),
            AddressingMode::ZeroPageX => self.addr_zero_page_x(bus),
            AddressingMode::ZeroPageY => self.addr_zero_page_y(bus),
            AddressingMode::Relative => self.addr_relative(bus),
            AddressingMode::Absolute => self.addr_absolute(bus),
            AddressingMode::AbsoluteX => self.addr_absolute_x(bus),
            AddressingMode::AbsoluteY => self.addr_absolute_y(bus),
            AddressingMode::Indirect => self.addr_indirect(bus),
            AddressingMode::IndexedIndirect => self.addr_indexed_indirect(bus),
            AddressingMode::IndirectIndexed => self.addr_indirect_indexed(bus),
        };

        let extra = self.execute_instruction(opcode, info.mode, &addr_result, bus);

        let mut cycles = info.cycles as u32;
        if info.page_cycle && addr_result.page_crossed && info.mode != AddressingMode::Relative {
            cycles += 1;
        }
        cycles += extra as u32;

        Ok(stall + self.finish_cycles(bus, start_cycles, cycles))
    }

    /// Pad uncovered cycles with bare ticks and update the cycle counter
    ///
    /// `budget` is the instruction's architectural cycle count; if the bus
    /// already ticked more (OAM DMA), the larger number stands.
    fn finish_cycles(&mut self, bus: &mut Bus, start: u64, budget: u32) -> u32 {
        let used = (bus.cycle_count().wrapping_sub(start)) as u32;
        for _ in used..budget {
            bus.tick();
        }
        let total = budget.max(used);
        self.cycles = self.cycles.wrapping_add(total as u64);
        total
    }

    /// Dispatch one decoded opcode
    ///
    /// Returns extra cycles (taken branches only).
    #[allow(clippy::too_many_lines)]
    fn execute_instruction(
        &mut self,
        opcode: u8,
        mode: AddressingMode,
        addr_result: &AddressingResult,
        bus: &mut Bus,
    ) -> u8 {
        match opcode {
            // Load/Store
            0xA9 | 0xA5 | 0xB5 | 0xAD | 0xBD | 0xB9 | 0xA1 | 0xB1 => self.lda(bus, addr_result),
            0xA2 | 0xA6 | 0xB6 | 0xAE | 0xBE => self.ldx(bus, addr_result),
            0xA0 | 0xA4 | 0xB4 | 0xAC | 0xBC => self.ldy(bus, addr_result),
            0x85 | 0x95 | 0x8D | 0x9D | 0x99 | 0x81 | 0x91 => self.sta(bus, addr_result),
            0x86 | 0x96 | 0x8E => self.stx(bus, addr_result),
            0x84 | 0x94 | 0x8C => self.sty(bus, addr_result),

            // Arithmetic
            0x69 | 0x65 | 0x75 | 0x6D | 0x7D | 0x79 | 0x61 | 0x71 => self.adc(bus, addr_result),
            0xE9 | 0xEB | 0xE5 | 0xF5 | 0xED | 0xFD | 0xF9 | 0xE1 | 0xF1 => {
                self.sbc(bus, addr_result)
            }
            0xE6 | 0xF6 | 0xEE | 0xFE => self.inc(bus, addr_result),
            0xE8 => self.inx(),
            0xC8 => self.iny(),
            0xC6 | 0xD6 | 0xCE | 0xDE => self.dec(bus, addr_result),
            0xCA => self.dex(),
            0x88 => self.dey(),

            // Logic
            0x29 | 0x25 | 0x35 | 0x2D | 0x3D | 0x39 | 0x21 | 0x31 => self.and(bus, addr_result),
            0x09 | 0x05 | 0x15 | 0x0D | 0x1D | 0x19 | 0x01 | 0x11 => self.ora(bus, addr_result),
            0x49 | 0x45 | 0x55 | 0x4D | 0x5D | 0x59 | 0x41 | 0x51 => self.eor(bus, addr_result),
            0x24 | 0x2C => self.bit(bus, addr_result),

            // Shift/Rotate
            0x0A => self.asl(bus, addr_result, true),
            0x06 | 0x16 | 0x0E | 0x1E => self.asl(bus, addr_result, false),
            0x4A => self.lsr(bus, addr_result, true),
            0x46 | 0x56 | 0x4E | 0x5E => self.lsr(bus, addr_result, false),
            0x2A => self.rol(bus, addr_result, true),
            0x26 | 0x36 | 0x2E | 0x3E => self.rol(bus, addr_result, false),
            0x6A => self.ror(bus, addr_result, true),
            0x66 | 0x76 | 0x6E | 0x7E => self.ror(bus, addr_result, false),

            // Compare
            0xC9 | 0xC5 | 0xD5 | 0xCD | 0xDD | 0xD9 | 0xC1 | 0xD1 => self.cmp(bus, addr_result),
            0xE0 | 0xE4 | 0xEC => self.cpx(bus, addr_result),
            0xC0 | 0xC4 | 0xCC => self.cpy(bus, addr_result),

            // Branches (return extra cycles)
            0x90 => return self.bcc(addr_result),
            0xB0 => return self.bcs(addr_result),
            0xF0 => return self.beq(addr_result),
            0x30 => return self.bmi(addr_result),
            0xD0 => return self.bne(addr_result),
            0x10 => return self.bpl(addr_result),
            0x50 => return self.bvc(addr_result),
            0x70 => return self.bvs(addr_result),

            // Jump/Subroutine
            0x4C | 0x6C => self.jmp(addr_result),
            0x20 => self.jsr(bus, addr_result),
            0x60 => self.rts(bus),

            // Stack
            0x48 => self.pha(bus),
            0x68 => self.pla(bus),
            0x08 => self.php(bus),
            0x28 => self.plp(bus),
            0x9A => self.txs(),
            0xBA => self.tsx(),

            // Transfers
            0xAA => self.tax(),
            0xA8 => self.tay(),
            0x8A => self.txa(),
            0x98 => self.tya(),

            // Flags
            0x18 => self.clc(),
            0x38 => self.sec(),
            0x58 => self.cli(),
            0x78 => self.sei(),
            0xB8 => self.clv(),
            0xD8 => self.cld(),
            0xF8 => self.sed(),

            // Miscellaneous
            0x00 => self.brk(bus),
            0x40 => self.rti(bus),
            0xEA | 0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA | 0x80 | 0x82 | 0x89 | 0xC2 | 0xE2
            | 0x04 | 0x44 | 0x64 | 0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 | 0x0C | 0x1C | 0x3C
            | 0x5C | 0x7C | 0xDC | 0xFC => self.nop(bus, mode, addr_result),

            // Unofficial compositions
            0x07 | 0x17 | 0x0F | 0x1F | 0x1B | 0x03 | 0x13 => self.slo(bus, addr_result),
            0x27 | 0x37 | 0x2F | 0x3F | 0x3B | 0x23 | 0x33 => self.rla(bus, addr_result),
            0x47 | 0x57 | 0x4F | 0x5F | 0x5B | 0x43 | 0x53 => self.sre(bus, addr_result),
            0x67 | 0x77 | 0x6F | 0x7F | 0x7B | 0x63 | 0x73 => self.rra(bus, addr_result),
            0xC7 | 0xD7 | 0xCF | 0xDF | 0xDB | 0xC3 | 0xD3 => self.dcp(bus, addr_result),
            0xE7 | 0xF7 | 0xEF | 0xFF | 0xFB | 0xE3 | 0xF3 => self.isb(bus, addr_result),
            0xA7 | 0xB7 | 0xAF | 0xBF | 0xA3 | 0xB3 => self.lax(bus, addr_result),
            0x87 | 0x97 | 0x8F | 0x83 => self.sax(bus, addr_result),
            0x0B | 0x2B => self.anc(bus, addr_result),
            0x4B => self.alr(bus, addr_result),
            0x6B => self.arr(bus, addr_result),
            0xCB => self.sbx(bus, addr_result),
            0x9E => self.shx(bus, addr_result),
            0x9C => self.shy(bus, addr_result),

            // Illegal encodings never reach dispatch; step() halts first
            _ => {}
        }
        0
    }

    /// Generate a nestest-format trace line for the instruction at PC
    ///
    /// Format: `PC  OP OP OP  MNEMONIC OPERAND  A:.. X:.. Y:.. P:.. SP:.. CYC:..`
    /// Reads go through `Bus::peek` so tracing never perturbs the machine.
    pub fn trace(&self, bus: &Bus) -> String {
        let pc = self.pc;
        let opcode = bus.peek(pc);
        let info = &OPCODE_TABLE[opcode as usize];

        let byte1 = opcode;
        let byte2 = bus.peek(pc.wrapping_add(1));
        let byte3 = bus.peek(pc.wrapping_add(2));

        let hex_bytes = match info.bytes {
            2 => format!("{:02X} {:02X}   ", byte1, byte2),
            3 => format!("{:02X} {:02X} {:02X}", byte1, byte2, byte3),
            _ => format!("{:02X}      ", byte1),
        };

        let disassembly = self.disassemble(pc, bus, opcode, byte2, byte3);

        format!(
            "{:04X}  {}  {:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            pc, hex_bytes, disassembly, self.a, self.x, self.y, self.status, self.sp, self.cycles
        )
    }

    /// Disassemble one instruction into human-readable form
    fn disassemble(&self, pc: u16, bus: &Bus, opcode: u8, byte2: u8, byte3: u8) -> String {
        let info = &OPCODE_TABLE[opcode as usize];
        let mnemonic = info.mnemonic;
        let abs = ((byte3 as u16) << 8) | byte2 as u16;

        match info.mode {
            AddressingMode::Implied => mnemonic.to_string(),
            AddressingMode::Accumulator => format!("{} A", mnemonic),
            AddressingMode::Immediate => format!("{} #${:02X}", mnemonic, byte2),
            AddressingMode::ZeroPage => {
                format!("{} ${:02X} = {:02X}", mnemonic, byte2, bus.peek(byte2 as u16))
            }
            AddressingMode::ZeroPageX => {
                let addr = byte2.wrapping_add(self.x);
                format!(
                    "{} ${:02X},X @ {:02X} = {:02X}",
                    mnemonic,
                    byte2,
                    addr,
                    bus.peek(addr as u16)
                )
            }
            AddressingMode::ZeroPageY => {
                let addr = byte2.wrapping_add(self.y);
                format!(
                    "{} ${:02X},Y @ {:02X} = {:02X}",
                    mnemonic,
                    byte2,
                    addr,
                    bus.peek(addr as u16)
                )
            }
            AddressingMode::Relative => {
                let target = pc.wrapping_add(2).wrapping_add(byte2 as i8 as u16);
                format!("{} ${:04X}", mnemonic, target)
            }
            AddressingMode::Absolute => {
                if mnemonic == "JMP" || mnemonic == "JSR" {
                    format!("{} ${:04X}", mnemonic, abs)
                } else {
                    format!("{} ${:04X} = {:02X}", mnemonic, abs, bus.peek(abs))
                }
            }
            AddressingMode::AbsoluteX => {
                let addr = abs.wrapping_add(self.x as u16);
                format!(
                    "{} ${:04X},X @ {:04X} = {:02X}",
                    mnemonic,
                    abs,
                    addr,
                    bus.peek(addr)
                )
            }
            AddressingMode::AbsoluteY => {
                let addr = abs.wrapping_add(self.y as u16);
                format!(
                    "{} ${:04X},Y @ {:04X} = {:02X}",
                    mnemonic,
                    abs,
                    addr,
                    bus.peek(addr)
                )
            }
            AddressingMode::Indirect => {
                let lo = bus.peek(abs) as u16;
                let hi_addr = (abs & 0xFF00) | ((abs as u8).wrapping_add(1) as u16);
                let target = ((bus.peek(hi_addr) as u16) << 8) | lo;
                format!("{} (${:04X}) = {:04X}", mnemonic, abs, target)
            }
            AddressingMode::IndexedIndirect => {
                let ptr = byte2.wrapping_add(self.x);
                let lo = bus.peek(ptr as u16) as u16;
                let hi = bus.peek(ptr.wrapping_add(1) as u16) as u16;
                let addr = (hi << 8) | lo;
                format!(
                    "{} (${:02X},X) @ {:02X} = {:04X} = {:02X}",
                    mnemonic,
                    byte2,
                    ptr,
                    addr,
                    bus.peek(addr)
                )
            }
            AddressingMode::IndirectIndexed => {
                let lo = bus.peek(byte2 as u16) as u16;
                let hi = bus.peek(byte2.wrapping_add(1) as u16) as u16;
                let base = (hi << 8) | lo;
                let addr = base.wrapping_add(self.y as u16);
                format!(
                    "{} (${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                    mnemonic,
                    byte2,
                    base,
                    addr,
                    bus.peek(addr)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a program into RAM at $0200 and point PC at it
    fn setup(program: &[u8]) -> (Cpu, Bus) {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        for (i, byte) in program.iter().enumerate() {
            bus.write(0x0200 + i as u16, *byte);
        }
        cpu.pc = 0x0200;
        (cpu, bus)
    }

    #[test]
    fn test_lda_immediate_program() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x42]);
        let cycles = cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.a, 0x42);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.pc, 0x0202);
    }

    #[test]
    fn test_sta_roundtrip() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x42, 0x85, 0x10]);
        cpu.step(&mut bus).unwrap();
        cpu.step(&mut bus).unwrap();

        assert_eq!(bus.peek(0x0010), 0x42);
    }

    #[test]
    fn test_page_cross_read_pays_cycle() {
        // LDA $02FF,X with X=1 crosses into $0300
        let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0x02]);
        cpu.x = 0x01;
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 5, "4 + 1 for the page cross");

        // Same read without a cross
        let (mut cpu, mut bus) = setup(&[0xBD, 0x00, 0x03]);
        cpu.x = 0x01;
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 4);
    }

    #[test]
    fn test_store_never_pays_cross_cycle() {
        let (mut cpu, mut bus) = setup(&[0x9D, 0xFF, 0x02]);
        cpu.x = 0x01;
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 5, "STA abs,X is always 5");
    }

    #[test]
    fn test_branch_cycle_costs() {
        // BNE taken, no cross: 3 cycles
        let (mut cpu, mut bus) = setup(&[0xD0, 0x10]);
        cpu.set_zero(false);
        assert_eq!(cpu.step(&mut bus).unwrap(), 3);

        // BNE not taken: 2 cycles
        let (mut cpu, mut bus) = setup(&[0xD0, 0x10]);
        cpu.set_zero(true);
        assert_eq!(cpu.step(&mut bus).unwrap(), 2);
    }

    #[test]
    fn test_illegal_opcode_halts() {
        let (mut cpu, mut bus) = setup(&[0x02]);
        let result = cpu.step(&mut bus);

        assert_eq!(
            result,
            Err(CpuHalt {
                pc: 0x0200,
                opcode: 0x02
            })
        );
    }

    #[test]
    fn test_brk_consumes_seven_cycles() {
        // The BRK vector lives in the cartridge window, so this one needs
        // a real mapper behind the bus
        let mut prg_rom = vec![0xEA; 16 * 1024];
        prg_rom[0x3FFE] = 0x00;
        prg_rom[0x3FFF] = 0x03;
        let mut bus = Bus::new();
        bus.insert_cartridge(crate::cartridge::Cartridge {
            prg_rom,
            chr: vec![0; 8 * 1024],
            chr_is_ram: true,
            mapper: 0,
            mirroring: crate::cartridge::Mirroring::Horizontal,
            has_battery: false,
        })
        .unwrap();

        let mut cpu = Cpu::new();
        bus.write(0x0200, 0x00);
        cpu.pc = 0x0200;

        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 7);
        assert_eq!(cpu.pc, 0x0300);
    }

    #[test]
    fn test_trace_format() {
        let (mut cpu, bus) = setup(&[0xA9, 0x42]);
        cpu.cycles = 7;

        let line = cpu.trace(&bus);
        assert!(line.starts_with("0200  A9 42"));
        assert!(line.contains("LDA #$42"));
        assert!(line.contains("A:00 X:00 Y:00 P:24 SP:FD CYC:7"));
    }
}
