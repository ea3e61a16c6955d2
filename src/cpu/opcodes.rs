// Opcode decoding table for the 6502
//
// A single 256-entry table dispatched by the raw opcode byte. The table
// covers the full legal set plus the documented unofficial compositions
// (SLO, RLA, SRE, RRA, DCP, ISB, LAX, SAX, ANC, ALR, ARR, SBX, SHX, SHY)
// and the unofficial NOP variants. The remaining undocumented encodings
// (the KIL group and the unstable A-involved stores) are marked illegal
// and halt the emulated session.
//
// Cycle counts are base values; page-cross and taken-branch penalties are
// applied at execution time.

use super::addressing::AddressingMode;
use AddressingMode::*;

/// Static description of one opcode
pub struct OpcodeInfo {
    /// Mnemonic for disassembly and traces
    pub mnemonic: &'static str,
    /// Addressing mode
    pub mode: AddressingMode,
    /// Instruction length in bytes (opcode + operands)
    pub bytes: u8,
    /// Base cycle count
    pub cycles: u8,
    /// Reads pay one extra cycle when indexing crosses a page
    pub page_cycle: bool,
    /// False for encodings that halt the session
    pub legal: bool,
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    bytes: u8,
    cycles: u8,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        bytes,
        cycles,
        page_cycle: false,
        legal: true,
    }
}

/// Variant paying the page-cross penalty
const fn op_pc(
    mnemonic: &'static str,
    mode: AddressingMode,
    bytes: u8,
    cycles: u8,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        bytes,
        cycles,
        page_cycle: true,
        legal: true,
    }
}

const fn jam() -> OpcodeInfo {
    OpcodeInfo {
        mnemonic: "JAM",
        mode: Implied,
        bytes: 1,
        cycles: 0,
        page_cycle: false,
        legal: false,
    }
}

/// The full 6502 decode table, indexed by opcode byte
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00
    op("BRK", Implied, 1, 7),
    op("ORA", IndexedIndirect, 2, 6),
    jam(),
    op("SLO", IndexedIndirect, 2, 8),
    op("NOP", ZeroPage, 2, 3),
    op("ORA", ZeroPage, 2, 3),
    op("ASL", ZeroPage, 2, 5),
    op("SLO", ZeroPage, 2, 5),
    op("PHP", Implied, 1, 3),
    op("ORA", Immediate, 2, 2),
    op("ASL", Accumulator, 1, 2),
    op("ANC", Immediate, 2, 2),
    op("NOP", Absolute, 3, 4),
    op("ORA", Absolute, 3, 4),
    op("ASL", Absolute, 3, 6),
    op("SLO", Absolute, 3, 6),
    // 0x10
    op("BPL", Relative, 2, 2),
    op_pc("ORA", IndirectIndexed, 2, 5),
    jam(),
    op("SLO", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("ORA", ZeroPageX, 2, 4),
    op("ASL", ZeroPageX, 2, 6),
    op("SLO", ZeroPageX, 2, 6),
    op("CLC", Implied, 1, 2),
    op_pc("ORA", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("SLO", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("ORA", AbsoluteX, 3, 4),
    op("ASL", AbsoluteX, 3, 7),
    op("SLO", AbsoluteX, 3, 7),
    // 0x20
    op("JSR", Absolute, 3, 6),
    op("AND", IndexedIndirect, 2, 6),
    jam(),
    op("RLA", IndexedIndirect, 2, 8),
    op("BIT", ZeroPage, 2, 3),
    op("AND", ZeroPage, 2, 3),
    op("ROL", ZeroPage, 2, 5),
    op("RLA", ZeroPage, 2, 5),
    op("PLP", Implied, 1, 4),
    op("AND", Immediate, 2, 2),
    op("ROL", Accumulator, 1, 2),
    op("ANC", Immediate, 2, 2),
    op("BIT", Absolute, 3, 4),
    op("AND", Absolute, 3, 4),
    op("ROL", Absolute, 3, 6),
    op("RLA", Absolute, 3, 6),
    // 0x30
    op("BMI", Relative, 2, 2),
    op_pc("AND", IndirectIndexed, 2, 5),
    jam(),
    op("RLA", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("AND", ZeroPageX, 2, 4),
    op("ROL", ZeroPageX, 2, 6),
    op("RLA", ZeroPageX, 2, 6),
    op("SEC", Implied, 1, 2),
    op_pc("AND", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("RLA", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("AND", AbsoluteX, 3, 4),
    op("ROL", AbsoluteX, 3, 7),
    op("RLA", AbsoluteX, 3, 7),
    // 0x40
    op("RTI", Implied, 1, 6),
    op("EOR", IndexedIndirect, 2, 6),
    jam(),
    op("SRE", IndexedIndirect, 2, 8),
    op("NOP", ZeroPage, 2, 3),
    op("EOR", ZeroPage, 2, 3),
    op("LSR", ZeroPage, 2, 5),
    op("SRE", ZeroPage, 2, 5),
    op("PHA", Implied, 1, 3),
    op("EOR", Immediate, 2, 2),
    op("LSR", Accumulator, 1, 2),
    op("ALR", Immediate, 2, 2),
    op("JMP", Absolute, 3, 3),
    op("EOR", Absolute, 3, 4),
    op("LSR", Absolute, 3, 6),
    op("SRE", Absolute, 3, 6),
    // 0x50
    op("BVC", Relative, 2, 2),
    op_pc("EOR", IndirectIndexed, 2, 5),
    jam(),
    op("SRE", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("EOR", ZeroPageX, 2, 4),
    op("LSR", ZeroPageX, 2, 6),
    op("SRE", ZeroPageX, 2, 6),
    op("CLI", Implied, 1, 2),
    op_pc("EOR", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("SRE", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("EOR", AbsoluteX, 3, 4),
    op("LSR", AbsoluteX, 3, 7),
    op("SRE", AbsoluteX, 3, 7),
    // 0x60
    op("RTS", Implied, 1, 6),
    op("ADC", IndexedIndirect, 2, 6),
    jam(),
    op("RRA", IndexedIndirect, 2, 8),
    op("NOP", ZeroPage, 2, 3),
    op("ADC", ZeroPage, 2, 3),
    op("ROR", ZeroPage, 2, 5),
    op("RRA", ZeroPage, 2, 5),
    op("PLA", Implied, 1, 4),
    op("ADC", Immediate, 2, 2),
    op("ROR", Accumulator, 1, 2),
    op("ARR", Immediate, 2, 2),
    op("JMP", Indirect, 3, 5),
    op("ADC", Absolute, 3, 4),
    op("ROR", Absolute, 3, 6),
    op("RRA", Absolute, 3, 6),
    // 0x70
    op("BVS", Relative, 2, 2),
    op_pc("ADC", IndirectIndexed, 2, 5),
    jam(),
    op("RRA", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("ADC", ZeroPageX, 2, 4),
    op("ROR", ZeroPageX, 2, 6),
    op("RRA", ZeroPageX, 2, 6),
    op("SEI", Implied, 1, 2),
    op_pc("ADC", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("RRA", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("ADC", AbsoluteX, 3, 4),
    op("ROR", AbsoluteX, 3, 7),
    op("RRA", AbsoluteX, 3, 7),
    // 0x80
    op("NOP", Immediate, 2, 2),
    op("STA", IndexedIndirect, 2, 6),
    op("NOP", Immediate, 2, 2),
    op("SAX", IndexedIndirect, 2, 6),
    op("STY", ZeroPage, 2, 3),
    op("STA", ZeroPage, 2, 3),
    op("STX", ZeroPage, 2, 3),
    op("SAX", ZeroPage, 2, 3),
    op("DEY", Implied, 1, 2),
    op("NOP", Immediate, 2, 2),
    op("TXA", Implied, 1, 2),
    jam(), // XAA: unstable
    op("STY", Absolute, 3, 4),
    op("STA", Absolute, 3, 4),
    op("STX", Absolute, 3, 4),
    op("SAX", Absolute, 3, 4),
    // 0x90
    op("BCC", Relative, 2, 2),
    op("STA", IndirectIndexed, 2, 6),
    jam(),
    jam(), // AHX (zp),Y: unstable
    op("STY", ZeroPageX, 2, 4),
    op("STA", ZeroPageX, 2, 4),
    op("STX", ZeroPageY, 2, 4),
    op("SAX", ZeroPageY, 2, 4),
    op("TYA", Implied, 1, 2),
    op("STA", AbsoluteY, 3, 5),
    op("TXS", Implied, 1, 2),
    jam(), // TAS: unstable
    op("SHY", AbsoluteX, 3, 5),
    op("STA", AbsoluteX, 3, 5),
    op("SHX", AbsoluteY, 3, 5),
    jam(), // AHX abs,Y: unstable
    // 0xA0
    op("LDY", Immediate, 2, 2),
    op("LDA", IndexedIndirect, 2, 6),
    op("LDX", Immediate, 2, 2),
    op("LAX", IndexedIndirect, 2, 6),
    op("LDY", ZeroPage, 2, 3),
    op("LDA", ZeroPage, 2, 3),
    op("LDX", ZeroPage, 2, 3),
    op("LAX", ZeroPage, 2, 3),
    op("TAY", Implied, 1, 2),
    op("LDA", Immediate, 2, 2),
    op("TAX", Implied, 1, 2),
    jam(), // LAX #imm: unstable
    op("LDY", Absolute, 3, 4),
    op("LDA", Absolute, 3, 4),
    op("LDX", Absolute, 3, 4),
    op("LAX", Absolute, 3, 4),
    // 0xB0
    op("BCS", Relative, 2, 2),
    op_pc("LDA", IndirectIndexed, 2, 5),
    jam(),
    op_pc("LAX", IndirectIndexed, 2, 5),
    op("LDY", ZeroPageX, 2, 4),
    op("LDA", ZeroPageX, 2, 4),
    op("LDX", ZeroPageY, 2, 4),
    op("LAX", ZeroPageY, 2, 4),
    op("CLV", Implied, 1, 2),
    op_pc("LDA", AbsoluteY, 3, 4),
    op("TSX", Implied, 1, 2),
    jam(), // LAS: unstable
    op_pc("LDY", AbsoluteX, 3, 4),
    op_pc("LDA", AbsoluteX, 3, 4),
    op_pc("LDX", AbsoluteY, 3, 4),
    op_pc("LAX", AbsoluteY, 3, 4),
    // 0xC0
    op("CPY", Immediate, 2, 2),
    op("CMP", IndexedIndirect, 2, 6),
    op("NOP", Immediate, 2, 2),
    op("DCP", IndexedIndirect, 2, 8),
    op("CPY", ZeroPage, 2, 3),
    op("CMP", ZeroPage, 2, 3),
    op("DEC", ZeroPage, 2, 5),
    op("DCP", ZeroPage, 2, 5),
    op("INY", Implied, 1, 2),
    op("CMP", Immediate, 2, 2),
    op("DEX", Implied, 1, 2),
    op("SBX", Immediate, 2, 2),
    op("CPY", Absolute, 3, 4),
    op("CMP", Absolute, 3, 4),
    op("DEC", Absolute, 3, 6),
    op("DCP", Absolute, 3, 6),
    // 0xD0
    op("BNE", Relative, 2, 2),
    op_pc("CMP", IndirectIndexed, 2, 5),
    jam(),
    op("DCP", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("CMP", ZeroPageX, 2, 4),
    op("DEC", ZeroPageX, 2, 6),
    op("DCP", ZeroPageX, 2, 6),
    op("CLD", Implied, 1, 2),
    op_pc("CMP", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("DCP", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("CMP", AbsoluteX, 3, 4),
    op("DEC", AbsoluteX, 3, 7),
    op("DCP", AbsoluteX, 3, 7),
    // 0xE0
    op("CPX", Immediate, 2, 2),
    op("SBC", IndexedIndirect, 2, 6),
    op("NOP", Immediate, 2, 2),
    op("ISB", IndexedIndirect, 2, 8),
    op("CPX", ZeroPage, 2, 3),
    op("SBC", ZeroPage, 2, 3),
    op("INC", ZeroPage, 2, 5),
    op("ISB", ZeroPage, 2, 5),
    op("INX", Implied, 1, 2),
    op("SBC", Immediate, 2, 2),
    op("NOP", Implied, 1, 2),
    op("SBC", Immediate, 2, 2), // unofficial $EB
    op("CPX", Absolute, 3, 4),
    op("SBC", Absolute, 3, 4),
    op("INC", Absolute, 3, 6),
    op("ISB", Absolute, 3, 6),
    // 0xF0
    op("BEQ", Relative, 2, 2),
    op_pc("SBC", IndirectIndexed, 2, 5),
    jam(),
    op("ISB", IndirectIndexed, 2, 8),
    op("NOP", ZeroPageX, 2, 4),
    op("SBC", ZeroPageX, 2, 4),
    op("INC", ZeroPageX, 2, 6),
    op("ISB", ZeroPageX, 2, 6),
    op("SED", Implied, 1, 2),
    op_pc("SBC", AbsoluteY, 3, 4),
    op("NOP", Implied, 1, 2),
    op("ISB", AbsoluteY, 3, 7),
    op_pc("NOP", AbsoluteX, 3, 4),
    op_pc("SBC", AbsoluteX, 3, 4),
    op("INC", AbsoluteX, 3, 7),
    op("ISB", AbsoluteX, 3, 7),
];
