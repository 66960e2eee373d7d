use crate::error::{Chip8Error, Result};

/// Field accessors over a raw 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// top nibble; picks the instruction class
    pub fn class(self) -> u8 {
        (self.0 >> 12) as u8
    }
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0x0f) as u8
    }
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0x0f) as u8
    }
    pub fn n(self) -> u8 {
        (self.0 & 0x0f) as u8
    }
    pub fn nn(self) -> u8 {
        (self.0 & 0xff) as u8
    }
    pub fn nnn(self) -> u16 {
        self.0 & 0x0fff
    }
}

/// One decoded CHIP-8 instruction. Register operands are indices 0..=0xf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn
    LoadImm { x: u8, nn: u8 },
    /// 7xnn
    AddImm { x: u8, nn: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    SubReg { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubRegReversed { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex(u16),
    /// Bnnn
    JumpOffset(u16),
    /// Cxnn
    Random { x: u8, nn: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyReleased { x: u8 },
    /// Fx07
    ReadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    FontGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegs { x: u8 },
    /// Fx65
    LoadRegs { x: u8 },
}

impl Instruction {
    /// Pure decode; no machine state is looked at.
    pub fn decode(word: u16) -> Result<Instruction> {
        use Instruction::*;

        let op = Opcode(word);
        let (x, y) = (op.x(), op.y());
        let unknown = Err(Chip8Error::UnknownOpcode {
            class: op.class(),
            opcode: word,
        });

        let i = match op.class() {
            0x0 => match op.nn() {
                0xe0 => ClearScreen,
                0xee => Return,
                _ => return unknown,
            },
            0x1 => Jump(op.nnn()),
            0x2 => Call(op.nnn()),
            0x3 => SkipEqImm { x, nn: op.nn() },
            0x4 => SkipNeImm { x, nn: op.nn() },
            0x5 => SkipEqReg { x, y },
            0x6 => LoadImm { x, nn: op.nn() },
            0x7 => AddImm { x, nn: op.nn() },
            0x8 => match op.n() {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => SubReg { x, y },
                0x6 => ShiftRight { x },
                0x7 => SubRegReversed { x, y },
                0xe => ShiftLeft { x },
                _ => return unknown,
            },
            0x9 => SkipNeReg { x, y },
            0xa => LoadIndex(op.nnn()),
            0xb => JumpOffset(op.nnn()),
            0xc => Random { x, nn: op.nn() },
            0xd => Draw { x, y, n: op.n() },
            0xe => match op.nn() {
                0x9e => SkipKeyPressed { x },
                0xa1 => SkipKeyReleased { x },
                _ => return unknown,
            },
            0xf => match op.nn() {
                0x07 => ReadDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddIndex { x },
                0x29 => FontGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => return unknown,
            },
            _ => unreachable!("a nibble is at most 0xf"),
        };
        Ok(i)
    }
}
