//! The full consensus opcode set (spec.md §4.3, "Opcode & Operation"),
//! superseding the teacher's 27-opcode subset.
//!
//! Byte values and the categorical predicates below (`is_relaxed_push`,
//! `is_push`, `is_payload`, `is_counted`, `is_positive`, `is_version`,
//! `is_numeric`, `is_number`, `is_invalid`, `is_conditional`, `is_reserved`)
//! are grounded in `operation.hpp`'s enum and predicate set, including the
//! historically-accidental inclusion of `reserved_80` in `is_relaxed_push`
//! (consensus-critical for P2SH sigop counting — preserved, not "fixed").

/// A single Bitcoin Script opcode byte.
///
/// `PushBytes(n)` covers the contiguous direct-push range (`0x01..=0x4b`);
/// the payload itself is carried by [`crate::operation::Operation`], not
/// here. Every other opcode is fieldless. `Unassigned(n)` covers bytes this
/// specification has no defined behavior for (`0xba..=0xff`, which includes
/// tapscript-only opcodes such as `OP_CHECKSIGADD` out of scope here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Op0,
    PushBytes(u8),
    PushData1,
    PushData2,
    PushData4,
    Op1Negate,
    Reserved,
    Op1,
    Op2,
    Op3,
    Op4,
    Op5,
    Op6,
    Op7,
    Op8,
    Op9,
    Op10,
    Op11,
    Op12,
    Op13,
    Op14,
    Op15,
    Op16,
    Nop,
    Ver,
    If,
    NotIf,
    VerIf,
    VerNotIf,
    Else,
    EndIf,
    Verify,
    Return,
    ToAltStack,
    FromAltStack,
    Drop2,
    Dup2,
    Dup3,
    Over2,
    Rot2,
    Swap2,
    IfDup,
    Depth,
    Drop,
    Dup,
    Nip,
    Over,
    Pick,
    Roll,
    Rot,
    Swap,
    Tuck,
    Cat,
    Substr,
    Left,
    Right,
    Size,
    Invert,
    And,
    Or,
    Xor,
    Equal,
    EqualVerify,
    Reserved1,
    Reserved2,
    Add1,
    Sub1,
    Mul2,
    Div2,
    Negate,
    Abs,
    Not,
    NotEqual0,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    BoolAnd,
    BoolOr,
    NumEqual,
    NumEqualVerify,
    NumNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Min,
    Max,
    Within,
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
    CodeSeparator,
    CheckSig,
    CheckSigVerify,
    CheckMultisig,
    CheckMultisigVerify,
    Nop1,
    CheckLockTimeVerify,
    CheckSequenceVerify,
    Nop4,
    Nop5,
    Nop6,
    Nop7,
    Nop8,
    Nop9,
    Nop10,
    Unassigned(u8),
}

impl Opcode {
    /// Converts a raw byte to its `Opcode`. Total: every byte value maps to
    /// exactly one `Opcode`, unlike the teacher's partial `Option`-returning
    /// version, since a script byte stream must classify every byte it
    /// contains to be scored for sigops and op-count even when the byte is
    /// disabled, reserved, or unassigned.
    pub fn from_byte(byte: u8) -> Opcode {
        match byte {
            0x00 => Opcode::Op0,
            0x01..=0x4b => Opcode::PushBytes(byte),
            0x4c => Opcode::PushData1,
            0x4d => Opcode::PushData2,
            0x4e => Opcode::PushData4,
            0x4f => Opcode::Op1Negate,
            0x50 => Opcode::Reserved,
            0x51 => Opcode::Op1,
            0x52 => Opcode::Op2,
            0x53 => Opcode::Op3,
            0x54 => Opcode::Op4,
            0x55 => Opcode::Op5,
            0x56 => Opcode::Op6,
            0x57 => Opcode::Op7,
            0x58 => Opcode::Op8,
            0x59 => Opcode::Op9,
            0x5a => Opcode::Op10,
            0x5b => Opcode::Op11,
            0x5c => Opcode::Op12,
            0x5d => Opcode::Op13,
            0x5e => Opcode::Op14,
            0x5f => Opcode::Op15,
            0x60 => Opcode::Op16,
            0x61 => Opcode::Nop,
            0x62 => Opcode::Ver,
            0x63 => Opcode::If,
            0x64 => Opcode::NotIf,
            0x65 => Opcode::VerIf,
            0x66 => Opcode::VerNotIf,
            0x67 => Opcode::Else,
            0x68 => Opcode::EndIf,
            0x69 => Opcode::Verify,
            0x6a => Opcode::Return,
            0x6b => Opcode::ToAltStack,
            0x6c => Opcode::FromAltStack,
            0x6d => Opcode::Drop2,
            0x6e => Opcode::Dup2,
            0x6f => Opcode::Dup3,
            0x70 => Opcode::Over2,
            0x71 => Opcode::Rot2,
            0x72 => Opcode::Swap2,
            0x73 => Opcode::IfDup,
            0x74 => Opcode::Depth,
            0x75 => Opcode::Drop,
            0x76 => Opcode::Dup,
            0x77 => Opcode::Nip,
            0x78 => Opcode::Over,
            0x79 => Opcode::Pick,
            0x7a => Opcode::Roll,
            0x7b => Opcode::Rot,
            0x7c => Opcode::Swap,
            0x7d => Opcode::Tuck,
            0x7e => Opcode::Cat,
            0x7f => Opcode::Substr,
            0x80 => Opcode::Left,
            0x81 => Opcode::Right,
            0x82 => Opcode::Size,
            0x83 => Opcode::Invert,
            0x84 => Opcode::And,
            0x85 => Opcode::Or,
            0x86 => Opcode::Xor,
            0x87 => Opcode::Equal,
            0x88 => Opcode::EqualVerify,
            0x89 => Opcode::Reserved1,
            0x8a => Opcode::Reserved2,
            0x8b => Opcode::Add1,
            0x8c => Opcode::Sub1,
            0x8d => Opcode::Mul2,
            0x8e => Opcode::Div2,
            0x8f => Opcode::Negate,
            0x90 => Opcode::Abs,
            0x91 => Opcode::Not,
            0x92 => Opcode::NotEqual0,
            0x93 => Opcode::Add,
            0x94 => Opcode::Sub,
            0x95 => Opcode::Mul,
            0x96 => Opcode::Div,
            0x97 => Opcode::Mod,
            0x98 => Opcode::LShift,
            0x99 => Opcode::RShift,
            0x9a => Opcode::BoolAnd,
            0x9b => Opcode::BoolOr,
            0x9c => Opcode::NumEqual,
            0x9d => Opcode::NumEqualVerify,
            0x9e => Opcode::NumNotEqual,
            0x9f => Opcode::LessThan,
            0xa0 => Opcode::GreaterThan,
            0xa1 => Opcode::LessThanOrEqual,
            0xa2 => Opcode::GreaterThanOrEqual,
            0xa3 => Opcode::Min,
            0xa4 => Opcode::Max,
            0xa5 => Opcode::Within,
            0xa6 => Opcode::Ripemd160,
            0xa7 => Opcode::Sha1,
            0xa8 => Opcode::Sha256,
            0xa9 => Opcode::Hash160,
            0xaa => Opcode::Hash256,
            0xab => Opcode::CodeSeparator,
            0xac => Opcode::CheckSig,
            0xad => Opcode::CheckSigVerify,
            0xae => Opcode::CheckMultisig,
            0xaf => Opcode::CheckMultisigVerify,
            0xb0 => Opcode::Nop1,
            0xb1 => Opcode::CheckLockTimeVerify,
            0xb2 => Opcode::CheckSequenceVerify,
            0xb3 => Opcode::Nop4,
            0xb4 => Opcode::Nop5,
            0xb5 => Opcode::Nop6,
            0xb6 => Opcode::Nop7,
            0xb7 => Opcode::Nop8,
            0xb8 => Opcode::Nop9,
            0xb9 => Opcode::Nop10,
            other => Opcode::Unassigned(other),
        }
    }

    /// Converts an `Opcode` back to its canonical byte value.
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Op0 => 0x00,
            Opcode::PushBytes(n) => n,
            Opcode::PushData1 => 0x4c,
            Opcode::PushData2 => 0x4d,
            Opcode::PushData4 => 0x4e,
            Opcode::Op1Negate => 0x4f,
            Opcode::Reserved => 0x50,
            Opcode::Op1 => 0x51,
            Opcode::Op2 => 0x52,
            Opcode::Op3 => 0x53,
            Opcode::Op4 => 0x54,
            Opcode::Op5 => 0x55,
            Opcode::Op6 => 0x56,
            Opcode::Op7 => 0x57,
            Opcode::Op8 => 0x58,
            Opcode::Op9 => 0x59,
            Opcode::Op10 => 0x5a,
            Opcode::Op11 => 0x5b,
            Opcode::Op12 => 0x5c,
            Opcode::Op13 => 0x5d,
            Opcode::Op14 => 0x5e,
            Opcode::Op15 => 0x5f,
            Opcode::Op16 => 0x60,
            Opcode::Nop => 0x61,
            Opcode::Ver => 0x62,
            Opcode::If => 0x63,
            Opcode::NotIf => 0x64,
            Opcode::VerIf => 0x65,
            Opcode::VerNotIf => 0x66,
            Opcode::Else => 0x67,
            Opcode::EndIf => 0x68,
            Opcode::Verify => 0x69,
            Opcode::Return => 0x6a,
            Opcode::ToAltStack => 0x6b,
            Opcode::FromAltStack => 0x6c,
            Opcode::Drop2 => 0x6d,
            Opcode::Dup2 => 0x6e,
            Opcode::Dup3 => 0x6f,
            Opcode::Over2 => 0x70,
            Opcode::Rot2 => 0x71,
            Opcode::Swap2 => 0x72,
            Opcode::IfDup => 0x73,
            Opcode::Depth => 0x74,
            Opcode::Drop => 0x75,
            Opcode::Dup => 0x76,
            Opcode::Nip => 0x77,
            Opcode::Over => 0x78,
            Opcode::Pick => 0x79,
            Opcode::Roll => 0x7a,
            Opcode::Rot => 0x7b,
            Opcode::Swap => 0x7c,
            Opcode::Tuck => 0x7d,
            Opcode::Cat => 0x7e,
            Opcode::Substr => 0x7f,
            Opcode::Left => 0x80,
            Opcode::Right => 0x81,
            Opcode::Size => 0x82,
            Opcode::Invert => 0x83,
            Opcode::And => 0x84,
            Opcode::Or => 0x85,
            Opcode::Xor => 0x86,
            Opcode::Equal => 0x87,
            Opcode::EqualVerify => 0x88,
            Opcode::Reserved1 => 0x89,
            Opcode::Reserved2 => 0x8a,
            Opcode::Add1 => 0x8b,
            Opcode::Sub1 => 0x8c,
            Opcode::Mul2 => 0x8d,
            Opcode::Div2 => 0x8e,
            Opcode::Negate => 0x8f,
            Opcode::Abs => 0x90,
            Opcode::Not => 0x91,
            Opcode::NotEqual0 => 0x92,
            Opcode::Add => 0x93,
            Opcode::Sub => 0x94,
            Opcode::Mul => 0x95,
            Opcode::Div => 0x96,
            Opcode::Mod => 0x97,
            Opcode::LShift => 0x98,
            Opcode::RShift => 0x99,
            Opcode::BoolAnd => 0x9a,
            Opcode::BoolOr => 0x9b,
            Opcode::NumEqual => 0x9c,
            Opcode::NumEqualVerify => 0x9d,
            Opcode::NumNotEqual => 0x9e,
            Opcode::LessThan => 0x9f,
            Opcode::GreaterThan => 0xa0,
            Opcode::LessThanOrEqual => 0xa1,
            Opcode::GreaterThanOrEqual => 0xa2,
            Opcode::Min => 0xa3,
            Opcode::Max => 0xa4,
            Opcode::Within => 0xa5,
            Opcode::Ripemd160 => 0xa6,
            Opcode::Sha1 => 0xa7,
            Opcode::Sha256 => 0xa8,
            Opcode::Hash160 => 0xa9,
            Opcode::Hash256 => 0xaa,
            Opcode::CodeSeparator => 0xab,
            Opcode::CheckSig => 0xac,
            Opcode::CheckSigVerify => 0xad,
            Opcode::CheckMultisig => 0xae,
            Opcode::CheckMultisigVerify => 0xaf,
            Opcode::Nop1 => 0xb0,
            Opcode::CheckLockTimeVerify => 0xb1,
            Opcode::CheckSequenceVerify => 0xb2,
            Opcode::Nop4 => 0xb3,
            Opcode::Nop5 => 0xb4,
            Opcode::Nop6 => 0xb5,
            Opcode::Nop7 => 0xb6,
            Opcode::Nop8 => 0xb7,
            Opcode::Nop9 => 0xb8,
            Opcode::Nop10 => 0xb9,
            Opcode::Unassigned(n) => n,
        }
    }

    /// `is_relaxed_push`: bytes `0..=96`, including `reserved_80`. This
    /// over-inclusion is a protocol quirk, not a bug in this crate — P2SH
    /// sigop counting (`script::is_push_only` in spirit) consensus-relies on
    /// treating `reserved_80` as "push-like" even though executing it fails.
    pub fn is_relaxed_push(self) -> bool {
        self.to_byte() <= 0x60
    }

    /// `is_push`: `is_relaxed_push` minus `reserved_80` itself.
    pub fn is_push(self) -> bool {
        let byte = self.to_byte();
        byte <= 0x60 && byte != 0x50
    }

    /// `is_payload`: opcodes whose execution consumes bytes from the script
    /// stream beyond the opcode byte itself (the four push-data forms).
    pub fn is_payload(self) -> bool {
        matches!(self.to_byte(), 0x01..=0x4e)
    }

    /// `is_counted`: opcodes charged against
    /// [`crate::constants::MAX_OPERATION_COUNT`] (everything that isn't a
    /// push).
    pub fn is_counted(self) -> bool {
        self.to_byte() >= 0x61
    }

    /// `is_positive`: `OP_1`..`OP_16`.
    pub fn is_positive(self) -> bool {
        matches!(self.to_byte(), 0x51..=0x60)
    }

    /// `is_version`: `OP_0` or `OP_1`..`OP_16`, the opcodes legal as a
    /// witness program version byte.
    pub fn is_version(self) -> bool {
        self.to_byte() == 0x00 || self.is_positive()
    }

    /// `is_numeric`: `OP_1NEGATE` or `OP_1`..`OP_16`.
    pub fn is_numeric(self) -> bool {
        self.to_byte() == 0x4f || self.is_positive()
    }

    /// `is_number`: `is_numeric` plus `OP_0`.
    pub fn is_number(self) -> bool {
        self.to_byte() == 0x00 || self.is_numeric()
    }

    /// `is_invalid`: opcodes unconditionally disabled. These fail even
    /// inside a conditional branch that did not execute, unlike `Reserved`
    /// opcodes.
    pub fn is_invalid(self) -> bool {
        matches!(
            self.to_byte(),
            0x65 | 0x66 | 0x7e | 0x7f | 0x80 | 0x81 | 0x83 | 0x84 | 0x85 | 0x86 | 0x8d | 0x8e
                | 0x95 | 0x96 | 0x97 | 0x98 | 0x99
        )
    }

    /// `is_conditional`: `if`/`notif`/`else`/`endif`, the opcodes the
    /// machine's conditional-scope stack tracks directly.
    pub fn is_conditional(self) -> bool {
        matches!(self.to_byte(), 0x63 | 0x64 | 0x67 | 0x68)
    }

    /// `is_reserved`: opcodes that fail if executed but, unlike
    /// `is_invalid`, are skippable inside a false conditional branch.
    /// Includes any byte past `OP_NOP10`, which this specification defines
    /// no behavior for.
    pub fn is_reserved(self) -> bool {
        matches!(self.to_byte(), 0x50 | 0x62 | 0x6a | 0x89 | 0x8a) || self.to_byte() > 0xb9
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            Opcode::Op0 => "OP_0".to_string(),
            Opcode::PushBytes(n) => return write!(f, "OP_PUSHBYTES_{n}"),
            Opcode::PushData1 => "OP_PUSHDATA1".to_string(),
            Opcode::PushData2 => "OP_PUSHDATA2".to_string(),
            Opcode::PushData4 => "OP_PUSHDATA4".to_string(),
            Opcode::Op1Negate => "OP_1NEGATE".to_string(),
            Opcode::Reserved => "OP_RESERVED".to_string(),
            Opcode::Op1 => "OP_1".to_string(),
            Opcode::Op2 => "OP_2".to_string(),
            Opcode::Op3 => "OP_3".to_string(),
            Opcode::Op4 => "OP_4".to_string(),
            Opcode::Op5 => "OP_5".to_string(),
            Opcode::Op6 => "OP_6".to_string(),
            Opcode::Op7 => "OP_7".to_string(),
            Opcode::Op8 => "OP_8".to_string(),
            Opcode::Op9 => "OP_9".to_string(),
            Opcode::Op10 => "OP_10".to_string(),
            Opcode::Op11 => "OP_11".to_string(),
            Opcode::Op12 => "OP_12".to_string(),
            Opcode::Op13 => "OP_13".to_string(),
            Opcode::Op14 => "OP_14".to_string(),
            Opcode::Op15 => "OP_15".to_string(),
            Opcode::Op16 => "OP_16".to_string(),
            Opcode::Nop => "OP_NOP".to_string(),
            Opcode::Ver => "OP_VER".to_string(),
            Opcode::If => "OP_IF".to_string(),
            Opcode::NotIf => "OP_NOTIF".to_string(),
            Opcode::VerIf => "OP_VERIF".to_string(),
            Opcode::VerNotIf => "OP_VERNOTIF".to_string(),
            Opcode::Else => "OP_ELSE".to_string(),
            Opcode::EndIf => "OP_ENDIF".to_string(),
            Opcode::Verify => "OP_VERIFY".to_string(),
            Opcode::Return => "OP_RETURN".to_string(),
            Opcode::ToAltStack => "OP_TOALTSTACK".to_string(),
            Opcode::FromAltStack => "OP_FROMALTSTACK".to_string(),
            Opcode::Drop2 => "OP_2DROP".to_string(),
            Opcode::Dup2 => "OP_2DUP".to_string(),
            Opcode::Dup3 => "OP_3DUP".to_string(),
            Opcode::Over2 => "OP_2OVER".to_string(),
            Opcode::Rot2 => "OP_2ROT".to_string(),
            Opcode::Swap2 => "OP_2SWAP".to_string(),
            Opcode::IfDup => "OP_IFDUP".to_string(),
            Opcode::Depth => "OP_DEPTH".to_string(),
            Opcode::Drop => "OP_DROP".to_string(),
            Opcode::Dup => "OP_DUP".to_string(),
            Opcode::Nip => "OP_NIP".to_string(),
            Opcode::Over => "OP_OVER".to_string(),
            Opcode::Pick => "OP_PICK".to_string(),
            Opcode::Roll => "OP_ROLL".to_string(),
            Opcode::Rot => "OP_ROT".to_string(),
            Opcode::Swap => "OP_SWAP".to_string(),
            Opcode::Tuck => "OP_TUCK".to_string(),
            Opcode::Cat => "OP_CAT".to_string(),
            Opcode::Substr => "OP_SUBSTR".to_string(),
            Opcode::Left => "OP_LEFT".to_string(),
            Opcode::Right => "OP_RIGHT".to_string(),
            Opcode::Size => "OP_SIZE".to_string(),
            Opcode::Invert => "OP_INVERT".to_string(),
            Opcode::And => "OP_AND".to_string(),
            Opcode::Or => "OP_OR".to_string(),
            Opcode::Xor => "OP_XOR".to_string(),
            Opcode::Equal => "OP_EQUAL".to_string(),
            Opcode::EqualVerify => "OP_EQUALVERIFY".to_string(),
            Opcode::Reserved1 => "OP_RESERVED1".to_string(),
            Opcode::Reserved2 => "OP_RESERVED2".to_string(),
            Opcode::Add1 => "OP_1ADD".to_string(),
            Opcode::Sub1 => "OP_1SUB".to_string(),
            Opcode::Mul2 => "OP_2MUL".to_string(),
            Opcode::Div2 => "OP_2DIV".to_string(),
            Opcode::Negate => "OP_NEGATE".to_string(),
            Opcode::Abs => "OP_ABS".to_string(),
            Opcode::Not => "OP_NOT".to_string(),
            Opcode::NotEqual0 => "OP_0NOTEQUAL".to_string(),
            Opcode::Add => "OP_ADD".to_string(),
            Opcode::Sub => "OP_SUB".to_string(),
            Opcode::Mul => "OP_MUL".to_string(),
            Opcode::Div => "OP_DIV".to_string(),
            Opcode::Mod => "OP_MOD".to_string(),
            Opcode::LShift => "OP_LSHIFT".to_string(),
            Opcode::RShift => "OP_RSHIFT".to_string(),
            Opcode::BoolAnd => "OP_BOOLAND".to_string(),
            Opcode::BoolOr => "OP_BOOLOR".to_string(),
            Opcode::NumEqual => "OP_NUMEQUAL".to_string(),
            Opcode::NumEqualVerify => "OP_NUMEQUALVERIFY".to_string(),
            Opcode::NumNotEqual => "OP_NUMNOTEQUAL".to_string(),
            Opcode::LessThan => "OP_LESSTHAN".to_string(),
            Opcode::GreaterThan => "OP_GREATERTHAN".to_string(),
            Opcode::LessThanOrEqual => "OP_LESSTHANOREQUAL".to_string(),
            Opcode::GreaterThanOrEqual => "OP_GREATERTHANOREQUAL".to_string(),
            Opcode::Min => "OP_MIN".to_string(),
            Opcode::Max => "OP_MAX".to_string(),
            Opcode::Within => "OP_WITHIN".to_string(),
            Opcode::Ripemd160 => "OP_RIPEMD160".to_string(),
            Opcode::Sha1 => "OP_SHA1".to_string(),
            Opcode::Sha256 => "OP_SHA256".to_string(),
            Opcode::Hash160 => "OP_HASH160".to_string(),
            Opcode::Hash256 => "OP_HASH256".to_string(),
            Opcode::CodeSeparator => "OP_CODESEPARATOR".to_string(),
            Opcode::CheckSig => "OP_CHECKSIG".to_string(),
            Opcode::CheckSigVerify => "OP_CHECKSIGVERIFY".to_string(),
            Opcode::CheckMultisig => "OP_CHECKMULTISIG".to_string(),
            Opcode::CheckMultisigVerify => "OP_CHECKMULTISIGVERIFY".to_string(),
            Opcode::Nop1 => "OP_NOP1".to_string(),
            Opcode::CheckLockTimeVerify => "OP_CHECKLOCKTIMEVERIFY".to_string(),
            Opcode::CheckSequenceVerify => "OP_CHECKSEQUENCEVERIFY".to_string(),
            Opcode::Nop4 => "OP_NOP4".to_string(),
            Opcode::Nop5 => "OP_NOP5".to_string(),
            Opcode::Nop6 => "OP_NOP6".to_string(),
            Opcode::Nop7 => "OP_NOP7".to_string(),
            Opcode::Nop8 => "OP_NOP8".to_string(),
            Opcode::Nop9 => "OP_NOP9".to_string(),
            Opcode::Nop10 => "OP_NOP10".to_string(),
            Opcode::Unassigned(n) => return write!(f, "OP_UNASSIGNED(0x{n:02x})"),
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_every_byte() {
        for byte in 0u8..=255 {
            let opcode = Opcode::from_byte(byte);
            assert_eq!(opcode.to_byte(), byte, "byte 0x{byte:02x}");
        }
    }

    #[test]
    fn relaxed_push_includes_reserved_80() {
        assert!(Opcode::Reserved.is_relaxed_push());
        assert!(!Opcode::Reserved.is_push());
        assert!(Opcode::Op16.is_relaxed_push());
        assert!(!Opcode::Nop.is_relaxed_push());
    }

    #[test]
    fn disabled_opcodes_are_invalid_not_reserved() {
        assert!(Opcode::Cat.is_invalid());
        assert!(!Opcode::Cat.is_reserved());
        assert!(Opcode::Ver.is_reserved());
        assert!(!Opcode::Ver.is_invalid());
    }

    #[test]
    fn anything_past_nop10_is_reserved() {
        assert!(Opcode::Unassigned(0xba).is_reserved());
        assert!(Opcode::Unassigned(0xff).is_reserved());
        assert!(!Opcode::Nop10.is_reserved());
    }

    #[test]
    fn conditional_opcodes() {
        for opcode in [Opcode::If, Opcode::NotIf, Opcode::Else, Opcode::EndIf] {
            assert!(opcode.is_conditional());
        }
        assert!(!Opcode::Verify.is_conditional());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format!("{}", Opcode::Dup), "OP_DUP");
        assert_eq!(format!("{}", Opcode::PushBytes(20)), "OP_PUSHBYTES_20");
        assert_eq!(format!("{}", Opcode::Unassigned(0xfc)), "OP_UNASSIGNED(0xfc)");
    }
}
