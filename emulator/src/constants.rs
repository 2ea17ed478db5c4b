pub type Address = u64;
pub type Word = u32;

/// Revision of the canonical opcode table.
///
/// Revision 1 had opcodes `NUL` through `HLT` (0 to 10). Revision 2 appends the
/// half-word and word wide load/store instructions (11 to 14).
pub const ISA_REVISION: u32 = 2;

/// Total size of the machine memory, in bytes
pub const MEMORY_SIZE: usize = 4096;

/// Number of general purpose registers
pub const NUM_REGISTERS: usize = 8;

/// Width of a register, in bytes
pub const REGISTER_SIZE: usize = std::mem::size_of::<Word>();

/// Width of an encoded instruction, in bytes
pub const INSTRUCTION_SIZE: usize = 9;
