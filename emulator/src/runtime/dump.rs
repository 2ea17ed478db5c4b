use std::fmt;

use super::Computer;

/// Human-readable view of the registers and memory of a machine.
///
/// Every register is printed with its index and hexadecimal value, followed by
/// every memory byte in hexadecimal, in address order. Each byte is followed by
/// a space, including the last one.
pub struct Dump<'a> {
    computer: &'a Computer,
}

impl<'a> Dump<'a> {
    pub(crate) const fn new(computer: &'a Computer) -> Self {
        Self { computer }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dumping VM RAM/register contents:")?;
        writeln!(f, "--- Registers ---")?;
        for (index, value) in self.computer.registers.as_slice().iter().enumerate() {
            writeln!(f, "Register {index}: {value:x}")?;
        }

        writeln!(f, "--- RAM ---")?;
        for byte in self.computer.memory.as_bytes() {
            write!(f, "{byte:x} ")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::config::MachineConfig;
    use crate::runtime::{Computer, Reg};

    fn computer() -> Computer {
        Computer::new(&MachineConfig {
            memory_size: 12,
            registers: 3,
            ..MachineConfig::default()
        })
    }

    #[test]
    fn dump_test() {
        let mut computer = computer();
        computer.registers.set(Reg(0), 8).unwrap();
        computer.registers.set(Reg(2), 0xDEAD_BEEF).unwrap();
        computer
            .load(&[3, 0, 0, 0, 0, 0, 0, 0, 0x1F, 0xA, 0, 0xFF])
            .unwrap();

        assert_eq!(
            computer.dump().to_string(),
            indoc! {"
                Dumping VM RAM/register contents:
                --- Registers ---
                Register 0: 8
                Register 1: 0
                Register 2: deadbeef
                --- RAM ---
            "}
            .to_owned()
                + "3 0 0 0 0 0 0 0 1f a 0 ff \n"
        );
    }

    #[test]
    fn dump_is_read_only_test() {
        let mut computer = computer();
        computer.registers.set(Reg(1), 42).unwrap();
        computer.load(&[1, 2, 3]).unwrap();

        let registers = computer.registers.clone();
        let memory = computer.memory.clone();
        let _ = computer.dump().to_string();

        assert_eq!(computer.registers, registers);
        assert_eq!(computer.memory, memory);
        assert_eq!(computer.pc, 0);
    }
}
