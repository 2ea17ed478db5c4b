use parse_display::Display;
use thiserror::Error;

use crate::constants as C;

/// Index of a general purpose register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{0}")]
pub struct Reg(pub C::Word);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid register {reg}, the machine has {count} registers")]
pub struct RegisterError {
    pub reg: Reg,
    pub count: usize,
}

/// The register file, every register being a [`C::Word`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    cells: Box<[C::Word]>,
}

impl Registers {
    /// Create `count` zeroed registers
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            cells: vec![0; count].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[C::Word] {
        &self.cells
    }

    fn index(&self, reg: Reg) -> Result<usize, RegisterError> {
        usize::try_from(reg.0)
            .ok()
            .filter(|index| *index < self.cells.len())
            .ok_or(RegisterError {
                reg,
                count: self.cells.len(),
            })
    }

    /// Get the value of a register
    ///
    /// # Errors
    ///
    /// This function will return an error if the register does not exist.
    pub fn get(&self, reg: Reg) -> Result<C::Word, RegisterError> {
        let index = self.index(reg)?;
        Ok(self.cells[index])
    }

    /// Get a mutable reference to a register
    ///
    /// # Errors
    ///
    /// This function will return an error if the register does not exist.
    pub fn get_mut(&mut self, reg: Reg) -> Result<&mut C::Word, RegisterError> {
        let index = self.index(reg)?;
        Ok(&mut self.cells[index])
    }

    /// Set a register value
    ///
    /// # Errors
    ///
    /// This function will return an error if the register does not exist.
    pub fn set(&mut self, reg: Reg, value: C::Word) -> Result<(), RegisterError> {
        *self.get_mut(reg)? = value;
        Ok(())
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, value) in self.cells.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "%{index} = {value}")?;
        }
        Ok(())
    }
}
