//! Assembler and emulator for the Dioxide architecture.
//!
//! The Dioxide architecture is a small register machine. Programs are lists of
//! `MNEMONIC arg1 arg2` statements, assembled to 9 bytes long instructions and
//! executed from the start of a flat, byte-addressed memory.

pub mod codec;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod parser;
pub mod runtime;

pub use self::{
    compiler::compile,
    config::{MachineConfig, Mode},
    parser::parse,
};
