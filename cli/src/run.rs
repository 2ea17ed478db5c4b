use std::process::exit;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueHint};
use dioxide_emulator::compiler::{CompilationError, DebugInfo};
use dioxide_emulator::constants as C;
use dioxide_emulator::runtime::{Computer, Instruction};
use dioxide_emulator::{compile, MachineConfig, Mode};
use tracing::{debug, info, warn};

fn parse_memory_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|e| format!("{e}"))?;
    if size < C::INSTRUCTION_SIZE {
        return Err(format!(
            "memory must hold at least one instruction ({} bytes)",
            C::INSTRUCTION_SIZE
        ));
    }
    Ok(size)
}

/// Run the machine until it halts.
///
/// On a fault, the machine state is dumped right away and returned along with
/// the error.
fn run_to_halt(computer: &mut Computer) -> Result<(), (String, anyhow::Error)> {
    computer.run().map_err(|e| {
        let dump = computer.dump().to_string();
        (dump, anyhow::Error::new(e).context("the machine faulted"))
    })
}

#[derive(Parser, Debug)]
pub struct RunOpt {
    /// Configuration file, printed before the program runs. Only the first one
    /// is used
    #[clap(short, long, value_name = "PATH", action = ArgAction::Append, value_hint = ValueHint::FilePath)]
    config: Vec<Utf8PathBuf>,

    /// Input file. When several are given, the last one is used
    #[clap(value_name = "SOURCE", required = true, value_hint = ValueHint::FilePath)]
    input: Vec<Utf8PathBuf>,

    /// Reject malformed programs instead of silently degrading them
    #[clap(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Dump the registers and memory once the program halts
    #[clap(long, action = ArgAction::SetTrue)]
    dump: bool,

    /// Print the assembled program instead of running it
    #[clap(long, action = ArgAction::SetTrue)]
    disassemble: bool,

    /// Memory size, in bytes
    #[clap(long, value_name = "BYTES", default_value_t = C::MEMORY_SIZE, value_parser = parse_memory_size)]
    memory_size: usize,

    /// Number of registers
    #[clap(long, value_name = "COUNT", default_value_t = C::NUM_REGISTERS)]
    registers: usize,
}

impl RunOpt {
    fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            memory_size: self.memory_size,
            registers: self.registers,
            mode: if self.strict {
                Mode::Strict
            } else {
                Mode::Legacy
            },
        }
    }

    /// Read the configuration file, if one was given
    fn read_config(&self) -> anyhow::Result<Option<String>> {
        let Some((path, ignored)) = self.config.split_first() else {
            return Ok(None);
        };

        for path in ignored {
            warn!(%path, "Ignoring extra configuration file");
        }

        debug!(%path, "Reading configuration");
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("could not read configuration file {path}"))?;
        Ok(Some(config))
    }

    fn disassemble(debug_info: &DebugInfo) {
        for (index, raw) in debug_info.instructions().enumerate() {
            match Instruction::try_from(raw) {
                Ok(instruction) => println!("{index:>5}: {instruction}"),
                Err(e) => println!("{index:>5}: {raw} ; {e}"),
            }
        }
    }

    pub fn exec(self) -> anyhow::Result<()> {
        if let Some(config) = self.read_config()? {
            println!("{config}");
        }

        let input = self.input.last().context("no input file")?;
        info!(path = %input, "Reading program");
        let source = std::fs::read_to_string(input)
            .with_context(|| format!("could not read program {input}"))?;

        debug!("Assembling program");
        let (mut computer, debug_info) = match compile(&source, &self.machine_config()) {
            Ok(p) => p,
            Err(CompilationError::Assembly(e)) => {
                let labels = vec![miette::LabeledSpan::at(e.location().range(), e.to_string())];
                let report = miette::miette!(labels = labels, "Failed to assemble program")
                    .with_source_code(miette::NamedSource::new(input.as_str(), source.clone()));
                eprintln!("{report:?}");
                exit(1);
            }
            Err(e) => return Err(e.into()),
        };

        if self.disassemble {
            Self::disassemble(&debug_info);
            return Ok(());
        }

        info!("Running program");
        if let Err((dump, e)) = run_to_halt(&mut computer) {
            print!("{dump}");
            return Err(e);
        }

        info!(registers = %computer.registers, cycles = computer.cycles, "End of program");

        if self.dump {
            print!("{}", computer.dump());
        }

        Ok(())
    }
}
