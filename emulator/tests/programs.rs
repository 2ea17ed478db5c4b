use dioxide_emulator::{
    compile,
    runtime::{Computer, Exception, ProcessorError, Reg, State},
    MachineConfig, Mode,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn run(source: &str, config: &MachineConfig) -> (Computer, Result<(), ProcessorError>) {
    let (mut computer, _) = compile(source, config).expect("program to compile");
    let result = computer.run();
    (computer, result)
}

fn register(computer: &Computer, index: u32) -> u32 {
    computer.registers.get(Reg(index)).expect("register to exist")
}

#[test]
fn sum() {
    let (computer, result) = run("SET 0 5; SET 1 3; ADD 0 1; HLT 0 0", &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(computer.state(), State::Halted);
    assert_eq!(register(&computer, 0), 8);
    assert_eq!(register(&computer, 1), 3);
}

#[test]
fn branch_targets_are_instruction_indices() {
    // Index 2 is `SET 1 99`, which runs before the halt
    let (computer, result) = run("SET 0 0; BRZ 0 2; SET 1 99; HLT 0 0", &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 1), 99);
    assert_eq!(computer.cycles, 4);

    // Jumping to index 3 skips it
    let (computer, result) = run("SET 0 0; BRZ 0 3; SET 1 99; HLT 0 0", &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 1), 0);
    assert_eq!(computer.cycles, 3);

    // A non-zero register does not branch
    let (computer, result) = run("SET 0 1; BRZ 0 3; SET 1 99; HLT 0 0", &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 1), 99);
}

#[test]
fn countdown_loop() {
    let source = indoc! {"
        # r0: counter, r1: decrement, r2: iterations
        SET 0 5
        SET 1 1
        SET 3 1
        BRZ 0 8     # 3: exit when the counter is zero
        SUB 0 1
        ADD 2 3
        BRC 3 0
        NUL 0 0
        HLT 0 0     # 8
    "};
    let (computer, result) = run(source, &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 0), 0);
    assert_eq!(register(&computer, 2), 5);
}

#[test]
fn left_shifts_wrap() {
    for n in 0..40 {
        let mut source = String::from("SET 0 1\n");
        for _ in 0..n {
            source.push_str("LSH 0 0\n");
        }
        source.push_str("HLT 0 0\n");

        let (computer, result) = run(&source, &MachineConfig::default());
        assert_eq!(result, Ok(()));
        let expected = 1u32.checked_shl(n).unwrap_or(0);
        assert_eq!(register(&computer, 0), expected, "after {n} shifts");
    }
}

#[test]
fn right_shift_halves() {
    for value in [0u32, 1, 2, 7, 1000, u32::MAX] {
        let source = format!("SET 0 {value}; RSH 0 0; HLT 0 0");
        let (computer, result) = run(&source, &MachineConfig::default());
        assert_eq!(result, Ok(()));
        assert_eq!(register(&computer, 0), value / 2);
    }
}

#[test]
fn memory_round_trip() {
    let source = indoc! {"
        SET 0 300
        STR 0 100   # only the low byte is stored
        LOD 100 1
        STW 0 104
        LDH 106 2
        LDW 104 3
        HLT 0 0
    "};
    let (computer, result) = run(source, &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 1), 300 % 256);
    assert_eq!(register(&computer, 2), 300);
    assert_eq!(register(&computer, 3), 300);
    assert_eq!(&computer.memory.as_bytes()[104..108], &[0u8, 0, 1, 44]);
}

#[test]
fn running_off_the_end_faults() {
    for memory_size in [9, 10, 17, 18, 27, 64] {
        let config = MachineConfig {
            memory_size,
            ..MachineConfig::default()
        };
        let (computer, result) = run("NUL 0 0", &config);
        assert!(
            matches!(
                result,
                Err(ProcessorError::Exception(
                    Exception::ProgramCounterOutOfBounds { .. }
                ))
            ),
            "memory size {memory_size}"
        );
        assert_eq!(computer.state(), State::Faulted);
        assert!(computer.pc > memory_size as u64);
    }
}

#[test]
fn strict_mode_faults_earlier() {
    let config = MachineConfig {
        memory_size: 20,
        mode: Mode::Strict,
        ..MachineConfig::default()
    };
    let (computer, result) = run("NUL 0 0 NUL 0 0", &config);
    assert_eq!(
        result,
        Err(ProcessorError::Exception(
            Exception::ProgramCounterOutOfBounds {
                pc: 18,
                memory_size: 20
            }
        ))
    );
    assert_eq!(computer.cycles, 2);
}

#[test]
fn comment_right_after_an_operand() {
    let (computer, result) = run("SET 0 5#note\nHLT 0 0#end", &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(computer.state(), State::Halted);
    assert_eq!(register(&computer, 0), 5);
    assert_eq!(computer.cycles, 2);
}

#[test]
fn legacy_mode_tolerates_garbage() {
    let source = "SET 0 12abc BOGUS 1 1 SET 1 x HLT 0 0 ADD 0";
    let (computer, result) = run(source, &MachineConfig::default());
    assert_eq!(result, Ok(()));
    assert_eq!(register(&computer, 0), 12);
    assert_eq!(register(&computer, 1), 0);
    assert_eq!(computer.cycles, 3);
}

#[test]
fn dump_after_fault_leaves_state_untouched() {
    let config = MachineConfig {
        memory_size: 18,
        registers: 2,
        ..MachineConfig::default()
    };
    let (computer, result) = run("SET 1 255", &config);
    assert!(result.is_err());

    let registers = computer.registers.clone();
    let memory = computer.memory.clone();
    let dump = computer.dump().to_string();

    assert!(dump.contains("Register 1: ff"));
    assert!(dump.ends_with("--- RAM ---\n3 0 0 0 1 0 0 0 ff 0 0 0 0 0 0 0 0 0 \n"));
    assert_eq!(computer.registers, registers);
    assert_eq!(computer.memory, memory);
}
