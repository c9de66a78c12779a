use hack_assembler::assemble;
use std::fs;

/// Assembles `tests/{name}.asm` and compares against the hand-verified
/// `tests/{name}.hack` binary fixture.
fn assert_matches_fixture(name: &str) {
    let asm_path = format!("tests/{}.asm", name);
    let hack_path = format!("tests/{}.hack", name);

    let source =
        fs::read_to_string(&asm_path).unwrap_or_else(|_| panic!("Failed to read {}", asm_path));

    let expected =
        fs::read_to_string(&hack_path).unwrap_or_else(|_| panic!("Failed to read {}", hack_path));

    let result = assemble(&source).unwrap_or_else(|e| panic!("Failed to assemble {}: {}", name, e));

    assert_eq!(
        result.trim(),
        expected.trim(),
        "Output mismatch for {}",
        name
    );
}

#[test]
fn test_add() {
    assert_matches_fixture("Add");
}

#[test]
fn test_max() {
    assert_matches_fixture("Max");
}

#[test]
fn test_rect() {
    assert_matches_fixture("Rect");
}

#[test]
fn test_pong() {
    assert_matches_fixture("Pong");
}
