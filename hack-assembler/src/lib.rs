pub mod codegen;
pub mod error;
pub mod parser;
pub mod symbols;

use codegen::HackEncoder;
use error::{AsmError, Result};
use parser::{Instruction, Line, parse_line};
use symbols::SymbolTable;

/// Assemble a complete Hack assembly source file into its `.hack` binary
/// text, one 16-bit word per line.
pub fn assemble(source: &str) -> Result<String> {
    let lines: Vec<&str> = source.lines().collect();

    // Pre-allocate output (estimate ~16 chars per line)
    let mut output = String::with_capacity(lines.len() * 17);

    // Pass 1: Parse and build symbol table
    let mut symbol_table = SymbolTable::new();
    let mut parsed_lines = Vec::with_capacity(lines.len());
    let mut rom_address = 0u16;

    for (line_num, line) in lines.iter().enumerate() {
        let parsed = parse_line(line, line_num + 1)?;

        match &parsed {
            Line::Label(label) => {
                symbol_table
                    .add_label(label.clone(), rom_address)
                    .map_err(|dup| AsmError::DuplicateLabel {
                        line: line_num + 1,
                        label: dup,
                    })?;
            }
            Line::Instruction(_) => {
                rom_address += 1;
            }
            Line::Empty => {}
        }

        parsed_lines.push(parsed);
    }

    // Pass 2: resolve symbols to addresses and emit binary words
    let encoder = HackEncoder::hack();

    for parsed in parsed_lines.iter() {
        match parsed {
            Line::Instruction(inst) => {
                let resolved = match inst {
                    Instruction::ASymbol(symbol) => {
                        let addr = symbol_table.get_or_allocate(symbol);
                        inst.clone().resolve(addr)
                    }
                    Instruction::AValue(v) => inst.clone().resolve(*v),
                    Instruction::CInstruction { .. } => inst.clone().resolve(0), // addr unused for C-instructions
                };

                encoder.encode(&resolved, &mut output);
                output.push('\n');
            }
            Line::Label(_) | Line::Empty => {}
        }
    }

    Ok(output.trim_end().to_string())
}
