//! Jack Compiler - Full Jack to VM code compiler.
//!
//! This crate compiles Jack source code to VM code for the nand2tetris
//! virtual machine. It supports:
//!
//! - Complete Jack language compilation (classes, subroutines, statements,
//!   expressions, arrays, strings)
//! - Parallel file processing in directory mode
//!
//! No optimisation is performed at any level: the generated VM code is a
//! direct, unconditional lowering of the AST with no constant folding or
//! peephole rewriting.
//!
//! # Usage
//!
//! ```no_run
//! use jack_compiler::{compile_file, compile_directory};
//! use std::path::Path;
//!
//! // Compile a single file
//! let result = compile_file(Path::new("Main.jack"));
//!
//! // Compile every .jack file in a directory
//! let results = compile_directory(Path::new("Square/"));
//! ```

pub mod codegen;
pub mod error;
pub mod symbol_table;
pub mod vm_writer;

use rayon::prelude::*;
use std::fs;
use std::path::Path;

// Re-export key types
pub use codegen::CodeGenerator;
pub use error::CompileError;
pub use symbol_table::{Symbol, SymbolKind, SymbolTable};
pub use vm_writer::VMWriter;

/// Result of compiling a single Jack file.
#[derive(Debug)]
pub struct CompileResult {
    /// The filename that was compiled.
    pub filename: String,
    /// The generated VM code (empty if errors occurred).
    pub vm_code: String,
    /// Any errors encountered during compilation.
    pub errors: Vec<CompileError>,
}

impl CompileResult {
    /// Check if the compilation was successful (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compilation options.
///
/// `optimize` is retained for command-line compatibility with the
/// `--no-optimize` flag but has no effect: this compiler performs no
/// optimisation at any level, with or without the flag set.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { optimize: true }
    }
}

/// Compile a single Jack file.
pub fn compile_file(path: &Path) -> CompileResult {
    compile_file_with_options(path, CompileOptions::default())
}

/// Compile a single Jack file with custom options.
pub fn compile_file_with_options(path: &Path, options: CompileOptions) -> CompileResult {
    let filename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return CompileResult {
                filename,
                vm_code: String::new(),
                errors: vec![CompileError::io(path, e)],
            };
        }
    };

    compile_source_with_options(&source, &filename, options)
}

/// Compile Jack source code directly.
pub fn compile_source(source: &str, filename: &str) -> CompileResult {
    compile_source_with_options(source, filename, CompileOptions::default())
}

/// Compile Jack source code with custom options.
pub fn compile_source_with_options(
    source: &str,
    filename: &str,
    _options: CompileOptions,
) -> CompileResult {
    // Tokenize
    let tokenizer = jack_analyzer::tokenizer::JackTokenizer::new(source);
    let tokens = match tokenizer.tokenize() {
        Ok(tokens) => tokens,
        Err(errors) => {
            return CompileResult {
                filename: filename.to_string(),
                vm_code: String::new(),
                errors: errors.into_iter().map(CompileError::from).collect(),
            };
        }
    };

    // Parse
    let parser = jack_analyzer::parser::Parser::new(&tokens);
    let class = match parser.parse() {
        Ok(class) => class,
        Err(errors) => {
            return CompileResult {
                filename: filename.to_string(),
                vm_code: String::new(),
                errors: errors.into_iter().map(CompileError::from).collect(),
            };
        }
    };

    match CodeGenerator::compile(&class) {
        Ok(vm_code) => CompileResult {
            filename: filename.to_string(),
            vm_code,
            errors: Vec::new(),
        },
        Err(errors) => CompileResult {
            filename: filename.to_string(),
            vm_code: String::new(),
            errors,
        },
    }
}

/// Compile all Jack files in a directory.
pub fn compile_directory(dir: &Path) -> Vec<CompileResult> {
    compile_directory_with_options(dir, CompileOptions::default())
}

/// Compile all Jack files in a directory with custom options.
///
/// Files are independent compilation units (no codegen state is shared
/// across them), so they are processed in parallel.
pub fn compile_directory_with_options(dir: &Path, options: CompileOptions) -> Vec<CompileResult> {
    let mut jack_files: Vec<_> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jack"))
            .collect(),
        Err(e) => {
            return vec![CompileResult {
                filename: dir.to_string_lossy().to_string(),
                vm_code: String::new(),
                errors: vec![CompileError::io(dir, e)],
            }];
        }
    };

    if jack_files.is_empty() {
        return Vec::new();
    }

    jack_files.sort();

    jack_files
        .par_iter()
        .map(|path| compile_file_with_options(path, options))
        .collect()
}

/// Write a compile result to an output file.
pub fn write_result(result: &CompileResult, output_dir: &Path) -> Result<(), CompileError> {
    let vm_path = output_dir.join(format!("{}.vm", result.filename));
    fs::write(&vm_path, &result.vm_code).map_err(|e| CompileError::io(&vm_path, e))
}
