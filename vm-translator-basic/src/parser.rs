use crate::error::{Result, VMError};

/// VM Command representation
#[derive(Debug, Clone, PartialEq)]
pub enum VMCommand {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
}

/// Arithmetic/Logical operations (9 total)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArithmeticOp {
    Add, // x + y
    Sub, // x - y
    Neg, // -x
    Eq,  // x == y
    Lt,  // x < y
    Gt,  // x > y
    And, // x & y
    Or,  // x | y
    Not, // !x
}

/// Memory segments (8 total)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Constant, // Push only, immediate value
    Local,    // RAM[LCL + index]
    Argument, // RAM[ARG + index]
    This,     // RAM[THIS + index]
    That,     // RAM[THAT + index]
    Pointer,  // RAM[3] (THIS) or RAM[4] (THAT)
    Temp,     // RAM[5-12]
    Static,   // RAM[16+], file-scoped
}

impl ArithmeticOp {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "add" => Some(ArithmeticOp::Add),
            "sub" => Some(ArithmeticOp::Sub),
            "neg" => Some(ArithmeticOp::Neg),
            "eq" => Some(ArithmeticOp::Eq),
            "lt" => Some(ArithmeticOp::Lt),
            "gt" => Some(ArithmeticOp::Gt),
            "and" => Some(ArithmeticOp::And),
            "or" => Some(ArithmeticOp::Or),
            "not" => Some(ArithmeticOp::Not),
            _ => None,
        }
    }
}

impl Segment {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(Segment::Constant),
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "pointer" => Some(Segment::Pointer),
            "temp" => Some(Segment::Temp),
            "static" => Some(Segment::Static),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
        }
    }

    /// Get maximum valid index for this segment
    pub fn max_index(&self) -> Option<u16> {
        match self {
            Segment::Pointer => Some(1),  // 0 or 1 only
            Segment::Temp => Some(7),     // 0-7 only
            Segment::Static => Some(239), // 0-239
            _ => None,                    // No fixed limit for other segments
        }
    }
}

/// Strip comments and whitespace from a line
fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

/// Parse a single line of VM code
/// Returns None for empty/comment-only lines
pub fn parse_line(line: &str, line_num: usize) -> Result<Option<VMCommand>> {
    let cleaned = strip_comment(line);

    if cleaned.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    if tokens.is_empty() {
        return Ok(None);
    }

    let command = tokens[0];

    // Try parsing as arithmetic command (no operands)
    if let Some(op) = ArithmeticOp::from_str(command) {
        return Ok(Some(VMCommand::Arithmetic(op)));
    }

    // Parse memory access commands (require 2 operands)
    match command {
        "push" | "pop" => {
            if tokens.len() < 3 {
                return Err(VMError::MissingOperand {
                    line: line_num,
                    command: command.to_string(),
                });
            }

            let segment_str = tokens[1];
            let segment =
                Segment::from_str(segment_str).ok_or_else(|| VMError::InvalidSegment {
                    line: line_num,
                    segment: segment_str.to_string(),
                })?;

            let index_str = tokens[2];
            let index: u16 = index_str.parse().map_err(|_| VMError::InvalidIndex {
                line: line_num,
                value: index_str.to_string(),
            })?;

            // Validate index range for segments with fixed limits
            if let Some(max) = segment.max_index()
                && index > max
            {
                return Err(VMError::IndexOutOfRange {
                    line: line_num,
                    index,
                    segment: segment.name().to_string(),
                    max,
                });
            }

            // Special validation: cannot pop to constant segment
            if command == "pop" && matches!(segment, Segment::Constant) {
                return Err(VMError::PopToConstant { line: line_num });
            }

            // Validate pointer index (must be 0 or 1)
            if matches!(segment, Segment::Pointer) && index > 1 {
                return Err(VMError::InvalidPointerIndex {
                    line: line_num,
                    index,
                });
            }

            // Safe: outer match guarantees command is "push" or "pop"
            if command == "push" {
                Ok(Some(VMCommand::Push { segment, index }))
            } else {
                Ok(Some(VMCommand::Pop { segment, index }))
            }
        }
        _ => Err(VMError::InvalidCommand {
            line: line_num,
            command: command.to_string(),
        }),
    }
}
