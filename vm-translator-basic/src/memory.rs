//! Maps the eight VM memory segments onto the Hack platform's actual RAM
//! layout: some resolve to a fixed address, some to a pointer that must be
//! dereferenced, and `static` resolves to a per-file label instead of a
//! number at all.

use crate::parser::Segment;

/// Segment access pattern - makes impossible states unrepresentable
/// Eliminates need for .expect() calls by encoding segment types in the type system
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentAccess {
    /// Direct addressing: immediate value or fixed RAM address
    Direct { addr: u16 },
    /// Indirect addressing: base pointer + index
    Indirect { base: &'static str },
    /// Static addressing: filename.index
    Static { index: u16 },
}

/// Determine the segment access pattern for a given segment and index
/// Type-safe: returns explicit access pattern, eliminating panic potential
pub fn segment_access(segment: Segment, index: u16) -> SegmentAccess {
    match segment {
        Segment::Constant => SegmentAccess::Direct { addr: index },
        Segment::Local => SegmentAccess::Indirect { base: "LCL" },
        Segment::Argument => SegmentAccess::Indirect { base: "ARG" },
        Segment::This => SegmentAccess::Indirect { base: "THIS" },
        Segment::That => SegmentAccess::Indirect { base: "THAT" },
        Segment::Pointer => SegmentAccess::Direct { addr: 3 + index },
        Segment::Temp => SegmentAccess::Direct { addr: 5 + index },
        Segment::Static => SegmentAccess::Static { index },
    }
}
