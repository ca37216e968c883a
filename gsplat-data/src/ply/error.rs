//! Error types for splat PLY decoding.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors that abort a decode. None of them are recovered internally.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed vertex count '{value}' in PLY header")]
    HeaderParse {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unexpected SH property count {sh_property_count}")]
    UnsupportedShLayout { sh_property_count: usize },

    #[error("missing required properties in PLY header: {}", .missing.join(", "))]
    MissingRequiredProperty { missing: Vec<&'static str> },

    #[error("files of {size} bytes are not supported, inputs must be smaller than 2GB")]
    FileTooLarge { size: u64 },

    #[error("unexpected end of file, got {read} of {expected} bytes at vertex {index}")]
    TruncatedRecord {
        index: u32,
        read: usize,
        expected: usize,
    },

    #[error(
        "property '{name}' at offset {offset} needs {width} values \
         but records only hold {property_count}"
    )]
    PropertyOutOfRange {
        name: &'static str,
        offset: usize,
        width: usize,
        property_count: usize,
    },

    #[error("zero-length rotation at vertex {index}")]
    DegenerateRotation { index: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
