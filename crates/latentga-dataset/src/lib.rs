//! Fixed-width evaluation records for latent-space search.
//!
//! A dataset file is a stream of fixed-width records made of ASCII digits. Each
//! record holds a condition vector (fed to the generator together with a latent
//! vector) followed by a target vector (what the generator should produce).
//!
//! ```text
//! |<------------ input_width (572) ------------>|<- output_width (20) ->|
//! 0010110...                                     00000000010000000000
//! ```
//!
//! Records starting with `-` are separators and are skipped. Line terminators
//! between records are ignored, so both a single unterminated line and one
//! record per line load the same way.
//!
//! # Example
//!
//! ```
//! use latentga_dataset::{Dataset, LoadOptions, RecordLayout};
//!
//! let layout = RecordLayout::new(3, 2);
//! let options = LoadOptions::new(layout);
//! let data = "10101\n-----\n01110\n";
//! let dataset = Dataset::read(data.as_bytes(), &options).unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.skipped(), 1);
//! assert_eq!(dataset.input(1), &[0.0, 1.0, 1.0]);
//! assert_eq!(dataset.output(1), &[1.0, 0.0]);
//! ```

pub use self::{
    dataset::{Dataset, Rows},
    reader::LoadOptions,
};

mod dataset;
mod reader;

/// Width of the condition part of a record in the default layout.
pub const DEFAULT_INPUT_WIDTH: usize = 572;

/// Width of the target part of a record in the default layout.
pub const DEFAULT_OUTPUT_WIDTH: usize = 20;

/// Column layout of a fixed-width record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Number of leading digits forming the condition input.
    pub input_width: usize,
    /// Number of trailing digits forming the target output.
    pub output_width: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_WIDTH, DEFAULT_OUTPUT_WIDTH)
    }
}

impl RecordLayout {
    #[must_use]
    pub const fn new(input_width: usize, output_width: usize) -> Self {
        Self {
            input_width,
            output_width,
        }
    }

    /// Total number of characters in one record.
    #[must_use]
    pub const fn record_width(&self) -> usize {
        self.input_width + self.output_width
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("failed to read dataset: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("record {record} is truncated: got {len} characters, expected {expected}")]
    Truncated {
        record: usize,
        len: usize,
        expected: usize,
    },
    #[display("record {record} has a non-digit byte 0x{byte:02x} at column {column}")]
    InvalidDigit {
        record: usize,
        column: usize,
        byte: u8,
    },
    #[display("record layout must have a non-zero width")]
    EmptyLayout,
}
