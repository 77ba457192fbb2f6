//! Error types for ImageWriter printer operations.
//!
//! Every error is fatal for the page being printed: the driver aborts the
//! band loop, releases its buffers and surfaces the first error to the
//! caller. Callers that need robustness must re-run the whole page.

use thiserror::Error;

/// Main error type for ImageWriter printer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while writing to the output sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The output sink accepted fewer bytes than supplied.
    ///
    /// A short write would desynchronize the wire protocol (a bitmap
    /// command's length prefix no longer matching its payload), so it is
    /// treated as fatal rather than retried.
    #[error("short write to output: wrote {actual} of {expected} bytes")]
    ShortWrite { expected: usize, actual: usize },

    /// The scan-line source failed to produce a row inside the page.
    ///
    /// Rows past the end of the page are zero-filled by the driver and
    /// never requested, so this always signals a rendering failure.
    #[error("raster source failed at row {row}: {reason}")]
    SourceRead { row: u32, reason: String },

    /// Invalid or unsupported configuration parameter.
    ///
    /// Detected once at page start, before any output is produced, e.g.
    /// a resolution the selected model cannot print or a color channel
    /// list on a monochrome device.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Workspace buffer allocation failed during page setup.
    #[error("failed to allocate page buffers")]
    Allocation,
}
