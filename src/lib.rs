//! ImageWriter Printer Driver
//!
//! This crate converts 1-bit-per-pixel page rasters into the escape-sequence
//! command stream understood by the Apple Dot Matrix Printer and the
//! ImageWriter family of 9-pin impact printers.
//!
//! # Example
//!
//! ```rust,no_run
//! use imagewriter::{Config, MatrixSource, Model, Printer, Resolution};
//!
//! // A 16 pixel wide, 8 row tall all-black page.
//! let rows = vec![vec![0xFF, 0xFF]; 8];
//! let mut source = MatrixSource::new(rows).unwrap();
//!
//! let config = Config::new(Model::ImageWriterII, Resolution::High);
//! let mut printer = Printer::new(config, std::io::stdout()).unwrap();
//! printer.print_page(&mut source).unwrap();
//! ```

mod band;
mod command;
mod error;
mod model;
mod printer;
mod raster;

pub use crate::{
    error::Error,
    model::{Channel, Model, Resolution},
    printer::{Config, EjectMode, HighAdvance, Printer},
    raster::{MatrixSource, RasterSource},
};

/// Type alias for 1-bit row-major bitmap data.
///
/// Each inner `Vec<u8>` is one scan line with 8 pixels packed into each
/// byte, bit 7 being the leftmost pixel. The outer Vec holds the page's
/// rows top to bottom. All rows must have the same width.
pub type Matrix = Vec<Vec<u8>>;
