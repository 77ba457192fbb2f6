//! Scan-line sources consumed by the page driver.

use crate::{error::Error, model::Channel, Matrix};

/// Supplies rendered scan lines to the driver, one color plane at a time.
///
/// The driver asks for rows strictly inside `0..height()` and zero-fills
/// past the end of the page on its own. Implementations backed by a
/// renderer should report any rendering failure through
/// [`Error::SourceRead`]; the driver aborts the page on the first error.
pub trait RasterSource {
    /// Page width in dots.
    fn width(&self) -> u32;

    /// Page height in rows.
    fn height(&self) -> u32;

    /// Copy the packed bits of `row` for `channel` into `buf`.
    ///
    /// `buf` is `(width() + 7) / 8` bytes; bit 7 of byte 0 is the leftmost
    /// pixel. Bits must already be halftoned for the channel; the driver
    /// never interprets color beyond plane selection.
    fn scan_line(&mut self, row: u32, channel: Channel, buf: &mut [u8]) -> Result<(), Error>;
}

/// A [`RasterSource`] over an in-memory single-plane [`Matrix`].
///
/// All rows must have the same byte width. Every channel returns the same
/// bits, so with a monochrome channel list this is a plain black plane.
#[derive(Debug, Clone)]
pub struct MatrixSource {
    rows: Matrix,
    line_size: usize,
}

impl MatrixSource {
    pub fn new(rows: Matrix) -> Result<Self, Error> {
        let line_size = match rows.first() {
            Some(row) => row.len(),
            None => return Err(Error::InvalidConfig("empty bitmap".to_string())),
        };
        if line_size == 0 {
            return Err(Error::InvalidConfig("zero-width bitmap".to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != line_size {
                return Err(Error::InvalidConfig(format!(
                    "row {} has width {} bytes, expected {}",
                    i,
                    row.len(),
                    line_size
                )));
            }
        }
        Ok(MatrixSource { rows, line_size })
    }
}

impl RasterSource for MatrixSource {
    fn width(&self) -> u32 {
        self.line_size as u32 * 8
    }

    fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    fn scan_line(&mut self, row: u32, _channel: Channel, buf: &mut [u8]) -> Result<(), Error> {
        let line = self.rows.get(row as usize).ok_or(Error::SourceRead {
            row,
            reason: "row out of range".to_string(),
        })?;
        buf.copy_from_slice(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_rows() {
        let err = MatrixSource::new(vec![vec![0x00, 0x00], vec![0x00]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_bitmap() {
        assert!(MatrixSource::new(Vec::new()).is_err());
        assert!(MatrixSource::new(vec![Vec::new()]).is_err());
    }

    #[test]
    fn reports_geometry_in_dots_and_rows() {
        let source = MatrixSource::new(vec![vec![0u8; 3]; 5]).unwrap();
        assert_eq!(source.width(), 24);
        assert_eq!(source.height(), 5);
    }
}
