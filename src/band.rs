//! Band assembly: pulls scan lines into an 8-row band, transposes them
//! into column-ordered bytes and scatters the result into the print
//! buffer with the resolution's interleave pattern.

use log::debug;

use crate::{
    error::Error,
    model::{Channel, Resolution},
    raster::RasterSource,
};

/// 8x8 bit-matrix transpose.
///
/// Output byte `c` has bit `7 - r` set iff input byte `r` has bit `7 - c`
/// set. Self-inverse. Applied independently to every byte column of a
/// band.
pub(crate) fn transpose_8x8(input: &[u8; 8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (row, &byte) in input.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        for col in 0..8 {
            if byte & (0x80 >> col) != 0 {
                out[col] |= 0x80 >> row;
            }
        }
    }
    out
}

/// Source row offset within a band for sub-row `sub` of pass `pass`.
///
/// Low and Med read 8 consecutive rows in one pass. High interleaves two
/// passes over even and odd rows. Lq stacks three straight 8-row groups.
fn row_offset(resolution: Resolution, pass: usize, sub: usize) -> u32 {
    match resolution {
        Resolution::Low | Resolution::Med => sub as u32,
        Resolution::High => (2 * sub + pass) as u32,
        Resolution::Lq => (sub + 8 * pass) as u32,
    }
}

/// Fallible zero-filled buffer allocation for the page workspace.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::Allocation)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Page-scoped band workspace, allocated once and overwritten per band.
pub(crate) struct BandBuffer {
    line_size: usize,
    /// 8 raw scan lines, band row `s` stored at slot `7 - s`.
    input: Vec<u8>,
    /// Transposed output of one pass, 8 column bytes per input byte.
    output: Vec<u8>,
}

impl BandBuffer {
    pub fn new(line_size: usize) -> Result<Self, Error> {
        Ok(BandBuffer {
            line_size,
            input: try_zeroed(line_size * 8)?,
            output: try_zeroed(line_size * 8)?,
        })
    }

    /// Assemble the band starting at absolute row `lnum` for `channel`
    /// into `prn`, which must be `line_size * 8 * passes` bytes.
    ///
    /// The print head fires its top pin from the low bit of each column
    /// byte, so band row 0 lands in bit 0: rows are loaded in reverse
    /// order and the transpose convention does the rest.
    pub fn assemble<S: RasterSource + ?Sized>(
        &mut self,
        source: &mut S,
        channel: Channel,
        lnum: u32,
        resolution: Resolution,
        prn: &mut [u8],
    ) -> Result<(), Error> {
        let line_size = self.line_size;
        let in_size = line_size * 8;
        let height = source.height();
        debug_assert_eq!(prn.len(), in_size * resolution.passes());

        for pass in 0..resolution.passes() {
            for sub in 0..8 {
                let row = lnum + row_offset(resolution, pass, sub);
                let slot = &mut self.input[(7 - sub) * line_size..][..line_size];
                if row >= height {
                    // Past the end of the page, not an error.
                    for byte in slot.iter_mut() {
                        *byte = 0;
                    }
                } else {
                    source.scan_line(row, channel, slot)?;
                }
            }

            let mut column = [0u8; 8];
            for x in 0..line_size {
                for (sub, byte) in column.iter_mut().enumerate() {
                    *byte = self.input[sub * line_size + x];
                }
                self.output[x * 8..x * 8 + 8].copy_from_slice(&transpose_8x8(&column));
            }

            match resolution {
                Resolution::Low | Resolution::Med => {
                    prn[..in_size].copy_from_slice(&self.output);
                }
                Resolution::High => {
                    // One contiguous half-band per pass.
                    prn[in_size * pass..in_size * (pass + 1)].copy_from_slice(&self.output);
                }
                Resolution::Lq => {
                    // Every third byte, pass selects the offset in the
                    // 3-byte column group.
                    for (i, &byte) in self.output.iter().enumerate() {
                        prn[pass + 3 * i] = byte;
                    }
                }
            }
        }
        debug!("assembled band at row {} for {:?}", lnum, channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::MatrixSource;

    /// O(n^2) reference: out[c] bit (7-r) = in[r] bit (7-c).
    fn transpose_reference(input: &[u8; 8]) -> [u8; 8] {
        let mut out = [0u8; 8];
        for r in 0..8 {
            for c in 0..8 {
                if input[r] & (0x80 >> c) != 0 {
                    out[c] |= 0x80 >> r;
                }
            }
        }
        out
    }

    #[test]
    fn transpose_matches_reference() {
        let patterns: [[u8; 8]; 4] = [
            [0xFF; 8],
            [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01],
            [0x01, 0x00, 0xAA, 0x55, 0xF0, 0x0F, 0xC3, 0x3C],
            [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0],
        ];
        for input in &patterns {
            assert_eq!(transpose_8x8(input), transpose_reference(input));
        }
    }

    #[test]
    fn transpose_is_an_involution() {
        let input: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        assert_eq!(transpose_8x8(&transpose_8x8(&input)), input);
    }

    #[test]
    fn top_row_lands_in_low_bit() {
        // An "overscore" (top band row set) must print as a run of 0x01,
        // an "underscore" (bottom row set) as a run of 0x80.
        let mut rows = vec![vec![0u8]; 8];
        rows[0][0] = 0xFF;
        let mut source = MatrixSource::new(rows).unwrap();
        let mut band = BandBuffer::new(1).unwrap();
        let mut prn = vec![0u8; 8];
        band.assemble(&mut source, Channel::Black, 0, Resolution::Low, &mut prn)
            .unwrap();
        assert_eq!(prn, vec![0x01; 8]);

        let mut rows = vec![vec![0u8]; 8];
        rows[7][0] = 0xFF;
        let mut source = MatrixSource::new(rows).unwrap();
        band.assemble(&mut source, Channel::Black, 0, Resolution::Low, &mut prn)
            .unwrap();
        assert_eq!(prn, vec![0x80; 8]);
    }

    #[test]
    fn columns_are_emitted_left_to_right() {
        // Single pixel at row 3, column 10 of a 16-dot-wide band.
        let mut rows = vec![vec![0u8, 0u8]; 8];
        rows[3][1] = 0x80 >> 2;
        let mut source = MatrixSource::new(rows).unwrap();
        let mut band = BandBuffer::new(2).unwrap();
        let mut prn = vec![0u8; 16];
        band.assemble(&mut source, Channel::Black, 0, Resolution::Low, &mut prn)
            .unwrap();
        let mut expected = vec![0u8; 16];
        expected[10] = 1 << 3;
        assert_eq!(prn, expected);
    }

    #[test]
    fn high_mode_splits_even_and_odd_rows() {
        // 16 rows; even rows all-black. Pass 0 (first half) must carry
        // them, pass 1 (second half) must stay blank.
        let rows: Vec<Vec<u8>> = (0..16)
            .map(|r| if r % 2 == 0 { vec![0xFFu8] } else { vec![0u8] })
            .collect();
        let mut source = MatrixSource::new(rows).unwrap();
        let mut band = BandBuffer::new(1).unwrap();
        let mut prn = vec![0u8; 16];
        band.assemble(&mut source, Channel::Black, 0, Resolution::High, &mut prn)
            .unwrap();
        assert_eq!(&prn[..8], &[0xFF; 8]);
        assert_eq!(&prn[8..], &[0x00; 8]);
    }

    #[test]
    fn lq_mode_interleaves_passes_into_column_groups() {
        // 24 rows, rows 0..8 (pass 0) all-black on a 1-byte line.
        let rows: Vec<Vec<u8>> = (0..24)
            .map(|r| if r < 8 { vec![0xFFu8] } else { vec![0u8] })
            .collect();
        let mut source = MatrixSource::new(rows).unwrap();
        let mut band = BandBuffer::new(1).unwrap();
        let mut prn = vec![0u8; 24];
        band.assemble(&mut source, Channel::Black, 0, Resolution::Lq, &mut prn)
            .unwrap();
        for group in prn.chunks(3) {
            assert_eq!(group, &[0xFF, 0x00, 0x00]);
        }
    }

    #[test]
    fn rows_past_page_end_are_zero_filled() {
        // 4-row page in an 8-row band: the bottom half of each column
        // byte comes from rows 0..4, the top half is zero.
        let rows = vec![vec![0xFFu8]; 4];
        let mut source = MatrixSource::new(rows).unwrap();
        let mut band = BandBuffer::new(1).unwrap();
        let mut prn = vec![0u8; 8];
        band.assemble(&mut source, Channel::Black, 0, Resolution::Low, &mut prn)
            .unwrap();
        assert_eq!(prn, vec![0x0F; 8]);
    }
}
