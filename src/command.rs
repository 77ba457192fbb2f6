//! Escape-sequence builders for the DMP / ImageWriter wire protocol.
//!
//! Every command starts with ESC followed by a single selector byte.
//! Numeric fields are fixed-width zero-padded ASCII decimal. Keeping all
//! of the byte sequences here means the driver loop never assembles a
//! command from magic strings.

use crate::model::{Channel, Resolution};

pub const ESC: u8 = 0x1B;
pub const CR: u8 = 0x0D;
pub const LF: u8 = 0x0A;
pub const FF: u8 = 0x0C;

/// Page preamble: CR+LF to flush the line, directionality, base line height
/// of 16/144" (one 8-dot band at 72 dpi per line feed).
pub fn init(bidirectional: bool) -> Vec<u8> {
    let dir = if bidirectional { b'<' } else { b'>' };
    let mut buf = vec![CR, LF, ESC, dir];
    buf.extend_from_slice(&line_height(16));
    buf
}

/// Character pitch select for the resolution's horizontal density.
pub fn pitch(resolution: Resolution) -> Vec<u8> {
    match resolution {
        // Condensed, 15 cpi -> 120 dpi.
        Resolution::Low => vec![ESC, b'q'],
        // Elite proportional -> 160 dpi.
        Resolution::Med | Resolution::High => vec![ESC, b'P'],
        // Elite proportional plus LQ proportional -> 320 dpi.
        Resolution::Lq => vec![ESC, b'P', ESC, b'a', b'3'],
    }
}

/// Line height in 1/144" units, two digits.
pub fn line_height(units: u8) -> Vec<u8> {
    format!("\x1bT{:02}", units).into_bytes()
}

/// Bitmap data command header for the given stride family.
///
/// Stride 1 is `ESC G` (used by Low, Med and each High half-band), stride 3
/// is the triple-density `ESC C` used by Lq. The raw bitmap bytes follow
/// the header on the wire.
pub fn bitmap(stride: usize, columns: usize) -> Vec<u8> {
    let selector = if stride == 3 { b'C' } else { b'G' };
    format!("\x1b{}{:04}", selector as char, columns).into_bytes()
}

/// Position-sync command: skip `columns` blank columns without sending
/// their data. The payload is one all-zero column in the stride family's
/// width.
pub fn position_sync(stride: usize, columns: usize) -> Vec<u8> {
    let selector = if stride == 3 { b'U' } else { b'V' };
    let mut buf = format!("\x1b{}{:04}", selector as char, columns).into_bytes();
    buf.extend(std::iter::repeat(0u8).take(stride));
    buf
}

/// Ribbon color select for 4-color devices.
pub fn ribbon(channel: Channel) -> Vec<u8> {
    vec![ESC, b'K', channel.code()]
}

/// Back the paper up over an inch before the formfeed so the printer does
/// not misjudge the page boundary and skip a page.
pub fn reverse_feed_hack() -> Vec<u8> {
    let mut buf = line_height(99);
    buf.extend_from_slice(&[LF, LF, ESC, b'r', LF, LF, LF, LF, ESC, b'f']);
    buf
}

/// Formfeed at the default 16/144" line height.
pub fn formfeed() -> Vec<u8> {
    let mut buf = line_height(16);
    buf.push(FF);
    buf
}

/// Restore bidirectional printing, 8 lines/inch and elite pitch.
pub fn reset() -> Vec<u8> {
    vec![ESC, b'<', ESC, b'B', ESC, b'E']
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_are_zero_padded() {
        assert_eq!(bitmap(1, 8), b"\x1bG0008".to_vec());
        assert_eq!(bitmap(3, 1360), b"\x1bC1360".to_vec());
        assert_eq!(position_sync(1, 9), b"\x1bV0009\x00".to_vec());
        assert_eq!(position_sync(3, 10), b"\x1bU0010\x00\x00\x00".to_vec());
        assert_eq!(line_height(1), b"\x1bT01".to_vec());
    }

    #[test]
    fn preamble_matches_wire_format() {
        assert_eq!(init(false), b"\r\n\x1b>\x1bT16".to_vec());
        assert_eq!(init(true), b"\r\n\x1b<\x1bT16".to_vec());
        assert_eq!(pitch(Resolution::Lq), b"\x1bP\x1ba3".to_vec());
    }
}
