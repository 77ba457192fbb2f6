use std::io::Write;

use log::{debug, info};

use crate::{
    band::{try_zeroed, BandBuffer},
    command,
    error::Error,
    model::{Channel, Model, Resolution},
    raster::RasterSource,
};

/// Page eject behavior at the end of the band loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EjectMode {
    /// Plain formfeed at the default line height.
    FormFeed,
    /// Back the paper up over an inch, then formfeed. Works around the
    /// ImageWriter misjudging the page boundary in pinfeed mode.
    ReverseFeed,
    /// No formfeed: feed line by line through the remaining configured
    /// page length.
    SoftEject,
}

/// When the 1/144" micro-advance between the two High-mode half-bands is
/// emitted in multi-channel printing.
///
/// The single-channel cadence is unambiguous; the color timing differs
/// between printer ROMs and should be validated against real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighAdvance {
    /// Every channel emits the full advance sequence between its halves.
    PerChannel,
    /// Only the last channel advances the paper; earlier channels separate
    /// their halves with a bare carriage return.
    AfterLastChannel,
}

/// Per-page printer configuration.
///
/// Model and resolution are fixed at construction; the remaining knobs
/// default from the model and can be adjusted builder-style before the
/// config is handed to [`Printer::new`].
#[derive(Debug, Clone)]
pub struct Config {
    model: Model,
    resolution: Resolution,
    channels: Vec<Channel>,
    bidirectional: bool,
    eject: EjectMode,
    high_advance: HighAdvance,
    /// Physical page length in 1/144" units, used by [`EjectMode::SoftEject`].
    page_length: u32,
}

impl Config {
    /// Configuration with the model's defaults: black ribbon only,
    /// unidirectional printing, the model's eject quirk and an 11" page.
    pub fn new(model: Model, resolution: Resolution) -> Config {
        Config {
            model,
            resolution,
            channels: vec![Channel::Black],
            bidirectional: false,
            eject: model.default_eject(),
            high_advance: HighAdvance::PerChannel,
            page_length: 1584,
        }
    }

    /// Print all four ribbon planes in the default order.
    pub fn color(self) -> Self {
        Config {
            channels: Channel::COLOR_ORDER.to_vec(),
            ..self
        }
    }

    /// Explicit channel order, for partial-color pages.
    pub fn channels(self, channels: Vec<Channel>) -> Self {
        Config { channels, ..self }
    }

    pub fn bidirectional(self, flag: bool) -> Self {
        Config {
            bidirectional: flag,
            ..self
        }
    }

    pub fn eject(self, eject: EjectMode) -> Self {
        Config { eject, ..self }
    }

    pub fn high_advance(self, high_advance: HighAdvance) -> Self {
        Config {
            high_advance,
            ..self
        }
    }

    /// Physical page length in 1/144" units (1584 for US letter).
    pub fn page_length(self, page_length: u32) -> Self {
        Config {
            page_length,
            ..self
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if !self.model.supports(self.resolution) {
            return Err(Error::InvalidConfig(format!(
                "{:?} does not support {:?}",
                self.model, self.resolution
            )));
        }
        if self.channels.is_empty() {
            return Err(Error::InvalidConfig("empty channel list".to_string()));
        }
        let color = self.channels.iter().any(|&c| c != Channel::Black);
        if (color || self.channels.len() > 1) && !self.model.color_capable() {
            return Err(Error::InvalidConfig(format!(
                "{:?} has no color ribbon",
                self.model
            )));
        }
        Ok(())
    }
}

/// Drives one page at a time to a byte sink.
///
/// The sink is any [`Write`]; each command is issued as a single write
/// and a short write is fatal for the page.
pub struct Printer<W: Write> {
    sink: W,
    config: Config,
}

impl<W: Write> Printer<W> {
    /// Validate the configuration and wrap the sink.
    ///
    /// Fails with [`Error::InvalidConfig`] before any output is produced
    /// if the model/resolution/channel combination is unsupported.
    pub fn new(config: Config, sink: W) -> Result<Self, Error> {
        config.validate()?;
        Ok(Printer { sink, config })
    }

    /// Consume the printer and hand back the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let n = self.sink.write(buf)?;
        if n == buf.len() {
            Ok(n)
        } else {
            debug!(
                "write error: bytes wrote {} != bytes supplied {}",
                n,
                buf.len()
            );
            Err(Error::ShortWrite {
                expected: buf.len(),
                actual: n,
            })
        }
    }

    /// Print one page from `source`.
    ///
    /// Emits the full init / band loop / eject / reset sequence. The band
    /// workspace is sized from the source geometry and reused across
    /// bands. The first error aborts the page; no output is retried.
    pub fn print_page<S: RasterSource + ?Sized>(&mut self, source: &mut S) -> Result<(), Error> {
        debug!("{:?}", self.config);

        let resolution = self.config.resolution;
        let line_size = ((source.width() + 7) / 8) as usize;
        let in_size = line_size * 8;
        let height = source.height();

        let mut band = BandBuffer::new(line_size)?;
        let mut prn = try_zeroed(in_size * resolution.passes())?;

        self.write(&command::init(self.config.bidirectional))?;
        self.write(&command::pitch(resolution))?;

        let channels = self.config.channels.clone();
        let multi = channels.len() > 1;
        let mut lnum: u32 = 0;
        let mut bands: u32 = 0;

        while lnum < height {
            for (i, &channel) in channels.iter().enumerate() {
                if multi {
                    self.write(&command::ribbon(channel))?;
                }
                band.assemble(source, channel, lnum, resolution, &mut prn)?;

                if resolution == Resolution::High {
                    let advance = match self.config.high_advance {
                        HighAdvance::PerChannel => true,
                        HighAdvance::AfterLastChannel => i + 1 == channels.len(),
                    };
                    self.encode_high_band(&prn, in_size, advance)?;
                } else {
                    self.encode_region(&prn, resolution.stride())?;
                }

                if i + 1 == channels.len() {
                    self.write(&[command::CR, command::LF])?;
                } else {
                    self.write(&[command::CR])?;
                }
            }
            lnum += resolution.band_height();
            bands += 1;
        }

        self.eject(bands)?;
        self.write(&command::reset())?;
        self.sink.flush()?;

        info!("printed page: {} bands at {:?}", bands, resolution);
        Ok(())
    }

    /// Trim and transmit one print-buffer region.
    ///
    /// An all-zero region emits nothing. A leading blank run longer than
    /// 7 logical columns is replaced by a position-sync command; shorter
    /// runs ride along in the data, where the per-command overhead would
    /// exceed the savings.
    fn encode_region(&mut self, region: &[u8], stride: usize) -> Result<(), Error> {
        let (mut blk, end) = match trim(region, stride) {
            Some(span) => span,
            None => return Ok(()),
        };

        let lead_columns = blk / stride;
        if lead_columns > 7 {
            self.write(&command::position_sync(stride, lead_columns))?;
        } else {
            blk = 0;
        }

        self.write(&command::bitmap(stride, (end - blk) / stride))?;
        self.write(&region[blk..end])?;
        Ok(())
    }

    /// High mode prints a band as two independently trimmed half-bands,
    /// the odd rows offset by a 1/144" paper advance. `ESC T 15` after the
    /// second half restores the 16/144" per-band total.
    fn encode_high_band(&mut self, prn: &[u8], in_size: usize, advance: bool) -> Result<(), Error> {
        self.encode_region(&prn[..in_size], 1)?;
        if advance {
            self.write(&command::line_height(1))?;
            self.write(&[command::CR, command::LF])?;
        } else {
            self.write(&[command::CR])?;
        }
        self.encode_region(&prn[in_size..], 1)?;
        if advance {
            self.write(&command::line_height(15))?;
        }
        Ok(())
    }

    fn eject(&mut self, bands: u32) -> Result<(), Error> {
        match self.config.eject {
            EjectMode::FormFeed => {
                self.write(&command::formfeed())?;
            }
            EjectMode::ReverseFeed => {
                self.write(&command::reverse_feed_hack())?;
                self.write(&command::formfeed())?;
            }
            EjectMode::SoftEject => {
                // Every band advances 16/144" regardless of resolution.
                let consumed = bands * 16;
                let remaining = self.config.page_length.saturating_sub(consumed);
                let lines = (remaining + 15) / 16;
                self.write(&command::line_height(16))?;
                self.write(&vec![command::LF; lines as usize])?;
            }
        }
        Ok(())
    }
}

/// Find the span of non-blank stride-groups in a print-buffer region.
///
/// Returns byte offsets `(first, one_past_last)`, both multiples of
/// `stride`, or `None` for an all-zero region. Only whole groups are
/// trimmed: at stride 3 a column stays in the output unless all three of
/// its bytes are zero. Interior zeros are never removed.
fn trim(region: &[u8], stride: usize) -> Option<(usize, usize)> {
    let mut end = region.len();
    while end > 0 && region[end - stride..end].iter().all(|&b| b == 0) {
        end -= stride;
    }
    if end == 0 {
        return None;
    }
    let mut blk = 0;
    while region[blk..blk + stride].iter().all(|&b| b == 0) {
        blk += stride;
    }
    Some((blk, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_all_zero_region() {
        assert_eq!(trim(&[0u8; 24], 1), None);
        assert_eq!(trim(&[0u8; 24], 3), None);
    }

    #[test]
    fn trim_single_byte() {
        let mut region = [0u8; 16];
        region[5] = 0x42;
        assert_eq!(trim(&region, 1), Some((5, 6)));
    }

    #[test]
    fn trim_keeps_interior_zeros() {
        let mut region = [0u8; 16];
        region[2] = 0x01;
        region[9] = 0x80;
        assert_eq!(trim(&region, 1), Some((2, 10)));
    }

    #[test]
    fn trim_groups_by_stride() {
        // A lone byte inside a 3-byte column group keeps the whole group.
        let mut region = [0u8; 24];
        region[4] = 0xFF;
        assert_eq!(trim(&region, 3), Some((3, 6)));
    }

    #[test]
    fn trim_full_region_is_untouched() {
        let region = [0xFFu8; 12];
        assert_eq!(trim(&region, 3), Some((0, 12)));
    }

    #[test]
    fn config_rejects_unsupported_resolution() {
        let err = Config::new(Model::AppleDmp, Resolution::Lq).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn config_rejects_color_on_mono_device() {
        let err = Config::new(Model::ImageWriter, Resolution::Med)
            .color()
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn config_rejects_empty_channel_list() {
        let err = Config::new(Model::ImageWriterII, Resolution::High)
            .channels(Vec::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
