use crate::printer::EjectMode;

/// Printer models supported by this driver.
///
/// The Dot Matrix Printer was the parallel-port predecessor of the
/// ImageWriter; the later models understand a superset of its commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    AppleDmp,
    ImageWriter,
    ImageWriterII,
    ImageWriterLq,
}

impl Model {
    /// Resolutions this model can print.
    pub fn supported_resolutions(&self) -> &'static [Resolution] {
        match self {
            Self::AppleDmp => &[Resolution::Low],
            Self::ImageWriter => &[Resolution::Low, Resolution::Med],
            Self::ImageWriterII => &[Resolution::Low, Resolution::Med, Resolution::High],
            Self::ImageWriterLq => &[
                Resolution::Low,
                Resolution::Med,
                Resolution::High,
                Resolution::Lq,
            ],
        }
    }

    pub fn supports(&self, resolution: Resolution) -> bool {
        self.supported_resolutions().contains(&resolution)
    }

    /// Whether the model takes the 4-color ribbon.
    pub fn color_capable(&self) -> bool {
        match self {
            Self::AppleDmp | Self::ImageWriter => false,
            Self::ImageWriterII | Self::ImageWriterLq => true,
        }
    }

    /// Page eject behavior the model needs.
    ///
    /// The ImageWriter misjudges the page boundary in pinfeed mode: a
    /// formfeed issued near the bottom of the page skips a whole page.
    /// Those models default to the reverse-feed workaround.
    pub fn default_eject(&self) -> EjectMode {
        match self {
            Self::AppleDmp => EjectMode::FormFeed,
            _ => EjectMode::ReverseFeed,
        }
    }
}

/// Print resolution in horizontal x vertical dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 120 x 72 dpi, condensed pitch. The only mode the DMP has.
    Low,
    /// 160 x 72 dpi.
    Med,
    /// 160 x 144 dpi, two interleaved passes per band.
    High,
    /// 320 x 216 dpi, three interleaved passes, 3 bytes per column.
    Lq,
}

impl Resolution {
    pub fn dpi(&self) -> (u32, u32) {
        match self {
            Self::Low => (120, 72),
            Self::Med => (160, 72),
            Self::High => (160, 144),
            Self::Lq => (320, 216),
        }
    }

    /// Number of interleaved head passes that make up one band.
    pub fn passes(&self) -> usize {
        match self {
            Self::Low | Self::Med => 1,
            Self::High => 2,
            Self::Lq => 3,
        }
    }

    /// Vertical dots covered by one band.
    pub fn band_height(&self) -> u32 {
        8 * self.passes() as u32
    }

    /// Output bytes per logical printable column.
    pub fn stride(&self) -> usize {
        match self {
            Self::Lq => 3,
            _ => 1,
        }
    }
}

/// One ribbon/ink color plane.
///
/// The value doubles as the `ESC K` ribbon-select digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Black,
    Yellow,
    Magenta,
    Cyan,
}

impl Channel {
    /// Default plane order for 4-color printing.
    pub const COLOR_ORDER: [Channel; 4] = [
        Channel::Cyan,
        Channel::Magenta,
        Channel::Yellow,
        Channel::Black,
    ];

    /// ASCII digit used by the ribbon-select command.
    pub fn code(&self) -> u8 {
        match self {
            Self::Black => b'0',
            Self::Yellow => b'1',
            Self::Magenta => b'2',
            Self::Cyan => b'3',
        }
    }
}
