//! Encoding profile and ID3 tag configuration.
//!
//! The defaults reproduce LAME's own defaults: joint-stereo, 128 kbps
//! constant bit rate, quality 5. Hosts can deserialize a partial JSON
//! object into [`EncoderConfig`]; every missing field takes its default.

use crate::error::{EncoderError, EncoderResult};
use mp3lame_encoder::{Bitrate, Mode, Quality};
use serde::{Deserialize, Serialize};

/// Default input sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default constant bit rate in kbps.
pub const DEFAULT_BITRATE_KBPS: u16 = 128;

/// Default LAME quality (0 = best, 9 = worst).
pub const DEFAULT_QUALITY: u8 = 5;

/// Highest input sample rate accepted. LAME resamples anything up to this.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Bit rates the encoder accepts, in kbps.
pub const SUPPORTED_BITRATES: [u16; 7] = [64, 96, 128, 160, 192, 256, 320];

/// Channel layout written to the MP3 frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StereoMode {
    /// Single channel.
    Mono,
    /// Independent left/right channels.
    Stereo,
    /// Left/right or mid/side chosen per frame.
    #[default]
    JointStereo,
}

impl StereoMode {
    fn to_lame(self) -> Mode {
        match self {
            StereoMode::Mono => Mode::Mono,
            StereoMode::Stereo => Mode::Stereo,
            StereoMode::JointStereo => Mode::JointStereo,
        }
    }
}

/// ID3 tag fields embedded in the output. Empty fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Id3Tags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
}

impl Id3Tags {
    /// Tags carrying the three fields the upload client sets.
    pub fn new(title: &str, artist: &str, comment: &str) -> Self {
        Self {
            title: title.to_owned(),
            artist: artist.to_owned(),
            comment: comment.to_owned(),
            ..Self::default()
        }
    }

    /// Check whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Full encoding profile passed at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Input sample rate in Hz
    pub sample_rate: u32,
    /// Number of input channels (1 or 2)
    pub channels: u8,
    /// Constant bit rate in kbps, one of [`SUPPORTED_BITRATES`]
    pub bitrate_kbps: u16,
    /// Requested channel mode; mono input always encodes as mono
    pub mode: StereoMode,
    /// LAME algorithm quality, 0 (best) to 9 (fastest)
    pub quality: u8,
    /// Descriptive tags
    pub tags: Id3Tags,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 2,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            mode: StereoMode::default(),
            quality: DEFAULT_QUALITY,
            tags: Id3Tags::default(),
        }
    }
}

impl EncoderConfig {
    /// Create a config with default profile values
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed joint-stereo 128 kbps profile with caller-supplied format and tags.
    ///
    /// Channel counts that do not fit in a `u8` are saturated so that
    /// [`validate`](Self::validate) reports them instead of wrapping.
    pub fn with_tags(sample_rate: u32, channels: u32, tags: Id3Tags) -> Self {
        Self {
            sample_rate,
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
            tags,
            ..Self::default()
        }
    }

    /// Check every field against what the encoder accepts.
    pub fn validate(&self) -> EncoderResult<()> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(EncoderError::InvalidSampleRate(self.sample_rate));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(EncoderError::InvalidChannelCount(self.channels as u32));
        }
        if !SUPPORTED_BITRATES.contains(&self.bitrate_kbps) {
            return Err(EncoderError::UnsupportedBitrate(self.bitrate_kbps));
        }
        if self.quality > 9 {
            return Err(EncoderError::InvalidQuality(self.quality));
        }
        Ok(())
    }

    /// Whether the input has two channels
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// The mode actually configured on LAME.
    ///
    /// Mono input forces mono output, and `Mono` on stereo input downmixes.
    pub fn effective_mode(&self) -> StereoMode {
        if self.is_stereo() {
            self.mode
        } else {
            StereoMode::Mono
        }
    }

    pub(crate) fn lame_mode(&self) -> Mode {
        self.effective_mode().to_lame()
    }

    pub(crate) fn lame_bitrate(&self) -> EncoderResult<Bitrate> {
        let bitrate = match self.bitrate_kbps {
            64 => Bitrate::Kbps64,
            96 => Bitrate::Kbps96,
            128 => Bitrate::Kbps128,
            160 => Bitrate::Kbps160,
            192 => Bitrate::Kbps192,
            256 => Bitrate::Kbps256,
            320 => Bitrate::Kbps320,
            other => return Err(EncoderError::UnsupportedBitrate(other)),
        };
        Ok(bitrate)
    }

    pub(crate) fn lame_quality(&self) -> EncoderResult<Quality> {
        let quality = match self.quality {
            0 => Quality::Best,
            1 => Quality::SecondBest,
            2 => Quality::NearBest,
            3 => Quality::VeryNice,
            4 => Quality::Nice,
            5 => Quality::Good,
            6 => Quality::Decent,
            7 => Quality::Ok,
            8 => Quality::SecondWorst,
            9 => Quality::Worst,
            other => return Err(EncoderError::InvalidQuality(other)),
        };
        Ok(quality)
    }
}
