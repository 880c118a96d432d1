use std::fmt;

use serde::{Deserialize, Serialize};

/// Container format of a rendered artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Mp4,
    Mov,
    Mkv,
    Webm,
    Avi,
    /// HTTP live streaming playlist (`.m3u8`).
    Hls,
}

impl VideoFormat {
    /// Guesses the format from the URI extension, ignoring any query string.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "mp4" | "m4v" => Some(VideoFormat::Mp4),
            "mov" => Some(VideoFormat::Mov),
            "mkv" => Some(VideoFormat::Mkv),
            "webm" => Some(VideoFormat::Webm),
            "avi" => Some(VideoFormat::Avi),
            "m3u8" => Some(VideoFormat::Hls),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mov => "mov",
            VideoFormat::Mkv => "mkv",
            VideoFormat::Webm => "webm",
            VideoFormat::Avi => "avi",
            VideoFormat::Hls => "hls",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single artifact produced by a successful run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputVideo {
    pub uri: String,
    /// Seconds.
    pub duration: f64,
    pub format: VideoFormat,
    pub clip_count: usize,
}

impl OutputVideo {
    /// `MM:SS`, rounded to the nearest second.
    pub fn formatted_duration(&self) -> String {
        let total = self.duration.max(0.0).round() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
