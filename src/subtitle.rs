//! Subtitle discovery and SubRip parsing.
//!
//! A video at `show/s01e01.mkv` is expected to have its English track at
//! `show/s01e01.en.srt`: the last three characters of the video path are
//! replaced with `en.srt`.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{Error, Result};

/// A parsed subtitle cue, before it is given an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start: Duration,
    pub end: Duration,
    pub lines: Vec<String>,
}

/// Produces the ordered cues for a video file.
pub trait SubtitleSource: Sync {
    fn parse(&self, video: &Path) -> Result<Vec<Cue>>;
}

/// Reads the `.en.srt` file that sits next to each video.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtFiles;

impl SubtitleSource for SrtFiles {
    fn parse(&self, video: &Path) -> Result<Vec<Cue>> {
        let path = sibling_srt_path(video).ok_or_else(|| Error::Subtitle {
            path: video.to_path_buf(),
            message: "path too short to derive a subtitle file".into(),
        })?;
        let bytes = std::fs::read(&path)?;
        parse_srt(&String::from_utf8_lossy(&bytes)).map_err(|message| {
            Error::Subtitle { path, message }
        })
    }
}

/// Swap the final three characters of `video` for `en.srt`.
pub fn sibling_srt_path(video: &Path) -> Option<PathBuf> {
    let raw = video.to_string_lossy();
    let cut = raw.len().checked_sub(3)?;
    let stem = raw.get(..cut)?;
    Some(PathBuf::from(format!("{stem}en.srt")))
}

/// Parse SubRip content into cues, in file order.
///
/// Cues are separated by blank lines. The numeric counter line is
/// optional; the timing line is not.
pub fn parse_srt(content: &str) -> std::result::Result<Vec<Cue>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut cues = Vec::new();
    let mut lines = content.lines().enumerate().peekable();

    loop {
        // Skip blank lines between cues.
        while lines.next_if(|(_, l)| l.trim().is_empty()).is_some() {}

        let Some((lineno, first)) = lines.next() else {
            break;
        };

        let timing = if first.contains("-->") {
            (lineno, first)
        } else {
            match lines.next() {
                Some(next) => next,
                None => {
                    return Err(format!(
                        "cue at line {} has no timing line",
                        lineno + 1
                    ));
                }
            }
        };

        let (start, end) = parse_timing(timing.1).ok_or_else(|| {
            format!("invalid timing line {}: {:?}", timing.0 + 1, timing.1)
        })?;

        let mut text = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty())
        {
            text.push(line.to_string());
        }

        cues.push(Cue {
            start,
            end,
            lines: text,
        });
    }

    Ok(cues)
}

fn parse_timing(line: &str) -> Option<(Duration, Duration)> {
    let (start, rest) = line.split_once("-->")?;
    // Some files carry position hints after the end timestamp.
    let end = rest.split_whitespace().next()?;
    let start = parse_timestamp(start.trim())?;
    let end = parse_timestamp(end)?;
    (end >= start).then_some((start, end))
}

/// Parse `HH:MM:SS,mmm` (a `.` separator is accepted too).
fn parse_timestamp(raw: &str) -> Option<Duration> {
    let (clock, millis) = raw.split_once([',', '.']).unwrap_or((raw, "0"));
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;
    if millis >= 1000 {
        return None;
    }

    let secs = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    Duration::from_secs(secs).checked_add(Duration::from_millis(millis))
}
