//! GIF rendering through an external `ffmpeg`.
//!
//! Output files are named after a [`ClipId`] of the request, so a repeated
//! request is served from the render directory without re-encoding.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use uuid::Uuid;

use crate::{
    clip_id::ClipId,
    error::{Error, Result},
};

pub const DEFAULT_FONT: &str =
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Renders caption clips into a directory of cached GIFs.
#[derive(Debug, Clone)]
pub struct Renderer {
    output_dir: PathBuf,
    font: PathBuf,
    ffmpeg: PathBuf,
}

impl Renderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            font: PathBuf::from(DEFAULT_FONT),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }

    pub fn with_font(mut self, font: impl Into<PathBuf>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    /// Where the GIF for `id` lives once rendered.
    pub fn output_path(&self, id: &ClipId) -> PathBuf {
        self.output_dir.join(format!("{id}.gif"))
    }

    /// Render `text` over `source` between `start` and `end` and return the
    /// path of the GIF.
    pub async fn render(
        &self,
        source: &Path,
        text: &str,
        start: Duration,
        end: Duration,
    ) -> Result<PathBuf> {
        if end < start {
            return Err(Error::Render(format!(
                "clip ends before it starts ({start:?} > {end:?})"
            )));
        }

        let id = ClipId::new(source, text, start, end);
        let output = self.output_path(&id);
        if tokio::fs::try_exists(&output).await? {
            tracing::debug!(clip = %id, "reusing rendered clip");
            return Ok(output);
        }

        // ffmpeg runs inside the render directory, so the source must not
        // be relative to ours.
        let source = std::path::absolute(source)?;

        // Each encode stages under its own name so concurrent requests for
        // one clip never share a partial file.
        let stem = format!("{id}.{}", Uuid::new_v4().simple());
        let text_file = self.output_dir.join(format!("{stem}.txt"));
        let partial = self.output_dir.join(format!("{stem}.gif.part"));
        tokio::fs::write(&text_file, text).await?;

        tracing::info!(
            clip = %id,
            source = %source.display(),
            "rendering clip"
        );
        let result = tokio::process::Command::new(&self.ffmpeg)
            .args(self.ffmpeg_args(&source, &stem, start, end))
            .current_dir(&self.output_dir)
            .output()
            .await;
        remove_if_present(&text_file).await;

        let out = result.map_err(|e| {
            Error::Render(format!(
                "failed to run {}: {e}",
                self.ffmpeg.display()
            ))
        })?;
        if !out.status.success() {
            remove_if_present(&partial).await;
            let stderr = String::from_utf8_lossy(&out.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.ffmpeg.display(),
                out.status,
                tail.join("\n")
            )));
        }

        // Only a finished encode is moved into the cache name.
        tokio::fs::rename(&partial, &output).await?;
        Ok(output)
    }

    /// Arguments passed to ffmpeg, relative to the render directory.
    ///
    /// `stem` names the staged `<stem>.txt` and the `<stem>.gif.part`
    /// output.
    pub fn ffmpeg_args(
        &self,
        source: &Path,
        stem: &str,
        start: Duration,
        end: Duration,
    ) -> Vec<OsString> {
        let duration = end.saturating_sub(start);
        let filter = format!(
            "drawtext=fontfile={}: textfile={stem}.txt: fontcolor=white: \
             fontsize=24: box=1: boxcolor=black@0.5: boxborderw=5: \
             x=(w-text_w)/2: y=300",
            self.font.display()
        );

        vec![
            "-y".into(),
            "-ss".into(),
            format!("{:.6}", start.as_secs_f64()).into(),
            "-t".into(),
            format!("{:.6}", duration.as_secs_f64()).into(),
            "-i".into(),
            source.as_os_str().to_owned(),
            "-vf".into(),
            filter.into(),
            "-f".into(),
            "gif".into(),
            format!("{stem}.gif.part").into(),
        ]
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to remove staging file"
        ),
    }
}
