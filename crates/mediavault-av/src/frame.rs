//! First-frame extraction with the ffmpeg CLI.

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Decode the first video frame of `input` and return it as PNG bytes.
///
/// `ffmpeg` is the program to run, either a bare name resolved on `PATH`
/// or a path to the executable.
pub fn extract_first_frame(ffmpeg: &str, input: &Path) -> Result<Vec<u8>> {
    if !input.exists() {
        return Err(Error::MissingInput(input.to_path_buf()));
    }

    let output = Command::new(ffmpeg)
        .args(["-v", "error", "-nostdin", "-i"])
        .arg(input)
        .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_unavailable(ffmpeg)
            } else {
                Error::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed(ffmpeg, stderr.trim()));
    }

    if output.stdout.is_empty() {
        return Err(Error::tool_failed(ffmpeg, "no video frame decoded"));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Extracted first frame of {:?} ({} bytes)",
        input,
        output.stdout.len()
    );

    Ok(output.stdout)
}
