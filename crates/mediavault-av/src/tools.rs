//! Detection of the external programs used for video thumbnails.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// What was found when running a program with `-version`.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Program as invoked (bare name or path).
    pub name: String,
    pub available: bool,
    /// First line of the version banner.
    pub version: Option<String>,
    /// Resolved executable, when found on `PATH`.
    pub path: Option<PathBuf>,
}

impl ToolInfo {
    fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        }
    }

    /// The version number from an ffmpeg-style banner, e.g. `6.1.1` from
    /// `ffmpeg version 6.1.1 Copyright (c) ...`.
    pub fn version_number(&self) -> Option<&str> {
        self.version.as_deref().and_then(parse_version_number)
    }
}

fn parse_version_number(banner: &str) -> Option<&str> {
    let mut words = banner.split_whitespace();
    words.find(|w| *w == "version")?;
    words.next()
}

/// Run `program -version` and report whether it works.
///
/// ```no_run
/// use mediavault_av::check_tool;
///
/// let info = check_tool("ffmpeg");
/// if let Some(version) = info.version_number() {
///     println!("ffmpeg {}", version);
/// }
/// ```
pub fn check_tool(program: &str) -> ToolInfo {
    let output = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    let Ok(output) = output else {
        return ToolInfo::missing(program);
    };
    if !output.status.success() {
        return ToolInfo::missing(program);
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty());

    ToolInfo {
        name: program.to_string(),
        available: true,
        version,
        path: which::which(program).ok(),
    }
}

/// Check the programs used for video thumbnails.
pub fn check_tools() -> Vec<ToolInfo> {
    vec![check_tool("ffmpeg")]
}
