//! Audio cues.
//!
//! Playback is best-effort: a missing file, an unreadable file, or an
//! unavailable output device is logged and skipped. The check-in loop never
//! sees an audio error.
//!
//! Sound files resolve against the install dir (the executable's directory),
//! matching a layout where the cues ship next to the binary. The ping cue
//! path can be overridden per config/flag; an absolute override is used
//! as-is.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::AudioError;

/// The audio cues the loop can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Played once when the loop starts.
    Startup,
    /// Played with every check-in prompt.
    Ping,
    /// Played once when the loop ends.
    End,
    /// Played before an unrecognized-reply abort.
    Error,
}

impl Cue {
    /// Default file name for this cue.
    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Startup => "startup.mp3",
            Cue::Ping => "ping.mp3",
            Cue::End => "end.mp3",
            Cue::Error => "error.mp3",
        }
    }
}

/// Plays audio cues for the check-in loop.
pub trait SoundPlayer {
    /// Play a cue to completion. Best-effort: failures are logged, not
    /// returned.
    fn play(&self, cue: Cue);
}

/// rodio-backed cue player.
pub struct RodioPlayer {
    /// Override for the ping cue (`sound` config key / `--sound` flag).
    ping_sound: PathBuf,
}

impl RodioPlayer {
    pub fn new(ping_sound: impl Into<PathBuf>) -> Self {
        Self {
            ping_sound: ping_sound.into(),
        }
    }

    /// Resolve a cue to the path that will be opened.
    fn resolve(&self, cue: Cue) -> PathBuf {
        let name: &Path = match cue {
            Cue::Ping => self.ping_sound.as_path(),
            other => Path::new(other.file_name()),
        };
        if name.is_absolute() {
            return name.to_path_buf();
        }
        install_dir().join(name)
    }

    /// Open, decode, and play a sound file to completion.
    fn play_file(path: &Path) -> Result<(), AudioError> {
        if !path.is_file() {
            return Err(AudioError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| AudioError::DecodeFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let source = rodio::Decoder::new(BufReader::new(file)).map_err(|e| {
            AudioError::DecodeFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        let sink =
            rodio::Sink::try_new(&handle).map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl SoundPlayer for RodioPlayer {
    fn play(&self, cue: Cue) {
        let path = self.resolve(cue);
        if let Err(e) = Self::play_file(&path) {
            log::warn!("skipping {cue:?} cue: {e}");
        }
    }
}

/// Directory sound files are resolved against: the executable's own
/// directory, falling back to the current working directory.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
