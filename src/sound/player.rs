//! Sound player implementations.
//!
//! With the `audio` feature, [`RodioSoundPlayer`] plays files or a synthesized
//! chime through rodio v0.20. [`BellPlayer`] rings the terminal bell and is
//! always available.

use std::io::Write;

use tracing::debug;
#[cfg(feature = "audio")]
use tracing::warn;

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

// ============================================================================
// BellPlayer
// ============================================================================

/// Rings the terminal bell. Used when no audio device is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellPlayer;

impl SoundPlayer for BellPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        debug!("Ringing terminal bell for {}", source.name());
        let mut out = std::io::stdout();
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| SoundError::PlaybackError(e.to_string()))
    }

    fn is_available(&self) -> bool {
        true
    }
}

// ============================================================================
// RodioSoundPlayer
// ============================================================================

#[cfg(feature = "audio")]
pub use rodio_player::RodioSoundPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use std::time::Duration;

    use rodio::source::{SineWave, Source};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    use super::super::error::SoundError;
    use super::super::source::SoundSource;
    use super::super::SoundPlayer;

    /// Two-note chime: (frequency Hz, length ms).
    const CHIME_NOTES: &[(f32, u64)] = &[(880.0, 180), (1320.0, 360)];
    const CHIME_VOLUME: f32 = 0.2;

    /// A sound player that uses rodio for audio playback.
    ///
    /// Playback is non-blocking; sounds continue playing in the background.
    pub struct RodioSoundPlayer {
        /// The audio output stream (must be kept alive for playback).
        _stream: OutputStream,
        /// Handle to the output stream for creating sinks.
        stream_handle: OutputStreamHandle,
    }

    impl RodioSoundPlayer {
        /// Opens the default output device.
        ///
        /// # Errors
        ///
        /// Returns `SoundError::DeviceNotAvailable` if no audio output device
        /// is available.
        pub fn new() -> Result<Self, SoundError> {
            let (stream, stream_handle) = OutputStream::try_default()
                .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

            debug!("Audio output stream initialized");

            Ok(Self {
                _stream: stream,
                stream_handle,
            })
        }

        fn sink(&self) -> Result<Sink, SoundError> {
            Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
        }

        fn play_file(&self, path: &Path) -> Result<(), SoundError> {
            let file = File::open(path)
                .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
            let decoder = Decoder::new(BufReader::new(file))
                .map_err(|e| SoundError::DecodeError(e.to_string()))?;

            let sink = self.sink()?;
            sink.append(decoder);
            sink.detach();
            Ok(())
        }

        fn play_chime(&self) -> Result<(), SoundError> {
            let sink = self.sink()?;
            for &(frequency, millis) in CHIME_NOTES {
                sink.append(
                    SineWave::new(frequency)
                        .take_duration(Duration::from_millis(millis))
                        .amplify(CHIME_VOLUME),
                );
            }
            sink.detach();
            Ok(())
        }
    }

    impl SoundPlayer for RodioSoundPlayer {
        fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
            match source {
                SoundSource::File { path } => {
                    debug!("Playing sound file: {}", path.display());
                    match self.play_file(path) {
                        Err(e) if e.should_fallback_to_chime() => {
                            warn!("Failed to play '{}': {}, falling back to chime", source.name(), e);
                            self.play_chime()
                        }
                        other => other,
                    }
                }
                SoundSource::Chime => {
                    debug!("Playing chime");
                    self.play_chime()
                }
            }
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    impl std::fmt::Debug for RodioSoundPlayer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
        }
    }
}

/// Creates the best available player.
///
/// With the `audio` feature this opens the default output device, falling
/// back to the terminal bell when that fails.
#[must_use]
pub fn default_player() -> Box<dyn SoundPlayer> {
    #[cfg(feature = "audio")]
    {
        match RodioSoundPlayer::new() {
            Ok(player) => return Box::new(player),
            Err(e) if e.is_device_error() => {
                warn!("Audio not available, using terminal bell: {}", e);
            }
            Err(e) => warn!("Audio setup failed, using terminal bell: {} ({})", e, e.suggestion()),
        }
    }

    debug!("Using terminal bell for completion sound");
    Box::new(BellPlayer)
}
