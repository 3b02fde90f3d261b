//! Sound playback for session completion.
//!
//! This module provides:
//!
//! - The [`SoundPlayer`] abstraction and its implementations
//! - Sound source selection (custom file or built-in chime)
//! - [`CompletionSound`], a timer subscriber that plays once per finished session
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ CompletionSound  │────▶│   SoundPlayer    │
//! │  (subscriber)    │     ├──────────────────┤
//! └──────────────────┘     │ RodioSoundPlayer │ ← `audio` feature
//!                          │ BellPlayer       │ ← fallback
//!                          └──────────────────┘
//! ```
//!
//! Audio is optional: without the `audio` feature, or when no output device
//! can be opened, the terminal bell is used.

mod completion;
mod error;
mod player;
mod source;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use completion::CompletionSound;
pub use error::SoundError;
#[cfg(feature = "audio")]
pub use player::RodioSoundPlayer;
pub use player::{default_player, BellPlayer};
pub use source::{SoundSource, SUPPORTED_EXTENSIONS};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Rc<P> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        (**self).play(source)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: RefCell<Vec<SoundSource>>,
    available: Cell<bool>,
    should_fail: Cell<bool>,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: RefCell::new(Vec::new()),
            available: Cell::new(true),
            should_fail: Cell::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.set(should_fail);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.borrow().len()
    }

    #[must_use]
    pub fn play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.borrow_mut().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if !self.available.get() {
            return Err(SoundError::DeviceNotAvailable("Mock device unplugged".to_string()));
        }
        if self.should_fail.get() {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.borrow_mut().push(source.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }
}
