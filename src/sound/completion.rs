//! Completion sound subscriber.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error, warn};

use super::{SoundPlayer, SoundSource};
use crate::timer::{SessionTimer, Subscriber};
use crate::types::Snapshot;

type PlayerFactory = Box<dyn Fn() -> Box<dyn SoundPlayer>>;

/// Plays a sound once each time a session becomes done.
///
/// The player is created on the first running snapshot rather than at
/// construction, so an idle timer never opens the audio device.
pub struct CompletionSound {
    source: SoundSource,
    factory: PlayerFactory,
    player: RefCell<Option<Box<dyn SoundPlayer>>>,
    was_done: Cell<bool>,
}

impl CompletionSound {
    /// Creates a subscriber that builds its player with `factory`.
    pub fn new(
        source: SoundSource,
        factory: impl Fn() -> Box<dyn SoundPlayer> + 'static,
    ) -> Self {
        Self {
            source,
            factory: Box::new(factory),
            player: RefCell::new(None),
            was_done: Cell::new(false),
        }
    }

    /// Creates the subscriber and attaches it to `timer`.
    pub fn attach(
        timer: &SessionTimer,
        source: SoundSource,
        factory: impl Fn() -> Box<dyn SoundPlayer> + 'static,
    ) -> Rc<Self> {
        let sound = Rc::new(Self::new(source, factory));
        sound.was_done.set(timer.snapshot().done);
        timer.subscribe(Rc::clone(&sound) as Rc<dyn Subscriber<Snapshot>>);
        sound
    }

    /// Returns true once the player has been created.
    pub fn is_initialized(&self) -> bool {
        self.player.borrow().is_some()
    }

    fn ensure_player(&self) {
        let mut player = self.player.borrow_mut();
        if player.is_none() {
            debug!("Initializing completion sound player");
            *player = Some((self.factory)());
        }
    }

    fn play(&self) {
        self.ensure_player();
        let result = match self.player.borrow().as_ref() {
            Some(player) => player.play(&self.source),
            None => return,
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_device_error() => {
                // Rebuilt on the next running snapshot.
                warn!("Audio device lost, player will be recreated: {}", e);
                self.player.borrow_mut().take();
            }
            Err(e) => error!("Failed to play completion sound: {} ({})", e, e.suggestion()),
        }
    }
}

impl Subscriber<Snapshot> for CompletionSound {
    fn update(&self, snapshot: &Snapshot) {
        if snapshot.is_running() {
            self.ensure_player();
        }

        let was_done = self.was_done.replace(snapshot.done);
        if snapshot.done && !was_done {
            self.play();
        }
    }
}
