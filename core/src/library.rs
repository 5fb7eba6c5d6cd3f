use parking_lot::Mutex;
use tracing::{debug, warn};

/// Process-wide initialization state of an engine library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryState {
    Uninitialized,
    Ready,
    Failed(String),
}

/// Remembers whether an engine's native library has been loaded.
///
/// The first caller of [`Library::ensure_loaded`] runs the loader under the
/// lock; later callers see the recorded outcome. A failed load is sticky.
pub struct Library {
    name: &'static str,
    state: Mutex<LibraryState>,
}

impl Library {
    pub const fn new(name: &'static str) -> Self { Self { name, state: parking_lot::const_mutex(LibraryState::Uninitialized) } }

    pub fn state(&self) -> LibraryState { self.state.lock().clone() }

    pub fn ensure_loaded(&self, load: impl FnOnce() -> Result<(), String>) -> Result<(), String> {
        let mut state = self.state.lock();
        match &*state {
            LibraryState::Ready => return Ok(()),
            LibraryState::Failed(reason) => return Err(reason.clone()),
            LibraryState::Uninitialized => {}
        }
        match load() {
            Ok(()) => {
                debug!("library {} loaded", self.name);
                *state = LibraryState::Ready;
                Ok(())
            }
            Err(reason) => {
                warn!("library {} failed to load: {}", self.name, reason);
                *state = LibraryState::Failed(reason.clone());
                Err(reason)
            }
        }
    }
}
