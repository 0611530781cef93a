use crate::core::gateway::Gateway;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Types that talk to the khl server through a shared [`Gateway`].
///
/// For example a message can reply through its gate, and a guild can fetch its role list.
pub trait Requestable {
    fn gate(&self) -> &Arc<Gateway>;
}

/// Whether an entity holds its full representation yet.
///
/// Starts unloaded; there is no way back once [`LoadState::mark_loaded`] has been called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadState {
    loaded: bool,
}

impl LoadState {
    pub const fn new() -> Self {
        Self { loaded: false }
    }

    pub fn is_loaded(self) -> bool {
        self.loaded
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}

/// Entities that can exist before their full data has been fetched.
///
/// These are usually built internally from partial data, e.g. a channel known only by the
/// id carried on a message. Implementations of `load` must fetch through
/// [`Requestable::gate`], apply the result and mark themselves loaded, and must leave the
/// loaded flag untouched when the fetch fails.
#[async_trait]
pub trait LazyLoadable: Requestable + Send {
    /// Fetches the full representation from the server. Always hits the server, so it
    /// doubles as a refresh for entities that are already loaded.
    async fn load(&mut self) -> Result<()>;

    fn is_loaded(&self) -> bool;

    /// Loads only if not loaded yet.
    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        self.load().await
    }
}
