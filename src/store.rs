//! Observable UI state: an immutable snapshot replaced wholesale on every
//! transition and broadcast synchronously to subscribers.

mod snapshot;
mod state_store;

pub use snapshot::UiState;
pub use state_store::{PERMISSION_DENIED_MESSAGE, StateStore, SubscriptionId};
