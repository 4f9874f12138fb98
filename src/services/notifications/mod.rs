//! Completion notification with pluggable delivery providers.
//!
//! `CompletionNotifier` builds the event; a `NotificationProvider` delivers
//! it. `EventGridProvider` is the HTTP implementation.

mod completion_notifier;
mod event_grid_provider;
mod provider;

pub use completion_notifier::CompletionNotifier;
pub use event_grid_provider::{EventGridProvider, SAS_KEY_HEADER};
pub use provider::{DeliveryReceipt, NotificationProvider};
