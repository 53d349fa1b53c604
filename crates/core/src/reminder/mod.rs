//! Due-time reminders
//!
//! A poller scans open tasks on a fixed interval and fires one notification
//! per task once it enters the lookahead window.

mod notifier;
mod poller;

pub use notifier::*;
pub use poller::*;
