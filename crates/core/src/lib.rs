//! Core library for Duetrack
//!
//! This crate contains the task tracker's business logic, including:
//! - Task model, persistence and the ordered task store
//! - Filtered/searchable views
//! - Due-time reminders
//! - CSV export and the application object tying it together

pub mod clock;
pub mod error;
pub mod export;
pub mod locale;
pub mod reminder;
pub mod task;
pub mod tracker;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
