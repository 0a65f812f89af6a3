//! Shared UI components.

pub mod error;

pub use error::ErrorScreen;
