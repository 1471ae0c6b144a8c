//! Collaborator implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `file_store`: JSON file backed [`SettingsStore`](crate::traits::SettingsStore) (requires `web` feature)

pub mod mock;

#[cfg(feature = "web")]
pub mod file_store;

pub use mock::*;

#[cfg(feature = "web")]
pub use file_store::*;
