//! Trait definitions for the collaborators the face engine drives.
//!
//! The engine never talks to a platform directly. Everything outside the
//! angle/scheduling/configuration core goes through one of these seams so the
//! whole face can run against the mocks in [`crate::hal::mock`].
//!
//! # Submodules
//!
//! - `display`: the compositor ([`RenderSurface`]) and the resources it owns
//! - `storage`: the persistent key-value store ([`SettingsStore`])
//! - `clock`: the platform wall clock ([`WallClock`])

pub mod clock;
pub mod display;
pub mod storage;

pub use clock::*;
pub use display::*;
pub use storage::*;
