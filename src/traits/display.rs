//! Compositor abstraction for the face's drawable resources.
//!
//! This module defines the [`RenderSurface`] trait. The compositor already
//! knows how to rasterize bitmaps, shapes and text; the face engine only
//! allocates a small fixed set of resources per generation, updates the date
//! text and signals which resource has to be redrawn.

use crate::hands::Rect;

/// Opaque handle to a resource allocated by a [`RenderSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(pub u32);

/// Background artwork selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Background {
    /// Light markings on a dark dial.
    #[default]
    Normal,
    /// Dark markings on a light dial.
    Inverted,
}

/// Kind of drawable resource a generation owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    /// Full-screen background bitmap.
    Background(Background),
    /// Canvas the hands are drawn on. Redrawn through the draw callback.
    HandsLayer,
    /// Text field holding the day of month.
    DateLabel,
}

/// Request to allocate one resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    /// What to allocate.
    pub kind: ResourceKind,
    /// Where it sits on screen.
    pub frame: Rect,
}

impl ResourceSpec {
    /// Creates a resource request.
    pub const fn new(kind: ResourceKind, frame: Rect) -> Self {
        Self { kind, frame }
    }
}

/// Compositor trait.
///
/// Implementors own the actual bitmaps, layers and text fields. Resources are
/// created and destroyed only by [`Generation`](crate::generation::Generation),
/// always all together.
///
/// # Example
///
/// ```ignore
/// use aviator_face::traits::{RenderSurface, ResourceId, ResourceSpec};
///
/// struct Compositor { /* layer tree */ }
///
/// impl RenderSurface for Compositor {
///     type Error = ();
///
///     fn create(&mut self, spec: &ResourceSpec) -> Result<ResourceId, ()> {
///         // allocate bitmap/layer/text field, attach to the window
///         Ok(ResourceId(1))
///     }
///     fn destroy(&mut self, id: ResourceId) { /* detach and free */ }
///     fn set_text(&mut self, id: ResourceId, text: &str) { /* update text field */ }
///     fn mark_dirty(&mut self, id: ResourceId) { /* schedule redraw */ }
/// }
/// ```
pub trait RenderSurface {
    /// Error type for resource allocation.
    type Error: core::fmt::Debug;

    /// Allocates a resource and attaches it to the window.
    fn create(&mut self, spec: &ResourceSpec) -> Result<ResourceId, Self::Error>;

    /// Detaches and frees a resource. Called exactly once per created id.
    fn destroy(&mut self, id: ResourceId);

    /// Replaces the content of a text resource. The compositor redraws it.
    fn set_text(&mut self, id: ResourceId, text: &str);

    /// Signals that a resource must be redrawn on the next frame.
    fn mark_dirty(&mut self, id: ResourceId);
}
