//! Layout core - balancing, style resolution and size observation
//!
//! # Module Structure
//!
//! - `engine`: LayoutEngine - shortest-column-first placement over measured items
//! - `style`: StyleResolver - owner state to per-breakpoint geometry (static or measured)
//! - `spacing`: UnitConverter / ThemeSpacing - theme spacing units to px
//! - `observer`: SizeObservationController - per-item size subscriptions
//! - `separators`: column terminators derived from the line-break count
//! - `masonry`: Masonry - coordinator owning the committed layout and flushing it to a painter

pub mod engine;
pub mod masonry;
pub mod observer;
pub mod separators;
pub mod spacing;
pub mod style;

pub use engine::{ContainerGeometry, DeferReason, LayoutEngine, LayoutPass, Placement, Recompute};
pub use masonry::{FlushOutcome, Masonry, MasonryFrame, VisualTree};
pub use observer::{ObservationKey, ObservedSet, SizeObservationController, SizeObserver};
pub use separators::{line_breaks, Separator};
pub use spacing::{resolve_spacing, ThemeSpacing, UnitConverter};
pub use style::{static_descriptor, BlockStyle, ItemWidth, OrderRule, StyleDescriptor, StyleResolver};
