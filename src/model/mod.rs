//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors. Layout
//! behavior lives in [`crate::layout`].

pub mod breakpoint;
pub mod error;
pub mod item;
pub mod layout_result;
pub mod owner_state;
pub mod responsive;

// Re-export for convenience
pub use breakpoint::{Breakpoint, Breakpoints, UnknownBreakpoint};
pub use error::{AppError, SceneError};
pub use item::{
    BoxSize, Edges, InvalidItemId, Item, ItemId, ItemKind, ItemMeasurement, NestedImage,
};
pub use layout_result::{ColumnCount, InvalidColumnCount, LayoutResult};
pub use owner_state::{MasonryProps, OwnerState, SsrDefaults};
pub use responsive::{BreakpointResolver, Resolved, ResponsiveValue};
