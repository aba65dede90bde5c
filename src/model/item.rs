//! Items placed by the masonry layout and their measurements.

use serde::{Deserialize, Serialize};

/// Stable identity of a rendered item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Error returned when constructing an [`ItemId`] from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Item id must not be empty")]
pub struct InvalidItemId;

impl ItemId {
    /// Smart constructor rejecting empty identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidItemId> {
        let id = id.into();
        if id.is_empty() {
            Err(InvalidItemId)
        } else {
            Ok(Self(id))
        }
    }

    /// Identity derived from a 0-based document position.
    pub fn from_position(index: usize) -> Self {
        Self(format!("item-{}", index + 1))
    }

    /// Separator identity for the `k`-th column boundary (1-based).
    pub fn separator(k: usize) -> Self {
        Self(format!("line-break-{k}"))
    }

    /// Borrow the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Margins around a box, in px.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges {
    /// Top edge (px).
    pub top: f64,
    /// Right edge (px).
    pub right: f64,
    /// Bottom edge (px).
    pub bottom: f64,
    /// Left edge (px).
    pub left: f64,
}

impl Edges {
    /// Same margin on all four sides.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Left + right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top + bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Border-box size reported by the size observation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxSize {
    /// Border-box width (px).
    pub width: f64,
    /// Border-box height (px).
    pub height: f64,
}

impl BoxSize {
    /// Box of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An image nested directly inside an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NestedImage {
    /// Rendered height in px; zero while the image has not loaded.
    pub rendered_height: f64,
}

impl NestedImage {
    /// A zero rendered height means the image has not loaded.
    pub fn is_loaded(&self) -> bool {
        self.rendered_height > 0.0
    }
}

/// Geometry read from the rendering tree for one item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemMeasurement {
    /// Content height in px, without margins.
    pub height: f64,
    /// Content width in px, without margins.
    pub width: f64,
    /// Outer margins.
    pub margin: Edges,
    /// Directly nested images, in document order.
    pub images: Vec<NestedImage>,
}

impl ItemMeasurement {
    /// Width and height as a box size.
    pub fn box_size(&self) -> BoxSize {
        BoxSize::new(self.width, self.height)
    }
}

/// Role of a child inside the masonry container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Real content that gets balanced into a column.
    Content,
    /// Zero-size column terminator; never measured.
    Separator,
}

/// One child of the masonry container, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity.
    pub id: ItemId,
    /// Content or separator.
    pub kind: ItemKind,
    /// Latest measurement.
    pub measurement: ItemMeasurement,
}

impl Item {
    /// A content item with its measurement.
    pub fn content(id: ItemId, measurement: ItemMeasurement) -> Self {
        Self {
            id,
            kind: ItemKind::Content,
            measurement,
        }
    }

    /// The zero-size separator ending column `k`.
    pub fn separator(k: usize) -> Self {
        Self {
            id: ItemId::separator(k),
            kind: ItemKind::Separator,
            measurement: ItemMeasurement::default(),
        }
    }

    /// Whether this is a column separator.
    pub fn is_separator(&self) -> bool {
        self.kind == ItemKind::Separator
    }
}
