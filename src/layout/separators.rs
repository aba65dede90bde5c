//! Column terminators.
//!
//! The container flows items top-to-bottom and wraps into the next column when
//! it runs out of height. Columns of unequal height would bleed into each other,
//! so one zero-size, full-basis separator is placed at the end of every column
//! but the last, using the same order mechanism as the items.

use crate::model::{Item, ItemId};
use serde::Serialize;

/// A zero-size entry forced to the end of column `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Separator {
    /// Stable separator identity.
    pub id: ItemId,
    /// Column this separator terminates.
    pub order: usize,
}

impl Separator {
    /// The separator as a child of the container, for trees that render it.
    pub fn to_item(&self) -> Item {
        Item::separator(self.order)
    }
}

/// `count` separators, the `k`-th (1-based) ordered into column `k`.
pub fn line_breaks(count: usize) -> Vec<Separator> {
    (1..=count)
        .map(|order| Separator {
            id: ItemId::separator(order),
            order,
        })
        .collect()
}
