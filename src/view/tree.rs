//! Scene items laid out by the currently applied style.
//!
//! Plays the part of a browser's rendering tree: it knows the viewport, applies
//! the last painted [`StyleDescriptor`] at the active breakpoint, and reports
//! the resulting item boxes back to the layout engine.

use crate::layout::{MasonryFrame, StyleDescriptor, VisualTree};
use crate::model::{
    BoxSize, Breakpoint, Breakpoints, Edges, Item, ItemId, ItemMeasurement, NestedImage,
};
use crate::scene::Scene;

/// Resolved px box for one scene item under a given style.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBox {
    /// Item identity.
    pub id: ItemId,
    /// Preview label.
    pub label: String,
    /// Content width (px).
    pub width: f64,
    /// Content height (px).
    pub height: f64,
    /// Margin on every side (px).
    pub margin: f64,
    /// Whether images are still loading.
    pub pending_images: bool,
}

/// Scene items rendered at a viewport width under the last painted styles.
#[derive(Debug, Clone)]
pub struct TerminalTree {
    scene: Scene,
    viewport_width_px: f64,
    breakpoints: Breakpoints,
    style: StyleDescriptor,
    separators: usize,
}

impl TerminalTree {
    /// Unstyled tree over `scene` at `viewport_width_px`.
    pub fn new(scene: Scene, viewport_width_px: f64, breakpoints: Breakpoints) -> Self {
        Self {
            scene,
            viewport_width_px: viewport_width_px.max(0.0),
            breakpoints,
            style: StyleDescriptor::default(),
            separators: 0,
        }
    }

    /// The scene being shown.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Viewport width in px.
    pub fn viewport_width_px(&self) -> f64 {
        self.viewport_width_px
    }

    /// Resize the viewport. Negative widths clamp to 0.
    pub fn set_viewport_width(&mut self, width_px: f64) {
        self.viewport_width_px = width_px.max(0.0);
    }

    /// Breakpoint in effect at the current viewport width.
    pub fn active_breakpoint(&self) -> Breakpoint {
        self.breakpoints.classify_width(self.viewport_width_px)
    }

    /// Adopt the styles and separators of a painted frame.
    pub fn apply(&mut self, frame: &MasonryFrame) {
        self.style = frame.style.clone();
        self.separators = frame.separators.len();
    }

    /// Mark pending images loaded. Returns how many changed.
    pub fn load_images(&mut self) -> usize {
        self.scene.load_images()
    }

    /// Container client width under `style`: the viewport widened by the
    /// container's negative margins.
    pub fn container_width_with(&self, style: &StyleDescriptor) -> f64 {
        let margin = style
            .effective(self.active_breakpoint())
            .container_margin
            .unwrap_or(0.0);
        (self.viewport_width_px - 2.0 * margin).max(0.0)
    }

    /// Item boxes under `style`, in document order.
    pub fn boxes_with(&self, style: &StyleDescriptor) -> Vec<ItemBox> {
        let block = style.effective(self.active_breakpoint());
        let container = self.container_width_with(style);
        let margin = block.item_margin.unwrap_or(0.0);
        let width = block
            .item_width
            .map_or(container - 2.0 * margin, |width| width.resolve(container))
            .max(0.0);

        self.scene
            .items
            .iter()
            .map(|item| ItemBox {
                id: item.id.clone(),
                label: item.label.clone(),
                width,
                height: item.rendered_height(),
                margin,
                pending_images: item.has_pending_images(),
            })
            .collect()
    }

    /// Current box size of every item, as an observer would report them.
    pub fn measurements(&self) -> Vec<(ItemId, BoxSize)> {
        self.boxes_with(&self.style)
            .into_iter()
            .map(|item| (item.id, BoxSize::new(item.width, item.height)))
            .collect()
    }
}

impl VisualTree for TerminalTree {
    fn container_width(&self) -> f64 {
        self.container_width_with(&self.style)
    }

    fn items(&self) -> Vec<Item> {
        let boxes = self.boxes_with(&self.style);
        let mut items: Vec<Item> = boxes
            .into_iter()
            .zip(&self.scene.items)
            .map(|(item_box, scene_item)| {
                let images = scene_item
                    .images
                    .iter()
                    .map(|image| NestedImage {
                        rendered_height: if image.loaded { image.height } else { 0.0 },
                    })
                    .collect();
                Item::content(
                    item_box.id,
                    ItemMeasurement {
                        height: item_box.height,
                        width: item_box.width,
                        margin: Edges::uniform(item_box.margin),
                        images,
                    },
                )
            })
            .collect();
        items.extend((1..=self.separators).map(Item::separator));
        items
    }
}
