//! Scene files: the item sequence to lay out plus optional prop overrides.
//!
//! Scenes are JSON documents:
//!
//! ```json
//! {
//!   "props": { "columns": 3, "spacing": { "base": 1, "md": 2 } },
//!   "items": [
//!     { "height": 150, "label": "hero" },
//!     { "id": "photo", "height": 40, "images": [{ "height": 60, "loaded": false }] }
//!   ]
//! }
//! ```

use crate::model::{ColumnCount, ItemId, MasonryProps, ResponsiveValue, SceneError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Heights of the built-in demo scene, in px.
pub const DEMO_HEIGHTS: [f64; 10] = [150.0, 30.0, 90.0, 70.0, 90.0, 100.0, 150.0, 30.0, 50.0, 80.0];

/// Raw JSON structure for deserializing scenes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScene {
    #[serde(default)]
    props: Option<PropsOverride>,
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawItem {
    #[serde(default)]
    id: Option<String>,
    height: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawImage {
    height: f64,
    #[serde(default = "default_loaded")]
    loaded: bool,
}

fn default_loaded() -> bool {
    true
}

/// Props written in a scene; each present field overrides configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropsOverride {
    /// Column count override.
    #[serde(default)]
    pub columns: Option<ResponsiveValue<ColumnCount>>,
    /// Spacing override.
    #[serde(default)]
    pub spacing: Option<ResponsiveValue<f64>>,
    /// Placeholder column count override.
    #[serde(default)]
    pub default_columns: Option<ColumnCount>,
    /// Placeholder height override.
    #[serde(default)]
    pub default_height: Option<f64>,
    /// Placeholder spacing override.
    #[serde(default)]
    pub default_spacing: Option<f64>,
}

impl PropsOverride {
    /// `props` with every key set here replaced.
    pub fn apply(&self, mut props: MasonryProps) -> MasonryProps {
        if let Some(columns) = &self.columns {
            props.columns = columns.clone();
        }
        if let Some(spacing) = &self.spacing {
            props.spacing = spacing.clone();
        }
        props.default_columns = self.default_columns.or(props.default_columns);
        props.default_height = self.default_height.or(props.default_height);
        props.default_spacing = self.default_spacing.or(props.default_spacing);
        props
    }
}

/// An image inside a scene item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneImage {
    /// Natural height in px once loaded.
    pub height: f64,
    /// Whether the image has loaded.
    pub loaded: bool,
}

/// One validated scene item.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    /// Item identity.
    pub id: ItemId,
    /// Content height in px, excluding images.
    pub height: f64,
    /// Text shown in the preview.
    pub label: String,
    /// Nested images.
    pub images: Vec<SceneImage>,
}

impl SceneItem {
    /// Height including every loaded image.
    pub fn rendered_height(&self) -> f64 {
        self.height
            + self
                .images
                .iter()
                .filter(|image| image.loaded)
                .map(|image| image.height)
                .sum::<f64>()
    }

    /// Whether any image is still loading.
    pub fn has_pending_images(&self) -> bool {
        self.images.iter().any(|image| !image.loaded)
    }
}

/// A validated, non-empty scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Prop overrides carried by the scene.
    pub props: PropsOverride,
    /// Items in document order.
    pub items: Vec<SceneItem>,
}

impl Scene {
    /// Ten items of mixed height with responsive spacing and static defaults.
    pub fn demo() -> Self {
        let items = DEMO_HEIGHTS
            .iter()
            .enumerate()
            .map(|(index, height)| SceneItem {
                id: ItemId::from_position(index),
                height: *height,
                label: (index + 1).to_string(),
                images: Vec::new(),
            })
            .collect();
        let props = PropsOverride {
            columns: Some(ResponsiveValue::Scalar(ColumnCount::new(4))),
            spacing: Some(ResponsiveValue::Array(vec![1.0, 2.0, 3.0])),
            default_columns: Some(ColumnCount::new(4)),
            default_height: Some(450.0),
            default_spacing: Some(1.0),
        };
        Self { props, items }
    }

    /// Parse and validate scene JSON.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let raw: RawScene = serde_json::from_str(json)?;
        if raw.items.is_empty() {
            return Err(SceneError::Empty);
        }

        // id -> (1-based position, given explicitly)
        let mut claimed: BTreeMap<ItemId, (usize, bool)> = BTreeMap::new();
        let mut items = Vec::with_capacity(raw.items.len());
        for (index, item) in raw.items.into_iter().enumerate() {
            let position = index + 1;
            let invalid = |reason: String| SceneError::InvalidItem { position, reason };

            if !(item.height.is_finite() && item.height >= 0.0) {
                return Err(invalid(format!("height must be a non-negative number, got {}", item.height)));
            }
            if let Some(image) = item
                .images
                .iter()
                .find(|image| !(image.height.is_finite() && image.height > 0.0))
            {
                return Err(invalid(format!("image height must be positive, got {}", image.height)));
            }

            let explicit = item.id.is_some();
            let id = match item.id {
                Some(id) => ItemId::new(id).map_err(|e| invalid(e.to_string()))?,
                None => ItemId::from_position(index),
            };
            if let Some(&(owner, owner_explicit)) = claimed.get(&id) {
                return Err(invalid(id_clash(&id, explicit, owner, owner_explicit)));
            }
            claimed.insert(id.clone(), (position, explicit));

            items.push(SceneItem {
                label: item.label.unwrap_or_else(|| position.to_string()),
                id,
                height: item.height,
                images: item
                    .images
                    .into_iter()
                    .map(|image| SceneImage {
                        height: image.height,
                        loaded: image.loaded,
                    })
                    .collect(),
            });
        }

        Ok(Self {
            props: raw.props.unwrap_or_default(),
            items,
        })
    }

    /// Mark every image as loaded. Returns how many changed.
    pub fn load_images(&mut self) -> usize {
        let mut loaded = 0;
        for image in self.items.iter_mut().flat_map(|item| item.images.iter_mut()) {
            if !image.loaded {
                image.loaded = true;
                loaded += 1;
            }
        }
        loaded
    }
}

/// Why two items cannot share `id`. Items without an id are named
/// `item-<position>`, which an explicit id can shadow.
fn id_clash(id: &ItemId, explicit: bool, owner: usize, owner_explicit: bool) -> String {
    match (explicit, owner_explicit) {
        (true, true) => format!("duplicate id {id}, already used by item {owner}"),
        (true, false) => format!(
            "id {id} clashes with the default id of item {owner}; items without an id are named item-<position>"
        ),
        (false, _) => format!(
            "default id {id} is already taken by item {owner}; give this item an explicit id or rename item {owner}"
        ),
    }
}

/// Read a scene from disk.
pub fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Scene::from_json(&contents)
}
