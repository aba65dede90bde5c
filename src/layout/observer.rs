//! Size-change subscriptions for rendered items.
//!
//! The controller owns the set of live subscriptions explicitly instead of
//! relying on a rendering framework's cleanup. Subscriptions are re-established
//! whenever the column config, the spacing config, or the identity of the item
//! sequence changes. Without an observer the controller is inert: nothing is
//! ever subscribed and no notification triggers a relayout.

use crate::model::{BoxSize, ColumnCount, Item, ItemId, MasonryProps, ResponsiveValue};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Size-change observation mechanism provided by the rendering environment.
pub trait SizeObserver {
    /// Start delivering size changes for `id`.
    fn observe(&mut self, id: &ItemId);
    /// Stop delivering size changes for `id`.
    fn unobserve(&mut self, id: &ItemId);
    /// Drop every subscription at once.
    fn disconnect(&mut self);
}

/// In-memory observer that records which items are watched.
///
/// Used by the terminal preview and headless rendering, where the tree itself
/// produces the notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedSet {
    observed: BTreeSet<ItemId>,
}

impl ObservedSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is watched.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.observed.contains(id)
    }

    /// Number of watched items.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

impl SizeObserver for ObservedSet {
    fn observe(&mut self, id: &ItemId) {
        self.observed.insert(id.clone());
    }

    fn unobserve(&mut self, id: &ItemId) {
        self.observed.remove(id);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
    }
}

/// Inputs whose change forces subscriptions to be re-established.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationKey {
    columns: ResponsiveValue<ColumnCount>,
    spacing: ResponsiveValue<f64>,
    items: Vec<ItemId>,
}

impl ObservationKey {
    /// Key for `props` over the content items of `items`.
    pub fn new(props: &MasonryProps, items: &[Item]) -> Self {
        Self {
            columns: props.columns.clone(),
            spacing: props.spacing.clone(),
            items: items
                .iter()
                .filter(|item| !item.is_separator())
                .map(|item| item.id.clone())
                .collect(),
        }
    }

    fn same_config(&self, other: &ObservationKey) -> bool {
        self.columns == other.columns && self.spacing == other.spacing
    }
}

/// Tracks live subscriptions and filters notifications down to real size changes.
#[derive(Debug)]
pub struct SizeObservationController<O: SizeObserver> {
    observer: Option<O>,
    /// Subscribed items with the last box size reported for each.
    subscriptions: BTreeMap<ItemId, Option<BoxSize>>,
    key: Option<ObservationKey>,
}

impl<O: SizeObserver> SizeObservationController<O> {
    /// `None` means the environment has no observation mechanism.
    pub fn new(observer: Option<O>) -> Self {
        if observer.is_none() {
            debug!("no size observer available; layout stays static");
        }
        Self {
            observer,
            subscriptions: BTreeMap::new(),
            key: None,
        }
    }

    /// Whether there is no observer at all.
    pub fn is_inert(&self) -> bool {
        self.observer.is_none()
    }

    /// The wrapped observer.
    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    /// Whether `id` has a live subscription.
    pub fn is_observing(&self, id: &ItemId) -> bool {
        self.subscriptions.contains_key(id)
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Bring subscriptions in line with `key`.
    ///
    /// A config change drops everything and resubscribes every item; an item
    /// change releases removed items and subscribes new ones. Either way the
    /// last reported sizes are forgotten. Returns `true` when anything was
    /// re-established.
    pub fn sync(&mut self, key: ObservationKey) -> bool {
        if self.observer.is_none() || self.key.as_ref() == Some(&key) {
            return false;
        }

        let config_changed = self
            .key
            .as_ref()
            .map_or(true, |previous| !previous.same_config(&key));

        if config_changed {
            self.disconnect_all();
            for id in &key.items {
                self.on_item_added(id);
            }
        } else {
            let wanted: BTreeSet<&ItemId> = key.items.iter().collect();
            let stale: Vec<ItemId> = self
                .subscriptions
                .keys()
                .filter(|id| !wanted.contains(id))
                .cloned()
                .collect();
            for id in &stale {
                self.on_item_removed(id);
            }
            for id in &key.items {
                self.on_item_added(id);
            }
        }

        // A fresh subscription delivers its current size, which must relayout.
        for last in self.subscriptions.values_mut() {
            *last = None;
        }

        debug!(
            subscriptions = self.subscriptions.len(),
            config_changed, "size observation re-established"
        );
        self.key = Some(key);
        true
    }

    /// Mount hook: start observing `id`.
    pub fn on_item_added(&mut self, id: &ItemId) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        if !self.subscriptions.contains_key(id) {
            observer.observe(id);
            self.subscriptions.insert(id.clone(), None);
            trace!(item = %id, "observing");
        }
    }

    /// Unmount hook: stop observing `id`.
    pub fn on_item_removed(&mut self, id: &ItemId) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        if self.subscriptions.remove(id).is_some() {
            observer.unobserve(id);
            trace!(item = %id, "unobserved");
        }
    }

    /// Record a reported box size. Returns `true` when a subscribed item's
    /// size actually changed and a relayout is due.
    ///
    /// The first report after subscribing always counts as a change.
    pub fn notify(&mut self, id: &ItemId, size: BoxSize) -> bool {
        if self.observer.is_none() {
            return false;
        }
        match self.subscriptions.get_mut(id) {
            Some(last) if *last != Some(size) => {
                *last = Some(size);
                true
            }
            _ => false,
        }
    }

    /// Release every subscription.
    pub fn teardown(&mut self) {
        self.disconnect_all();
        self.key = None;
    }

    fn disconnect_all(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        self.subscriptions.clear();
    }
}

impl<O: SizeObserver> Drop for SizeObservationController<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}
