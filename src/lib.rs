//! Balanced masonry layout
//!
//! Places items into height-balanced columns: each item goes to the currently
//! shortest column, and a static placeholder layout covers the time before the
//! first measurement.
//!
//! The layout core ([`model`], [`layout`]) is pure; [`view`], [`config`] and
//! [`logging`] form the impure shell around it.

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod scene;
pub mod view;

// Measure/notify/commit loop shared by the preview and headless output
pub mod integration;
