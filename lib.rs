/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Headless view coordinator for a neural network editor.
//!
//! A [`NetworkPanel`] mirrors a [`network::Network`] into a [`Scene`] of
//! visual nodes, tracks two selections, records undoable edits and keeps
//! the camera fitted to the content through a debounced timer.

pub mod camera;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod panel;
pub mod placement;
pub mod scene;
pub mod selection;
pub mod undo;

pub use netpanel_network as network;

pub use camera::{Camera, FitTimer};
pub use config::PanelConfig;
pub use error::PanelError;
pub use panel::{EditMode, NetworkPanel, PanelEvent};
pub use scene::{Scene, SceneSummary, VisualKey, VisualKind, VisualNode};
pub use selection::{SelectionEvent, SelectionManager};
pub use undo::{UndoManager, UndoableAction};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
