/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Panel tuning knobs, loadable from TOML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use netpanel_network::Vector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Distance moved per nudge step.
    pub nudge_amount: f64,
    /// Quiet period before a requested camera fit runs.
    pub fit_delay_ms: u64,
    /// Padding around the fitted scene bounds.
    pub fit_margin: f64,
    pub auto_zoom: bool,
    /// Step between consecutive automatic placements.
    pub placement_offset: [f64; 2],
    /// Offset added per paste since the last copy.
    pub paste_step: [f64; 2],
    pub max_undo_steps: usize,
    pub loose_weights_visible: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            nudge_amount: 2.0,
            fit_delay_ms: 5,
            fit_margin: 10.0,
            auto_zoom: true,
            placement_offset: [45.0, 0.0],
            paste_step: [15.0, 15.0],
            max_undo_steps: 128,
            loose_weights_visible: true,
        }
    }
}

impl PanelConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, PanelError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PanelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PanelError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn fit_delay(&self) -> Duration {
        Duration::from_millis(self.fit_delay_ms)
    }

    pub fn placement_offset(&self) -> Vector {
        Vector::new(self.placement_offset[0], self.placement_offset[1])
    }

    pub fn paste_step(&self) -> Vector {
        Vector::new(self.paste_step[0], self.paste_step[1])
    }
}
