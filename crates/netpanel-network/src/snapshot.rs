/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable image of a whole network.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::model::NetworkModel;
use crate::network::Network;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub version: u32,
    pub next_id: u64,
    #[serde(default)]
    pub time: f64,
    pub models: Vec<NetworkModel>,
}

impl Network {
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            version: SNAPSHOT_VERSION,
            next_id: self.next_id,
            time: self.time,
            models: self.models.values().cloned().collect(),
        }
    }

    /// Rebuild a network from a snapshot. No events are fired; views attach
    /// afterwards and walk [`Network::all_models_in_deserialization_order`].
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self, NetworkError> {
        let mut models = BTreeMap::new();
        let mut highest = 0;
        for model in snapshot.models {
            let id = model.id();
            highest = highest.max(id.raw());
            if models.insert(id, model).is_some() {
                return Err(NetworkError::DuplicateId(id));
            }
        }
        let next_id = snapshot.next_id.max(highest + 1);
        info!("loaded network snapshot v{} with {} models", snapshot.version, models.len());
        Ok(Network::from_parts(models, next_id, snapshot.time))
    }

    pub fn to_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let snapshot: NetworkSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}
