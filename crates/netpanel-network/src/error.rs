/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::model::{ModelId, ModelKind};

/// Errors from network structure operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown model {0}")]
    UnknownModel(ModelId),
    #[error("model {id} is a {actual:?}, expected {expected}")]
    WrongKind {
        id: ModelId,
        expected: &'static str,
        actual: ModelKind,
    },
    #[error("model id {0} is already in use")]
    DuplicateId(ModelId),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
