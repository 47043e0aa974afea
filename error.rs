/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::PathBuf;

use netpanel_network::{ModelId, NetworkError};

/// Errors surfaced by the panel. Each aborts only the operation that hit it.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("cannot display {model}: endpoint {endpoint} has no visual node")]
    MissingEndpoint { model: ModelId, endpoint: ModelId },
    #[error("unknown model {0}")]
    UnknownModel(ModelId),
    #[error("model {0} already has a visual node")]
    AlreadyRegistered(ModelId),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("invalid panel configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("cannot read panel configuration {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
