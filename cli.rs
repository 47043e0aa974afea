/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command line of the demo binary.

use std::path::PathBuf;

use bpaf::Bpaf;

/// Build a network, run a scripted editing session on a headless panel and
/// print the resulting scene as JSON.
#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct Options {
    /// Panel configuration (TOML)
    #[bpaf(long, argument("PATH"))]
    pub config: Option<PathBuf>,
    /// Log filter, overrides RUST_LOG
    #[bpaf(long, argument("FILTER"))]
    pub log: Option<String>,
    /// Start from a saved network snapshot instead of the demo network
    #[bpaf(long, argument("PATH"))]
    pub load: Option<PathBuf>,
    /// Write the edited network snapshot here
    #[bpaf(long, argument("PATH"))]
    pub save: Option<PathBuf>,
    /// Neurons placed by the demo session
    #[bpaf(long, argument("COUNT"), fallback(4))]
    pub neurons: usize,
}
