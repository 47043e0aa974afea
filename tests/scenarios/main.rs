/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::VERSION;

mod harness;

mod camera_fit;
mod connect;
mod editing;
mod registry;
mod snapshot;
mod undo_redo;

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}
