/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::time::Duration;

use netpanel::scene::Bounds;
use netpanel::network::Point;
use netpanel::{EditMode, PanelConfig};

use crate::harness::Session;

const QUIET: Duration = Duration::from_millis(150);

fn session() -> Session {
    let config = PanelConfig {
        fit_delay_ms: 40,
        ..PanelConfig::default()
    };
    let mut session = Session::with_config(config);
    session.neurons(&[(0.0, 0.0), (100.0, 50.0)]);
    session.settle_camera(QUIET);
    session
}

#[test]
fn burst_of_fit_requests_recomputes_once() {
    let mut session = session();
    let before = session.panel.camera().fit_count();

    for _ in 0..5 {
        session.panel.zoom_to_fit_page();
    }
    assert!(!session.panel.poll_camera_fit(&session.network));
    assert!(session.panel.wait_for_camera_fit(&session.network, Duration::from_secs(2)));
    std::thread::sleep(QUIET);
    assert!(!session.panel.poll_camera_fit(&session.network));

    assert_eq!(session.panel.camera().fit_count(), before + 1);
    let expected = Bounds::new(Point::new(-22.0, -22.0), Point::new(122.0, 72.0));
    assert_eq!(session.panel.camera().view_bounds(), Some(expected));
}

#[test]
fn fit_is_skipped_outside_selection_mode() {
    let mut session = session();
    let before = session.panel.camera().fit_count();
    session.panel.set_edit_mode(EditMode::Wand);
    session.panel.zoom_to_fit_page();
    assert!(!session.panel.wait_for_camera_fit(&session.network, Duration::from_secs(1)));
    assert_eq!(session.panel.camera().fit_count(), before);
}

#[test]
fn forced_fit_ignores_auto_zoom() {
    let mut session = session();
    session.panel.set_auto_zoom(false);
    session.settle_camera(QUIET);
    let before = session.panel.camera().fit_count();

    session.panel.zoom_to_fit_page_forced();
    assert!(session.panel.wait_for_camera_fit(&session.network, Duration::from_secs(2)));
    assert_eq!(session.panel.camera().fit_count(), before + 1);
}

#[test]
fn empty_scene_leaves_camera_alone() {
    let mut session = Session::new();
    session.panel.zoom_to_fit_page_forced();
    assert!(!session.panel.wait_for_camera_fit(&session.network, Duration::from_millis(500)));
    assert_eq!(session.panel.camera().view_bounds(), None);
}
