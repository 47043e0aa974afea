/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Auto-layout for group members.

use serde::{Deserialize, Serialize};

use crate::{Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum GroupLayout {
    Line {
        spacing: f64,
        orientation: LineOrientation,
    },
    /// Row-major grid. `columns: None` picks a near-square grid.
    Grid {
        h_spacing: f64,
        v_spacing: f64,
        columns: Option<usize>,
    },
}

impl Default for GroupLayout {
    fn default() -> Self {
        GroupLayout::Line {
            spacing: 50.0,
            orientation: LineOrientation::Horizontal,
        }
    }
}

impl GroupLayout {
    pub fn grid(spacing: f64) -> Self {
        GroupLayout::Grid {
            h_spacing: spacing,
            v_spacing: spacing,
            columns: None,
        }
    }

    /// Positions for `count` members anchored at `origin`.
    pub fn positions(&self, origin: Point, count: usize) -> Vec<Point> {
        match *self {
            GroupLayout::Line {
                spacing,
                orientation,
            } => (0..count)
                .map(|i| {
                    let step = spacing * i as f64;
                    match orientation {
                        LineOrientation::Horizontal => origin + Vector::new(step, 0.0),
                        LineOrientation::Vertical => origin + Vector::new(0.0, step),
                    }
                })
                .collect(),
            GroupLayout::Grid {
                h_spacing,
                v_spacing,
                columns,
            } => {
                let columns = columns
                    .unwrap_or_else(|| (count as f64).sqrt().ceil() as usize)
                    .max(1);
                (0..count)
                    .map(|i| {
                        let col = (i % columns) as f64;
                        let row = (i / columns) as f64;
                        origin + Vector::new(col * h_spacing, row * v_spacing)
                    })
                    .collect()
            },
        }
    }
}
