/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Where new and pasted objects go.

use netpanel_network::{Point, Vector};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementManager {
    /// Where the previous object was placed.
    last: Option<Point>,
    /// One-shot override, e.g. the last click.
    explicit: Option<Point>,
    offset: Vector,
    paste_step: Vector,
    /// Pastes since the last copy.
    paste_count: u32,
}

impl PlacementManager {
    pub fn new(offset: Vector, paste_step: Vector) -> Self {
        Self {
            last: None,
            explicit: None,
            offset,
            paste_step,
            paste_count: 0,
        }
    }

    /// Use `position` for the next placement only.
    pub fn set_next_position(&mut self, position: Point) {
        self.explicit = Some(position);
    }

    /// Position for a new object. Later placements continue from here.
    pub fn next_position(&mut self) -> Point {
        let position = match (self.explicit.take(), self.last) {
            (Some(explicit), _) => explicit,
            (None, Some(last)) => last + self.offset,
            (None, None) => Point::origin(),
        };
        self.last = Some(position);
        position
    }

    /// Start a new paste burst.
    pub fn set_new_copy(&mut self) {
        self.paste_count = 0;
    }

    /// Offset of the next paste relative to the copied originals.
    pub fn paste_offset(&mut self) -> Vector {
        self.paste_count = self.paste_count.saturating_add(1);
        self.paste_step * f64::from(self.paste_count)
    }
}
