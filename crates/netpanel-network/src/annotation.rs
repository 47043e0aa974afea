/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::model::ModelId;

/// Free-text note placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub position: Point,
    pub text: String,
}

impl TextObject {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            position,
            text: text.into(),
        }
    }
}

/// Opaque trained classifier with fixed input and output widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub position: Point,
    pub input_size: usize,
    pub output_size: usize,
    #[serde(default)]
    pub label: String,
}

impl Classifier {
    pub fn new(position: Point, input_size: usize, output_size: usize) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            position,
            input_size,
            output_size,
            label: String::new(),
        }
    }
}
