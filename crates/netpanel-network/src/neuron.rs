/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use serde::{Deserialize, Serialize};

use crate::model::ModelId;
use crate::{Point, Vector};

/// A single neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    /// Centre of the neuron in network space.
    pub position: Point,
    pub activation: f64,
    /// Clamped neurons keep their activation across updates.
    #[serde(default)]
    pub clamped: bool,
    #[serde(default)]
    pub label: String,
    pub rule: UpdateRule,
}

impl Neuron {
    pub fn new(position: Point) -> Self {
        Self::with_rule(position, UpdateRule::default())
    }

    pub fn with_rule(position: Point, rule: UpdateRule) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            position,
            activation: 0.0,
            clamped: false,
            label: String::new(),
            rule,
        }
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.position += Vector::new(dx, dy);
    }

    pub fn increment_activation(&mut self) {
        self.activation = self.rule.increment(self.activation);
    }

    pub fn decrement_activation(&mut self) {
        self.activation = self.rule.decrement(self.activation);
    }

    pub fn contextual_increment(&mut self) {
        self.activation = self.rule.contextual_increment(self.activation);
    }

    pub fn contextual_decrement(&mut self) {
        self.activation = self.rule.contextual_decrement(self.activation);
    }

    /// Reset to the resting state.
    pub fn clear(&mut self) {
        self.activation = 0.0;
    }

    pub fn toggle_clamped(&mut self) {
        self.clamped = !self.clamped;
    }
}

/// Activation rule of a neuron. Only the parts the editor needs are modelled:
/// how a manual increment or decrement moves the activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum UpdateRule {
    Linear(LinearRule),
    Binary(BinaryRule),
}

impl Default for UpdateRule {
    fn default() -> Self {
        UpdateRule::Linear(LinearRule::default())
    }
}

impl UpdateRule {
    pub fn increment(&self, activation: f64) -> f64 {
        match self {
            UpdateRule::Linear(rule) => rule.increment(activation),
            UpdateRule::Binary(rule) => rule.upper_bound,
        }
    }

    pub fn decrement(&self, activation: f64) -> f64 {
        match self {
            UpdateRule::Linear(rule) => rule.decrement(activation),
            UpdateRule::Binary(rule) => rule.lower_bound,
        }
    }

    /// Step used by "contextual" increments. Binary neurons flip state, every
    /// other rule steps like a plain increment.
    pub fn contextual_increment(&self, activation: f64) -> f64 {
        match self {
            UpdateRule::Binary(rule) if activation >= rule.threshold => rule.lower_bound,
            _ => self.increment(activation),
        }
    }

    pub fn contextual_decrement(&self, activation: f64) -> f64 {
        match self {
            UpdateRule::Binary(rule) if activation < rule.threshold => rule.upper_bound,
            _ => self.decrement(activation),
        }
    }
}

/// Standard linear neuron with optional clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRule {
    pub slope: f64,
    pub bias: f64,
    pub clipped: bool,
    pub upper_bound: f64,
    pub lower_bound: f64,
    /// Amount added or removed by a manual increment.
    pub increment: f64,
}

impl Default for LinearRule {
    fn default() -> Self {
        Self {
            slope: 1.0,
            bias: 0.0,
            clipped: false,
            upper_bound: 1.0,
            lower_bound: -1.0,
            increment: 0.1,
        }
    }
}

impl LinearRule {
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.lower_bound, self.upper_bound)
    }

    pub fn increment(&self, activation: f64) -> f64 {
        if !self.clipped {
            return activation + self.increment;
        }
        if activation >= self.upper_bound {
            return activation;
        }
        self.clip(activation + self.increment)
    }

    pub fn decrement(&self, activation: f64) -> f64 {
        if !self.clipped {
            return activation - self.increment;
        }
        if activation <= self.lower_bound {
            return activation;
        }
        self.clip(activation - self.increment)
    }
}

/// Two-state neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryRule {
    pub threshold: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Default for BinaryRule {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            upper_bound: 1.0,
            lower_bound: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn clipped_rule() -> LinearRule {
        LinearRule {
            clipped: true,
            ..LinearRule::default()
        }
    }

    #[rstest]
    #[case(0.0, 0.1)]
    #[case(0.95, 1.0)]
    #[case(1.0, 1.0)]
    #[case(3.0, 3.0)]
    fn clipped_linear_increment_stops_at_ceiling(#[case] start: f64, #[case] expected: f64) {
        let rule = clipped_rule();
        assert!((rule.increment(start) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.0, -0.1)]
    #[case(-0.95, -1.0)]
    #[case(-1.0, -1.0)]
    fn clipped_linear_decrement_stops_at_floor(#[case] start: f64, #[case] expected: f64) {
        let rule = clipped_rule();
        assert!((rule.decrement(start) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unclipped_linear_ignores_bounds() {
        let rule = LinearRule::default();
        assert!((rule.increment(5.0) - 5.1).abs() < 1e-9);
        assert!((rule.decrement(-5.0) + 5.1).abs() < 1e-9);
    }

    #[test]
    fn test_binary_rule_snaps_and_flips() {
        let rule = UpdateRule::Binary(BinaryRule::default());
        assert_eq!(rule.increment(0.0), 1.0);
        assert_eq!(rule.decrement(1.0), 0.0);
        assert_eq!(rule.contextual_increment(1.0), 0.0);
        assert_eq!(rule.contextual_decrement(0.0), 1.0);
    }

    #[test]
    fn test_neuron_clear_and_offset() {
        let mut neuron = Neuron::new(Point::new(1.0, 2.0));
        neuron.increment_activation();
        neuron.offset(4.0, -2.0);
        assert_eq!(neuron.position, Point::new(5.0, 0.0));
        neuron.clear();
        assert_eq!(neuron.activation, 0.0);
    }
}
