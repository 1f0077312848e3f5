use serde::{Deserialize, Serialize};

use super::is_sentinel;

/// Granularity at which a [`SentinelPolicy`] rejects values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterScope {
    /// Drop only the offending values
    Value,
    /// Drop every value of an event as soon as one is rejected
    #[default]
    Event,
}

/// Filter applied to resolution values before they are histogrammed.
///
/// The default keeps everything, sentinels included, so histogram membership equals
/// the number of particles processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelPolicy {
    /// Keep sentinel values
    pub include_sentinels: bool,
    /// Reject values with `|value| >= bound`
    pub bound: Option<f32>,
    /// Whether rejection applies per value or per event
    pub scope: FilterScope,
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self {
            include_sentinels: true,
            bound: None,
            scope: FilterScope::Event,
        }
    }
}

impl SentinelPolicy {
    /// Keep every value.
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// Drop sentinels and values outside `|value| < bound`, event-wide.
    pub fn strict(bound: f32) -> Self {
        Self {
            include_sentinels: false,
            bound: Some(bound),
            scope: FilterScope::Event,
        }
    }

    /// Whether a single value passes the policy.
    pub fn accepts(&self, value: f32) -> bool {
        if !self.include_sentinels && is_sentinel(value) {
            return false;
        }
        match self.bound {
            Some(bound) => value.abs() < bound,
            None => true,
        }
    }

    /// Values of one event that survive the policy.
    pub fn apply(&self, values: &[f32]) -> Vec<f32> {
        match self.scope {
            FilterScope::Value => values.iter().copied().filter(|v| self.accepts(*v)).collect(),
            FilterScope::Event => {
                if values.iter().all(|v| self.accepts(*v)) {
                    values.to_vec()
                } else {
                    Vec::new()
                }
            }
        }
    }
}
