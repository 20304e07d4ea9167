//! Scoring configuration for test prioritization
//!
//! This module contains the weight groups used by the scorers:
//! - Blend weights for the combined score (risk, FRC, advisory)
//! - Sub-score weights for Failure Risk Coverage
//!
//! Each group must sum to 1.0. Groups that fail validation are replaced by
//! their defaults when the configuration file is loaded.

use serde::{Deserialize, Serialize};

const SUM_TOLERANCE: f64 = 0.001;

// Pure function: Check if a weight is in valid range
fn is_valid_weight(weight: f64) -> bool {
    (0.0..=1.0).contains(&weight)
}

// Pure function: Validate a single weight with name
fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
    if is_valid_weight(weight) {
        Ok(())
    } else {
        Err(format!("{} weight must be between 0.0 and 1.0", name))
    }
}

fn validate_sum(group: &str, weights: &[f64]) -> Result<(), String> {
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        Err(format!("{} weights must sum to 1.0, but sum to {:.3}", group, sum))
    } else {
        Ok(())
    }
}

/// Blend weights for the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the normalized legacy risk score (0.0-1.0)
    #[serde(default = "default_risk_weight")]
    pub risk: f64,

    /// Weight of the Failure Risk Coverage score (0.0-1.0)
    #[serde(default = "default_frc_weight")]
    pub frc: f64,

    /// Weight of the external advisory signal (0.0-1.0)
    #[serde(default = "default_advisory_blend_weight")]
    pub advisory: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            risk: default_risk_weight(),
            frc: default_frc_weight(),
            advisory: default_advisory_blend_weight(),
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), String> {
        validate_weight(self.risk, "Risk")?;
        validate_weight(self.frc, "FRC")?;
        validate_weight(self.advisory, "Advisory")?;
        validate_sum("Scoring", &[self.risk, self.frc, self.advisory])
    }

    /// Normalize weights to ensure they sum to exactly 1.0
    pub fn normalize(&mut self) {
        let sum = self.risk + self.frc + self.advisory;
        if sum > 0.0 && (sum - 1.0).abs() > 1e-9 {
            self.risk /= sum;
            self.frc /= sum;
            self.advisory /= sum;
        }
    }
}

/// Sub-score weights for Failure Risk Coverage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrcWeights {
    #[serde(default = "default_failure_history_weight")]
    pub failure_history: f64,

    #[serde(default = "default_criticality_weight")]
    pub criticality: f64,

    #[serde(default = "default_fragility_weight")]
    pub fragility: f64,

    #[serde(default = "default_flakiness_weight")]
    pub flakiness: f64,
}

impl Default for FrcWeights {
    fn default() -> Self {
        Self {
            failure_history: default_failure_history_weight(),
            criticality: default_criticality_weight(),
            fragility: default_fragility_weight(),
            flakiness: default_flakiness_weight(),
        }
    }
}

impl FrcWeights {
    pub fn validate(&self) -> Result<(), String> {
        validate_weight(self.failure_history, "Failure history")?;
        validate_weight(self.criticality, "Criticality")?;
        validate_weight(self.fragility, "Fragility")?;
        validate_weight(self.flakiness, "Flakiness")?;
        validate_sum(
            "FRC",
            &[
                self.failure_history,
                self.criticality,
                self.fragility,
                self.flakiness,
            ],
        )
    }
}

pub fn default_risk_weight() -> f64 {
    0.4
}

pub fn default_frc_weight() -> f64 {
    0.4
}

pub fn default_advisory_blend_weight() -> f64 {
    0.2
}

/// Neutral advisory value used when no external signal is supplied.
pub fn default_advisory_weight() -> f64 {
    0.5
}

pub fn default_failure_history_weight() -> f64 {
    0.4
}

pub fn default_criticality_weight() -> f64 {
    0.3
}

pub fn default_fragility_weight() -> f64 {
    0.2
}

pub fn default_flakiness_weight() -> f64 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoringWeights::default().validate().is_ok());
        assert!(FrcWeights::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let weights = ScoringWeights {
            risk: 1.2,
            frc: -0.1,
            advisory: -0.1,
        };
        let err = weights.validate().unwrap_err();
        assert!(err.contains("Risk weight"));
    }

    #[test]
    fn test_bad_sum_rejected() {
        let weights = FrcWeights {
            failure_history: 0.5,
            criticality: 0.5,
            fragility: 0.5,
            flakiness: 0.0,
        };
        let err = weights.validate().unwrap_err();
        assert!(err.contains("sum to 1.500"));
    }

    #[test]
    fn test_normalize_scales_to_one() {
        let mut weights = ScoringWeights {
            risk: 0.5,
            frc: 0.5,
            advisory: 0.2,
        };
        weights.normalize();
        let sum = weights.risk + weights.frc + weights.advisory;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((weights.advisory - 0.2 / 1.2).abs() < 1e-9);
    }
}
