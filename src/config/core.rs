use serde::{Deserialize, Serialize};

use super::criticality::CriticalityTable;
use super::scoring::{default_advisory_weight, FrcWeights, ScoringWeights};

/// Root configuration structure, read from `.testprio.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrioritizerConfig {
    /// Combined-score settings
    #[serde(default)]
    pub scoring: ScoringSettings,

    /// Failure Risk Coverage sub-score weights
    #[serde(default)]
    pub frc: FrcWeights,

    /// Component criticality table
    #[serde(default)]
    pub criticality: CriticalityTable,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Blend FRC and the advisory weight into the score; when false the
    /// legacy risk score is used unchanged
    #[serde(default = "default_use_frc")]
    pub use_frc: bool,

    /// Advisory value used when no external signal is supplied
    #[serde(default = "default_advisory_weight")]
    pub advisory_weight: f64,

    #[serde(default)]
    pub weights: ScoringWeights,

    /// Score the batch on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            use_frc: default_use_frc(),
            advisory_weight: default_advisory_weight(),
            weights: ScoringWeights::default(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Seed for the randomized baselines; OS entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Cut-off positions for early fault detection and precision@k;
    /// derived from the batch size when unset
    #[serde(default)]
    pub k_values: Option<Vec<usize>>,
}

fn default_use_frc() -> bool {
    true
}

fn default_parallel() -> bool {
    true
}

impl PrioritizerConfig {
    /// Validate every weight group, replacing invalid groups with defaults.
    /// Returns the warnings produced along the way.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.scoring.weights.validate() {
            Ok(()) => self.scoring.weights.normalize(),
            Err(e) => {
                warnings.push(format!("Invalid scoring weights: {}. Using defaults.", e));
                self.scoring.weights = ScoringWeights::default();
            }
        }

        if let Err(e) = self.frc.validate() {
            warnings.push(format!("Invalid FRC weights: {}. Using defaults.", e));
            self.frc = FrcWeights::default();
        }

        if let Err(e) = self.criticality.validate() {
            warnings.push(format!("Invalid criticality table: {}. Using defaults.", e));
            self.criticality = CriticalityTable::default();
        }

        if !(0.0..=1.0).contains(&self.scoring.advisory_weight) {
            warnings.push(format!(
                "Advisory weight {} must be between 0.0 and 1.0. Using {}.",
                self.scoring.advisory_weight,
                default_advisory_weight()
            ));
            self.scoring.advisory_weight = default_advisory_weight();
        }

        warnings
    }
}
