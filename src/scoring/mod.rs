pub mod combined;
pub mod frc;
pub mod history;
pub mod risk;
pub mod score_normalizer;

pub use combined::{ScoreCombiner, ScoreMode, ScoredTest};
pub use frc::{failure_history_score, selector_fragility, FrcBreakdown, FrcScorer};
pub use history::StatusHistory;
pub use risk::{RiskLevel, RiskScore, RiskScorer};
pub use score_normalizer::normalize_risk;
