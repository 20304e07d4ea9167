pub mod advisory;
pub mod pipeline;
pub mod ranking;

pub use advisory::{parse_advisory_list, AdvisoryProvider, StaticAdvisory};
pub use pipeline::{Prioritization, Prioritizer};
pub use ranking::{RankingEngine, ABSENT_ADVISORY_RANK, UNRELATED_PENALTY};
