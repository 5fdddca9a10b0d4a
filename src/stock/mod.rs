//! Stock valuation reposting rules: which queued reposts survive and when
//! reposting is allowed to run.

pub mod reposting;
pub mod timeslot;

pub use reposting::{DedupDecision, RecencyPolicy, RepostBasedOn, RepostCandidate, RepostStatus};
pub use timeslot::{in_configured_timeslot, RepostingWindow};
