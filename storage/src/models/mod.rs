mod estimate_record;
mod estimate_stats;

pub use estimate_record::EstimateRecord;
pub use estimate_stats::EstimateStats;
