//! Client-side data shaping: pivoting flat records into wide tables and
//! computing the monthly roll-up.

pub mod monthly;
pub mod pivot;

pub use monthly::MonthlySummary;
pub use pivot::{
    classifier_pivot, hourly_averages, hourly_pivot, subtopic_pivot, topic_pivot, PivotRow,
    PivotTable, HOURS_PER_DAY,
};
