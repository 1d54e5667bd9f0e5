pub mod fact;
pub mod metrics;
pub mod percentage;
pub mod store;

pub use fact::{AttendanceFact, FactFilter, MonthFilter, RosterEntry, Student, Subject};
pub use percentage::{Percentage, Tally};
pub use store::{AttendanceStore, BatchOutcome, FailedWrite, StoreError, submit_batch};
