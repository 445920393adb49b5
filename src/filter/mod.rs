//! Filter normalization and application
//!
//! Raw selector inputs from the outside world come in heterogeneous shapes:
//! a scalar or a collection, optional date bounds, and an "all" sentinel for
//! the working-hour groups. [`FilterPredicate::normalize`] collapses these
//! into one canonical immutable predicate, and [`apply`] projects a
//! [`crate::store::FlowStore`] through it without mutating anything.

pub mod engine;
pub mod predicate;

pub use engine::{apply, FilteredView};
pub use predicate::{
    DateFilter, FilterPredicate, FilterSelectors, Selection, WorkingHourFilter,
};
