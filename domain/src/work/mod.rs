//! Work units and run reports.
//!
//! A [`WorkItem`] is one discrete request submitted for execution; a
//! [`RunReport`] accounts for what happened to every submitted item.

pub mod item;
pub mod report;

pub use item::{WorkItem, WorkItemId};
pub use report::{RunReport, WorkOutcome, WorkResult};
