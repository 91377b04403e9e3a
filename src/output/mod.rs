// src/output/mod.rs
//! Output handling, split into planning (pure) and delivery (I/O).

mod plan;
mod types;
mod writer;

pub use plan::{plan_files, plan_stdout};
pub use types::{CompletedOperation, DeliveryTarget, FailedOperation, OutputPlan, OutputReport};
pub use writer::deliver;
