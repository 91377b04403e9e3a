// src/output/types.rs
//! Planned output operations and the report of executing them.

use std::path::PathBuf;

/// Every operation one run will perform, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf, content: String },
    CreateDirectory { path: PathBuf },
    PrintToStdout { content: String },
}

impl DeliveryTarget {
    /// Short description for log lines and failure messages.
    pub fn describe(&self) -> String {
        match self {
            DeliveryTarget::WriteFile { path, .. } => format!("write {}", path.display()),
            DeliveryTarget::CreateDirectory { path } => format!("create {}", path.display()),
            DeliveryTarget::PrintToStdout { .. } => "print to stdout".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Paths of every file written, in plan order.
    pub fn written_files(&self) -> Vec<&PathBuf> {
        self.completed
            .iter()
            .filter_map(|done| match &done.operation {
                DeliveryTarget::WriteFile { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}
