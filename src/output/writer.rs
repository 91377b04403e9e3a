// src/output/writer.rs
//! Executes an [`OutputPlan`]. The only module in the crate that touches the
//! file system.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Runs every operation in order. A failing operation is recorded and the
/// rest of the plan still runs.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let started = Instant::now();
    log::debug!("Delivering {} output operation(s)", plan.operations.len());

    let mut report = plan
        .operations
        .into_iter()
        .fold(OutputReport::new(), |report, operation| {
            match execute_operation(&operation) {
                Ok(bytes_written) => report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                }),
                Err(e) => {
                    log::error!("Failed to {}: {}", operation.describe(), e);
                    report.with_failed(FailedOperation {
                        error: format!("{}: {}", operation.describe(), e),
                        operation,
                    })
                }
            }
        });

    report.total_duration_ms = started.elapsed().as_millis() as u64;
    log::debug!(
        "Delivery finished: {} succeeded, {} failed, {} bytes in {}ms",
        report.completed.len(),
        report.failed.len(),
        report.bytes_written,
        report.total_duration_ms
    );
    report
}

fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::CreateDirectory { path } => {
            create_directory(path)?;
            Ok(0)
        }
        DeliveryTarget::PrintToStdout { content } => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(content.len())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    log::info!("Wrote {}", path.display());
    Ok(content.len())
}

fn create_directory(path: &Path) -> Result<(), AppError> {
    if path.exists() && !path.is_dir() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        )));
    }
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "notion2pandoc_writer_{}_{}",
            name,
            uuid::Uuid::new_v4().simple()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn writes_files_and_creates_parents() {
        let dir = scratch_dir("write");
        let path = dir.join("nested").join("page.md");
        let plan = OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: "# Hello\n".to_string(),
        });

        let report = deliver(plan);

        assert!(report.is_success());
        assert_eq!(report.bytes_written, 8);
        assert_eq!(fs::read_to_string(&path).expect("read back"), "# Hello\n");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn failure_is_recorded_and_later_operations_still_run() {
        let dir = scratch_dir("fail");
        let blocker = dir.join("blocker");
        fs::write(&blocker, "file").expect("write blocker");
        let after = dir.join("after.md");

        let report = deliver(
            OutputPlan::new()
                .with_operation(DeliveryTarget::CreateDirectory {
                    path: blocker.clone(),
                })
                .with_operation(DeliveryTarget::WriteFile {
                    path: after.clone(),
                    content: "ok".to_string(),
                }),
        );

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].error.starts_with("create "));
        assert_eq!(report.written_files(), vec![&after]);
        let _ = fs::remove_dir_all(dir);
    }
}
