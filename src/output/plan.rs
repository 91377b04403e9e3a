// src/output/plan.rs
//! Turns an export report into an [`OutputPlan`]. Pure: nothing here
//! touches the file system.

use super::types::{DeliveryTarget, OutputPlan};
use crate::export::ExportReport;
use std::path::Path;

/// `{dir}/{page_id}.md` per page, plus `{dir}/{page_id}/{child_id}.md` per
/// split-out child page.
pub fn plan_files(report: &ExportReport, output_dir: &Path) -> OutputPlan {
    let mut plan = OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
        path: output_dir.to_path_buf(),
    });

    for page in &report.exported {
        plan = plan.with_operation(DeliveryTarget::WriteFile {
            path: output_dir.join(format!("{}.md", page.page_id)),
            content: page.document.parent.clone(),
        });

        let child_dir = output_dir.join(page.page_id.as_str());
        for (child_id, content) in &page.document.children {
            plan = plan.with_operation(DeliveryTarget::WriteFile {
                path: child_dir.join(format!("{}.md", child_id)),
                content: content.clone(),
            });
        }
    }
    plan
}

/// Every document concatenated into one stdout write, parents before their
/// children.
pub fn plan_stdout(report: &ExportReport) -> OutputPlan {
    let documents: Vec<&str> = report
        .exported
        .iter()
        .flat_map(|page| {
            std::iter::once(page.document.parent.as_str())
                .chain(page.document.children.values().map(String::as_str))
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    if documents.is_empty() {
        return OutputPlan::new();
    }

    let mut content = documents.join("\n\n");
    content.push('\n');
    OutputPlan::new().with_operation(DeliveryTarget::PrintToStdout { content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportedPage;
    use crate::formatting::RenderedDocument;
    use crate::types::{BlockId, PageId};
    use chrono::Utc;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::Duration;

    const PAGE: &str = "11111111222233334444555555555555";
    const CHILD: &str = "99999999222233334444555555555555";

    fn report_with_child() -> ExportReport {
        let mut children = IndexMap::new();
        children.insert(BlockId::from_raw(CHILD), "# Child\n\nInner".to_string());
        ExportReport {
            exported: vec![ExportedPage {
                page_id: PageId::from_raw(PAGE),
                title: "Parent".to_string(),
                document: RenderedDocument::new("Outer".to_string(), children),
            }],
            failures: Vec::new(),
            elapsed: Duration::ZERO,
            exported_at: Utc::now(),
        }
    }

    #[test]
    fn files_are_named_by_id() {
        let plan = plan_files(&report_with_child(), Path::new("out"));
        assert_eq!(
            plan.operations,
            vec![
                DeliveryTarget::CreateDirectory {
                    path: PathBuf::from("out")
                },
                DeliveryTarget::WriteFile {
                    path: PathBuf::from(format!("out/{PAGE}.md")),
                    content: "Outer".to_string(),
                },
                DeliveryTarget::WriteFile {
                    path: PathBuf::from(format!("out/{PAGE}/{CHILD}.md")),
                    content: "# Child\n\nInner".to_string(),
                },
            ]
        );
    }

    #[test]
    fn stdout_joins_documents_in_order() {
        let plan = plan_stdout(&report_with_child());
        assert_eq!(
            plan.operations,
            vec![DeliveryTarget::PrintToStdout {
                content: "Outer\n\n# Child\n\nInner\n".to_string()
            }]
        );
    }
}
