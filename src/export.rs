// src/export.rs
//! Batch export: render every requested page, isolating failures per page.

use crate::api::ResilientRepository;
use crate::error::AppError;
use crate::formatting::{BlockRenderer, PostProcessor, RenderOptions, RenderedDocument};
use crate::types::PageId;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// One successfully exported page.
#[derive(Debug, Clone)]
pub struct ExportedPage {
    pub page_id: PageId,
    pub title: String,
    pub document: RenderedDocument,
}

/// A page that could not be exported, with the error that stopped it.
#[derive(Debug)]
pub struct PageFailure {
    pub page_id: PageId,
    pub error: AppError,
}

/// Outcome of [`Exporter::export_all`].
#[derive(Debug)]
pub struct ExportReport {
    pub exported: Vec<ExportedPage>,
    pub failures: Vec<PageFailure>,
    pub elapsed: Duration,
    pub exported_at: DateTime<Utc>,
}

impl ExportReport {
    pub fn total(&self) -> usize {
        self.exported.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary: completed count, then one line per error.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Exported {}/{} pages in {:.1}s",
            self.exported.len(),
            self.total(),
            self.elapsed.as_secs_f64()
        )];
        if !self.failures.is_empty() {
            lines.push(format!("{} page(s) failed:", self.failures.len()));
            lines.extend(
                self.failures
                    .iter()
                    .map(|failure| format!("  - {}: {}", failure.page_id, failure.error)),
            );
        }
        lines.join("\n")
    }

    pub fn summary_json(&self) -> Value {
        let exported = self.exported.iter().map(|page| {
            json!({
                "page_id": page.page_id.as_str(),
                "title": page.title,
                "documents": page.document.document_count(),
                "content_length": page.document.parent.len(),
            })
        });
        let failed = self.failures.iter().map(|failure| {
            json!({
                "page_id": failure.page_id.as_str(),
                "error": failure.error.to_string(),
            })
        });

        json!({
            "success": self.is_complete(),
            "total_pages": self.total(),
            "exported": self.exported.len(),
            "failed": self.failures.len(),
            "exported_at": self.exported_at.to_rfc3339(),
            "elapsed_seconds": self.elapsed.as_secs_f64(),
            "pages": exported.chain(failed).collect::<Vec<_>>(),
        })
    }
}

/// Drives rendering and post-processing for a batch of pages.
pub struct Exporter {
    renderer: BlockRenderer,
    processor: PostProcessor,
}

impl Exporter {
    pub fn new(source: ResilientRepository, options: RenderOptions, processor: PostProcessor) -> Self {
        Self::with_renderer(BlockRenderer::new(source, options), processor)
    }

    pub fn with_renderer(renderer: BlockRenderer, processor: PostProcessor) -> Self {
        Self {
            renderer,
            processor,
        }
    }

    /// Retrieves the title, renders the content and post-processes every
    /// resulting document. A title that cannot be retrieved does not fail
    /// the page.
    pub async fn export_page(&self, page_id: &PageId) -> Result<ExportedPage, AppError> {
        let title = self.title_of(page_id).await;
        let document = self
            .renderer
            .render_page(page_id)
            .await?
            .post_process(&self.processor);

        Ok(ExportedPage {
            page_id: page_id.clone(),
            title,
            document,
        })
    }

    async fn title_of(&self, page_id: &PageId) -> String {
        match self.renderer.source().page(page_id).await {
            Ok(page) => page.title,
            Err(err) => {
                log::warn!("Failed to get title for page {}: {}", page_id.short(), err);
                fallback_title(page_id)
            }
        }
    }

    /// Exports pages one after another. A failing page is recorded and the
    /// batch moves on.
    pub async fn export_all(&self, page_ids: &[PageId]) -> ExportReport {
        let started = Instant::now();
        let total = page_ids.len();
        let mut exported = Vec::with_capacity(total);
        let mut failures = Vec::new();

        log::info!("Exporting {} page(s)", total);

        for (index, page_id) in page_ids.iter().enumerate() {
            let position = index + 1;
            match self.export_page(page_id).await {
                Ok(page) => {
                    log::info!(
                        "{} Exported {} [{:.1}s]",
                        progress_prefix(position, total),
                        page.title,
                        started.elapsed().as_secs_f64()
                    );
                    exported.push(page);
                }
                Err(error) => {
                    log::error!(
                        "{} Failed {}: {}",
                        progress_prefix(position, total),
                        page_id,
                        error
                    );
                    failures.push(PageFailure {
                        page_id: page_id.clone(),
                        error,
                    });
                }
            }
        }

        ExportReport {
            exported,
            failures,
            elapsed: started.elapsed(),
            exported_at: Utc::now(),
        }
    }
}

/// `[3/8] (37%)`
fn progress_prefix(position: usize, total: usize) -> String {
    let percent = if total == 0 { 100 } else { position * 100 / total };
    format!("[{}/{}] ({}%)", position, total, percent)
}

/// `Untitled (1a2b3c4d)`, from the first eight characters of the id.
fn fallback_title(page_id: &PageId) -> String {
    match page_id.short() {
        "" => "Untitled".to_string(),
        short => format!("Untitled ({})", short),
    }
}
