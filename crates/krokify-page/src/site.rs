//! In-place processing of built HTML pages.
//!
//! Each `.html` file is one page load: it is read, its diagrams are rendered,
//! and it is written back if anything changed. Pages are independent; a page
//! that cannot be read or written is reported and the others continue.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::renderer::DiagramRenderer;

/// Error returned by site processing.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result of processing a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub path: PathBuf,
    /// Diagrams replaced by rendered markup.
    pub replaced: usize,
    /// Diagrams that got an error notice.
    pub errored: usize,
    /// Whether the page was rewritten on disk.
    pub written: bool,
}

/// Aggregated result of processing a file or directory.
#[derive(Debug, Default)]
pub struct SiteReport {
    pub pages_scanned: usize,
    pub pages_changed: usize,
    pub diagrams_replaced: usize,
    pub diagrams_errored: usize,
    /// Pages that could not be processed, with the reason.
    pub failed_pages: Vec<(PathBuf, String)>,
}

impl SiteReport {
    fn record(&mut self, page: &PageReport) {
        self.pages_scanned += 1;
        if page.replaced + page.errored > 0 {
            self.pages_changed += 1;
        }
        self.diagrams_replaced += page.replaced;
        self.diagrams_errored += page.errored;
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.pages_scanned += other.pages_scanned;
        self.pages_changed += other.pages_changed;
        self.diagrams_replaced += other.diagrams_replaced;
        self.diagrams_errored += other.diagrams_errored;
        self.failed_pages.extend(other.failed_pages);
    }
}

/// Applies a [`DiagramRenderer`] to pages on disk.
pub struct SiteProcessor<'a> {
    renderer: &'a DiagramRenderer,
    dry_run: bool,
}

impl<'a> SiteProcessor<'a> {
    #[must_use]
    pub fn new(renderer: &'a DiagramRenderer) -> Self {
        Self {
            renderer,
            dry_run: false,
        }
    }

    /// Render diagrams without writing pages back.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process a single page or every `.html` file below a directory.
    pub fn process_path(&self, path: &Path) -> Result<SiteReport, SiteError> {
        if !path.exists() {
            return Err(SiteError::NotFound(path.to_path_buf()));
        }

        let pages = if path.is_dir() {
            collect_html_files(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let results: Vec<_> = pages
            .par_iter()
            .map(|page| (page, self.process_page(page)))
            .collect();

        let mut report = SiteReport::default();
        for (page, result) in results {
            match result {
                Ok(page_report) => report.record(&page_report),
                Err(e) => {
                    tracing::warn!(path = %page.display(), error = %e, "Failed to process page");
                    report.failed_pages.push((page.clone(), e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Process a single page.
    pub fn process_page(&self, path: &Path) -> Result<PageReport, SiteError> {
        let html = fs::read_to_string(path)?;
        let page = self.renderer.render_page(&html);

        let written = page.changed() && !self.dry_run;
        if written {
            fs::write(path, &page.html)?;
            tracing::info!(
                path = %path.display(),
                replaced = page.replaced(),
                errored = page.errored(),
                "Updated page"
            );
        }

        Ok(PageReport {
            path: path.to_path_buf(),
            replaced: page.replaced(),
            errored: page.errored(),
            written,
        })
    }
}

/// Recursively collect `.html` files below `dir`, sorted by path.
fn collect_html_files(dir: &Path) -> Result<Vec<PathBuf>, io::Error> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(current: &Path, files: &mut Vec<PathBuf>) -> Result<(), io::Error> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        {
            files.push(path);
        }
    }
    Ok(())
}
