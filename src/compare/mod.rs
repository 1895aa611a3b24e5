pub mod aggregate;
pub mod delta;
pub mod table;
pub mod visualize;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

pub use aggregate::{summarize, AggregateFunction};
pub use delta::{compare_tables, DeltaMode, DeltaTable};
pub use table::{write_csv, Cell, ResultsTable};
pub use visualize::{build_plot, plot_columns};

/// Building characteristics sit next to the results but are never aggregated.
pub const RESULTS_CHARACTERISTICS: &str = "results_characteristics.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompareAction {
    /// Write per-file delta tables (and aggregates, if requested)
    Results,
    /// Write a base-vs-feature scatter page per file
    Visualize,
}

/// Outcome of one `results` pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompareSummary {
    pub files: usize,
    pub inequality_files: usize,
    pub aggregate_files: usize,
}

/// Compares a folder of base results with a folder of feature results.
pub struct ResultsComparer {
    base_dir: PathBuf,
    feature_dir: PathBuf,
    export_dir: PathBuf,
}

impl ResultsComparer {
    /// Set up the comparer, creating `export_dir` if needed.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        feature_dir: impl Into<PathBuf>,
        export_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let export_dir = export_dir.into();
        fs::create_dir_all(&export_dir)
            .with_context(|| format!("could not create `{}`", export_dir.display()))?;
        Ok(Self {
            base_dir: base_dir.into(),
            feature_dir: feature_dir.into(),
            export_dir,
        })
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// File names in the base folder, sorted, minus `excludes`.
    fn base_files(&self, excludes: &[String]) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("listing {}", self.base_dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if excludes.contains(&name) {
                continue;
            }
            files.push(name);
        }
        files.sort();
        Ok(files)
    }

    /// Diff every base file against its feature counterpart.
    ///
    /// - `<file>` in the export folder gets the cell-wise delta
    /// - with `aggregate`, `<stem>_<function>.csv` gets the side-by-side
    ///   totals (characteristics excepted)
    #[instrument(level = "info", skip(self, excludes), fields(base = %self.base_dir.display(), feature = %self.feature_dir.display()))]
    pub fn results(
        &self,
        aggregate: Option<AggregateFunction>,
        excludes: &[String],
    ) -> Result<CompareSummary> {
        let mut summary = CompareSummary::default();

        for file in self.base_files(excludes)? {
            let base = ResultsTable::read(self.base_dir.join(&file))?;
            let feature = ResultsTable::read(self.feature_dir.join(&file))?;

            let delta = compare_tables(&base, &feature)
                .with_context(|| format!("comparing {}", file))?;
            if delta.mode == DeltaMode::Inequality {
                warn!(file = %file, "non-numeric results; wrote 0/1 inequality flags");
                summary.inequality_files += 1;
            }
            let (header, rows) = delta.to_records();
            write_csv(self.export_dir.join(&file), &header, &rows)?;
            summary.files += 1;

            if let Some(func) = aggregate {
                if file != RESULTS_CHARACTERISTICS {
                    let (header, rows) = summarize(&base, &feature, func);
                    let stem = Path::new(&file)
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.clone());
                    let out = self.export_dir.join(format!("{}_{}.csv", stem, func));
                    write_csv(&out, &header, &rows)?;
                    summary.aggregate_files += 1;
                }
            }
        }

        info!(
            files = summary.files,
            aggregates = summary.aggregate_files,
            "comparison written to {}",
            self.export_dir.display()
        );
        Ok(summary)
    }

    /// Plot every base file against its feature counterpart into
    /// `<stem>.html` in the export folder. Returns the number of pages.
    #[instrument(level = "info", skip(self, excludes), fields(base = %self.base_dir.display(), feature = %self.feature_dir.display()))]
    pub fn visualize(&self, excludes: &[String]) -> Result<usize> {
        let mut pages = 0;
        for file in self.base_files(excludes)? {
            let base = ResultsTable::read(self.base_dir.join(&file))?;
            let feature = ResultsTable::read(self.feature_dir.join(&file))?;

            let stem = Path::new(&file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());
            let out = self.export_dir.join(format!("{}.html", stem));
            let html = build_plot(&file, &base, &feature).to_html();
            fs::write(&out, html).with_context(|| format!("writing {}", out.display()))?;
            pages += 1;
        }

        info!(pages, "plots written to {}", self.export_dir.display());
        Ok(pages)
    }
}
