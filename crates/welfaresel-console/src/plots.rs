//! Figure output under a fixed directory with collision-free file names.
//!
//! Saving never overwrites: if `coverage.png` exists, the next save of the
//! same base name writes `coverage_1.png`, then `coverage_2.png`, and so on.
//! Files are opened with `create_new`, so a file appearing between probing and
//! writing is skipped rather than clobbered.
//!
//! The extension follows the figure's own format ([`Figure::extension`]); an
//! explicit extension that names another format is rejected.
//!
//! # Example
//!
//! ```no_run
//! use welfaresel_console::plots::{CoverageChart, PlotDirectory};
//! # fn chart() -> CoverageChart { unimplemented!() }
//!
//! let plots = PlotDirectory::default();
//! let path = plots.save(&chart(), "coverage", None).unwrap();
//! assert_eq!(path.extension().unwrap(), "svg");
//! println!("saved {}", path.display());
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use welfaresel_core::domain::CategoryKind;
use welfaresel_solver::SelectionSolution;

/// Output directory used when none is given.
pub const DEFAULT_DIRECTORY: &str = "plots";

/// Extension of figures that do not declare their own format.
pub const DEFAULT_EXTENSION: &str = ".png";

// Suffixes tried before giving up on a base name.
const MAX_SUFFIX: u32 = 10_000;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The base name is empty or contains a path separator.
    #[error("Invalid figure name '{0}'")]
    InvalidName(String),

    /// The requested extension names a format the figure does not render.
    #[error("Figure renders '{native}' files, cannot save it as '{requested}'")]
    ExtensionMismatch { requested: String, native: String },

    #[error("No free file name left for '{0}'")]
    Exhausted(String),
}

/// Something that can write itself as an image file.
pub trait Figure {
    fn render(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Extension matching what [`render`](Figure::render) writes, with the
    /// leading dot. PNG unless overridden.
    fn extension(&self) -> &str {
        DEFAULT_EXTENSION
    }
}

/// A directory receiving figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotDirectory {
    root: PathBuf,
}

impl Default for PlotDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY)
    }
}

impl PlotDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Renders `figure` into a new file named after `base`.
    ///
    /// `extension` may be given with or without the leading dot and defaults
    /// to the figure's own [`Figure::extension`]. An explicit extension must
    /// match it, ignoring case. The directory is created if absent. Returns
    /// the path written.
    pub fn save<F: Figure + ?Sized>(
        &self,
        figure: &F,
        base: &str,
        extension: Option<&str>,
    ) -> Result<PathBuf, PlotError> {
        if base.is_empty() || base.contains(['/', '\\']) || base == "." || base == ".." {
            return Err(PlotError::InvalidName(base.to_string()));
        }
        let native = normalize_extension(figure.extension());
        let extension = match extension {
            None => native,
            Some(requested) => {
                let requested = normalize_extension(requested);
                if !requested.eq_ignore_ascii_case(&native) {
                    return Err(PlotError::ExtensionMismatch { requested, native });
                }
                requested
            }
        };

        fs::create_dir_all(&self.root)?;

        let (path, file) = self.create_unique(base, &extension)?;
        let mut out = BufWriter::new(file);
        figure.render(&mut out)?;
        out.flush()?;
        Ok(path)
    }

    /// The path the next save of `base` would write to. `extension` defaults
    /// to [`DEFAULT_EXTENSION`].
    pub fn next_path(&self, base: &str, extension: Option<&str>) -> PathBuf {
        let extension = normalize_extension(extension.unwrap_or(DEFAULT_EXTENSION));
        (0..MAX_SUFFIX)
            .map(|n| self.candidate(base, &extension, n))
            .find(|p| !p.exists())
            .unwrap_or_else(|| self.candidate(base, &extension, MAX_SUFFIX))
    }

    fn create_unique(&self, base: &str, extension: &str) -> Result<(PathBuf, fs::File), PlotError> {
        for n in 0..MAX_SUFFIX {
            let path = self.candidate(base, extension, n);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(PlotError::Exhausted(base.to_string()))
    }

    fn candidate(&self, base: &str, extension: &str, n: u32) -> PathBuf {
        let name = if n == 0 {
            format!("{base}{extension}")
        } else {
            format!("{base}_{n}{extension}")
        };
        self.root.join(name)
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Horizontal bar chart of how many selected indicators cover each category.
///
/// Rendered as SVG, so it saves with an `.svg` extension.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageChart {
    title: String,
    bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
struct Bar {
    label: String,
    kind: CategoryKind,
    count: usize,
}

const BAR_HEIGHT: usize = 18;
const BAR_GAP: usize = 6;
const LABEL_WIDTH: usize = 240;
const UNIT_WIDTH: usize = 40;
const MARGIN: usize = 20;

impl CoverageChart {
    /// Builds the chart from a solution and the covering sets of its catalog.
    pub fn from_solution(
        solution: &SelectionSolution,
        catalog: &welfaresel_core::domain::Catalog,
    ) -> Self {
        let selected = solution.selected_ids();
        let mut bars = Vec::new();
        for kind in CategoryKind::ALL {
            for category in catalog.categories(kind) {
                let count = selected
                    .iter()
                    .filter(|id| category.is_covered_by(id))
                    .count();
                bars.push(Bar {
                    label: category.id.clone(),
                    kind,
                    count,
                });
            }
        }
        Self {
            title: format!("Coverage by {} selected indicators", selected.len()),
            bars,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of bars, one per category.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl Figure for CoverageChart {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let max = self.bars.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let width = MARGIN * 2 + LABEL_WIDTH + max * UNIT_WIDTH + 30;
        let height = MARGIN * 3 + self.bars.len() * (BAR_HEIGHT + BAR_GAP);

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif" font-size="12">"#
        )?;
        writeln!(
            out,
            r#"  <text x="{MARGIN}" y="{MARGIN}" font-size="14" font-weight="bold">{}</text>"#,
            escape(&self.title)
        )?;

        for (i, bar) in self.bars.iter().enumerate() {
            let y = MARGIN * 2 + i * (BAR_HEIGHT + BAR_GAP);
            // Uncovered categories keep a stub bar so the row stays visible.
            let bar_width = if bar.count == 0 {
                UNIT_WIDTH / 8
            } else {
                bar.count * UNIT_WIDTH
            };
            let color = match (bar.kind, bar.count) {
                (_, 0) => "#d9d9d9",
                (CategoryKind::AnimalHazard, _) => "#2b8cbe",
                (CategoryKind::Consequence, _) => "#e6550d",
            };
            writeln!(
                out,
                r#"  <text x="{}" y="{}" text-anchor="end">{}</text>"#,
                MARGIN + LABEL_WIDTH - 8,
                y + BAR_HEIGHT - 5,
                escape(&bar.label)
            )?;
            writeln!(
                out,
                r#"  <rect x="{}" y="{y}" width="{bar_width}" height="{BAR_HEIGHT}" fill="{color}"/>"#,
                MARGIN + LABEL_WIDTH,
            )?;
            writeln!(
                out,
                r#"  <text x="{}" y="{}">{}</text>"#,
                MARGIN + LABEL_WIDTH + bar_width + 6,
                y + BAR_HEIGHT - 5,
                bar.count
            )?;
        }

        writeln!(out, "</svg>")
    }

    fn extension(&self) -> &str {
        ".svg"
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
