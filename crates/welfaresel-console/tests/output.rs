//! Report rendering and figure saving.

use std::fs;
use std::io::{self, Write};

use welfaresel_config::SelectionConfig;
use welfaresel_console::{render_report, CoverageChart, Figure, PlotDirectory, PlotError};
use welfaresel_solver::SelectionSolver;
use welfaresel_test::{dairy_catalog, disjoint_catalog, ExhaustiveBackend};

struct Raster(&'static str);

impl Figure for Raster {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.0.as_bytes())
    }
}

struct Vector(&'static str);

impl Figure for Vector {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.0.as_bytes())
    }

    fn extension(&self) -> &str {
        "svg"
    }
}

#[test]
fn test_repeated_saves_get_numbered_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let plots = PlotDirectory::new(dir.path().join("plots"));

    let first = plots.save(&Raster("first"), "coverage", None).unwrap();
    let second = plots.save(&Raster("second"), "coverage", None).unwrap();
    let third = plots.save(&Raster("third"), "coverage", Some(".png")).unwrap();

    assert_eq!(first.file_name().unwrap(), "coverage.png");
    assert_eq!(second.file_name().unwrap(), "coverage_1.png");
    assert_eq!(third.file_name().unwrap(), "coverage_2.png");

    // Nothing was overwritten.
    assert_eq!(fs::read_to_string(first).unwrap(), "first");
    assert_eq!(fs::read_to_string(second).unwrap(), "second");
    assert_eq!(fs::read_to_string(third).unwrap(), "third");
}

#[test]
fn test_existing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("chart.svg"), "keep").unwrap();
    let plots = PlotDirectory::new(dir.path());

    assert_eq!(plots.next_path("chart", Some("svg")), dir.path().join("chart_1.svg"));
    let path = plots.save(&Vector("new"), "chart", Some("svg")).unwrap();

    assert_eq!(path, dir.path().join("chart_1.svg"));
    assert_eq!(fs::read_to_string(dir.path().join("chart.svg")).unwrap(), "keep");
}

#[test]
fn test_extensions_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let plots = PlotDirectory::new(dir.path());

    let png = plots.save(&Raster("a"), "figure", None).unwrap();
    let svg = plots.save(&Vector("b"), "figure", None).unwrap();

    assert_eq!(png.file_name().unwrap(), "figure.png");
    assert_eq!(svg.file_name().unwrap(), "figure.svg");
}

#[test]
fn test_explicit_extension_must_match_figure_format() {
    let dir = tempfile::tempdir().unwrap();
    let plots = PlotDirectory::new(dir.path());

    let err = plots.save(&Vector("x"), "figure", Some(".png")).unwrap_err();
    assert!(matches!(
        err,
        PlotError::ExtensionMismatch { ref requested, ref native }
            if requested == ".png" && native == ".svg"
    ));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());

    let path = plots.save(&Vector("x"), "figure", Some(".SVG")).unwrap();
    assert_eq!(path.file_name().unwrap(), "figure.SVG");
}

#[test]
fn test_path_like_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let plots = PlotDirectory::new(dir.path());

    for name in ["", "../escape", "a/b", ".."] {
        let err = plots.save(&Raster("x"), name, None).unwrap_err();
        assert!(matches!(err, PlotError::InvalidName(_)), "{name}");
    }
}

#[test]
fn test_report_lists_selection_and_coverage() {
    let catalog = disjoint_catalog(5, 3);
    let config = SelectionConfig::new()
        .with_target_count(2)
        .with_penalty_weights(0.0, 0.0, 0.0);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();

    let report = render_report(&solution);

    assert!(report.starts_with("Status: optimal"));
    assert!(report.contains("Selected Welfare Indicators:"));
    assert!(report.contains("Total Number of Animal Hazards Covered: 2"));
    assert!(report.contains("Total Number of Consequences Covered: 0"));
    assert!(report.contains("Objective Function Value: 2"));
    assert!(!report.contains("Warnings:"));
}

#[test]
fn test_report_flags_unproven_solution() {
    let catalog = disjoint_catalog(4, 2);
    let config = SelectionConfig::new().with_target_count(1);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::unproven())
        .solve(&catalog)
        .unwrap();

    let report = render_report(&solution);

    assert!(report.starts_with("Status: FEASIBLE (optimality not proven)"));
    assert!(report.contains("Warnings:"));
}

#[test]
fn test_coverage_chart_has_a_bar_per_category() {
    let catalog = dairy_catalog();
    let solution = SelectionSolver::new(SelectionConfig::new().with_target_count(3))
        .solve(&catalog)
        .unwrap();
    let chart = CoverageChart::from_solution(&solution, &catalog);

    assert_eq!(chart.len(), catalog.category_count());
    assert_eq!(chart.title(), "Coverage by 3 selected indicators");

    let mut svg = Vec::new();
    chart.render(&mut svg).unwrap();
    let svg = String::from_utf8(svg).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<rect").count(), catalog.category_count());
}

#[test]
fn test_coverage_chart_saves_as_svg_by_default() {
    let catalog = disjoint_catalog(5, 3);
    let config = SelectionConfig::new()
        .with_target_count(2)
        .with_penalty_weights(0.0, 0.0, 0.0);
    let solution = SelectionSolver::with_backend(config, ExhaustiveBackend::new())
        .solve(&catalog)
        .unwrap();
    let chart = CoverageChart::from_solution(&solution, &catalog);

    let dir = tempfile::tempdir().unwrap();
    let path = PlotDirectory::new(dir.path()).save(&chart, "coverage", None).unwrap();

    assert_eq!(path.file_name().unwrap(), "coverage.svg");
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
}
