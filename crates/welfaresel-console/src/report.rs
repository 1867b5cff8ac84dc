//! Plain-text rendering of a selection result.

use std::fmt::Write;

use welfaresel_solver::SelectionSolution;

/// Renders the solution as a human-readable report.
///
/// Sections: status, selected indicators, covered hazards and consequences
/// with their totals, the objective value, and each selected indicator's
/// attributes. Warnings are listed last.
pub fn render_report(solution: &SelectionSolution) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, solution);
    out
}

fn write_report(out: &mut String, solution: &SelectionSolution) -> std::fmt::Result {
    if solution.is_optimal() {
        writeln!(out, "Status: optimal")?;
    } else {
        writeln!(out, "Status: {} (optimality not proven)", solution.status)?;
    }

    writeln!(out, "\nSelected Welfare Indicators:")?;
    for id in solution.selected_ids() {
        writeln!(out, "- {id}")?;
    }

    writeln!(out, "\nCovered Animal Hazards:")?;
    for hazard in &solution.covered_hazards {
        writeln!(out, "- {hazard}")?;
    }
    writeln!(
        out,
        "Total Number of Animal Hazards Covered: {}",
        solution.covered_hazards.len()
    )?;

    writeln!(out, "\nCovered Consequences:")?;
    for consequence in &solution.covered_consequences {
        writeln!(out, "- {consequence}")?;
    }
    writeln!(
        out,
        "Total Number of Consequences Covered: {}",
        solution.covered_consequences.len()
    )?;

    writeln!(out, "\nObjective Function Value: {}", solution.objective_value)?;

    writeln!(out, "\nSelected Indicators and Their Attributes:")?;
    for selected in &solution.selected {
        let attrs = &selected.attributes;
        writeln!(out, "- {}:", selected.id)?;
        writeln!(out, "  Ease: {:.2}", attrs.ease)?;
        writeln!(out, "  Ease of mitigation: {:.2}", attrs.mitigation)?;
        writeln!(out, "  Resources: {:.2}", attrs.resources)?;
        if let Some(impact) = attrs.impact {
            writeln!(out, "  Impact: {:.2}", impact)?;
        }
        writeln!(out, "  Penalty: {:.2}", selected.penalty)?;
    }

    if !solution.warnings.is_empty() {
        writeln!(out, "\nWarnings:")?;
        for warning in &solution.warnings {
            writeln!(out, "- {warning}")?;
        }
    }
    Ok(())
}
