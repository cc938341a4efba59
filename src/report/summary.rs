//! Terminal summaries of exploratory analysis and subset rankings

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{LabelMap, RankedResults, TargetCorrelation};

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Format a subset through the label map
pub fn labelled_features(features: &[String], labels: &LabelMap) -> String {
    features
        .iter()
        .map(|f| labels.label(f))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Show the top `top_n` ranked subsets and any excluded subsets.
pub fn display_ranking(ranked: &RankedResults, labels: &LabelMap, top_n: usize, title: &str) {
    print_section("📋", title);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Features").add_attribute(Attribute::Bold),
        Cell::new("Size").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("± Std").add_attribute(Attribute::Bold),
    ]);

    for (i, row) in ranked.rows.iter().take(top_n).enumerate() {
        let score_cell = Cell::new(format!("{:.4}", row.score));
        let score_cell = if i == 0 {
            score_cell.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            score_cell
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(labelled_features(row.subset.features(), labels)),
            Cell::new(row.subset.len()),
            score_cell,
            Cell::new(format!("{:.4}", row.score_std)).fg(Color::DarkGrey),
        ]);
    }

    print_indented(&table);

    if ranked.rows.len() > top_n {
        println!(
            "      {}",
            style(format!("... {} more subset(s) in the export", ranked.rows.len() - top_n)).dim()
        );
    }

    if !ranked.failures.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Excluded (degenerate fit)").yellow(),
            style(format!("({})", ranked.failures.len())).dim()
        );
        for failure in &ranked.failures {
            println!(
                "        {} {} {}",
                style("•").dim(),
                labelled_features(failure.subset.features(), labels),
                style(format!("- {}", failure.reason)).dim()
            );
        }
    }
}

/// Show property correlations with the target, strongest first.
pub fn display_target_correlations(
    correlations: &[TargetCorrelation],
    labels: &LabelMap,
    target: &str,
) {
    print_section("🔗", &format!("CORRELATION WITH {}", labels.label(target)));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Property").add_attribute(Attribute::Bold),
        Cell::new("Pearson r").add_attribute(Attribute::Bold),
        Cell::new("N").add_attribute(Attribute::Bold),
    ]);

    for c in correlations {
        let r_cell = if c.correlation.is_nan() {
            Cell::new("n/a").fg(Color::DarkGrey)
        } else {
            let color = if c.correlation.abs() > 0.7 {
                Color::Green
            } else if c.correlation.abs() > 0.4 {
                Color::Yellow
            } else {
                Color::White
            };
            Cell::new(format!("{:+.3}", c.correlation)).fg(color)
        };
        table.add_row(vec![
            Cell::new(labels.label(&c.feature)),
            r_cell,
            Cell::new(c.observations),
        ]);
    }

    print_indented(&table);
}

/// Show per-column missing ratios above zero.
pub fn display_missing_values(missing: &[(String, f64)], labels: &LabelMap) {
    let with_missing: Vec<&(String, f64)> = missing.iter().filter(|(_, r)| *r > 0.0).collect();
    if with_missing.is_empty() {
        return;
    }

    print_section("🕳️ ", "MISSING VALUES");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
    ]);
    for (name, ratio) in with_missing {
        table.add_row(vec![
            Cell::new(labels.label(name)),
            Cell::new(format!("{:.1}%", ratio * 100.0)).fg(if *ratio > 0.5 {
                Color::Red
            } else {
                Color::Yellow
            }),
        ]);
    }

    print_indented(&table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn labels_replace_known_properties() {
        let mut map = BTreeMap::new();
        map.insert("a0".to_string(), "Lattice constant".to_string());
        let labels = LabelMap::new(map);

        let text = labelled_features(&["a0".to_string(), "c44".to_string()], &labels);
        assert_eq!(text, "Lattice constant + c44");
    }
}
