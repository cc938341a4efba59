//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
      ____ ____  ____   ____    _    _     _____
     / ___| __ )/ ___| / ___|  / \  | |   | ____|
    | |  _|  _ \\___ \| |     / _ \ | |   |  _|
    | |_| | |_) |___) | |___ / ___ \| |___| |___
     \____|____/|____/ \____/_/   \_\_____|_____|
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("γ").magenta().bold(),
        style("Grain-boundary energy scaling from canonical properties").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Settings shown in the configuration card
pub struct RunSettings<'a> {
    pub input: &'a Path,
    pub predict: Option<&'a Path>,
    pub target: &'a str,
    pub output_dir: &'a Path,
    pub max_size: usize,
    pub strategy: String,
    pub scoring: String,
    pub neighbors: usize,
}

/// Print configuration card
pub fn print_config(settings: &RunSettings) {
    let box_width = 60;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<57}│", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!(
        "    │  {}Train:    {:<43}│",
        FOLDER,
        truncate_path(settings.input, 42)
    );
    if let Some(predict) = settings.predict {
        println!("    │  {}Predict:  {:<43}│", FOLDER, truncate_path(predict, 42));
    }
    println!(
        "    │  {}Target:   {:<43}│",
        TARGET,
        truncate_string(settings.target, 42)
    );
    println!(
        "    │  {}Output:   {:<43}│",
        SAVE,
        truncate_path(settings.output_dir, 42)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {}Max subset size: {:<36}│",
        CHART,
        style(settings.max_size).yellow()
    );
    println!(
        "    │  {}Folds:           {:<36}│",
        DICE,
        style(truncate_string(&settings.strategy, 34)).yellow()
    );
    println!(
        "    │  {}Scoring:         {:<36}│",
        CHART,
        style(&settings.scoring).yellow()
    );
    println!(
        "    │  {}KNN neighbors:   {:<36}│",
        CHART,
        style(settings.neighbors).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("gbscale analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

/// Keep the tail of a string that exceeds `max_len` characters.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}
