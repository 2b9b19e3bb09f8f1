//! Output formatting for CLI commands

use crate::training::Tally;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format `part / whole` as a percentage with one decimal
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

/// Print a win/draw/loss line with rates
pub fn print_tally(label: &str, tally: &Tally) {
    let games = tally.games();
    print_kv(
        label,
        &format!(
            "W {} ({}), D {} ({}), L {} ({})",
            tally.wins,
            format_percent(tally.wins, games),
            tally.draws,
            format_percent(tally.draws, games),
            tally.losses,
            format_percent(tally.losses, games),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_zero_games() {
        assert_eq!(format_percent(0, 0), "0.0%");
        assert_eq!(format_percent(1, 3), "33.3%");
    }
}
