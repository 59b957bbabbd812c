//! Terminal output formatting.

use campaign_core::{AnalysisResult, Notice, NoticeLevel, QualityLabel, Session};
use colored::{ColoredString, Colorize};

fn quality_colored(quality: QualityLabel) -> ColoredString {
    match quality {
        QualityLabel::Excellent => quality.as_str().yellow().bold(),
        QualityLabel::Good => quality.as_str().green(),
        QualityLabel::Normal => quality.as_str().normal(),
    }
}

/// Print a notice on stderr.
pub fn print_notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Info => "info".cyan(),
        NoticeLevel::Warning => "warning".yellow(),
        NoticeLevel::Error => "error".red().bold(),
    };
    eprintln!("{}: {}", tag, notice.message);
}

/// Print the analysis and its premium insights.
pub fn print_result(result: &AnalysisResult) {
    println!();
    println!(
        "{} {}",
        result.quality.headline().cyan().bold(),
        result.quality.badge()
    );
    println!(
        "{}: {}   {}: {} €   {}: {} jours",
        "Secteur".bold(),
        result.params.domain,
        "Budget".bold(),
        result.params.budget,
        "Durée".bold(),
        result.params.duration.days()
    );
    println!("{}: {}", "Qualité".bold(), quality_colored(result.quality));
    println!();
    println!("{}", result.generated_text);

    if let Some(premium) = &result.premium_text {
        println!();
        println!("{}", "Insights Premium".bold());
        println!("{}", "─".repeat(40));
        println!("{}", premium);
    }

    if !result.images.is_empty() {
        println!();
        for kind in &result.images {
            println!("  {} {}", "Image".green(), kind.file_name());
        }
    }
}

/// Print the session history as a table, newest first.
pub fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("{}", "No history yet.".dimmed());
        return;
    }

    println!(
        "{:<4} {:<17} {:<20} {:>8} {:<10} {:<10}",
        "#", "Date", "Secteur", "Budget", "Qualité", "Premium"
    );
    println!("{}", "─".repeat(74));
    for (number, entry) in session.history_newest_first() {
        println!(
            "{:<4} {:<17} {:<20} {:>8} {:<10} {:<10}",
            number,
            entry.timestamp.format("%d/%m/%Y %H:%M").to_string(),
            truncate(&entry.domain, 20),
            entry.params.budget,
            quality_colored(entry.quality),
            if entry.premium { "Oui" } else { "Non" }
        );
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Mode", 20), "Mode");
        assert_eq!(truncate("Santé & Bien-être", 6), "Santé…");
    }
}
