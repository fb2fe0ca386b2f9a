//! Console output formatting for the terminal game

use colored::Colorize;
use spotlight_domain::ParticipantId;

/// Formats show moments for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.magenta(), title.bold(), line.magenta())
    }

    pub fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    pub fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).magenta())
    }

    /// A line spoken by someone on stage
    pub fn speech(speaker: &str, text: &str) -> String {
        format!(
            "{}\n{}\n",
            format!("── {} ──", speaker).yellow().bold(),
            Self::indent(text, "  ")
        )
    }

    pub fn question(round: u32, max_rounds: u32, question: &str) -> String {
        format!(
            "{}\n{} {}\n",
            Self::section_header(&format!("Round {} of {}", round, max_rounds)),
            "Bachelorette:".magenta().bold(),
            question
        )
    }

    pub fn ratings(ratings: &[(ParticipantId, f64)]) -> String {
        let mut output = format!("\n{}\n", "Ratings".cyan().bold());
        for (participant, rating) in ratings {
            output.push_str(&format!(
                "  {:<16} {}\n",
                participant.to_string(),
                Self::score(*rating)
            ));
        }
        output
    }

    /// Final standings with the winner marked
    pub fn standings(final_ratings: &[(ParticipantId, f64)], winner: &ParticipantId) -> String {
        let mut output = Self::section_header("Final standings");
        for (participant, mean) in final_ratings {
            let marker = if participant == winner {
                "*".green().bold().to_string()
            } else {
                " ".to_string()
            };
            output.push_str(&format!(
                " {} {:<16} {}\n",
                marker,
                participant.to_string(),
                Self::score(*mean)
            ));
        }
        output
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn score(value: f64) -> String {
        let text = format!("{:.2}", value);
        if value >= 7.0 {
            text.green().to_string()
        } else if value >= 4.0 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }

    #[test]
    fn test_standings_list_everyone() {
        let ratings = vec![
            (ParticipantId::new("contestant1"), 6.5),
            (ParticipantId::new("contestant3"), 8.25),
        ];
        let output = ConsoleFormatter::standings(&ratings, &ParticipantId::new("contestant3"));
        assert!(output.contains("contestant1"));
        assert!(output.contains("6.50"));
        assert!(output.contains("8.25"));
    }

    #[test]
    fn test_question_mentions_round() {
        let output = ConsoleFormatter::question(2, 3, "Pineapple on pizza?");
        assert!(output.contains("Round 2 of 3"));
        assert!(output.contains("Pineapple on pizza?"));
    }
}
