//! Coloured terminal output for the `send` command.

use std::io::{self, Write};

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::dialogue::{DialogueResponse, IntentEvent};

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Truncate a string to a maximum number of characters, adding an ellipsis.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Format slots as `name=value` pairs.
#[must_use]
pub fn format_slots(event: &IntentEvent) -> String {
    let mut pairs: Vec<String> = event
        .slots
        .iter()
        .map(|(name, slot)| format!("{name}={}", truncate(&slot.raw_value, 30)))
        .collect();
    pairs.sort();
    pairs.join(", ")
}

/// Print the intent about to be sent.
pub fn print_intent(event: &IntentEvent) {
    println!(
        "{} {} {} ({}) session={}",
        timestamp().dimmed(),
        "[INTENT]".cyan().bold(),
        event.intent_name.bold(),
        format_slots(event).dimmed(),
        truncate(&event.session_id, 20).dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print what the assistant would say, and whether it keeps listening.
pub fn print_response(response: &DialogueResponse) {
    let ts = timestamp();
    match response {
        DialogueResponse::EndSession { text, .. } => {
            println!("{} {} {}", ts.dimmed(), "[SAY]".green().bold(), text);
        }
        DialogueResponse::ContinueSession {
            text,
            intent_filter,
            ..
        } => {
            println!("{} {} {}", ts.dimmed(), "[ASK]".yellow().bold(), text);
            println!(
                "{} {} {}",
                ts.dimmed(),
                "[LISTENING]".yellow(),
                intent_filter.join(", ").dimmed()
            );
        }
    }
    let _ = io::stdout().flush();
}

/// Print an error message.
pub fn print_error(message: &str) {
    println!("{} {}", "[ERROR]".red().bold(), message);
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "...");
        assert_eq!(truncate("hello", 0), "...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_format_slots_sorted() {
        let event = IntentEvent::new("livingonmars:confirmProcedure", "s")
            .with_slot("procedure", "two")
            .with_slot("confirmation", "yes");
        assert_eq!(format_slots(&event), "confirmation=yes, procedure=two");
    }
}
