//! Post-processing of completion text before it goes back to the caller.
//!
//! These are string heuristics, not parsers. The delimiters and markers are
//! what existing frontends rely on, quirks included.

use crate::prompts::MEAL_SUGGESTION_SECTIONS;

const MEAL_PLAN_MARKERS: [&str; 4] = ["breakfast", "lunch", "dinner", "snack"];

/// Breaks the text into sentences when the model ignored the requested section headers
pub fn format_meal_suggestion(text: &str) -> String {
    let lower = text.to_lowercase();
    let has_sections = MEAL_SUGGESTION_SECTIONS
        .iter()
        .any(|header| lower.contains(&header.to_lowercase()));

    if has_sections {
        text.to_string()
    } else {
        text.replace(". ", ".\n")
    }
}

/// One advice point per line, each terminated with a period
pub fn format_dietary_advice(text: &str) -> String {
    text.split(". ")
        .map(str::trim)
        .filter(|point| !point.is_empty())
        .map(|point| {
            if point.ends_with('.') {
                point.to_string()
            } else {
                format!("{}.", point)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Groups lines into paragraphs separated by one blank line.
/// A blank line or a line mentioning a meal marker starts a new paragraph.
pub fn format_meal_plan(text: &str) -> String {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        let lower = line.to_lowercase();
        if !current.is_empty() && MEAL_PLAN_MARKERS.iter().any(|m| lower.contains(m)) {
            paragraphs.push(std::mem::take(&mut current));
        }
        current.push(line);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .iter()
        .map(|p| p.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
