//! Parsing of batched naming responses.
//!
//! Each response line is expected to read `[<position>] -> <name>`. Anything
//! else is reported as [`ParsedLine::Unrecognized`] and ignored by callers.

use std::sync::OnceLock;

static LINE_REGEX: OnceLock<regex::Regex> = OnceLock::new();

fn line_regex() -> &'static regex::Regex {
    LINE_REGEX.get_or_init(|| {
        regex::Regex::new(r"^\[(\d+)\]\s*->\s*(.*)$")
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// One classified response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A well-formed line. `position` is 1-based; `text` is unvalidated.
    Matched { position: usize, text: String },
    /// Anything that does not follow the grammar.
    Unrecognized,
}

/// Classify a single line. Surrounding whitespace is ignored.
pub fn parse_line(line: &str) -> ParsedLine {
    let Some(caps) = line_regex().captures(line.trim()) else {
        return ParsedLine::Unrecognized;
    };

    match caps[1].parse::<usize>() {
        Ok(position) if position > 0 => ParsedLine::Matched {
            position,
            text: caps[2].to_string(),
        },
        _ => ParsedLine::Unrecognized,
    }
}

/// Classify every line of a response, in order.
pub fn parse_response(response: &str) -> Vec<ParsedLine> {
    response.lines().map(parse_line).collect()
}
