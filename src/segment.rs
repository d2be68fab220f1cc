//! Line-classification segmenter for exam-style text.
//!
//! Raw document text is split into question units with a single stateful scan: certain line
//! shapes start a new unit, every other non-blank line continues the current one. The scan
//! handles `QUESTION ONE`-style headings, `a)` sub-items, directive keywords, and multi-line
//! questions without backtracking.

use regex::Regex;

/// Patterns deciding whether a line begins a new question unit.
///
/// The defaults mirror common exam paper conventions; callers can substitute their own
/// compiled patterns to adjust the heuristics.
pub struct SegmentRules {
    heading: Regex,
    sub_item: Regex,
    keywords: Regex,
}

impl Default for SegmentRules {
    fn default() -> Self {
        Self {
            heading: Regex::new(r"(?i)^QUESTION\s+\w+").expect("valid heading pattern"),
            sub_item: Regex::new(r"^[a-z]\)").expect("valid sub-item pattern"),
            keywords: Regex::new(
                r"(?i)(marks|Write|Describe|Outline|Define|Differentiate|Compute|Calculate)",
            )
            .expect("valid keyword pattern"),
        }
    }
}

impl SegmentRules {
    /// Build rules from custom patterns for headings, sub-items, and directive keywords.
    pub fn new(heading: Regex, sub_item: Regex, keywords: Regex) -> Self {
        Self {
            heading,
            sub_item,
            keywords,
        }
    }

    /// Decide whether a trimmed, non-blank line starts a new question unit.
    pub fn starts_new_unit(&self, line: &str) -> bool {
        self.heading.is_match(line)
            || self.sub_item.is_match(line)
            || self.keywords.is_match(line)
    }
}

/// Split raw text into an ordered sequence of question units.
///
/// A single pass over the lines with two states: no active unit, or accumulating one. Lines
/// matching a rule flush the current unit and start a new one; other non-blank lines are
/// space-joined onto the accumulator; blank lines are skipped without flushing. The
/// in-progress unit is flushed at end of input.
pub fn segment_units(text: &str, rules: &SegmentRules) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if rules.starts_new_unit(line) {
            if !current.is_empty() {
                units.push(current);
            }
            current = line.to_string();
        } else if current.is_empty() {
            current = line.to_string();
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        units.push(current);
    }

    units
}
