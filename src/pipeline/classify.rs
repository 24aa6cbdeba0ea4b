//! Question classification and option extraction.
//!
//! Turns one [`QuestionBlock`] into one [`QuestionRecord`]:
//!
//! 1. Identifier from the marker in the first cell (`Q007` → `Q7`)
//! 2. `raw_text` = remaining cells joined with spaces, trimmed
//! 3. Empty `raw_text` → all-`FIGURE` placeholder
//! 4. Stem = text before the first option marker
//! 5. Type from [`CLASSIFICATION_RULES`], first match wins
//! 6. Options (MCQ/MSQ) from repeated option markers, `FIGURE` when none
//!
//! A block whose first cell has no marker yields no record.

use crate::error::BlockIssue;
use crate::pipeline::segment::{QuestionBlock, RE_QUESTION_MARKER};
use crate::question::{figure_options, question_id, OptionLabel, Options, QuestionRecord, QuestionType};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// First option marker anywhere in the text; ends the stem.
static RE_STEM_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(?[A-D]\)?[.):]").unwrap());

/// An option marker at the start of the text or after whitespace.
/// Capture 1 is the letter.
static RE_OPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)\(?([A-D])\)?[.):]").unwrap());

/// Where an option's text stops: whitespace followed by the next marker.
static RE_OPTION_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\(?[A-D]\)?[.):]").unwrap());

/// Numerator and denominator split across two lines.
static RE_STACKED_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\n(\d+)$").unwrap());

// ── Classification rules ─────────────────────────────────────────────────────

/// Which text a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// The stem only, lowercased.
    Stem,
    /// All of `raw_text`, lowercased with whitespace runs collapsed.
    FullText,
    /// Matches anything.
    Always,
}

/// One entry of the ordered classification table.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub scope: RuleScope,
    /// Any of these substrings triggers the rule.
    pub phrases: &'static [&'static str],
    pub kind: QuestionType,
}

impl ClassificationRule {
    fn matches(&self, stem: &str, full_text: &str) -> bool {
        let haystack = match self.scope {
            RuleScope::Always => return true,
            RuleScope::Stem => stem,
            RuleScope::FullText => full_text,
        };
        self.phrases.iter().any(|p| haystack.contains(p))
    }
}

/// Classification rules in priority order. The last rule always matches.
pub static CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "multi-select phrasing",
        scope: RuleScope::Stem,
        phrases: &["is/are"],
        kind: QuestionType::Msq,
    },
    ClassificationRule {
        name: "numerical answer phrasing",
        scope: RuleScope::FullText,
        phrases: &[
            "answer in integer",
            "answer in decimal",
            "answer in",
            "rounded off to",
        ],
        kind: QuestionType::Nat,
    },
    ClassificationRule {
        name: "default",
        scope: RuleScope::Always,
        phrases: &[],
        kind: QuestionType::Mcq,
    },
];

/// Lowercase and collapse every whitespace run to one space.
fn collapse_lower(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply [`CLASSIFICATION_RULES`] to a stem and its full text.
pub fn classify(stem: &str, raw_text: &str) -> QuestionType {
    let stem = stem.to_lowercase();
    let full = collapse_lower(raw_text);
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&stem, &full))
        .map(|rule| rule.kind)
        .unwrap_or(QuestionType::Mcq)
}

// ── Extraction steps ─────────────────────────────────────────────────────────

/// Digit run of the first marker in `cell`, as written.
pub fn parse_question_number(cell: &str) -> Option<&str> {
    RE_QUESTION_MARKER
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Text before the first option marker, trimmed; all of `raw_text` if none.
pub fn question_stem(raw_text: &str) -> &str {
    match RE_STEM_END.find(raw_text) {
        Some(m) => raw_text[..m.start()].trim(),
        None => raw_text,
    }
}

/// Scan `raw_text` for lettered options.
///
/// Each option's text runs from its marker (plus any following whitespace)
/// up to the next whitespace-preceded marker or the end. Repeated letters
/// overwrite. Partial sets are returned as found.
pub fn extract_options(raw_text: &str, normalize_fractions: bool) -> Options {
    let mut options = Options::new();
    let mut pos = 0;

    while let Some(caps) = RE_OPTION_MARKER.captures_at(raw_text, pos) {
        let Some(label) = caps[1].chars().next().and_then(OptionLabel::from_char) else {
            break;
        };
        let marker_end = caps.get(0).map_or(raw_text.len(), |m| m.end());
        let rest = &raw_text[marker_end..];
        let value_start = marker_end + (rest.len() - rest.trim_start().len());
        let value_end = RE_OPTION_END
            .find_at(raw_text, value_start)
            .map_or(raw_text.len(), |m| m.start());

        let value = &raw_text[value_start..value_end];
        options.insert(label, clean_option(value, normalize_fractions));

        // An empty value can leave us at the marker we just read; step past it.
        pos = value_end.max(marker_end);
    }

    options
}

fn clean_option(value: &str, normalize_fractions: bool) -> String {
    if normalize_fractions {
        if let Some(caps) = RE_STACKED_FRACTION.captures(value.trim()) {
            return format!("{}/{}", &caps[1], &caps[2]);
        }
    }
    value.replace('\n', " ").trim().to_string()
}

/// Result of classifying one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub record: QuestionRecord,
    /// Set when the record was degraded to a `FIGURE` placeholder.
    pub degradation: Option<BlockIssue>,
}

/// Build a record from one block.
///
/// Returns `Err(BlockIssue::MalformedBlock)` when the first cell has no
/// question marker; the caller drops such blocks.
pub fn classify_block(
    block: &QuestionBlock,
    page: usize,
    normalize_fractions: bool,
) -> Result<Classified, BlockIssue> {
    let first_cell = block.first_cell().unwrap_or_default();
    let number = parse_question_number(first_cell).ok_or_else(|| BlockIssue::MalformedBlock {
        page,
        first_cell: first_cell.to_string(),
    })?;
    let id = question_id(number);

    let raw_text = block.body().join(" ");
    let raw_text = raw_text.trim();

    if raw_text.is_empty() {
        debug!("{id}: no text after marker, emitting FIGURE");
        return Ok(Classified {
            degradation: Some(BlockIssue::EmptyContent {
                page,
                id: id.clone(),
            }),
            record: QuestionRecord::figure(id),
        });
    }

    let stem = question_stem(raw_text);
    let kind = classify(stem, raw_text);

    let mut degradation = None;
    let options = if kind.has_options() {
        let mut opts = extract_options(raw_text, normalize_fractions);
        if opts.is_empty() {
            debug!("{id}: {kind} without options, emitting FIGURE options");
            degradation = Some(BlockIssue::NoOptionsFound {
                page,
                id: id.clone(),
            });
            opts = figure_options();
        }
        Some(opts)
    } else {
        None
    };

    Ok(Classified {
        record: QuestionRecord {
            id,
            kind,
            question: stem.to_string(),
            options,
            answer: None,
        },
        degradation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(v: &[&str]) -> QuestionBlock {
        QuestionBlock::new(v.iter().map(|s| s.to_string()).collect())
    }

    fn opts(pairs: &[(OptionLabel, &str)]) -> Options {
        pairs.iter().map(|(l, v)| (*l, v.to_string())).collect()
    }

    fn record(v: &[&str]) -> QuestionRecord {
        classify_block(&block(v), 1, false).unwrap().record
    }

    #[test]
    fn simple_mcq() {
        let r = record(&["Q1", "What is 2+2? (A) 3 (B) 4 (C) 5 (D) 6"]);
        assert_eq!(r.id, "Q1");
        assert_eq!(r.kind, QuestionType::Mcq);
        assert_eq!(r.question, "What is 2+2?");
        assert_eq!(
            r.options,
            Some(opts(&[
                (OptionLabel::A, "3"),
                (OptionLabel::B, "4"),
                (OptionLabel::C, "5"),
                (OptionLabel::D, "6"),
            ]))
        );
        assert_eq!(r.answer, None);
    }

    #[test]
    fn multi_select_keeps_partial_options() {
        let r = record(&["Q.2", "Which of the following is/are prime? (A) 4 (B) 5"]);
        assert_eq!(r.id, "Q2");
        assert_eq!(r.kind, QuestionType::Msq);
        assert_eq!(
            r.options,
            Some(opts(&[(OptionLabel::A, "4"), (OptionLabel::B, "5")]))
        );
    }

    #[test]
    fn numerical_answer_has_no_options() {
        let r = record(&["Q 3", "The value of x, rounded off to 2 decimal places, is ____"]);
        assert_eq!(r.id, "Q3");
        assert_eq!(r.kind, QuestionType::Nat);
        assert_eq!(r.question, "The value of x, rounded off to 2 decimal places, is ____");
        assert_eq!(r.options, None);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn marker_only_block_becomes_figure() {
        let c = classify_block(&block(&["Q4"]), 2, false).unwrap();
        assert_eq!(c.record, QuestionRecord::figure("Q4"));
        assert_eq!(
            c.degradation,
            Some(BlockIssue::EmptyContent {
                page: 2,
                id: "Q4".into()
            })
        );
    }

    #[test]
    fn whitespace_only_body_becomes_figure() {
        assert!(record(&["Q5", "  ", "\n"]).is_figure());
    }

    #[test]
    fn leading_zeros_normalised() {
        assert_eq!(record(&["Q007", "x"]).id, "Q7");
        assert_eq!(record(&["Q7", "x"]).id, "Q7");
    }

    #[test]
    fn marker_not_first_cell_is_malformed() {
        let err = classify_block(&block(&["Answer", "Q1"]), 3, false).unwrap_err();
        assert_eq!(
            err,
            BlockIssue::MalformedBlock {
                page: 3,
                first_cell: "Answer".into()
            }
        );
    }

    #[test]
    fn question_numbers_beyond_machine_integers_are_kept() {
        let r = record(&["Q123456789012345678901", "What is 2+2? (A) 3 (B) 4"]);
        assert_eq!(r.id, "Q123456789012345678901");
        assert_eq!(r.question, "What is 2+2?");
        assert_eq!(r.options.map(|o| o.len()), Some(2));
    }

    #[test]
    fn all_zero_number_becomes_q0() {
        assert_eq!(record(&["Q.000", "x"]).id, "Q0");
    }

    #[test]
    fn msq_beats_nat_even_when_both_phrases_present() {
        let r = record(&[
            "Q6",
            "Which of the following is/are correct? Give answer in integer (A) 1 (B) 2",
        ]);
        assert_eq!(r.kind, QuestionType::Msq);
    }

    #[test]
    fn is_are_in_options_only_does_not_make_msq() {
        // the MSQ rule looks at the stem only
        let r = record(&["Q8", "Pick one (A) it is/are fine (B) no"]);
        assert_eq!(r.kind, QuestionType::Mcq);
    }

    #[test]
    fn nat_phrase_matched_across_line_breaks_and_case() {
        assert_eq!(classify("Find x", "Find x. Give the ANSWER\n  IN integer"), QuestionType::Nat);
        assert_eq!(classify("Find x", "Find x, Rounded   off to one place"), QuestionType::Nat);
        assert_eq!(classify("Find x", "Find x"), QuestionType::Mcq);
    }

    #[test]
    fn nat_phrase_in_options_still_counts() {
        let r = record(&["Q9", "Compute y (A) answer in metres (B) 2"]);
        assert_eq!(r.kind, QuestionType::Nat);
        assert_eq!(r.question, "Compute y");
        assert_eq!(r.options, None);
    }

    #[test]
    fn choice_question_without_options_gets_figure_options() {
        let c = classify_block(&block(&["Q10", "Refer to the diagram below"]), 1, false).unwrap();
        assert_eq!(c.record.kind, QuestionType::Mcq);
        assert_eq!(c.record.question, "Refer to the diagram below");
        assert_eq!(c.record.options, Some(figure_options()));
        assert!(matches!(c.degradation, Some(BlockIssue::NoOptionsFound { .. })));
    }

    #[test]
    fn option_marker_styles() {
        let o = extract_options("Stem A. one B) two (C) three D: four", false);
        assert_eq!(
            o,
            opts(&[
                (OptionLabel::A, "one"),
                (OptionLabel::B, "two"),
                (OptionLabel::C, "three"),
                (OptionLabel::D, "four"),
            ])
        );
    }

    #[test]
    fn options_in_separate_cells_span_newlines() {
        let r = record(&["Q11", "Choose", "(A) first\nline", "(B) second"]);
        assert_eq!(r.question, "Choose");
        assert_eq!(
            r.options,
            Some(opts(&[(OptionLabel::A, "first line"), (OptionLabel::B, "second")]))
        );
    }

    #[test]
    fn option_at_start_of_text() {
        let o = extract_options("(A) 1 (B) 2", false);
        assert_eq!(o.len(), 2);
        assert_eq!(question_stem("(A) 1 (B) 2"), "");
    }

    #[test]
    fn repeated_letter_overwrites() {
        let o = extract_options("x (A) old (B) b (A) new", false);
        assert_eq!(o[&OptionLabel::A], "new");
        assert_eq!(o[&OptionLabel::B], "b");
    }

    #[test]
    fn adjacent_markers_keep_following_marker_as_text() {
        let o = extract_options("x A. B.", false);
        assert_eq!(o, opts(&[(OptionLabel::A, "B.")]));
    }

    #[test]
    fn stem_ends_at_unspaced_marker() {
        // the stem boundary does not require leading whitespace
        assert_eq!(question_stem("Compute f(A): the map (B) x"), "Compute f");
    }

    #[test]
    fn stacked_fraction_normalised_when_enabled() {
        let text = "Value of p (A) 3\n4 (B) 1\n2";
        let plain = extract_options(text, false);
        assert_eq!(plain[&OptionLabel::A], "3 4");
        let normalised = extract_options(text, true);
        assert_eq!(normalised[&OptionLabel::A], "3/4");
        assert_eq!(normalised[&OptionLabel::B], "1/2");
    }

    #[test]
    fn rules_are_ordered_and_end_with_fallback() {
        let kinds: Vec<QuestionType> = CLASSIFICATION_RULES.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![QuestionType::Msq, QuestionType::Nat, QuestionType::Mcq]);
        assert_eq!(CLASSIFICATION_RULES.last().map(|r| r.scope), Some(RuleScope::Always));
    }
}
