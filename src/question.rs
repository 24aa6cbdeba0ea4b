//! Question record types: the unit of output.
//!
//! A [`QuestionRecord`] is created once from one question block, optionally
//! gets an `answer` attached by the answer-key merge, and is then serialized
//! as-is. Field order in the struct is the field order in the JSON output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder text used when a question or its options are a diagram.
pub const FIGURE: &str = "FIGURE";

/// Answer type of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Multiple choice: exactly one correct option among A–D.
    #[serde(rename = "MCQ")]
    Mcq,
    /// Multiple select: one or more correct options among A–D.
    #[serde(rename = "MSQ")]
    Msq,
    /// Numerical answer: no discrete options.
    #[serde(rename = "NAT")]
    Nat,
}

impl QuestionType {
    /// Whether questions of this type carry an options map.
    pub fn has_options(self) -> bool {
        matches!(self, QuestionType::Mcq | QuestionType::Msq)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Msq => "MSQ",
            QuestionType::Nat => "NAT",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option label. Only the four letters GATE papers use are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    /// Map an uppercase letter to its label.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }
}

/// Options keyed by label, always serialized in A→D order.
pub type Options = BTreeMap<OptionLabel, String>;

/// `{A: FIGURE, B: FIGURE, C: FIGURE, D: FIGURE}`.
pub fn figure_options() -> Options {
    OptionLabel::ALL
        .iter()
        .map(|&label| (label, FIGURE.to_string()))
        .collect()
}

/// One extracted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// `"Q"` followed by the question number without leading zeros.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: QuestionType,

    /// Question stem, trimmed. `FIGURE` when the block had no text.
    pub question: String,

    /// Present for MCQ / MSQ only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,

    /// Raw answer-key text; set only by the answer-key merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl QuestionRecord {
    /// Placeholder record for a question that is purely a diagram.
    pub fn figure(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: QuestionType::Mcq,
            question: FIGURE.to_string(),
            options: Some(figure_options()),
            answer: None,
        }
    }

    /// True when this record is the all-FIGURE placeholder.
    pub fn is_figure(&self) -> bool {
        self.question == FIGURE
            && self
                .options
                .as_ref()
                .is_some_and(|opts| *opts == figure_options())
    }
}

/// Format a question number's digit run as a record id (`"007"` → `"Q7"`).
///
/// Works on the digits directly, so there is no upper bound on the number.
pub fn question_id(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "Q0".to_string(),
        n => format!("Q{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn figure_record_serializes_all_four_options() {
        let rec = QuestionRecord::figure("Q4");
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            v,
            json!({
                "id": "Q4",
                "type": "MCQ",
                "question": "FIGURE",
                "options": {"A": "FIGURE", "B": "FIGURE", "C": "FIGURE", "D": "FIGURE"}
            })
        );
        assert!(rec.is_figure());
    }

    #[test]
    fn nat_record_omits_options_and_answer() {
        let rec = QuestionRecord {
            id: "Q3".into(),
            kind: QuestionType::Nat,
            question: "Compute x".into(),
            options: None,
            answer: None,
        };
        let s = serde_json::to_string(&rec).unwrap();
        assert!(!s.contains("options"), "got: {s}");
        assert!(!s.contains("answer"), "got: {s}");
        assert!(s.contains(r#""type":"NAT""#), "got: {s}");
    }

    #[test]
    fn field_order_is_stable() {
        let mut rec = QuestionRecord::figure("Q1");
        rec.answer = Some("B".into());
        let s = serde_json::to_string(&rec).unwrap();
        let id = s.find("\"id\"").unwrap();
        let ty = s.find("\"type\"").unwrap();
        let q = s.find("\"question\"").unwrap();
        let o = s.find("\"options\"").unwrap();
        let a = s.find("\"answer\"").unwrap();
        assert!(id < ty && ty < q && q < o && o < a);
    }

    #[test]
    fn json_round_trip_preserves_records() {
        let mut options = Options::new();
        options.insert(OptionLabel::B, "5".into());
        options.insert(OptionLabel::A, "4".into());
        let records = vec![
            QuestionRecord {
                id: "Q2".into(),
                kind: QuestionType::Msq,
                question: "Which of the following is/are prime?".into(),
                options: Some(options),
                answer: Some("B".into()),
            },
            QuestionRecord {
                id: "Q3".into(),
                kind: QuestionType::Nat,
                question: "Gödel number, rounded off to 2 places".into(),
                options: None,
                answer: None,
            },
        ];
        let s = serde_json::to_string_pretty(&records).unwrap();
        assert!(s.contains("Gödel"), "non-ASCII must be literal");
        let back: Vec<QuestionRecord> = serde_json::from_str(&s).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn option_labels_order_a_to_d() {
        assert_eq!(OptionLabel::from_char('C'), Some(OptionLabel::C));
        assert_eq!(OptionLabel::from_char('E'), None);
        assert_eq!(OptionLabel::from_char('a'), None);
        assert!(OptionLabel::A < OptionLabel::D);
    }

    #[test]
    fn question_id_drops_leading_zeros() {
        assert_eq!(question_id("007"), "Q7");
        assert_eq!(question_id("12"), "Q12");
        assert_eq!(question_id("000"), "Q0");
        assert_eq!(question_id("0"), "Q0");
    }

    #[test]
    fn question_id_has_no_upper_bound() {
        assert_eq!(
            question_id("000123456789012345678901"),
            "Q123456789012345678901"
        );
    }
}
