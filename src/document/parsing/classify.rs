//! Line classification
//!
//! Turns the body lines of a document into [`LineRecord`]s. Equation and
//! fenced blocks span several lines and are collapsed into one record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::models::LineRecord;
use crate::error::{Error, Result};

const PAGE_BREAK: &str = "---";
const EQUATION_FENCE: &str = "$$";
const CODE_FENCE: &str = "```";
const DIAGRAM_TAG: &str = "mermaid";

static DIAGRAM_CAPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]]+)\]").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([*+-])\s+(.*)$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,9}) (.*)$").unwrap());
static REFERENCE_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\^([^\[\]]+)\]: (.*)$").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!\[(.+?)\]\(([^()]+)\)$").unwrap());

/// What to do with a `mermaid` fence that carries no `[caption]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncaptionedDiagramPolicy {
    /// Skip the whole block, producing no output
    #[default]
    Drop,
    /// Fail with [`Error::MalformedDiagramBlock`]
    Reject,
}

/// Classify body lines using the default (dropping) fence policy.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LineRecord> {
    steps(lines).filter_map(|(_, record)| record).collect()
}

/// Classify body lines, applying `policy` to uncaptioned diagram fences.
///
/// `first_line` is the 1-based source line number of `lines[0]`, used in
/// error messages.
pub fn classify_lines_with<S: AsRef<str>>(
    lines: &[S],
    first_line: usize,
    policy: UncaptionedDiagramPolicy,
) -> Result<Vec<LineRecord>> {
    let mut records = Vec::with_capacity(lines.len());

    for (index, record) in steps(lines) {
        if policy == UncaptionedDiagramPolicy::Reject && is_uncaptioned_diagram(lines[index].as_ref())
        {
            return Err(Error::MalformedDiagramBlock {
                line: first_line + index,
            });
        }
        records.extend(record);
    }

    Ok(records)
}

/// Walk `lines`, yielding the index where each construct starts and the
/// record it produced, if any.
fn steps<S: AsRef<str>>(lines: &[S]) -> impl Iterator<Item = (usize, Option<LineRecord>)> + '_ {
    let mut index = 0;
    std::iter::from_fn(move || {
        (index < lines.len()).then(|| {
            let start = index;
            let (record, next) = classify_at(lines, index);
            index = next;
            (start, record)
        })
    })
}

fn is_uncaptioned_diagram(line: &str) -> bool {
    line.strip_prefix(CODE_FENCE)
        .and_then(|rest| rest.strip_prefix(DIAGRAM_TAG))
        .is_some_and(|attrs| !DIAGRAM_CAPTION.is_match(attrs))
}

/// Classify the line at `index`, returning the record (if any) and the index
/// of the next unconsumed line.
fn classify_at<S: AsRef<str>>(lines: &[S], index: usize) -> (Option<LineRecord>, usize) {
    let line = lines[index].as_ref();

    if line.is_empty() {
        return (Some(LineRecord::Empty), index + 1);
    }

    if line == PAGE_BREAK {
        return (Some(LineRecord::PageBreak), index + 1);
    }

    if line == EQUATION_FENCE {
        let (body, next) = collect_block(lines, index + 1, EQUATION_FENCE);
        let latex = format!("{EQUATION_FENCE}\n{}\n{EQUATION_FENCE}", body.join("\n"));
        return (Some(LineRecord::Equation { latex }), next);
    }

    if let Some(info) = line.strip_prefix(CODE_FENCE) {
        let (body, next) = collect_block(lines, index + 1, CODE_FENCE);
        let caption = info
            .strip_prefix(DIAGRAM_TAG)
            .and_then(|attrs| DIAGRAM_CAPTION.captures(attrs))
            .map(|captures| captures[1].to_string());

        return match caption {
            Some(caption) => {
                let mut content = String::new();
                for line in body {
                    content.push_str(line);
                    content.push('\n');
                }
                (Some(LineRecord::Diagram { content, caption }), next)
            }
            None => {
                tracing::warn!(
                    line = index + 1,
                    fence = info,
                    skipped_lines = body.len(),
                    "dropping fenced block without diagram caption"
                );
                (None, next)
            }
        };
    }

    (Some(classify_single(line)), index + 1)
}

/// Collect lines from `start` up to (not including) the `closer` line.
/// Returns the collected lines and the index just past the closer; an
/// unterminated block runs to the end of input.
fn collect_block<'a, S: AsRef<str>>(
    lines: &'a [S],
    start: usize,
    closer: &str,
) -> (Vec<&'a str>, usize) {
    let mut body = Vec::new();
    let mut index = start;

    while index < lines.len() {
        let line = lines[index].as_ref();
        if line == closer {
            return (body, index + 1);
        }
        body.push(line);
        index += 1;
    }

    (body, index)
}

fn classify_single(line: &str) -> LineRecord {
    if let Some(captures) = LIST_ITEM.captures(line) {
        let marker = captures[1].chars().next().unwrap_or('*');
        return LineRecord::ListItem {
            marker,
            text: captures[2].to_string(),
        };
    }

    if let Some(captures) = HEADING.captures(line) {
        return LineRecord::Heading {
            level: captures[1].len() as u8,
            text: captures[2].to_string(),
        };
    }

    if let Some(captures) = REFERENCE_DEFINITION.captures(line) {
        return LineRecord::ReferenceDefinition {
            key: captures[1].to_string(),
            text: captures[2].to_string(),
        };
    }

    if let Some(captures) = IMAGE.captures(line) {
        return LineRecord::Image {
            description: captures[1].to_string(),
            path: captures[2].to_string(),
        };
    }

    LineRecord::Paragraph {
        text: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> LineRecord {
        LineRecord::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_single_line_kinds() {
        let records = classify_lines(&[
            "",
            "---",
            "* star item",
            "- dash item",
            "+ plus item",
            "## Background",
            "[^smith]: Smith, J. (2020)",
            "![Overview chart](img/chart.png)",
            "Plain text.",
        ]);

        assert_eq!(
            records,
            vec![
                LineRecord::Empty,
                LineRecord::PageBreak,
                LineRecord::ListItem {
                    marker: '*',
                    text: "star item".to_string()
                },
                LineRecord::ListItem {
                    marker: '-',
                    text: "dash item".to_string()
                },
                LineRecord::ListItem {
                    marker: '+',
                    text: "plus item".to_string()
                },
                LineRecord::Heading {
                    level: 2,
                    text: "Background".to_string()
                },
                LineRecord::ReferenceDefinition {
                    key: "smith".to_string(),
                    text: "Smith, J. (2020)".to_string()
                },
                LineRecord::Image {
                    description: "Overview chart".to_string(),
                    path: "img/chart.png".to_string()
                },
                paragraph("Plain text."),
            ]
        );
    }

    #[test]
    fn test_near_misses_fall_through_to_paragraph() {
        let lines = [
            "#NoSpace",
            "########## ten hashes",
            "*emphasis*",
            "----",
            " ---",
            "![](empty.png)",
            "[^key] no colon",
        ];
        let records = classify_lines(&lines);
        let expected: Vec<_> = lines.iter().map(|line| paragraph(line)).collect();
        assert_eq!(records, expected);
    }

    #[test]
    fn test_whitespace_only_line_is_paragraph() {
        assert_eq!(classify_lines(&["   "]), vec![paragraph("   ")]);
    }

    #[test]
    fn test_equation_block_collapses() {
        let records = classify_lines(&["before", "$$", "a^2 + b^2", "= c^2", "$$", "after"]);
        assert_eq!(
            records,
            vec![
                paragraph("before"),
                LineRecord::Equation {
                    latex: "$$\na^2 + b^2\n= c^2\n$$".to_string()
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn test_unterminated_equation_runs_to_end() {
        let records = classify_lines(&["$$", "x + y"]);
        assert_eq!(
            records,
            vec![LineRecord::Equation {
                latex: "$$\nx + y\n$$".to_string()
            }]
        );
    }

    #[test]
    fn test_captioned_diagram() {
        let records = classify_lines(&[
            "```mermaid[Login flow]",
            "graph TD",
            "  A --> B",
            "```",
            "tail",
        ]);
        assert_eq!(
            records,
            vec![
                LineRecord::Diagram {
                    content: "graph TD\n  A --> B\n".to_string(),
                    caption: "Login flow".to_string()
                },
                paragraph("tail"),
            ]
        );
    }

    #[test]
    fn test_uncaptioned_and_foreign_fences_are_dropped() {
        let records = classify_lines(&[
            "```mermaid",
            "graph TD",
            "```",
            "```rust",
            "fn main() {}",
            "```",
            "```",
            "# not a heading",
            "```",
            "kept",
        ]);
        assert_eq!(records, vec![paragraph("kept")]);
    }

    #[test]
    fn test_reject_policy_reports_line() {
        let lines = ["intro", "", "```mermaid", "graph TD", "```"];
        let err = classify_lines_with(&lines, 5, UncaptionedDiagramPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::MalformedDiagramBlock { line: 7 }));
    }

    #[test]
    fn test_reject_policy_still_drops_other_languages() {
        let lines = ["```python", "print(1)", "```", "ok"];
        let records = classify_lines_with(&lines, 1, UncaptionedDiagramPolicy::Reject).unwrap();
        assert_eq!(records, vec![paragraph("ok")]);
    }

    #[test]
    fn test_drop_policy_matches_default_classification() {
        let lines = [
            "# Intro",
            "```mermaid",
            "graph TD",
            "```",
            "$$",
            "x = 1",
            "$$",
            "- item",
        ];
        let records = classify_lines_with(&lines, 1, UncaptionedDiagramPolicy::Drop).unwrap();
        assert_eq!(records, classify_lines(&lines));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_diagram_caption_with_brackets_is_uncaptioned() {
        assert!(is_uncaptioned_diagram("```mermaid[]"));
        assert!(is_uncaptioned_diagram("```mermaid [Flow]"));
        assert!(!is_uncaptioned_diagram("```mermaid[Flow]"));
        assert!(!is_uncaptioned_diagram("```text"));
    }
}
