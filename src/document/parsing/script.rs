//! Mixed-script run splitting
//!
//! Word picks a font per run, so text that mixes Japanese and Latin script
//! has to be cut into runs before fonts can be assigned.

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::models::ScriptRegion;

static WIDE_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Hiragana}\p{Katakana}\p{Han}ー（）．，]+").expect("valid wide-script pattern")
});

/// A maximal slice of the input belonging to one script region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun<'a> {
    pub content: &'a str,
    pub region: ScriptRegion,
}

/// Split `text` into alternating wide/other runs.
///
/// Runs are never empty, and concatenating their contents yields `text`.
pub fn split_script_runs(text: &str) -> Vec<ScriptRun<'_>> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for found in WIDE_SCRIPT.find_iter(text) {
        if found.start() > cursor {
            runs.push(ScriptRun {
                content: &text[cursor..found.start()],
                region: ScriptRegion::Other,
            });
        }
        runs.push(ScriptRun {
            content: found.as_str(),
            region: ScriptRegion::Wide,
        });
        cursor = found.end();
    }

    if cursor < text.len() {
        runs.push(ScriptRun {
            content: &text[cursor..],
            region: ScriptRegion::Other,
        });
    }

    runs
}
