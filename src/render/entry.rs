//! Dictionary entry rendering.
//!
//! Raw article bodies use a small annotation language: `~` stands for (part of) the
//! headword, `\n` escapes, `/.../` marks specialized terms, `см.`/`ср.` introduce
//! cross-references, `lead - rest` lines define a sub-headword, `◊` divides senses and `; `
//! separates clauses. [`EntryRenderer`] turns such a body into display markup made of
//! `<b>`, `<i class="spec">`, `<i class="link">`, `<a class="xref">` and `<br/>` elements.
//!
//! Every stage is a pure `&str -> String` function and the stages run in a fixed order.
//! The output is not valid input: rendering it again would double-convert breaks.

use crate::model::Translation;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder replaced by the (possibly truncated) headword.
pub const SHORTENING_MARKER: char = '~';
/// Glyph separating the senses of a word.
pub const SENSE_MARKER: &str = "◊";
/// Structural line break emitted by the pipeline.
pub const LINE_BREAK: &str = "<br/>";
/// Dictionary whose entries receive abbreviation styling unless configured otherwise.
pub const DEFAULT_STYLED_DICTIONARY: &str = "crh-ru";

static TERM_ABBREVIATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(лингв|перен|физ|хим|бот|биол|зоо|грам|геогр|астр|шк|мат|анат|ирон|этн|стр|рел|посл|уст)\.",
    )
    .expect("abbreviation pattern")
});

static SLASH_TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(.+?)/").expect("slash pattern"));

static CROSS_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(ср|см)\. (.+)$").expect("cross-reference pattern"));

static LIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").expect("list pattern"));

static HEADWORD_DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(.[^)\n].+?) - (.+?)$").expect("definition pattern"));

/// Per-entry metadata taken from the selected headword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMeta<'a> {
    pub dict: &'a str,
    pub shortening_pos: Option<u32>,
}

impl<'a> From<&'a Translation> for EntryMeta<'a> {
    fn from(translation: &'a Translation) -> Self {
        Self {
            dict: &translation.dict,
            shortening_pos: translation.shortening_pos,
        }
    }
}

/// Runs the entry pipeline. Only `styled_dictionary` entries get abbreviation styling.
#[derive(Debug, Clone)]
pub struct EntryRenderer {
    styled_dictionary: String,
}

impl Default for EntryRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_STYLED_DICTIONARY)
    }
}

impl EntryRenderer {
    pub fn new(styled_dictionary: impl Into<String>) -> Self {
        Self {
            styled_dictionary: styled_dictionary.into(),
        }
    }

    /// Render one raw article body for `headword`.
    pub fn render(&self, raw_text: &str, headword: &str, meta: EntryMeta<'_>) -> String {
        let text = expand_shortenings(raw_text, headword, meta.shortening_pos);
        let text = literalize_newlines(&text);
        let text = if meta.dict == self.styled_dictionary {
            style_terms(&text)
        } else {
            text
        };
        let text = link_cross_references(&text);
        let text = bold_headword_definitions(&text);
        let text = break_around_sense_markers(&text);
        let text = materialize_line_breaks(&text);
        break_clauses(&text)
    }
}

/// Render with the default styled dictionary.
pub fn render_entry(raw_text: &str, headword: &str, meta: EntryMeta<'_>) -> String {
    EntryRenderer::default().render(raw_text, headword, meta)
}

/// Replace every `~` with the headword, cut to `shortening_pos` characters when set.
///
/// A missing position and a position of zero both substitute the whole headword.
pub fn expand_shortenings(text: &str, headword: &str, shortening_pos: Option<u32>) -> String {
    if !text.contains(SHORTENING_MARKER) {
        return text.to_string();
    }

    let replacement: String = match shortening_pos {
        None | Some(0) => headword.to_string(),
        Some(pos) => headword.chars().take(pos as usize).collect(),
    };
    text.replace(SHORTENING_MARKER, &replacement)
}

/// Turn the two-character escape `\n` into a real newline.
pub fn literalize_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Wrap `/slashed/` spans and subject-field abbreviations in a specialized-term span.
///
/// Slashed spans go first so that the `</i>` produced for abbreviations is never
/// mistaken for a slash delimiter.
pub fn style_terms(text: &str) -> String {
    let text = SLASH_TERM.replace_all(text, r#"<i class="spec">${1}</i>"#);
    TERM_ABBREVIATION
        .replace_all(&text, r#"<i class="spec">${0}</i>"#)
        .into_owned()
}

/// Turn `см. a, b` / `ср. a, b` runs into a label followed by one link per word.
pub fn link_cross_references(text: &str) -> String {
    CROSS_REFERENCE
        .replace_all(text, |caps: &Captures| {
            let links: Vec<String> = LIST_SEPARATOR
                .split(&caps[2])
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(|word| format!(r#"<a class="xref">{word}</a>"#))
                .collect();
            format!(r#"<i class="link">{}.</i> {}"#, &caps[1], links.join(", "))
        })
        .into_owned()
}

/// Bold the lead of every `lead - rest` line whose second character is not `)`.
pub fn bold_headword_definitions(text: &str) -> String {
    HEADWORD_DEFINITION
        .replace_all(text, "<b>${1}</b> ${2}")
        .into_owned()
}

/// Force a line break on both sides of every sense marker.
pub fn break_around_sense_markers(text: &str) -> String {
    text.replace(SENSE_MARKER, "\n◊\n")
}

pub fn materialize_line_breaks(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

pub fn break_clauses(text: &str) -> String {
    text.replace("; ", LINE_BREAK)
}
