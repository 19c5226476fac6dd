//! Display markup parsing.
//!
//! Converts the markup produced by [`EntryRenderer`](crate::render::EntryRenderer) into lines
//! of styled segments the terminal can draw. Only the element set the renderer emits is
//! understood; any other `<` is kept as literal text.

/// Style flags in effect for a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStyle {
    pub bold: bool,
    /// Specialized-term span (`<i class="spec">`)
    pub term: bool,
    /// Cross-reference label (`<i class="link">`)
    pub xref_label: bool,
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
    /// Index into [`RenderedEntry::links`] when this text belongs to a link
    pub link: Option<usize>,
}

/// One article ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedEntry {
    pub lines: Vec<Vec<Segment>>,
    /// Words of every cross-reference link, in reading order
    pub links: Vec<String>,
}

impl RenderedEntry {
    /// Plain text of each line, mostly useful for assertions and logging.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Term,
    XrefLabel,
    Link,
}

enum Token {
    Open(Tag),
    Close(Tag),
    Break,
}

const KNOWN_TAGS: &[(&str, Token)] = &[
    ("<br/>", Token::Break),
    ("<b>", Token::Open(Tag::Bold)),
    ("</b>", Token::Close(Tag::Bold)),
    ("<i class=\"spec\">", Token::Open(Tag::Term)),
    ("<i class=\"link\">", Token::Open(Tag::XrefLabel)),
    ("</i>", Token::Close(Tag::Term)),
    ("<a class=\"xref\">", Token::Open(Tag::Link)),
    ("</a>", Token::Close(Tag::Link)),
];

struct MarkupParser {
    entry: RenderedEntry,
    line: Vec<Segment>,
    text: String,
    open: Vec<Tag>,
    current_link: Option<usize>,
}

impl MarkupParser {
    fn new() -> Self {
        Self {
            entry: RenderedEntry::default(),
            line: Vec::new(),
            text: String::new(),
            open: Vec::new(),
            current_link: None,
        }
    }

    fn style(&self) -> SegmentStyle {
        SegmentStyle {
            bold: self.open.contains(&Tag::Bold),
            term: self.open.contains(&Tag::Term),
            xref_label: self.open.contains(&Tag::XrefLabel),
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        if let Some(index) = self.current_link {
            self.entry.links[index].push_str(&text);
        }
        let style = self.style();
        let link = self.current_link;
        match self.line.last_mut() {
            Some(last) if last.style == style && last.link == link => last.text.push_str(&text),
            _ => self.line.push(Segment { text, style, link }),
        }
    }

    fn apply(&mut self, token: &Token) {
        self.flush_text();
        match token {
            Token::Break => {
                let line = std::mem::take(&mut self.line);
                self.entry.lines.push(line);
            }
            Token::Open(tag) => {
                if *tag == Tag::Link {
                    self.entry.links.push(String::new());
                    self.current_link = Some(self.entry.links.len() - 1);
                }
                self.open.push(*tag);
            }
            Token::Close(tag) => {
                // `</i>` closes whichever italic span is innermost.
                let position = self.open.iter().rposition(|open| match tag {
                    Tag::Term | Tag::XrefLabel => matches!(open, Tag::Term | Tag::XrefLabel),
                    other => open == other,
                });
                if let Some(position) = position {
                    let closed = self.open.remove(position);
                    if closed == Tag::Link {
                        self.current_link = None;
                    }
                }
            }
        }
    }

    fn finish(mut self) -> RenderedEntry {
        self.flush_text();
        if !self.line.is_empty() || self.entry.lines.is_empty() {
            self.entry.lines.push(self.line);
        }
        self.entry
    }
}

/// Parse renderer markup into display lines.
pub fn parse_markup(markup: &str) -> RenderedEntry {
    let mut parser = MarkupParser::new();
    let mut rest = markup;

    while let Some(offset) = rest.find('<') {
        parser.text.push_str(&rest[..offset]);
        rest = &rest[offset..];

        match KNOWN_TAGS.iter().find(|(tag, _)| rest.starts_with(tag)) {
            Some((tag, token)) => {
                parser.apply(token);
                rest = &rest[tag.len()..];
            }
            None => {
                parser.text.push('<');
                rest = &rest[1..];
            }
        }
    }
    parser.text.push_str(rest);

    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::entry::{render_entry, EntryMeta};

    #[test]
    fn breaks_split_lines() {
        let entry = parse_markup("bir<br/>eki<br/>üç");
        assert_eq!(entry.plain_lines(), vec!["bir", "eki", "üç"]);
    }

    #[test]
    fn bold_lead_is_marked() {
        let entry = parse_markup("<b>kitap evi</b> библиотека");
        assert_eq!(entry.lines[0].len(), 2);
        assert!(entry.lines[0][0].style.bold);
        assert_eq!(entry.lines[0][0].text, "kitap evi");
        assert!(!entry.lines[0][1].style.bold);
    }

    #[test]
    fn cross_reference_links_are_collected() {
        let markup = render_entry("см. bir, eki", "w", EntryMeta::default());
        let entry = parse_markup(&markup);

        assert_eq!(entry.links, vec!["bir", "eki"]);
        assert_eq!(entry.plain_lines(), vec!["см. bir, eki"]);
        let label = &entry.lines[0][0];
        assert_eq!(label.text, "см.");
        assert!(label.style.xref_label);
        let linked: Vec<_> = entry.lines[0]
            .iter()
            .filter_map(|segment| segment.link.map(|i| (i, segment.text.as_str())))
            .collect();
        assert_eq!(linked, vec![(0, "bir"), (1, "eki")]);
    }

    #[test]
    fn nested_term_spans_close_innermost_first() {
        let entry = parse_markup(r#"<i class="spec"><i class="spec">перен.</i> x</i> y"#);
        let terms: Vec<bool> = entry.lines[0].iter().map(|s| s.style.term).collect();
        assert_eq!(terms, vec![true, false]);
        assert_eq!(entry.plain_lines(), vec!["перен. x y"]);
    }

    #[test]
    fn unknown_markup_is_literal() {
        let entry = parse_markup("a < b <em>c</em>");
        assert_eq!(entry.plain_lines(), vec!["a < b <em>c</em>"]);
    }

    #[test]
    fn empty_input_has_one_empty_line() {
        let entry = parse_markup("");
        assert_eq!(entry.lines.len(), 1);
        assert!(entry.lines[0].is_empty());
    }

    #[test]
    fn trailing_break_does_not_add_phantom_line() {
        let entry = parse_markup("bir<br/>");
        assert_eq!(entry.plain_lines(), vec!["bir"]);
    }
}
