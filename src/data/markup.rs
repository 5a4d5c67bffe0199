//! Pasted markup as a plain tree of elements and text.
//!
//! Clipboard HTML is rarely well formed: optional end tags, void elements,
//! stray `<`, unbalanced quotes and office instructions are all common.
//! [`normalize_markup`] applies the HTML tokenizing rules first, the XML
//! reader then runs in its most lenient mode, and [`TreeBuilder`] repairs the
//! nesting the way a browser would for the table elements we care about.

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, resolve_xml_entity};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;

/// Tag of the synthetic root wrapping a parsed fragment.
pub const ROOT_TAG: &str = "#fragment";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is never displayed.
const HIDDEN_TEXT: &[&str] = &["script", "style", "title", "template"];

/// Elements that start a new line in rendered text.
const BLOCK_ELEMENTS: &[&str] = &["div", "p", "li"];

const CELL_TAGS: &[&str] = &["td", "th"];
const SECTION_TAGS: &[&str] = &["thead", "tbody", "tfoot"];

// ---------------------------------------------------------------------------
// Node / Element
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with a lower-case tag name and its children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants whose tag is one of `tags`, in document order.
    pub fn select(&self, tags: &'static [&'static str]) -> impl Iterator<Item = &Element> + '_ {
        self.descendants().filter(move |el| tags.contains(&el.tag.as_str()))
    }

    /// Rendered text: whitespace runs collapse to one space, `<br>` and block
    /// elements break lines, every line is trimmed.
    pub fn inner_text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => push_collapsed(out, text),
                Node::Element(el) if el.tag == "br" => out.push('\n'),
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.tag.as_str()) => {
                    out.push('\n');
                    el.collect_text(out);
                    out.push('\n');
                }
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}

/// Collapse whitespace runs (line breaks included) to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pre-order walk over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                self.stack.extend(el.children.iter().rev());
                return Some(el);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an HTML fragment (or plain text) into a tree under a [`ROOT_TAG`] root.
pub fn parse_fragment(markup: &str) -> Result<Element, ExtractError> {
    let cleaned = normalize_markup(markup);

    let mut reader = Reader::from_str(&cleaned);
    let config = reader.config_mut();
    config.check_comments = false;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    config.expand_empty_elements = false;
    config.trim_text(false);

    let mut builder = TreeBuilder::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(event) => builder.open(tag_name(event.name().as_ref())),
            Event::End(event) => builder.close(&tag_name(event.name().as_ref())),
            Event::Text(event) => builder.text(&event.xml_content()?),
            Event::GeneralRef(event) => builder.text(&resolve_reference(&event.xml_content()?)),
            _ => (),
        }
    }
    Ok(builder.finish())
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Resolve the inside of `&...;`. Unknown names are kept verbatim.
fn resolve_reference(name: &str) -> Cow<'static, str> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        return match code.and_then(char::from_u32) {
            Some(ch) => Cow::Owned(ch.to_string()),
            None => Cow::Owned(format!("&{name};")),
        };
    }
    resolve_xml_entity(name)
        .or_else(|| resolve_html5_entity(name))
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(format!("&{name};")))
}

// ---------------------------------------------------------------------------
// Normalization – HTML tokenizing rules the XML reader does not know
// ---------------------------------------------------------------------------

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT: &[&str] = &["script", "style", "title"];

/// Rewrite clipboard HTML into markup the XML reader always accepts, keeping
/// what a browser would show:
///
/// - tags lose their attributes; a quoted value may contain `>`, and an
///   unterminated quote runs to the end of input
/// - comments, `<!...>` declarations and `<?...>` instructions are dropped
/// - a `<` that does not open a tag is text, and so is a bare `&`
/// - `script`, `style` and `title` content is skipped up to the end tag
fn normalize_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        let (head, tail) = rest[pos..].split_at(1);
        rest = if head == "&" {
            out.push_str(if is_reference(tail) { "&" } else { "&amp;" });
            tail
        } else {
            read_tag(tail, &mut out)
        };
    }
    out.push_str(rest);
    out
}

/// Consume the construct following a `<` and return what comes after it.
fn read_tag<'a>(after: &'a str, out: &mut String) -> &'a str {
    if let Some(body) = after.strip_prefix("!--") {
        return body.find("-->").map_or("", |end| &body[end + 3..]);
    }
    if after.starts_with(['!', '?']) {
        return skip_past(after, '>');
    }

    let (closing, named) = match after.strip_prefix('/') {
        Some(tail) => (true, tail),
        None => (false, after),
    };
    if !named.starts_with(|c: char| c.is_ascii_alphabetic()) {
        if closing {
            return skip_past(named, '>');
        }
        out.push_str("&lt;");
        return after;
    }

    let name_end = named
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(named.len());
    let name = named[..name_end]
        .chars()
        .filter(|&c| c.is_alphanumeric() || matches!(c, ':' | '-' | '_' | '.'))
        .collect::<String>()
        .to_ascii_lowercase();
    let Some(rest) = skip_attributes(&named[name_end..]) else {
        return "";
    };

    out.push('<');
    if closing {
        out.push('/');
    }
    out.push_str(&name);
    out.push('>');

    if !closing && RAW_TEXT.contains(&name.as_str()) {
        return skip_raw_text(rest, &name);
    }
    rest
}

fn skip_past(s: &str, end: char) -> &str {
    s.find(end).map_or("", |i| &s[i + end.len_utf8()..])
}

/// Remainder after the `>` closing a tag, or `None` when input ends first.
/// Quotes only count at the start of an attribute value.
fn skip_attributes(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut value_next = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(&s[i + 1..]),
            b'=' => value_next = true,
            quote @ (b'"' | b'\'') if value_next => {
                let len = bytes[i + 1..].iter().position(|&b| b == quote)?;
                i += len + 1;
                value_next = false;
            }
            b if b.is_ascii_whitespace() => (),
            _ => value_next = false,
        }
        i += 1;
    }
    None
}

/// Skip to the end tag of a raw-text element (left in place), or to the end.
fn skip_raw_text<'a>(s: &'a str, name: &str) -> &'a str {
    let end_tag = format!("</{name}");
    s.to_ascii_lowercase().find(&end_tag).map_or("", |i| &s[i..])
}

/// Whether the text after a `&` is a complete `name;`, `#123;` or `#x1F;`.
fn is_reference(s: &str) -> bool {
    let Some(end) = s.find(';') else {
        return false;
    };
    let name = &s[..end];
    match name.strip_prefix('#') {
        Some(number) => match number.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()),
        },
        None => {
            name.starts_with(|c: char| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

// ---------------------------------------------------------------------------
// TreeBuilder – stack of open elements with HTML table repair rules
// ---------------------------------------------------------------------------

struct TreeBuilder {
    /// `stack[0]` is the root and is never popped.
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: vec![Element::new(ROOT_TAG)],
        }
    }

    fn current(&mut self) -> &mut Element {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open(&mut self, tag: String) {
        match tag.as_str() {
            "td" | "th" => self.pop_through(CELL_TAGS, &["tr", "table"]),
            "tr" => self.pop_through(&["tr"], &["table"]),
            "thead" | "tbody" | "tfoot" => self.pop_through(SECTION_TAGS, &["table"]),
            _ => (),
        }
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            self.current().children.push(Node::Element(Element::new(tag)));
        } else {
            self.stack.push(Element::new(tag));
        }
    }

    /// End tags only reach elements open in the same cell or table; a stray
    /// one (such as `</div>` for a div wrapping the table) is ignored.
    fn close(&mut self, tag: &str) {
        let boundary: &[&str] = match tag {
            "table" => &[],
            "td" | "th" | "tr" | "thead" | "tbody" | "tfoot" | "caption" => &["table"],
            _ => &["td", "th", "caption", "table"],
        };
        self.pop_through(&[tag], boundary);
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() || self.stack.iter().any(|el| HIDDEN_TEXT.contains(&el.tag.as_str())) {
            return;
        }
        let current = self.current();
        match current.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => current.children.push(Node::Text(text.to_string())),
        }
    }

    /// Close the innermost open element named in `targets`, together with
    /// everything opened inside it. Stops without closing anything when a
    /// `boundaries` element is reached first.
    fn pop_through(&mut self, targets: &[&str], boundaries: &[&str]) {
        for i in (1..self.stack.len()).rev() {
            let tag = self.stack[i].tag.as_str();
            if targets.contains(&tag) {
                self.pop_to(i);
                return;
            }
            if boundaries.contains(&tag) {
                return;
            }
        }
    }

    fn pop_to(&mut self, len: usize) {
        while self.stack.len() > len.max(1) {
            if let Some(el) = self.stack.pop() {
                self.current().children.push(Node::Element(el));
            }
        }
    }

    fn finish(mut self) -> Element {
        self.pop_to(1);
        self.stack.pop().unwrap_or_else(|| Element::new(ROOT_TAG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(root: &Element, wanted: &'static [&'static str]) -> Vec<String> {
        root.select(wanted).map(|el| el.tag.clone()).collect()
    }

    #[test]
    fn well_formed_table() {
        let root = parse_fragment("<table><tr><th>Setor</th><th>7h</th></tr></table>").unwrap();
        let table = root.select(&["table"]).next().unwrap();
        assert_eq!(tags(table, &["tr", "th"]), vec!["tr", "th", "th"]);
        assert_eq!(table.inner_text(), "Setor7h");
    }

    #[test]
    fn optional_end_tags_are_repaired() {
        let root = parse_fragment("<table><tr><td>A<td>1<tr><td>B<td>2</table><p>after").unwrap();
        let table = root.select(&["table"]).next().unwrap();
        let rows: Vec<&Element> = table.select(&["tr"]).collect();
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.select(&["td"]).count(), 2);
        }
        assert_eq!(root.select(&["p"]).count(), 1);
        assert_eq!(table.select(&["p"]).count(), 0);
    }

    #[test]
    fn void_elements_and_entities() {
        let root = parse_fragment("<div>Total<br>(m&sup2;)&nbsp;&amp;&#65;&#x42;&bogus;</div>").unwrap();
        let div = root.select(&["div"]).next().unwrap();
        assert_eq!(div.inner_text(), "Total\n(m²) &AB&bogus;");
    }

    #[test]
    fn office_clipboard_noise_is_ignored() {
        let html = r#"<html><head><meta charset=utf-8><style>td { color: red }</style></head>
            <body><!--StartFragment--><![if !supportMisalignedColumns]><col width=64><![endif]>
            <table><tr><td class=xl65>Setor</td></tr></table><!--EndFragment--></body></html>"#;
        let root = parse_fragment(html).unwrap();
        assert_eq!(root.select(&["table"]).count(), 1);
        assert!(!root.inner_text().contains("color"));
    }

    #[test]
    fn whitespace_collapses_and_lines_trim() {
        let cell = Element::new("td").with_text("  1.234,5 \n\t m² ");
        assert_eq!(cell.inner_text(), "1.234,5 m²");
        assert_eq!(normalize_ws("  Setor \n  Produtivo "), "Setor Produtivo");
    }

    fn cell_texts(root: &Element) -> Vec<String> {
        root.select(&["td"]).map(Element::inner_text).collect()
    }

    #[test]
    fn less_than_without_tag_name_is_text() {
        let root = parse_fragment("<table><tr><td>A < B</td><td><5</td><td>1 <= 2 & 3</td></tr></table>").unwrap();
        assert_eq!(cell_texts(&root), vec!["A < B", "<5", "1 <= 2 & 3"]);
    }

    #[test]
    fn script_content_is_raw_text() {
        let html = "<script>if (a<b && c) { s = '<table><tr><td>x'; }</script>\
                    <table><tr><td>Setor</td></tr></table>";
        let root = parse_fragment(html).unwrap();
        assert_eq!(root.select(&["table"]).count(), 1);
        assert_eq!(cell_texts(&root), vec!["Setor"]);
        assert_eq!(root.inner_text(), "Setor");
    }

    #[test]
    fn processing_instructions_and_declarations_are_dropped() {
        let html = r#"<!DOCTYPE html><?xml:namespace prefix = o ns = "urn:schemas-microsoft-com:office:office" />
            <table><tr><td>Setor<o:p></o:p></td></tr></table>"#;
        let root = parse_fragment(html).unwrap();
        assert_eq!(cell_texts(&root), vec!["Setor"]);
    }

    #[test]
    fn unterminated_quote_runs_to_the_next_quote() {
        let html = r#"<table><tr><td class="x>A</td><td>1</td></tr><tr><td class="y">B</td></tr></table>"#;
        let root = parse_fragment(html).unwrap();
        assert_eq!(cell_texts(&root), vec!["B"]);

        let root = parse_fragment(r#"<p>ok</p><p title="never closed>lost"#).unwrap();
        assert_eq!(root.inner_text(), "ok");
    }

    #[test]
    fn quoted_attribute_may_contain_angle_brackets() {
        let root = parse_fragment(r#"<td title="a > b">1</td>"#).unwrap();
        assert_eq!(cell_texts(&root), vec!["1"]);
    }

    #[test]
    fn stray_end_tag_inside_cell_is_ignored() {
        let html = "<div><table><tr><td>Setor</td><td>7h</td></tr>\
                    <tr><td>A</div></td><td>5</td></tr>\
                    <tr><td>B</td><td>6</td></tr></table></div>";
        let root = parse_fragment(html).unwrap();
        let table = root.select(&["table"]).next().unwrap();
        assert_eq!(table.select(&["tr"]).count(), 3);
        assert_eq!(cell_texts(table), vec!["Setor", "7h", "A", "5", "B", "6"]);
        assert_eq!(root.select(&["div"]).next().unwrap().select(&["table"]).count(), 1);
    }

    #[test]
    fn plain_text_has_no_tables() {
        let root = parse_fragment("Setor\t7h\nNorte\t10").unwrap();
        assert_eq!(root.select(&["table"]).count(), 0);
        assert!(root.inner_text().starts_with("Setor"));
    }
}
