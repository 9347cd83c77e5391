//! Span-keeping reader for the UnityYAML subset found in serialized assets.
//!
//! Unity writes block mappings, block sequences at the same indentation as
//! their parent key, short flow collections (`{fileID: 0}`, `[]`) and plain or
//! quoted scalars. This reader understands exactly that subset and records the
//! byte span of every node in the source text, so callers can splice new text
//! over one node and keep every other byte.
//!
//! Flow collections are not decoded; their raw text is kept.

use std::ops::Range;

/// A structural error, with the zero-based line index it was found on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub(crate) struct ParseError {
    pub line: usize,
    pub message: &'static str,
}

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Scalar(String),
    Flow(String),
    Map(Vec<Field>),
    Seq(Vec<Node>),
}

/// A value and the bytes it occupies.
///
/// For block collections the span starts at the beginning of the first line
/// (indentation included) and ends at the end of the last line, without the
/// line break.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    pub value: Value,
    pub span: Range<usize>,
}

/// One `key: value` pair of a block mapping.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub key: String,
    /// Offset of the first byte of the key.
    pub key_start: usize,
    /// Column of the key.
    pub column: usize,
    pub value: Node,
}

impl Field {
    /// Byte range from the key to the end of the value.
    pub fn span(&self) -> Range<usize> {
        self.key_start..self.value.span.end.max(self.key_start)
    }
}

impl Node {
    /// Returns the field named `key` if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Field> {
        match &self.value {
            Value::Map(fields) => fields.iter().find(|field| field.key == key),
            _ => None,
        }
    }

    /// Returns the scalar text, if this node is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.value {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for an empty flow sequence or an empty plain scalar.
    pub fn is_empty_collection(&self) -> bool {
        match &self.value {
            Value::Scalar(s) => s.is_empty(),
            Value::Flow(raw) => raw.chars().filter(|c| !c.is_whitespace()).eq("[]".chars()),
            Value::Seq(items) => items.is_empty(),
            Value::Map(fields) => fields.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    indent: usize,
    content: usize,
    significant: bool,
}

/// Parses `src[range]` as one block collection.
///
/// The whole range must be consumed; trailing content that does not belong
/// to the first collection is an error.
pub(crate) fn parse(src: &str, range: Range<usize>) -> Result<Node, ParseError> {
    let mut reader = Reader::new(src, range);
    let node = reader.parse_block()?;
    if let Some(idx) = reader.peek() {
        return Err(error(idx, "content outside of the top-level collection"));
    }
    Ok(node)
}

struct Reader<'s> {
    src: &'s str,
    lines: Vec<Line>,
    pos: usize,
}

impl<'s> Reader<'s> {
    fn new(src: &'s str, range: Range<usize>) -> Self {
        let mut lines = Vec::new();
        let mut start = range.start;
        for raw in src[range].split('\n') {
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            let indent = text.len() - text.trim_start_matches(' ').len();
            let trimmed = text.trim();
            lines.push(Line {
                start,
                end: start + text.len(),
                indent,
                content: start + indent,
                significant: !trimmed.is_empty() && !trimmed.starts_with('#'),
            });
            start += raw.len() + 1;
        }
        Self { src, lines, pos: 0 }
    }

    fn text(&self, line: &Line) -> &'s str {
        &self.src[line.content..line.end]
    }

    /// Moves past insignificant lines and returns the next significant one.
    fn peek(&mut self) -> Option<usize> {
        while self.pos < self.lines.len() && !self.lines[self.pos].significant {
            self.pos += 1;
        }
        (self.pos < self.lines.len()).then_some(self.pos)
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let idx = self
            .peek()
            .ok_or(error(self.lines.len(), "expected a block collection"))?;
        let line = self.lines[idx];
        let text = self.text(&line);
        if text.starts_with('\t') {
            return Err(error(idx, "tab used for indentation"));
        }
        if is_seq_item(text) {
            self.parse_seq(line.indent)
        } else {
            self.parse_map(line.indent)
        }
    }

    fn parse_map(&mut self, indent: usize) -> Result<Node, ParseError> {
        let mut fields = Vec::new();
        let mut span: Option<Range<usize>> = None;

        while let Some(idx) = self.peek() {
            let line = self.lines[idx];
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(error(idx, "unexpected indentation"));
            }
            let text = self.text(&line);
            if is_seq_item(text) {
                break;
            }
            if text.starts_with('\t') {
                return Err(error(idx, "tab used for indentation"));
            }
            let (key, value_offset) =
                split_key(text).ok_or(error(idx, "expected a mapping key"))?;
            self.pos = idx + 1;

            let value = self.parse_field_value(idx, line.content + value_offset)?;
            let end = value.span.end.max(line.end);
            span = Some(span.map_or(line.start..end, |s| s.start..end));
            fields.push(Field {
                key,
                key_start: line.content,
                column: line.indent,
                value,
            });
        }

        let span = span.unwrap_or_else(|| self.empty_span());
        Ok(Node {
            value: Value::Map(fields),
            span,
        })
    }

    fn parse_seq(&mut self, indent: usize) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        let mut span: Option<Range<usize>> = None;

        while let Some(idx) = self.peek() {
            let line = self.lines[idx];
            if line.indent < indent {
                break;
            }
            let text = self.text(&line);
            if line.indent > indent {
                return Err(error(idx, "unexpected indentation"));
            }
            if !is_seq_item(text) {
                break;
            }

            let after_dash = &text[1..];
            let gap = after_dash.len() - after_dash.trim_start_matches(' ').len();
            let rest = &after_dash[gap..];

            let mut item = if rest.is_empty() || rest.starts_with('#') {
                self.pos = idx + 1;
                match self.peek() {
                    Some(next) if self.lines[next].indent > indent => self.parse_block()?,
                    _ => Node {
                        value: Value::Scalar(String::new()),
                        span: line.start..line.end,
                    },
                }
            } else {
                let column = indent + 1 + gap;
                let content = line.content + 1 + gap;
                if starts_inline(rest) || (!is_seq_item(rest) && split_key(rest).is_none()) {
                    self.pos = idx + 1;
                    self.parse_inline(idx, indent, content)?
                } else {
                    // Re-read the rest of the line as if it started a block
                    // at its own column.
                    self.lines[idx] = Line {
                        indent: column,
                        content,
                        ..line
                    };
                    self.parse_block()?
                }
            };

            item.span.start = line.start;
            let end = item.span.end.max(line.end);
            item.span.end = end;
            span = Some(span.map_or(line.start..end, |s| s.start..end));
            items.push(item);
        }

        let span = span.unwrap_or_else(|| self.empty_span());
        Ok(Node {
            value: Value::Seq(items),
            span,
        })
    }

    /// Parses the value of a mapping field whose text starts at `from` on
    /// line `idx`.
    fn parse_field_value(&mut self, idx: usize, from: usize) -> Result<Node, ParseError> {
        let line = self.lines[idx];
        let rest = &self.src[from..line.end];
        let gap = rest.len() - rest.trim_start().len();
        let from = from + gap;
        let rest = rest.trim();

        if !rest.is_empty() && !rest.starts_with('#') {
            return self.parse_inline(idx, line.indent, from);
        }

        match self.peek() {
            Some(next) if self.lines[next].indent > line.indent => self.parse_block(),
            Some(next)
                if self.lines[next].indent == line.indent
                    && is_seq_item(self.text(&self.lines[next])) =>
            {
                self.parse_seq(line.indent)
            }
            _ => Ok(Node {
                value: Value::Scalar(String::new()),
                span: from..from,
            }),
        }
    }

    /// Parses a value that starts on the current line at `from`. `indent` is
    /// the indentation of the owning key or dash; continuation lines must be
    /// indented deeper.
    fn parse_inline(&mut self, idx: usize, indent: usize, from: usize) -> Result<Node, ParseError> {
        let line = self.lines[idx];
        let first = self.src[from..line.end].chars().next().unwrap_or(' ');

        match first {
            '[' | '{' | '"' | '\'' => {
                let (end, last) = self.scan_delimited(idx, from)?;
                self.expect_line_tail(last, end)?;
                self.pos = last + 1;
                let raw = &self.src[from..end];
                let value = match first {
                    '"' => Value::Scalar(unescape_double(&fold(&raw[1..raw.len() - 1]))),
                    '\'' => Value::Scalar(fold(&raw[1..raw.len() - 1]).replace("''", "'")),
                    _ => Value::Flow(raw.to_string()),
                };
                Ok(Node {
                    value,
                    span: from..end,
                })
            }
            '|' | '>' => Ok(self.parse_block_scalar(idx, indent, first == '|', from)),
            _ => {
                let head = strip_comment(&self.src[from..line.end]);
                if split_key(head).is_some() {
                    return Err(error(idx, "mapping value inside a plain scalar"));
                }
                let mut text = head.to_string();
                let mut end = from + head.len();
                while let Some(next) = self.peek() {
                    let cont = self.lines[next];
                    if cont.indent <= indent {
                        break;
                    }
                    let piece = strip_comment(self.text(&cont));
                    if split_key(piece).is_some() || is_seq_item(piece) {
                        return Err(error(next, "mapping value inside a plain scalar"));
                    }
                    text.push(' ');
                    text.push_str(piece);
                    end = cont.content + piece.len();
                    self.pos = next + 1;
                }
                Ok(Node {
                    value: Value::Scalar(text),
                    span: from..end,
                })
            }
        }
    }

    fn parse_block_scalar(&mut self, idx: usize, indent: usize, literal: bool, from: usize) -> Node {
        let mut end = self.lines[idx].end;
        let mut parts: Vec<&str> = Vec::new();
        let mut body_indent = None;
        let mut k = idx + 1;

        while k < self.lines.len() {
            let line = self.lines[k];
            let blank = self.src[line.start..line.end].trim().is_empty();
            if !blank && line.indent <= indent {
                break;
            }
            if blank {
                parts.push("");
            } else {
                let cut = *body_indent.get_or_insert(line.indent);
                parts.push(&self.src[line.start + cut.min(line.indent)..line.end]);
                end = line.end;
            }
            k += 1;
        }
        while parts.last() == Some(&"") {
            parts.pop();
        }
        self.pos = k;

        let joiner = if literal { "\n" } else { " " };
        let mut text = parts.join(joiner);
        if !text.is_empty() {
            text.push('\n');
        }
        Node {
            value: Value::Scalar(text),
            span: from..end,
        }
    }

    /// Finds the end of a quoted scalar or flow collection starting at
    /// `from`. Returns the offset after the closing character and the index
    /// of the line it is on.
    fn scan_delimited(&self, idx: usize, from: usize) -> Result<(usize, usize), ParseError> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut k = idx;
        let mut at = from;

        while k < self.lines.len() {
            let segment = &self.src[at..self.lines[k].end];
            let mut chars = segment.char_indices().peekable();
            while let Some((i, ch)) = chars.next() {
                let after = at + i + ch.len_utf8();
                match quote {
                    Some('"') => {
                        if escaped {
                            escaped = false;
                        } else if ch == '\\' {
                            escaped = true;
                        } else if ch == '"' {
                            quote = None;
                            if depth == 0 {
                                return Ok((after, k));
                            }
                        }
                    }
                    Some(_) => {
                        if ch == '\'' {
                            if chars.peek().map(|&(_, c)| c) == Some('\'') {
                                chars.next();
                            } else {
                                quote = None;
                                if depth == 0 {
                                    return Ok((after, k));
                                }
                            }
                        }
                    }
                    None => match ch {
                        '"' | '\'' => quote = Some(ch),
                        '[' | '{' => depth += 1,
                        ']' | '}' => {
                            depth = depth
                                .checked_sub(1)
                                .ok_or(error(k, "unbalanced flow collection"))?;
                            if depth == 0 {
                                return Ok((after, k));
                            }
                        }
                        _ => {}
                    },
                }
            }
            k += 1;
            if let Some(next) = self.lines.get(k) {
                at = next.start;
            }
        }

        Err(error(idx, "unterminated quoted scalar or flow collection"))
    }

    fn expect_line_tail(&self, idx: usize, end: usize) -> Result<(), ParseError> {
        let tail = self.src[end..self.lines[idx].end].trim();
        if tail.is_empty() || tail.starts_with('#') {
            Ok(())
        } else {
            Err(error(idx, "unexpected text after value"))
        }
    }

    fn empty_span(&self) -> Range<usize> {
        let at = self
            .lines
            .get(self.pos)
            .or(self.lines.last())
            .map_or(0, |line| line.start);
        at..at
    }
}

fn error(line: usize, message: &'static str) -> ParseError {
    ParseError { line, message }
}

fn is_seq_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ") || text.starts_with("-\t")
}

fn starts_inline(text: &str) -> bool {
    text.starts_with(['[', '{', '"', '\'', '|', '>'])
}

/// Splits `key: rest`, returning the key and the offset just after the
/// colon.
fn split_key(text: &str) -> Option<(String, usize)> {
    if is_seq_item(text) || text.starts_with("? ") {
        return None;
    }

    if let Some(quote @ ('"' | '\'')) = text.chars().next() {
        let close = text[1..].find(quote)? + 1;
        let after = &text[close + 1..];
        let colon = after.find(|c: char| c != ' ')?;
        if !after[colon..].starts_with(':') || !ends_key(&after[colon + 1..]) {
            return None;
        }
        let key = text[1..close].to_string();
        return Some((key, close + 1 + colon + 1));
    }

    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch == '#' && i > 0 && text[..i].ends_with([' ', '\t']) {
            return None;
        }
        if ch == ':' && ends_key(&text[i + 1..]) {
            let key = text[..i].trim_end();
            if key.is_empty() || key.starts_with(['[', '{']) {
                return None;
            }
            return Some((key.to_string(), i + 1));
        }
    }
    None
}

fn ends_key(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with([' ', '\t'])
}

/// Removes a trailing ` # comment` and surrounding whitespace from a plain
/// scalar.
fn strip_comment(text: &str) -> &str {
    let mut cut = text.len();
    for (i, _) in text.match_indices('#') {
        if i == 0 || text[..i].ends_with([' ', '\t']) {
            cut = i;
            break;
        }
    }
    text[..cut].trim()
}

/// Applies YAML line folding to the inside of a multi-line quoted scalar.
fn fold(inner: &str) -> String {
    if !inner.contains('\n') {
        return inner.to_string();
    }
    let lines: Vec<&str> = inner.split('\n').collect();
    let last = lines.len() - 1;
    let mut out = String::new();
    let mut pending_break = false;

    for (i, raw) in lines.iter().enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let piece = match (i == 0, i == last) {
            (true, _) => raw.trim_end(),
            (_, true) => raw.trim_start(),
            _ => raw.trim(),
        };
        if i > 0 {
            if piece.is_empty() && i != last {
                out.push('\n');
                pending_break = true;
                continue;
            }
            if !pending_break {
                out.push(' ');
            }
        }
        pending_break = false;
        out.push_str(piece);
    }
    out
}

fn unescape_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(' ') => out.push(' '),
            Some('/') => out.push('/'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(src: &str) -> Node {
        parse(src, 0..src.len()).unwrap()
    }

    fn scalar<'a>(node: &'a Node, key: &str) -> &'a str {
        node.get(key).unwrap().value.as_scalar().unwrap()
    }

    #[test]
    fn test_flat_map() {
        let src = "a: 1\nb: two words\nc: \n";
        let node = parse_all(src);
        assert_eq!(scalar(&node, "a"), "1");
        assert_eq!(scalar(&node, "b"), "two words");
        assert_eq!(scalar(&node, "c"), "");
    }

    #[test]
    fn test_field_spans() {
        let src = "root:\n  m_Name: Walk\n  m_Other: 1\n";
        let node = parse_all(src);
        let clip = &node.get("root").unwrap().value;
        let name = clip.get("m_Name").unwrap();
        assert_eq!(&src[name.span()], "m_Name: Walk");
        assert_eq!(name.column, 2);
        assert_eq!(&src[clip.span.clone()], "  m_Name: Walk\n  m_Other: 1");
    }

    #[test]
    fn test_indentless_sequence() {
        let src = "\
list:
- a: 1
  b: 2
- a: 3
next: x
";
        let node = parse_all(src);
        let Value::Seq(items) = &node.get("list").unwrap().value.value else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(&src[items[0].span.clone()], "- a: 1\n  b: 2");
        assert_eq!(scalar(&items[0], "b"), "2");
        assert_eq!(scalar(&items[1], "a"), "3");
        assert_eq!(scalar(&node, "next"), "x");
    }

    #[test]
    fn test_nested_sequence_in_item() {
        let src = "\
curves:
- curve:
    m_Curve:
    - time: 0
      value: 1
    - time: 2
  path: Root
";
        let node = parse_all(src);
        let Value::Seq(items) = &node.get("curves").unwrap().value.value else {
            panic!("expected sequence");
        };
        let curve = &items[0].get("curve").unwrap().value;
        let Value::Seq(keys) = &curve.get("m_Curve").unwrap().value.value else {
            panic!("expected keyframes");
        };
        assert_eq!(keys.len(), 2);
        assert_eq!(scalar(&keys[0], "value"), "1");
        assert_eq!(scalar(&items[0], "path"), "Root");
    }

    #[test]
    fn test_flow_values() {
        let src = "script: {fileID: 0}\nempty: []\nmulti: {a: 1,\n  b: 2}\n";
        let node = parse_all(src);
        assert_eq!(
            node.get("script").unwrap().value.value,
            Value::Flow("{fileID: 0}".into())
        );
        assert!(node.get("empty").unwrap().value.is_empty_collection());
        assert!(matches!(node.get("multi").unwrap().value.value, Value::Flow(_)));
    }

    #[test]
    fn test_quoted_scalars() {
        let src = "a: 'it''s'\nb: \"tab\\there\"\nc: \"x: y\"\n";
        let node = parse_all(src);
        assert_eq!(scalar(&node, "a"), "it's");
        assert_eq!(scalar(&node, "b"), "tab\there");
        assert_eq!(scalar(&node, "c"), "x: y");
    }

    #[test]
    fn test_plain_continuation_and_comments() {
        let src = "a: first\n  second # note\nb: c#d\n";
        let node = parse_all(src);
        assert_eq!(scalar(&node, "a"), "first second");
        assert_eq!(scalar(&node, "b"), "c#d");
    }

    #[test]
    fn test_crlf_lines() {
        let src = "a: 1\r\nb:\r\n- x\r\n";
        let node = parse_all(src);
        assert_eq!(scalar(&node, "a"), "1");
        let Value::Seq(items) = &node.get("b").unwrap().value.value else {
            panic!("expected sequence");
        };
        assert_eq!(items[0].as_scalar(), Some("x"));
    }

    #[test]
    fn test_errors() {
        for src in [
            "a: 1\n    b: 2\n",
            "a: [1, 2\n",
            "just a scalar\n",
            "a: 'open\n",
            "a: {x: 1} trailing\n",
        ] {
            assert!(parse(src, 0..src.len()).is_err(), "{src:?}");
        }
    }

    #[test]
    fn test_block_scalar() {
        let src = "a: |\n  one\n  two\nb: 1\n";
        let node = parse_all(src);
        assert_eq!(scalar(&node, "a"), "one\ntwo\n");
        assert_eq!(scalar(&node, "b"), "1");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("a\n  b"), "a b");
        assert_eq!(fold("a\n\n  b"), "a\nb");
    }
}
