//! Locating and decoding the `AnimationClip` record of a UnityYAML document.

use std::ops::Range;

use regex::Regex;

use super::clip::{DEFAULT_WEIGHT, FloatCurve, Keyframe};
use super::render::{CURVES_KEY, InfinityStyle, NAME_KEY};
use super::yaml::{self, Field, Node, ParseError, Value};

/// Key of the top-level record this module reads.
pub(crate) const CLIP_KEY: &str = "AnimationClip";

/// Why a document could not be read as a structured clip record.
#[derive(Debug, thiserror::Error)]
pub(crate) enum BlockError {
    #[error("no top-level AnimationClip record")]
    MissingHeader,
    #[error("malformed record: {0}")]
    Parse(#[from] ParseError),
    #[error("unexpected record shape: {0}")]
    Shape(&'static str),
}

/// The clip record as found in a document.
#[derive(Debug)]
pub(crate) struct ClipRecord {
    /// Offset of the line break ending the header line.
    pub header_end: usize,
    /// The record body mapping.
    pub body: Node,
    /// Line ending used by the record.
    pub eol: &'static str,
}

impl ClipRecord {
    /// Returns a body field by key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.body.get(key)
    }

    /// Column of the body's keys.
    pub fn column(&self) -> usize {
        match &self.body.value {
            Value::Map(fields) => fields.first().map_or(2, |field| field.column),
            _ => 2,
        }
    }
}

/// A curve together with the exact source text of its list item.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceCurve {
    pub curve: FloatCurve,
    pub text: String,
}

/// Name and curves decoded from a clip record.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DecodedClip {
    pub name: String,
    pub curves: Vec<SourceCurve>,
    pub infinity: InfinityStyle,
}

/// Returns the byte range of the first top-level `AnimationClip:` record.
///
/// The record runs from its header line up to the next line that starts with
/// a non-whitespace character, or the end of the text.
pub(crate) fn locate(text: &str) -> Option<Range<usize>> {
    let header = Regex::new(r"(?m)^AnimationClip:").ok()?;
    let start = header.find(text)?.start();

    let mut line_break = match text[start..].find('\n') {
        Some(i) => start + i,
        None => return Some(start..text.len()),
    };
    loop {
        let next = line_break + 1;
        match text[next..].chars().next() {
            None => return Some(start..text.len()),
            Some(c) if !c.is_whitespace() => return Some(start..line_break),
            Some(_) => {}
        }
        line_break = match text[next..].find('\n') {
            Some(i) => next + i,
            None => return Some(start..text.len()),
        };
    }
}

/// Locates and parses the clip record of `text`.
pub(crate) fn read(text: &str) -> Result<ClipRecord, BlockError> {
    let range = locate(text).ok_or(BlockError::MissingHeader)?;
    let root = yaml::parse(text, range.clone())?;
    let clip = root
        .get(CLIP_KEY)
        .ok_or(BlockError::Shape("record header is not a mapping key"))?;

    match &clip.value.value {
        Value::Map(fields) if !fields.is_empty() => {}
        _ => return Err(BlockError::Shape("record body is not a mapping")),
    }

    let header_end = line_end(text, range.start);
    let eol = if text[range].contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    Ok(ClipRecord {
        header_end,
        body: clip.value.clone(),
        eol,
    })
}

/// Decodes the name and float curves of a clip record.
///
/// Missing fields decode to defaults. A curve list that is neither a block
/// sequence nor empty, or list items that are not mappings, are errors.
pub(crate) fn decode(text: &str, record: &ClipRecord) -> Result<DecodedClip, BlockError> {
    let name = record
        .field(NAME_KEY)
        .and_then(|field| field.value.as_scalar())
        .unwrap_or_default()
        .to_string();

    let mut infinity = None;
    let curves = match record.field(CURVES_KEY) {
        None => Vec::new(),
        Some(field) => match &field.value.value {
            Value::Seq(items) => items
                .iter()
                .map(|item| {
                    Ok(SourceCurve {
                        curve: decode_curve(item, &mut infinity)?,
                        text: text[item.span.clone()].to_string(),
                    })
                })
                .collect::<Result<Vec<_>, BlockError>>()?,
            _ if field.value.is_empty_collection() => Vec::new(),
            _ => return Err(BlockError::Shape("m_FloatCurves is not a sequence")),
        },
    };

    Ok(DecodedClip {
        name,
        curves,
        infinity: infinity.unwrap_or_default(),
    })
}

fn decode_curve(item: &Node, infinity: &mut Option<InfinityStyle>) -> Result<FloatCurve, BlockError> {
    if !matches!(item.value, Value::Map(_)) {
        return Err(BlockError::Shape("curve entry is not a mapping"));
    }

    let text_of = |key: &str| {
        item.get(key)
            .and_then(|field| field.value.as_scalar())
            .unwrap_or_default()
            .to_string()
    };

    let keys = item
        .get("curve")
        .and_then(|data| data.value.get("m_Curve"))
        .map(|field| &field.value);
    let keyframes = match keys {
        None => Vec::new(),
        Some(node) => match &node.value {
            Value::Seq(items) => items
                .iter()
                .map(|key| decode_keyframe(key, infinity))
                .collect::<Result<Vec<_>, _>>()?,
            _ if node.is_empty_collection() => Vec::new(),
            _ => return Err(BlockError::Shape("m_Curve is not a sequence")),
        },
    };

    Ok(FloatCurve {
        attribute: text_of("attribute"),
        path: text_of("path"),
        keyframes,
    })
}

fn decode_keyframe(node: &Node, infinity: &mut Option<InfinityStyle>) -> Result<Keyframe, BlockError> {
    if !matches!(node.value, Value::Map(_)) {
        return Err(BlockError::Shape("keyframe is not a mapping"));
    }
    let raw = |key: &str| node.get(key).and_then(|field| field.value.as_scalar());
    let number = |key: &str| raw(key).and_then(parse_number);
    let integer = |key: &str| raw(key).and_then(parse_integer).unwrap_or(0);
    let mut slope = |key: &str| match raw(key).and_then(parse_slope) {
        Some((value, style)) => {
            if let Some(style) = style {
                infinity.get_or_insert(style);
            }
            value
        }
        None => 0.0,
    };

    Ok(Keyframe {
        time: number("time").unwrap_or(0.0),
        value: number("value").unwrap_or(0.0),
        in_slope: slope("inSlope"),
        out_slope: slope("outSlope"),
        tangent_mode: integer("tangentMode"),
        weighted_mode: integer("weightedMode"),
        in_weight: number("inWeight").unwrap_or(DEFAULT_WEIGHT),
        out_weight: number("outWeight").unwrap_or(DEFAULT_WEIGHT),
    })
}

/// Parses a finite decimal number. Words such as `inf` or `NaN` are
/// rejected.
pub(crate) fn parse_number(text: &str) -> Option<f32> {
    let text = text.trim();
    if text.is_empty() || text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse().ok()
}

fn parse_integer(text: &str) -> Option<i32> {
    text.trim()
        .parse()
        .ok()
        .or_else(|| parse_number(text).map(|value| value as i32))
}

/// Parses a slope, which may also be an infinity token. Returns the value
/// and, for infinities, the spelling used.
fn parse_slope(text: &str) -> Option<(f32, Option<InfinityStyle>)> {
    let text = text.trim();
    let (sign, body) = match text.strip_prefix('-') {
        Some(body) => (-1.0, body),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    let style = match body {
        "Infinity" => Some(InfinityStyle::Word),
        ".inf" | ".Inf" | ".INF" => Some(InfinityStyle::Yaml),
        _ => None,
    };
    match style {
        Some(style) => Some((sign * f32::INFINITY, Some(style))),
        None => parse_number(text).map(|value| (value, None)),
    }
}

/// Best-effort name lookup for a clip record that cannot be decoded: the
/// value of the first line whose key is `m_Name`.
pub(crate) fn scan_name(text: &str) -> Option<String> {
    let pattern = Regex::new(r"(?m)^[ \t]*m_Name:[ \t]*([^\r\n]*)").ok()?;
    let value = pattern.captures(text)?.get(1)?.as_str().trim();
    Some(unquote(value))
}

fn unquote(value: &str) -> String {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    if quoted('\'') {
        value[1..value.len() - 1].replace("''", "'")
    } else if quoted('"') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// Returns the end of the field whose key line contains `from`: the end of
/// the last following line that is indented deeper than `column` or is a
/// list item at `column`. Blank lines are skipped over.
pub(crate) fn field_end(text: &str, from: usize, column: usize) -> usize {
    let mut end = line_end(text, from);
    let mut next = next_line(text, from);

    while let Some(start) = next {
        let this_end = line_end(text, start);
        let line = &text[start..this_end];
        if !line.trim().is_empty() {
            let trimmed = line.trim_start_matches(' ');
            let indent = line.len() - trimmed.len();
            let nested = indent > column
                || (indent == column && (trimmed == "-" || trimmed.starts_with("- ")));
            if !nested {
                break;
            }
            end = this_end;
        }
        next = next_line(text, start);
    }
    end
}

fn line_end(text: &str, at: usize) -> usize {
    let end = text[at..].find('\n').map_or(text.len(), |i| at + i);
    if text[..end].ends_with('\r') {
        end - 1
    } else {
        end
    }
}

fn next_line(text: &str, at: usize) -> Option<usize> {
    text[at..]
        .find('\n')
        .map(|i| at + i + 1)
        .filter(|&start| start < text.len())
}
