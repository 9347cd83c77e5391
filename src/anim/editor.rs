//! Loading, editing and exporting the float curves of a clip document.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::ops::Range;

use regex::Regex;

use super::block::{self, BlockError, SourceCurve};
use super::clip::AnimationClip;
use super::render::{self, CURVES_KEY, InfinityStyle, NAME_KEY};
use super::yaml::{Field, Value};
use crate::{Error, Result};

/// How a [`ClipEditor`] obtained its clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipState {
    /// Nothing has been loaded.
    Empty,
    /// The `AnimationClip` record was decoded.
    Loaded,
    /// The record could not be decoded. The name comes from a plain scan for
    /// the first `m_Name:` line of the record, or is empty if the document
    /// has no `AnimationClip` record. The curve list starts empty.
    Degraded,
}

/// What was loaded, kept to tell edits apart from untouched data.
#[derive(Debug, Clone, Default)]
struct Baseline {
    name: String,
    curves: Vec<SourceCurve>,
    infinity: InfinityStyle,
}

/// A replacement of `range` in the source text.
struct Splice {
    range: Range<usize>,
    text: String,
}

/// Editor for the float curves of an `AnimationClip` document.
///
/// A clip document is UnityYAML text, usually the payload of an `.anim`
/// asset. The editor reads the name and float curves of its `AnimationClip`
/// record, lets the caller edit them through [`clip_mut`](Self::clip_mut) and
/// writes the result back into the original text. Only the regions holding
/// changed data are rewritten; every other byte, including untouched curves,
/// is kept as loaded.
///
/// Loading never fails. A document without a readable record loads in the
/// [`ClipState::Degraded`] state.
///
/// # Example
///
/// ```rust
/// use unitypack::anim::{ClipEditor, FloatCurve, Keyframe};
///
/// let text = "\
/// --- !u!74 &7400000
/// AnimationClip:
///   m_Name: Idle
///   m_FloatCurves: []
///   m_SampleRate: 60
/// ";
///
/// let mut editor = ClipEditor::load(text);
/// assert_eq!(editor.clip().name(), "Idle");
///
/// let clip = editor.clip_mut();
/// clip.set_name("Bounce");
/// clip.add_curve(
///     FloatCurve::new("m_LocalPosition.y", "Body")
///         .with_keyframes([Keyframe::new(0.0, 0.0), Keyframe::new(0.5, 1.0)]),
/// );
///
/// let exported = editor.export()?;
/// assert!(exported.contains("m_Name: Bounce"));
/// assert!(exported.contains("attribute: m_LocalPosition.y"));
/// assert!(exported.ends_with("  m_SampleRate: 60\n"));
/// # Ok::<(), unitypack::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClipEditor {
    source: String,
    state: ClipState,
    clip: AnimationClip,
    baseline: Baseline,
}

impl Default for ClipEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipEditor {
    /// Creates an editor with nothing loaded.
    pub fn new() -> Self {
        Self {
            source: String::new(),
            state: ClipState::Empty,
            clip: AnimationClip::default(),
            baseline: Baseline::default(),
        }
    }

    /// Creates an editor for a clip document.
    pub fn load(text: impl Into<String>) -> Self {
        let mut editor = Self::new();
        editor.reload(text);
        editor
    }

    /// Replaces the loaded document, discarding all edits.
    pub fn reload(&mut self, text: impl Into<String>) {
        self.source = text.into();

        let decoded = block::read(&self.source).and_then(|record| block::decode(&self.source, &record));
        match decoded {
            Ok(decoded) => {
                self.clip = AnimationClip::new(
                    decoded.name.clone(),
                    decoded.curves.iter().map(|c| c.curve.clone()).collect(),
                );
                self.baseline = Baseline {
                    name: decoded.name,
                    curves: decoded.curves,
                    infinity: decoded.infinity,
                };
                self.state = ClipState::Loaded;
            }
            Err(e) => {
                log::debug!("Falling back to a plain scan of the clip document: {}", e);
                let name = block::locate(&self.source)
                    .and_then(|range| block::scan_name(&self.source[range]))
                    .unwrap_or_default();
                self.clip = AnimationClip::new(name.clone(), Vec::new());
                self.baseline = Baseline {
                    name,
                    ..Baseline::default()
                };
                self.state = ClipState::Degraded;
            }
        }
    }

    /// Returns how the current clip was obtained.
    pub fn state(&self) -> ClipState {
        self.state
    }

    /// Returns the document text as loaded.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the clip.
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Returns the clip for editing.
    pub fn clip_mut(&mut self) -> &mut AnimationClip {
        &mut self.clip
    }

    /// Consumes the editor, returning the clip.
    pub fn into_clip(self) -> AnimationClip {
        self.clip
    }

    /// Returns `true` if the name differs from the loaded one.
    pub fn name_changed(&self) -> bool {
        self.clip.name() != self.baseline.name
    }

    /// Returns `true` if the curve list differs from the loaded one.
    pub fn curves_changed(&self) -> bool {
        let current = self.clip.curves();
        current.len() != self.baseline.curves.len()
            || current
                .iter()
                .zip(&self.baseline.curves)
                .any(|(now, then)| *now != then.curve)
    }

    /// Returns `true` if export would change the document.
    pub fn is_modified(&self) -> bool {
        self.name_changed() || self.curves_changed()
    }

    /// Writes the clip back into the loaded document.
    ///
    /// Without changes the document is returned as loaded. Otherwise the
    /// `m_Name` field is rewritten if the name changed and the
    /// `m_FloatCurves` field if the curves changed; a field that does not
    /// exist yet is inserted into the record. Curves equal to a loaded curve
    /// are written back from their original text.
    ///
    /// If the record cannot be read, the changed fields are replaced by a
    /// plain text search inside the record instead: the first `m_Name:` line,
    /// and the `m_FloatCurves:` field up to the next line at its indentation.
    /// A document without an `AnimationClip` record is returned as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClipExport`] if a changed field has no place in the
    /// document under either strategy.
    pub fn export(&self) -> Result<String> {
        if !self.is_modified() {
            return Ok(self.source.clone());
        }

        match self.export_record() {
            Ok(text) => Ok(text),
            Err(e) => {
                log::debug!("Exporting clip by plain text substitution: {}", e);
                self.export_plain()
            }
        }
    }

    fn export_record(&self) -> std::result::Result<String, BlockError> {
        let record = block::read(&self.source)?;
        let eol = record.eol;
        let pad = " ".repeat(record.column());
        let name_field = record.field(NAME_KEY);
        let mut splices = Vec::new();

        if self.name_changed() {
            let text = render::name_field(self.clip.name());
            splices.push(match name_field {
                Some(field) => Splice {
                    range: field.span(),
                    text,
                },
                None => Splice {
                    range: record.header_end..record.header_end,
                    text: format!("{eol}{pad}{text}"),
                },
            });
        }

        if self.curves_changed() {
            splices.push(match record.field(CURVES_KEY) {
                Some(field) => {
                    let column = item_column(&self.source, field).unwrap_or(field.column);
                    Splice {
                        range: field.span(),
                        text: self.render_curves(column, eol),
                    }
                }
                None => {
                    let at = name_field.map_or(record.header_end, |field| field.span().end);
                    let text = self.render_curves(record.column(), eol);
                    Splice {
                        range: at..at,
                        text: format!("{eol}{pad}{text}"),
                    }
                }
            });
        }

        Ok(apply(&self.source, splices))
    }

    /// Renders the curve list field, reusing the loaded text of every curve
    /// that is unchanged.
    fn render_curves(&self, column: usize, eol: &str) -> String {
        let mut used = vec![false; self.baseline.curves.len()];
        let items: Vec<Cow<'_, str>> = self
            .clip
            .curves()
            .iter()
            .map(|curve| {
                let original = self
                    .baseline
                    .curves
                    .iter()
                    .enumerate()
                    .find(|(i, source)| !used[*i] && source.curve == *curve);
                match original {
                    Some((i, source)) => {
                        used[i] = true;
                        Cow::Borrowed(source.text.as_str())
                    }
                    None => Cow::Owned(render::curve(curve, column, self.baseline.infinity, eol)),
                }
            })
            .collect();
        render::curves_field(&items, eol)
    }

    fn export_plain(&self) -> Result<String> {
        let Some(range) = block::locate(&self.source) else {
            log::debug!("Document has no AnimationClip record, exporting it unchanged");
            return Ok(self.source.clone());
        };
        let mut text = self.source[range.clone()].to_string();
        let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };

        if self.name_changed() {
            let pattern = Regex::new(r"(?m)^([ \t]*)m_Name:[^\r\n]*")
                .map_err(|e| Error::ClipExport(e.to_string()))?;
            let (span, indent) = {
                let caps = pattern
                    .captures(&text)
                    .ok_or_else(|| Error::ClipExport("record has no m_Name field".into()))?;
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let indent = caps.get(1).map_or(0, |m| m.len());
                (whole, indent)
            };
            text.replace_range(
                span.start + indent..span.end,
                &render::name_field(self.clip.name()),
            );
        }

        if self.curves_changed() {
            let pattern = Regex::new(r"(?m)^([ \t]*)m_FloatCurves:")
                .map_err(|e| Error::ClipExport(e.to_string()))?;
            let (start, column) = {
                let caps = pattern.captures(&text).ok_or_else(|| {
                    Error::ClipExport("record has no m_FloatCurves field".into())
                })?;
                let start = caps.get(0).map_or(0, |m| m.start());
                let column = caps.get(1).map_or(0, |m| m.len());
                (start + column, column)
            };
            let end = block::field_end(&text, start, column);
            let items: Vec<String> = self
                .clip
                .curves()
                .iter()
                .map(|curve| render::curve(curve, column, self.baseline.infinity, eol))
                .collect();
            text.replace_range(start..end, &render::curves_field(&items, eol));
        }

        let mut document = self.source.clone();
        document.replace_range(range, &text);
        Ok(document)
    }
}

/// Column of the dash of the first item of a block sequence field.
fn item_column(source: &str, field: &Field) -> Option<usize> {
    match &field.value.value {
        Value::Seq(items) => items.first().map(|item| {
            let line = &source[item.span.start..];
            line.len() - line.trim_start_matches(' ').len()
        }),
        _ => None,
    }
}

/// Applies non-overlapping splices. Insertions at the same offset keep
/// their order.
fn apply(source: &str, splices: Vec<Splice>) -> String {
    let mut ordered: Vec<(usize, Splice)> = splices.into_iter().enumerate().collect();
    ordered.sort_by_key(|(i, splice)| Reverse((splice.range.start, *i)));

    let mut text = source.to_string();
    for (_, splice) in ordered {
        text.replace_range(splice.range, &splice.text);
    }
    text
}
