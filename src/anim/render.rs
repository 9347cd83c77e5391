//! Rendering of clip fields in Unity's serialization layout.

use super::clip::{FloatCurve, Keyframe};

/// Key of the clip name field.
pub(crate) const NAME_KEY: &str = "m_Name";
/// Key of the float curve list field.
pub(crate) const CURVES_KEY: &str = "m_FloatCurves";

const CURVE_VERSION: u32 = 2;
const CURVE_DATA_VERSION: u32 = 2;
const KEYFRAME_VERSION: u32 = 3;
const PRE_INFINITY: u32 = 2;
const POST_INFINITY: u32 = 2;
const ROTATION_ORDER: u32 = 4;
const CLASS_ID: u32 = 137;
const SCRIPT: &str = "{fileID: 0}";
const FLAGS: u32 = 16;

/// Spelling of infinite values.
///
/// Unity writes `Infinity`; hand-edited or re-serialized documents may use
/// the YAML core spelling `.inf`. Rendering follows whichever spelling the
/// source document used first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum InfinityStyle {
    #[default]
    Word,
    Yaml,
}

impl InfinityStyle {
    fn positive(self) -> &'static str {
        match self {
            Self::Word => "Infinity",
            Self::Yaml => ".inf",
        }
    }

    fn negative(self) -> &'static str {
        match self {
            Self::Word => "-Infinity",
            Self::Yaml => "-.inf",
        }
    }
}

/// Formats a float the way it is read back: infinities as tokens, finite
/// values in their shortest round-trip decimal form without exponent.
pub(crate) fn float(value: f32, style: InfinityStyle) -> String {
    if value == f32::INFINITY {
        style.positive().to_string()
    } else if value == f32::NEG_INFINITY {
        style.negative().to_string()
    } else {
        value.to_string()
    }
}

/// Formats a string as a plain scalar, quoting it when the plain form would
/// read back differently.
pub(crate) fn scalar(value: &str) -> String {
    if value.chars().any(char::is_control) {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for ch in value.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        }
        out.push('"');
        return out;
    }

    if needs_quotes(value) {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value.trim() != value
        || value.starts_with([
            '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
            '@', '`',
        ])
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
}

/// Renders the name field, without indentation.
pub(crate) fn name_field(name: &str) -> String {
    format!("{}: {}", NAME_KEY, scalar(name))
}

/// Renders the curve list field from already rendered items.
///
/// The first line carries no indentation; items carry their own.
pub(crate) fn curves_field<S: AsRef<str>>(items: &[S], eol: &str) -> String {
    if items.is_empty() {
        return format!("{}: []", CURVES_KEY);
    }
    let mut out = format!("{}:", CURVES_KEY);
    for item in items {
        out.push_str(eol);
        out.push_str(item.as_ref());
    }
    out
}

/// Renders one curve list item whose dash sits at `column`.
pub(crate) fn curve(curve: &FloatCurve, column: usize, style: InfinityStyle, eol: &str) -> String {
    let pad = " ".repeat(column);
    let mut lines = vec![
        format!("{pad}- serializedVersion: {CURVE_VERSION}"),
        format!("{pad}  curve:"),
        format!("{pad}    serializedVersion: {CURVE_DATA_VERSION}"),
    ];

    if curve.keyframes.is_empty() {
        lines.push(format!("{pad}    m_Curve: []"));
    } else {
        lines.push(format!("{pad}    m_Curve:"));
        for key in &curve.keyframes {
            keyframe_lines(&mut lines, key, &pad, style);
        }
    }

    lines.extend([
        format!("{pad}    m_PreInfinity: {PRE_INFINITY}"),
        format!("{pad}    m_PostInfinity: {POST_INFINITY}"),
        format!("{pad}    m_RotationOrder: {ROTATION_ORDER}"),
        format!("{pad}  attribute: {}", scalar(&curve.attribute)),
        format!("{pad}  path: {}", scalar(&curve.path)),
        format!("{pad}  classID: {CLASS_ID}"),
        format!("{pad}  script: {SCRIPT}"),
        format!("{pad}  flags: {FLAGS}"),
    ]);
    lines.join(eol)
}

fn keyframe_lines(lines: &mut Vec<String>, key: &Keyframe, pad: &str, style: InfinityStyle) {
    lines.extend([
        format!("{pad}    - serializedVersion: {KEYFRAME_VERSION}"),
        format!("{pad}      time: {}", float(key.time, style)),
        format!("{pad}      value: {}", float(key.value, style)),
        format!("{pad}      inSlope: {}", float(key.in_slope, style)),
        format!("{pad}      outSlope: {}", float(key.out_slope, style)),
        format!("{pad}      tangentMode: {}", key.tangent_mode),
        format!("{pad}      weightedMode: {}", key.weighted_mode),
        format!("{pad}      inWeight: {}", float(key.in_weight, style)),
        format!("{pad}      outWeight: {}", float(key.out_weight, style)),
    ]);
}
