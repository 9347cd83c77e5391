//! Float curve editing for `AnimationClip` documents.
//!
//! Unity stores animation clips as UnityYAML text. This module reads the
//! name and float curves (`m_FloatCurves`) of the clip record and writes edits
//! back without touching anything else: other fields, other records, curves
//! that were not edited, number spellings and line endings all survive an
//! export unchanged.
//!
//! Only float curves are modeled. Rotation, position, scale and PPtr curves
//! are left as they are in the text.
//!
//! # Example
//!
//! ```rust
//! use unitypack::anim::{ClipEditor, ClipState, Keyframe};
//!
//! let text = "\
//! AnimationClip:
//!   m_Name: Fade
//!   m_FloatCurves:
//!   - curve:
//!       m_Curve:
//!       - time: 0
//!         value: 1
//!     attribute: m_Alpha
//!     path: Panel
//! ";
//!
//! let mut editor = ClipEditor::load(text);
//! assert_eq!(editor.state(), ClipState::Loaded);
//!
//! editor
//!     .clip_mut()
//!     .add_keyframe("m_Alpha", "Panel", Keyframe::new(1.0, 0.0));
//! let exported = editor.export()?;
//!
//! let reloaded = ClipEditor::load(exported);
//! let curve = reloaded.clip().curve("m_Alpha", "Panel").unwrap();
//! assert_eq!(curve.keyframes.len(), 2);
//! # Ok::<(), unitypack::Error>(())
//! ```

mod block;
mod clip;
mod editor;
mod render;
mod yaml;

pub use clip::{AnimationClip, DEFAULT_WEIGHT, FloatCurve, KEYFRAME_TIME_TOLERANCE, Keyframe};
pub use editor::{ClipEditor, ClipState};
