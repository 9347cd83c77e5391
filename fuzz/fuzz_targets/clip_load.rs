//! Fuzz target for loading and exporting clip documents.
//!
//! Run with: cargo +nightly fuzz run clip_load
//!
//! Properties being tested:
//! - Loading never panics, whatever the text
//! - Exporting an unedited clip returns the input unchanged
//! - A renamed clip that exports successfully reloads with the new name

#![no_main]

use libfuzzer_sys::fuzz_target;
use unitypack::anim::{ClipEditor, ClipState};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut editor = ClipEditor::load(text);
    let exported = editor.export().expect("unedited export cannot fail");
    assert_eq!(exported, text);

    if editor.state() != ClipState::Loaded {
        return;
    }

    editor.clip_mut().set_name("Fuzzed");
    if let Ok(renamed) = editor.export() {
        let reloaded = ClipEditor::load(renamed);
        assert_eq!(reloaded.state(), ClipState::Loaded);
        assert_eq!(reloaded.clip().name(), "Fuzzed");
        assert_eq!(reloaded.clip().curves(), editor.clip().curves());
    }
});
