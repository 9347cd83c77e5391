//! Integration tests for package editing.

mod common;

use unitypack::edit::{Operation, OperationBuilder, PackageEditor};
use unitypack::resolve::PackageIndex;
use unitypack::{AssetPath, Error, UnityPackage};

use common::{expect_err, sample_entries, sample_package};

const SCRIPT: &str = "Assets/Scripts/Player.cs";
const TEXTURE: &str = "Assets/Textures/Hero.PNG";

fn sample_index() -> PackageIndex {
    PackageIndex::parse(&sample_entries())
}

fn path(s: &str) -> AssetPath {
    AssetPath::new(s).unwrap()
}

#[test]
fn test_add_asset() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor
        .add(
            "1234",
            path("Assets/Audio/Jump.wav"),
            b"RIFF".to_vec(),
            Some("fileFormatVersion: 2\n".into()),
        )
        .unwrap();

    let result = editor.apply().unwrap();
    assert_eq!(result.assets_added, 1);
    assert_eq!(result.assets_kept, 3);
    assert_eq!(result.total_assets(), 4);
    assert_eq!(result.index.guid_by_path("Assets/Audio/Jump.wav"), Some("1234"));
    assert!(result.entries.iter().any(|e| e.name == "1234/asset.meta"));
}

#[test]
fn test_delete_asset() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.delete(SCRIPT).unwrap();

    let result = editor.apply().unwrap();
    assert_eq!(result.assets_deleted, 1);
    assert!(!result.index.has_asset(SCRIPT));
    assert!(!result.index.has_guid("ffeeddccbbaa99887766554433221100"));
    assert!(
        result
            .entries
            .iter()
            .all(|e| !e.name.starts_with("ffeeddccbbaa99887766554433221100"))
    );
}

#[test]
fn test_update_and_set_meta() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.update(SCRIPT, b"class Player {}".to_vec()).unwrap();
    editor.set_meta(TEXTURE, None).unwrap();
    editor
        .set_meta(SCRIPT, Some("fileFormatVersion: 2\n".into()))
        .unwrap();

    let result = editor.apply().unwrap();
    assert_eq!(result.assets_updated, 3);
    assert_eq!(result.assets_kept, 1);

    let script = result.index.get(SCRIPT).unwrap();
    assert_eq!(script.bytes(), b"class Player {}");
    assert_eq!(script.meta_text(), Some("fileFormatVersion: 2\n"));
    assert_eq!(result.index.get(TEXTURE).unwrap().meta_text(), None);
}

#[test]
fn test_rename_keeps_guid() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.rename(TEXTURE, path("Assets/Textures/Hero.png")).unwrap();

    let result = editor.apply().unwrap();
    assert_eq!(result.assets_renamed, 1);
    assert!(!result.index.has_asset(TEXTURE));
    assert_eq!(
        result.index.path_by_guid("0a0b0c0d0e0f10111213141516171819"),
        Some("Assets/Textures/Hero.png")
    );
}

#[test]
fn test_operations_see_earlier_queue() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.rename(SCRIPT, path("Assets/Scripts/Hero.cs")).unwrap();

    let err = expect_err(editor.update(SCRIPT, Vec::new()));
    assert_eq!(err.asset_path(), Some(SCRIPT));
    editor.update("Assets/Scripts/Hero.cs", b"//".to_vec()).unwrap();

    editor.delete(TEXTURE).unwrap();
    editor.add("new", path(TEXTURE), Vec::new(), None).unwrap();
    assert_eq!(editor.pending_operations(), 4);

    let result = editor.apply().unwrap();
    assert_eq!(result.index.guid_by_path(TEXTURE), Some("new"));
    assert_eq!(
        result.index.get("Assets/Scripts/Hero.cs").unwrap().bytes(),
        b"//"
    );
}

#[test]
fn test_rejected_operations() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);

    let err = expect_err(editor.add("other", path(SCRIPT), Vec::new(), None));
    assert!(matches!(err, Error::AssetExists { .. }));

    let err = expect_err(editor.add(
        "ffeeddccbbaa99887766554433221100",
        path("Assets/Fresh.cs"),
        Vec::new(),
        None,
    ));
    assert!(matches!(err, Error::AssetExists { .. }));

    for guid in ["", "a/b", "nul\0", " padded"] {
        let err = expect_err(editor.add(guid, path("Assets/Fresh.cs"), Vec::new(), None));
        assert!(matches!(err, Error::InvalidGuid { .. }), "{guid:?}");
    }

    let err = expect_err(editor.rename(SCRIPT, path(TEXTURE)));
    assert!(matches!(err, Error::AssetExists { .. }));

    let err = expect_err(editor.delete("Assets/Missing.cs"));
    assert!(matches!(err, Error::AssetNotFound { .. }));

    assert!(!editor.has_pending_operations());
}

#[test]
fn test_rename_to_same_path_is_allowed() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.rename(SCRIPT, path(SCRIPT)).unwrap();
    let result = editor.apply().unwrap();
    assert_eq!(result.index, index);
}

#[test]
fn test_clear_operations() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.delete(SCRIPT).unwrap();
    editor.clear_operations();
    editor.update(SCRIPT, Vec::new()).unwrap();
    assert_eq!(editor.operations().len(), 1);
}

#[test]
fn test_operation_builder() {
    let operations = OperationBuilder::new()
        .add("beef", path("Assets/Readme.txt"), b"hi".to_vec(), None)
        .delete(SCRIPT)
        .set_meta(TEXTURE, Some("fileFormatVersion: 2\nguid: x\n".into()))
        .rename("Assets/Readme.txt", path("Assets/README.txt"))
        .build();
    assert_eq!(operations.len(), 4);
    assert!(matches!(operations[1], Operation::Delete { .. }));

    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    editor.queue_all(operations).unwrap();
    let result = editor.apply().unwrap();

    assert_eq!(result.index.path_by_guid("beef"), Some("Assets/README.txt"));
    assert!(!result.index.has_asset(SCRIPT));
    assert_eq!(result.total_assets(), 3);
}

#[test]
fn test_queue_all_stops_at_first_rejection() {
    let index = sample_index();
    let mut editor = PackageEditor::new(&index);
    let operations = OperationBuilder::new()
        .delete(SCRIPT)
        .delete(SCRIPT)
        .delete(TEXTURE)
        .build();

    assert!(editor.queue_all(operations).is_err());
    assert_eq!(editor.pending_operations(), 1);
}

#[test]
fn test_supersede_package() {
    let mut package = sample_package();
    let mut editor = PackageEditor::new(package.index());
    editor.delete(TEXTURE).unwrap();
    let result = editor.apply().unwrap();
    package.supersede(result);

    assert_eq!(package.index().len(), 2);
    assert_eq!(PackageIndex::parse(package.entries()), *package.index());

    let from_result = UnityPackage::from(
        PackageEditor::new(package.index()).apply().unwrap(),
    );
    assert_eq!(from_result.index(), package.index());
}
