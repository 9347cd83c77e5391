//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use unitypack::codec::{ArchiveCodec, TarGzCodec};
use unitypack::{ArchiveEntry, UnityPackage};

/// A clip document as saved by the Unity editor, with two float curves and
/// a stepped keyframe.
pub const SAMPLE_CLIP: &str = "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!74 &7400000
AnimationClip:
  m_ObjectHideFlags: 0
  m_CorrespondingSourceObject: {fileID: 0}
  m_PrefabInstance: {fileID: 0}
  m_PrefabAsset: {fileID: 0}
  m_Name: TestAnimation
  serializedVersion: 6
  m_Legacy: 0
  m_Compressed: 0
  m_UseHighQualityCurve: 1
  m_RotationCurves: []
  m_CompressedRotationCurves: []
  m_EulerCurves: []
  m_PositionCurves: []
  m_ScaleCurves: []
  m_FloatCurves:
  - serializedVersion: 2
    curve:
      serializedVersion: 2
      m_Curve:
      - serializedVersion: 3
        time: 0
        value: 0
        inSlope: 0
        outSlope: 0
        tangentMode: 0
        weightedMode: 0
        inWeight: 0.33333334
        outWeight: 0.33333334
      - serializedVersion: 3
        time: 1
        value: 1
        inSlope: 1
        outSlope: 1
        tangentMode: 0
        weightedMode: 0
        inWeight: 0.33333334
        outWeight: 0.33333334
      m_PreInfinity: 2
      m_PostInfinity: 2
      m_RotationOrder: 4
    attribute: m_LocalPosition.x
    path: GameObject
    classID: 137
    script: {fileID: 0}
    flags: 16
  - serializedVersion: 2
    curve:
      serializedVersion: 2
      m_Curve:
      - serializedVersion: 3
        time: 0
        value: 0
        inSlope: Infinity
        outSlope: Infinity
        tangentMode: 65
        weightedMode: 0
        inWeight: 0.33333334
        outWeight: 0.33333334
      m_PreInfinity: 2
      m_PostInfinity: 2
      m_RotationOrder: 4
    attribute: m_LocalPosition.y
    path: GameObject
    classID: 137
    script: {fileID: 0}
    flags: 16
  m_PPtrCurves: []
  m_SampleRate: 60
  m_WrapMode: 0
  m_Bounds:
    m_Center: {x: 0, y: 0, z: 0}
    m_Extent: {x: 0, y: 0, z: 0}
  m_ClipBindingConstant:
    genericBindings:
    - serializedVersion: 2
      path: 2073732238
      attribute: 1
      script: {fileID: 0}
      typeID: 4
      customType: 0
      isPPtrCurve: 0
    pptrCurveMapping: []
  m_AnimationClipSettings:
    serializedVersion: 2
    m_StartTime: 0
    m_StopTime: 1
    m_LoopTime: 0
  m_EditorCurves: []
  m_EulerEditorCurves: []
  m_HasGenericRootTransform: 0
  m_HasMotionFloatCurves: 0
  m_Events: []";

/// A clip document whose float curve list is empty.
pub const SIMPLE_CLIP: &str = "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!74 &7400000
AnimationClip:
  m_ObjectHideFlags: 0
  m_Name: SimpleAnimation
  m_FloatCurves: []";

/// Returns the entries of one asset folder.
pub fn asset_entries(
    guid: &str,
    path: &str,
    asset: &[u8],
    meta: Option<&str>,
) -> Vec<ArchiveEntry> {
    let mut entries = vec![
        ArchiveEntry::directory(guid),
        ArchiveEntry::file(format!("{guid}/pathname"), path.as_bytes().to_vec()),
        ArchiveEntry::file(format!("{guid}/asset"), asset.to_vec()),
    ];
    if let Some(meta) = meta {
        entries.push(ArchiveEntry::file(
            format!("{guid}/asset.meta"),
            meta.as_bytes().to_vec(),
        ));
    }
    entries
}

/// Returns the entries of a small package: a clip, a texture and a script.
pub fn sample_entries() -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();
    entries.extend(asset_entries(
        "4f1a7c2e9b0d4e6f8a1b2c3d4e5f6a7b",
        "Assets/Animations/Test.anim",
        SAMPLE_CLIP.as_bytes(),
        Some("fileFormatVersion: 2\nguid: 4f1a7c2e9b0d4e6f8a1b2c3d4e5f6a7b\n"),
    ));
    entries.extend(asset_entries(
        "0a0b0c0d0e0f10111213141516171819",
        "Assets/Textures/Hero.PNG",
        &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a],
        Some("fileFormatVersion: 2\n"),
    ));
    entries.extend(asset_entries(
        "ffeeddccbbaa99887766554433221100",
        "Assets/Scripts/Player.cs",
        b"public class Player {}\n",
        None,
    ));
    entries
}

/// Encodes entries with the default codec.
pub fn encode_package(entries: &[ArchiveEntry]) -> Vec<u8> {
    TarGzCodec::default()
        .encode(entries)
        .expect("Failed to encode package")
}

/// Returns the sample package.
pub fn sample_package() -> UnityPackage {
    UnityPackage::from_entries(sample_entries())
}

/// Extracts the error from a Result, panicking if it's Ok.
///
/// Useful when the Ok type doesn't implement Debug.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}
