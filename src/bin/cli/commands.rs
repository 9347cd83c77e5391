//! Command implementations for the CLI tool.

use std::path::Path;

use unitypack::codec::{CodecOptions, TarGzCodec};
use unitypack::{AssetRecord, UnityPackage};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// What the lookup command resolves.
pub enum Lookup {
    /// Asset path to GUID.
    Path(String),
    /// GUID to asset path.
    Guid(String),
}

/// Configuration for the rename-clip command.
pub struct RenameClipConfig<'a> {
    pub package_path: &'a Path,
    pub asset: &'a str,
    pub name: &'a str,
    pub output: Option<&'a Path>,
    pub level: u32,
    pub format: OutputFormat,
}

/// List command implementation
pub fn list(package_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let package = match open_package(package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let assets: Vec<&AssetRecord> = package.index().iter().collect();
    print!("{}", formatter.format_assets(&assets));

    ExitCode::Success
}

/// Info command implementation
pub fn info(package_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let package = match open_package(package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    print!("{}", formatter.format_stats(&package.stats()));

    ExitCode::Success
}

/// Find command implementation
pub fn find(package_path: &Path, pattern: &str, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let package = match open_package(package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let matches = package.index().find_by_pattern(pattern);
    print!("{}", formatter.format_assets(&matches));

    if matches.is_empty() {
        ExitCode::NotFound
    } else {
        ExitCode::Success
    }
}

/// Lookup command implementation
pub fn lookup(package_path: &Path, query: &Lookup, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let package = match open_package(package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let index = package.index();

    let found = match query {
        Lookup::Path(path) => index.guid_by_path(path).map(|guid| (guid, path.as_str())),
        Lookup::Guid(guid) => index.path_by_guid(guid).map(|path| (guid.as_str(), path)),
    };

    match found {
        Some((guid, path)) => {
            print!("{}", formatter.format_lookup(guid, path));
            ExitCode::Success
        }
        None => {
            eprintln!("Not found");
            ExitCode::NotFound
        }
    }
}

/// Curves command implementation
pub fn curves(package_path: &Path, asset: &str, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let package = match open_package(package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let clip = match package.load_clip(asset) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_clip(asset, &clip));

    ExitCode::Success
}

/// Rename-clip command implementation
pub fn rename_clip(config: &RenameClipConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let options = match CodecOptions::new().level(config.level) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let mut package = match open_package(config.package_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut clip = match package.load_clip(config.asset) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };
    clip.clip_mut().set_name(config.name);

    if let Err(e) = package.store_clip(config.asset, &clip) {
        eprintln!("Error: {}", e);
        return error_to_exit_code(&e);
    }

    let output = config.output.unwrap_or(config.package_path);
    let written = package
        .to_bytes_with(&TarGzCodec::new(options))
        .and_then(|bytes| std::fs::write(output, bytes).map_err(unitypack::Error::Io));
    if let Err(e) = written {
        eprintln!("Error writing package: {}", e);
        return error_to_exit_code(&e);
    }

    print!("{}", formatter.format_clip(config.asset, &clip));

    ExitCode::Success
}

/// Helper to open a package with the default codec
fn open_package(path: &Path) -> Result<UnityPackage, ExitCode> {
    UnityPackage::open_path(path).map_err(|e| {
        eprintln!("Error opening package: {}", e);
        error_to_exit_code(&e)
    })
}
