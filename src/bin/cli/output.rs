//! Output formatting for CLI operations.

use serde_json::json;
use unitypack::anim::{ClipEditor, ClipState, FloatCurve};
use unitypack::{AssetRecord, PackageStats};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of assets
    fn format_assets(&self, assets: &[&AssetRecord]) -> String;

    /// Formats package statistics
    fn format_stats(&self, stats: &PackageStats) -> String;

    /// Formats one lookup answer
    fn format_lookup(&self, guid: &str, path: &str) -> String;

    /// Formats the float curves of a clip
    fn format_clip(&self, asset: &str, clip: &ClipEditor) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_assets(&self, assets: &[&AssetRecord]) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:<32} {:>10} {}\n", "GUID", "Size", "Path"));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total_size: u64 = 0;
        for record in assets {
            total_size += record.size() as u64;
            let meta = if record.meta_text().is_some() { "" } else { " (no meta)" };
            output.push_str(&format!(
                "{:<32} {:>10} {}{}\n",
                record.guid(),
                humanize_bytes(record.size() as u64),
                record.asset_path(),
                meta
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} assets, {} total\n",
            assets.len(),
            humanize_bytes(total_size)
        ));

        output
    }

    fn format_stats(&self, stats: &PackageStats) -> String {
        let mut output = String::new();

        output.push_str("Package Information:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("  Assets:         {}\n", stats.total_assets));
        output.push_str(&format!(
            "  Total size:     {}\n",
            humanize_bytes(stats.total_size)
        ));
        output.push_str(&format!(
            "  Average size:   {}\n",
            humanize_bytes(stats.average_asset_size())
        ));

        if !stats.asset_types.is_empty() {
            output.push_str("  Types:\n");
            for (extension, count) in &stats.asset_types {
                output.push_str(&format!("    {:<14}{}\n", extension, count));
            }
        }

        output
    }

    fn format_lookup(&self, guid: &str, path: &str) -> String {
        format!("{}  {}\n", guid, path)
    }

    fn format_clip(&self, asset: &str, clip: &ClipEditor) -> String {
        let mut output = String::new();
        let model = clip.clip();

        output.push_str(&format!("Clip:   {}\n", model.name()));
        output.push_str(&format!("Asset:  {}\n", asset));
        if clip.state() == ClipState::Degraded {
            output.push_str("Note:   no readable AnimationClip record, curves unavailable\n");
        }
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for curve in model.curves() {
            output.push_str(&format!(
                "{:<28} {:<24} {:>4} keys {:>8.3}s{}\n",
                curve.attribute,
                display_path(&curve.path),
                curve.keyframes.len(),
                curve.duration(),
                if curve.keyframes.iter().any(|k| k.is_stepped()) {
                    "  stepped"
                } else {
                    ""
                }
            ));
        }

        output.push_str(&format!("{} float curves\n", model.curves().len()));
        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_assets(&self, assets: &[&AssetRecord]) -> String {
        let items: Vec<_> = assets
            .iter()
            .map(|record| {
                json!({
                    "guid": record.guid(),
                    "path": record.asset_path(),
                    "size": record.size(),
                    "has_meta": record.meta_text().is_some(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_stats(&self, stats: &PackageStats) -> String {
        let obj = json!({
            "total_assets": stats.total_assets,
            "total_size": stats.total_size,
            "average_asset_size": stats.average_asset_size(),
            "asset_types": stats.asset_types,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_lookup(&self, guid: &str, path: &str) -> String {
        let obj = json!({ "guid": guid, "path": path });
        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_clip(&self, asset: &str, clip: &ClipEditor) -> String {
        let model = clip.clip();
        let obj = json!({
            "asset": asset,
            "name": model.name(),
            "degraded": clip.state() == ClipState::Degraded,
            "curves": model.curves().iter().map(curve_json).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

fn curve_json(curve: &FloatCurve) -> serde_json::Value {
    json!({
        "attribute": curve.attribute,
        "path": curve.path,
        "keyframes": curve.keyframes.iter().map(|k| json!({
            "time": k.time,
            "value": k.value,
            // JSON has no infinity; stepped tangents are reported as strings.
            "in_slope": slope_json(k.in_slope),
            "out_slope": slope_json(k.out_slope),
            "tangent_mode": k.tangent_mode,
            "weighted_mode": k.weighted_mode,
            "in_weight": k.in_weight,
            "out_weight": k.out_weight,
        })).collect::<Vec<_>>(),
    })
}

fn slope_json(slope: f32) -> serde_json::Value {
    if slope == f32::INFINITY {
        json!("Infinity")
    } else if slope == f32::NEG_INFINITY {
        json!("-Infinity")
    } else {
        json!(slope)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "(root)" } else { path }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
