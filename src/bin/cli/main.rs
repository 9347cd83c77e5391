//! CLI tool for Unity package operations.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Inspect and edit Unity .unitypackage files
#[derive(Parser)]
#[command(name = "unitypack")]
#[command(author, version, about = "Inspect and edit Unity .unitypackage files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List package assets (alias: l)
    #[command(alias = "l")]
    List {
        /// Package file to list
        package: PathBuf,
    },

    /// Show package statistics (alias: i)
    #[command(alias = "i")]
    Info {
        /// Package file to inspect
        package: PathBuf,
    },

    /// Find assets whose path contains a substring
    Find {
        /// Package file to search
        package: PathBuf,

        /// Case-sensitive substring of the asset path
        pattern: String,
    },

    /// Look up an asset by path or GUID
    Lookup {
        /// Package file to search
        package: PathBuf,

        /// Asset path to resolve to a GUID
        #[arg(long, conflicts_with = "guid", required_unless_present = "guid")]
        path: Option<String>,

        /// GUID to resolve to an asset path
        #[arg(long)]
        guid: Option<String>,
    },

    /// Show the float curves of an animation clip asset
    Curves {
        /// Package file containing the clip
        package: PathBuf,

        /// Asset path of the clip, e.g. Assets/Anim/Walk.anim
        asset: String,
    },

    /// Rename an animation clip and write the edited package
    RenameClip {
        /// Package file containing the clip
        package: PathBuf,

        /// Asset path of the clip
        asset: String,

        /// New clip name
        name: String,

        /// Output package file (defaults to overwriting the input)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Gzip compression level (0-9)
        #[arg(short = 'l', long, default_value = "6")]
        level: u32,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::List { package } => commands::list(&package, cli.format),

        Commands::Info { package } => commands::info(&package, cli.format),

        Commands::Find { package, pattern } => commands::find(&package, &pattern, cli.format),

        Commands::Lookup {
            package,
            path,
            guid,
        } => {
            let query = match (path, guid) {
                (Some(path), _) => commands::Lookup::Path(path),
                (None, Some(guid)) => commands::Lookup::Guid(guid),
                (None, None) => {
                    eprintln!("Error: either --path or --guid is required");
                    std::process::exit(ExitCode::BadArgs.code());
                }
            };
            commands::lookup(&package, &query, cli.format)
        }

        Commands::Curves { package, asset } => commands::curves(&package, &asset, cli.format),

        Commands::RenameClip {
            package,
            asset,
            name,
            output,
            level,
        } => commands::rename_clip(&commands::RenameClipConfig {
            package_path: &package,
            asset: &asset,
            name: &name,
            output: output.as_deref(),
            level,
            format: cli.format,
        }),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
