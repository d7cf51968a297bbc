//! CLI definition and parsing.
//! Defines Args (global flags plus one subcommand per tree operation).
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Global flags override values loaded from the XML config.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::tree::{ConflictPolicy, ListOptions, SortOrder, Timestamp};

/// List, copy, delete and move file trees with safe-mode rollback.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "File tree operations with safe-mode rollback")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print the config file location in use and exit.
    #[arg(long, help = "Print the config file location used by safe_tree and exit")]
    pub print_config: bool,

    /// Force safe mode on for delete, delete-files and move.
    #[arg(long, global = true, conflicts_with = "no_safe_mode")]
    pub safe_mode: bool,

    /// Force safe mode off.
    #[arg(long, global = true)]
    pub no_safe_mode: bool,

    /// Conflict policy for copies: fail, skip or replace.
    #[arg(long, global = true, value_name = "POLICY")]
    pub on_conflict: Option<ConflictPolicy>,

    /// Do not preserve timestamps and permissions when copying.
    #[arg(long, global = true)]
    pub no_attributes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the entries of a directory
    List(ListArgs),
    /// Copy a file or directory into a destination directory
    Copy {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest_dir: PathBuf,
    },
    /// Delete a file or directory tree
    Delete {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Delete several plain files (directories are rejected)
    DeleteFiles {
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        paths: Vec<PathBuf>,
    },
    /// Move a file or directory into a destination directory
    Move {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest_dir: PathBuf,
    },
    /// Rename a file or directory within its parent
    Rename {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        new_name: String,
    },
    /// Write a template config file to the config location
    InitConfig,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Descend into subdirectories.
    #[arg(short, long)]
    pub recursive: bool,

    #[arg(long)]
    pub no_files: bool,

    #[arg(long)]
    pub no_dirs: bool,

    /// Skip hidden entries.
    #[arg(long)]
    pub no_hidden: bool,

    /// Keep only files with these extensions (comma separated).
    #[arg(long, value_delimiter = ',', conflicts_with = "exclude_ext")]
    pub include_ext: Vec<String>,

    /// Drop files with these extensions (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Sort each directory level by a timestamp.
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort newest first.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Modified,
    Accessed,
    Created,
}

impl From<SortKey> for Timestamp {
    fn from(k: SortKey) -> Self {
        match k {
            SortKey::Modified => Timestamp::Modified,
            SortKey::Accessed => Timestamp::Accessed,
            SortKey::Created => Timestamp::Created,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl ListArgs {
    /// Build the immutable listing options from the flags.
    pub fn to_options(&self) -> ListOptions {
        let mut b = ListOptions::builder()
            .recursive(self.recursive)
            .exclude_files(self.no_files)
            .exclude_dirs(self.no_dirs)
            .exclude_hidden(self.no_hidden);
        if !self.include_ext.is_empty() {
            b = b.include_extensions(self.include_ext.iter().cloned());
        } else if !self.exclude_ext.is_empty() {
            b = b.exclude_extensions(self.exclude_ext.iter().cloned());
        }
        if let Some(key) = self.sort {
            let order = if self.desc { SortOrder::Descending } else { SortOrder::Ascending };
            b = b.sort_by(key.into(), order);
        }
        b.build()
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if self.safe_mode {
            cfg.safe_mode = true;
        }
        if self.no_safe_mode {
            cfg.safe_mode = false;
        }
        if let Some(policy) = self.on_conflict {
            cfg.on_conflict = policy;
        }
        if self.no_attributes {
            cfg.copy_attributes = false;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
