//! Application orchestrator.
//! Loads and merges config, initializes logging, then dispatches the
//! subcommand to the tree engine.

use anyhow::{Context, Result, bail};
use tracing::{debug, error};

use safe_tree::cli::{Args, Command, ListArgs, OutputFormat};
use safe_tree::output as out;
use safe_tree::{Config, FileTree, TreeError, config_path, create_template_config, load_config};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handled before config load so a broken config can still be located.
    if args.print_config {
        return print_config_location();
    }

    let Some(command) = args.command.clone() else {
        bail!("no command given; run with --help to see the available commands");
    };

    if let Command::InitConfig = command {
        return init_config();
    }

    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    // Held until return so the file appender flushes.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    debug!(?cfg, ?command, "starting safe_tree");
    dispatch(&cfg, command).inspect_err(|e| {
        if let Some(te) = e.downcast_ref::<TreeError>() {
            error!(
                code = te.code(),
                kind = %te.kind(),
                path = %te.path().map(|p| p.display().to_string()).unwrap_or_default(),
                "operation failed"
            );
        } else {
            error!(error = ?e, "operation failed");
        }
    })
}

fn dispatch(cfg: &Config, command: Command) -> Result<()> {
    let tree = FileTree::new();
    match command {
        Command::List(list) => run_list(&tree, &list)?,
        Command::Copy { src, dest_dir } => {
            tree.copy_subtree(&src, &dest_dir, cfg.copy_options())?;
            out::print_success(&format!("Copied '{}' -> '{}'", src.display(), dest_dir.display()));
        }
        Command::Delete { path } => {
            tree.delete_subtree(&path, cfg.safe_mode)?;
            out::print_success(&format!("Deleted '{}'", path.display()));
        }
        Command::DeleteFiles { paths } => {
            tree.delete_files(&paths, cfg.safe_mode)?;
            out::print_success(&format!("Deleted {} file(s)", paths.len()));
        }
        Command::Move { src, dest_dir } => {
            let target = tree.move_subtree(&src, &dest_dir, cfg.safe_mode)?;
            out::print_success(&format!("Moved '{}' -> '{}'", src.display(), target.display()));
        }
        Command::Rename { path, new_name } => {
            let target = tree.rename(&path, &new_name)?;
            out::print_success(&format!("Renamed '{}' -> '{}'", path.display(), target.display()));
        }
        Command::InitConfig => init_config()?,
    }
    Ok(())
}

fn init_config() -> Result<()> {
    let path = config_path().context("could not determine a config path")?;
    create_template_config(&path)?;
    out::print_success(&format!("Template config written to {}", path.display()));
    Ok(())
}

fn run_list(tree: &FileTree, list: &ListArgs) -> Result<()> {
    let entries = tree.list(&list.dir, &list.to_options());
    match list.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries).context("serialize listing")?;
            println!("{json}");
        }
        OutputFormat::Text => entries.iter().for_each(out::print_entry),
    }
    Ok(())
}

fn print_config_location() -> Result<()> {
    if let Some(p) = std::env::var_os(safe_tree::config::CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {} (explicit):\n  {}",
            safe_tree::config::CONFIG_ENV,
            std::path::Path::new(&p).display()
        ));
        return Ok(());
    }
    match config_path() {
        Some(p) => {
            out::print_info(&format!("Default safe_tree config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run `safe_tree init-config` to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path."),
    }
    Ok(())
}
