//! User-facing console output.
//! Status lines carry a short coloured label when the stream is a TTY;
//! listing lines stay unlabelled so they can be piped.

use owo_colors::OwoColorize;

use crate::tree::{EntryKind, FileEntry};

fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if stdout_is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// One listing line: the path, with a trailing `/` for directories and
/// ` -> link` marker for symbolic links.
pub fn print_entry(entry: &FileEntry) {
    let path = entry.path().display();
    match (entry.kind(), stdout_is_tty()) {
        (EntryKind::Directory, true) => println!("{}/", path.blue().bold()),
        (EntryKind::Directory, false) => println!("{path}/"),
        (EntryKind::Symlink, true) => println!("{} {}", path.cyan(), "-> link".dimmed()),
        (EntryKind::Symlink, false) => println!("{path} -> link"),
        _ => println!("{path}"),
    }
}
