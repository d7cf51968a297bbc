//! Directory listing with filter and sort policy.
//!
//! Each directory level is sorted on its own before filtering. With
//! recursion on, a child directory's matches are appended right after the
//! child itself, so the overall result is not globally sorted.

use std::path::Path;
use tracing::debug;

use super::backend::Filesystem;
use super::entry::{EntryKind, FileEntry, Timestamp};
use super::options::{ListOptions, SortOrder};

pub(super) fn list<F>(fs: &F, dir: &Path, opts: &ListOptions) -> Vec<FileEntry>
where
    F: Filesystem + ?Sized,
{
    let mut out = Vec::new();
    collect(fs, dir, opts, &mut out);
    out
}

fn collect<F>(fs: &F, dir: &Path, opts: &ListOptions, out: &mut Vec<FileEntry>)
where
    F: Filesystem + ?Sized,
{
    if !fs.is_dir(dir) {
        debug!(path = %dir.display(), "not a directory; nothing to list");
        return;
    }
    let children = match fs.read_dir(dir) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "cannot enumerate directory; treating as empty");
            return;
        }
    };

    let mut entries: Vec<FileEntry> = children.iter().filter_map(|p| fs.attributes(p)).collect();
    if let Some(spec) = opts.sort() {
        sort_entries(&mut entries, spec.key, spec.order);
    }

    for entry in entries {
        let descend = opts.recursive() && entry.kind() == EntryKind::Directory;
        let child_path = entry.path().to_path_buf();
        if accepts(&entry, opts) {
            out.push(entry);
        }
        if descend {
            collect(fs, &child_path, opts, out);
        }
    }
}

fn accepts(entry: &FileEntry, opts: &ListOptions) -> bool {
    if entry.is_hidden() && opts.exclude_hidden() {
        return false;
    }
    if entry.is_dir() {
        return !opts.exclude_dirs();
    }
    !opts.exclude_files() && opts.extensions().accepts(entry.full_name())
}

/// Stable sort by one timestamp. Entries without that timestamp order before
/// those with one (ascending). Descending reverses the comparison, so ties
/// still keep their input order.
pub fn sort_entries(entries: &mut [FileEntry], key: Timestamp, order: SortOrder) {
    entries.sort_by(|a, b| {
        let ord = a.timestamp(key).cmp(&b.timestamp(key));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}
