//! Directory enumeration for `ls`, flat or recursive.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::{BuiltinError, BuiltinResult};

/// Raw names found in one directory, in file-name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingGroup {
    pub path: PathBuf,
    pub names: Vec<OsString>,
}

/// Directories to list, keyed by path, in pre-order walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    groups: Vec<ListingGroup>,
}

impl DirectoryListing {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingGroup> {
        self.groups.iter()
    }

    pub fn get(&self, path: &Path) -> Option<&[OsString]> {
        self.groups
            .iter()
            .find(|g| g.path == path)
            .map(|g| g.names.as_slice())
    }

    fn push(&mut self, path: PathBuf, names: Vec<OsString>) {
        self.groups.push(ListingGroup { path, names });
    }
}

impl IntoIterator for DirectoryListing {
    type Item = ListingGroup;
    type IntoIter = std::vec::IntoIter<ListingGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Result of walking one root.
#[derive(Debug, Default)]
pub struct Traversal {
    pub listing: DirectoryListing,
    /// Subdirectories that could not be read; the walk went on without them.
    pub skipped: Vec<BuiltinError>,
}

/// Enumerate `root`, and every directory below it when `recursive` is set.
///
/// Fails only when the root itself cannot be listed. Symbolic links are never
/// descended into. Each directory is read once, by the walk; names come in
/// file-name order.
pub fn traverse(root: &Path, recursive: bool) -> BuiltinResult<Traversal> {
    let meta = fs::metadata(root).map_err(|source| BuiltinError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(BuiltinError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(false)
        .sort_by_file_name();

    let mut traversal = Traversal::default();
    // group index of the directory being filled at each depth
    let mut open: Vec<usize> = Vec::new();

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) if err.path() == Some(root) => {
                return Err(BuiltinError::RootUnreadable {
                    path: root.to_path_buf(),
                    source: into_io(err),
                });
            }
            Err(err) => {
                skip(&mut traversal, &mut open, err);
                continue;
            }
        };

        let depth = entry.depth();
        if depth > 0 {
            if let Some(&parent) = open.get(depth - 1) {
                traversal.listing.groups[parent].names.push(entry.file_name().to_os_string());
            }
        }
        if depth == 0 || (recursive && entry.file_type().is_dir()) {
            open.truncate(depth);
            open.push(traversal.listing.len());
            traversal.listing.push(entry.path().to_path_buf(), Vec::new());
        }
    }

    debug!(root = %root.display(), groups = traversal.listing.len(), "traversal finished");
    Ok(traversal)
}

fn skip(traversal: &mut Traversal, open: &mut Vec<usize>, err: walkdir::Error) {
    let Some(path) = err.path().map(Path::to_path_buf) else {
        debug!(error = %err, "walk error without a path");
        return;
    };
    // A directory is yielded before it is opened; drop its group if opening failed.
    let groups = &mut traversal.listing.groups;
    if groups.last().is_some_and(|g| g.path == path && g.names.is_empty()) {
        groups.pop();
        let len = groups.len();
        open.retain(|&i| i < len);
    }

    let source = into_io(err);
    warn!(path = %path.display(), error = %source, "skipping unreadable directory");
    traversal.skipped.push(BuiltinError::DirectoryUnreadable { path, source });
}

fn into_io(err: walkdir::Error) -> io::Error {
    err.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk error"))
}
