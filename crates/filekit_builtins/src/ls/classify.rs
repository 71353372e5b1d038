//! File-kind decoding and the `-F`/`-p` type indicators.
//!
//! Every place that needs to know "is this a directory / link / pipe" goes
//! through [`FileKind`], so the mode-bit tests live here and nowhere else.

use std::fs::FileType;
use std::os::unix::fs::FileTypeExt;

use serde::{Deserialize, Serialize};

use super::entry::DirectoryEntry;
use super::options::Indicator;

const EXEC_BITS: u32 = 0o111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Fifo,
    Socket,
    BlockDevice,
    CharDevice,
}

impl FileKind {
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_fifo() {
            FileKind::Fifo
        } else if ft.is_socket() {
            FileKind::Socket
        } else if ft.is_block_device() {
            FileKind::BlockDevice
        } else if ft.is_char_device() {
            FileKind::CharDevice
        } else {
            FileKind::Regular
        }
    }

    /// Leading character of the permission string.
    pub fn type_char(self) -> char {
        match self {
            FileKind::Regular => '-',
            FileKind::Directory => 'd',
            FileKind::Symlink => 'l',
            FileKind::Fifo => 'p',
            FileKind::Socket => 's',
            FileKind::BlockDevice => 'b',
            FileKind::CharDevice => 'c',
        }
    }
}

/// `drwxr-xr-x` style rendering of a mode, including setuid, setgid and
/// sticky letters.
pub fn permission_string(kind: FileKind, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(kind.type_char());

    // (read, write, exec, special bit, special letter)
    let triads = [
        (0o400, 0o200, 0o100, 0o4000, 's'),
        (0o040, 0o020, 0o010, 0o2000, 's'),
        (0o004, 0o002, 0o001, 0o1000, 't'),
    ];
    for (r, w, x, special, letter) in triads {
        perms.push(if mode & r != 0 { 'r' } else { '-' });
        perms.push(if mode & w != 0 { 'w' } else { '-' });
        perms.push(match (mode & x != 0, mode & special != 0) {
            (true, true) => letter,
            (false, true) => letter.to_ascii_uppercase(),
            (true, false) => 'x',
            (false, false) => '-',
        });
    }

    perms
}

/// Suffix for an entry of `kind` with permission bits `mode`, if any.
pub fn indicator_for(kind: FileKind, mode: u32, style: Indicator) -> Option<char> {
    match style {
        Indicator::None => None,
        _ if kind == FileKind::Directory => Some('/'),
        Indicator::Slash => None,
        Indicator::Classify => match kind {
            FileKind::Symlink => Some('@'),
            FileKind::Fifo => Some('|'),
            _ if mode & EXEC_BITS != 0 => Some('*'),
            _ => None,
        },
    }
}

/// Append the indicator, if any, to the entry's display name.
pub fn classify(entry: &mut DirectoryEntry, style: Indicator) {
    if let Some(suffix) = indicator_for(entry.kind, entry.mode, style) {
        entry.name.push(suffix);
    }
}
