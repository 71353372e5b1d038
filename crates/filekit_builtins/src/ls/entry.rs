//! Per-entry metadata resolution.

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;
use unicode_general_category::{get_general_category, GeneralCategory};
use uzers::{Groups, Users, UsersCache};

use super::classify::{permission_string, FileKind};
use super::options::{ListingRequest, TimeKind};
use crate::common::{BuiltinError, BuiltinResult};

/// One filesystem object as seen for listing purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    /// Display name. Control characters are already replaced when requested,
    /// and the classifier appends its suffix here.
    pub name: String,
    pub permissions: String,
    pub links: u64,
    pub inode: u64,
    pub uid: u32,
    pub gid: u32,
    /// User name, or the uid as text when the lookup fails
    pub owner: String,
    /// Group name, or the gid as text when the lookup fails
    pub group: String,
    pub size: u64,
    pub size_kib: f64,
    pub modified: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    /// Kind of the metadata that was captured (the target's when dereferenced)
    pub kind: FileKind,
    pub mode: u32,
    /// Link target as read from the link, set only when dereferencing
    pub symlink_target: Option<String>,
}

impl DirectoryEntry {
    pub fn timestamp(&self, kind: TimeKind) -> DateTime<Utc> {
        match kind {
            TimeKind::Modified => self.modified,
            TimeKind::Changed => self.changed,
            TimeKind::Accessed => self.accessed,
        }
    }

    pub fn is_symbolic_link(&self) -> bool {
        self.symlink_target.is_some() || self.kind == FileKind::Symlink
    }
}

/// Builds [`DirectoryEntry`] values for one listing call.
///
/// Owns the user database handle, so name lookups are cached for the
/// duration of the call and dropped with it.
pub struct EntryResolver<'a, U = UsersCache> {
    request: &'a ListingRequest,
    users: U,
}

impl<'a> EntryResolver<'a, UsersCache> {
    pub fn new(request: &'a ListingRequest) -> Self {
        Self::with_users(request, UsersCache::new())
    }
}

impl<'a, U: Users + Groups> EntryResolver<'a, U> {
    pub fn with_users(request: &'a ListingRequest, users: U) -> Self {
        Self { request, users }
    }

    /// Resolve `raw_name` inside `dir`.
    ///
    /// The name is always lstat'ed first. A symbolic link is only followed
    /// when the request asks for dereferencing, in which case a dangling
    /// link is a [`BuiltinError::BrokenLink`].
    pub fn resolve(&self, dir: &Path, raw_name: &OsStr) -> BuiltinResult<DirectoryEntry> {
        let path = dir.join(raw_name);
        debug!(path = %path.display(), "resolving entry");

        let link_meta = fs::symlink_metadata(&path).map_err(|source| BuiltinError::EntryUnavailable {
            path: path.clone(),
            source,
        })?;

        let (meta, symlink_target) = if link_meta.file_type().is_symlink() && self.request.dereference {
            let target = fs::read_link(&path).map_err(|source| BuiltinError::BrokenLink {
                path: path.clone(),
                source,
            })?;
            let meta = fs::metadata(&path).map_err(|source| BuiltinError::BrokenLink {
                path: path.clone(),
                source,
            })?;
            (meta, Some(target.to_string_lossy().into_owned()))
        } else {
            (link_meta, None)
        };

        let mut name = raw_name.to_string_lossy().into_owned();
        if self.request.hide_control_chars {
            name = hide_control_chars(&name);
        }

        Ok(self.build(name, &meta, symlink_target))
    }

    fn build(&self, name: String, meta: &Metadata, symlink_target: Option<String>) -> DirectoryEntry {
        let kind = FileKind::from_file_type(meta.file_type());
        let mode = meta.mode();
        let (uid, gid) = (meta.uid(), meta.gid());
        let size = meta.size();

        DirectoryEntry {
            name,
            permissions: permission_string(kind, mode),
            links: meta.nlink(),
            inode: meta.ino(),
            uid,
            gid,
            owner: self.owner_name(uid),
            group: self.group_name(gid),
            size,
            size_kib: size as f64 / 1024.0,
            modified: utc(meta.mtime(), meta.mtime_nsec()),
            changed: utc(meta.ctime(), meta.ctime_nsec()),
            accessed: utc(meta.atime(), meta.atime_nsec()),
            kind,
            mode,
            symlink_target,
        }
    }

    fn owner_name(&self, uid: u32) -> String {
        self.users
            .get_user_by_uid(uid)
            .map(|u| u.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| uid.to_string())
    }

    fn group_name(&self, gid: u32) -> String {
        self.users
            .get_group_by_gid(gid)
            .map(|g| g.name().to_string_lossy().into_owned())
            .unwrap_or_else(|| gid.to_string())
    }
}

/// Replace every non-printable character with `?`.
pub fn hide_control_chars(name: &str) -> String {
    name.chars().map(|c| if is_printable(c) { c } else { '?' }).collect()
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

fn utc(secs: i64, nsecs: i64) -> DateTime<Utc> {
    let nsecs = nsecs.clamp(0, 999_999_999) as u32;
    DateTime::from_timestamp(secs, nsecs).unwrap_or_default()
}
