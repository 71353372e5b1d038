//! Option handling for `ls`.
//!
//! [`LsOptions`] is the flat flag set an argument parser produces.
//! [`ListingRequest`] is what the engine works from: the same information
//! with every precedence rule already applied, built once per call and only
//! ever borrowed afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// LS command options, one field per flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsOptions {
    /// Operands; empty means the current directory
    pub paths: Vec<PathBuf>,

    /// `-A`: show dotfiles but not `.` and `..`
    pub almost_all: bool,

    /// `-a`: show dotfiles plus `.` and `..`
    pub all: bool,

    /// `-R`
    pub recursive: bool,

    /// `-l`
    pub long: bool,

    /// `-C`: three names per line
    pub column: bool,

    /// `-F`: append `/*@|`
    pub classify: bool,

    /// `-p`: append `/` to directories only
    pub indicator: bool,

    /// `-m`: comma separated
    pub stream: bool,

    /// `-1`
    pub one_per_line: bool,

    /// `-r`
    pub reverse: bool,

    /// `-f`: raw directory order, implies `-a`
    pub no_sort: bool,

    /// `-L`: report link targets instead of links
    pub dereference: bool,

    /// `-g`
    pub omit_owner: bool,

    /// `-o`
    pub omit_group: bool,

    /// `-n`
    pub numeric_ids: bool,

    /// `-i`
    pub inode: bool,

    /// `-q`: print non-printable characters as `?`
    pub hide_control_chars: bool,

    /// `-S`
    pub sort_size: bool,

    /// `-t`
    pub sort_time: bool,

    /// `-u`: use access time for display and `-t`
    pub access_time: bool,

    /// `-c`: use status change time for display and `-t`
    pub change_time: bool,

    /// `-k`: sizes in kibibytes
    pub kibibytes: bool,
}

/// Which dotfiles make it into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HiddenPolicy {
    /// Names starting with `.` are dropped.
    Visible,
    /// Dotfiles are kept, no sentinels.
    AlmostAll,
    /// Dotfiles are kept and `.`/`..` are injected.
    All,
}

impl HiddenPolicy {
    pub fn shows_dotfiles(self) -> bool {
        !matches!(self, HiddenPolicy::Visible)
    }

    pub fn injects_sentinels(self) -> bool {
        matches!(self, HiddenPolicy::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Case-insensitive name order.
    Name,
    /// Largest first.
    Size,
    /// Newest first, by the active [`TimeKind`].
    Time,
    /// Directory order as returned by the OS.
    Unsorted,
}

/// The one timestamp used for both `-t` and the long listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeKind {
    Modified,
    Changed,
    Accessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Column,
    Long,
    Stream,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    None,
    /// `/` after directories.
    Slash,
    /// `/`, `@`, `|` or `*`.
    Classify,
}

/// How the owner and group columns of a long listing are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdColumns {
    pub owner: bool,
    pub group: bool,
    pub numeric: bool,
}

/// Resolved, immutable option bundle for one listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub roots: Vec<PathBuf>,
    pub recursive: bool,
    pub hidden: HiddenPolicy,
    pub sort: SortKey,
    pub reverse: bool,
    pub time: TimeKind,
    pub display: DisplayMode,
    pub one_per_line: bool,
    pub inode: bool,
    pub indicator: Indicator,
    pub dereference: bool,
    pub ids: IdColumns,
    pub kibibytes: bool,
    pub hide_control_chars: bool,
}

impl ListingRequest {
    /// Apply flag precedence.
    ///
    /// `-f` implies `-a`, `-a` implies `-A`. For the sort key `-f` beats `-S`
    /// beats `-t`; for the display mode column beats long beats stream. `-c`
    /// wins over `-u` when both are given.
    pub fn resolve(opts: &LsOptions) -> Self {
        let hidden = if opts.all || opts.no_sort {
            HiddenPolicy::All
        } else if opts.almost_all {
            HiddenPolicy::AlmostAll
        } else {
            HiddenPolicy::Visible
        };

        let sort = if opts.no_sort {
            SortKey::Unsorted
        } else if opts.sort_size {
            SortKey::Size
        } else if opts.sort_time {
            SortKey::Time
        } else {
            SortKey::Name
        };

        let time = if opts.change_time {
            TimeKind::Changed
        } else if opts.access_time {
            TimeKind::Accessed
        } else {
            TimeKind::Modified
        };

        let display = if opts.column {
            DisplayMode::Column
        } else if opts.long {
            DisplayMode::Long
        } else if opts.stream {
            DisplayMode::Stream
        } else {
            DisplayMode::Default
        };

        let indicator = if opts.classify {
            Indicator::Classify
        } else if opts.indicator {
            Indicator::Slash
        } else {
            Indicator::None
        };

        Self {
            roots: opts.paths.clone(),
            recursive: opts.recursive,
            hidden,
            sort,
            reverse: opts.reverse,
            time,
            display,
            one_per_line: opts.one_per_line,
            inode: opts.inode,
            indicator,
            dereference: opts.dereference,
            ids: IdColumns {
                owner: !opts.omit_owner,
                group: !opts.omit_group,
                numeric: opts.numeric_ids,
            },
            kibibytes: opts.kibibytes,
            hide_control_chars: opts.hide_control_chars,
        }
    }
}

impl From<&LsOptions> for ListingRequest {
    fn from(opts: &LsOptions) -> Self {
        Self::resolve(opts)
    }
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self::resolve(&LsOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ls() {
        let req = ListingRequest::default();
        assert_eq!(req.hidden, HiddenPolicy::Visible);
        assert_eq!(req.sort, SortKey::Name);
        assert_eq!(req.time, TimeKind::Modified);
        assert_eq!(req.display, DisplayMode::Default);
        assert_eq!(req.indicator, Indicator::None);
        assert!(req.ids.owner && req.ids.group && !req.ids.numeric);
    }

    #[test]
    fn no_sort_implies_all() {
        let req = ListingRequest::resolve(&LsOptions {
            no_sort: true,
            sort_size: true,
            ..Default::default()
        });
        assert_eq!(req.hidden, HiddenPolicy::All);
        assert_eq!(req.sort, SortKey::Unsorted);
    }

    #[test]
    fn all_beats_almost_all() {
        let req = ListingRequest::resolve(&LsOptions {
            all: true,
            almost_all: true,
            ..Default::default()
        });
        assert!(req.hidden.injects_sentinels());
        assert!(req.hidden.shows_dotfiles());
    }

    #[test]
    fn column_overrides_long_and_stream() {
        let req = ListingRequest::resolve(&LsOptions {
            column: true,
            long: true,
            stream: true,
            ..Default::default()
        });
        assert_eq!(req.display, DisplayMode::Column);

        let req = ListingRequest::resolve(&LsOptions {
            long: true,
            stream: true,
            ..Default::default()
        });
        assert_eq!(req.display, DisplayMode::Long);
    }

    #[test]
    fn time_kind_selection() {
        let req = ListingRequest::resolve(&LsOptions {
            sort_time: true,
            access_time: true,
            ..Default::default()
        });
        assert_eq!(req.sort, SortKey::Time);
        assert_eq!(req.time, TimeKind::Accessed);

        let req = ListingRequest::resolve(&LsOptions {
            access_time: true,
            change_time: true,
            ..Default::default()
        });
        assert_eq!(req.time, TimeKind::Changed);
    }

    #[test]
    fn classify_wins_over_slash_indicator() {
        let req = ListingRequest::resolve(&LsOptions {
            classify: true,
            indicator: true,
            ..Default::default()
        });
        assert_eq!(req.indicator, Indicator::Classify);
    }

    #[test]
    fn request_from_caller_json() {
        let opts: LsOptions =
            serde_json::from_str(r#"{"paths":["/tmp"],"long":true,"numeric_ids":true}"#).unwrap();
        let req = ListingRequest::from(&opts);
        assert_eq!(req.roots, vec![PathBuf::from("/tmp")]);
        assert_eq!(req.display, DisplayMode::Long);
        assert!(req.ids.numeric);
    }
}
