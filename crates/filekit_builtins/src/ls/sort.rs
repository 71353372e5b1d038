//! Hidden-name filtering and entry ordering.

use std::cmp::Reverse;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

use chrono::{DateTime, Utc};

use super::entry::DirectoryEntry;
use super::options::{HiddenPolicy, ListingRequest, SortKey, TimeKind};

/// Names of the current- and parent-directory sentinels.
pub const SENTINELS: [&str; 2] = [".", ".."];

/// Apply the dotfile rule to raw names, injecting `.` and `..` up front when
/// the policy asks for them. Order is otherwise preserved.
pub fn select_names(names: &[OsString], hidden: HiddenPolicy) -> Vec<OsString> {
    let mut selected = Vec::with_capacity(names.len() + SENTINELS.len());
    if hidden.injects_sentinels() {
        selected.extend(SENTINELS.iter().map(OsString::from));
    }
    selected.extend(
        names
            .iter()
            .filter(|name| hidden.shows_dotfiles() || !is_hidden(name))
            .cloned(),
    );
    selected
}

pub fn is_hidden(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&b'.')
}

/// Order entries in place according to the request's sort key.
///
/// Size and time sorts put the largest/newest first and break ties by name,
/// so `reverse` flips the whole order. [`SortKey::Unsorted`] leaves the
/// slice untouched.
pub fn sort_entries(entries: &mut [DirectoryEntry], request: &ListingRequest) {
    let key = request.sort;
    if key == SortKey::Unsorted {
        return;
    }
    let time = request.time;
    if request.reverse {
        entries.sort_by_cached_key(|e| Reverse(OrderKey::new(e, key, time)));
    } else {
        entries.sort_by_cached_key(|e| OrderKey::new(e, key, time));
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Name,
    Size(u64),
    Time(DateTime<Utc>),
}

/// Precomputed sort key: primary key descending, then the case-folded name,
/// then the exact name for names that only differ in case.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    primary: Reverse<Primary>,
    folded: String,
    exact: String,
}

impl OrderKey {
    fn new(entry: &DirectoryEntry, key: SortKey, time: TimeKind) -> Self {
        let primary = match key {
            SortKey::Name | SortKey::Unsorted => Primary::Name,
            SortKey::Size => Primary::Size(entry.size),
            SortKey::Time => Primary::Time(entry.timestamp(time)),
        };
        Self {
            primary: Reverse(primary),
            folded: entry.name.to_lowercase(),
            exact: entry.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ls::classify::FileKind;
    use crate::ls::options::LsOptions;
    use chrono::Duration;

    fn entry(name: &str, size: u64, age_secs: i64, changed_age_secs: i64) -> DirectoryEntry {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let t = base - Duration::seconds(age_secs);
        DirectoryEntry {
            name: name.to_string(),
            permissions: "-rw-r--r--".to_string(),
            links: 1,
            inode: 0,
            uid: 0,
            gid: 0,
            owner: "0".to_string(),
            group: "0".to_string(),
            size,
            size_kib: size as f64 / 1024.0,
            modified: t,
            changed: base - Duration::seconds(changed_age_secs),
            accessed: base + Duration::seconds(age_secs),
            kind: FileKind::Regular,
            mode: 0o644,
            symlink_target: None,
        }
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sorted(mut entries: Vec<DirectoryEntry>, opts: LsOptions) -> Vec<DirectoryEntry> {
        sort_entries(&mut entries, &ListingRequest::resolve(&opts));
        entries
    }

    fn sample() -> Vec<DirectoryEntry> {
        vec![
            entry("beta", 10, 30, 10),
            entry("Alpha", 300, 10, 20),
            entry("gamma", 300, 20, 40),
            entry("delta", 5, 40, 30),
        ]
    }

    #[test]
    fn hidden_names_are_dropped_by_default() {
        let raw: Vec<OsString> = ["a", ".cfg", "b"].iter().map(OsString::from).collect();
        assert_eq!(select_names(&raw, HiddenPolicy::Visible), vec!["a", "b"]);
        assert_eq!(select_names(&raw, HiddenPolicy::AlmostAll), vec!["a", ".cfg", "b"]);
        assert_eq!(
            select_names(&raw, HiddenPolicy::All),
            vec![".", "..", "a", ".cfg", "b"]
        );
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let out = sorted(sample(), LsOptions::default());
        assert_eq!(names(&out), vec!["Alpha", "beta", "delta", "gamma"]);
    }

    #[test]
    fn reverse_is_exact_inverse() {
        for opts in [
            LsOptions::default(),
            LsOptions { sort_size: true, ..Default::default() },
            LsOptions { sort_time: true, ..Default::default() },
            LsOptions { sort_time: true, change_time: true, ..Default::default() },
            LsOptions { sort_time: true, access_time: true, ..Default::default() },
        ] {
            let forward = names(&sorted(sample(), opts.clone()))
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();
            let mut backward = names(&sorted(sample(), LsOptions { reverse: true, ..opts }))
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();
            backward.reverse();
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn size_sort_is_non_increasing() {
        let out = sorted(sample(), LsOptions { sort_size: true, ..Default::default() });
        assert!(out.windows(2).all(|w| w[0].size >= w[1].size));
        // equal sizes fall back to name order
        assert_eq!(names(&out), vec!["Alpha", "gamma", "beta", "delta"]);

        let out = sorted(sample(), LsOptions { sort_size: true, reverse: true, ..Default::default() });
        assert!(out.windows(2).all(|w| w[0].size <= w[1].size));
    }

    #[test]
    fn time_sort_is_newest_first() {
        let out = sorted(sample(), LsOptions { sort_time: true, ..Default::default() });
        assert_eq!(names(&out), vec!["Alpha", "gamma", "beta", "delta"]);

        // access times run the other way in the sample
        let out = sorted(
            sample(),
            LsOptions { sort_time: true, access_time: true, ..Default::default() },
        );
        assert_eq!(names(&out), vec!["delta", "beta", "gamma", "Alpha"]);
    }

    #[test]
    fn change_time_sort_uses_status_change() {
        let out = sorted(
            sample(),
            LsOptions { sort_time: true, change_time: true, ..Default::default() },
        );
        assert_eq!(names(&out), vec!["beta", "Alpha", "delta", "gamma"]);

        let out = sorted(
            sample(),
            LsOptions { sort_time: true, change_time: true, reverse: true, ..Default::default() },
        );
        assert_eq!(names(&out), vec!["gamma", "delta", "Alpha", "beta"]);

        // -c wins over -u
        let out = sorted(
            sample(),
            LsOptions { sort_time: true, change_time: true, access_time: true, ..Default::default() },
        );
        assert_eq!(names(&out), vec!["beta", "Alpha", "delta", "gamma"]);
    }

    #[test]
    fn names_differing_only_in_case_keep_a_total_order() {
        let input = vec![entry("b", 0, 0, 0), entry("B", 0, 0, 0), entry("a", 0, 0, 0)];
        let out = sorted(input, LsOptions::default());
        assert_eq!(names(&out), vec!["a", "B", "b"]);
    }

    #[test]
    fn unsorted_keeps_input_order() {
        let out = sorted(sample(), LsOptions { no_sort: true, reverse: true, ..Default::default() });
        assert_eq!(names(&out), vec!["beta", "Alpha", "gamma", "delta"]);
    }
}
