//! `ls` command - directory listing engine.
//!
//! Pipeline per root: [`traversal`] enumerates directories, [`sort`] applies
//! the dotfile rule, [`entry`] resolves metadata, [`sort`] orders the
//! entries, [`classify`] appends type indicators and [`render`] produces the
//! text. Failures are reported on the diagnostic stream and only ever skip
//! the root, subdirectory or entry they concern.

pub mod classify;
pub mod entry;
pub mod options;
pub mod render;
pub mod sort;
pub mod traversal;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uzers::{Groups, Users};

pub use classify::FileKind;
pub use entry::{DirectoryEntry, EntryResolver};
pub use options::{DisplayMode, HiddenPolicy, Indicator, ListingRequest, LsOptions, SortKey, TimeKind};
pub use traversal::{DirectoryListing, ListingGroup};

use crate::common::{BuiltinError, BuiltinResult, Severity};

/// What one listing call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSummary {
    pub groups: usize,
    pub entries: usize,
    /// Entries or subdirectories that were skipped
    pub minor_failures: usize,
    /// Roots that could not be listed at all
    pub serious_failures: usize,
}

impl ListingSummary {
    pub fn is_clean(&self) -> bool {
        self.minor_failures == 0 && self.serious_failures == 0
    }

    /// `0` when clean, `1` for skipped entries, `2` when a root failed.
    pub fn exit_code(&self) -> i32 {
        if self.serious_failures > 0 {
            2
        } else if self.minor_failures > 0 {
            1
        } else {
            0
        }
    }

    fn record(&mut self, err: &BuiltinError) {
        match err.severity() {
            Severity::Minor => self.minor_failures += 1,
            Severity::Serious | Severity::Fatal => self.serious_failures += 1,
        }
    }
}

/// List with the given options to stdout, diagnostics to stderr.
pub fn ls_cli(opts: &LsOptions) -> BuiltinResult<ListingSummary> {
    let request = ListingRequest::resolve(opts);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut diag = stderr.lock();

    let summary = list(&request, &mut out, &mut diag)?;
    out.flush()?;
    Ok(summary)
}

/// Run one listing call.
///
/// Only a failure to write `out` or `diag` is returned as an error; every
/// filesystem failure is written to `diag` and counted in the summary.
pub fn list<W: Write, E: Write>(
    request: &ListingRequest,
    out: &mut W,
    diag: &mut E,
) -> BuiltinResult<ListingSummary> {
    list_with(request, &EntryResolver::new(request), out, diag)
}

/// [`list`] with a caller-supplied resolver, e.g. one backed by a mock user
/// database.
pub fn list_with<U, W, E>(
    request: &ListingRequest,
    resolver: &EntryResolver<'_, U>,
    out: &mut W,
    diag: &mut E,
) -> BuiltinResult<ListingSummary>
where
    U: Users + Groups,
    W: Write,
    E: Write,
{
    let roots = default_roots(&request.roots);
    let mut summary = ListingSummary::default();

    for root in &roots {
        let traversal = match traversal::traverse(root, request.recursive) {
            Ok(t) => t,
            Err(err) => {
                report(diag, &err, &mut summary)?;
                continue;
            }
        };
        for err in &traversal.skipped {
            report(diag, err, &mut summary)?;
        }

        let headers = roots.len() > 1 || traversal.listing.len() > 1;
        for group in traversal.listing {
            if headers {
                write!(out, "\n{}:\n", group.path.display())?;
            }
            let entries = collect_group(&group, request, resolver, diag, &mut summary)?;
            out.write_all(render::render(&entries, request).as_bytes())?;
            summary.groups += 1;
            summary.entries += entries.len();
        }
    }

    debug!(?summary, "listing finished");
    Ok(summary)
}

/// Filter, resolve, sort and classify the entries of one group.
fn collect_group<U: Users + Groups, E: Write>(
    group: &ListingGroup,
    request: &ListingRequest,
    resolver: &EntryResolver<'_, U>,
    diag: &mut E,
    summary: &mut ListingSummary,
) -> BuiltinResult<Vec<DirectoryEntry>> {
    let names = sort::select_names(&group.names, request.hidden);
    let mut entries = Vec::with_capacity(names.len());

    for name in &names {
        match resolver.resolve(&group.path, name) {
            Ok(entry) => entries.push(entry),
            Err(err) => report(diag, &err, summary)?,
        }
    }

    sort::sort_entries(&mut entries, request);
    for entry in &mut entries {
        classify::classify(entry, request.indicator);
    }
    Ok(entries)
}

fn default_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    if roots.is_empty() {
        vec![Path::new(".").to_path_buf()]
    } else {
        roots.to_vec()
    }
}

fn report<E: Write>(diag: &mut E, err: &BuiltinError, summary: &mut ListingSummary) -> BuiltinResult<()> {
    warn!(error = %err, "ls");
    summary.record(err);
    writeln!(diag, "ls: {err}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run(opts: LsOptions) -> (String, String, ListingSummary) {
        let request = ListingRequest::resolve(&opts);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let summary = list(&request, &mut out, &mut diag).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
            summary,
        )
    }

    #[test]
    fn single_root_has_no_header() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b"), b"").unwrap();
        fs::write(dir.path().join("A"), b"").unwrap();

        let (out, diag, summary) = run(LsOptions {
            paths: vec![dir.path().to_path_buf()],
            ..Default::default()
        });
        assert_eq!(out, "A  b\n");
        assert!(diag.is_empty());
        assert_eq!(summary.groups, 1);
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn failed_root_does_not_stop_the_others() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("kept"), b"").unwrap();
        let missing = dir.path().join("missing");

        let (out, diag, summary) = run(LsOptions {
            paths: vec![missing.clone(), dir.path().to_path_buf()],
            ..Default::default()
        });
        assert_eq!(out, format!("\n{}:\nkept\n", dir.path().display()));
        assert!(diag.starts_with(&format!("ls: cannot access '{}'", missing.display())));
        assert_eq!(summary.serious_failures, 1);
        assert_eq!(summary.exit_code(), 2);
    }

    #[test]
    fn summary_exit_codes() {
        let minor = ListingSummary { minor_failures: 1, ..Default::default() };
        assert_eq!(minor.exit_code(), 1);
        assert!(!minor.is_clean());
        assert!(ListingSummary::default().is_clean());
    }
}
