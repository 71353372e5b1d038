//! Text rendering for one listing group.

use chrono::Local;
use unicode_width::UnicodeWidthStr;

use super::entry::DirectoryEntry;
use super::options::{DisplayMode, ListingRequest};

/// `Jan _2 15:04`
pub const TIME_FORMAT: &str = "%b %e %H:%M";

const COLUMNS: usize = 3;
const COLUMN_PADDING: usize = 10;

/// Render ordered, classified entries for the request's display mode.
///
/// The result always ends with a line terminator of its own, so modes that
/// print one line per entry end in a blank line.
pub fn render(entries: &[DirectoryEntry], request: &ListingRequest) -> String {
    let mut out = match request.display {
        DisplayMode::Column => columnise(entries.iter().map(|e| e.name.as_str())),
        DisplayMode::Long => entries
            .iter()
            .map(|e| format_long_line(e, request) + "\n")
            .collect(),
        DisplayMode::Stream => entries
            .iter()
            .map(|e| short_item(e, request))
            .collect::<Vec<_>>()
            .join(", "),
        DisplayMode::Default if request.one_per_line => entries
            .iter()
            .map(|e| short_item(e, request) + "\n")
            .collect(),
        DisplayMode::Default => entries
            .iter()
            .map(|e| short_item(e, request))
            .collect::<Vec<_>>()
            .join("  "),
    };
    out.push('\n');
    out
}

/// One `ls -l` line, without the newline.
pub fn format_long_line(entry: &DirectoryEntry, request: &ListingRequest) -> String {
    let ids = request.ids;
    let mut fields: Vec<String> = Vec::with_capacity(8);

    if request.inode {
        fields.push(entry.inode.to_string());
    }
    fields.push(entry.permissions.clone());
    fields.push(entry.links.to_string());
    if ids.owner {
        fields.push(if ids.numeric { entry.uid.to_string() } else { entry.owner.clone() });
    }
    if ids.group {
        fields.push(if ids.numeric { entry.gid.to_string() } else { entry.group.clone() });
    }
    fields.push(if request.kibibytes {
        format!("{:.1}K", entry.size_kib)
    } else {
        entry.size.to_string()
    });
    fields.push(
        entry
            .timestamp(request.time)
            .with_timezone(&Local)
            .format(TIME_FORMAT)
            .to_string(),
    );
    fields.push(match &entry.symlink_target {
        Some(target) => format!("{} -> {}", entry.name, target),
        None => entry.name.clone(),
    });

    fields.join(" ")
}

fn short_item(entry: &DirectoryEntry, request: &ListingRequest) -> String {
    if request.inode {
        format!("{} {}", entry.inode, entry.name)
    } else {
        entry.name.clone()
    }
}

/// Three names per line. Every cell but the last on its line is padded to the
/// widest cell of its column plus [`COLUMN_PADDING`].
fn columnise<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    let rows: Vec<&[&str]> = names.chunks(COLUMNS).collect();

    let mut widths = [0usize; COLUMNS];
    for row in &rows {
        for (col, name) in row.iter().enumerate().take(row.len() - 1) {
            widths[col] = widths[col].max(name.width());
        }
    }

    let mut out = String::new();
    for row in rows {
        for (col, name) in row.iter().enumerate() {
            out.push_str(name);
            if col + 1 < row.len() {
                let pad = widths[col] - name.width() + COLUMN_PADDING;
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}
