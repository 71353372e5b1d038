use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use filekit_builtins::ls::LsOptions;

#[cfg(not(unix))]
compile_error!("filekit only supports unix targets");

/// filekit command-line interface.
#[derive(Parser, Debug)]
#[command(author, version, about = "POSIX file-management utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List directory contents.
    Ls(LsArgs),
}

#[derive(Args, Debug)]
struct LsArgs {
    /// List dotfiles, but not `.` and `..`
    #[arg(short = 'A', long)]
    almost_all: bool,

    /// List dotfiles, `.` and `..`
    #[arg(short = 'a', long)]
    all: bool,

    /// List subdirectories recursively
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Long listing format
    #[arg(short = 'l')]
    long: bool,

    /// Three names per line
    #[arg(short = 'C')]
    column: bool,

    /// Append an indicator (one of /*@|) to entries
    #[arg(short = 'F', long)]
    classify: bool,

    /// Append / to directories
    #[arg(short = 'p')]
    indicator: bool,

    /// Fill width with a comma separated list of entries
    #[arg(short = 'm')]
    stream: bool,

    /// One entry per line
    #[arg(short = '1')]
    one_per_line: bool,

    /// Reverse order while sorting
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Do not sort; implies -a
    #[arg(short = 'f')]
    no_sort: bool,

    /// Show information for the file a symbolic link references
    #[arg(short = 'L', long)]
    dereference: bool,

    /// Do not list owner
    #[arg(short = 'g')]
    omit_owner: bool,

    /// Do not list group
    #[arg(short = 'o', long = "no-group")]
    omit_group: bool,

    /// List numeric user and group IDs
    #[arg(short = 'n', long = "numeric-uid-gid")]
    numeric_ids: bool,

    /// Print the index number of each file
    #[arg(short = 'i', long)]
    inode: bool,

    /// Print ? instead of nongraphic characters
    #[arg(short = 'q', long = "hide-control-chars")]
    hide_control_chars: bool,

    /// Sort by file size, largest first
    #[arg(short = 'S')]
    sort_size: bool,

    /// Sort by time, newest first
    #[arg(short = 't')]
    sort_time: bool,

    /// Use time of last access
    #[arg(short = 'u')]
    access_time: bool,

    /// Use time of last status change
    #[arg(short = 'c')]
    change_time: bool,

    /// Print sizes in kibibytes
    #[arg(short = 'k', long)]
    kibibytes: bool,

    /// Directories to list (default: current directory)
    paths: Vec<PathBuf>,
}

impl From<LsArgs> for LsOptions {
    fn from(args: LsArgs) -> Self {
        LsOptions {
            paths: args.paths,
            almost_all: args.almost_all,
            all: args.all,
            recursive: args.recursive,
            long: args.long,
            column: args.column,
            classify: args.classify,
            indicator: args.indicator,
            stream: args.stream,
            one_per_line: args.one_per_line,
            reverse: args.reverse,
            no_sort: args.no_sort,
            dereference: args.dereference,
            omit_owner: args.omit_owner,
            omit_group: args.omit_group,
            numeric_ids: args.numeric_ids,
            inode: args.inode,
            hide_control_chars: args.hide_control_chars,
            sort_size: args.sort_size,
            sort_time: args.sort_time,
            access_time: args.access_time,
            change_time: args.change_time,
            kibibytes: args.kibibytes,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    filekit_builtins::logging::init(None);

    match cli.command {
        Command::Ls(args) => {
            let opts = LsOptions::from(args);
            tracing::debug!(?opts, "ls");
            let summary = filekit_builtins::ls(&opts)?;
            if !summary.is_clean() {
                std::process::exit(summary.exit_code());
            }
        }
    }

    Ok(())
}
