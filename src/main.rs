use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use segdiff::areas::controller::{DEFAULT_MAX_LENGTH, EditController};
use segdiff::areas::workspace::Workspace;
use segdiff::commands::compare::CompareOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "segdiff",
    version = "0.1.0",
    about = "Compare binary files byte-by-byte under user-defined segmentation",
    long_about = "Each file can be split at arbitrary byte offsets (boundaries) into \
    segments; segments are aligned across files by index and compared positionally. \
    There is no insertion/deletion realignment: comparison is strictly positional \
    within the segments you choose.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(required = true, help = "The files to compare")]
    files: Vec<PathBuf>,

    #[arg(
        long,
        default_value_t = DEFAULT_MAX_LENGTH,
        help = "Load at most this many bytes from each file"
    )]
    max_length: usize,

    #[arg(long, default_value_t = 16, help = "Bytes per rendered row")]
    pane_width: usize,

    #[arg(
        long,
        help = "JSON mapping from source name to boundary offsets, \
        e.g. '{\"a.bin\": [4, 10], \"b.bin\": [7]}'"
    )]
    boundaries: Option<String>,

    #[arg(long, help = "Exclude the named source from comparison (repeatable)")]
    hide: Vec<String>,

    #[arg(long, help = "Emit a machine-readable JSON report instead of the grid")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let pwd = std::env::current_dir()?;
    let workspace = Workspace::new(pwd.into_boxed_path());
    let options = CompareOptions::new(cli.files, cli.pane_width, cli.boundaries, cli.hide, cli.json);

    let mut controller = EditController::new(cli.max_length);
    controller
        .compare(&workspace, &options, &mut std::io::stdout())
        .await
}
