use std::path::PathBuf;

/// Suitability map CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "suitmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run one update cycle headless and write the resulting layers as JSON
    Render(RenderArgs),

    /// Write the town labels (name and centroid) as JSON
    Labels(LabelsArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Data root: a directory, or an http(s):// base URL
    pub data: String,

    /// Dataset id, defaults to the first dataset of the catalog
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Aggregate by town instead of hexagon bins
    #[arg(long)]
    pub by_town: bool,

    /// Category to switch off (repeatable)
    #[arg(long = "disable", value_name = "LABEL")]
    pub disabled: Vec<String>,

    /// Dataset catalog (JSON) replacing the built-in Worcester catalog
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Boundary document path under the data root
    #[arg(long)]
    pub boundaries: Option<String>,

    /// Output file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Data root: a directory, or an http(s):// base URL
    pub data: String,

    /// Boundary document path under the data root
    #[arg(long)]
    pub boundaries: Option<String>,

    /// Output file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
