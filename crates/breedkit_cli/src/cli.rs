use std::path::PathBuf;

use breedkit_io_fs::SpecSampleConfig;
use clap::{ArgAction, Parser};

/// Copy the first few images of every breed folder into a web-ready tree,
/// renamed 1.jpg, 2.jpg, 3.jpg.
#[derive(Debug, Parser)]
#[command(name = "breedkit")]
#[command(version)]
pub struct Cli {
    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source root holding one folder per breed [default: Images]
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Destination root [default: public/breeds]
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Images taken per breed [default: 3]
    #[arg(short = 'n', long = "count")]
    pub count: Option<usize>,

    /// Accepted image extension, repeatable [default: jpg, jpeg, png]
    #[arg(short, long = "extension")]
    pub extensions: Vec<String>,

    /// Extension given to copied files [default: jpg]
    #[arg(long)]
    pub output_extension: Option<String>,

    /// Delete files in breed folders that are not part of this run's output
    #[arg(long)]
    pub remove_stale: bool,

    /// Stop at the first breed that fails instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Plain byte copy; do not carry permissions, timestamps or xattrs
    #[arg(long)]
    pub no_preserve_metadata: bool,

    /// Show what would be copied without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Config overlay built from the flags that were actually given.
    pub fn to_config(&self) -> SpecSampleConfig {
        SpecSampleConfig {
            source: self.source.clone(),
            destination: self.destination.clone(),
            count_per_category: self.count,
            extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            ext_output: self.output_extension.clone(),
            remove_stale: self.remove_stale.then_some(true),
            fail_fast: self.fail_fast.then_some(true),
            preserve_metadata: self.no_preserve_metadata.then_some(false),
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
