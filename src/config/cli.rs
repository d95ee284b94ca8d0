use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cocktail-etl")]
#[command(about = "Extract structured cocktails from a free-text description")]
pub struct CliArgs {
    /// Description text file; paragraphs separated by blank lines
    #[arg(long)]
    pub input: PathBuf,

    /// Already extracted model directory
    #[arg(long, conflicts_with_all = ["config", "models_root"])]
    pub model_dir: Option<PathBuf>,

    /// Job configuration (TOML) naming the model and scratch dir
    #[arg(long, requires = "models_root")]
    pub config: Option<PathBuf>,

    /// Local mirror of the model bucket, containing models/<model>.tar.gz
    #[arg(long, requires = "config")]
    pub models_root: Option<PathBuf>,

    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
