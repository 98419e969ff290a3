use clap::Parser;

/// Command-line surface: check mode plus logging verbosity. Everything else
/// the run needs is derived from the working directory at startup.
#[derive(Parser, Debug)]
#[command(name = "repofmt")]
#[command(
    about = "Format every supported language in the repository, honoring gitignore rules",
    long_about = None
)]
pub struct Args {
    /// Verify formatting without modifying any file (for CI)
    #[arg(short, long)]
    pub check: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}
