use std::path::PathBuf;

use clap::Parser;

use crate::models::ScanSelection;

#[derive(Parser, Debug)]
#[command(
    name = "scansinglefile",
    about = "Scan a single file for licenses, copyrights, emails and URLs",
    version
)]
pub struct Cli {
    /// Location of the file to be processed
    pub file_location: PathBuf,

    /// Scan for copyrights and holders
    #[arg(short = 'c', long)]
    pub scan_copyrights: bool,

    /// Scan for licenses
    #[arg(short = 'l', long)]
    pub scan_licenses: bool,

    /// Scan for emails
    #[arg(short = 'e', long)]
    pub scan_emails: bool,

    /// Scan for urls
    #[arg(short = 'u', long)]
    pub scan_urls: bool,

    /// Config file [default: ./.scansinglefile/config.toml, fallback ~/.config/scansinglefile/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// scancode executable, overrides the config file (license scans need scancode-toolkit 31.x or earlier)
    #[arg(long, value_name = "PATH")]
    pub scancode: Option<PathBuf>,

    /// Print each scancode command line on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}

impl From<&Cli> for ScanSelection {
    fn from(cli: &Cli) -> Self {
        ScanSelection {
            copyrights: cli.scan_copyrights,
            licenses: cli.scan_licenses,
            emails: cli.scan_emails,
            urls: cli.scan_urls,
        }
    }
}
