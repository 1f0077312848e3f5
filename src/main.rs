//! # resoscan
//!
//! Command-line front end for momentum-resolution scans.
//!
//! ## Usage
//!
//! ```bash
//! # Fill histograms for one sample
//! resoscan analyze IDEA_2T.parquet -o IDEA_2T.hist.parquet
//!
//! # Summarize one histogram
//! resoscan reduce IDEA_2T.hist.parquet -k muons_res_pt -r 10
//!
//! # Reduce every sample of a scan and write the curves
//! resoscan scan scan.toml
//!
//! # Generate synthetic samples and run the whole chain
//! resoscan demo resoscan_demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
