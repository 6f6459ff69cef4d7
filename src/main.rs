//! Regulation Explorer - search and filter regulatory record datasets
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use regulation_explorer::cli::Args;
use regulation_explorer::explorer::{Explorer, ExplorerConfig};
use regulation_explorer::progress::{print_banner, print_error, print_header, print_info};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if std::env::var_os("RUST_LOG").is_none() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else if !args.quiet {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    validate_args(&args)?;

    let config = ExplorerConfig::from_args(&args)?;

    if !args.quiet && args.verbose {
        print_config(&args, &config);
    }

    let mut explorer = Explorer::load(&args.input, args.quiet);
    explorer.run(&config)
}

/// Validate command-line arguments
fn validate_args(args: &Args) -> anyhow::Result<()> {
    if args.input.is_dir() {
        anyhow::bail!("Input must be a file, got directory: {:?}", args.input);
    }

    if args.page_size == 0 {
        anyhow::bail!("--page-size must be at least 1");
    }

    if args.show.is_some() && args.export.is_some() {
        anyhow::bail!("--show and --export cannot be combined");
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &ExplorerConfig) {
    let criteria = &config.criteria;
    print_header("Configuration");

    print_info(&format!("Input:          {:?}", args.input));
    if !criteria.search.is_empty() {
        print_info(&format!("Search:         {}", criteria.search));
    }
    print_info(&format!("Active filters: {}", criteria.active_filter_count()));
    print_info(&format!(
        "Years:          {}-{}",
        criteria.year_range.0, criteria.year_range.1
    ));
    print_info(&format!("Match mode:     {:?}", criteria.match_mode));
    print_info(&format!("Page:           {} (size {})", config.page, config.page_size));
    if let Some((ref path, format)) = config.export {
        print_info(&format!("Export:         {:?} ({:?})", path, format));
    }
}
