//! Progress display module
//!
//! Styled terminal messages, the load spinner and the session statistics
//! summary.

use crate::parser::ParseStats;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                        REGULATION EXPLORER v1.0.0                            ║
║                  Search and filter regulatory record datasets                ║
║                                                                              ║
╚══════════════════════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Statistics for one explorer session
#[derive(Debug)]
pub struct SessionStats {
    pub file_bytes: u64,
    pub parse: ParseStats,
    pub matched: usize,
    pub exported: u64,
    pub start_time: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            file_bytes: 0,
            parse: ParseStats::default(),
            matched: 0,
            exported: 0,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        let parse = &self.parse;

        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    SESSION SUMMARY".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {}", "Data loaded:    ".green(), ByteSize(self.file_bytes));
        println!("  {} {}", "Rows read:      ".green(), format_number(parse.rows as u64));
        println!("  {} {}", "Preamble rows:  ".green(), format_number(parse.preamble as u64));
        println!("  {} {}", "Records:        ".green().bold(), format_number(parse.records as u64).green().bold());

        if parse.dropped() > 0 {
            println!(
                "  {} {} ({} short, {} without id)",
                "Rows dropped:   ".yellow(),
                format_number(parse.dropped() as u64),
                parse.short_rows,
                parse.invalid_ids
            );
        }

        println!();
        println!("  {} {}", "Matching:       ".green(), format_number(self.matched as u64));
        if self.exported > 0 {
            println!("  {} {}", "Exported:       ".green(), format_number(self.exported));
        }

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 1 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
