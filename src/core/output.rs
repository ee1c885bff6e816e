//! Unified output formatting utilities for consistent CLI presentation.
//!
//! # Design Principles
//! - **Errors on stderr**: one line per failure, prefixed with the tool name
//! - **Listings stay plain**: `files` and `export --dry-run` print bare lines so
//!   they can be piped
//! - **Status messages**: green check for completed operations, white for info

use colored::*;

const TOOL_NAME: &str = "lg";

/// Prints a single-line error to stderr
///
/// # Format
/// ```text
/// lg: <message>
/// ```
pub fn print_error(message: &str) {
    eprintln!("{}: {}", TOOL_NAME.red(), message);
}

/// Prints a success message with a leading check mark
///
/// # Format
/// ```text
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message.white());
}

/// Prints an informational message
pub fn print_info(message: &str) {
    println!("{}", message.white());
}

/// Prints raw text as-is, adding a newline only if it lacks one
pub fn print_raw(text: &str) {
    if text.ends_with('\n') || text.is_empty() {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
