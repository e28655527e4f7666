//! # Output Formatting
//!
//! Provides formatted output functions with colors and consistent styling
//! for user-facing messages and terminal output.

use owo_colors::OwoColorize;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a repository path
pub fn format_repo_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a shortened commit id
pub fn format_commit_id(id: &str) -> String {
  id.yellow().to_string()
}

/// Format a bookmark name
pub fn format_bookmark(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_functions() {
    let path = format_repo_path("/test/path");
    assert!(!path.is_empty());

    let id = format_commit_id("ab12cd");
    assert!(!id.is_empty());

    let bookmark = format_bookmark("main");
    assert!(!bookmark.is_empty());

    let command = format_command("trellis stacks");
    assert!(!command.is_empty());
  }
}
