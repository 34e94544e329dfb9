//! Colored messages for command line output.
use colored::Colorize;

const TICK: &str = "✓";
const ERROR: &str = "Error:";

/// Print a success message.
pub fn success(msg: impl AsRef<str>) {
    println!("{} {}", msg.as_ref().green(), TICK.green());
}

/// Print a dimmed informational message.
pub fn info(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().dimmed());
}

/// Print an error message for failure to stderr.
pub fn fail(msg: impl AsRef<str>) {
    eprintln!("{} {}", ERROR.red(), msg.as_ref());
}
