//! Output functions for consistent CLI formatting
//!
//! Status lines go to stderr so stdout carries only rendered data.

use super::context::UiContext;
use crate::error::HnError;
use console::style;

/// Print an error and its hint, if any
pub fn error(err: &HnError) {
    eprintln!("{} {}", style("Error:").red().bold(), err);
    if let Some(hint) = err.hint() {
        eprintln!("{} {}", style("Hint:").yellow(), hint);
    }
}

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✓").green(), message);
    } else {
        eprintln!("  {} {}", style("[OK]").green(), message);
    }
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {} - {}", style("!").yellow(), message, style(hint).dim());
    } else {
        eprintln!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

/// Print styled key-value pair to stdout
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("{:<10} {}", style(key).dim(), value);
    } else {
        println!("{:<10} {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_non_interactive() {
        let ctx = UiContext::non_interactive();
        // These should not panic
        step_ok(&ctx, "Step completed");
        step_warn_hint(&ctx, "Warning", "hint");
        key_value(&ctx, "entries", "3");
        error(&HnError::MissingUser);
    }
}
