//! Output rendering: exactly one JSON value on stdout per invocation.
//!
//! Compact by default (scripting-friendly), indented with `--pretty`.
//! Warnings and diagnostics never come through here; they go to stderr.

use std::io::{self, Write};

use crate::config::Settings;

/// Print a serializable value as the invocation's single JSON output.
pub fn print<T: serde::Serialize>(settings: &Settings, value: &T) {
    let rendered = if settings.pretty {
        render_json_pretty(value)
    } else {
        render_json_compact(value)
    };
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{rendered}");
}

/// Print an always-indented JSON value (structural listings).
pub fn print_pretty<T: serde::Serialize>(value: &T) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", render_json_pretty(value));
}

fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}
