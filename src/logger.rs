//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("serve"; "http://{}", addr);
//! debug!("store"; "registered {} -> {}", key, path.display());
//! ```
//!
//! `debug!` lines are dropped unless verbose mode is on. Lines logged under
//! the `error` module go to stderr, everything else to stdout.

use owo_colors::OwoColorize;
use std::fmt::Arguments;
use std::io::{Write, stderr, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable `debug!` output.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

/// Log a line with a colored module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Info, $module, format_args!($($arg)*))
    };
}

/// Log a line only when verbose mode is enabled.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Level::Debug, $module, format_args!($($arg)*))
    };
}

/// Write one log line. Write failures are ignored.
pub fn emit(level: Level, module: &str, args: Arguments<'_>) {
    if level == Level::Debug && !is_verbose() {
        return;
    }
    let line = format!("{} {args}", prefix(module));

    if module.eq_ignore_ascii_case("error") {
        writeln!(stderr().lock(), "{line}").ok();
    } else {
        let mut out = stdout().lock();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    }
}

/// `[module]`, colored by subsystem.
fn prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold().to_string(),
        "store" | "cache" => prefix.bright_green().bold().to_string(),
        "minify" => prefix.bright_magenta().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}
