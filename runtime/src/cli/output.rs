//! Console output helpers shared by the subcommands.
//!
//! Global flags are mirrored into `SKIMMER_*` environment variables by
//! `main`, so any module can check them without threading a context through.

use crate::listing::Entry;
use crate::scrape::RankedListing;

pub fn is_json() -> bool {
    flag("SKIMMER_JSON")
}

pub fn is_quiet() -> bool {
    flag("SKIMMER_QUIET")
}

pub fn is_verbose() -> bool {
    flag("SKIMMER_VERBOSE")
}

pub fn no_color() -> bool {
    flag("SKIMMER_NO_COLOR") || std::env::var_os("NO_COLOR").is_some()
}

fn flag(key: &str) -> bool {
    matches!(std::env::var(key).as_deref(), Ok("1"))
}

/// Print a status line unless quiet or JSON output was requested.
pub fn status(message: &str) {
    if !is_quiet() && !is_json() {
        println!("{message}");
    }
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to encode JSON: {e}"),
    }
}

/// Report a failed command on stderr (or stdout as a JSON error object).
///
/// Unlike [`status`], this ignores `--quiet`.
pub fn report_error(err: &anyhow::Error) {
    if is_json() {
        print_json(&error_json(err));
    } else {
        let _ = write_error(&mut std::io::stderr(), err);
    }
}

pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "message": format!("{err:#}"),
    })
}

fn write_error<W: std::io::Write>(out: &mut W, err: &anyhow::Error) -> std::io::Result<()> {
    writeln!(out, "  Error: {err:#}")
}

/// Render a ranked listing in the selected output mode.
pub fn print_listing(listing: &RankedListing) {
    if is_json() {
        match serde_json::to_value(listing) {
            Ok(value) => print_json(&value),
            Err(e) => eprintln!("  Error: failed to encode listing: {e}"),
        }
        return;
    }

    println!("Sorted Articles (Newest to Oldest):");
    let verbose = is_verbose();
    for (i, entry) in listing.entries.iter().enumerate() {
        println!("{}", listing_line(i + 1, entry, verbose));
    }
}

/// One numbered line of the listing.
pub fn listing_line(position: usize, entry: &Entry, with_time: bool) -> String {
    if with_time {
        format!("{position}. {} ({})", entry.title, entry.display_time())
    } else {
        format!("{position}. {}", entry.title)
    }
}

/// ANSI styling that honors `--no-color`.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self { color: !no_color() }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn ok_sym(&self) -> String {
        self.paint("32", "[OK]")
    }

    pub fn warn_sym(&self) -> String {
        self.paint("33", "[!!]")
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }
}
