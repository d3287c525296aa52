//! `sitecheck` binary
//!
//! Run from the repository root; takes no arguments. Prints exactly one line
//! to stdout (`OK: smoke test passed` or `FAIL: <reason>`) and exits 0 or 1.
//! Diagnostics, if any, go to stderr via `RUST_LOG`.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = match repo_root() {
        Ok(root) => root,
        Err(reason) => return fail(&reason),
    };

    match sitecheck::run(&root) {
        Ok(()) => {
            println!(
                "{}: smoke test passed",
                "OK".if_supports_color(Stream::Stdout, |t| t.green())
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(reason: &str) -> ExitCode {
    println!(
        "{}: {reason}",
        "FAIL".if_supports_color(Stream::Stdout, |t| t.red())
    );
    ExitCode::FAILURE
}

/// The repository root is the working directory; the binary consumes no
/// arguments or environment beyond that.
fn repo_root() -> Result<Utf8PathBuf, String> {
    let cwd = std::env::current_dir().map_err(|e| format!("cannot resolve working directory: {e}"))?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|p| format!("working directory is not UTF-8: {}", p.display()))
}
