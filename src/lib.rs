//! Smoke tester for the ROHAN vs DEV static site bundle
//!
//! Serves the repository over loopback HTTP and checks that the served
//! index, game script, and stylesheet contain the markers the game needs:
//! the canvas, both fighter names, the WebAudio hookup, and the per-fighter
//! theme variables. One run, one OK/FAIL line, exit code 0 or 1.

pub mod checks;
pub mod error;
pub mod fetch;
pub mod serve;

use camino::Utf8Path;

pub use error::SmokeError;
use fetch::Client;
use serve::SiteServer;

/// Run the smoke test against the repository at `root`.
///
/// `root` must contain a `site/` directory; the server serves `root` itself
/// so the bundle is reachable under `/site/`. The server is stopped before
/// this returns, on every path.
pub fn run(root: &Utf8Path) -> Result<(), SmokeError> {
    if !root.join("site").is_dir() {
        return Err(SmokeError::MissingSiteDir);
    }

    let mut server = SiteServer::start(root)?;
    let outcome = check_served_site(&server.base_url());
    server.stop();
    outcome
}

/// Fetch the three documents sequentially and run their assertions.
fn check_served_site(base_url: &str) -> Result<(), SmokeError> {
    let client = Client::new();

    let index = client.fetch_text(&format!("{base_url}/site/"))?;
    checks::check_index(&index)?;

    let game_js = client.fetch_text(&format!("{base_url}/site/game.js"))?;
    checks::check_game_js(&game_js)?;

    let style_css = client.fetch_text(&format!("{base_url}/site/style.css"))?;
    checks::check_style_css(&style_css)?;

    Ok(())
}
