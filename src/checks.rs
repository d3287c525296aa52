//! Content assertions for the three fetched documents
//!
//! Deliberately plain substring containment, not markup/script parsing: the
//! point is a fast "is the right bundle being served" check, and substring
//! scans keep it that way.

use crate::error::SmokeError;

/// Both fighters must be named in the index and in the game script.
const FIGHTERS: [&str; 2] = ["ROHAN", "DEV"];

/// The index document must wire up the canvas, both fighters, and both
/// assets by name.
pub fn check_index(doc: &str) -> Result<(), SmokeError> {
    expect(doc, "<canvas", "index.html should include a canvas")?;
    expect_all(doc, &FIGHTERS, "index.html should mention both fighters")?;
    expect(doc, "game.js", "index.html should load game.js")?;
    expect(doc, "style.css", "index.html should load style.css")?;
    Ok(())
}

/// The game script must touch WebAudio and name both fighters.
pub fn check_game_js(doc: &str) -> Result<(), SmokeError> {
    expect_any(
        doc,
        &["AudioContext", "webkitAudioContext"],
        "game.js should include WebAudio",
    )?;
    expect_all(doc, &FIGHTERS, "game.js should include both fighter names")?;
    Ok(())
}

/// The stylesheet must define the per-fighter theme variables on `:root`.
pub fn check_style_css(doc: &str) -> Result<(), SmokeError> {
    expect_all(
        doc,
        &[":root", "--rohan", "--dev"],
        "style.css should include theme vars",
    )
}

fn expect(doc: &str, needle: &str, description: &str) -> Result<(), SmokeError> {
    if doc.contains(needle) {
        Ok(())
    } else {
        Err(SmokeError::Content(description.to_string()))
    }
}

fn expect_all(doc: &str, needles: &[&str], description: &str) -> Result<(), SmokeError> {
    if needles.iter().all(|n| doc.contains(n)) {
        Ok(())
    } else {
        Err(SmokeError::Content(description.to_string()))
    }
}

fn expect_any(doc: &str, needles: &[&str], description: &str) -> Result<(), SmokeError> {
    if needles.iter().any(|n| doc.contains(n)) {
        Ok(())
    } else {
        Err(SmokeError::Content(description.to_string()))
    }
}
