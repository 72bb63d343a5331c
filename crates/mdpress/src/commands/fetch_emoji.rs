//! The `fetch-emoji` command.
//!
//! Downloads the GitHub emoji shortcode catalog to a fixed local path so
//! site authors can audit the shortcodes the renderer understands. Runs on
//! demand only — rendering never touches the network — and failures are
//! reported without failing the process.

use std::path::Path;
use std::time::Duration;

use ureq::Agent;

use crate::error::CliError;
use crate::output::Output;

/// Source of the shortcode catalog.
const EMOJI_DB_URL: &str =
    "https://raw.githubusercontent.com/github/gemoji/master/db/emoji.json";

/// Local path the catalog is written to.
const EMOJI_DB_PATH: &str = "assets/emoji.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn execute(output: &Output) -> Result<(), CliError> {
    match fetch() {
        Ok(body) => match write_catalog(Path::new(EMOJI_DB_PATH), &body) {
            Ok(()) => output.success(&format!("Wrote {EMOJI_DB_PATH}")),
            Err(err) => {
                tracing::error!(%err, "failed to write emoji catalog");
                output.error(&format!("Failed to write {EMOJI_DB_PATH}: {err}"));
            }
        },
        Err(err) => {
            tracing::error!(%err, "failed to fetch emoji catalog");
            output.error(&format!("Failed to fetch {EMOJI_DB_URL}: {err}"));
        }
    }
    Ok(())
}

fn fetch() -> Result<String, ureq::Error> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();
    let mut response = agent.get(EMOJI_DB_URL).call()?;
    response.body_mut().read_to_string()
}

fn write_catalog(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_catalog_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets").join("emoji.json");

        write_catalog(&path, "[]").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
