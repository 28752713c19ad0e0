//! Headless script runner.
//!
//! Reads one command per line and writes one JSON line per command:
//!
//! - a direction (`up`, `d`, `Left`, ...) is submitted to the session
//! - `wait <ms>` advances the session clock
//! - `restart` starts a fresh level
//!
//! Blank lines and `#` comments are skipped. A line that fails to decode is
//! answered with an error object and the run continues.

use std::io::{BufRead, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{Session, SessionSnapshot};
use crate::input::decode_direction;

#[derive(Serialize)]
#[serde(untagged)]
enum Reply<'a> {
    Snapshot(&'a SessionSnapshot),
    Error { line: usize, error: String },
}

/// Run every command from `input` against `session`, writing replies to `out`.
///
/// Returns the number of commands processed.
pub fn run_script<R: BufRead, W: Write>(session: &mut Session, input: R, mut out: W) -> Result<usize> {
    let mut processed = 0usize;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let cmd = line.trim();
        if cmd.is_empty() || cmd.starts_with('#') {
            continue;
        }
        processed += 1;

        let reply = match execute(session, cmd) {
            Ok(snap) => serde_json::to_string(&Reply::Snapshot(&snap))?,
            Err(err) => {
                warn!(line = idx + 1, %err, "rejected script line");
                serde_json::to_string(&Reply::Error {
                    line: idx + 1,
                    error: err.to_string(),
                })?
            }
        };
        out.write_all(reply.as_bytes())?;
        out.write_all(b"\n")?;
    }

    out.flush()?;
    debug!(processed, "script finished");
    Ok(processed)
}

fn execute(session: &mut Session, cmd: &str) -> Result<SessionSnapshot> {
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("wait"), Some(ms), None) => {
            let ms: u32 = ms
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid wait duration: {:?}", ms))?;
            Ok(session.advance_clock(ms))
        }
        (Some("restart"), None, None) => {
            session.restart()?;
            Ok(session.take_snapshot())
        }
        _ => {
            let dir = decode_direction(cmd)?;
            Ok(session.submit_direction(dir))
        }
    }
}
