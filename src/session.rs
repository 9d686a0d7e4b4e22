//! Recorded face sessions: one `{"t": seconds, "sample": {...}}` per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::face::FaceSample;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("session timestamps go backwards at line {0}")]
    NonMonotonic(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionFrame {
    pub t: f64,
    pub sample: FaceSample,
}

/// Parse JSON lines; blank lines and `#` comments are skipped.
pub fn parse_session<R: BufRead>(reader: R) -> Result<Vec<SessionFrame>, SessionError> {
    let mut frames: Vec<SessionFrame> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| SessionError::Io {
            path: format!("<line {line_no}>"),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: SessionFrame = serde_json::from_str(trimmed).map_err(|source| {
            SessionError::Parse {
                line: line_no,
                source,
            }
        })?;
        if let Some(prev) = frames.last() {
            if frame.t < prev.t {
                return Err(SessionError::NonMonotonic(line_no));
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

pub fn load_session(path: &Path) -> Result<Vec<SessionFrame>, SessionError> {
    let file = File::open(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let frames = parse_session(BufReader::new(file))?;
    debug!(path = %path.display(), frames = frames.len(), "session loaded");
    Ok(frames)
}

/// Sample-and-hold lookup over a time-ordered session.
#[derive(Debug, Clone)]
pub struct SessionCursor<'a> {
    frames: &'a [SessionFrame],
    next: usize,
}

impl<'a> SessionCursor<'a> {
    pub fn new(frames: &'a [SessionFrame]) -> Self {
        Self { frames, next: 0 }
    }

    /// Latest sample at or before `t`. Time must not go backwards between calls.
    pub fn sample_at(&mut self, t: f64) -> Option<&'a FaceSample> {
        while self.next < self.frames.len() && self.frames[self.next].t <= t {
            self.next += 1;
        }
        self.next
            .checked_sub(1)
            .map(|idx| &self.frames[idx].sample)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.frames.last().map(|f| f.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"
# recorded on a phone
{"t": 0.0, "sample": {"orientation": {"pitch": -0.5}}}
{"t": 0.5, "sample": {"orientation": {"pitch": 0.5}, "blendshapes": {"jawOpen": 0.6}}}

{"t": 1.0, "sample": {}}
"#;

    #[test]
    fn parses_lines_and_skips_comments() {
        let frames = parse_session(SESSION.as_bytes()).expect("parse");
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].sample.blendshapes.jaw_open, 0.6);
        assert_eq!(frames[0].sample.orientation.pitch, -0.5);
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse_session("{\"t\":0,\"sample\":{}}\nnot json\n".as_bytes())
            .expect_err("bad line");
        assert!(matches!(err, SessionError::Parse { line: 2, .. }));
        let err = parse_session("{\"t\":1,\"sample\":{}}\n{\"t\":0,\"sample\":{}}\n".as_bytes())
            .expect_err("backwards");
        assert!(matches!(err, SessionError::NonMonotonic(2)));
    }

    #[test]
    fn cursor_holds_latest_sample() {
        let frames = parse_session(SESSION.as_bytes()).expect("parse");
        let mut cursor = SessionCursor::new(&frames);
        assert!(cursor.sample_at(-0.1).is_none());
        assert_eq!(cursor.sample_at(0.2).map(|s| s.orientation.pitch), Some(-0.5));
        assert_eq!(cursor.sample_at(0.5).map(|s| s.orientation.pitch), Some(0.5));
        assert_eq!(cursor.sample_at(9.0).map(|s| s.orientation.pitch), Some(0.0));
        assert_eq!(cursor.end_time(), Some(1.0));
    }
}
