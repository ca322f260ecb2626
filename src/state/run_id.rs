//! Run ID generation and parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of a run that was started without an explicit task id.
///
/// Format: `run-{yyyymmddHHMMSS}-{12 hex chars}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId {
    timestamp: DateTime<Utc>,
    digest: [u8; 6],
}

impl RunId {
    /// Generate an ID for a run of the named workflow.
    ///
    /// The digest covers the workflow name, the current time, the process
    /// id and a process-wide counter.
    pub fn generate(workflow: &str) -> Self {
        let now = Utc::now();
        let timestamp = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);

        let mut hasher = Sha256::new();
        hasher.update(workflow.as_bytes());
        hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        hasher.update(SEQUENCE.fetch_add(1, Ordering::Relaxed).to_le_bytes());
        let hash = hasher.finalize();

        let mut digest = [0u8; 6];
        digest.copy_from_slice(&hash[..6]);

        Self { timestamp, digest }
    }

    /// Parse a run ID from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix("run-")?;
        let (ts, hex_part) = s.split_once('-')?;

        let naive = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;
        let bytes = hex::decode(hex_part).ok()?;
        if bytes.len() != 6 {
            return None;
        }

        let mut digest = [0u8; 6];
        digest.copy_from_slice(&bytes);

        Some(Self {
            timestamp: naive.and_utc(),
            digest,
        })
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run-{}-{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            hex::encode(self.digest)
        )
    }
}
