use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ProofError;
use crate::events::EventLog;

/// Prefix of the exported artifact's file name.
pub const PROOF_FILE_PREFIX: &str = "battle-proof-";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofMeta {
    pub room: String,
    pub seed: String,
    pub users: Vec<String>,
}

/// The canonical object that gets hashed. Field order is the byte order.
///
/// Parsing is strict: a key the fingerprint would not cover is a shape error,
/// never silently dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofDocument {
    pub meta: ProofMeta,
    pub events: EventLog,
}

impl ProofDocument {
    /// Compact JSON, fixed field order, no whitespace.
    pub fn canonical_json(&self) -> Result<String, ProofError> {
        serde_json::to_string(self).map_err(ProofError::Encode)
    }
}

/// A finished match: the canonical text and its fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Proof {
    pub document: ProofDocument,
    pub canonical: String,
    pub fingerprint: String,
}

impl Proof {
    /// `battle-proof-<fingerprint>.json`
    pub fn file_name(&self) -> String {
        format!("{PROOF_FILE_PREFIX}{}.json", self.fingerprint)
    }
}

/// Lowercase hex SHA-256 of the canonical bytes.
pub fn fingerprint(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the proof for a log. `users` are sorted in plain byte order here,
/// independent of the spawn order.
pub fn finalize(
    room: &str,
    seed_word: &str,
    participants: &[String],
    log: &EventLog,
) -> Result<Proof, ProofError> {
    let mut users = participants.to_vec();
    users.sort();
    let document = ProofDocument {
        meta: ProofMeta {
            room: room.to_string(),
            seed: seed_word.to_string(),
            users,
        },
        events: log.clone(),
    };
    let canonical = document.canonical_json()?;
    let fingerprint = fingerprint(&canonical);
    Ok(Proof {
        document,
        canonical,
        fingerprint,
    })
}

/// Recompute the fingerprint of a serialized proof.
///
/// The text is parsed into the typed document and written back canonically,
/// so insignificant whitespace in the input does not change the result.
/// Comparing against a published fingerprint is up to the caller.
pub fn verify(serialized: &str) -> Result<String, ProofError> {
    let document: ProofDocument = serde_json::from_str(serialized).map_err(ProofError::from_json)?;
    Ok(fingerprint(&document.canonical_json()?))
}

/// [`verify`] for an already-parsed JSON value.
pub fn verify_value(value: serde_json::Value) -> Result<String, ProofError> {
    let document: ProofDocument = serde_json::from_value(value).map_err(ProofError::Shape)?;
    Ok(fingerprint(&document.canonical_json()?))
}

/// Pull the fingerprint out of a `battle-proof-<hex>.json` file name.
pub fn fingerprint_from_file_name(name: &str) -> Option<&str> {
    let hex = name.strip_prefix(PROOF_FILE_PREFIX)?.strip_suffix(".json")?;
    let valid = hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit());
    valid.then_some(hex)
}
