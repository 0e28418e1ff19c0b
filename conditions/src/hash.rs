//! Canonical hashing used by duplicate-condition detection (spec §4.6) and
//! the RETE network's rule-set hash (spec §4.2), both of which need a
//! deterministic digest over sorted-key JSON. Mirrors the original's
//! `hashlib.md5(json.dumps(..., sort_keys=True))` in purpose; `sha2` stands
//! in for `md5` since nothing here needs to match the original's bytes.

use crate::model::{canonical_condition, canonical_json};
use crate::model::Condition;
use sha2::{Digest, Sha256};

pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(digest)
}

/// Digest of a single condition tree's canonical form, used to detect two
/// rules with textually-identical conditions regardless of field order.
pub fn hash_condition(condition: &Condition) -> String {
    sha256_hex(canonical_condition(condition).as_bytes())
}

/// Digest of an arbitrary serializable value's canonical JSON form, used by
/// the RETE network to fingerprint the whole active rule set and skip
/// recompilation when nothing changed.
pub fn hash_value(value: &serde_json::Value) -> String {
    sha256_hex(canonical_json(value).as_bytes())
}
