//! `serde_json` map keys must serialize to JSON strings, so a `HashMap`
//! keyed by a struct like `MapLocation` (which derives a normal object
//! `Serialize` impl) can't round-trip through `serde_json::to_vec` as-is.
//! This adapter serializes such maps as a plain list of `(key, value)`
//! pairs instead, leaving the in-memory `HashMap` representation untouched.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<K, V, S>(map: &HashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    let pairs: Vec<(&K, &V)> = map.iter().collect();
    pairs.serialize(serializer)
}

pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
    Ok(pairs.into_iter().collect())
}
