//! Paging parameters shared by the list endpoints.

use serde::{Deserialize, Deserializer};

/// Reads an optional query value as an integer.
///
/// Missing or unparseable values become `0`, which the page resolver treats
/// as "use the default".
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0))
}
