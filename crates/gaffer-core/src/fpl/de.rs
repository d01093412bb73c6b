// Lenient numeric deserialization.
//
// The public API encodes most decimals as strings ("expected_goals": "1.23")
// while offline snapshots written by other tools often use plain numbers.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

/// Accept `1.5`, `"1.5"`, `""` or `null`. Blank and null decode as 0.0.
pub fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumOrStr>::deserialize(deserializer)? {
        Some(NumOrStr::Num(n)) => Ok(n),
        Some(NumOrStr::Str(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(0.0)
            } else {
                trimmed.parse::<f64>().map_err(serde::de::Error::custom)
            }
        }
        None => Ok(0.0),
    }
}
