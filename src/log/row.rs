use serde::{Deserialize, Deserializer};

/// First element of one stats array, before unit normalization.
///
/// Example:
/// {"mem_usage": "5.112MB / 7.716GB", "cpu_percent": "6.05%"}
///
/// A missing key is `None`; an explicit `null` (or any non-string) fails.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default, deserialize_with = "present_string")]
    pub mem_usage: Option<String>,

    #[serde(default, deserialize_with = "present_string")]
    pub cpu_percent: Option<String>,
}

/// Only called for keys that are present, so `null` is rejected like any other non-string.
fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}
