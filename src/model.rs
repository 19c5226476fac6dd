//! Dictionary value objects.
//!
//! `Translation` is the headword record shown in the suggestion list and `Article` is the
//! raw annotated definition body for one word. Both are immutable once fetched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Headword record returned by prefix queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// The headword, unique within a result set
    pub word: String,
    /// Source dictionary identifier, usually a language-pair code such as `crh-ru`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dict: String,
    /// Number of leading characters of `word` substituted for the `~` shortening marker
    #[serde(
        default,
        rename = "shorteningPos",
        alias = "shortening_pos",
        deserialize_with = "lenient_position"
    )]
    pub shortening_pos: Option<u32>,
}

impl Translation {
    pub fn new(word: impl Into<String>, dict: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            dict: dict.into(),
            shortening_pos: None,
        }
    }

    pub fn with_shortening(mut self, pos: u32) -> Self {
        self.shortening_pos = Some(pos);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Positions that are null, negative, fractional or out of range mean "no shortening".
fn lenient_position<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let position = value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());
    if let (Some(raw), None) = (&value, position) {
        if !raw.is_null() {
            log::debug!("ignoring unusable shorteningPos {}", raw);
        }
    }
    Ok(position)
}

/// Raw definition body for a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub word: String,
    pub text: String,
}

impl Article {
    pub fn new(word: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_reads_camel_case_shortening() {
        let t: Translation =
            serde_json::from_str(r#"{"word":"kitap","dict":"crh-ru","shorteningPos":3}"#).unwrap();
        assert_eq!(t, Translation::new("kitap", "crh-ru").with_shortening(3));
    }

    #[test]
    fn missing_metadata_defaults_to_none() {
        let t: Translation = serde_json::from_str(r#"{"word":"bala"}"#).unwrap();
        assert_eq!(t.dict, "");
        assert_eq!(t.shortening_pos, None);
    }

    #[test]
    fn null_dict_reads_as_empty() {
        let t: Translation = serde_json::from_str(r#"{"word":"bala","dict":null}"#).unwrap();
        assert_eq!(t, Translation::new("bala", ""));
    }

    #[test]
    fn unusable_shortening_is_dropped() {
        for raw in ["-1", "null", "\"x\"", "1.5", "4294967296"] {
            let json = format!(r#"{{"word":"bala","dict":"crh-ru","shorteningPos":{raw}}}"#);
            let t: Translation = serde_json::from_str(&json).unwrap();
            assert_eq!(t.shortening_pos, None, "shorteningPos {raw}");
        }
    }
}
