//! Lenient deserializers for backend fields whose JSON type drifts between
//! deployments (ids sent as `"12"` or `12`, coordinates as `"0"` or `0.0`).

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept an integer id encoded either as a JSON number or a numeric string.
pub fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrText::deserialize(deserializer)? {
        NumOrText::Int(i) => Ok(i),
        NumOrText::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        NumOrText::Float(f) => Err(de::Error::custom(format!("non-integral id {f}"))),
        NumOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id {s:?}"))),
    }
}

/// Optional variant of [`int_or_string`]; `null`, missing and `""` map to `None`.
pub fn opt_int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumOrText::Int(i)) => Ok(Some(i)),
        Some(NumOrText::Float(f)) if f.fract() == 0.0 => Ok(Some(f as i64)),
        Some(NumOrText::Float(f)) => Err(de::Error::custom(format!("non-integral id {f}"))),
        Some(NumOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id {s:?}"))),
    }
}

/// Keep a number-or-string field as text, e.g. latitude `0` -> `"0"`.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumOrText>::deserialize(deserializer)? {
        None => String::new(),
        Some(NumOrText::Int(i)) => i.to_string(),
        Some(NumOrText::Float(f)) => f.to_string(),
        Some(NumOrText::Text(s)) => s,
    })
}

/// `null` or missing text becomes the empty string.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "int_or_string")]
        id: i64,
        #[serde(default, deserialize_with = "opt_int_or_string")]
        parent: Option<i64>,
        #[serde(default, deserialize_with = "text_or_number")]
        lat: String,
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let p: Sample = serde_json::from_str(r#"{"id": "7", "parent": 3, "lat": 0}"#).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.parent, Some(3));
        assert_eq!(p.lat, "0");

        let p: Sample = serde_json::from_str(r#"{"id": 8, "parent": "", "lat": "12.5"}"#).unwrap();
        assert_eq!(p.id, 8);
        assert_eq!(p.parent, None);
        assert_eq!(p.lat, "12.5");
    }

    #[test]
    fn test_garbage_id_is_rejected() {
        let r: Result<Sample, _> = serde_json::from_str(r#"{"id": "abc"}"#);
        assert!(r.is_err());
    }
}
