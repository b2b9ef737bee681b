//! Serde glue for the export conventions the derives cannot express alone.
//!
//! Sections such as `pass` or `location` count as absent whenever they are
//! falsy (`null`, `false`, `0`, `""`, `[]` or `{}`), and some leaves treat
//! `null` the same as a missing key. Both are field-level
//! `deserialize_with` helpers. [`decode_event`] runs the derive and maps
//! serde's errors onto [`IngestError`] with a dotted field path.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::error::{IngestError, Result};

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// `deserialize_with` for keys that are only meaningful when truthy.
///
/// Pair it with `#[serde(default)]` so a missing key is also `None`.
pub fn truthy<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_any(TruthyVisitor(PhantomData))
}

/// `deserialize_with` for leaves where `null` means the zero value.
pub fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

struct TruthyVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for TruthyVisitor<T> {
    type Value = Option<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an optional section")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        if !v {
            return Ok(None);
        }
        T::deserialize(<bool as IntoDeserializer<'de, E>>::into_deserializer(v)).map(Some)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        if v == 0 {
            return Ok(None);
        }
        T::deserialize(<i64 as IntoDeserializer<'de, E>>::into_deserializer(v)).map(Some)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        if v == 0 {
            return Ok(None);
        }
        T::deserialize(<u64 as IntoDeserializer<'de, E>>::into_deserializer(v)).map(Some)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        if v == 0.0 {
            return Ok(None);
        }
        T::deserialize(<f64 as IntoDeserializer<'de, E>>::into_deserializer(v)).map(Some)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        if v.is_empty() {
            return Ok(None);
        }
        T::deserialize(<&str as IntoDeserializer<'de, E>>::into_deserializer(v)).map(Some)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> std::result::Result<Self::Value, A::Error> {
        if seq.size_hint() == Some(0) {
            return Ok(None);
        }
        T::deserialize(SeqAccessDeserializer::new(seq)).map(Some)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        // Emptiness is only known after reading the first key, which is then
        // handed back to the section's own deserializer.
        match map.next_key::<String>()? {
            None => Ok(None),
            Some(first) => T::deserialize(MapAccessDeserializer::new(Replay {
                first: Some(first),
                map,
            }))
            .map(Some),
        }
    }
}

/// A map whose first key was already consumed.
struct Replay<A> {
    first: Option<String>,
    map: A,
}

impl<'de, A: MapAccess<'de>> MapAccess<'de> for Replay<A> {
    type Error = A::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> std::result::Result<Option<K::Value>, A::Error> {
        match self.first.take() {
            Some(key) => seed
                .deserialize(<String as IntoDeserializer<'de, A::Error>>::into_deserializer(key))
                .map(Some),
            None => self.map.next_key_seed(seed),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> std::result::Result<V::Value, A::Error> {
        self.map.next_value_seed(seed)
    }

    fn size_hint(&self) -> Option<usize> {
        self.map
            .size_hint()
            .map(|rest| rest + usize::from(self.first.is_some()))
    }
}

/// Deserializes one element of the `events` array.
///
/// The event's own `id` is read leniently first so any error can name it.
pub fn decode_event<T: DeserializeOwned>(value: &Value) -> Result<T> {
    if !value.is_object() {
        return Err(IngestError::decode(format!(
            "event must be a JSON object, found {}",
            kind(value)
        )));
    }
    let event_id = value.get("id").and_then(Value::as_u64);

    serde_path_to_error::deserialize(value).map_err(|err| classify(&err, event_id))
}

fn classify(err: &serde_path_to_error::Error<serde_json::Error>, event_id: Option<u64>) -> IngestError {
    let path = dotted(err.path());
    let message = err.inner().to_string();

    if let Some(name) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        let field = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}.{name}")
        };
        return IngestError::MissingField { field, event_id };
    }

    let expected = message
        .rsplit_once(", expected ")
        .map_or_else(|| message.clone(), |(_, expected)| expected.to_string());
    IngestError::TypeMismatch {
        field: if path.is_empty() { "event".to_string() } else { path },
        expected,
        event_id,
    }
}

/// Renders a serde path as `pass.endLocation.x` or `type.secondary[1]`.
fn dotted(path: &serde_path_to_error::Path) -> String {
    let mut out = String::new();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => out.push_str(&format!("[{index}]")),
            Segment::Map { key } => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            _ => {}
        }
    }
    out
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        id: u64,
        #[serde(default)]
        minute: u32,
        #[serde(default, deserialize_with = "truthy")]
        related_event_id: Option<u64>,
        #[serde(default, deserialize_with = "truthy")]
        location: Option<Point>,
        #[serde(default, deserialize_with = "nullable")]
        label: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn decode(value: &Value) -> Result<Sample> {
        decode_event(value)
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_falsy_sections_become_none() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            let sample = decode(&json!({"id": 1, "location": falsy, "relatedEventId": 0})).unwrap();
            assert_eq!(sample.location, None, "location {falsy} should be absent");
            assert_eq!(sample.related_event_id, None);
        }

        let sample = decode(&json!({"id": 1, "location": {"x": 3, "y": 4}, "relatedEventId": 9})).unwrap();
        assert_eq!(sample.location, Some(Point { x: 3, y: 4 }));
        assert_eq!(sample.related_event_id, Some(9));
    }

    #[test]
    fn test_truthy_non_object_section_is_mismatch() {
        let err = decode(&json!({"id": 4, "location": true})).unwrap_err();
        assert!(matches!(
            err,
            IngestError::TypeMismatch { ref field, event_id: Some(4), .. } if field == "location"
        ));
    }

    #[test]
    fn test_null_leaf_takes_default() {
        let sample = decode(&json!({"id": 1, "label": null})).unwrap();
        assert_eq!(sample.label, "");
        let sample = decode(&json!({"id": 1})).unwrap();
        assert_eq!(sample.label, "");
    }

    #[test]
    fn test_non_object_event_is_decode_error() {
        let err = decode(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_errors_carry_nested_paths_and_event_id() {
        match decode(&json!({"id": 9, "location": {"x": "far", "y": 1}})).unwrap_err() {
            IngestError::TypeMismatch { field, expected, event_id } => {
                assert_eq!(field, "location.x");
                assert_eq!(expected, "i32");
                assert_eq!(event_id, Some(9));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match decode(&json!({"id": 9, "location": {"x": 1}})).unwrap_err() {
            IngestError::MissingField { field, .. } => assert_eq!(field, "location.y"),
            other => panic!("unexpected error: {other:?}"),
        }

        match decode(&json!({"id": 9, "tags": ["a", 2]})).unwrap_err() {
            IngestError::TypeMismatch { field, .. } => assert_eq!(field, "tags[1]"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_top_level_key_is_named_bare() {
        match decode(&json!({"minute": 3})).unwrap_err() {
            IngestError::MissingField { field, event_id } => {
                assert_eq!(field, "id");
                assert_eq!(event_id, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_integers_respect_field_width(minute in any::<i64>()) {
            let result = decode(&json!({"id": 1, "minute": minute}));
            if u32::try_from(minute).is_ok() {
                prop_assert_eq!(i64::from(result.unwrap().minute), minute);
            } else {
                let is_mismatch = matches!(
                    result,
                    Err(IngestError::TypeMismatch { ref field, .. }) if field == "minute"
                );
                prop_assert!(is_mismatch);
            }
        }
    }
}
