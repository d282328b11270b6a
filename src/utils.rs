use mongodb::bson::oid::ObjectId;
use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub fn serialize_object_id<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(id) => serializer.serialize_str(&id.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// Parses a path id, treating anything that is not an ObjectId as an unknown record.
pub fn parse_object_id(id_str: &str, entity: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id_str).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

/// Form inputs post numbers as strings; accept both shapes.
pub fn number_from_any<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{}' is not a number", s))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// Accepts either a JSON value or a string holding JSON-encoded text of it.
pub fn json_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => serde_json::from_str::<Value>(&s).map_err(D::Error::custom)?,
        Some(v) => v,
    };
    serde_json::from_value(value).map(Some).map_err(D::Error::custom)
}

pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Reads `null` like a missing field. Catalog documents are not written by this service.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(default, deserialize_with = "number_from_any")]
        price: Option<f64>,
    }

    #[derive(Deserialize)]
    struct Listed {
        #[serde(default, deserialize_with = "json_or_string")]
        items: Option<Vec<u32>>,
    }

    #[test]
    fn numbers_accept_strings_and_numbers() {
        let a: Priced = serde_json::from_str(r#"{"price": 150}"#).unwrap();
        let b: Priced = serde_json::from_str(r#"{"price": " 250.5 "}"#).unwrap();
        let c: Priced = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(a.price, Some(150.0));
        assert_eq!(b.price, Some(250.5));
        assert_eq!(c.price, None);
        assert!(serde_json::from_str::<Priced>(r#"{"price": "cheap"}"#).is_err());
    }

    #[test]
    fn json_strings_are_decoded() {
        let a: Listed = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        let b: Listed = serde_json::from_str(r#"{"items": "[3]"}"#).unwrap();
        assert_eq!(a.items, Some(vec![1, 2]));
        assert_eq!(b.items, Some(vec![3]));
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(
            parse_object_id("nope", "Snack"),
            Err(AppError::NotFound(_))
        ));
    }
}
