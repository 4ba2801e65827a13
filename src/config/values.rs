//! Lenient scalar parsing shared by the typed config and the raw accessors
//!
//! Hand-edited files often quote numbers or spell booleans as yes/no. Both
//! views of the file accept the same spellings.
use serde::de::{Deserializer, Error};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// true/false, yes/no, on/off, 1/0 (case-insensitive, surrounding blanks ignored)
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Native booleans, integers (non-zero is true) and [`parse_bool`] strings
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => Ok(b),
        Scalar::Int(i) => Ok(i != 0),
        Scalar::Text(s) => {
            parse_bool(&s).ok_or_else(|| D::Error::custom(format!("invalid boolean '{}'", s)))
        }
    }
}

/// Native integers and numeric strings, range-checked for the target type
pub fn flexible_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + FromStr,
    <T as TryFrom<i64>>::Error: Display,
    <T as FromStr>::Err: Display,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(i) => T::try_from(i).map_err(|e| D::Error::custom(format!("{}: {}", i, e))),
        Scalar::Text(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| D::Error::custom(format!("invalid number '{}': {}", s, e))),
        Scalar::Bool(b) => Err(D::Error::custom(format!("expected a number, got {}", b))),
    }
}
