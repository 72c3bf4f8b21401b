// Copyright (c) 2025 - Cowboy AI, Inc.
//! Optional-with-default input values
//!
//! [`Setting`] is used at the argument boundary for fields that have a
//! well-known default. Validated configuration types collapse it to a
//! concrete value on construction, so comparison and diffing never see
//! "unset".

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An input value that is either explicitly given or left to its default
///
/// Serialized as the bare value, or `null`/absent when unset.
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::Setting;
///
/// let unset: Setting<String> = Setting::Unset;
/// assert_eq!(unset.materialize(|| "latest".to_string()), "latest");
///
/// let given = Setting::Value("v0.46.6".to_string());
/// assert_eq!(given.materialize(|| "latest".to_string()), "v0.46.6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Setting<T> {
    /// Not supplied; the default applies
    Unset,
    /// Explicitly supplied
    Value(T),
}

impl<T> Setting<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Setting::Value(_))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Setting::Unset)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Setting::Unset => None,
            Setting::Value(v) => Some(v),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Setting::Unset => None,
            Setting::Value(v) => Some(v),
        }
    }

    /// Collapse to a concrete value, computing the default only when unset
    pub fn materialize(self, default: impl FnOnce() -> T) -> T {
        match self {
            Setting::Unset => default(),
            Setting::Value(v) => v,
        }
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Unset
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Setting::Value(v),
            None => Setting::Unset,
        }
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Setting::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        let setting: Setting<String> = Setting::default();
        assert!(setting.is_unset());
        assert_eq!(setting.as_option(), None);
    }

    #[test]
    fn test_materialize_does_not_call_default_when_set() {
        let setting = Setting::Value(7);
        let value = setting.materialize(|| panic!("default must not be computed"));
        assert_eq!(value, 7);
    }

    #[test]
    fn test_null_deserializes_as_unset() {
        let setting: Setting<String> = serde_json::from_str("null").unwrap();
        assert!(setting.is_unset());

        let setting: Setting<String> = serde_json::from_str("\"5.7\"").unwrap();
        assert_eq!(setting, Setting::Value("5.7".to_string()));
    }
}
