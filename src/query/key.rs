use std::fmt;

use serde::Serialize;

use super::endpoint::{Endpoint, QueryError};

/// Identity of a cache entry: endpoint name plus serialized argument.
///
/// Arguments are serialized to canonical JSON, so two arguments that are
/// equal by value produce the same key and different values produce
/// different keys. An argument JSON cannot represent has no key at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for an endpoint/argument pair.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Key`] when the argument cannot be serialized.
    pub fn of<E: Endpoint>(arg: &E::Arg) -> Result<Self, QueryError> {
        Self::new(E::NAME, arg)
    }

    /// # Errors
    ///
    /// Returns [`QueryError::Key`] when the argument cannot be serialized,
    /// such as a map with non-string keys.
    pub fn new<A: Serialize + ?Sized>(endpoint: &str, arg: &A) -> Result<Self, QueryError> {
        let serialized = serde_json::to_string(arg)
            .map_err(|e| QueryError::Key(format!("{endpoint}: {e}")))?;
        Ok(Self(format!("{endpoint}({serialized})")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeMap;

    use super::*;
    use proptest::prelude::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Range {
        from: u32,
        to: u32,
    }

    #[test]
    fn test_key_format() {
        assert_eq!(CacheKey::new("map", "abc").unwrap().as_str(), "map(\"abc\")");
        assert_eq!(CacheKey::new("playlist", &()).unwrap().as_str(), "playlist(null)");
    }

    #[test]
    fn test_equal_arguments_share_key() {
        let a = CacheKey::new("range", &Range { from: 1, to: 2 }).unwrap();
        let b = CacheKey::new("range", &Range { from: 1, to: 2 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_endpoint_is_part_of_key() {
        assert_ne!(CacheKey::new("map", "x").unwrap(), CacheKey::new("track", "x").unwrap());
    }

    #[test]
    fn test_string_and_number_arguments_differ() {
        assert_ne!(CacheKey::new("map", "1").unwrap(), CacheKey::new("map", &1).unwrap());
    }

    #[test]
    fn test_unserializable_argument_has_no_key() {
        let a = BTreeMap::from([((1, 2), 3)]);
        let b = BTreeMap::from([((4, 5), 6)]);

        let error = CacheKey::new("grid", &a).unwrap_err();
        assert!(matches!(error, QueryError::Key(_)));
        assert!(CacheKey::new("grid", &b).is_err());
    }

    proptest! {
        #[test]
        fn distinct_strings_give_distinct_keys(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(CacheKey::new("map", &a).unwrap(), CacheKey::new("map", &b).unwrap());
        }

        #[test]
        fn distinct_ranges_give_distinct_keys(a in (0u32..50, 0u32..50), b in (0u32..50, 0u32..50)) {
            prop_assume!(a != b);
            let ka = CacheKey::new("range", &Range { from: a.0, to: a.1 }).unwrap();
            let kb = CacheKey::new("range", &Range { from: b.0, to: b.1 }).unwrap();
            prop_assert_ne!(ka, kb);
        }
    }
}
