//! Init data parsing and canonicalization.
//!
//! The platform signs a check string built from every received field except
//! `hash`, formatted as `key=value`, sorted by key and joined with `\n`.

use std::collections::BTreeMap;

use crate::error::{AuthError, Result};

/// Name of the field that carries the hex signature.
pub const HASH_FIELD: &str = "hash";

/// Decoded init data fields.
///
/// Keys are unique; when a key repeats in the raw string the last occurrence
/// wins. Iteration order is ascending byte order of the keys, which is the
/// order the check string uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    fields: BTreeMap<String, String>,
}

impl InitData {
    /// Decode a raw `application/x-www-form-urlencoded` string.
    ///
    /// Pairs are split on `&`, key and value on the first `=`, `+` decodes to
    /// a space and percent escapes are resolved. Blank values are kept.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect()
    }

    /// Look up a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build the check string over every field except `hash`.
    #[must_use]
    pub fn check_string(&self) -> String {
        self.iter()
            .filter(|(key, _)| *key != HASH_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Encode the fields back into a query string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InitData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::default();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// The canonical form of a received payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    /// All fields except `hash`.
    pub fields: InitData,
    /// The newline-joined, key-sorted `key=value` string that was signed.
    pub check_string: String,
    /// The signature supplied by the sender.
    pub hash: String,
}

/// Decode `raw` and split it into the check string and the supplied hash.
///
/// An empty payload canonicalizes to an empty check string, but since it has
/// no `hash` it still fails with [`AuthError::MissingSignature`].
pub fn canonicalize(raw: &str) -> Result<CanonicalForm> {
    let mut fields = InitData::parse(raw);

    let hash = fields
        .remove(HASH_FIELD)
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingSignature)?;

    let check_string = fields.check_string();

    Ok(CanonicalForm {
        fields,
        check_string,
        hash,
    })
}
