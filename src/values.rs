//! The query parameter collection.

mod decode;
mod encode;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::map::{self, Map};

/// An ordered collection of query parameters.
///
/// Each key maps to an ordered list of values, since a key may legitimately
/// repeat (e.g. `slice=1&slice=2`). Keys are kept sorted, or in insertion
/// order when the `indexmap` feature is enabled.
///
/// ```
/// use serde_urlvalues::UrlValues;
///
/// let mut values = UrlValues::new();
/// values.add("slice", "1");
/// values.add("slice", "2");
/// values.add("name", "Carrot City");
///
/// assert_eq!(values.get("slice"), Some("1"));
/// assert_eq!(values.get_all("slice"), ["1", "2"]);
/// assert_eq!(values.encode(), "name=Carrot+City&slice=1&slice=2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlValues {
    inner: Map<String, Vec<String>>,
}

impl UrlValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an already-encoded querystring.
    ///
    /// Pairs are separated by `&`; empty pairs are skipped. A pair without
    /// `=` is a key with an empty value. Keys and values are
    /// percent-decoded, with `+` read as a space.
    ///
    /// ```
    /// use serde_urlvalues::UrlValues;
    ///
    /// let values = UrlValues::parse("client%5Bcif%5D=0123&tag=a&tag=b&flag").unwrap();
    /// assert_eq!(values.get("client[cif]"), Some("0123"));
    /// assert_eq!(values.get_all("tag"), ["a", "b"]);
    /// assert_eq!(values.get("flag"), Some(""));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut values = UrlValues::new();
        let mut offset = 0;

        for pair in input.split('&') {
            let start = offset;
            offset += pair.len() + 1;

            if pair.is_empty() {
                continue;
            }
            if let Some(idx) = pair.find(';') {
                return Err(Error::parse_err(
                    "invalid semicolon separator in query",
                    start + idx,
                ));
            }

            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value_start = start + key.len() + 1;
            let key = decode::decode(key, start)?;
            let value = decode::decode(value, value_start)?;
            values.add(key, value);
        }

        Ok(values)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        map::remove(&mut self.inner, key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Appends every value of `src` into `self`, nesting each key under
    /// `scope`.
    ///
    /// A key `k` becomes `scope[k]`, or stays `k` when `scope` is empty.
    ///
    /// ```
    /// use serde_urlvalues::UrlValues;
    ///
    /// let mut src = UrlValues::new();
    /// src.add("int", "100");
    /// src.add("slice", "1");
    /// src.add("slice", "2");
    ///
    /// let mut dst = UrlValues::new();
    /// dst.merge_scoped(src, "object");
    /// assert_eq!(dst.get("object[int]"), Some("100"));
    /// assert_eq!(dst.get_all("object[slice]"), ["1", "2"]);
    /// ```
    pub fn merge_scoped(&mut self, src: UrlValues, scope: &str) {
        for (key, values) in src.inner {
            let key = if scope.is_empty() {
                key
            } else {
                format!("{scope}[{key}]")
            };
            self.inner.entry(key).or_default().extend(values);
        }
    }

    /// Encodes the values into `key=value` pairs joined by `&`.
    ///
    /// Pairs are sorted by key; the values of a key keep their insertion
    /// order. Keys and values are percent-encoded with the
    /// `application/x-www-form-urlencoded` set, spaces written as `+`.
    pub fn encode(&self) -> String {
        let mut keys: Vec<&String> = self.inner.keys().collect();
        keys.sort_unstable();

        let mut out = String::with_capacity(self.inner.len() * 16);
        let mut first_kv = true;
        for key in keys {
            for value in self.get_all(key) {
                if first_kv {
                    first_kv = false;
                } else {
                    out.push('&');
                }
                encode::encode_into(&mut out, key);
                out.push('=');
                encode::encode_into(&mut out, value);
            }
        }
        out
    }
}

impl fmt::Display for UrlValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for UrlValues {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UrlValues::parse(s)
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for UrlValues {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = UrlValues::new();
        values.extend(iter);
        values
    }
}

impl IntoIterator for UrlValues {
    type Item = (String, Vec<String>);
    type IntoIter = <Map<String, Vec<String>> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a UrlValues {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = <&'a Map<String, Vec<String>> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
