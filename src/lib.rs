//! Flatten nested values into URL query parameters
//!
//! `serde_urlvalues` turns maps, structs and already-encoded querystrings
//! into a flat, ordered collection of query parameters ([`UrlValues`]).
//! Nested maps, structs, options and sequences become bracketed key paths:
//!
//! ```text
//! {"int": 1, "map": {"slice": ["100", "200"], "int": 1}}
//!     => int=1&map[int]=1&map[slice]=100&map[slice]=200
//! ```
//!
//! ## Supported Types
//!
//! At the **top level**, only strings, maps and structs are accepted. A
//! string is parsed as an already-encoded querystring and returned as is.
//! Zero values (an empty string or map, a nil reference) have nothing to
//! encode and give `Ok(None)`.
//!
//! After the top level, every shape can be nested.
//!
//! ## Usage
//!
//! Values can be built directly as a [`Value`], which also lets any part
//! of the tree supply its own encoding through [`EncodeValues`]:
//!
//! ```
//! use serde_urlvalues::{Config, Value};
//!
//! let input = Value::map([
//!     ("int", Value::from(1)),
//!     ("map", Value::map([
//!         ("slice", Value::seq(["100", "200"])),
//!         ("int", Value::from(1)),
//!     ])),
//! ]);
//!
//! let values = serde_urlvalues::marshal(&input).unwrap().unwrap();
//! assert_eq!(values.get_all("map[slice]"), ["100", "200"]);
//! assert_eq!(
//!     values.encode(),
//!     "int=1&map%5Bint%5D=1&map%5Bslice%5D=100&map%5Bslice%5D=200",
//! );
//!
//! let values = Config::new().array_brackets(true).marshal(&input).unwrap().unwrap();
//! assert_eq!(values.get_all("map[slice][]"), ["100", "200"]);
//! ```
//!
//! Any `T: Serialize` works too. Struct fields are named and skipped
//! according to their serde attributes:
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//!
//! #[derive(Serialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     #[serde(skip_serializing_if = "Vec::is_empty")]
//!     user_ids: Vec<u8>,
//! }
//!
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme".to_string(),
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: "12345".to_string(),
//!     },
//!     user_ids: vec![1, 2],
//! };
//!
//! assert_eq!(
//!     serde_urlvalues::to_string(&params).unwrap(),
//!     "address%5Bcity%5D=Carrot+City&address%5Bpostcode%5D=12345&id=42&name=Acme&user_ids=1&user_ids=2",
//! );
//! ```

mod config;
mod encoder;
mod error;
pub mod helpers;
mod map;
pub mod record;
mod ser;
mod value;
mod values;

#[doc(inline)]
pub use config::Config;
pub use error::{BoxError, Error, Result};
#[doc(inline)]
pub use ser::{ValueSerializer, to_value};
pub use value::{CustomValue, EncodeValues, Key, Record, Value};
pub use values::UrlValues;

use serde::Serialize;

/// Encodes a [`Value`] into query parameters with the default [`Config`].
///
/// ```
/// use serde_urlvalues::Value;
///
/// // strings are parsed as encoded querystrings
/// let values = serde_urlvalues::marshal(&Value::from("k=v")).unwrap().unwrap();
/// assert_eq!(values.encode(), "k=v");
///
/// // zero values have nothing to encode
/// assert_eq!(serde_urlvalues::marshal(&Value::from("")).unwrap(), None);
///
/// // only strings, maps and structs are accepted at the top level
/// assert!(serde_urlvalues::marshal(&Value::from(10)).is_err());
/// ```
pub fn marshal(value: &Value) -> Result<Option<UrlValues>> {
    Config::default().marshal(value)
}

/// Serializes a value into query parameters with the default [`Config`].
pub fn to_values<T: Serialize + ?Sized>(input: &T) -> Result<Option<UrlValues>> {
    Config::default().serialize_values(input)
}

/// Serializes a value into an encoded querystring with the default
/// [`Config`].
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Query {
///     name: String,
///     age: u8,
///     occupation: String,
/// }
///
/// let q = Query {
///     name: "Alice".to_owned(),
///     age: 24,
///     occupation: "Student".to_owned(),
/// };
///
/// assert_eq!(
///     serde_urlvalues::to_string(&q).unwrap(),
///     "age=24&name=Alice&occupation=Student");
/// ```
pub fn to_string<T: Serialize + ?Sized>(input: &T) -> Result<String> {
    Config::default().serialize_string(input)
}
