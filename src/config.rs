use std::borrow::Cow;

use serde::Serialize;

use crate::error::Result;
use crate::value::Value;
use crate::values::UrlValues;

/// Configuration for encoding values into query parameters.
///
/// The options apply to maps, sequences and scalars reached by the encoder.
/// Structs are flattened by the [`record`](crate::record) encoder, which
/// follows the struct's own field metadata instead.
///
/// ## Arrays
///
/// By default every element of a sequence is added under the parent key,
/// e.g. `slice=1&slice=2`. `array_brackets` appends `[]` to the key
/// (`slice[]=1&slice[]=2`) and a non-empty `array_delimiter` joins the
/// elements into a single value (`slice=1|2`).
///
/// ```
/// use serde_urlvalues::{Config, Value};
///
/// let input = Value::map([("slice", Value::seq([1, 2]))]);
///
/// let values = Config::new().marshal(&input).unwrap().unwrap();
/// assert_eq!(values.encode(), "slice=1&slice=2");
///
/// let values = Config::new().array_brackets(true).marshal(&input).unwrap().unwrap();
/// assert_eq!(values.encode(), "slice%5B%5D=1&slice%5B%5D=2");
///
/// let values = Config::new().array_delimiter("|").marshal(&input).unwrap().unwrap();
/// assert_eq!(values.get("slice"), Some("1|2"));
/// ```
///
/// ## Timestamps
///
/// Timestamps are written as RFC 3339 unless one of the unix options is
/// set. These are checked in the order `time_unix`, `time_unix_milli`,
/// `time_unix_nano`. `time_layout` takes a chrono `strftime` format string.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) array_brackets: bool,
    pub(crate) array_delimiter: Cow<'static, str>,
    pub(crate) int_bool: bool,
    pub(crate) time_unix: bool,
    pub(crate) time_unix_milli: bool,
    pub(crate) time_unix_nano: bool,
    pub(crate) time_layout: Cow<'static, str>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            array_brackets: false,
            array_delimiter: Cow::Borrowed(""),
            int_bool: false,
            time_unix: false,
            time_unix_milli: false,
            time_unix_nano: false,
            time_layout: Cow::Borrowed(""),
        }
    }

    /// Appends `[]` to the key of every sequence element.
    pub const fn array_brackets(mut self, array_brackets: bool) -> Self {
        self.array_brackets = array_brackets;
        self
    }

    /// Joins the elements of a sequence with `delimiter` into a single
    /// value. An empty delimiter disables joining.
    ///
    /// Only elements that encode to a value directly under the sequence's
    /// key take part in the join; nested maps or structs inside a joined
    /// sequence produce nothing.
    pub fn array_delimiter(mut self, delimiter: impl Into<Cow<'static, str>>) -> Self {
        self.array_delimiter = delimiter.into();
        self
    }

    /// Writes booleans as `1` and `0` instead of `true` and `false`.
    pub const fn int_bool(mut self, int_bool: bool) -> Self {
        self.int_bool = int_bool;
        self
    }

    /// Writes timestamps as seconds since the Unix epoch.
    pub const fn time_unix(mut self, time_unix: bool) -> Self {
        self.time_unix = time_unix;
        self
    }

    /// Writes timestamps as milliseconds since the Unix epoch.
    pub const fn time_unix_milli(mut self, time_unix_milli: bool) -> Self {
        self.time_unix_milli = time_unix_milli;
        self
    }

    /// Writes timestamps as nanoseconds since the Unix epoch.
    pub const fn time_unix_nano(mut self, time_unix_nano: bool) -> Self {
        self.time_unix_nano = time_unix_nano;
        self
    }

    /// Formats timestamps with a chrono `strftime` layout, e.g.
    /// `"%d %b %y %H:%M %z"`. An empty layout means RFC 3339.
    pub fn time_layout(mut self, layout: impl Into<Cow<'static, str>>) -> Self {
        self.time_layout = layout.into();
        self
    }

    /// Encodes a [`Value`] into query parameters using this `Config`.
    ///
    /// Only strings, maps and structs are accepted at the top level. A
    /// string is parsed as an already-encoded querystring.
    ///
    /// Returns `Ok(None)` when the value is zero (e.g. an empty string or
    /// map, or a nil reference): there is nothing to encode. `Value::Null`
    /// gives an empty collection instead.
    pub fn marshal(&self, value: &Value) -> Result<Option<UrlValues>> {
        crate::encoder::marshal(self, value)
    }

    /// Serializes any `T: Serialize` into query parameters using this
    /// `Config`. See [`Config::marshal`].
    pub fn serialize_values<T: Serialize + ?Sized>(&self, input: &T) -> Result<Option<UrlValues>> {
        let value = crate::to_value(input)?;
        self.marshal(&value)
    }

    /// Serializes any `T: Serialize` into an encoded querystring using this
    /// `Config`. Nothing to encode gives an empty string.
    pub fn serialize_string<T: Serialize + ?Sized>(&self, input: &T) -> Result<String> {
        let values = self.serialize_values(input)?;
        Ok(values.map(|values| values.encode()).unwrap_or_default())
    }
}
