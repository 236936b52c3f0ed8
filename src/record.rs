//! Flattens structured records into query parameters.
//!
//! The encoder in [`crate::encoder`] hands every record it meets to
//! [`encode`], then nests the result under the record's own key. The
//! record's field names and omissions are already settled by the time it
//! gets here: for records built with [`to_value`](crate::to_value) they
//! come from the type's serde attributes (`rename`, `skip_serializing_if`,
//! `flatten`, ...).
//!
//! The conventions are fixed and do not read [`Config`](crate::Config):
//!
//! * scalars use their plain `Display` form, so `0` is written as `0` and
//!   `false` as `false`;
//! * timestamps are written as RFC 3339;
//! * sequences repeat the field key once per element;
//! * nested records and maps nest as `field[child]`, with map keys in
//!   their plain `Display` form (a `0` key gives `field[0]`, where the
//!   encoder's own maps write an empty segment);
//! * nil references and `Null` fields are left out;
//! * custom values are handed the field key.

use chrono::SecondsFormat;

use crate::error::Result;
use crate::value::{Record, Value};
use crate::values::UrlValues;

/// Flattens `record` into a fresh collection.
///
/// ```
/// use serde_urlvalues::{Record, Value, record};
///
/// let address = Record::new().field("city", "Carrot City");
/// let user = Record::new()
///     .field("id", 0)
///     .field("tags", Value::seq(["a", "b"]))
///     .field("address", address)
///     .field("email", None::<String>);
///
/// let values = record::encode(&user).unwrap();
/// assert_eq!(values.get("id"), Some("0"));
/// assert_eq!(values.get_all("tags"), ["a", "b"]);
/// assert_eq!(values.get("address[city]"), Some("Carrot City"));
/// assert!(!values.contains_key("email"));
/// ```
pub fn encode(record: &Record) -> Result<UrlValues> {
    let mut values = UrlValues::new();
    encode_fields(&mut values, record, "")?;
    Ok(values)
}

fn encode_fields(values: &mut UrlValues, record: &Record, prefix: &str) -> Result<()> {
    for (name, value) in record.fields() {
        let key = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}[{name}]")
        };
        encode_field(values, value, &key)?;
    }
    Ok(())
}

fn encode_field(values: &mut UrlValues, value: &Value, key: &str) -> Result<()> {
    match value {
        Value::Null | Value::Ref(None) => {}
        Value::Ref(Some(inner)) => encode_field(values, inner, key)?,
        Value::Custom(custom) => custom.encode_values(key, values)?,
        Value::Bool(b) => values.add(key, if *b { "true" } else { "false" }),
        Value::Int(i) => values.add(key, itoa::Buffer::new().format(*i)),
        Value::Uint(u) => values.add(key, itoa::Buffer::new().format(*u)),
        Value::Float(f) => values.add(key, f.to_string()),
        Value::Float32(f) => values.add(key, f.to_string()),
        Value::String(s) => values.add(key, s.as_str()),
        Value::Time(t) => values.add(key, t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Value::Seq(elements) => {
            for element in elements {
                encode_field(values, element, key)?;
            }
        }
        Value::Map(entries) => {
            for (name, value) in entries {
                encode_field(values, value, &format!("{key}[{name}]"))?;
            }
        }
        Value::Record(record) => encode_fields(values, record, key)?,
    }
    Ok(())
}
