//! The recursive encoder.
//!
//! [`Encoder::encode_value`] walks a [`Value`] and writes every scalar it
//! reaches into a shared [`UrlValues`], under a key built from the path
//! taken so far (the *scope*). Descending into the map key `k` under scope
//! `s` gives `s[k]`, or just `k` at the top level. Sequence elements share
//! the scope of the sequence, with `[]` appended in bracket mode.
//!
//! Shapes are handled in a fixed priority order: custom encoders first,
//! then maps, sequences, records (timestamps included), references and
//! finally scalars.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record;
use crate::value::{self, Key, Record, Value};
use crate::values::UrlValues;

pub(crate) fn marshal(config: &Config, value: &Value) -> Result<Option<UrlValues>> {
    if matches!(value, Value::Null) {
        return Ok(Some(UrlValues::new()));
    }

    let value = value.indirect();
    if value.is_zero() {
        debug!(kind = value.kind(), "zero value, nothing to encode");
        return Ok(None);
    }

    match value {
        Value::String(query) => {
            debug!("parsing string input as an encoded querystring");
            UrlValues::parse(query).map(Some)
        }
        Value::Map(_) | Value::Record(_) | Value::Time(_) | Value::Custom(_) => {
            let mut values = UrlValues::new();
            Encoder::new(config).encode_value(&mut values, value, "")?;
            debug!(keys = values.len(), "encoded values");
            Ok(Some(values))
        }
        other => Err(Error::TypeMismatch {
            found: other.kind(),
        }),
    }
}

/// Appends `key` to `scope` as a nested path segment.
fn child_scope(scope: &str, key: &str) -> String {
    if scope.is_empty() {
        key.to_owned()
    } else {
        format!("{scope}[{key}]")
    }
}

pub(crate) struct Encoder<'c> {
    config: &'c Config,
}

impl<'c> Encoder<'c> {
    pub(crate) fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Encodes `value` at `scope` into `out`.
    pub(crate) fn encode_value(&self, out: &mut UrlValues, value: &Value, scope: &str) -> Result<()> {
        trace!(scope, kind = value.kind(), "encoding value");

        match value {
            Value::Custom(custom) => custom.encode_values(scope, out),
            Value::Map(entries) => self.encode_map(out, entries, scope),
            Value::Seq(elements) => self.encode_seq(out, elements, scope),
            Value::Time(time) => {
                // a bare timestamp has no key to attach to
                if !scope.is_empty() {
                    out.add(scope, self.encode_time(time)?);
                }
                Ok(())
            }
            Value::Record(record) => self.encode_record(out, record, scope),
            Value::Ref(None) => Ok(()),
            Value::Ref(Some(inner)) => self.encode_value(out, inner, scope),
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Uint(_)
            | Value::Float(_)
            | Value::Float32(_)
            | Value::String(_) => {
                self.encode_scalar(out, value, scope);
                Ok(())
            }
        }
    }

    fn encode_map(&self, out: &mut UrlValues, entries: &[(Key, Value)], scope: &str) -> Result<()> {
        for (key, value) in value::string_keyed_view(entries) {
            self.encode_value(out, value, &child_scope(scope, &key))?;
        }
        Ok(())
    }

    fn encode_seq(&self, out: &mut UrlValues, elements: &[Value], scope: &str) -> Result<()> {
        let scope = if self.config.array_brackets {
            format!("{scope}[]")
        } else {
            scope.to_owned()
        };

        if self.config.array_delimiter.is_empty() {
            for element in elements {
                self.encode_value(out, element, &scope)?;
            }
            return Ok(());
        }

        // only values landing exactly on `scope` take part in the join,
        // anything nested deeper is dropped
        let mut joined = UrlValues::new();
        for element in elements {
            self.encode_value(&mut joined, element, &scope)?;
        }
        if let Some(parts) = joined.remove(&scope) {
            out.add(scope, parts.join(self.config.array_delimiter.as_ref()));
        }
        Ok(())
    }

    fn encode_record(&self, out: &mut UrlValues, record: &Record, scope: &str) -> Result<()> {
        let fields = record::encode(record).map_err(|source| Error::Record {
            key: scope.to_owned(),
            source: Box::new(source),
        })?;
        out.merge_scoped(fields, scope);
        Ok(())
    }

    fn encode_scalar(&self, out: &mut UrlValues, value: &Value, scope: &str) {
        // a bare scalar has no key to attach to
        if scope.is_empty() {
            return;
        }
        let encoded = match value {
            Value::Bool(b) => self.encode_bool(*b),
            other => other.render(),
        };
        out.add(scope, encoded);
    }

    fn encode_bool(&self, b: bool) -> String {
        let s = match (self.config.int_bool, b) {
            (true, true) => "1",
            (true, false) => "0",
            (false, true) => "true",
            (false, false) => "false",
        };
        s.to_owned()
    }

    fn encode_time(&self, time: &DateTime<FixedOffset>) -> Result<String> {
        let config = self.config;
        if config.time_unix {
            return Ok(itoa::Buffer::new().format(time.timestamp()).to_owned());
        }
        if config.time_unix_milli {
            return Ok(itoa::Buffer::new().format(time.timestamp_millis()).to_owned());
        }
        if config.time_unix_nano {
            let nanos = time
                .timestamp_nanos_opt()
                .ok_or_else(|| Error::TimeOutOfRange(time.to_rfc3339()))?;
            return Ok(itoa::Buffer::new().format(nanos).to_owned());
        }
        if config.time_layout.is_empty() {
            return Ok(time.to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        let mut formatted = String::new();
        write!(formatted, "{}", time.format(&config.time_layout))
            .map_err(|_| Error::InvalidTimeLayout(config.time_layout.to_string()))?;
        Ok(formatted)
    }
}
