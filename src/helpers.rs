//! `serialize_with` helpers for struct fields.
//!
//! Structs are flattened with fixed conventions, so these helpers are how a
//! field opts into another representation.

/// Generic serialize function for different delimiters
///
/// ## Example
///
/// ```
/// use serde::Serialize;
/// use serde_urlvalues::helpers::generic_delimiter::serialize;
///
/// #[derive(Serialize)]
/// struct Query {
///     #[serde(serialize_with = "serialize::<_, _, '.'>")]
///     values: Vec<u8>,
/// }
///
/// # fn main(){
/// let query = Query { values: vec![1, 2, 3] };
/// assert_eq!(serde_urlvalues::to_string(&query).unwrap(), "values=1.2.3");
/// # }
/// ```
pub mod generic_delimiter {
    use serde::Serializer;

    pub fn serialize<S, T, const DELIM: char>(vec: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToString,
    {
        let s = vec
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(&DELIM.to_string());
        serializer.serialize_str(&s)
    }
}

/// Serialize comma-separated values
///
/// Equivalent to `style=form` query parameters in [OpenAPI 3.0](https://swagger.io/docs/specification/v3_0/serialization/#query-parameters)
///
/// ## Example
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Query {
///     #[serde(serialize_with = "serde_urlvalues::helpers::comma_separated::serialize")]
///     values: Vec<u8>,
/// }
///
/// # fn main(){
/// let query = Query { values: vec![1, 2, 3] };
/// assert_eq!(serde_urlvalues::to_string(&query).unwrap(), "values=1%2C2%2C3");
/// # }
/// ```
pub mod comma_separated {
    use serde::Serializer;

    pub fn serialize<S, T>(vec: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToString,
    {
        super::generic_delimiter::serialize::<S, T, ','>(vec, serializer)
    }
}

/// Serialize pipe-delimited values
///
/// Equivalent to `style=pipeDelimited` query parameters in [OpenAPI 3.0](https://swagger.io/docs/specification/v3_0/serialization/#query-parameters)
pub mod pipe_delimited {
    use serde::Serializer;

    pub fn serialize<S, T>(vec: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToString,
    {
        super::generic_delimiter::serialize::<S, T, '|'>(vec, serializer)
    }
}

/// Serialize space-delimited values
///
/// Equivalent to `style=spaceDelimited` query parameters in [OpenAPI 3.0](https://swagger.io/docs/specification/v3_0/serialization/#query-parameters).
///
/// Note that spaces are written as `+` in the encoded querystring.
pub mod space_delimited {
    use serde::Serializer;

    pub fn serialize<S, T>(vec: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToString,
    {
        super::generic_delimiter::serialize::<S, T, ' '>(vec, serializer)
    }
}

/// Serialize semicolon-separated values
pub mod semicolon_separated {
    use serde::Serializer;

    pub fn serialize<S, T>(vec: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToString,
    {
        super::generic_delimiter::serialize::<S, T, ';'>(vec, serializer)
    }
}

/// Marks a chrono `DateTime` as a timestamp.
///
/// Without this helper a `DateTime` serializes as a string. With it the
/// value becomes a [`Value::Time`](crate::Value::Time), so inside a map the
/// time options of [`Config`](crate::Config) apply to it, and inside a
/// struct it is written as RFC 3339 with whole seconds.
///
/// Other serializers see a newtype struct wrapping
/// `(seconds, nanoseconds, utc_offset_seconds)`.
///
/// ## Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use serde::Serialize;
/// use std::collections::BTreeMap;
///
/// #[derive(Serialize)]
/// struct Wrapper(#[serde(serialize_with = "serde_urlvalues::helpers::timestamp::serialize")] DateTime<Utc>);
///
/// let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
/// let mut query = BTreeMap::new();
/// query.insert("since", Wrapper(at));
///
/// let config = serde_urlvalues::Config::new().time_unix(true);
/// assert_eq!(config.serialize_string(&query).unwrap(), "since=1700000000");
/// ```
pub mod timestamp {
    use chrono::{DateTime, Offset, TimeZone};
    use serde::{Serialize, Serializer};

    use crate::ser::TIMESTAMP_TOKEN;

    pub fn serialize<S, Tz>(time: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        Tz: TimeZone,
    {
        let parts = (
            time.timestamp(),
            time.timestamp_subsec_nanos(),
            time.offset().fix().local_minus_utc(),
        );
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &parts)
    }

    struct Marked<'a, Tz: TimeZone>(&'a DateTime<Tz>);

    impl<Tz: TimeZone> Serialize for Marked<'_, Tz> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize(self.0, serializer)
        }
    }

    /// Marks an optional chrono `DateTime` as a timestamp.
    pub mod option {
        use chrono::{DateTime, TimeZone};
        use serde::Serializer;

        pub fn serialize<S, Tz>(time: &Option<DateTime<Tz>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Tz: TimeZone,
        {
            match time {
                Some(time) => serializer.serialize_some(&super::Marked(time)),
                None => serializer.serialize_none(),
            }
        }
    }
}
