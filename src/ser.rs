//! Conversion of any `T: Serialize` into a [`Value`].

mod key;

use key::KeySerializer;

use serde::ser;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::*;
use crate::value::{Key, Record, Value};

/// Newtype struct name marking a timestamp, see
/// [`helpers::timestamp`](crate::helpers::timestamp).
pub(crate) const TIMESTAMP_TOKEN: &str = "$serde_urlvalues::private::Timestamp";

/// Converts a value into the dynamic [`Value`] model.
///
/// Structs become records, maps become maps (keys must be scalars),
/// sequences and tuples become sequences and `Option` becomes a reference.
/// Unit enum variants are written as their name; other variants nest
/// their content under the variant name.
///
/// ```
/// use serde::Serialize;
/// use serde_urlvalues::{Record, Value};
///
/// #[derive(Serialize)]
/// struct Query {
///     name: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     email: Option<String>,
///     ids: Vec<u8>,
/// }
///
/// let q = Query { name: "Alice".to_owned(), email: None, ids: vec![1, 2] };
/// assert_eq!(
///     serde_urlvalues::to_value(&q).unwrap(),
///     Value::Record(Record::new().field("name", "Alice").field("ids", vec![1u8, 2])),
/// );
/// ```
pub fn to_value<T: ser::Serialize + ?Sized>(input: &T) -> Result<Value> {
    input.serialize(ValueSerializer)
}

/// A serializer producing a [`Value`].
pub struct ValueSerializer;

macro_rules! serialize_scalar {
    (
        $($ty:ty => $meth:ident,)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Self::Ok> {
                Ok(Value::from(v))
            }
        )*
    };
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SerializeSeq;
    type SerializeTuple = SerializeSeq;
    type SerializeTupleStruct = SerializeSeq;
    type SerializeTupleVariant = SerializeVariant<SerializeSeq>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeVariant<SerializeRecord>;

    serialize_scalar! {
        bool => serialize_bool,
        u8  => serialize_u8,
        u16 => serialize_u16,
        u32 => serialize_u32,
        u64 => serialize_u64,
        i8  => serialize_i8,
        i16 => serialize_i16,
        i32 => serialize_i32,
        i64 => serialize_i64,
        f32 => serialize_f32,
        f64 => serialize_f64,
        char => serialize_char,
        &str => serialize_str,
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok> {
        Ok(Value::seq(value.iter().copied()))
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + ser::Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        let value = value.serialize(self)?;
        if name == TIMESTAMP_TOKEN {
            return timestamp_from_parts(value).map(Value::Time);
        }
        Ok(value)
    }

    fn serialize_newtype_variant<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        let value = value.serialize(self)?;
        Ok(Value::Map(vec![(Key::from(variant), value)]))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Value::Ref(None))
    }

    fn serialize_some<T: ?Sized + ser::Serialize>(self, value: &T) -> Result<Self::Ok> {
        let value = value.serialize(self)?;
        Ok(Value::Ref(Some(Box::new(value))))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeSeq::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SerializeSeq::with_capacity(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SerializeSeq::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeSeq::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(SerializeRecord {
            record: Record::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeRecord {
                record: Record::with_capacity(len),
            },
        })
    }
}

/// Rebuilds a timestamp from the `(seconds, nanoseconds, offset)` tuple
/// written by `helpers::timestamp`.
fn timestamp_from_parts(parts: Value) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::Custom("invalid timestamp".to_owned());
    let Value::Seq(parts) = parts else {
        return Err(invalid());
    };
    let [Value::Int(secs), Value::Uint(nanos), Value::Int(offset)] = parts.as_slice() else {
        return Err(invalid());
    };

    let offset = i32::try_from(*offset)
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(invalid)?;
    let nanos = u32::try_from(*nanos).map_err(|_| invalid())?;
    DateTime::<Utc>::from_timestamp(*secs, nanos)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(invalid)
}

#[doc(hidden)]
pub struct SerializeSeq {
    elements: Vec<Value>,
}

impl SerializeSeq {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ser::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.elements.push(value.serialize(ValueSerializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.elements))
    }
}

impl ser::SerializeTuple for SerializeSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.elements))
    }
}

impl ser::SerializeTupleStruct for SerializeSeq {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Seq(self.elements))
    }
}

#[doc(hidden)]
pub struct SerializeMap {
    entries: Vec<(Key, Value)>,
    next_key: Option<Key>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Custom("serialize_value called before serialize_key".to_owned()))?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.entries))
    }
}

#[doc(hidden)]
pub struct SerializeRecord {
    record: Record,
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.record.push(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Record(self.record))
    }
}

/// Nests the content of a tuple or struct variant under the variant name.
#[doc(hidden)]
pub struct SerializeVariant<S> {
    variant: &'static str,
    inner: S,
}

impl<S> SerializeVariant<S> {
    fn wrap(variant: &'static str, value: Value) -> Value {
        Value::Map(vec![(Key::from(variant), value)])
    }
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeSeq> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Self::wrap(self.variant, Value::Seq(self.inner.elements)))
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeRecord> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Self::wrap(self.variant, Value::Record(self.inner.record)))
    }
}
