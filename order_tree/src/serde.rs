//! `Serialize` and `Deserialize` for `Literal`
//!
//! A `Literal::Map` is a map whose entry order is preserved in both
//! directions, and a `Literal::Leaf` is whatever `V` serializes as. Because a
//! literal does not know ahead of time which of the two it is, deserialization
//! goes through `deserialize_any`, and so needs a self-describing format such
//! as `ron` or JSON. A `V` that itself deserializes from a map would be read as
//! a `Literal::Map`.
//!
//! ```
//! // Example using the `ron` crate
//! use order_tree::{literal, Literal, OrderTree};
//! use ron::{from_str, to_string};
//!
//! let s = r#"{"b": {"c": 5, "a": 4}, "d": 6}"#;
//! let lit: Literal<String, i32> = from_str(s).unwrap();
//! let tree = OrderTree::from_literal(lit.clone()).unwrap();
//! let order: Vec<Vec<String>> = tree.paths().map(|path| path.to_vec()).collect();
//! assert_eq!(order, vec![
//!     vec!["b".to_owned(), "c".to_owned()],
//!     vec!["b".to_owned(), "a".to_owned()],
//!     vec!["b".to_owned()],
//!     vec!["d".to_owned()],
//! ]);
//!
//! // entry order survives a round trip
//! let lit2: Literal<String, i32> = from_str(&to_string(&lit).unwrap()).unwrap();
//! assert_eq!(lit, lit2);
//! assert_eq!(
//!     literal!({ "x".to_owned() => 1 }),
//!     from_str::<Literal<String, i32>>(r#"{"x": 1}"#).unwrap()
//! );
//! ```

use core::{fmt, marker::PhantomData};

use serde::{
    de::{
        value::{BorrowedStrDeserializer, SeqAccessDeserializer},
        Error, IntoDeserializer, MapAccess, SeqAccess, Visitor,
    },
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::Literal;

impl<K: Serialize, V: Serialize> Serialize for Literal<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Literal::Leaf(v) => v.serialize(serializer),
            Literal::Map(entries) => {
                let mut s = serializer.serialize_map(Some(entries.len()))?;
                for (k, lit) in entries {
                    s.serialize_entry(k, lit)?;
                }
                s.end()
            }
        }
    }
}

struct LiteralVisitor<K, V>(PhantomData<fn() -> (K, V)>);

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> LiteralVisitor<K, V> {
    fn leaf<D, E>(deserializer: D) -> Result<Literal<K, V>, E>
    where
        D: Deserializer<'de, Error = E>,
        E: Error,
    {
        V::deserialize(deserializer).map(Literal::Leaf)
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for LiteralVisitor<K, V> {
    type Value = Literal<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an `order_tree` literal map or leaf value")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<K, Literal<K, V>>()? {
            entries.push(entry);
        }
        Ok(Literal::Map(entries))
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Self::leaf(SeqAccessDeserializer::new(seq))
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_char<E: Error>(self, v: char) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_borrowed_str<E: Error>(self, v: &'de str) -> Result<Self::Value, E> {
        Self::leaf(BorrowedStrDeserializer::new(v))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        Self::leaf(v.into_deserializer())
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Self::leaf(().into_deserializer())
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for Literal<K, V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LiteralVisitor(PhantomData))
    }
}
