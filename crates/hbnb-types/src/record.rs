use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::TypeError;
use crate::id::RecordId;
use crate::kind::Kind;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Key holding the kind name in a record's flattened form.
pub const CLASS_KEY: &str = "__class__";

/// Field names that belong to the record itself and cannot be assigned.
pub const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at", CLASS_KEY];

// ---------------------------------------------------------------------------
// StoreKey
// ---------------------------------------------------------------------------

/// Composite `(kind, id)` key, rendered as `"{kind}.{id}"`.
///
/// Records of different kinds may share an id without colliding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey {
    pub kind: Kind,
    pub id: RecordId,
}

impl StoreKey {
    pub fn new(kind: Kind, id: impl Into<RecordId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

impl FromStr for StoreKey {
    type Err = TypeError;

    /// Splits at the first `.`; kind names never contain one, ids may.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('.')
            .filter(|(_, id)| !id.is_empty())
            .ok_or_else(|| TypeError::InvalidKey(s.to_string()))?;
        Ok(Self::new(kind.parse()?, id))
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A typed record.
///
/// Every record carries all fields its [`Kind`] declares, holding either the
/// type default or an assigned value. Fields assigned outside the schema are
/// kept after the declared ones, in assignment order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    kind: Kind,
    id: RecordId,
    created_at: Timestamp,
    updated_at: Timestamp,
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create a fresh record: new id, both timestamps set to now, every
    /// declared field at its default.
    pub fn new(kind: Kind) -> Self {
        let now = Timestamp::now();
        Self {
            kind,
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            fields: Self::default_fields(kind),
        }
    }

    /// Rebuild a record from its flattened form.
    ///
    /// `__class__`, `id`, `created_at` and `updated_at` are required and are
    /// taken verbatim. Declared fields missing from `flat` get their default.
    pub fn from_flat(flat: &serde_json::Map<String, serde_json::Value>) -> Result<Self, TypeError> {
        let kind: Kind = required_str(flat, CLASS_KEY)?.parse()?;
        let id = required_str(flat, "id")?;
        if id.is_empty() {
            return Err(TypeError::MalformedRecord("empty \"id\"".into()));
        }
        let created_at = Timestamp::parse(required_str(flat, "created_at")?)?;
        let updated_at = Timestamp::parse(required_str(flat, "updated_at")?)?;
        if updated_at < created_at {
            return Err(TypeError::MalformedRecord(format!(
                "updated_at {updated_at} precedes created_at {created_at}"
            )));
        }

        let mut fields = Self::default_fields(kind);
        for (name, json) in flat {
            if RESERVED_FIELDS.contains(&name.as_str()) {
                continue;
            }
            let value = Value::from_json(json).map_err(|e| match e {
                TypeError::MalformedRecord(reason) => {
                    TypeError::MalformedRecord(format!("field {name:?}: {reason}"))
                }
                other => other,
            })?;
            fields.insert(name.clone(), value);
        }

        Ok(Self {
            kind,
            id: RecordId::from(id),
            created_at,
            updated_at,
            fields,
        })
    }

    fn default_fields(kind: Kind) -> IndexMap<String, Value> {
        kind.fields()
            .iter()
            .map(|spec| (spec.name.to_string(), spec.ty.default_value()))
            .collect()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// The record's store key.
    pub fn key(&self) -> StoreKey {
        StoreKey::new(self.kind, self.id.clone())
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// All non-identity fields, declared ones first.
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Assign a field. Reserved names are rejected.
    ///
    /// This does not touch `updated_at`; callers pair it with [`touch`].
    ///
    /// [`touch`]: Record::touch
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), TypeError> {
        if RESERVED_FIELDS.contains(&name) {
            return Err(TypeError::ReservedField(name.to_string()));
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    /// Refresh `updated_at` to a time strictly after its current value.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::after(&self.updated_at);
    }
}

fn required_str<'a>(
    flat: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<&'a str, TypeError> {
    match flat.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(other) => Err(TypeError::MalformedRecord(format!(
            "{key:?} must be a string, got {other}"
        ))),
        None => Err(TypeError::MalformedRecord(format!("missing {key:?}"))),
    }
}

/// Flattened form: `id`, timestamps, every field, then `__class__`.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("created_at", &self.created_at)?;
        map.serialize_entry("updated_at", &self.updated_at)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(CLASS_KEY, &self.kind)?;
        map.end()
    }
}

/// Canonical string form: `[Kind] (id) {id: '..', created_at: '..', ...}`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{id: {}, created_at: '{}', updated_at: '{}'",
            self.kind,
            self.id,
            Value::Str(self.id.to_string()),
            self.created_at,
            self.updated_at
        )?;
        for (name, value) in &self.fields {
            write!(f, ", {name}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn flat(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn new_record_has_every_declared_field() {
        for kind in Kind::ALL {
            let record = Record::new(kind);
            assert_eq!(record.fields().len(), kind.fields().len());
            for spec in kind.fields() {
                assert_eq!(record.get(spec.name), Some(&spec.ty.default_value()));
            }
        }
    }

    #[test]
    fn new_record_timestamps_are_equal() {
        let record = Record::new(Kind::User);
        assert_eq!(record.created_at(), record.updated_at());
    }

    #[test]
    fn new_records_get_distinct_ids() {
        assert_ne!(Record::new(Kind::City).id(), Record::new(Kind::City).id());
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    #[test]
    fn touch_strictly_advances_updated_at() {
        let mut record = Record::new(Kind::State);
        let before = record.updated_at();
        record.touch();
        assert!(record.updated_at() > before);
        assert!(record.updated_at() >= record.created_at());
    }

    #[test]
    fn set_declared_and_extra_fields() {
        let mut record = Record::new(Kind::User);
        record.set("email", Value::from("a@b.com")).unwrap();
        record.set("age", Value::Int(21)).unwrap();
        assert_eq!(record.get("email"), Some(&Value::from("a@b.com")));
        let names: Vec<_> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["email", "password", "first_name", "last_name", "age"]);
    }

    #[test]
    fn set_rejects_reserved_fields() {
        let mut record = Record::new(Kind::User);
        for name in RESERVED_FIELDS {
            assert_eq!(
                record.set(name, Value::from("x")),
                Err(TypeError::ReservedField(name.to_string()))
            );
        }
    }

    // -----------------------------------------------------------------------
    // Flattened form
    // -----------------------------------------------------------------------

    #[test]
    fn flattened_form_roundtrips() {
        let mut record = Record::new(Kind::Place);
        record.set("latitude", Value::Float(37.77)).unwrap();
        record
            .set("amenity_ids", Value::List(vec![Value::from("a1")]))
            .unwrap();
        record.set("extra", Value::Int(7)).unwrap();
        record.touch();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json[CLASS_KEY], "Place");
        let rebuilt = Record::from_flat(json.as_object().unwrap()).unwrap();
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn from_flat_fills_missing_declared_fields() {
        let record = Record::from_flat(&flat(json!({
            "__class__": "City",
            "id": "c-1",
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
            "name": "Paris",
        })))
        .unwrap();
        assert_eq!(record.get("name"), Some(&Value::from("Paris")));
        assert_eq!(record.get("state_id"), Some(&Value::from("")));
        let names: Vec<_> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(names, ["state_id", "name"]);
    }

    #[test]
    fn from_flat_requires_class() {
        let err = Record::from_flat(&flat(json!({
            "id": "x",
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap_err();
        assert!(matches!(err, TypeError::MalformedRecord(_)));
    }

    #[test]
    fn from_flat_rejects_unknown_class() {
        let err = Record::from_flat(&flat(json!({
            "__class__": "Spaceship",
            "id": "x",
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap_err();
        assert_eq!(err, TypeError::UnknownKind("Spaceship".into()));
    }

    #[test]
    fn from_flat_requires_timestamps() {
        let err = Record::from_flat(&flat(json!({
            "__class__": "User",
            "id": "x",
            "created_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap_err();
        assert_eq!(err, TypeError::MalformedRecord("missing \"updated_at\"".into()));
    }

    #[test]
    fn from_flat_rejects_bad_timestamp() {
        let err = Record::from_flat(&flat(json!({
            "__class__": "User",
            "id": "x",
            "created_at": "2020-01-01",
            "updated_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap_err();
        assert_eq!(err, TypeError::InvalidTimestamp("2020-01-01".into()));
    }

    #[test]
    fn from_flat_rejects_time_travel() {
        let err = Record::from_flat(&flat(json!({
            "__class__": "User",
            "id": "x",
            "created_at": "2020-01-02T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap_err();
        assert!(matches!(err, TypeError::MalformedRecord(_)));
    }

    #[test]
    fn from_flat_rejects_null_field() {
        let err = Record::from_flat(&flat(json!({
            "__class__": "User",
            "id": "x",
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
            "email": null,
        })))
        .unwrap_err();
        match err {
            TypeError::MalformedRecord(reason) => assert!(reason.contains("email")),
            other => panic!("unexpected error: {other}"),
        }
    }

    // -----------------------------------------------------------------------
    // Display / keys
    // -----------------------------------------------------------------------

    #[test]
    fn display_canonical_form() {
        let mut record = Record::from_flat(&flat(json!({
            "__class__": "User",
            "id": "u-1",
            "created_at": "2020-01-01T00:00:00.000000",
            "updated_at": "2020-01-01T00:00:00.000000",
        })))
        .unwrap();
        record.set("age", Value::Int(3)).unwrap();
        assert_eq!(
            record.to_string(),
            "[User] (u-1) {id: 'u-1', created_at: '2020-01-01T00:00:00.000000', \
             updated_at: '2020-01-01T00:00:00.000000', email: '', password: '', \
             first_name: '', last_name: '', age: 3}"
        );
    }

    #[test]
    fn store_key_display_and_parse() {
        let key = StoreKey::new(Kind::Review, "r.1");
        assert_eq!(key.to_string(), "Review.r.1");
        assert_eq!("Review.r.1".parse::<StoreKey>().unwrap(), key);
    }

    #[test]
    fn store_key_parse_errors() {
        assert_eq!(
            "Review".parse::<StoreKey>(),
            Err(TypeError::InvalidKey("Review".into()))
        );
        assert_eq!(
            "Review.".parse::<StoreKey>(),
            Err(TypeError::InvalidKey("Review.".into()))
        );
        assert_eq!(
            "Nope.1".parse::<StoreKey>(),
            Err(TypeError::UnknownKind("Nope".into()))
        );
    }

    #[test]
    fn same_id_different_kinds_are_distinct_keys() {
        assert_ne!(StoreKey::new(Kind::User, "1"), StoreKey::new(Kind::City, "1"));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<String>().prop_map(Value::Str),
            any::<i64>().prop_map(Value::Int),
            any::<f64>().prop_filter("finite", |x| x.is_finite()).prop_map(Value::Float),
        ]
    }

    fn field_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            3 => scalar(),
            1 => prop::collection::vec(scalar(), 0..4).prop_map(Value::List),
        ]
    }

    fn field_name() -> impl Strategy<Value = String> {
        "[a-z][a-z_]{0,11}".prop_filter("reserved", |name| !RESERVED_FIELDS.contains(&name.as_str()))
    }

    fn arbitrary_record() -> impl Strategy<Value = Record> {
        (
            prop::sample::select(Kind::ALL.to_vec()),
            prop::collection::vec((field_name(), field_value()), 0..6),
            0..3usize,
        )
            .prop_map(|(kind, fields, touches)| {
                let mut record = Record::new(kind);
                for (name, value) in fields {
                    record.set(&name, value).unwrap();
                }
                for _ in 0..touches {
                    record.touch();
                }
                record
            })
    }

    proptest! {
        #[test]
        fn any_record_survives_flattening(record in arbitrary_record()) {
            let json = serde_json::to_value(&record).unwrap();
            let rebuilt = Record::from_flat(json.as_object().unwrap()).unwrap();
            prop_assert_eq!(&rebuilt, &record);
            prop_assert_eq!(rebuilt.to_string(), record.to_string());
        }
    }
}
