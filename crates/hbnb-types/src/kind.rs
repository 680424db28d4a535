use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::Value;

/// Declared type of a schema field. Determines the field's default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Str,
    Int,
    Float,
    List,
}

impl FieldType {
    /// Zero value for this type: `''`, `0`, `0.0`, or `[]`.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Str => Value::Str(String::new()),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::List => Value::List(Vec::new()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => write!(f, "str"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::List => write!(f, "list"),
        }
    }
}

/// A declared field: name plus type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

const USER_FIELDS: &[FieldSpec] = &[
    field("email", FieldType::Str),
    field("password", FieldType::Str),
    field("first_name", FieldType::Str),
    field("last_name", FieldType::Str),
];

const STATE_FIELDS: &[FieldSpec] = &[field("name", FieldType::Str)];

const CITY_FIELDS: &[FieldSpec] = &[
    field("state_id", FieldType::Str),
    field("name", FieldType::Str),
];

const AMENITY_FIELDS: &[FieldSpec] = &[field("name", FieldType::Str)];

const PLACE_FIELDS: &[FieldSpec] = &[
    field("city_id", FieldType::Str),
    field("user_id", FieldType::Str),
    field("name", FieldType::Str),
    field("description", FieldType::Str),
    field("number_rooms", FieldType::Int),
    field("number_bathrooms", FieldType::Int),
    field("max_guest", FieldType::Int),
    field("price_by_night", FieldType::Int),
    field("latitude", FieldType::Float),
    field("longitude", FieldType::Float),
    field("amenity_ids", FieldType::List),
];

const REVIEW_FIELDS: &[FieldSpec] = &[
    field("place_id", FieldType::Str),
    field("user_id", FieldType::Str),
    field("text", FieldType::Str),
];

/// The closed set of record kinds.
///
/// Each kind declares its fields up front; a record of that kind always
/// carries every declared field. Serializes as the kind name (`"User"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Kind {
    /// Every kind, in registry order.
    pub const ALL: [Kind; 7] = [
        Kind::BaseModel,
        Kind::User,
        Kind::State,
        Kind::City,
        Kind::Amenity,
        Kind::Place,
        Kind::Review,
    ];

    /// The kind's name as it appears in commands and on disk.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    /// Declared fields, in declaration order. Excludes `id` and timestamps.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::BaseModel => &[],
            Self::User => USER_FIELDS,
            Self::State => STATE_FIELDS,
            Self::City => CITY_FIELDS,
            Self::Amenity => AMENITY_FIELDS,
            Self::Place => PLACE_FIELDS,
            Self::Review => REVIEW_FIELDS,
        }
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }
}

impl FromStr for Kind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
