//! Records shown by the dashboard's list screens
//!
//! Each record is flat and externally sourced. The structs are generated by
//! [`impl_entity!`](crate::impl_entity) and paired with the descriptor of
//! the screen that lists them and the form that edits them.

#[macro_use]
pub mod macros;

pub mod category;
pub mod employee;
pub mod order;
pub mod product;
pub mod warehouse;

pub use category::{Category, CategoryForm};
pub use employee::{Employee, EmployeeForm, EmployeeRole};
pub use order::{Order, OrderStatus};
pub use product::{Product, ProductForm};
pub use warehouse::WarehouseItem;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a record
///
/// Backends disagree on whether ids are strings or numbers; both decode into
/// the same text form and always serialize back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecordId(s),
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Float(n) => RecordId(n.to_string()),
        })
    }
}

/// Lenient decoders for backend values
pub mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
        Null(()),
    }

    /// A number that may arrive as a JSON string (`"12000.50"`) or null
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) if s.trim().is_empty() => Ok(0.0),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid number '{}'", s))),
            NumberOrText::Null(()) => Ok(0.0),
        }
    }

    /// A count that may arrive as a JSON string or null
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let n = number(deserializer)?;
        if n < 0.0 {
            return Err(serde::de::Error::custom(format!("negative count {}", n)));
        }
        Ok(n.round() as i64)
    }
}

impl crate::core::field::ToFieldValue for RecordId {
    fn to_field_value(&self) -> crate::core::field::FieldValue {
        crate::core::field::FieldValue::String(self.0.clone())
    }
}
