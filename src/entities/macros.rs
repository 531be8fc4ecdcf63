//! Macros for reducing boilerplate when defining records
//!
//! These macros generate the struct and the [`Entity`](crate::core::Entity)
//! implementation for each record type shown in a list screen.

/// Complete macro to create a record with automatic trait implementations
///
/// Injects an `id: RecordId` field, derives the serde traits and exposes every
/// listed field through `Entity::field_value` under its Rust name. Field types
/// must implement [`ToFieldValue`](crate::core::field::ToFieldValue).
///
/// # Example
///
/// ```rust,ignore
/// use storedesk::prelude::*;
///
/// impl_entity!(
///     Coupon,
///     "coupons",
///     "coupon",
///     {
///         code: String,
///         discount: f64,
///         #[serde(default)]
///         active: bool,
///     }
/// );
///
/// let coupon: Coupon = serde_json::from_value(json!({
///     "id": 7, "code": "SPRING", "discount": 10.0
/// }))?;
/// assert_eq!(coupon.id(), "7");
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $plural:expr,
        $singular:expr,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Backend identifier (string or number on the wire)
            pub id: $crate::entities::RecordId,
            $( $(#[$field_meta])* pub $field : $field_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn fields() -> &'static [&'static str] {
                &[ "id", $( stringify!($field) ),* ]
            }

            fn id(&self) -> &str {
                self.id.as_str()
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                #[allow(unused_imports)]
                use $crate::core::field::ToFieldValue;
                match field {
                    "id" => Some($crate::core::field::FieldValue::String(self.id.to_string())),
                    $( stringify!($field) => Some(self.$field.to_field_value()), )*
                    _ => None,
                }
            }
        }
    };
}
