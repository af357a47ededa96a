//! The typed record contract.
//!
//! A record is an ordered set of named fields. Every outbound request type
//! implements [`Record`], which exposes its *set* fields as a flat list of
//! [`Field`]s in declaration order. The encoder consumes this descriptor
//! instead of reflecting over the value, so one generic code path serves
//! every request shape in the catalogue.
//!
//! Field values are described by [`FieldValue`]:
//!
//! | Kind | Variant |
//! |------|---------|
//! | string / int / float / bool / datetime | [`FieldValue::Scalar`] |
//! | opaque JSON blob | [`FieldValue::Raw`] |
//! | nested record | [`FieldValue::Record`] |
//! | homogeneous list | [`FieldValue::List`] |
//! | file payload | [`FieldValue::File`] |
//!
//! Union-typed fields are plain Rust enums whose [`ToField`] impl picks the
//! variant of the value actually set, so a union holding a file forces
//! multipart while the same union holding an id does not.
//!
//! # Declaring records
//!
//! Use the [`record!`](crate::record!) macro. A field may carry a wire name
//! that differs from its Rust name with `=> "wire"`:
//!
//! ```rust,ignore
//! record! {
//!     #[derive(Debug, Clone)]
//!     pub struct Forward {
//!         pub chat_id: Identifier,
//!         pub source_chat: Identifier => "from_chat_id",
//!         pub silent: Option<bool> => "disable_notification",
//!     }
//! }
//! ```
//!
//! `Option` fields that are `None` are *unset* and never reach the wire.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::file::InputFile;

// =============================================================================
// Field Descriptors
// =============================================================================

/// A scalar field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// A string.
    Str(&'a str),
    /// An integer. Datetimes are carried as unix seconds.
    Int(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Bool(bool),
}

/// The value of one set field.
pub enum FieldValue<'a> {
    /// A scalar.
    Scalar(Scalar<'a>),
    /// An opaque JSON blob, passed through untouched.
    Raw(&'a Value),
    /// A nested record.
    Record(&'a dyn Record),
    /// An ordered list of values of one kind.
    List(Vec<FieldValue<'a>>),
    /// A file payload.
    File(&'a InputFile),
}

impl FieldValue<'_> {
    /// Returns `true` if this value holds a file payload at any depth.
    pub fn contains_file(&self) -> bool {
        match self {
            Self::File(_) => true,
            Self::Record(record) => record.contains_file(),
            Self::List(items) => items.iter().any(FieldValue::contains_file),
            Self::Scalar(_) | Self::Raw(_) => false,
        }
    }
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Raw(value) => f.debug_tuple("Raw").field(value).finish(),
            Self::Record(record) => f.debug_tuple("Record").field(&record.fields()).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
        }
    }
}

/// One set field of a record, named by its wire name.
#[derive(Debug)]
pub struct Field<'a> {
    /// Wire name.
    pub name: &'static str,
    /// Field value.
    pub value: FieldValue<'a>,
}

// =============================================================================
// Traits
// =============================================================================

/// A structural value with named, kinded fields.
///
/// Usually implemented through [`record!`](crate::record!).
pub trait Record {
    /// Returns the set fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Returns `true` if any field, at any depth, holds a file payload.
    fn contains_file(&self) -> bool {
        self.fields().iter().any(|field| field.value.contains_file())
    }
}

/// Conversion of a Rust value into a field value.
///
/// Returning `None` marks the field as unset.
pub trait ToField {
    /// Describes this value, or `None` if it is unset.
    fn to_field(&self) -> Option<FieldValue<'_>>;
}

impl ToField for String {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Str(self)))
    }
}

macro_rules! impl_int_field {
    ($($ty:ty),*) => {
        $(
            impl ToField for $ty {
                fn to_field(&self) -> Option<FieldValue<'_>> {
                    Some(FieldValue::Scalar(Scalar::Int(i64::from(*self))))
                }
            }
        )*
    };
}

impl_int_field!(i64, i32, u32, u16, u8);

impl ToField for f64 {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Float(*self)))
    }
}

impl ToField for bool {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Bool(*self)))
    }
}

impl ToField for DateTime<Utc> {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Scalar(Scalar::Int(self.timestamp())))
    }
}

impl ToField for Value {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::Raw(self))
    }
}

impl ToField for InputFile {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::File(self))
    }
}

impl<T: ToField> ToField for Option<T> {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        self.as_ref().and_then(ToField::to_field)
    }
}

impl<T: ToField> ToField for Box<T> {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        self.as_ref().to_field()
    }
}

static NULL: Value = Value::Null;

/// Unset elements encode as `null` so the others keep their positions.
impl<T: ToField> ToField for Vec<T> {
    fn to_field(&self) -> Option<FieldValue<'_>> {
        Some(FieldValue::List(
            self.iter()
                .map(|item| item.to_field().unwrap_or(FieldValue::Raw(&NULL)))
                .collect(),
        ))
    }
}

// =============================================================================
// Declaration Macro
// =============================================================================

/// Declares a struct together with its [`Record`] and [`ToField`] impls.
///
/// Attributes on the struct and on each field are passed through. A field
/// followed by `=> "name"` is sent under that wire name.
///
/// [`Record`]: crate::record::Record
/// [`ToField`]: crate::record::ToField
#[macro_export]
macro_rules! record {
    (@wire $field:ident, $wire:literal) => { $wire };
    (@wire $field:ident) => { ::std::stringify!($field) };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $wire:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn fields(&self) -> ::std::vec::Vec<$crate::record::Field<'_>> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                $(
                    if let ::std::option::Option::Some(value) =
                        $crate::record::ToField::to_field(&self.$field)
                    {
                        fields.push($crate::record::Field {
                            name: $crate::record!(@wire $field $(, $wire)?),
                            value,
                        });
                    }
                )*
                fields
            }
        }

        impl $crate::record::ToField for $name {
            fn to_field(&self) -> ::std::option::Option<$crate::record::FieldValue<'_>> {
                ::std::option::Option::Some($crate::record::FieldValue::Record(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identifier;

    record! {
        #[derive(Debug, Clone, Default)]
        struct Inner {
            label: Option<String>,
        }
    }

    record! {
        #[derive(Debug, Clone, Default)]
        struct Outer {
            chat_id: Option<Identifier>,
            sender: Option<String> => "from",
            inner: Option<Inner>,
            rows: Vec<Inner>,
            silent: Option<bool>,
        }
    }

    fn names(record: &dyn Record) -> Vec<&'static str> {
        record.fields().iter().map(|field| field.name).collect()
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let outer = Outer::default();
        assert_eq!(names(&outer), vec!["rows"]);
    }

    #[test]
    fn test_unset_list_elements_keep_their_slot() {
        let items = vec![Some(1i64), None, Some(3)];
        let Some(FieldValue::List(values)) = items.to_field() else {
            panic!("expected a list");
        };
        assert_eq!(values.len(), 3);
        assert!(matches!(values[1], FieldValue::Raw(Value::Null)));
        assert!(matches!(values[2], FieldValue::Scalar(Scalar::Int(3))));
    }

    #[test]
    fn test_fields_follow_declaration_order() {
        let outer = Outer {
            silent: Some(false),
            chat_id: Some(Identifier::from(42)),
            inner: Some(Inner::default()),
            ..Outer::default()
        };
        assert_eq!(names(&outer), vec!["chat_id", "inner", "rows", "silent"]);
    }

    #[test]
    fn test_wire_name_differs_from_field_name() {
        let outer = Outer {
            sender: Some("me".into()),
            ..Outer::default()
        };
        let fields = outer.fields();
        assert_eq!(fields[0].name, "from");
        assert!(matches!(
            fields[0].value,
            FieldValue::Scalar(Scalar::Str("me"))
        ));
    }

    #[test]
    fn test_contains_file_sees_nested_lists() {
        record! {
            struct Holder {
                items: Vec<Option<InputFile>>,
            }
        }

        let empty = Holder { items: vec![None] };
        assert!(!empty.contains_file());

        let holder = Holder {
            items: vec![None, Some(InputFile::from_bytes("a.txt", b"x".to_vec()))],
        };
        assert!(holder.contains_file());
    }
}
