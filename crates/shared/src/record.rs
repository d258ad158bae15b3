//! Typed accessor maps for listable records.
//!
//! Every entity kind describes its scalar fields once, as a static table of
//! [`FieldSpec`]s. Search, sort and payload validation are written against
//! that table and never index records by untyped keys.

use std::{borrow::Cow, fmt};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::domain::{EntityKind, RecordId};

pub type FieldGetter<T> = for<'a> fn(&'a T) -> Option<Cow<'a, str>>;

/// One named scalar field of `T` and how to read it as text.
pub struct FieldSpec<T: 'static> {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Sorts by numeric value instead of collated text.
    pub numeric: bool,
    pub get: FieldGetter<T>,
}

impl<T: 'static> FieldSpec<T> {
    /// Reads the field, treating an absent value as empty text.
    pub fn text<'a>(&self, value: &'a T) -> Cow<'a, str> {
        (self.get)(value).unwrap_or(Cow::Borrowed(""))
    }

    pub fn is_blank(&self, value: &T) -> bool {
        self.text(value).trim().is_empty()
    }
}

impl<T: 'static> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("numeric", &self.numeric)
            .finish()
    }
}

pub fn find_field<T: 'static>(fields: &'static [FieldSpec<T>], name: &str) -> Option<&'static FieldSpec<T>> {
    fields.iter().find(|field| field.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing { field: &'static str },
    Invalid { field: &'static str, reason: String },
    Unknown { field: String },
}

impl FieldProblem {
    pub fn field(&self) -> &str {
        match self {
            FieldProblem::Missing { field } | FieldProblem::Invalid { field, .. } => field,
            FieldProblem::Unknown { field } => field,
        }
    }
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing { field } => write!(f, "`{field}` is required"),
            FieldProblem::Invalid { field, reason } => write!(f, "`{field}` {reason}"),
            FieldProblem::Unknown { field } => write!(f, "`{field}` is not a field of this record"),
        }
    }
}

/// A listable record kind with a draft (create/edit payload) counterpart.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    type Draft: Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> RecordId;
    fn uuid(&self) -> Uuid;

    fn fields() -> &'static [FieldSpec<Self>];
    fn draft_fields() -> &'static [FieldSpec<Self::Draft>];

    fn from_draft(id: RecordId, uuid: Uuid, draft: Self::Draft) -> Self;
    fn apply_draft(&mut self, draft: Self::Draft);
    fn to_draft(&self) -> Self::Draft;

    /// Sets a draft field from its text form.
    fn set_draft_field(
        draft: &mut Self::Draft,
        field: &str,
        value: String,
    ) -> Result<(), FieldProblem>;

    /// Kind-specific checks beyond the required-field set.
    fn check_draft(_draft: &Self::Draft) -> Vec<FieldProblem> {
        Vec::new()
    }

    /// Short human name for notifications ("Amy Adams has been deleted").
    fn display_name(&self) -> String {
        Self::fields()
            .iter()
            .find(|field| field.required)
            .map(|field| field.text(self).into_owned())
            .unwrap_or_else(|| self.uuid().to_string())
    }
}

/// Required-field and kind-specific problems for a draft, in field order.
pub fn validate_draft<E: Entity>(draft: &E::Draft) -> Vec<FieldProblem> {
    let mut problems: Vec<FieldProblem> = E::draft_fields()
        .iter()
        .filter(|field| field.required && field.is_blank(draft))
        .map(|field| FieldProblem::Missing { field: field.name })
        .collect();
    problems.extend(E::check_draft(draft));
    problems
}

/// Declares an entity kind whose fields are all text: the record struct, its
/// draft struct and both accessor maps.
#[macro_export]
macro_rules! text_entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $draft:ident : $kind:ident {
            required { $($req:ident => $req_label:literal),* $(,)? }
            optional { $($opt:ident => $opt_label:literal),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            pub id: $crate::domain::RecordId,
            pub uuid: ::uuid::Uuid,
            $(pub $req: String,)*
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $opt: Option<String>,
            )*
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $draft {
            $(
                #[serde(default)]
                pub $req: String,
            )*
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $opt: Option<String>,
            )*
        }

        impl $crate::record::Entity for $name {
            const KIND: $crate::domain::EntityKind = $crate::domain::EntityKind::$kind;

            type Draft = $draft;

            fn id(&self) -> $crate::domain::RecordId {
                self.id
            }

            fn uuid(&self) -> ::uuid::Uuid {
                self.uuid
            }

            fn fields() -> &'static [$crate::record::FieldSpec<Self>] {
                const FIELDS: &[$crate::record::FieldSpec<$name>] = &[
                    $crate::record::FieldSpec {
                        name: "id",
                        label: "ID",
                        required: false,
                        numeric: true,
                        get: |record| Some(::std::borrow::Cow::Owned(record.id.to_string())),
                    },
                    $crate::record::FieldSpec {
                        name: "uuid",
                        label: "UUID",
                        required: false,
                        numeric: false,
                        get: |record| Some(::std::borrow::Cow::Owned(record.uuid.to_string())),
                    },
                    $($crate::record::FieldSpec {
                        name: stringify!($req),
                        label: $req_label,
                        required: true,
                        numeric: false,
                        get: |record| Some(::std::borrow::Cow::Borrowed(record.$req.as_str())),
                    },)*
                    $($crate::record::FieldSpec {
                        name: stringify!($opt),
                        label: $opt_label,
                        required: false,
                        numeric: false,
                        get: |record| record.$opt.as_deref().map(::std::borrow::Cow::Borrowed),
                    },)*
                ];
                FIELDS
            }

            fn draft_fields() -> &'static [$crate::record::FieldSpec<$draft>] {
                const FIELDS: &[$crate::record::FieldSpec<$draft>] = &[
                    $($crate::record::FieldSpec {
                        name: stringify!($req),
                        label: $req_label,
                        required: true,
                        numeric: false,
                        get: |draft| Some(::std::borrow::Cow::Borrowed(draft.$req.as_str())),
                    },)*
                    $($crate::record::FieldSpec {
                        name: stringify!($opt),
                        label: $opt_label,
                        required: false,
                        numeric: false,
                        get: |draft| draft.$opt.as_deref().map(::std::borrow::Cow::Borrowed),
                    },)*
                ];
                FIELDS
            }

            fn from_draft(
                id: $crate::domain::RecordId,
                uuid: ::uuid::Uuid,
                draft: $draft,
            ) -> Self {
                Self {
                    id,
                    uuid,
                    $($req: draft.$req,)*
                    $($opt: draft.$opt,)*
                }
            }

            fn apply_draft(&mut self, draft: $draft) {
                $(self.$req = draft.$req;)*
                $(self.$opt = draft.$opt;)*
            }

            fn to_draft(&self) -> $draft {
                $draft {
                    $($req: self.$req.clone(),)*
                    $($opt: self.$opt.clone(),)*
                }
            }

            fn set_draft_field(
                draft: &mut $draft,
                field: &str,
                value: String,
            ) -> Result<(), $crate::record::FieldProblem> {
                match field {
                    $(stringify!($req) => draft.$req = value,)*
                    $(stringify!($opt) => {
                        draft.$opt = (!value.trim().is_empty()).then_some(value)
                    })*
                    _ => {
                        return Err($crate::record::FieldProblem::Unknown {
                            field: field.to_string(),
                        })
                    }
                }
                Ok(())
            }
        }
    };
}
