//! Partial-Update Merge Engine
//!
//! A patch document is a full record value in which every field the caller
//! does not want to change is left at its zero value. Merging walks the
//! record's mergeable fields and overwrites only the ones that are set.
//!
//! The field walk is generated at compile time by [`impl_patchable!`], so
//! record types never hand-write a merge function. The identifier field is
//! named separately and is never part of the field list: it always comes
//! from the stored record.
//!
//! ```rust
//! use kernel::impl_patchable;
//! use kernel::patch::merge;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Person {
//!     id: i64,
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! impl_patchable!(Person, id = id, fields = [first_name, last_name]);
//!
//! let existing = Person { id: 1, first_name: "A".into(), last_name: "B".into() };
//! let patch = Person { id: 9, first_name: String::new(), last_name: "C".into() };
//!
//! let merged = merge(existing, patch);
//! assert_eq!(merged, Person { id: 1, first_name: "A".into(), last_name: "C".into() });
//! ```

/// A field kind that has an "unset" zero value
pub trait PatchField {
    /// True when the value is the zero value and must not overwrite anything
    fn is_unset(&self) -> bool;
}

impl PatchField for String {
    #[inline]
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> PatchField for Option<T> {
    #[inline]
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

/// Record type that supports generic partial updates
///
/// Implement with [`impl_patchable!`].
pub trait Patchable: Sized {
    /// Names of the mergeable fields, in declaration order
    const FIELD_NAMES: &'static [&'static str];

    /// Identifier of the record; never merged
    fn record_id(&self) -> i64;

    /// Overwrite every field of `self` that is set in `patch`
    fn apply_patch(&mut self, patch: Self);

    /// Names of the mergeable fields that are set in `self`
    fn set_fields(&self) -> Vec<&'static str>;
}

/// Merge `patch` onto `existing`, field by field.
///
/// The result keeps `existing`'s identifier and every field the patch left
/// at its zero value.
pub fn merge<T: Patchable>(mut existing: T, patch: T) -> T {
    existing.apply_patch(patch);
    existing
}

/// Generate a [`Patchable`] implementation for a record struct.
///
/// `id` names the identifier field (an `i64`); `fields` lists the mergeable
/// fields, each of which must implement [`PatchField`].
#[macro_export]
macro_rules! impl_patchable {
    ($ty:ty, id = $id:ident, fields = [$($field:ident),+ $(,)?]) => {
        impl $crate::patch::Patchable for $ty {
            const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn record_id(&self) -> i64 {
                self.$id
            }

            fn apply_patch(&mut self, patch: Self) {
                $(
                    if !$crate::patch::PatchField::is_unset(&patch.$field) {
                        self.$field = patch.$field;
                    }
                )+
            }

            fn set_fields(&self) -> ::std::vec::Vec<&'static str> {
                let mut set = ::std::vec::Vec::new();
                $(
                    if !$crate::patch::PatchField::is_unset(&self.$field) {
                        set.push(stringify!($field));
                    }
                )+
                set
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Person {
        id: i64,
        first: String,
        last: String,
        nickname: Option<String>,
        // Not listed below, so never touched by a merge.
        active: bool,
    }

    crate::impl_patchable!(Person, id = id, fields = [first, last, nickname]);

    fn person(id: i64, first: &str, last: &str) -> Person {
        Person {
            id,
            first: first.to_string(),
            last: last.to_string(),
            nickname: None,
            active: true,
        }
    }

    #[test]
    fn test_merge_overwrites_only_set_fields() {
        let existing = person(1, "A", "B");
        let patch = person(1, "", "C");

        let merged = merge(existing, patch);
        assert_eq!(merged.first, "A");
        assert_eq!(merged.last, "C");
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let existing = person(3, "Ada", "Lovelace");
        let merged = merge(existing.clone(), Person::default());
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_identifier_never_taken_from_patch() {
        let existing = person(7, "A", "B");
        let patch = person(99, "X", "Y");

        let merged = merge(existing, patch);
        assert_eq!(merged.record_id(), 7);
        assert_eq!(merged.first, "X");
    }

    #[test]
    fn test_unlisted_fields_are_kept() {
        let existing = person(1, "A", "B");
        let mut patch = person(1, "", "");
        patch.active = false;

        let merged = merge(existing, patch);
        assert!(merged.active);
    }

    #[test]
    fn test_option_field() {
        let existing = person(1, "A", "B");
        let mut patch = Person::default();
        patch.nickname = Some("Al".to_string());

        let merged = merge(existing, patch);
        assert_eq!(merged.nickname.as_deref(), Some("Al"));
    }

    #[test]
    fn test_field_names_and_set_fields() {
        assert_eq!(Person::FIELD_NAMES, &["first", "last", "nickname"]);

        let patch = person(0, "", "C");
        assert_eq!(patch.set_fields(), vec!["last"]);
    }
}
