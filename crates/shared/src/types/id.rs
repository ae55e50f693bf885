//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `ExpenseId` where a `MemberId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TripId, "Unique identifier for a shared trip.");
typed_id!(MemberId, "Unique identifier for a trip member.");
typed_id!(ExpenseId, "Unique identifier for a shared expense.");
typed_id!(TransferId, "Unique identifier for a suggested transfer.");

/// Namespace for deterministic transfer identifiers.
const TRANSFER_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_94a3_4d05_8e61_3a2f_c0d4_b719);

impl TransferId {
    /// Derives a stable ID from the transfer's endpoints and its position in
    /// the settlement plan.
    ///
    /// The same debtor, creditor and sequence always yield the same ID, so a
    /// recomputed plan carries identical identifiers.
    #[must_use]
    pub fn derive(from: MemberId, to: MemberId, sequence: usize) -> Self {
        let mut name = Vec::with_capacity(40);
        name.extend_from_slice(from.0.as_bytes());
        name.extend_from_slice(to.0.as_bytes());
        name.extend_from_slice(&(sequence as u64).to_be_bytes());
        Self(Uuid::new_v5(&TRANSFER_NAMESPACE, &name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = MemberId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_display_and_parse() {
        let id = ExpenseId::new();
        let parsed = ExpenseId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(ExpenseId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_typed_id_serde_transparent() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&MemberId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn test_transfer_id_is_deterministic() {
        let a = MemberId::new();
        let b = MemberId::new();

        assert_eq!(TransferId::derive(a, b, 0), TransferId::derive(a, b, 0));
        assert_ne!(TransferId::derive(a, b, 0), TransferId::derive(a, b, 1));
        assert_ne!(TransferId::derive(a, b, 0), TransferId::derive(b, a, 0));
    }
}
