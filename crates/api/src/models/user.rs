//! User account and stored-address models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marigold_core::{AddressId, Email, UserId, UserRole};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether a stored address is used for shipping or billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Shipping,
    Billing,
}

impl AddressKind {
    /// The wire/database representation of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Billing => "billing",
        }
    }
}

impl std::str::FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shipping" => Ok(Self::Shipping),
            "billing" => Ok(Self::Billing),
            other => Err(format!("unknown address type: {other}")),
        }
    }
}

/// A saved address on a user's account.
///
/// A user keeps at most one default address per kind; setting a new default
/// unsets the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAddress {
    pub id: AddressId,
    #[serde(rename = "type")]
    pub kind: AddressKind,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_kind_roundtrip() {
        assert_eq!(
            "shipping".parse::<AddressKind>().unwrap(),
            AddressKind::Shipping
        );
        assert_eq!(AddressKind::Billing.as_str(), "billing");
        assert!("home".parse::<AddressKind>().is_err());
    }

    #[test]
    fn test_address_wire_uses_type_field() {
        let address = StoredAddress {
            id: AddressId::new(1),
            kind: AddressKind::Shipping,
            street: "123 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62704".to_owned(),
            country: "USA".to_owned(),
            is_default: true,
        };
        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value["type"], "shipping");
        assert_eq!(value["zipCode"], "62704");
    }
}
