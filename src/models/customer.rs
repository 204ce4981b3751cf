//! Customer records.

use serde::{Deserialize, Serialize};

/// A salon customer as returned by `/customers`.
///
/// Created and owned by the upstream API; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Free-text customer note.
    #[serde(default)]
    pub note: String,
    /// Ids of this customer's bookings.
    #[serde(default)]
    pub bookings: Vec<i64>,
}

impl Customer {
    /// Display name as shown in lists: "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_payload() {
        let json = r#"{
            "id": 42,
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "address": "1 Main St",
            "note": "prefers afternoons",
            "bookings": [101, 102]
        }"#;

        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.id, 42);
        assert_eq!(customer.full_name(), "Jane Doe");
        assert_eq!(customer.bookings, vec![101, 102]);
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let json = r#"{"first_name": "Jane", "last_name": "Doe"}"#;
        assert!(serde_json::from_str::<Customer>(json).is_err());
    }

    #[test]
    fn test_optional_contact_fields_default() {
        let json = r#"{"id": 1, "first_name": "A", "last_name": "B"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert!(customer.email.is_empty());
        assert!(customer.bookings.is_empty());
    }
}
