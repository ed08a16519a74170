//! Business test data

use serde::{Deserialize, Serialize};

use crate::error::E2eResult;

pub const ENV_BUYER_EMAIL: &str = "FLAIR_BUYER_EMAIL";
pub const ENV_BUYER_PASSWORD: &str = "FLAIR_BUYER_PASSWORD";
pub const ENV_ADMIN_EMAIL: &str = "FLAIR_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "FLAIR_ADMIN_PASSWORD";

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Accounts used by the approval flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub buyer: Credentials,
    pub admin: Credentials,
}

impl LoginData {
    /// Read credentials from the environment
    pub fn from_env() -> E2eResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> E2eResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| flair_common::Error::MissingSetting(key.to_string()))
        };

        Ok(Self {
            buyer: Credentials {
                email: require(ENV_BUYER_EMAIL)?,
                password: require(ENV_BUYER_PASSWORD)?,
            },
            admin: Credentials {
                email: require(ENV_ADMIN_EMAIL)?,
                password: require(ENV_ADMIN_PASSWORD)?,
            },
        })
    }
}

/// Supplier section of a new sourcing record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierData {
    pub supplier_name: String,
    pub supplier_address: String,
    pub contact_person: String,
    pub contact_address: String,
    pub contact_number: String,
    pub email: String,
}

impl SupplierData {
    pub fn default_supplier() -> Self {
        Self {
            supplier_name: "Acme Corp".to_string(),
            supplier_address: "12 Industrial Avenue, Makati City".to_string(),
            contact_person: "Juan Dela Cruz".to_string(),
            contact_address: "12 Industrial Avenue, Makati City".to_string(),
            contact_number: "09171234567".to_string(),
            email: "sourcing@acme.example.com".to_string(),
        }
    }
}

/// One item row of a sourcing record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub department: String,
    pub category: String,
    pub selling_price: String,
}

impl ItemData {
    pub fn widget() -> Self {
        Self {
            name: "Widget".to_string(),
            description: "Standard widget for QA sourcing runs".to_string(),
            brand: "Generic".to_string(),
            department: "Hardware".to_string(),
            category: "Tools".to_string(),
            selling_price: "99.50".to_string(),
        }
    }
}
