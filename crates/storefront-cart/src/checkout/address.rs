//! Shipping address.

use serde::{Deserialize, Serialize};

/// Where an order is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShippingAddress {
    /// Recipient name.
    pub full_name: String,
    /// Contact phone for the courier.
    pub phone: String,
    /// Street and building.
    pub street: String,
    /// Apartment, floor, landmark.
    #[serde(default)]
    pub details: Option<String>,
    /// City.
    pub city: String,
    /// State, province or governorate.
    #[serde(default)]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country code (e.g., "EG").
    pub country_code: String,
}

impl ShippingAddress {
    /// Create an address with the required fields.
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            phone: phone.into(),
            street: street.into(),
            city: city.into(),
            country_code: country_code.into(),
            ..Self::default()
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the postal code.
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Set the delivery details line.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.full_name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("country", &self.country_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check if all required fields are filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.as_str()];
        if let Some(details) = self.details.as_deref() {
            parts.push(details);
        }
        parts.push(self.city.as_str());
        if let Some(region) = self.region.as_deref() {
            parts.push(region);
        }
        if let Some(zip) = self.postal_code.as_deref() {
            parts.push(zip);
        }
        parts.push(self.country_code.as_str());
        parts.join(", ")
    }
}
