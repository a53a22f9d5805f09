//! Deployment-wide display settings and validation of the settings form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::inventory::DEFAULT_PAGE_SIZE;
use crate::product::FIXED_LOW_STOCK_THRESHOLD;
use crate::types::CurrencyCode;

/// Timezone stored when the form leaves it blank.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// The persisted settings document.
///
/// Serialized as camelCase JSON. Missing fields fall back to their defaults
/// so an older or hand-edited document still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub company_name: String,
    pub currency: CurrencyCode,
    pub default_low_stock_threshold: u32,
    pub items_per_page: u32,
    pub notify_email: String,
    pub timezone: String,
    /// Time of the last save. `None` until the document is first written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            currency: CurrencyCode::default(),
            default_low_stock_threshold: FIXED_LOW_STOCK_THRESHOLD.unsigned_abs(),
            items_per_page: DEFAULT_PAGE_SIZE,
            notify_email: String::new(),
            timezone: DEFAULT_TIMEZONE.to_owned(),
            updated_at: None,
        }
    }
}

/// Raw settings form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInput {
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub default_low_stock_threshold: Option<String>,
    pub items_per_page: Option<String>,
    pub notify_email: Option<String>,
    pub timezone: Option<String>,
}

impl SettingsInput {
    /// Validate the form into a complete document stamped with `now`.
    ///
    /// `companyName` and `currency` are required. Numeric fields that are
    /// missing, unparseable or zero take their defaults (5 and 20).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if a required field is blank or the
    /// currency is not supported.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Settings, DomainError> {
        let defaults = Settings::default();

        let company_name = filled(self.company_name.as_deref())
            .ok_or_else(|| DomainError::validation("company name is required"))?
            .to_owned();
        let currency = filled(self.currency.as_deref())
            .ok_or_else(|| DomainError::validation("currency is required"))?
            .parse::<CurrencyCode>()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        Ok(Settings {
            company_name,
            currency,
            default_low_stock_threshold: positive_or(
                self.default_low_stock_threshold.as_deref(),
                defaults.default_low_stock_threshold,
            ),
            items_per_page: positive_or(self.items_per_page.as_deref(), defaults.items_per_page)
                .max(1),
            notify_email: filled(self.notify_email.as_deref())
                .unwrap_or_default()
                .to_owned(),
            timezone: filled(self.timezone.as_deref())
                .unwrap_or(DEFAULT_TIMEZONE)
                .to_owned(),
            updated_at: Some(now),
        })
    }
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> SettingsInput {
        SettingsInput {
            company_name: Some("Acme".to_owned()),
            currency: Some("EUR".to_owned()),
            default_low_stock_threshold: Some("8".to_owned()),
            items_per_page: Some("50".to_owned()),
            notify_email: Some("ops@acme.test".to_owned()),
            timezone: Some("Europe/Berlin".to_owned()),
        }
    }

    #[test]
    fn test_validate_full_form() {
        let now = Utc::now();
        let settings = form().validate(now).unwrap();
        assert_eq!(settings.company_name, "Acme");
        assert_eq!(settings.currency, CurrencyCode::Eur);
        assert_eq!(settings.default_low_stock_threshold, 8);
        assert_eq!(settings.items_per_page, 50);
        assert_eq!(settings.notify_email, "ops@acme.test");
        assert_eq!(settings.timezone, "Europe/Berlin");
        assert_eq!(settings.updated_at, Some(now));
    }

    #[test]
    fn test_validate_requires_company_and_currency() {
        let mut missing_currency = form();
        missing_currency.currency = None;
        assert_eq!(
            missing_currency.validate(Utc::now()),
            Err(DomainError::validation("currency is required"))
        );

        let mut blank_company = form();
        blank_company.company_name = Some("  ".to_owned());
        assert!(blank_company.validate(Utc::now()).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_currency() {
        let mut input = form();
        input.currency = Some("JPY".to_owned());
        assert!(matches!(
            input.validate(Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_numeric_defaults() {
        let input = SettingsInput {
            company_name: Some("Acme".to_owned()),
            currency: Some("usd".to_owned()),
            default_low_stock_threshold: Some("zero".to_owned()),
            items_per_page: Some("0".to_owned()),
            ..SettingsInput::default()
        };
        let settings = input.validate(Utc::now()).unwrap();
        assert_eq!(settings.default_low_stock_threshold, 5);
        assert_eq!(settings.items_per_page, 20);
        assert_eq!(settings.notify_email, "");
        assert_eq!(settings.timezone, "UTC");
    }

    #[test]
    fn test_document_uses_camel_case() {
        let json = serde_json::to_value(form().validate(Utc::now()).unwrap()).unwrap();
        assert_eq!(json["companyName"], "Acme");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["defaultLowStockThreshold"], 8);
        assert_eq!(json["itemsPerPage"], 50);
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"companyName":"Acme","currency":"GBP"}"#).unwrap();
        assert_eq!(settings.currency, CurrencyCode::Gbp);
        assert_eq!(settings.items_per_page, 20);
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.updated_at, None);
    }
}
