use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

pub const SETTINGS_KEY: &str = "accountingSettings";

pub const DEFAULT_PAYMENT_TERMS: i64 = 30;
pub const MAX_PAYMENT_TERMS: i64 = 3650;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("مدة السداد يجب أن تكون عدداً صحيحاً بين 0 و 3650 يوماً")]
    PaymentTerms,
    #[error("نسبة الضريبة يجب أن تكون بين 0 و 100")]
    TaxRate,
    #[error("غرامة التأخير يجب أن تكون بين 0 و 100")]
    LateFee,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn parse_percent(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE_HUNDRED)
}

fn parse_terms(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|days| (0..=MAX_PAYMENT_TERMS).contains(days))
}

/// Device-local accounting preferences. Values are kept as the form shows
/// them; the server never sees this blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountingSettings {
    pub school_name: String,
    pub currency: String,
    pub tax_rate: String,
    pub invoice_prefix: String,
    pub payment_terms: String,
    pub late_fee: String,
    pub school_address: String,
    pub school_contact: String,
}

impl Default for AccountingSettings {
    fn default() -> Self {
        Self {
            school_name: "المؤسسة التعليمية".to_string(),
            currency: "DZD".to_string(),
            tax_rate: "0".to_string(),
            invoice_prefix: "INV".to_string(),
            payment_terms: "30".to_string(),
            late_fee: "5".to_string(),
            school_address: "العنوان: الجزائر".to_string(),
            school_contact: "هاتف: 0000000000\nبريد إلكتروني: info@school.com".to_string(),
        }
    }
}

impl AccountingSettings {
    /// Blank fields take their default, one field at a time.
    fn filled(self) -> Self {
        let defaults = Self::default();
        let pick = |value: String, fallback: String| {
            if value.trim().is_empty() {
                fallback
            } else {
                value
            }
        };
        Self {
            school_name: pick(self.school_name, defaults.school_name),
            currency: pick(self.currency, defaults.currency),
            tax_rate: pick(self.tax_rate, defaults.tax_rate),
            invoice_prefix: pick(self.invoice_prefix, defaults.invoice_prefix),
            payment_terms: pick(self.payment_terms, defaults.payment_terms),
            late_fee: pick(self.late_fee, defaults.late_fee),
            school_address: pick(self.school_address, defaults.school_address),
            school_contact: pick(self.school_contact, defaults.school_contact),
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        currency_symbol_for(&self.currency)
    }

    /// Out-of-range or unreadable terms count as the default.
    pub fn payment_terms_days(&self) -> i64 {
        parse_terms(&self.payment_terms).unwrap_or(DEFAULT_PAYMENT_TERMS)
    }

    /// Tax percentage for new invoices; zero unless the stored value is a
    /// percentage between 0 and 100.
    pub fn tax_rate_percent(&self) -> Decimal {
        parse_percent(&self.tax_rate).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_terms(&self.payment_terms).ok_or(SettingsError::PaymentTerms)?;
        parse_percent(&self.tax_rate).ok_or(SettingsError::TaxRate)?;
        parse_percent(&self.late_fee).ok_or(SettingsError::LateFee)?;
        Ok(())
    }
}

pub fn currency_symbol_for(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "MAD" => "د.م",
        "TND" => "د.ت",
        "SAR" => "ر.س",
        _ => "د.ج",
    }
}

pub fn load_settings(store: &impl KeyValueStore) -> AccountingSettings {
    let Some(raw) = store.get(SETTINGS_KEY) else {
        return AccountingSettings::default();
    };
    match serde_json::from_str::<AccountingSettings>(&raw) {
        Ok(settings) => settings.filled(),
        Err(err) => {
            log::warn!("ignoring unreadable {}: {}", SETTINGS_KEY, err);
            AccountingSettings::default()
        }
    }
}

/// Refuses values the invoice screens cannot use; nothing is written then.
pub fn save_settings(
    store: &impl KeyValueStore,
    settings: &AccountingSettings,
) -> Result<(), SettingsError> {
    settings.validate()?;
    let raw = serde_json::to_string(settings).map_err(|source| StorageError::Encode {
        key: SETTINGS_KEY.to_string(),
        source,
    })?;
    store.set(SETTINGS_KEY, &raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    #[test]
    fn nothing_stored_gives_defaults() {
        let settings = load_settings(&MemoryStore::default());
        assert_eq!(settings, AccountingSettings::default());
        assert_eq!(settings.currency_symbol(), "د.ج");
    }

    #[test]
    fn missing_and_blank_fields_fall_back_individually() {
        let store = MemoryStore::default();
        store
            .set(
                SETTINGS_KEY,
                r#"{"schoolName": "مدرسة النور", "currency": "", "lateFee": "10"}"#,
            )
            .unwrap();

        let settings = load_settings(&store);
        assert_eq!(settings.school_name, "مدرسة النور");
        assert_eq!(settings.currency, "DZD");
        assert_eq!(settings.late_fee, "10");
        assert_eq!(settings.invoice_prefix, "INV");
        assert_eq!(settings.payment_terms, "30");
    }

    #[test]
    fn corrupt_blob_gives_defaults() {
        let store = MemoryStore::default();
        store.set(SETTINGS_KEY, "{{{").unwrap();
        assert_eq!(load_settings(&store), AccountingSettings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let store = MemoryStore::default();
        let settings = AccountingSettings {
            currency: "EUR".to_string(),
            tax_rate: "19".to_string(),
            ..AccountingSettings::default()
        };
        save_settings(&store, &settings).unwrap();

        let raw = store.get(SETTINGS_KEY).unwrap();
        assert!(raw.contains("\"taxRate\":\"19\""));
        let loaded = load_settings(&store);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.currency_symbol(), "€");
    }

    #[test]
    fn out_of_range_values_are_not_saved() {
        let store = MemoryStore::default();
        let huge_terms = AccountingSettings {
            payment_terms: "100000000".to_string(),
            ..AccountingSettings::default()
        };
        assert!(matches!(
            save_settings(&store, &huge_terms),
            Err(SettingsError::PaymentTerms)
        ));
        let negative_terms = AccountingSettings {
            payment_terms: "-3".to_string(),
            ..AccountingSettings::default()
        };
        assert!(matches!(
            save_settings(&store, &negative_terms),
            Err(SettingsError::PaymentTerms)
        ));
        let huge_tax = AccountingSettings {
            tax_rate: "79228162514264337593543950335".to_string(),
            ..AccountingSettings::default()
        };
        assert!(matches!(save_settings(&store, &huge_tax), Err(SettingsError::TaxRate)));
        assert_eq!(store.get(SETTINGS_KEY), None);
    }

    #[test]
    fn unusable_stored_values_read_as_defaults() {
        let settings = AccountingSettings {
            payment_terms: "100000000".to_string(),
            tax_rate: "250".to_string(),
            ..AccountingSettings::default()
        };
        assert_eq!(settings.payment_terms_days(), DEFAULT_PAYMENT_TERMS);
        assert_eq!(settings.tax_rate_percent(), Decimal::ZERO);

        let custom = AccountingSettings {
            payment_terms: " 45 ".to_string(),
            tax_rate: "19.5".to_string(),
            ..AccountingSettings::default()
        };
        assert_eq!(custom.payment_terms_days(), 45);
        assert_eq!(custom.tax_rate_percent(), Decimal::new(195, 1));
    }
}
