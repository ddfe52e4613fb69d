//! Derived code fields pulled out of a raw country payload.

use crate::domain::city::NOT_AVAILABLE;
use serde_json::Value as JsonValue;

const ALPHA2_KEY: &str = "alpha-2";
const ALPHA3_KEY: &str = "alpha-3";
const CURRENCIES_KEY: &str = "currencies";
const CURRENCY_CODE_KEY: &str = "code";

/// The three codes derived from country metadata.
///
/// Each field is resolved on its own: a missing 3-letter code never prevents
/// the 2-letter code or the currency from being filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCodes {
    pub code2: String,
    pub code3: String,
    pub currency_code: String,
}

/// Extracts `alpha-2`, `alpha-3` and `currencies[0].code`.
///
/// Absent keys, non-string values, empty strings and an empty currency list
/// all resolve to [`NOT_AVAILABLE`] for that field only, with a warning.
pub fn extract_codes(country: &JsonValue) -> DerivedCodes {
    let code2 = country.get(ALPHA2_KEY).and_then(non_empty_str);
    let code3 = country.get(ALPHA3_KEY).and_then(non_empty_str);
    let currency_code = country
        .get(CURRENCIES_KEY)
        .and_then(JsonValue::as_array)
        .and_then(|currencies| currencies.first())
        .and_then(|currency| currency.get(CURRENCY_CODE_KEY))
        .and_then(non_empty_str);

    DerivedCodes {
        code2: or_sentinel(code2, ALPHA2_KEY, country),
        code3: or_sentinel(code3, ALPHA3_KEY, country),
        currency_code: or_sentinel(currency_code, "currencies[0].code", country),
    }
}

fn non_empty_str(value: &JsonValue) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn or_sentinel(value: Option<&str>, field: &str, country: &JsonValue) -> String {
    match value {
        Some(v) => v.to_string(),
        None => {
            tracing::warn!(
                field,
                country = country.get("name").and_then(JsonValue::as_str).unwrap_or("<unnamed>"),
                "derived field missing from country payload, using {}",
                NOT_AVAILABLE
            );
            NOT_AVAILABLE.to_string()
        }
    }
}
