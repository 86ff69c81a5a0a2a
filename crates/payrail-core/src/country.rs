//! ISO 3166-1 country code mapping.
//!
//! Billing addresses arrive with alpha-2 codes; the gateway's billing fields
//! expect alpha-3. Unknown codes pass through uppercased rather than failing
//! the payment.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static ALPHA2_TO_ALPHA3: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AE", "ARE"),
        ("AR", "ARG"),
        ("AU", "AUS"),
        ("BR", "BRA"),
        ("CA", "CAN"),
        ("CH", "CHE"),
        ("CL", "CHL"),
        ("CN", "CHN"),
        ("CO", "COL"),
        ("DE", "DEU"),
        ("EG", "EGY"),
        ("ES", "ESP"),
        ("FR", "FRA"),
        ("GB", "GBR"),
        ("GH", "GHA"),
        ("ID", "IDN"),
        ("IN", "IND"),
        ("IT", "ITA"),
        ("JP", "JPN"),
        ("KE", "KEN"),
        ("KR", "KOR"),
        ("MX", "MEX"),
        ("NG", "NGA"),
        ("NL", "NLD"),
        ("PH", "PHL"),
        ("RW", "RWA"),
        ("SA", "SAU"),
        ("SG", "SGP"),
        ("TZ", "TZA"),
        ("UG", "UGA"),
        ("US", "USA"),
        ("ZA", "ZAF"),
    ])
});

/// Normalize a country code to the alpha-3 form the gateway expects.
pub fn to_alpha3(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    ALPHA2_TO_ALPHA3
        .get(upper.as_str())
        .map(|s| s.to_string())
        .unwrap_or(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(to_alpha3("US"), "USA");
        assert_eq!(to_alpha3("ng"), "NGA");
        assert_eq!(to_alpha3(" gb "), "GBR");
    }

    #[test]
    fn test_unknown_code_passes_through_uppercased() {
        assert_eq!(to_alpha3("ZZ"), "ZZ");
        assert_eq!(to_alpha3("usa"), "USA");
    }
}
