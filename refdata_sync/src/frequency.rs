//! Interest payment frequency normalizer.

use serde_json::Value;

use crate::clean::normalize_string;

/// Canonical payment frequency derived from the free-text
/// `INTEREST_FREQUENCY` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFrequency {
    /// Paid every month.
    Monthly,
    /// Paid every quarter.
    Quarterly,
    /// Paid twice a year.
    SemiAnnual,
    /// Paid once a year.
    Annual,
    /// Paid together with the principal at maturity.
    OnMaturity,
    /// Recognizable text that matches no known schedule.
    Other,
    /// Absent or sentinel value.
    Unknown,
}

impl PaymentFrequency {
    /// Stable tag stored in the `interest_frequency` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "MONTHLY",
            PaymentFrequency::Quarterly => "QUARTERLY",
            PaymentFrequency::SemiAnnual => "SEMI-ANNUAL",
            PaymentFrequency::Annual => "ANNUAL",
            PaymentFrequency::OnMaturity => "ON_MATURITY",
            PaymentFrequency::Other => "OTHER",
            PaymentFrequency::Unknown => "UNKNOWN",
        }
    }
}

/// Maps raw frequency text to a canonical value.
///
/// Keyword containment, not equality: `"Half Yearly / Semi Annually"` and
/// `"SEMI-ANNUAL"` both map to [`PaymentFrequency::SemiAnnual`]. The
/// semi-annual check runs before the annual one so `"SEMI ANNUAL"` is not
/// swallowed by the `annual` keyword.
pub fn normalize_interest_frequency(raw: &Value) -> PaymentFrequency {
    let Some(text) = normalize_string(raw) else {
        return PaymentFrequency::Unknown;
    };
    let upper = text.to_uppercase();
    if matches!(upper.as_str(), "NULL" | "NONE") {
        return PaymentFrequency::Unknown;
    }
    if upper.contains("MONTHLY") || upper.contains("TWELVE TIMES") {
        return PaymentFrequency::Monthly;
    }
    if upper.contains("QUARTER") {
        return PaymentFrequency::Quarterly;
    }
    if (upper.contains("SEMI") && upper.contains("ANNUAL"))
        || upper.contains("HALF YEARLY")
        || upper.contains("HALF-YEARLY")
        || upper.contains("TWICE A YEAR")
    {
        return PaymentFrequency::SemiAnnual;
    }
    if upper.contains("ANNUAL") || upper.contains("YEARLY") || upper.contains("ONCE A YEAR") {
        return PaymentFrequency::Annual;
    }
    if upper.contains("MATURITY") {
        return PaymentFrequency::OnMaturity;
    }
    PaymentFrequency::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn norm(s: &str) -> PaymentFrequency {
        normalize_interest_frequency(&json!(s))
    }

    #[test]
    fn canonical_buckets() {
        assert_eq!(norm("Monthly"), PaymentFrequency::Monthly);
        assert_eq!(norm("twelve times a year"), PaymentFrequency::Monthly);
        assert_eq!(norm("QUARTERLY"), PaymentFrequency::Quarterly);
        assert_eq!(norm("Semi Annually"), PaymentFrequency::SemiAnnual);
        assert_eq!(norm("Half Yearly"), PaymentFrequency::SemiAnnual);
        assert_eq!(norm("twice a year"), PaymentFrequency::SemiAnnual);
        assert_eq!(norm("Annually"), PaymentFrequency::Annual);
        assert_eq!(norm("once a year"), PaymentFrequency::Annual);
        assert_eq!(norm("On Maturity"), PaymentFrequency::OnMaturity);
    }

    #[test]
    fn semi_annual_wins_over_annual() {
        assert_eq!(norm("SEMI-ANNUAL"), PaymentFrequency::SemiAnnual);
        assert_eq!(norm("SEMI ANNUALLY"), PaymentFrequency::SemiAnnual);
    }

    #[test]
    fn sentinels_and_noise() {
        assert_eq!(norm("-"), PaymentFrequency::Unknown);
        assert_eq!(norm("NULL"), PaymentFrequency::Unknown);
        assert_eq!(norm("none"), PaymentFrequency::Unknown);
        assert_eq!(
            normalize_interest_frequency(&Value::Null),
            PaymentFrequency::Unknown
        );
        assert_eq!(norm("As per term sheet"), PaymentFrequency::Other);
    }
}
