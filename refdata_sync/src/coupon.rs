//! Coupon-rate field classifier.
//!
//! The raw `COUPON_RATE` field is free text: plain percentages, XIRR quotes,
//! per-investor-category schedules, multi-rate step-ups, reset remarks,
//! benchmark-linked formulas, zero-coupon markers. Classification happens
//! rule by rule, first match wins, and each class decides which numeric
//! tokens (if any) count as rates.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::clean::{normalize_string, numeric_tokens};

static CATEGORY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%?\s+FOR\s+CATEGORY").expect("category regex"));

/// Phrases that mark a benchmark-linked coupon; any numbers alongside these
/// are spreads or caps, not coupon rates, and are discarded.
const LINKED_KEYWORDS: [&str; 8] = [
    "NIFTY",
    "G-SEC",
    "GSEC",
    "UNDERLYING",
    "RBI REPO",
    "INDEX",
    "EQUITY",
    "PERFORMANCE",
];

/// Exact markers for a zero-coupon instrument.
const ZERO_COUPON_MARKERS: [&str; 5] = ["ZERO COUPON", "0", "0%", "0.001", "0.01"];

/// How the raw coupon text was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponClass {
    /// Sentinel / absent value.
    Na,
    /// Yield quoted as XIRR; first number is the yield.
    Xirr,
    /// Different rates per investor category; first number kept as primary.
    CategorySpecific,
    /// Several rates separated by `/` or `,` (step-up schedules).
    MultiRate,
    /// Rate determined by a reset or base-rate mechanism.
    ResetRemark,
    /// Linked to a benchmark or underlying; numbers are not coupon rates.
    Linked,
    /// Zero-coupon instrument.
    ZeroCoupon,
    /// A single plain rate.
    Fixed,
    /// Text we could not make sense of.
    Unknown,
}

impl CouponClass {
    /// Stable tag stored in the `coupon_rate_class` column.
    pub fn as_str(self) -> &'static str {
        match self {
            CouponClass::Na => "na",
            CouponClass::Xirr => "xirr",
            CouponClass::CategorySpecific => "category-specific",
            CouponClass::MultiRate => "multi-rate",
            CouponClass::ResetRemark => "reset-remark",
            CouponClass::Linked => "linked",
            CouponClass::ZeroCoupon => "zero-coupon",
            CouponClass::Fixed => "fixed",
            CouponClass::Unknown => "unknown",
        }
    }
}

/// Classified coupon text: zero or more exact rates plus the class tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRate {
    /// Extracted rates in order of appearance. Empty for classes that carry
    /// no usable number.
    pub rates: Vec<Decimal>,
    /// Which rule matched.
    pub class: CouponClass,
}

impl CouponRate {
    fn new(rates: Vec<Decimal>, class: CouponClass) -> Self {
        Self { rates, class }
    }

    /// The rate stored in the main `coupon_rate_percent` column.
    pub fn primary(&self) -> Option<Decimal> {
        self.rates.first().copied()
    }
}

/// Classifies a raw coupon-rate field.
pub fn parse_coupon_rate(raw: &Value) -> CouponRate {
    let Some(text) = normalize_string(raw) else {
        return CouponRate::new(Vec::new(), CouponClass::Na);
    };
    let upper = text.to_uppercase();

    // "NA" spelled with dots survives normalize_string; catch it here.
    if matches!(upper.replace('.', "").trim(), "-" | "NA") {
        return CouponRate::new(Vec::new(), CouponClass::Na);
    }

    if upper.contains("XIRR") {
        let nums = numeric_tokens(&upper);
        return CouponRate::new(nums.into_iter().take(1).collect(), CouponClass::Xirr);
    }

    if CATEGORY_PATTERN.is_match(&upper) {
        // per-category schedules are not a rate list; keep the first only
        let nums = numeric_tokens(&upper);
        return CouponRate::new(
            nums.into_iter().take(1).collect(),
            CouponClass::CategorySpecific,
        );
    }

    if upper.contains('/') || upper.contains(',') {
        let nums = numeric_tokens(&upper);
        // punctuation with no numbers is prose, not a schedule
        if !nums.is_empty() {
            return CouponRate::new(nums, CouponClass::MultiRate);
        }
    }

    if upper.contains("RESET RATE") || upper.contains("BASE RATE") {
        return CouponRate::new(Vec::new(), CouponClass::ResetRemark);
    }

    if LINKED_KEYWORDS.iter().any(|k| upper.contains(k)) {
        return CouponRate::new(Vec::new(), CouponClass::Linked);
    }

    if ZERO_COUPON_MARKERS.contains(&upper.as_str()) || upper == "ON MATURITY" {
        return CouponRate::new(vec![Decimal::ZERO], CouponClass::ZeroCoupon);
    }

    let nums = numeric_tokens(&upper);
    if let Some(first) = nums.first() {
        return CouponRate::new(vec![*first], CouponClass::Fixed);
    }

    debug!(value = %text, "parse_coupon_rate: unclassifiable input");
    CouponRate::new(Vec::new(), CouponClass::Unknown)
}
