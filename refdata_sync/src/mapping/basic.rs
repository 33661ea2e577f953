//! `security_basic_info` mapper: headline terms of the instrument.

use docstore::Document;

use crate::coupon::parse_coupon_rate;
use crate::frequency::normalize_interest_frequency;
use crate::record::{FieldValue, Record, RecordBuilder};

use super::seal;

/// Builds the basic-info row from the `isin_basic_info` document.
///
/// The free-text coupon field fans out into four columns: the raw text, the
/// primary rate, every extracted rate joined with `/`, and the class tag.
/// The payment frequency likewise keeps raw text next to the canonical
/// value.
pub fn map_basic_info(isin: &str, doc: &Document) -> Record {
    let coupon = parse_coupon_rate(&doc.get("COUPON_RATE_PERCENT").cloned().unwrap_or_default());
    let rates_all = if coupon.rates.is_empty() {
        None
    } else {
        Some(
            coupon
                .rates
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("/"),
        )
    };
    let frequency =
        normalize_interest_frequency(&doc.get("INTEREST_PAYMENT_FREQUENCY").cloned().unwrap_or_default());

    let rec = RecordBuilder::new(doc)
        .set("isin_code", FieldValue::Text(isin.to_string()))
        .string("security_type", "SECURITY_TYPE")
        .string("isin_description", "ISIN_DESCRIPTION")
        .string("issue_description", "ISSUE_DESCRIPTION")
        .string("former_name", "FORMER_NAME")
        .string("coupon_rate_raw", "COUPON_RATE_PERCENT")
        .set("coupon_rate_percent", coupon.primary())
        .set("coupon_rates_all", rates_all)
        .set(
            "coupon_rate_class",
            FieldValue::Text(coupon.class.as_str().to_string()),
        )
        .date("maturity_date", "MATURITY_DATE")
        .percent("ytm_percent", "YTM_PERCENT")
        .integer("tenure_years", "TENURE_YEARS")
        .integer("tenure_months", "TENURE_MONTHS")
        .integer("tenure_days", "TENURE_DAYS")
        .decimal("minimum_investment_rs", "MINIMUM_INVESTMENT_RS")
        .string("interest_frequency_raw", "INTEREST_PAYMENT_FREQUENCY")
        .set(
            "interest_frequency",
            FieldValue::Text(frequency.as_str().to_string()),
        )
        .decimal("face_value_rs", "FACE_VALUE_RS")
        .percent("percentage_sold", "PERCENTAGE_SOLD")
        .string("isin_status", "ISIN_STATUS")
        .decimal("issue_size_lakhs", "ISSUE_SIZE_LAKHS")
        .string("bse_scrip_code", "BSE_SCRIP_CODE")
        .string("nse_symbol", "NSE_SYMBOL")
        .date("issue_date", "ISSUE_DATE")
        .date("first_interest_payment_date", "FIRST_INTEREST_PAYMENT_DATE")
        .string("mode_of_issuance", "MODE_OF_ISSUANCE")
        .finish();
    seal(rec)
}
