//! `security_detail_info` mapper: the long tail of instrument attributes.
//!
//! Column order and the truncation widths mirror the destination DDL; a
//! width is only applied where the destination column is narrower than the
//! default TEXT.

use docstore::Document;

use crate::record::{FieldValue, Record, RecordBuilder};

use super::seal;

/// Builds the detail-info row from the `isin_detailed_info` document.
pub fn map_detail_info(isin: &str, doc: &Document) -> Record {
    let rec = RecordBuilder::new(doc)
        .set("isin_code", FieldValue::Text(isin.to_string()))
        .date("nse_date_of_listing", "NSE_DATE_OF_LISTING")
        .date("closing_date", "CLOSING_DATE")
        .string_max("series", "SERIES", 100)
        .decimal("paid_up_value_rs", "PAID_UP_VALUE_RS")
        .date("issue_date", "ISSUE_DATE")
        .date("listing_date", "LISTING_DATE")
        .date("allotment_date", "ALLOTMENT_DATE")
        .string_max("coupon_type", "COUPON_TYPE", 100)
        .string_max("day_count_convention", "DAY_COUNT_CONVENTION", 100)
        .string("security_collateral", "SECURITY_COLLATERAL")
        .string_max("tax_category", "TAX_CATEGORY", 50)
        .date("call_option_date", "CALL_OPTION_DATE")
        .date("put_option_date", "PUT_OPTION_DATE")
        .string_max("primary_exchange", "PRIMARY_EXCHANGE", 50)
        .string_max("secondary_exchange", "SECONDARY_EXCHANGE", 50)
        .string_max("listed_unlisted", "LISTED_UNLISTED", 50)
        .string_max("listing_exchanges", "LISTING_EXCHANGES", 255)
        .string_max("trading_status", "TRADING_STATUS", 100)
        .integer("market_lot", "MARKET_LOT")
        .string_max("settlement_cycle", "SETTLEMENT_CYCLE", 100)
        .decimal("last_traded_price_rs", "LAST_TRADED_PRICE_RS")
        .date("last_traded_date", "LAST_TRADED_DATE")
        .integer("volume_traded", "VOLUME_TRADED")
        .decimal("value_traded_lakhs", "VALUE_TRADED_LAKHS")
        .integer("number_of_trades", "NUMBER_OF_TRADES")
        .decimal("weighted_avg_price_rs", "WEIGHTED_AVG_PRICE_RS")
        .percent("weighted_avg_yield_percent", "WEIGHTED_AVG_YIELD_PERCENT")
        .percent("current_yield_percent", "CURRENT_YIELD_PERCENT")
        .decimal("duration_years", "DURATION_YEARS")
        .decimal("convexity", "CONVEXITY")
        .integer("demat_requests_pending", "DEMAT_REQUESTS_PENDING")
        .boolean("services_stopped", "SERVICES_STOPPED")
        .integer("no_of_bonds_ncd", "NO_OF_BONDS_NCD")
        .string_max("benefit_under_section", "BENEFIT_UNDER_SECTION", 255)
        .boolean("basel_compliant", "BASEL_COMPLIANT")
        .string_max("lock_in_period", "LOCK_IN_PERIOD", 100)
        .string("use_of_proceeds", "USE_OF_PROCEEDS")
        .string_max("seniority", "SENIORITY", 255)
        .string("redemption", "REDEMPTION")
        .date("opening_date", "OPENING_DATE")
        .date("bse_date_of_listing", "BSE_DATE_OF_LISTING")
        .string("pricing_method", "PRICING_METHOD")
        .integer("due_for_maturity", "DUE_FOR_MATURITY")
        .string_max("compounding_frequency", "COMPOUNDING_FREQUENCY", 100)
        .string("interest_payment_dates", "INTEREST_PAYMENT_DATES")
        .string_max(
            "interest_payment_day_convention",
            "INTEREST_PAYMENT_DAY_CONVENTION",
            100,
        )
        .string("payment_schedule", "PAYMENT_SCHEDULE")
        .string_max("redemption_premium", "REDEMPTION_PREMIUM", 255)
        .boolean("call_option", "CALL_OPTION")
        .string_max("call_notification_period", "CALL_NOTIFICATION_PERIOD", 255)
        .boolean("put_option", "PUT_OPTION")
        .string_max("put_notification_period", "PUT_NOTIFICATION_PERIOD", 255)
        .string_max("buyback_option", "BUYBACK_OPTION", 100)
        .boolean("secured", "SECURED")
        .string_max("liquidation_status", "LIQUIDATION_STATUS", 255)
        .string_max("record_date_day_convention", "RECORD_DATE_DAY_CONVENTION", 255)
        .string_max(
            "redemption_payment_day_convention",
            "REDEMPTION_PAYMENT_DAY_CONVENTION",
            255,
        )
        .string("reset_details", "RESET_DETAILS")
        .boolean("transferable", "TRANSFERABLE")
        .boolean("greenshoe_option", "GREENSHOE_OPTION")
        .decimal("oversubscription_multiple", "OVERSUBSCRIPTION_MULTIPLE")
        .percent("percentage_sold_cumulative", "PERCENTAGE_SOLD_CUMULATIVE")
        .finish();
    seal(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_flags_dates_and_widths() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("ALLOTMENT_DATE", json!("15-06-2020")),
            ("CALL_OPTION", json!("Yes")),
            ("PUT_OPTION", json!("No")),
            ("SECURED", json!("-")),
            ("MARKET_LOT", json!("10.0")),
            ("TAX_CATEGORY", json!("A".repeat(80))),
        ]);
        let rec = map_detail_info("INE001A01036", &doc);

        assert!(matches!(rec.get("allotment_date"), Some(FieldValue::Date(_))));
        assert_eq!(rec.get("call_option"), Some(&FieldValue::Boolean(true)));
        assert_eq!(rec.get("put_option"), Some(&FieldValue::Boolean(false)));
        assert!(rec.get("secured").unwrap().is_null());
        assert_eq!(rec.get("market_lot"), Some(&FieldValue::Integer(10)));
        assert_eq!(rec.as_text("tax_category").unwrap().len(), 50);
    }

    #[test]
    fn every_declared_column_is_present_even_when_source_is_sparse() {
        let doc = Document::from_iter([("ISIN_CODE", json!("INE001A01036"))]);
        let rec = map_detail_info("INE001A01036", &doc);
        for col in ["series", "convexity", "reset_details", "data_hash", "last_updated"] {
            assert!(rec.get(col).is_some(), "missing column {col}");
        }
    }
}
