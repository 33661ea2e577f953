//! Diesel table definitions for the destination schema.
//!
//! Decimals, dates and timestamps are stored as TEXT (canonical decimal
//! string / ISO-8601); flags are BOOLEAN; counts are BIGINT. Surrogate keys
//! (`company_id`, `rta_id`) are SQLite rowid-backed integers.

diesel::table! {
    security_master (isin_code) {
        isin_code -> Text,
        security_name -> Nullable<Text>,
        security_type -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    company_info (company_id) {
        company_id -> Integer,
        issuer_name -> Text,
        issuer_address -> Nullable<Text>,
        issuer_type -> Nullable<Text>,
        issuer_state -> Nullable<Text>,
        issuer_website -> Nullable<Text>,
        contact_person -> Nullable<Text>,
        phone_number -> Nullable<Text>,
        fax_number -> Nullable<Text>,
        email_id -> Nullable<Text>,
        guaranteed_by -> Nullable<Text>,
        registrar -> Nullable<Text>,
        industry_group -> Nullable<Text>,
        macro_sector -> Nullable<Text>,
        micro_industry -> Nullable<Text>,
        product_service_activity -> Nullable<Text>,
        sector -> Nullable<Text>,
        security_code -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    security_basic_info (isin_code) {
        isin_code -> Text,
        security_type -> Nullable<Text>,
        isin_description -> Nullable<Text>,
        issue_description -> Nullable<Text>,
        former_name -> Nullable<Text>,
        coupon_rate_raw -> Nullable<Text>,
        coupon_rate_percent -> Nullable<Text>,
        coupon_rates_all -> Nullable<Text>,
        coupon_rate_class -> Nullable<Text>,
        maturity_date -> Nullable<Text>,
        ytm_percent -> Nullable<Text>,
        tenure_years -> Nullable<BigInt>,
        tenure_months -> Nullable<BigInt>,
        tenure_days -> Nullable<BigInt>,
        minimum_investment_rs -> Nullable<Text>,
        interest_frequency_raw -> Nullable<Text>,
        interest_frequency -> Nullable<Text>,
        face_value_rs -> Nullable<Text>,
        percentage_sold -> Nullable<Text>,
        isin_status -> Nullable<Text>,
        issue_size_lakhs -> Nullable<Text>,
        bse_scrip_code -> Nullable<Text>,
        nse_symbol -> Nullable<Text>,
        issue_date -> Nullable<Text>,
        first_interest_payment_date -> Nullable<Text>,
        mode_of_issuance -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    security_detail_info (isin_code) {
        isin_code -> Text,
        nse_date_of_listing -> Nullable<Text>,
        closing_date -> Nullable<Text>,
        series -> Nullable<Text>,
        paid_up_value_rs -> Nullable<Text>,
        issue_date -> Nullable<Text>,
        listing_date -> Nullable<Text>,
        allotment_date -> Nullable<Text>,
        coupon_type -> Nullable<Text>,
        day_count_convention -> Nullable<Text>,
        security_collateral -> Nullable<Text>,
        tax_category -> Nullable<Text>,
        call_option_date -> Nullable<Text>,
        put_option_date -> Nullable<Text>,
        primary_exchange -> Nullable<Text>,
        secondary_exchange -> Nullable<Text>,
        listed_unlisted -> Nullable<Text>,
        listing_exchanges -> Nullable<Text>,
        trading_status -> Nullable<Text>,
        market_lot -> Nullable<BigInt>,
        settlement_cycle -> Nullable<Text>,
        last_traded_price_rs -> Nullable<Text>,
        last_traded_date -> Nullable<Text>,
        volume_traded -> Nullable<BigInt>,
        value_traded_lakhs -> Nullable<Text>,
        number_of_trades -> Nullable<BigInt>,
        weighted_avg_price_rs -> Nullable<Text>,
        weighted_avg_yield_percent -> Nullable<Text>,
        current_yield_percent -> Nullable<Text>,
        duration_years -> Nullable<Text>,
        convexity -> Nullable<Text>,
        demat_requests_pending -> Nullable<BigInt>,
        services_stopped -> Nullable<Bool>,
        no_of_bonds_ncd -> Nullable<BigInt>,
        benefit_under_section -> Nullable<Text>,
        basel_compliant -> Nullable<Bool>,
        lock_in_period -> Nullable<Text>,
        use_of_proceeds -> Nullable<Text>,
        seniority -> Nullable<Text>,
        redemption -> Nullable<Text>,
        opening_date -> Nullable<Text>,
        bse_date_of_listing -> Nullable<Text>,
        pricing_method -> Nullable<Text>,
        due_for_maturity -> Nullable<BigInt>,
        compounding_frequency -> Nullable<Text>,
        interest_payment_dates -> Nullable<Text>,
        interest_payment_day_convention -> Nullable<Text>,
        payment_schedule -> Nullable<Text>,
        redemption_premium -> Nullable<Text>,
        call_option -> Nullable<Bool>,
        call_notification_period -> Nullable<Text>,
        put_option -> Nullable<Bool>,
        put_notification_period -> Nullable<Text>,
        buyback_option -> Nullable<Text>,
        secured -> Nullable<Bool>,
        liquidation_status -> Nullable<Text>,
        record_date_day_convention -> Nullable<Text>,
        redemption_payment_day_convention -> Nullable<Text>,
        reset_details -> Nullable<Text>,
        transferable -> Nullable<Bool>,
        greenshoe_option -> Nullable<Bool>,
        oversubscription_multiple -> Nullable<Text>,
        percentage_sold_cumulative -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    registrar_info (rta_id) {
        rta_id -> Integer,
        rta_name -> Text,
        rta_bp_id -> Nullable<Text>,
        rta_address -> Nullable<Text>,
        rta_contact_person -> Nullable<Text>,
        rta_phone -> Nullable<Text>,
        rta_fax -> Nullable<Text>,
        rta_email -> Nullable<Text>,
        arrangers -> Nullable<Text>,
        trustee -> Nullable<Text>,
        im_term_sheet -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    security_company_map (id) {
        id -> Nullable<Integer>,
        isin_code -> Text,
        company_id -> Integer,
        primary_company -> Bool,
        mapped_on -> Nullable<Text>,
    }
}

diesel::table! {
    security_registrar_map (id) {
        id -> Nullable<Integer>,
        isin_code -> Text,
        rta_id -> Integer,
        effective_from -> Text,
        effective_to -> Nullable<Text>,
        mapped_on -> Nullable<Text>,
    }
}

diesel::table! {
    credit_ratings (id) {
        id -> Nullable<Integer>,
        isin_code -> Text,
        rating_agency -> Text,
        rating_value -> Text,
        rating_date -> Nullable<Text>,
        outlook -> Nullable<Text>,
        data_hash -> Nullable<Text>,
        last_updated -> Nullable<Text>,
    }
}

diesel::table! {
    migration_failures (id) {
        id -> Nullable<Integer>,
        isin_code -> Nullable<Text>,
        stage -> Text,
        error_message -> Text,
        logged_at -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    security_master,
    company_info,
    security_basic_info,
    security_detail_info,
    registrar_info,
    security_company_map,
    security_registrar_map,
    credit_ratings,
    migration_failures,
);
