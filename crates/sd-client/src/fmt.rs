//! Display formatting for sale data: deadline rendering, bulk-report lines
//! and the external ticker payload.

use alloy_primitives::U256;
use chrono::DateTime;
use serde_json::Value;

use crate::client::ReportEntry;

/// Render the sale deadline timestamp.
///
/// Zero means the deadline was never configured and renders as the literal
/// `not defined`. Valid timestamps render as `D Mon YYYY HH:MM:SS` (UTC,
/// day unpadded, clock zero-padded). A timestamp outside the calendar range
/// falls back to the raw number.
pub fn format_deadline(timestamp: U256) -> String {
    if timestamp.is_zero() {
        return "not defined".to_owned();
    }
    u64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(i64::try_from(secs).ok()?, 0))
        .map(|dt| dt.format("%-d %b %Y %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// One line of the bulk balance report.
pub fn report_line(entry: &ReportEntry) -> String {
    match &entry.snapshot {
        Ok(snapshot) => format!(
            "address: {}, eth: {}, tokens: {}, whitelisted: {}",
            snapshot.address, snapshot.native, snapshot.tokens, snapshot.whitelisted
        ),
        Err(error) => format!("address: {}, error: {}", entry.address, error),
    }
}

/// Extract the USD price from the ticker payload: an array whose first
/// element carries `price_usd` as a string or a number.
pub fn parse_ticker_price(payload: &Value) -> Option<f64> {
    match payload.as_array()?.first()?.get("price_usd")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BalanceSnapshot;
    use crate::error::ClientError;
    use alloy_primitives::Address;
    use serde_json::json;

    #[test]
    fn zero_deadline_is_not_defined() {
        assert_eq!(format_deadline(U256::ZERO), "not defined");
    }

    #[test]
    fn deadline_renders_calendar_format_with_padded_clock() {
        // 2018-01-01 00:00:00 UTC
        assert_eq!(format_deadline(U256::from(1_514_764_800u64)), "1 Jan 2018 00:00:00");
        // 2018-12-31 23:59:59 UTC
        assert_eq!(format_deadline(U256::from(1_546_300_799u64)), "31 Dec 2018 23:59:59");
        // 2019-06-03 07:08:09 UTC
        assert_eq!(format_deadline(U256::from(1_559_545_689u64)), "3 Jun 2019 07:08:09");
    }

    #[test]
    fn out_of_range_deadline_falls_back_to_the_raw_number() {
        assert_eq!(format_deadline(U256::MAX), U256::MAX.to_string());
    }

    #[test]
    fn report_lines_cover_success_and_failure() {
        let address = Address::repeat_byte(0x11);
        let ok = ReportEntry {
            address,
            snapshot: Ok(BalanceSnapshot {
                address,
                native: "2".to_owned(),
                tokens: "1.5".to_owned(),
                whitelisted: true,
            }),
        };
        assert_eq!(
            report_line(&ok),
            format!("address: {address}, eth: 2, tokens: 1.5, whitelisted: true"),
        );

        let failed = ReportEntry {
            address,
            snapshot: Err(ClientError::NoContract),
        };
        assert_eq!(
            report_line(&failed),
            format!("address: {address}, error: no crowdsale contract address set"),
        );
    }

    #[test]
    fn ticker_price_accepts_string_or_number() {
        assert_eq!(
            parse_ticker_price(&json!([{ "price_usd": "123.45" }])),
            Some(123.45),
        );
        assert_eq!(parse_ticker_price(&json!([{ "price_usd": 99.5 }])), Some(99.5));
        assert_eq!(parse_ticker_price(&json!([])), None);
        assert_eq!(parse_ticker_price(&json!({ "price_usd": 1 })), None);
        assert_eq!(parse_ticker_price(&json!([{ "price_usd": true }])), None);
    }
}
