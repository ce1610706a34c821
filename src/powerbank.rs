//! Power bank capacity parsing and carriage classification
//!
//! Capacity is taken from an explicit watt-hour figure when one is
//! present; otherwise from a milliamp-hour figure and an optional voltage
//! (3.7 V by default). The limits are the FAA lithium-battery carriage
//! rules: 100 Wh without approval, 160 Wh with airline approval, nothing
//! above that on passenger aircraft.

use regex::Regex;
use std::sync::LazyLock;

/// FAA lithium-battery guidance used as the citation for every verdict
pub const FAA_LITHIUM_URL: &str = "https://www.faa.gov/hazmat/packsafe/lithium-batteries";

static WH_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)\s*wh\b").expect("valid wh pattern"));
static MAH_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)\s*mah\b").expect("valid mah pattern"));
static VOLT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)\s*v\b").expect("valid volt pattern"));

const DEFAULT_VOLTAGE: f64 = 3.7;

/// A parsed battery capacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    /// Energy in watt-hours, explicit or derived
    pub watt_hours: f64,
    /// Voltage used for the mAh conversion; None when Wh was explicit
    pub voltage: Option<f64>,
}

/// Carriage verdict for a capacity value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarriageClass {
    /// At most 100 Wh
    AllowedCarryOn,
    /// Above 100 Wh up to 160 Wh
    AirlineApprovalRequired,
    /// Above 160 Wh
    Forbidden,
}

impl CarriageClass {
    /// Human wording of the verdict
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        match self {
            CarriageClass::AllowedCarryOn => {
                "Allowed in carry-on without airline approval (no checked baggage)."
            }
            CarriageClass::AirlineApprovalRequired => {
                "Carry-on allowed with airline approval (no checked baggage)."
            }
            CarriageClass::Forbidden => "Not allowed for passenger aircraft (exceeds 160 Wh).",
        }
    }
}

/// Parse a battery capacity out of free text.
///
/// An explicit Wh value wins; otherwise a mAh value combined with an
/// optional voltage. Returns None when neither unit parses, in which case
/// the caller falls back to the generic regulatory summary.
pub fn parse_capacity(text: &str) -> Option<Capacity> {
    let t = text.to_lowercase().replace(',', " ");

    if let Some(caps) = WH_VALUE.captures(&t) {
        let watt_hours: f64 = caps[1].parse().ok()?;
        return Some(Capacity {
            watt_hours,
            voltage: None,
        });
    }

    if let Some(caps) = MAH_VALUE.captures(&t) {
        let milliamp_hours: f64 = caps[1].parse().ok()?;
        let voltage = VOLT_VALUE
            .captures(&t)
            .and_then(|v| v[1].parse().ok())
            .unwrap_or(DEFAULT_VOLTAGE);
        return Some(Capacity {
            watt_hours: (milliamp_hours / 1000.0) * voltage,
            voltage: Some(voltage),
        });
    }

    None
}

/// Classify a watt-hour value against the carriage limits
#[must_use]
pub fn classify(watt_hours: f64) -> CarriageClass {
    if watt_hours <= 100.0 {
        CarriageClass::AllowedCarryOn
    } else if watt_hours <= 160.0 {
        CarriageClass::AirlineApprovalRequired
    } else {
        CarriageClass::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn mah_with_default_voltage() {
        let cap = parse_capacity("is 20000mAh allowed").unwrap();
        assert!((cap.watt_hours - 74.0).abs() < 1e-9);
        assert_eq!(cap.voltage, Some(3.7));
        assert_eq!(classify(cap.watt_hours), CarriageClass::AllowedCarryOn);
    }

    #[test]
    fn explicit_wh_wins_over_mah() {
        let cap = parse_capacity("99 wh or 50000 mah, whichever").unwrap();
        assert_eq!(cap.watt_hours, 99.0);
        assert_eq!(cap.voltage, None);
    }

    #[test]
    fn mah_with_explicit_voltage() {
        let cap = parse_capacity("10000 mah at 5 v").unwrap();
        assert!((cap.watt_hours - 50.0).abs() < 1e-9);
        assert_eq!(cap.voltage, Some(5.0));
    }

    #[test]
    fn oversized_pack_is_forbidden() {
        let cap = parse_capacity("500 Wh battery").unwrap();
        assert_eq!(cap.watt_hours, 500.0);
        assert_eq!(classify(cap.watt_hours), CarriageClass::Forbidden);
    }

    #[rstest]
    #[case(100.0, CarriageClass::AllowedCarryOn)]
    #[case(100.1, CarriageClass::AirlineApprovalRequired)]
    #[case(160.0, CarriageClass::AirlineApprovalRequired)]
    #[case(160.1, CarriageClass::Forbidden)]
    fn boundary_values(#[case] wh: f64, #[case] expected: CarriageClass) {
        assert_eq!(classify(wh), expected);
    }

    #[test]
    fn no_numeric_value_found() {
        assert_eq!(parse_capacity("can i bring my power bank"), None);
        // "wh" alone carries no number
        assert_eq!(parse_capacity("how many wh are allowed"), None);
    }

    #[test]
    fn decimal_values_parse() {
        let cap = parse_capacity("99.9wh pack").unwrap();
        assert!((cap.watt_hours - 99.9).abs() < 1e-9);
    }
}
