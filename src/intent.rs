//! Intent classification
//!
//! A fixed, ordered rule list over the normalized message; the first rule
//! whose trigger matches wins. Order matters because the vocabularies
//! overlap ("battery" questions often mention bags, baggage questions
//! mention airlines that are also airport cities). All word triggers are
//! whole-word anchored so that short triggers cannot fire inside
//! unrelated text.

use crate::text::contains_any_word;

/// Closed set of question categories; first applicable wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Liquids,
    PowerBank,
    Baggage,
    LiveFlights,
    AirportLookup,
    Fallback,
}

/// How a rule inspects the message
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any of these, whole-word anchored, anywhere in the message
    AnyWord(&'static [&'static str]),
    /// Message starts with any of these phrases
    Prefix(&'static [&'static str]),
    /// The entity extractor produced at least one airport code
    HasAirportCode,
}

/// One classification rule: a trigger plus the intent it selects
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub intent: Intent,
    pub trigger: Trigger,
}

/// Canonical rule order: Liquids, PowerBank, Baggage, LiveFlights,
/// AirportLookup, then Fallback for everything else.
pub const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Liquids,
        trigger: Trigger::AnyWord(&[
            "liquid", "liquids", "toiletries", "3-1-1", "3 1 1", "100ml", "100 ml",
        ]),
    },
    Rule {
        intent: Intent::PowerBank,
        trigger: Trigger::AnyWord(&[
            "power bank",
            "powerbank",
            "battery",
            "batteries",
            "lithium",
            "mah",
            "wh",
        ]),
    },
    Rule {
        intent: Intent::Baggage,
        trigger: Trigger::AnyWord(&[
            "baggage",
            "bags",
            "luggage",
            "checked bag",
            "carry-on",
            "carry on",
            "carryon",
            "bag fee",
            "allowance",
        ]),
    },
    Rule {
        intent: Intent::LiveFlights,
        trigger: Trigger::Prefix(&["flights from", "flights to"]),
    },
    Rule {
        intent: Intent::AirportLookup,
        trigger: Trigger::HasAirportCode,
    },
    Rule {
        intent: Intent::AirportLookup,
        trigger: Trigger::AnyWord(&["airport", "airports", "iata", "icao"]),
    },
];

impl Rule {
    /// Evaluate this rule in isolation
    pub fn matches(&self, normalized: &str, has_airport_code: bool) -> bool {
        match self.trigger {
            Trigger::AnyWord(words) => contains_any_word(normalized, words),
            Trigger::Prefix(prefixes) => prefixes.iter().any(|p| {
                normalized.starts_with(p)
                    && normalized[p.len()..]
                        .chars()
                        .next()
                        .is_none_or(|c| !c.is_ascii_alphabetic())
            }),
            Trigger::HasAirportCode => has_airport_code,
        }
    }
}

/// Classify a normalized message, given whether the entity extractor found
/// an airport code in it. Returns [`Intent::Fallback`] when no rule fires.
pub fn classify(normalized: &str, has_airport_code: bool) -> Intent {
    for rule in RULES {
        if rule.matches(normalized, has_airport_code) {
            return rule.intent;
        }
    }
    Intent::Fallback
}

/// Pick the flight-board direction from a live-flights message.
///
/// Only meaningful once the LiveFlights rule has matched; the prefix
/// decides the direction.
pub fn flight_direction(normalized: &str) -> crate::flights::Direction {
    if normalized.starts_with("flights to") {
        crate::flights::Direction::Arrivals
    } else {
        crate::flights::Direction::Departures
    }
}
