//! Airline alias table and baggage-policy resolver
//!
//! The table is compiled into the process. Multi-word aliases are checked
//! strictly before single-word ones so that "air canada" can never be
//! shadowed by a short alias occurring inside it; single-word aliases are
//! whole-word anchored so "aa" does not fire inside unrelated words.

use crate::text::contains_word;

/// Two-letter codes that double as common English words. These only
/// match as the leading word of the message ("AS baggage"), mirroring
/// the stop-list treatment of code tokens in [`crate::text`]; anywhere
/// else they are overwhelmingly prose ("counts as carry-on").
const AMBIGUOUS_ALIASES: &[&str] = &["as"];

/// One alias mapping to a canonical airline and its baggage policy page
#[derive(Debug, Clone, Copy)]
pub struct AirlineAlias {
    pub alias: &'static str,
    pub name: &'static str,
    pub baggage_url: &'static str,
}

/// A resolved airline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Airline {
    pub name: &'static str,
    pub baggage_url: &'static str,
}

const AA_URL: &str = "https://www.aa.com/i18n/travel-info/baggage/baggage.jsp";
const DL_URL: &str = "https://www.delta.com/traveling-with-us/baggage";
const UA_URL: &str = "https://www.united.com/en/us/fly/travel/baggage.html";
const WN_URL: &str = "https://www.southwest.com/help/baggage";
const AS_URL: &str = "https://www.alaskaair.com/travel-info/baggage/overview";
const B6_URL: &str = "https://www.jetblue.com/help/baggage";
const AC_URL: &str = "https://www.aircanada.com/ca/en/aco/home/plan/baggage.html";
const BA_URL: &str = "https://www.britishairways.com/en-us/information/baggage-essentials";
const LH_URL: &str = "https://www.lufthansa.com/us/en/baggage-overview";
const EK_URL: &str = "https://www.emirates.com/us/english/before-you-fly/baggage/";
const QR_URL: &str = "https://www.qatarairways.com/en-us/baggage/allowance.html";
const SQ_URL: &str = "https://www.singaporeair.com/en_UK/us/travel-info/baggage/";

/// Multi-word aliases, evaluated before anything in [`SINGLE_WORD_ALIASES`]
pub const MULTI_WORD_ALIASES: &[AirlineAlias] = &[
    AirlineAlias {
        alias: "air canada",
        name: "Air Canada",
        baggage_url: AC_URL,
    },
    AirlineAlias {
        alias: "british airways",
        name: "British Airways",
        baggage_url: BA_URL,
    },
];

/// Single-word aliases: display names first, then the two-letter codes
pub const SINGLE_WORD_ALIASES: &[AirlineAlias] = &[
    AirlineAlias {
        alias: "american",
        name: "American Airlines",
        baggage_url: AA_URL,
    },
    AirlineAlias {
        alias: "delta",
        name: "Delta Air Lines",
        baggage_url: DL_URL,
    },
    AirlineAlias {
        alias: "united",
        name: "United Airlines",
        baggage_url: UA_URL,
    },
    AirlineAlias {
        alias: "southwest",
        name: "Southwest Airlines",
        baggage_url: WN_URL,
    },
    AirlineAlias {
        alias: "alaska",
        name: "Alaska Airlines",
        baggage_url: AS_URL,
    },
    AirlineAlias {
        alias: "jetblue",
        name: "JetBlue",
        baggage_url: B6_URL,
    },
    AirlineAlias {
        alias: "lufthansa",
        name: "Lufthansa",
        baggage_url: LH_URL,
    },
    AirlineAlias {
        alias: "emirates",
        name: "Emirates",
        baggage_url: EK_URL,
    },
    AirlineAlias {
        alias: "qatar",
        name: "Qatar Airways",
        baggage_url: QR_URL,
    },
    AirlineAlias {
        alias: "singapore",
        name: "Singapore Airlines",
        baggage_url: SQ_URL,
    },
    AirlineAlias {
        alias: "aa",
        name: "American Airlines",
        baggage_url: AA_URL,
    },
    AirlineAlias {
        alias: "dl",
        name: "Delta Air Lines",
        baggage_url: DL_URL,
    },
    AirlineAlias {
        alias: "ua",
        name: "United Airlines",
        baggage_url: UA_URL,
    },
    AirlineAlias {
        alias: "wn",
        name: "Southwest Airlines",
        baggage_url: WN_URL,
    },
    AirlineAlias {
        alias: "as",
        name: "Alaska Airlines",
        baggage_url: AS_URL,
    },
    AirlineAlias {
        alias: "b6",
        name: "JetBlue",
        baggage_url: B6_URL,
    },
    AirlineAlias {
        alias: "ac",
        name: "Air Canada",
        baggage_url: AC_URL,
    },
    AirlineAlias {
        alias: "ba",
        name: "British Airways",
        baggage_url: BA_URL,
    },
    AirlineAlias {
        alias: "lh",
        name: "Lufthansa",
        baggage_url: LH_URL,
    },
    AirlineAlias {
        alias: "ek",
        name: "Emirates",
        baggage_url: EK_URL,
    },
    AirlineAlias {
        alias: "qr",
        name: "Qatar Airways",
        baggage_url: QR_URL,
    },
    AirlineAlias {
        alias: "sq",
        name: "Singapore Airlines",
        baggage_url: SQ_URL,
    },
];

/// Resolve an airline from normalized text.
///
/// Returns None when nothing matches; the caller should then prompt the
/// user to name an airline.
pub fn resolve(normalized: &str) -> Option<Airline> {
    for entry in MULTI_WORD_ALIASES {
        if normalized.contains(entry.alias) {
            return Some(Airline {
                name: entry.name,
                baggage_url: entry.baggage_url,
            });
        }
    }

    for entry in SINGLE_WORD_ALIASES {
        let hit = if AMBIGUOUS_ALIASES.contains(&entry.alias) {
            leads_message(normalized, entry.alias)
        } else {
            contains_word(normalized, entry.alias)
        };
        if hit {
            return Some(Airline {
                name: entry.name,
                baggage_url: entry.baggage_url,
            });
        }
    }

    None
}

/// Whether the alias is the first whole word of the message
fn leads_message(normalized: &str, alias: &str) -> bool {
    normalized.strip_prefix(alias).is_some_and(|rest| {
        rest.chars().next().is_none_or(|c| !c.is_ascii_alphabetic())
    })
}
