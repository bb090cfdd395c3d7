//! US state name to postal abbreviation mappings.
//!
//! Covers the 50 US states + DC.

/// `(full name, postal abbreviation)` pairs for the 50 states + DC, in
/// alphabetical order by name.
pub const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Maps a full state name to its two-letter postal abbreviation.
///
/// Names outside [`STATES`] fall back to their first two characters,
/// upper-cased, so that every row still gets a short label.
#[must_use]
pub fn state_abbr(name: &str) -> String {
    STATES
        .iter()
        .find(|(state, _)| *state == name)
        .map_or_else(
            || name.chars().take(2).collect::<String>().to_uppercase(),
            |(_, abbr)| (*abbr).to_owned(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_count() {
        assert_eq!(STATES.len(), 51);
    }

    #[test]
    fn names_are_sorted() {
        let mut sorted: Vec<&str> = STATES.iter().map(|(name, _)| *name).collect();
        sorted.sort_unstable();
        let names: Vec<&str> = STATES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_known_state_maps_to_its_code() {
        for (name, abbr) in STATES {
            assert_eq!(state_abbr(name), *abbr, "wrong code for {name}");
        }
    }

    #[test]
    fn codes_are_unique_two_letter_uppercase() {
        let mut codes: Vec<&str> = STATES.iter().map(|(_, abbr)| *abbr).collect();
        assert!(
            codes
                .iter()
                .all(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_uppercase()))
        );
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), STATES.len());
    }

    #[test]
    fn unknown_name_falls_back_to_prefix() {
        assert_eq!(state_abbr("Puerto Rico"), "PU");
        assert_eq!(state_abbr("x"), "X");
        assert_eq!(state_abbr(""), "");
    }
}
