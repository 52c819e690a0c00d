//! City-name enrichment for free-text stock searches.

/// Known cities and the phrase that replaces them, so searches land in the
/// right country.
const CITY_CONTEXT: &[(&str, &str)] = &[
    ("belfast", "Belfast Northern Ireland"),
    ("dublin", "Dublin Ireland"),
    ("amsterdam", "Amsterdam Netherlands Holland"),
    ("paris", "Paris France"),
    ("london", "London England United Kingdom"),
    ("rome", "Rome Italy"),
    ("barcelona", "Barcelona Spain"),
    ("lisbon", "Lisbon Portugal"),
    ("prague", "Prague Czech Republic"),
    ("vienna", "Vienna Austria"),
    ("berlin", "Berlin Germany"),
    ("munich", "Munich Germany Bavaria"),
    ("brussels", "Brussels Belgium"),
    ("copenhagen", "Copenhagen Denmark"),
    ("stockholm", "Stockholm Sweden"),
    ("oslo", "Oslo Norway"),
    ("helsinki", "Helsinki Finland"),
    ("reykjavik", "Reykjavik Iceland"),
    ("edinburgh", "Edinburgh Scotland"),
    ("glasgow", "Glasgow Scotland"),
    ("cork", "Cork Ireland"),
    ("galway", "Galway Ireland"),
    ("new york", "New York City USA Manhattan"),
    ("los angeles", "Los Angeles California USA"),
    ("tokyo", "Tokyo Japan"),
    ("sydney", "Sydney Australia"),
    ("bangkok", "Bangkok Thailand"),
    ("singapore", "Singapore city"),
    ("hong kong", "Hong Kong China"),
    ("dubai", "Dubai UAE Emirates"),
];

/// Replaces the first known city in `query` with its country-qualified form,
/// unless the query already mentions one of the added words.
pub fn enhance(query: &str) -> String {
    let query = query.trim();
    let lower = query.to_ascii_lowercase();

    for (city, enhanced) in CITY_CONTEXT {
        let Some(at) = lower.find(city) else {
            continue;
        };
        let already_qualified = enhanced
            .to_ascii_lowercase()
            .split_whitespace()
            .any(|word| word.len() > 3 && word != *city && lower.contains(word));
        if already_qualified {
            continue;
        }
        return format!("{}{}{}", &query[..at], enhanced, &query[at + city.len()..]);
    }
    query.to_string()
}

#[cfg(test)]
mod tests {
    use super::enhance;

    #[test]
    fn adds_country_to_known_city() {
        assert_eq!(enhance("paris"), "Paris France");
        assert_eq!(enhance("  Dublin harbour "), "Dublin Ireland harbour");
    }

    #[test]
    fn leaves_qualified_queries_alone() {
        assert_eq!(enhance("Paris France night"), "Paris France night");
        assert_eq!(enhance("new york manhattan"), "new york manhattan");
    }

    #[test]
    fn unknown_places_pass_through() {
        assert_eq!(enhance("Faroe Islands"), "Faroe Islands");
    }
}
