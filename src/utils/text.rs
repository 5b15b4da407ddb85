//! City name normalization and display formatting.

/// City used when the request does not name one.
pub const DEFAULT_CITY: &str = "san francisco";

/// Normalize a raw city parameter into a cache key.
///
/// Trims surrounding whitespace and lower-cases. Missing or blank input
/// falls back to [`DEFAULT_CITY`].
pub fn normalize_city(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(city) if !city.is_empty() => city.to_lowercase(),
        _ => DEFAULT_CITY.to_string(),
    }
}

/// Title-case a city name for display.
///
/// A letter directly after a non-letter is upper-cased, every other letter
/// is lower-cased, so `"new york-city"` becomes `"New York-City"` and
/// `"o'hare"` becomes `"O'Hare"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }

    out
}
