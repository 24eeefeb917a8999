use crate::article::Location;
use crate::config::LocationConfig;
use regex::Regex;
use std::sync::LazyLock;

const SOURCE_TYPE_CLAUSE: &str = "stp:Newspaper|Web-Only+Source!Multiple Source Types (2)";
const CONTINENT_CLAUSE: &str = "continent:North+America!North+America";
const LANGUAGE_CLAUSE: &str = "language:English!English";

static COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"country:([^!]+)!").expect("country pattern"));
static CITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"city:([^!]+)!").expect("city pattern"));
static CITY_STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\s+\(([A-Z]{2})\)").expect("city/state pattern"));

/// Builds the slash-delimited location filter (`t` parameter)
///
/// Source type, continent and language clauses are fixed parts of the
/// site's filter grammar. Country is included when set; the city clause
/// requires both city and state.
pub fn build_location_filter(location: &LocationConfig) -> String {
    let mut parts = Vec::with_capacity(5);

    let country = location.country.trim();
    if !country.is_empty() {
        parts.push(format!("country:{}!{}", country, urlencoding::encode(country)));
    }

    parts.push(SOURCE_TYPE_CLAUSE.to_string());
    parts.push(CONTINENT_CLAUSE.to_string());

    let city = location.city.trim();
    let state = location.state.trim();
    if !city.is_empty() && !state.is_empty() {
        let city_state = format!("{} ({})", city, state);
        parts.push(format!(
            "city:{}!{}",
            city_state,
            urlencoding::encode(&city_state)
        ));
    }

    parts.push(LANGUAGE_CLAUSE.to_string());

    parts.join("/")
}

/// Recovers the run's location from a compiled location filter
///
/// `+` is read as a space. A city clause containing `City (ST)` is split
/// into city and two-letter state, ignoring anything after the state;
/// any other shape is taken as the city.
pub fn parse_location_filter(filter: &str) -> Location {
    let mut location = Location::default();

    if let Some(caps) = COUNTRY_RE.captures(filter) {
        location.country = caps[1].replace('+', " ");
    }

    if let Some(caps) = CITY_RE.captures(filter) {
        let city_state = caps[1].replace('+', " ");
        match CITY_STATE_RE.captures(&city_state) {
            Some(parts) => {
                location.city = parts[1].to_string();
                location.state = parts[2].to_string();
            }
            None => location.city = city_state,
        }
    }

    location
}
