//! Static catalog of known cities used for local autocomplete filtering.

use std::{fs, path::Path};

use tracing::{debug, warn};

use crate::model::City;

/// Upper bound on the number of suggestions returned by [`Catalog::filter`].
pub const MAX_SUGGESTIONS: usize = 8;

const POPULAR_CITIES: &[(&str, &str)] = &[
    ("London", "United Kingdom"),
    ("Paris", "France"),
    ("New York", "United States"),
    ("Tokyo", "Japan"),
    ("Sydney", "Australia"),
    ("Dubai", "United Arab Emirates"),
    ("Singapore", "Singapore"),
    ("Hong Kong", "China"),
    ("Los Angeles", "United States"),
    ("Chicago", "United States"),
    ("San Francisco", "United States"),
    ("Toronto", "Canada"),
    ("Vancouver", "Canada"),
    ("Mexico City", "Mexico"),
    ("Sao Paulo", "Brazil"),
    ("Rio de Janeiro", "Brazil"),
    ("Buenos Aires", "Argentina"),
    ("Lima", "Peru"),
    ("Bogota", "Colombia"),
    ("Santiago", "Chile"),
    ("Berlin", "Germany"),
    ("Munich", "Germany"),
    ("Madrid", "Spain"),
    ("Barcelona", "Spain"),
    ("Rome", "Italy"),
    ("Milan", "Italy"),
    ("Amsterdam", "Netherlands"),
    ("Brussels", "Belgium"),
    ("Vienna", "Austria"),
    ("Zurich", "Switzerland"),
    ("Stockholm", "Sweden"),
    ("Oslo", "Norway"),
    ("Copenhagen", "Denmark"),
    ("Helsinki", "Finland"),
    ("Dublin", "Ireland"),
    ("Lisbon", "Portugal"),
    ("Athens", "Greece"),
    ("Istanbul", "Turkey"),
    ("Moscow", "Russia"),
    ("Warsaw", "Poland"),
    ("Prague", "Czech Republic"),
    ("Budapest", "Hungary"),
    ("Cairo", "Egypt"),
    ("Lagos", "Nigeria"),
    ("Nairobi", "Kenya"),
    ("Cape Town", "South Africa"),
    ("Johannesburg", "South Africa"),
    ("Mumbai", "India"),
    ("Delhi", "India"),
    ("Bangalore", "India"),
    ("Kolkata", "India"),
    ("Chennai", "India"),
    ("Karachi", "Pakistan"),
    ("Dhaka", "Bangladesh"),
    ("Bangkok", "Thailand"),
    ("Jakarta", "Indonesia"),
    ("Manila", "Philippines"),
    ("Kuala Lumpur", "Malaysia"),
    ("Seoul", "South Korea"),
    ("Beijing", "China"),
    ("Shanghai", "China"),
    ("Osaka", "Japan"),
    ("Melbourne", "Australia"),
    ("Perth", "Australia"),
    ("Auckland", "New Zealand"),
    ("Tehran", "Iran"),
    ("Riyadh", "Saudi Arabia"),
    ("Tel Aviv", "Israel"),
];

/// In-memory list of `(city, country)` pairs, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    cities: Vec<City>,
}

impl Catalog {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// The built-in catalog of well-known cities.
    pub fn popular() -> Self {
        Self::new(POPULAR_CITIES.iter().map(|(name, country)| City::new(*name, *country)).collect())
    }

    /// Parse a JSON array of `{name, country}` objects.
    ///
    /// Malformed data yields an empty catalog rather than an error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<City>>(json) {
            Ok(cities) => Self::new(cities),
            Err(err) => {
                warn!(error = %err, "city catalog is malformed, using an empty catalog");
                Self::default()
            }
        }
    }

    /// Read a catalog file. Unreadable or malformed files yield an empty catalog.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read city catalog");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Case-insensitive substring match against name or country, keeping the
    /// first [`MAX_SUGGESTIONS`] matches in catalog order.
    pub fn filter(&self, query: &str) -> Vec<City> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let matches: Vec<City> = self
            .cities
            .iter()
            .filter(|city| {
                city.name.to_lowercase().contains(&query)
                    || city.country.to_lowercase().contains(&query)
            })
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect();

        debug!(%query, count = matches.len(), "filtered city catalog");
        matches
    }
}
