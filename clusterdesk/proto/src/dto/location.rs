use serde::{Deserialize, Serialize};

use crate::de::int_or_string;

pub type LocationId = i64;

/// A country, state or city as served by the backend. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationNode {
    #[serde(deserialize_with = "int_or_string")]
    pub id: LocationId,
    pub name: String,
}

impl LocationNode {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// `GET /countries`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountriesResponse {
    #[serde(default)]
    pub countries: Vec<LocationNode>,
}

/// `GET /states/{countryId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub states: Vec<LocationNode>,
}

/// `GET /cities/{stateId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitiesResponse {
    #[serde(default)]
    pub cities: Vec<LocationNode>,
}
