//! Typed trip metadata.
//!
//! Upstream trip data names the same field differently depending on where it
//! came from. Each field below has an ordered synonym list; the first key with
//! a non-empty value wins, and resolution happens once while deserializing.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub const MAX_STARS: u8 = 5;

const HOTEL_NAME: &[&str] = &["name", "title"];
const HOTEL_STARS: &[&str] = &["stars", "starRating"];
const HOTEL_CHECK_IN: &[&str] = &["checkIn", "startDate"];
const HOTEL_CHECK_OUT: &[&str] = &["checkOut", "endDate"];
const HOTEL_NIGHTS: &[&str] = &["nights", "nightsCount"];
const HOTEL_LOCATION: &[&str] = &["city", "location", "destination", "cityOrLocationLabel"];

const FLIGHT_AIRLINE: &[&str] = &["airline", "carrier"];
const FLIGHT_NUMBER: &[&str] = &["flightNumber", "number"];
const FLIGHT_DEPARTURE: &[&str] = &["departureTime", "departure"];
const FLIGHT_ARRIVAL: &[&str] = &["arrivalTime", "arrival"];
const FLIGHT_ORIGIN: &[&str] = &["from", "origin"];
const FLIGHT_DESTINATION: &[&str] = &["to", "destination"];

const DESTINATION_NAME: &[&str] = &["name", "title", "city"];
const DESTINATION_COUNTRY: &[&str] = &["country", "countryName"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripMetadata {
    #[serde(default, deserialize_with = "records")]
    pub hotels: Vec<HotelRecord>,
    #[serde(default, deserialize_with = "records")]
    pub flights: Vec<FlightRecord>,
    #[serde(default, deserialize_with = "records")]
    pub destinations: Vec<DestinationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelRecord {
    pub name: Option<String>,
    pub stars: Option<u8>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub nights: Option<u32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightRecord {
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationRecord {
    pub name: Option<String>,
    pub country: Option<String>,
}

/// Built from one loosely-typed JSON object.
pub trait FromFields: Sized {
    fn from_fields(fields: &Map<String, Value>) -> Self;
}

impl FromFields for HotelRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        HotelRecord {
            name: text(fields, HOTEL_NAME),
            stars: number(fields, HOTEL_STARS).map(|s| s.clamp(0.0, MAX_STARS as f64) as u8),
            check_in: text(fields, HOTEL_CHECK_IN),
            check_out: text(fields, HOTEL_CHECK_OUT),
            nights: number(fields, HOTEL_NIGHTS).map(|n| n.max(0.0) as u32),
            location: text(fields, HOTEL_LOCATION),
        }
    }
}

impl FromFields for FlightRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        FlightRecord {
            airline: text(fields, FLIGHT_AIRLINE),
            flight_number: text(fields, FLIGHT_NUMBER),
            departure_time: text(fields, FLIGHT_DEPARTURE),
            arrival_time: text(fields, FLIGHT_ARRIVAL),
            origin: text(fields, FLIGHT_ORIGIN),
            destination: text(fields, FLIGHT_DESTINATION),
        }
    }
}

impl FromFields for DestinationRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        DestinationRecord {
            name: text(fields, DESTINATION_NAME),
            country: text(fields, DESTINATION_COUNTRY),
        }
    }
}

macro_rules! deserialize_from_fields {
    ($($ty:ty),*) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let fields = Map::<String, Value>::deserialize(deserializer)?;
                Ok(<$ty>::from_fields(&fields))
            }
        }
    )*};
}

deserialize_from_fields!(HotelRecord, FlightRecord, DestinationRecord);

/// Accepts `null` or an array; entries that are not objects are skipped.
fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromFields,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(T::from_fields)
        .collect())
}

fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
