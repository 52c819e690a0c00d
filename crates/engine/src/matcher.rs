use crate::trip::{FlightRecord, HotelRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightLeg {
    Outbound,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightMatch<'a> {
    pub leg: FlightLeg,
    pub flight: &'a FlightRecord,
}

/// First hotel whose location label contains the destination name or is
/// contained in it, compared case-insensitively.
pub fn match_hotel<'a>(destination: &str, hotels: &'a [HotelRecord]) -> Option<&'a HotelRecord> {
    let destination = destination.trim().to_lowercase();
    if destination.is_empty() {
        return None;
    }

    hotels.iter().find(|hotel| {
        let Some(location) = hotel.location.as_deref() else {
            return false;
        };
        let location = location.trim().to_lowercase();
        !location.is_empty() && (location.contains(&destination) || destination.contains(&location))
    })
}

/// Positional, not content-based: the first clip gets the first flight as the
/// outbound leg, the last clip gets the last flight as the return leg when
/// there are at least two. Assumes `flights` is ordered outbound first.
pub fn match_flight<'a>(
    destination: &str,
    flights: &'a [FlightRecord],
    is_first: bool,
    is_last: bool,
) -> Option<FlightMatch<'a>> {
    if destination.trim().is_empty() {
        return None;
    }

    if is_first {
        return flights.first().map(|flight| FlightMatch {
            leg: FlightLeg::Outbound,
            flight,
        });
    }
    if is_last && flights.len() > 1 {
        return flights.last().map(|flight| FlightMatch {
            leg: FlightLeg::Return,
            flight,
        });
    }
    None
}
