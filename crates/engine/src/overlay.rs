//! Overlay card content for the hotel and flight tracks.

use crate::matcher::{FlightLeg, FlightMatch};
use crate::timeline::{Asset, Position};
use crate::trip::HotelRecord;

pub const CARD_WIDTH: u32 = 350;
pub const CARD_HEIGHT: u32 = 100;

const HOTEL_ACCENT: (&str, &str) = ("#8b5cf6", "#a78bfa");
const FLIGHT_ACCENT: (&str, &str) = ("#ec4899", "#f472b6");

impl FlightLeg {
    pub fn label(&self) -> &'static str {
        match self {
            FlightLeg::Outbound => "OUTBOUND FLIGHT",
            FlightLeg::Return => "RETURN FLIGHT",
        }
    }
}

pub fn title_asset(text: &str) -> Asset {
    Asset::Title {
        text: text.to_string(),
        style: "future".to_string(),
        color: "#ffffff".to_string(),
        size: "large".to_string(),
        background: "rgba(0,0,0,0.5)".to_string(),
        position: Position::Center,
    }
}

pub fn destination_label_asset(destination: &str) -> Asset {
    Asset::Title {
        text: destination.to_string(),
        style: "minimal".to_string(),
        color: "#ffffff".to_string(),
        size: "medium".to_string(),
        background: "rgba(0,0,0,0.6)".to_string(),
        position: Position::BottomLeft,
    }
}

pub fn stars(count: Option<u8>) -> String {
    "★".repeat(count.unwrap_or(0) as usize)
}

pub fn hotel_asset(hotel: &HotelRecord) -> Asset {
    let name = hotel.name.as_deref().unwrap_or("Hotel");
    let stars = stars(hotel.stars);
    let headline = if stars.is_empty() {
        escape_html(name)
    } else {
        format!("{} {}", escape_html(name), stars)
    };

    let detail = match (hotel.nights, &hotel.check_in, &hotel.check_out) {
        (Some(nights), _, _) if nights > 0 => Some(nights_text(nights)),
        (_, Some(check_in), Some(check_out)) => Some(format!("{check_in} - {check_out}")),
        _ => None,
    };

    card("ACCOMMODATION", &headline, detail.as_deref(), HOTEL_ACCENT)
}

pub fn flight_asset(matched: &FlightMatch<'_>) -> Asset {
    let flight = matched.flight;
    let headline = [flight.airline.as_deref(), flight.flight_number.as_deref()]
        .into_iter()
        .flatten()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" ");

    let route = match (&flight.origin, &flight.destination) {
        (Some(from), Some(to)) => Some(format!("{from} → {to}")),
        _ => None,
    };
    let times = match (&flight.departure_time, &flight.arrival_time) {
        (Some(dep), Some(arr)) => Some(format!("{dep} - {arr}")),
        _ => None,
    };
    let detail = match (route, times) {
        (Some(route), Some(times)) => Some(format!("{route} · {times}")),
        (route, times) => route.or(times),
    };

    card(matched.leg.label(), &headline, detail.as_deref(), FLIGHT_ACCENT)
}

fn nights_text(nights: u32) -> String {
    if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{nights} nights")
    }
}

/// `headline` must already be escaped; `detail` is escaped here.
fn card(kicker: &str, headline: &str, detail: Option<&str>, (border, kicker_color): (&str, &str)) -> Asset {
    let mut html = format!(
        "<div style=\"font-family: Arial, sans-serif; background: rgba(0,0,0,0.7); padding: 12px 20px; border-radius: 8px; border-left: 4px solid {border};\">\
         <div style=\"color: {kicker_color}; font-size: 12px; margin-bottom: 4px;\">{kicker}</div>\
         <div style=\"color: white; font-size: 16px; font-weight: bold;\">{headline}</div>"
    );
    if let Some(detail) = detail {
        html.push_str(&format!(
            "<div style=\"color: #94a3b8; font-size: 14px; margin-top: 4px;\">{}</div>",
            escape_html(detail)
        ));
    }
    html.push_str("</div>");

    Asset::Html {
        html,
        width: CARD_WIDTH,
        height: CARD_HEIGHT,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
