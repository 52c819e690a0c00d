use thiserror::Error;
use tracing::debug;

use crate::budget::{schedule_overlays, OverlaySlots, DEFAULT_OVERLAY_FRACTION};
use crate::matcher::{match_flight, match_hotel};
use crate::overlay;
use crate::selector::ClipDescriptor;
use crate::timeline::*;
use crate::trip::TripMetadata;

pub const TITLE_LENGTH: f64 = 3.0;

const LABEL_OFFSET: Offset = Offset { x: 0.05, y: -0.1 };
const HOTEL_OFFSET: Offset = Offset { x: -0.05, y: -0.1 };
const FLIGHT_OFFSET: Offset = Offset { x: -0.05, y: 0.1 };

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayToggles {
    pub hotel: bool,
    pub flight: bool,
    /// Share of each clip an overlay may cover; clamped to `[0, 0.5]`.
    pub fraction: f64,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        OverlayToggles {
            hotel: true,
            flight: true,
            fraction: DEFAULT_OVERLAY_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    pub clips: Vec<ClipDescriptor>,
    pub title: String,
    /// Seconds each primary clip plays.
    pub clip_length: f64,
    pub voiceover_url: Option<String>,
    pub trip: TripMetadata,
    pub toggles: OverlayToggles,
}

#[derive(Debug, Error, PartialEq)]
pub enum CompositionError {
    #[error("composition needs at least one clip")]
    NoClips,
    #[error("clip length must be a positive number of seconds, got {0}")]
    InvalidClipLength(f64),
    #[error("assembled timeline is inconsistent: {0}")]
    Layout(#[from] TimelineError),
}

/// Builds the full track stack for one composition.
///
/// Track order is stacking order: primary video, title, destination labels,
/// hotel cards, flight cards, voice-over. Optional tracks are left out
/// entirely when they would be empty.
pub fn compile_timeline(request: &CompositionRequest) -> Result<Timeline, CompositionError> {
    if request.clips.is_empty() {
        return Err(CompositionError::NoClips);
    }
    let clip_length = request.clip_length;
    if !clip_length.is_finite() || clip_length <= 0.0 {
        return Err(CompositionError::InvalidClipLength(clip_length));
    }

    let mut timeline = Timeline::new();
    let clip_count = request.clips.len();
    let total = clip_count as f64 * clip_length;
    let slots: Vec<_> = (0..clip_count)
        .map(|index| schedule_overlays(index as f64 * clip_length, clip_length, request.toggles.fraction))
        .collect();

    // Primary video
    let mut primary = Track::new(TrackKind::Primary);
    for (index, clip) in request.clips.iter().enumerate() {
        let mut entry = TimelineClip::new(
            Asset::Video {
                src: clip.source_url.clone(),
                trim: 0.0,
            },
            index as f64 * clip_length,
            clip_length,
        );
        entry.fit = Some(Fit::Cover);
        entry.scale = Some(1.0);
        entry.transition = Some(Transition::FADE);
        primary.clips.push(entry);
    }
    timeline.tracks.push(primary);

    // Title
    let mut title = TimelineClip::new(overlay::title_asset(&request.title), 0.0, TITLE_LENGTH.min(total));
    title.transition = Some(Transition::FADE);
    timeline.tracks.push(Track {
        kind: TrackKind::Title,
        clips: vec![title],
    });

    let overlay_length = slots[0].label.length;
    if overlay_length > 0.0 {
        timeline.tracks.push(destination_labels(request, &slots));

        if let Some(track) = hotel_cards(request, &slots) {
            timeline.tracks.push(track);
        }
        if let Some(track) = flight_cards(request, &slots) {
            timeline.tracks.push(track);
        }
    } else {
        debug!("overlay budget is zero, skipping label, hotel and flight tracks");
    }

    if let Some(url) = request.voiceover_url.as_deref().filter(|u| !u.trim().is_empty()) {
        timeline.tracks.push(Track {
            kind: TrackKind::Voiceover,
            clips: vec![TimelineClip::new(
                Asset::Audio {
                    src: url.to_string(),
                    volume: 1.0,
                },
                0.0,
                total,
            )],
        });
    }

    timeline.validate()?;
    debug!(
        clips = clip_count,
        tracks = timeline.tracks.len(),
        total_seconds = total,
        "compiled timeline"
    );
    Ok(timeline)
}

fn destination_labels(request: &CompositionRequest, slots: &[OverlaySlots]) -> Track {
    let mut track = Track::new(TrackKind::DestinationLabel);
    for (clip, slot) in request.clips.iter().zip(slots) {
        let mut entry = TimelineClip::new(
            overlay::destination_label_asset(&clip.destination_name),
            slot.label.start,
            slot.label.length,
        );
        entry.offset = Some(LABEL_OFFSET);
        entry.transition = Some(Transition {
            enter: Effect::SlideLeft,
            exit: Effect::Fade,
        });
        track.clips.push(entry);
    }
    track
}

fn hotel_cards(request: &CompositionRequest, slots: &[OverlaySlots]) -> Option<Track> {
    let hotels = &request.trip.hotels;
    if !request.toggles.hotel || hotels.is_empty() {
        return None;
    }

    let mut track = Track::new(TrackKind::Hotel);
    for (clip, slot) in request.clips.iter().zip(slots) {
        let Some(hotel) = match_hotel(&clip.destination_name, hotels) else {
            continue;
        };
        let mut entry = TimelineClip::new(overlay::hotel_asset(hotel), slot.hotel.start, slot.hotel.length);
        entry.position = Some(Position::BottomRight);
        entry.offset = Some(HOTEL_OFFSET);
        entry.transition = Some(Transition::FADE);
        track.clips.push(entry);
    }

    debug!(matched = track.clips.len(), hotels = hotels.len(), "hotel overlays");
    (!track.clips.is_empty()).then_some(track)
}

fn flight_cards(request: &CompositionRequest, slots: &[OverlaySlots]) -> Option<Track> {
    let flights = &request.trip.flights;
    if !request.toggles.flight || flights.is_empty() {
        return None;
    }

    let last = request.clips.len() - 1;
    let mut track = Track::new(TrackKind::Flight);
    for (index, (clip, slot)) in request.clips.iter().zip(slots).enumerate() {
        let (is_first, is_last) = (index == 0, index == last);
        if !is_first && !is_last {
            continue;
        }
        let Some(matched) = match_flight(&clip.destination_name, flights, is_first, is_last) else {
            continue;
        };
        let mut entry = TimelineClip::new(overlay::flight_asset(&matched), slot.flight.start, slot.flight.length);
        entry.position = Some(Position::TopRight);
        entry.offset = Some(FLIGHT_OFFSET);
        entry.transition = Some(Transition::FADE);
        track.clips.push(entry);
    }

    (!track.clips.is_empty()).then_some(track)
}
