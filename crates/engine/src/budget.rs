/// No overlay may cover more than this share of its host clip.
pub const MAX_OVERLAY_FRACTION: f64 = 0.5;
pub const DEFAULT_OVERLAY_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub length: f64,
}

impl Span {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Where the per-clip overlays sit inside one primary clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySlots {
    pub label: Span,
    pub hotel: Span,
    pub flight: Span,
}

pub fn clamp_fraction(requested: f64) -> f64 {
    if requested.is_nan() {
        return 0.0;
    }
    requested.clamp(0.0, MAX_OVERLAY_FRACTION)
}

pub fn budget_overlay(clip_length: f64, requested_fraction: f64) -> f64 {
    clip_length.max(0.0) * clamp_fraction(requested_fraction)
}

/// Label and flight start with the clip; the hotel card follows the label back to back.
pub fn schedule_overlays(clip_start: f64, clip_length: f64, requested_fraction: f64) -> OverlaySlots {
    let length = budget_overlay(clip_length, requested_fraction);
    OverlaySlots {
        label: Span {
            start: clip_start,
            length,
        },
        hotel: Span {
            start: clip_start + length,
            length,
        },
        flight: Span {
            start: clip_start,
            length,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_fraction_of_seven_seconds() {
        let length = budget_overlay(7.0, DEFAULT_OVERLAY_FRACTION);
        assert!((length - 2.8).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        assert_eq!(budget_overlay(10.0, 0.9), 5.0);
        assert_eq!(budget_overlay(10.0, -1.0), 0.0);
        assert_eq!(budget_overlay(10.0, f64::NAN), 0.0);
        assert_eq!(budget_overlay(-3.0, 0.4), 0.0);
    }

    #[test]
    fn hotel_follows_label() {
        let slots = schedule_overlays(14.0, 7.0, 0.5);
        assert_eq!(slots.label.start, 14.0);
        assert_eq!(slots.hotel.start, slots.label.end());
        assert_eq!(slots.hotel.end(), 21.0);
        assert_eq!(slots.flight, slots.label);
    }

    proptest! {
        #[test]
        fn overlays_stay_inside_host_clip(
            start in 0.0f64..1000.0,
            length in 0.1f64..60.0,
            fraction in -2.0f64..2.0,
        ) {
            let slots = schedule_overlays(start, length, fraction);
            prop_assert!(slots.label.length <= length * MAX_OVERLAY_FRACTION + 1e-9);
            prop_assert!(slots.hotel.start >= slots.label.end() - 1e-9);
            prop_assert!(slots.hotel.end() <= start + length + 1e-9);
        }
    }
}
