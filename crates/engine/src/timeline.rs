use serde::Serialize;
use thiserror::Error;

/// Tolerance for comparing accumulated second offsets.
pub const TIME_EPSILON: f64 = 1e-6;

pub const DEFAULT_BACKGROUND: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    pub format: String,
    pub resolution: String,
    pub aspect_ratio: String,
    pub size: Size,
    pub fps: u32,
    pub scale_to: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: "mp4".to_string(),
            resolution: "hd".to_string(),
            aspect_ratio: "16:9".to_string(),
            size: Size {
                width: 1280,
                height: 720,
            },
            fps: 25,
            scale_to: "preview".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// What a clip shows. Serialized with a `type` tag in the render service's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Asset {
    Video {
        src: String,
        trim: f64,
    },
    Title {
        text: String,
        style: String,
        color: String,
        size: String,
        background: String,
        position: Position,
    },
    Html {
        html: String,
        width: u32,
        height: u32,
    },
    Audio {
        src: String,
        volume: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Center,
    BottomLeft,
    BottomRight,
    TopRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Cover,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    Fade,
    SlideLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    #[serde(rename = "in")]
    pub enter: Effect,
    #[serde(rename = "out")]
    pub exit: Effect,
}

impl Transition {
    pub const FADE: Transition = Transition {
        enter: Effect::Fade,
        exit: Effect::Fade,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineClip {
    pub asset: Asset,
    pub start: f64,
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl TimelineClip {
    pub fn new(asset: Asset, start: f64, length: f64) -> Self {
        TimelineClip {
            asset,
            start,
            length,
            fit: None,
            scale: None,
            position: None,
            offset: None,
            transition: None,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Primary,
    Title,
    DestinationLabel,
    Hotel,
    Flight,
    Voiceover,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    #[serde(skip)]
    pub kind: TrackKind,
    pub clips: Vec<TimelineClip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Track {
            kind,
            clips: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("timeline has no primary clips")]
    EmptyPrimary,
    #[error("primary clip {index} starts at {start}s, expected {expected}s")]
    PrimaryGap {
        index: usize,
        start: f64,
        expected: f64,
    },
    #[error("{kind:?} clip {index} ends at {end}s, past the composition end {total}s")]
    OverlayOverrun {
        kind: TrackKind,
        index: usize,
        end: f64,
        total: f64,
    },
    #[error("{kind:?} clip {index} has negative timing")]
    NegativeTiming { kind: TrackKind, index: usize },
}

/// A finished composition: tracks in stacking order plus encoding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub background: String,
    pub tracks: Vec<Track>,
    pub output: OutputSettings,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline {
            background: DEFAULT_BACKGROUND.to_string(),
            tracks: Vec::new(),
            output: OutputSettings::default(),
        }
    }

    pub fn track(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    pub fn primary(&self) -> Option<&Track> {
        self.track(TrackKind::Primary)
    }

    /// Sum of primary clip lengths.
    pub fn total_length(&self) -> f64 {
        self.primary()
            .map(|t| t.clips.iter().map(|c| c.length).sum())
            .unwrap_or(0.0)
    }

    /// Checks that primary clips tile `[0, total)` without gaps and that no
    /// overlay outlives the composition.
    pub fn validate(&self) -> Result<(), TimelineError> {
        let primary = self
            .primary()
            .filter(|t| !t.clips.is_empty())
            .ok_or(TimelineError::EmptyPrimary)?;

        let mut expected = 0.0;
        for (index, clip) in primary.clips.iter().enumerate() {
            if clip.length < 0.0 {
                return Err(TimelineError::NegativeTiming {
                    kind: TrackKind::Primary,
                    index,
                });
            }
            if (clip.start - expected).abs() > TIME_EPSILON {
                return Err(TimelineError::PrimaryGap {
                    index,
                    start: clip.start,
                    expected,
                });
            }
            expected = clip.end();
        }

        let total = self.total_length();
        for track in self.tracks.iter().filter(|t| t.kind != TrackKind::Primary) {
            for (index, clip) in track.clips.iter().enumerate() {
                if clip.start < 0.0 || clip.length < 0.0 {
                    return Err(TimelineError::NegativeTiming {
                        kind: track.kind,
                        index,
                    });
                }
                if clip.end() > total + TIME_EPSILON {
                    return Err(TimelineError::OverlayOverrun {
                        kind: track.kind,
                        index,
                        end: clip.end(),
                        total,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::new()
    }
}
