use serde::Serialize;

use crate::timeline::{OutputSettings, Timeline, Track};

/// The JSON document posted to the render service.
#[derive(Debug, Serialize)]
pub struct RenderDocument<'a> {
    pub timeline: TimelineBody<'a>,
    pub output: &'a OutputSettings,
}

#[derive(Debug, Serialize)]
pub struct TimelineBody<'a> {
    pub background: &'a str,
    pub tracks: &'a [Track],
}

impl Timeline {
    pub fn render_document(&self) -> RenderDocument<'_> {
        RenderDocument {
            timeline: TimelineBody {
                background: &self.background,
                tracks: &self.tracks,
            },
            output: &self.output,
        }
    }
}
