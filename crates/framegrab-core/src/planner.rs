//! Timestamp planning.
//!
//! Offsets are fixed percentages of the video duration, floored to whole
//! seconds. Nothing is clamped: a zero or negative duration produces zero or
//! negative offsets and the frame extractor decides what happens next.

use crate::constants::AUTO_TIMESTAMP_PERCENT;
use crate::models::FramePoint;

const TRIO: [(&str, u32); 3] = [("middle", 50), ("climax", 65), ("late", 75)];

const GRID_START: u32 = 4;
const GRID_STEP: u32 = 4;
const GRID_POINTS: u32 = 24;

/// `floor(duration * percent / 100)`
pub fn offset_for(duration_secs: f64, percent: u32) -> i64 {
    (duration_secs * percent as f64 / 100.0).floor() as i64
}

/// Which percentages an endpoint samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPlan {
    /// One frame at 65% ("climax").
    Single,
    /// 50% / 65% / 75% labelled middle / climax / late.
    Trio,
    /// 24 unlabelled points, 4% to 96% in steps of 4.
    Grid,
}

impl TimestampPlan {
    pub fn percents(&self) -> Vec<(Option<&'static str>, u32)> {
        match self {
            TimestampPlan::Single => vec![(Some("climax"), AUTO_TIMESTAMP_PERCENT)],
            TimestampPlan::Trio => TRIO.iter().map(|(l, p)| (Some(*l), *p)).collect(),
            TimestampPlan::Grid => (0..GRID_POINTS)
                .map(|i| (None, GRID_START + i * GRID_STEP))
                .collect(),
        }
    }

    pub fn points(&self, duration_secs: f64) -> Vec<FramePoint> {
        self.percents()
            .into_iter()
            .map(|(label, percent)| FramePoint {
                label,
                percent,
                timestamp: offset_for(duration_secs, percent),
            })
            .collect()
    }
}
