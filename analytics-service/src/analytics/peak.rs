use serde::Serialize;
use store_client::domain::TariffProfile;
use time::{OffsetDateTime, Time};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PeakTimeStatus {
    pub has_peak_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_start: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_end: Option<Time>,
    pub is_peak: bool,
}

/// Decide whether `at` falls inside the profile's peak window.
///
/// Works on minute-of-day arithmetic (`hour × 60 + minute`) against the
/// instant's wall-clock reading; the window is active when
/// `start ≤ minute < end`. A profile without both bounds configured has no
/// peak window and is never "in peak".
pub fn evaluate(profile: &TariffProfile, at: OffsetDateTime) -> PeakTimeStatus {
    let (Some(start), Some(end)) = (profile.peak_start, profile.peak_end) else {
        return PeakTimeStatus {
            has_peak_window: false,
            peak_start: None,
            peak_end: None,
            is_peak: false,
        };
    };

    let minute = minute_of_day(at.time());
    let is_peak = minute_of_day(start) <= minute && minute < minute_of_day(end);

    PeakTimeStatus {
        has_peak_window: true,
        peak_start: Some(start),
        peak_end: Some(end),
        is_peak,
    }
}

fn minute_of_day(t: Time) -> u16 {
    u16::from(t.hour()) * 60 + u16::from(t.minute())
}
