use chrono::NaiveDate;

pub mod songs;
pub mod timer;
pub mod tones;

/// Event carrying a [`crate::timer::PracticeTick`] to the webview.
pub const PRACTICE_TICK_EVENT: &str = "practice-tick";

/// Today's date in the local timezone, used for "Today"/"Yesterday" headers.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
