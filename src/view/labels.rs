use chrono::{Days, Locale, NaiveDate};

use crate::songs::DATE_FORMAT;

/// Long-form date pattern with fields ordered the way `locale` writes them.
fn long_date_format(locale: Locale) -> &'static str {
    match locale {
        Locale::en_US | Locale::en_CA | Locale::en_PH => "%A, %B %-d, %Y",
        Locale::ja_JP | Locale::zh_CN | Locale::zh_TW => "%Y年%-m月%-d日 %A",
        Locale::ko_KR => "%Y년 %-m월 %-d일 %A",
        _ => "%A %-d %B %Y",
    }
}

/// Header label for a song date, relative to `today`.
pub fn label_for(date_str: &str, today: NaiveDate) -> String {
    label_for_locale(date_str, today, Locale::en_US)
}

/// Like [`label_for`], with weekday and month names in `locale`.
pub fn label_for_locale(date_str: &str, today: NaiveDate, locale: Locale) -> String {
    let Ok(date) = NaiveDate::parse_from_str(date_str, DATE_FORMAT) else {
        return date_str.to_string();
    };

    if date == today {
        return "Today".to_string();
    }
    if today.checked_sub_days(Days::new(1)) == Some(date) {
        return "Yesterday".to_string();
    }

    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => midnight
            .and_utc()
            .format_localized(long_date_format(locale), locale)
            .to_string(),
        None => date_str.to_string(),
    }
}
