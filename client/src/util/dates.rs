//! Date helpers for the filter bar's `datetime-local` inputs.
//!
//! TRADE-OFFS
//! ==========
//! The inputs carry minute precision in the browser's local zone; the API
//! takes whole unix seconds. Values are kept as `OffsetDateTime` in state so
//! the conversion happens only at the request boundary.

#[cfg(test)]
#[path = "dates_test.rs"]
mod dates_test;

use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const INPUT_MINUTES: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const INPUT_SECONDS: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// The same wall-clock time one calendar day earlier.
#[must_use]
pub fn yesterday(now: OffsetDateTime) -> OffsetDateTime {
    now.checked_sub(Duration::days(1)).unwrap_or(now)
}

/// Render a value for a `datetime-local` input (`YYYY-MM-DDTHH:MM`).
#[must_use]
pub fn format_datetime_local(value: OffsetDateTime) -> String {
    value.format(INPUT_MINUTES).unwrap_or_default()
}

/// Parse a `datetime-local` input value. `offset_at` gives the zone offset
/// in effect at the parsed wall-clock time, so dates across a daylight-saving
/// change get their own offset.
///
/// Browsers emit seconds only when the step allows it, so both forms are
/// accepted. Returns `None` for an empty or malformed value.
#[must_use]
pub fn parse_datetime_local(raw: &str, offset_at: impl Fn(PrimitiveDateTime) -> UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    PrimitiveDateTime::parse(raw, INPUT_MINUTES)
        .or_else(|_| PrimitiveDateTime::parse(raw, INPUT_SECONDS))
        .ok()
        .map(|dt| dt.assume_offset(offset_at(dt)))
}

/// The browser's UTC offset at the given local wall-clock time; UTC outside
/// the browser.
#[must_use]
pub fn local_offset_at(dt: PrimitiveDateTime) -> UtcOffset {
    #[cfg(feature = "hydrate")]
    {
        let Ok(year) = u32::try_from(dt.year()) else {
            return UtcOffset::UTC;
        };
        let date = js_sys::Date::new_with_year_month_day_hr_min(
            year,
            i32::from(u8::from(dt.month())) - 1,
            i32::from(dt.day()),
            i32::from(dt.hour()),
            i32::from(dt.minute()),
        );
        offset_from_minutes_west(date.get_timezone_offset())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = dt;
        UtcOffset::UTC
    }
}

/// Convert a JS `getTimezoneOffset` value (minutes west of UTC).
#[must_use]
pub fn offset_from_minutes_west(minutes_west: f64) -> UtcOffset {
    #[allow(clippy::cast_possible_truncation)]
    let seconds_east = (-minutes_west * 60.0) as i32;
    UtcOffset::from_whole_seconds(seconds_east).unwrap_or(UtcOffset::UTC)
}

/// The browser's current UTC offset; UTC outside the browser.
#[must_use]
pub fn local_offset() -> UtcOffset {
    #[cfg(feature = "hydrate")]
    {
        offset_from_minutes_west(js_sys::Date::new_0().get_timezone_offset())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        UtcOffset::UTC
    }
}

/// Current time in the browser's zone.
#[must_use]
pub fn now_local() -> OffsetDateTime {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let nanos = (js_sys::Date::now() * 1_000_000.0) as i128;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            .to_offset(local_offset())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        OffsetDateTime::now_utc()
    }
}
