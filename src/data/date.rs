use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Date-only layouts tried in order. Month-first wins over day-first when a
/// slash date is ambiguous.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d %Y",
    "%d.%m.%Y",
];

/// Two-digit-year layouts, tried only after the four-digit ones.
const SHORT_YEAR_FORMATS: [&str; 5] = ["%m/%d/%y", "%d/%m/%y", "%d-%b-%y", "%b %d %y", "%d.%m.%y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Parse a measurement date cell. Returns `None` for blank or unrecognised
/// text; the time of day, if any, is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // `%Y` also takes "20" as the year 0020; such matches are discarded so
    // the `%y` layouts get to read them.
    let four_digit = |d: &NaiveDate| d.year() >= 100;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok().filter(four_digit))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .filter(four_digit)
        })
        .or_else(|| {
            SHORT_YEAR_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Plot x coordinate: whole days since 1970-01-01.
pub fn to_epoch_days(date: NaiveDate) -> f64 {
    date.signed_duration_since(unix_epoch()).num_days() as f64
}

/// Inverse of [`to_epoch_days`], rounding to the nearest day.
pub fn from_epoch_days(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() {
        return None;
    }
    unix_epoch().checked_add_signed(chrono::Duration::try_days(days.round() as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_common_layouts() {
        assert_eq!(parse_date("2020-07-24"), Some(ymd(2020, 7, 24)));
        assert_eq!(parse_date("07/24/2020"), Some(ymd(2020, 7, 24)));
        assert_eq!(parse_date("24/07/2020"), Some(ymd(2020, 7, 24)));
        assert_eq!(parse_date("24-Jul-2020"), Some(ymd(2020, 7, 24)));
        assert_eq!(parse_date("Jul 24 2020"), Some(ymd(2020, 7, 24)));
        assert_eq!(parse_date("2020-07-24 09:30:00"), Some(ymd(2020, 7, 24)));
    }

    #[test]
    fn test_ambiguous_slash_is_month_first() {
        assert_eq!(parse_date("03/04/2021"), Some(ymd(2021, 3, 4)));
    }

    #[test]
    fn test_two_digit_year() {
        let expected = Some(ymd(2020, 7, 24));
        assert_eq!(parse_date("07/24/20"), expected);
        assert_eq!(parse_date("7/24/20"), expected);
        assert_eq!(parse_date("24/07/20"), expected);
        assert_eq!(parse_date("24-Jul-20"), expected);
        assert_eq!(parse_date("24.07.20"), expected);
        // Four-digit years are unaffected.
        assert_eq!(parse_date("07/24/2020"), expected);
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(to_epoch_days(ymd(1970, 1, 1)), 0.0);
        assert_eq!(to_epoch_days(ymd(1970, 1, 11)), 10.0);
        let d = ymd(2020, 7, 24);
        assert_eq!(from_epoch_days(to_epoch_days(d)), Some(d));
        assert_eq!(from_epoch_days(f64::NAN), None);
    }
}
