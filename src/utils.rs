use chrono::{Datelike, Days, NaiveDate};

/// Date formats accepted by the feeds, tried in order. The feeds are
/// AU-origin, so day-first comes before any month-first reading.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Lenient date parse. Returns `None` for anything unparsable; the caller
/// decides whether that drops the row.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Monday of the week containing `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    let weekday_index = today.weekday().num_days_from_monday();
    today - Days::new(u64::from(weekday_index))
}

/// First day of the month containing `today`.
pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap()
}

/// January 1 of the year containing `today`.
pub fn start_of_year(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(parse_date("2024-03-07"), Some(expected));
        assert_eq!(parse_date("07/03/2024"), Some(expected));
        assert_eq!(parse_date("2024/03/07"), Some(expected));
        assert_eq!(parse_date("  2024-03-07  "), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("32/01/2024"), None);
    }

    #[test]
    fn test_start_of_week() {
        // 2024-03-07 is a Thursday; the week starts Monday 2024-03-04.
        let thursday = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            start_of_week(thursday),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );

        // A Monday is its own week start.
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(start_of_week(monday), monday);

        // A Sunday reaches back six days.
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            start_of_week(sunday),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_start_of_week_crosses_month_boundary() {
        // 2024-03-01 is a Friday; its week starts in February.
        let friday = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            start_of_week(friday),
            NaiveDate::from_ymd_opt(2024, 2, 26).unwrap()
        );
    }

    #[test]
    fn test_start_of_month_and_year() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(
            start_of_month(date),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
        assert_eq!(
            start_of_year(date),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
