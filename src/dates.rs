//! Date validation and trip-duration arithmetic shared by the budget
//! calculator, the public share view and both stop write paths.

use chrono::NaiveDate;

use crate::error::AppError;

const ISO_DATE: &str = "%Y-%m-%d";

pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, ISO_DATE).map_err(|_| {
        AppError::BadRequest(format!("{field} must be an ISO-8601 date (YYYY-MM-DD)"))
    })
}

/// Trip length in whole days. A trip where the end date equals the start
/// date still counts as one day.
pub fn trip_days(start_date: &str, end_date: &str) -> Result<i64, AppError> {
    let start = parse_iso_date("start_date", start_date)?;
    let end = parse_iso_date("end_date", end_date)?;
    Ok((end - start).num_days().max(1))
}

pub fn ensure_date_order(start_date: &str, end_date: &str) -> Result<(), AppError> {
    let start = parse_iso_date("start_date", start_date)?;
    let end = parse_iso_date("end_date", end_date)?;
    if end < start {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".into(),
        ));
    }
    Ok(())
}

/// Invariant check used by both stop creation and stop update: the stop's
/// date range must be ordered and fall within its trip's date range.
pub fn ensure_within_trip(
    trip_start: &str,
    trip_end: &str,
    stop_start: &str,
    stop_end: &str,
) -> Result<(), AppError> {
    let trip_start = parse_iso_date("trip start_date", trip_start)?;
    let trip_end = parse_iso_date("trip end_date", trip_end)?;
    let start = parse_iso_date("start_date", stop_start)?;
    let end = parse_iso_date("end_date", stop_end)?;

    if end < start {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".into(),
        ));
    }
    if start < trip_start || end > trip_end {
        return Err(AppError::BadRequest(
            "stop dates must fall within the trip's date range".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_days_counts_whole_days() {
        assert_eq!(trip_days("2024-05-01", "2024-05-04").unwrap(), 3);
    }

    #[test]
    fn same_day_trip_counts_one_day() {
        assert_eq!(trip_days("2024-06-01", "2024-06-01").unwrap(), 1);
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(matches!(
            trip_days("2024-05-01", "not-a-date"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn reversed_trip_dates_are_rejected() {
        assert!(ensure_date_order("2024-05-04", "2024-05-01").is_err());
        assert!(ensure_date_order("2024-05-01", "2024-05-01").is_ok());
    }

    #[test]
    fn stop_inside_trip_is_accepted() {
        assert!(ensure_within_trip("2024-05-01", "2024-05-14", "2024-05-03", "2024-05-07").is_ok());
    }

    #[test]
    fn stop_outside_trip_is_rejected() {
        assert!(
            ensure_within_trip("2024-05-01", "2024-05-14", "2024-04-28", "2024-05-03").is_err()
        );
        assert!(
            ensure_within_trip("2024-05-01", "2024-05-14", "2024-05-10", "2024-05-16").is_err()
        );
    }

    #[test]
    fn reversed_stop_dates_are_rejected() {
        assert!(
            ensure_within_trip("2024-05-01", "2024-05-14", "2024-05-07", "2024-05-03").is_err()
        );
    }
}
