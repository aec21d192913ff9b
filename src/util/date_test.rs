use super::*;
use time::macros::datetime;

#[test]
fn formats_full_date_time_with_zero_padding() {
    let dt = datetime!(2024-01-05 9:03:07);
    assert_eq!(format(dt, "YYYY-MM-DD HH:mm:ss"), "2024-01-05 09:03:07");
}

#[test]
fn empty_and_unparseable_inputs_format_as_empty() {
    assert_eq!(format(DateInput::Empty, DATE), "");
    assert_eq!(format(None::<&str>, DATE), "");
    assert_eq!(format("not-a-date", DATE), "");
    assert_eq!(format("", DATE), "");
    assert_eq!(format(0_i64, DATE), "");
}

#[test]
fn convenience_wrappers_fix_the_pattern() {
    let dt = datetime!(2023-11-30 23:59:01);
    assert_eq!(format_date(dt), "2023-11-30");
    assert_eq!(format_date_time(dt), "2023-11-30 23:59:01");
    assert_eq!(format_year_month(dt), "2023-11");
}

#[test]
fn parses_backend_date_time_strings() {
    assert_eq!(format_date_time("2024-03-09 08:07:06"), "2024-03-09 08:07:06");
    assert_eq!(format_date_time("2024-03-09T08:07:06"), "2024-03-09 08:07:06");
    assert_eq!(format_date_time("2024-03-09T08:07:06.123"), "2024-03-09 08:07:06");
    assert_eq!(format_date_time("2024-03-09 08:07"), "2024-03-09 08:07:00");
    assert_eq!(format_date_time("2024/03/09"), "2024-03-09 00:00:00");
    assert_eq!(format_date(" 2024-03-09 "), "2024-03-09");
}

#[test]
fn parses_rfc3339_strings() {
    assert_eq!(format_year_month("2024-06-15T12:00:00Z"), "2024-06");
}

#[test]
fn formats_millisecond_timestamps() {
    // 2024-01-05T09:03:07Z; mid-month so any local offset stays in January.
    assert_eq!(format_year_month(1_704_445_387_000_i64), "2024-01");
}

#[test]
fn each_token_is_substituted_once() {
    let dt = datetime!(2024-02-03 04:05:06);
    assert_eq!(format(dt, "DD/MM/YYYY DD"), "03/02/2024 DD");
    assert_eq!(format(dt, "HH:mm"), "04:05");
}

#[test]
fn option_inputs_unwrap_to_their_value() {
    let dt = datetime!(2022-12-25 00:00:00);
    assert_eq!(format_date(Some(dt)), "2022-12-25");
    assert_eq!(format_date(Some("2022-12-25 10:00:00".to_owned())), "2022-12-25");
}
