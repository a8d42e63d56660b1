//! Text forms shared by every codec: reals, dates and base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The date every failed or missing date conversion resolves to.
#[inline]
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Formats a real with the fewest digits that parse back to the same bits.
///
/// Decimal exponents in `[-4, 15)` use fixed notation; anything else uses
/// `d.dddE+XX` with at least two exponent digits. Integral values carry no
/// decimal point (`3`, not `3.0`); callers that must keep reals distinct
/// from integers append `.0` themselves.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::text::format_real;
///
/// assert_eq!(format_real(0.1), "0.1");
/// assert_eq!(format_real(3.0), "3");
/// assert_eq!(format_real(1e15), "1E+15");
/// assert_eq!(format_real(-2.5e-7), "-2.5E-07");
/// assert_eq!(format_real(f64::NAN), "NaN");
/// ```
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e6".
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    if (-4..15).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(int_len - digits.len()));
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.unsigned_abs()));
    }
    out
}

/// Parses a real the way the text encodings write them.
///
/// Accepts plain decimals, exponents in either case, and the `NaN`,
/// `Infinity` and `inf` spellings in any case.
#[must_use]
pub fn parse_real(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Formats a date as `yyyy-MM-ddTHH:mm:ss[.ff]Z` in UTC.
///
/// The two fractional digits are hundredths of a second and only appear
/// when the millisecond part is nonzero.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use serde_llsd::text::format_date;
///
/// let whole = Utc.with_ymd_and_hms(2008, 1, 1, 20, 10, 31).unwrap();
/// assert_eq!(format_date(&whole), "2008-01-01T20:10:31Z");
///
/// let fractional = whole + chrono::Duration::milliseconds(250);
/// assert_eq!(format_date(&fractional), "2008-01-01T20:10:31.25Z");
/// ```
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    let millis = date.timestamp_subsec_millis();
    if millis == 0 {
        date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        format!("{}.{:02}Z", date.format("%Y-%m-%dT%H:%M:%S"), millis / 10)
    }
}

/// Parses an ISO-8601 date.
///
/// Offsets are converted to UTC; a date-time or a bare date without an
/// offset is taken as UTC.
#[must_use]
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    if let Ok(naive) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Seconds since the Unix epoch, including the fractional part.
#[must_use]
pub fn unix_seconds(date: &DateTime<Utc>) -> f64 {
    date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) / 1e9
}

#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard padded base64, ignoring embedded ASCII whitespace.
pub fn decode_base64(text: &str) -> crate::Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| crate::Error::custom(format!("invalid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_real_fixed_range() {
        assert_eq!(format_real(1.0), "1");
        assert_eq!(format_real(-0.0), "-0");
        assert_eq!(format_real(123456.789), "123456.789");
        assert_eq!(format_real(0.00001), "1E-05");
        assert_eq!(format_real(0.0001), "0.0001");
        assert_eq!(format_real(1e14), "100000000000000");
        assert_eq!(format_real(f64::INFINITY), "Infinity");
        assert_eq!(format_real(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_real_round_trips() {
        for v in [
            0.1,
            1.0 / 3.0,
            -1234.5678e-9,
            f64::MAX,
            f64::MIN_POSITIVE,
            5e-324,
            9007199254740993.0,
            -2.0e20,
        ] {
            let text = format_real(v);
            assert_eq!(parse_real(&text), Some(v), "{}", text);
        }
    }

    #[test]
    fn test_parse_real_spellings() {
        assert!(parse_real("NaN").unwrap().is_nan());
        assert_eq!(parse_real("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_real("-inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_real(" 2.5e3 "), Some(2500.0));
        assert_eq!(parse_real(""), None);
        assert_eq!(parse_real("abc"), None);
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = Utc.with_ymd_and_hms(2006, 2, 1, 14, 29, 53).unwrap();
        assert_eq!(parse_date("2006-02-01T14:29:53Z"), Some(expected));
        assert_eq!(parse_date("2006-02-01T14:29:53"), Some(expected));
        assert_eq!(parse_date("2006-02-01T16:29:53+02:00"), Some(expected));
        assert_eq!(
            parse_date("2006-02-01"),
            Some(Utc.with_ymd_and_hms(2006, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date("not a date"), None);

        let fractional = parse_date("2006-02-01T14:29:53.43Z").unwrap();
        assert_eq!(fractional.timestamp_subsec_millis(), 430);
        assert_eq!(format_date(&fractional), "2006-02-01T14:29:53.43Z");
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
        assert_eq!(decode_base64("aGVs\n bG8=").unwrap(), b"hello");
        assert!(decode_base64("###").is_err());
    }
}
