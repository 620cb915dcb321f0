use std::{borrow::Cow, time::Duration as StdDuration};

use time::{
    Duration, OffsetDateTime,
    format_description::well_known::{Rfc2822, Rfc3339},
    macros::datetime,
};

use crate::cookies::CookieError;

/// Far enough away to never trigger in practice.
const FAR_FUTURE: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

/// When a cookie set through [`Cookies`](crate::Cookies) expires.
///
/// Defaults to [`Expiry::ONE_YEAR`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expiry {
    /// Expires with the client session; no expiration attribute is sent.
    Session,
    /// Effectively never expires.
    Infinite,
    /// Expires the given duration from now.
    Duration(StdDuration),
    /// Expires at the given instant.
    At(OffsetDateTime),
    /// A relative expression such as `"tomorrow"` or `"+2 hours"`, or an
    /// RFC 3339 / RFC 2822 timestamp.
    Text(Cow<'static, str>),
}

impl Expiry {
    pub const ONE_DAY: Expiry = Expiry::Duration(StdDuration::from_secs(86_400));
    pub const ONE_WEEK: Expiry = Expiry::Duration(StdDuration::from_secs(604_800));
    pub const ONE_MONTH: Expiry = Expiry::Duration(StdDuration::from_secs(2_592_000));
    pub const ONE_YEAR: Expiry = Expiry::Duration(StdDuration::from_secs(31_536_000));

    pub(crate) fn resolve(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<OffsetDateTime>, CookieError> {
        match self {
            Expiry::Session => Ok(None),
            Expiry::Infinite => Ok(Some(FAR_FUTURE)),
            Expiry::Duration(duration) => Ok(Some(now + *duration)),
            Expiry::At(at) => Ok(Some(*at)),
            Expiry::Text(expr) => parse_expression(expr, now).map(Some),
        }
    }
}

impl Default for Expiry {
    fn default() -> Self {
        Expiry::ONE_YEAR
    }
}

impl From<StdDuration> for Expiry {
    fn from(duration: StdDuration) -> Self {
        Expiry::Duration(duration)
    }
}

impl From<OffsetDateTime> for Expiry {
    fn from(at: OffsetDateTime) -> Self {
        Expiry::At(at)
    }
}

impl From<&'static str> for Expiry {
    fn from(expr: &'static str) -> Self {
        Expiry::Text(Cow::Borrowed(expr))
    }
}

impl From<String> for Expiry {
    fn from(expr: String) -> Self {
        Expiry::Text(Cow::Owned(expr))
    }
}

fn parse_expression(raw: &str, now: OffsetDateTime) -> Result<OffsetDateTime, CookieError> {
    let expr = raw.trim();

    match expr.to_ascii_lowercase().as_str() {
        "now" => return Ok(now),
        "tomorrow" => return Ok(now + Duration::days(1)),
        "yesterday" => return Ok(now - Duration::days(1)),
        _ => {}
    }

    if let Some(offset) = parse_relative(expr) {
        return Ok(now + offset);
    }

    OffsetDateTime::parse(expr, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(expr, &Rfc2822))
        .map_err(|_| CookieError::InvalidExpiryFormat(raw.to_string()))
}

/// Parses `"+2 hours"` / `"-30 min"` style offsets.
fn parse_relative(expr: &str) -> Option<Duration> {
    let (sign, rest) = match expr.as_bytes().first()? {
        b'+' => (1, &expr[1..]),
        b'-' => (-1, &expr[1..]),
        _ => (1, expr),
    };
    let rest = rest.trim_start();

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let count: i64 = rest[..digits].parse().ok()?;

    let unit_secs: i64 = match rest[digits..].trim().to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        "month" | "months" => 2_592_000,
        "y" | "year" | "years" => 31_536_000,
        _ => return None,
    };

    let seconds = count.checked_mul(unit_secs)?.checked_mul(sign)?;
    Some(Duration::seconds(seconds))
}
