use chrono::{DateTime, Utc};
use http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub limit: i64,
    pub remaining: i64,
    pub reset: DateTime<Utc>,
}

impl RateLimitSnapshot {
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }
}

pub fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitSnapshot> {
    let limit = header_i64(headers, "x-ratelimit-limit")?;
    let remaining = header_i64(headers, "x-ratelimit-remaining")?;
    let reset_ts = header_i64(headers, "x-ratelimit-reset")?;
    let reset = DateTime::from_timestamp(reset_ts, 0)?;
    Some(RateLimitSnapshot {
        limit,
        remaining,
        reset,
    })
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
}
