use std::fmt;

use http::header::{HeaderValue, InvalidHeaderValue};

/// Personal access token sent as a bearer credential to raise the
/// unauthenticated rate limit.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// `None` for missing or blank secrets.
    pub fn from_optional(secret: Option<&str>) -> Option<Self> {
        secret
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
            .map(Self::new)
    }

    pub fn authorization(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.secret))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .finish()
    }
}
