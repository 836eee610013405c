//! # Cookie Records
//!
//! One HTTP cookie as captured from the web view's cookie jar, and its
//! on-disk line format.
//!
//! ## Line Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      cookies.txt (one line per cookie)                  │
//! │                                                                         │
//! │  SID=31d4d96e; HttpOnly; Secure; Path=/; Domain=youtube.com;           │
//! │      Expires=Tue, 01 Jan 2030 00:00:00 GMT                              │
//! │  PREF=f6=40000000; Path=/; Domain=youtube.com                          │
//! │  VISITOR_INFO1_LIVE=xyz; SameSite=Lax; Secure; Path=/                  │
//! │                                                                         │
//! │  The same grammar a server uses in a `Set-Cookie` header, so the file   │
//! │  is readable by hand and parsed by the routine that builds cookies     │
//! │  for the jar.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Two records describe the same cookie when their [`CookieKey`]
//! (domain, path, name) is equal. The value, expiry and flags may differ
//! between two records with the same key; the later one wins.

use chrono::{DateTime, TimeDelta, Utc};
use cookie::time::OffsetDateTime;
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// SameSite
// =============================================================================

/// Same-site policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl From<cookie::SameSite> for SameSite {
    fn from(value: cookie::SameSite) -> Self {
        match value {
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::None => SameSite::None,
        }
    }
}

impl From<SameSite> for cookie::SameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::None => cookie::SameSite::None,
        }
    }
}

// =============================================================================
// Cookie Key
// =============================================================================

/// Identity of a cookie: `(domain, path, name)`.
///
/// Absent domain or path is stored as an empty string. The domain is
/// lowercase so `YouTube.com` and `youtube.com` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieKey {
    pub domain: String,
    pub path: String,
    pub name: String,
}

// =============================================================================
// Cookie Record
// =============================================================================

/// One cookie from the jar.
///
/// ## Normalization
/// - `domain` has no leading dot and is lowercase
/// - `expires` has whole-second precision (the wire format has no fractions)
///
/// Records built through [`CookieRecord::parse_line`] or
/// [`CookieRecord::from_cookie`] are always normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    /// `None` for session cookies.
    pub expires: Option<DateTime<Utc>>,
    /// Lifetime in seconds from a line with `Max-Age` but no `Expires`.
    /// Kept relative; the jar resolves it when the cookie is injected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl CookieRecord {
    /// Creates a session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        CookieRecord {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Sets the domain (normalized).
    pub fn with_domain(mut self, domain: impl AsRef<str>) -> Self {
        self.domain = normalize_domain(domain.as_ref());
        self
    }

    /// Sets the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the expiry, truncated to whole seconds.
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = DateTime::from_timestamp(expires.timestamp(), 0);
        self
    }

    /// Sets a relative lifetime, used only when there is no `expires`.
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Sets the `Secure` flag.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `HttpOnly` flag.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the same-site policy.
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Returns the identity of this cookie.
    pub fn key(&self) -> CookieKey {
        CookieKey {
            domain: self.domain.clone().unwrap_or_default(),
            path: self.path.clone().unwrap_or_default(),
            name: self.name.clone(),
        }
    }

    // =========================================================================
    // Wire Form
    // =========================================================================

    /// Parses one line of `cookies.txt`.
    ///
    /// The result depends only on `line`. A `Max-Age` attribute without
    /// `Expires` stays relative in [`CookieRecord::max_age`], so parsing an
    /// unchanged file twice gives equal records.
    ///
    /// ## Errors
    /// [`CoreError::InvalidCookie`] for empty lines, lines without a
    /// `name=value` pair and lines with an empty name.
    pub fn parse_line(line: &str) -> CoreResult<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CoreError::InvalidCookie {
                reason: "empty line".to_string(),
            });
        }

        let cookie = Cookie::parse(line)?;
        let expires = absolute_expiry(&cookie);
        let max_age = match expires {
            Some(_) => None,
            None => cookie.max_age().map(|age| age.whole_seconds()),
        };
        Ok(Self::from_parts(&cookie, expires, max_age))
    }

    /// Serializes this record as one Set-Cookie line (no trailing newline).
    ///
    /// ## Example
    /// ```rust
    /// use tube_core::cookie::CookieRecord;
    ///
    /// let record = CookieRecord::new("PREF", "f6=40000000")
    ///     .with_domain(".youtube.com")
    ///     .with_path("/");
    /// assert_eq!(record.to_line(), "PREF=f6=40000000; Path=/; Domain=youtube.com");
    /// ```
    pub fn to_line(&self) -> String {
        self.to_cookie().to_string()
    }

    // =========================================================================
    // Web View Cookie Conversion
    // =========================================================================

    /// Converts a cookie reported by the web view's jar.
    pub fn from_cookie(cookie: &Cookie<'_>) -> Self {
        Self::from_cookie_at(cookie, Utc::now())
    }

    /// Jar cookies are live, so a `Max-Age` without `Expires` is resolved
    /// against `now` here.
    fn from_cookie_at(cookie: &Cookie<'_>, now: DateTime<Utc>) -> Self {
        let expires = absolute_expiry(cookie).or_else(|| {
            let max_age = cookie.max_age()?;
            let delta = TimeDelta::try_seconds(max_age.whole_seconds())?;
            let at = now.checked_add_signed(delta)?;
            DateTime::from_timestamp(at.timestamp(), 0)
        });

        Self::from_parts(cookie, expires, None)
    }

    fn from_parts(
        cookie: &Cookie<'_>,
        expires: Option<DateTime<Utc>>,
        max_age: Option<i64>,
    ) -> Self {
        CookieRecord {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().and_then(normalize_domain),
            path: cookie.path().map(str::to_string),
            expires,
            max_age,
            secure: cookie.secure().unwrap_or(false),
            http_only: cookie.http_only().unwrap_or(false),
            same_site: cookie.same_site().map(SameSite::from),
        }
    }

    /// Builds the cookie type the web view accepts for injection.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), self.value.clone());

        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(path) = &self.path {
            cookie.set_path(path.clone());
        }
        if let Some(expires) = self
            .expires
            .and_then(|at| OffsetDateTime::from_unix_timestamp(at.timestamp()).ok())
        {
            cookie.set_expires(expires);
        } else if let Some(seconds) = self.max_age {
            cookie.set_max_age(cookie::time::Duration::seconds(seconds));
        }

        // Explicit `false` keeps SameSite=None from implying Secure on render.
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie.set_same_site(self.same_site.map(cookie::SameSite::from));

        cookie
    }
}

fn absolute_expiry(cookie: &Cookie<'_>) -> Option<DateTime<Utc>> {
    cookie
        .expires_datetime()
        .and_then(|at| DateTime::from_timestamp(at.unix_timestamp(), 0))
}

fn normalize_domain(domain: &str) -> Option<String> {
    let domain = domain.trim().trim_start_matches('.');
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_ascii_lowercase())
    }
}

// =============================================================================
// Deduplication
// =============================================================================

/// Collapses an append log to one record per key.
///
/// The last occurrence of each key wins. The output is ordered by the
/// position of that last occurrence, so replaying it gives the same jar as
/// replaying the full log.
pub fn latest_by_key(records: impl IntoIterator<Item = CookieRecord>) -> Vec<CookieRecord> {
    let records: Vec<CookieRecord> = records.into_iter().collect();

    let mut last_index: HashMap<CookieKey, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        last_index.insert(record.key(), index);
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(index, record)| last_index.get(&record.key()) == Some(index))
        .map(|(_, record)| record)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    // 2030-01-01T00:00:00Z
    const JAN_2030: i64 = 1_893_456_000;

    #[test]
    fn test_round_trip_secure_http_only() {
        let record = CookieRecord::new("SID", "31d4d96e407aad42")
            .with_domain(".youtube.com")
            .with_path("/")
            .with_secure(true)
            .with_http_only(true);

        let parsed = CookieRecord::parse_line(&record.to_line()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_round_trip_with_expiry() {
        let record = CookieRecord::new("LOGIN_INFO", "AFmmF2swRQ")
            .with_domain("youtube.com")
            .with_path("/")
            .with_expires(at(JAN_2030))
            .with_same_site(SameSite::Lax);

        let line = record.to_line();
        assert!(line.contains("Expires=Tue, 01 Jan 2030 00:00:00 GMT"));

        let parsed = CookieRecord::parse_line(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_round_trip_no_attributes() {
        let record = CookieRecord::new("YSC", "abc");
        assert_eq!(record.to_line(), "YSC=abc");
        assert_eq!(CookieRecord::parse_line("YSC=abc").unwrap(), record);
    }

    #[test]
    fn test_round_trip_same_site_none_without_secure() {
        let record = CookieRecord::new("a", "b").with_same_site(SameSite::None);
        let parsed = CookieRecord::parse_line(&record.to_line()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_raw_engine_line() {
        let line = "SID=xyz; secure; HttpOnly; expires=Tue, 01 Jan 2030 00:00:00 GMT; \
                    domain=.YouTube.com; path=/";
        let record = CookieRecord::parse_line(line).unwrap();

        assert_eq!(record.name, "SID");
        assert_eq!(record.value, "xyz");
        assert_eq!(record.domain.as_deref(), Some("youtube.com"));
        assert_eq!(record.path.as_deref(), Some("/"));
        assert_eq!(record.expires, Some(at(JAN_2030)));
        assert!(record.secure);
        assert!(record.http_only);
        assert_eq!(record.same_site, None);
    }

    #[test]
    fn test_max_age_line_stays_relative() {
        let first = CookieRecord::parse_line("a=b; Max-Age=3600").unwrap();
        let second = CookieRecord::parse_line("a=b; Max-Age=3600").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.expires, None);
        assert_eq!(first.max_age, Some(3600));
        assert_eq!(first.to_line(), "a=b; Max-Age=3600");
        assert_eq!(
            first.to_cookie().max_age(),
            Some(cookie::time::Duration::seconds(3600))
        );
    }

    #[test]
    fn test_expires_wins_over_max_age() {
        let line = "a=b; Max-Age=60; Expires=Tue, 01 Jan 2030 00:00:00 GMT";
        let record = CookieRecord::parse_line(line).unwrap();
        assert_eq!(record.expires, Some(at(JAN_2030)));
        assert_eq!(record.max_age, None);
        assert!(!record.to_line().contains("Max-Age"));
    }

    #[test]
    fn test_jar_max_age_resolved_against_now() {
        let mut cookie = Cookie::new("a", "b");
        cookie.set_max_age(cookie::time::Duration::seconds(3600));

        let record = CookieRecord::from_cookie_at(&cookie, at(1_700_000_000));
        assert_eq!(record.expires, Some(at(1_700_003_600)));
        assert_eq!(record.max_age, None);
    }

    #[test]
    fn test_invalid_lines() {
        assert!(CookieRecord::parse_line("").is_err());
        assert!(CookieRecord::parse_line("   ").is_err());
        assert!(CookieRecord::parse_line("garbage without pair").is_err());
        assert!(CookieRecord::parse_line("=value-without-name").is_err());
    }

    #[test]
    fn test_key_identity() {
        let a = CookieRecord::new("SID", "1").with_domain("YouTube.com").with_path("/");
        let b = CookieRecord::new("SID", "2").with_domain(".youtube.com").with_path("/");
        let c = CookieRecord::new("SID", "3").with_domain("youtube.com").with_path("/feed");

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(CookieRecord::new("x", "y").key().domain, "");
    }

    #[test]
    fn test_with_expires_truncates_subseconds() {
        let precise = DateTime::from_timestamp(JAN_2030, 500_000_000).unwrap();
        let record = CookieRecord::new("a", "b").with_expires(precise);
        assert_eq!(record.expires, Some(at(JAN_2030)));
    }

    #[test]
    fn test_cookie_conversion_round_trip() {
        let record = CookieRecord::new("SID", "v")
            .with_domain("youtube.com")
            .with_path("/")
            .with_expires(at(JAN_2030))
            .with_secure(true)
            .with_same_site(SameSite::Strict);

        assert_eq!(CookieRecord::from_cookie(&record.to_cookie()), record);
    }

    #[test]
    fn test_latest_by_key_last_wins() {
        let log = vec![
            CookieRecord::new("SID", "old").with_domain("youtube.com").with_path("/"),
            CookieRecord::new("PREF", "1").with_domain("youtube.com").with_path("/"),
            CookieRecord::new("SID", "new").with_domain("youtube.com").with_path("/"),
        ];

        let latest = latest_by_key(log);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].name, "PREF");
        assert_eq!(latest[1].name, "SID");
        assert_eq!(latest[1].value, "new");
    }

    #[test]
    fn test_latest_by_key_keeps_distinct_paths() {
        let log = vec![
            CookieRecord::new("SID", "a").with_path("/"),
            CookieRecord::new("SID", "b").with_path("/feed"),
        ];
        assert_eq!(latest_by_key(log).len(), 2);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = CookieRecord::new("a", "b").with_http_only(true);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"httpOnly\":true"));
        assert!(json.contains("\"sameSite\":null"));
    }
}
