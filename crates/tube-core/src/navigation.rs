//! # Navigation Classifier
//!
//! Turns free-form address bar input into the address the web view loads.
//!
//! ## Dispatch Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Address Bar Input                                  │
//! │                                                                         │
//! │  "   "  ──────────────────────────────────────────────► None (no-op)   │
//! │                                                                         │
//! │  "youtu.be/abc123"                                                      │
//! │  "https://www.youtube.com/watch?v=abc123"                               │
//! │     │  matches (https?://)?(www.)?(youtube.com|youtu.be)/.+             │
//! │     ▼                                                                   │
//! │  Direct(url) ─── no scheme? prefix https:// ──────────► web view       │
//! │                                                                         │
//! │  "lo-fi beats"                                                          │
//! │     │  anything else                                                    │
//! │     ▼                                                                   │
//! │  Search ─── https://www.youtube.com/results?search_query=lo-fi+beats ─► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Encoding
//! The search phrase is form-encoded (`application/x-www-form-urlencoded`):
//! spaces become `+`, reserved bytes become `%XX`. Raw interpolation would
//! produce broken addresses for input like `a&b` or `50% off`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

// =============================================================================
// Constants
// =============================================================================

/// Page loaded when the window opens.
pub const HOME_URL: &str = "https://www.youtube.com";

/// Search results endpoint.
pub const SEARCH_URL: &str = "https://www.youtube.com/results";

/// Query parameter carrying the search phrase.
pub const SEARCH_PARAM: &str = "search_query";

/// Scheme used when a direct address is typed without one.
const DEFAULT_SCHEME: &str = "https://";

static DIRECT_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("direct address pattern is valid")
});

static SEARCH_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(SEARCH_URL).expect("search endpoint is a valid URL"));

// =============================================================================
// Destination
// =============================================================================

/// Where a submission from the address bar leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The user typed a site address; loaded as-is (scheme normalized).
    Direct(Url),

    /// Anything else is searched on the site.
    Search {
        /// Trimmed phrase as typed.
        query: String,
        /// Results page for `query`.
        url: Url,
    },
}

impl Destination {
    /// Address to hand to the web view.
    pub fn url(&self) -> &Url {
        match self {
            Destination::Direct(url) => url,
            Destination::Search { url, .. } => url,
        }
    }

    /// Address as a string slice.
    pub fn as_str(&self) -> &str {
        self.url().as_str()
    }

    /// Consumes the destination, returning the address.
    pub fn into_url(self) -> Url {
        match self {
            Destination::Direct(url) => url,
            Destination::Search { url, .. } => url,
        }
    }

    /// Returns true if the input was treated as a search phrase.
    pub fn is_search(&self) -> bool {
        matches!(self, Destination::Search { .. })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Classifies address bar input.
///
/// ## Returns
/// * `None` - input is empty after trimming; the caller must not navigate
/// * `Some(Destination::Direct)` - a youtube.com / youtu.be address with a path
/// * `Some(Destination::Search)` - everything else
///
/// ## Example
/// ```rust
/// use tube_core::navigation::classify;
///
/// let dest = classify("cats").unwrap();
/// assert_eq!(dest.as_str(), "https://www.youtube.com/results?search_query=cats");
///
/// let dest = classify("youtu.be/abc123").unwrap();
/// assert_eq!(dest.as_str(), "https://youtu.be/abc123");
///
/// assert!(classify("   ").is_none());
/// ```
pub fn classify(input: &str) -> Option<Destination> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(url) = direct_url(input) {
        return Some(Destination::Direct(url));
    }

    Some(Destination::Search {
        query: input.to_string(),
        url: search_url(input),
    })
}

/// Builds the results page address for a search phrase.
pub fn search_url(query: &str) -> Url {
    let mut url = SEARCH_BASE.clone();
    url.query_pairs_mut().append_pair(SEARCH_PARAM, query);
    url
}

/// Parses `input` as a direct site address, if it is one.
///
/// Input that matches the pattern but still is not a valid URL falls back
/// to search.
fn direct_url(input: &str) -> Option<Url> {
    let captures = DIRECT_ADDRESS.captures(input)?;

    let candidate = if captures.get(1).is_some() {
        input.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{input}")
    };

    Url::parse(&candidate).ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(input: &str) -> Destination {
        classify(input).expect("non-empty input always yields a destination")
    }

    #[test]
    fn test_empty_input_declines() {
        assert!(classify("").is_none());
        assert!(classify("   ").is_none());
        assert!(classify("\t\n").is_none());
    }

    #[test]
    fn test_plain_word_is_search() {
        let d = dest("cats");
        assert!(d.is_search());
        assert_eq!(d.as_str(), "https://www.youtube.com/results?search_query=cats");
    }

    #[test]
    fn test_search_input_is_trimmed() {
        assert_eq!(
            dest("  cats  ").as_str(),
            "https://www.youtube.com/results?search_query=cats"
        );
    }

    #[test]
    fn test_search_query_is_encoded() {
        let d = dest("lo-fi beats & chill");
        assert_eq!(
            d.as_str(),
            "https://www.youtube.com/results?search_query=lo-fi+beats+%26+chill"
        );

        let d = dest("50% off #deals");
        assert_eq!(
            d.as_str(),
            "https://www.youtube.com/results?search_query=50%25+off+%23deals"
        );
    }

    #[test]
    fn test_search_query_decodes_back_to_input() {
        let input = "über café ?=&+";
        let d = dest(input);
        let (key, value) = d
            .url()
            .query_pairs()
            .next()
            .expect("search url carries one pair");
        assert_eq!(key, SEARCH_PARAM);
        assert_eq!(value, input);
    }

    #[test]
    fn test_full_address_is_unchanged() {
        let d = dest("https://www.youtube.com/watch?v=abc123");
        assert_eq!(
            d,
            Destination::Direct(Url::parse("https://www.youtube.com/watch?v=abc123").unwrap())
        );
        assert_eq!(d.as_str(), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_short_link_gets_https_scheme() {
        assert_eq!(dest("youtu.be/abc123").as_str(), "https://youtu.be/abc123");
        assert_eq!(
            dest("www.youtube.com/watch?v=x").as_str(),
            "https://www.youtube.com/watch?v=x"
        );
    }

    #[test]
    fn test_http_scheme_is_kept() {
        assert_eq!(
            dest("http://youtube.com/feed/subscriptions").as_str(),
            "http://youtube.com/feed/subscriptions"
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let d = dest("HTTPS://WWW.YouTube.com/watch?v=AbC");
        assert!(!d.is_search());
        assert_eq!(d.as_str(), "https://www.youtube.com/watch?v=AbC");
    }

    #[test]
    fn test_host_without_path_is_search() {
        assert!(dest("youtube.com").is_search());
        assert!(dest("youtube.com/").is_search());
        assert!(dest("https://youtu.be").is_search());
    }

    #[test]
    fn test_other_hosts_are_search() {
        assert!(dest("notyoutube.com/watch").is_search());
        assert!(dest("https://youtube.com.evil.net/x").is_search());
        assert!(dest("https://example.com/youtube.com/x").is_search());
    }

    #[test]
    fn test_into_url_and_display() {
        let d = dest("cats");
        assert_eq!(d.to_string(), d.as_str());
        assert_eq!(d.into_url().query(), Some("search_query=cats"));
    }

    #[test]
    fn test_home_url_is_valid() {
        assert!(Url::parse(HOME_URL).is_ok());
    }
}
