//! # Field Extraction Combinators
//!
//! Small, total helpers that cut an identifier into named pieces. Every
//! boundary the converter uses is computed here once, by one of three
//! operations:
//!
//! - split at dots ([`split_dots`]) for URN fields,
//! - split at a fixed width ([`split_width`]) for numeric payloads,
//! - split at a marker segment ([`DigitalLink::segment`]) for URI paths.
//!
//! None of these panic on malformed input; they return `None` instead.

use thiserror::Error;
use url::{Host, ParseError, Url};

/// Why a string could not be read as a Digital Link URI.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Not an absolute `http` or `https` URL.
    #[error("not an http(s) URI")]
    NotHttp,
    /// An `http(s)` URL whose host or port is unusable.
    #[error("malformed domain")]
    MalformedHost,
}

/// A parsed `http(s)` Digital Link URI.
///
/// Scheme, host, port and query come from [`Url`]; this type only adds the
/// `/<key>/<value>` pairing of path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalLink {
    url: Url,
}

impl DigitalLink {
    /// Parse an `http(s)://host/path?query` string.
    ///
    /// # Errors
    ///
    /// - [`LinkError::MalformedHost`] for an `http(s)` URL whose host or
    ///   port does not parse, or whose domain has an empty label
    ///   (`bad..host`).
    /// - [`LinkError::NotHttp`] for anything else that is not an `http(s)`
    ///   URL.
    pub fn try_parse(uri: &str) -> Result<Self, LinkError> {
        let looks_http = uri.starts_with("https://") || uri.starts_with("http://");
        let url = Url::parse(uri).map_err(|e| match e {
            ParseError::EmptyHost
            | ParseError::IdnaError
            | ParseError::InvalidPort
            | ParseError::InvalidIpv4Address
            | ParseError::InvalidIpv6Address
            | ParseError::InvalidDomainCharacter
                if looks_http =>
            {
                LinkError::MalformedHost
            }
            _ => LinkError::NotHttp,
        })?;
        match url.scheme() {
            "http" | "https" => {}
            _ => return Err(LinkError::NotHttp),
        }
        match url.host() {
            Some(Host::Domain(domain)) if domain.split('.').any(str::is_empty) => {
                Err(LinkError::MalformedHost)
            }
            Some(_) => Ok(Self { url }),
            None => Err(LinkError::MalformedHost),
        }
    }

    /// [`DigitalLink::try_parse`], discarding the reason.
    pub fn parse(uri: &str) -> Option<Self> {
        Self::try_parse(uri).ok()
    }

    /// `http` or `https`.
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host name or address, lowercased, without the port.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, unless it is the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// Query string without the leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Path segments in order. The bare root path has none.
    pub fn segments(&self) -> Vec<&str> {
        let segments: Vec<&str> = self
            .url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        match segments.as_slice() {
            [""] => Vec::new(),
            _ => segments,
        }
    }

    /// The first path segment, which carries the primary AI code.
    pub fn primary_code(&self) -> Option<&str> {
        self.segments().first().copied()
    }

    /// Key segments: the segments at even positions (`/<key>/<value>/…`).
    pub fn key_codes(&self) -> Vec<&str> {
        self.segments().into_iter().step_by(2).collect()
    }

    /// The value that follows the key segment `code`, if `code` occurs at a
    /// key position.
    pub fn segment(&self, code: &str) -> Option<&str> {
        self.segments()
            .chunks(2)
            .find(|pair| pair[0] == code)
            .and_then(|pair| pair.get(1).copied())
    }

    /// Whether `code` occurs at a key position.
    pub fn has_key(&self, code: &str) -> bool {
        self.key_codes().contains(&code)
    }

    /// Reassemble with a different scheme and host, keeping path and query.
    pub fn with_origin(&self, origin: &str) -> String {
        let mut out = format!("{origin}{}", self.url.path());
        if let Some(query) = self.url.query() {
            out.push('?');
            out.push_str(query);
        }
        out
    }
}

/// Split `value` into exactly `count` dot-separated fields.
///
/// The last field keeps any further dots (serials may contain them).
pub fn split_dots(value: &str, count: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = value.splitn(count, '.').collect();
    (fields.len() == count).then_some(fields)
}

/// Split `value` at byte offset `at`, failing on overrun or a non-boundary.
pub fn split_width(value: &str, at: usize) -> Option<(&str, &str)> {
    value.split_at_checked(at)
}

/// Length in characters, counting a `%XX` escape as a single character.
pub fn unit_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let mut units = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            i += 3;
        } else {
            i += value[i..].chars().next().map_or(1, char::len_utf8);
        }
        units += 1;
    }
    units
}

/// Whether every byte of `value` is an ASCII digit (and it is non-empty).
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
