//! URL extraction from pasted text and delimited files.
//!
//! Extraction is best-effort: tokens that do not look like URLs are never
//! extracted. Normalization is intentionally minimal, it only guarantees a
//! protocol and keeps path and query untouched.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::error::ImportError;

/// A full `scheme://...` URL or a bare `host.tld[:port][/path]`.
///
/// Any scheme is matched so that hosts inside `ftp://...` and the like are
/// consumed whole; callers drop those with [`has_foreign_scheme`].
const URL_PATTERN: &str = r"(?i)(?:\b[a-z][a-z0-9+.-]*://[^\s<>'`]+|\b(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b(?::\d{1,5})?(?:/[^\s<>'`]*)?)";

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(URL_PATTERN).unwrap());

static CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{URL_PATTERN}$")).unwrap());

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"'];

/// Scans free text for URLs and returns them normalized and deduplicated.
///
/// # Examples
///
/// ```ignore
/// let urls = extract_from_free_text("google.com, https://github.com, google.com");
/// assert_eq!(urls, vec!["https://google.com", "https://github.com"]);
/// ```
pub fn extract_from_free_text(text: &str) -> Vec<String> {
    let candidates = URL_REGEX
        .find_iter(text)
        .map(|m| trim_trailing(m.as_str()))
        .filter(|s| !s.is_empty() && !has_foreign_scheme(s))
        .map(normalize);

    dedupe(candidates)
}

/// Extracts URLs from newline-delimited rows of comma-separated cells.
///
/// Surrounding quotes are stripped from each cell; a cell qualifies only if the
/// whole cell looks like a URL, so headers and titles are ignored.
pub fn extract_from_delimited(text: &str) -> Vec<String> {
    let candidates = text
        .lines()
        .flat_map(|line| line.split(','))
        .map(|cell| cell.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|cell| is_url_candidate(cell))
        .map(normalize);

    dedupe(candidates)
}

/// Trims whitespace and prepends `https://` when no http(s) protocol is present.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// True if the whole input looks like a URL (with or without protocol).
///
/// Explicit schemes other than http(s) are rejected.
pub fn is_url_candidate(raw: &str) -> bool {
    CELL_REGEX.is_match(raw) && !has_foreign_scheme(raw)
}

/// Checks that a normalized URL parses as http(s) with a host.
///
/// # Errors
///
/// Returns [`ImportError::InvalidUrl`] otherwise.
pub fn validate(url: &str) -> Result<(), ImportError> {
    let parsed = Url::parse(url).map_err(|_| ImportError::InvalidUrl)?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(ImportError::InvalidUrl),
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ImportError::InvalidUrl),
    }
}

/// Normalizes and validates an explicitly submitted single URL.
///
/// # Errors
///
/// Returns [`ImportError::InvalidUrl`] when the input does not look like a URL
/// or does not parse after normalization.
pub fn parse_single(raw: &str) -> Result<String, ImportError> {
    let trimmed = raw.trim();
    if !is_url_candidate(trimmed) {
        return Err(ImportError::InvalidUrl);
    }
    let url = normalize(trimmed);
    validate(&url)?;
    Ok(url)
}

/// Collapses duplicates, keeping the first occurrence's position.
fn dedupe(urls: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.filter(|url| seen.insert(url.clone())).collect()
}

/// Strips sentence punctuation from the end of a match.
///
/// A closing bracket is only stripped while it has no opening partner inside
/// the match, so `wiki/Rust_(language)` survives but `(see a.com)` does not.
fn trim_trailing(candidate: &str) -> &str {
    let mut s = candidate;
    while let Some(last) = s.chars().last() {
        let strip = match last {
            ')' => unbalanced(s, '(', ')'),
            ']' => unbalanced(s, '[', ']'),
            '}' => unbalanced(s, '{', '}'),
            c => TRAILING_PUNCTUATION.contains(&c),
        };
        if !strip {
            break;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
    s
}

fn unbalanced(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}

/// True for `scheme://` prefixes other than http and https.
fn has_foreign_scheme(s: &str) -> bool {
    s.contains("://") && !has_http_scheme(s)
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
