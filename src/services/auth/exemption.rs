//! Which requests bypass authentication entirely.
//!
//! Rules are built once from configuration and never change afterwards, so the
//! matcher is shared between requests without synchronisation.
//!
//! Rule syntax: `PATTERN` or `METHOD PATTERN`, e.g. `/swagger-ui/**` or
//! `POST /member/save`.
//!
//! Pattern syntax (segment based, case-sensitive):
//! - `**` as a whole segment matches zero or more segments
//! - `*` matches zero or more characters inside one segment
//! - `?` matches exactly one character inside one segment
//!
//! Empty segments are ignored, so `/docs/**` also matches `/docs` and `/docs/`.

use std::fmt;

use axum::http::Method;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExemptionError {
    #[error("empty exemption rule")]
    Empty,
    #[error("invalid HTTP method in exemption rule: {0}")]
    InvalidMethod(String),
    #[error("exemption pattern must start with '/': {0}")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard(Vec<char>),
    AnyDepth,
}

/// A compiled path pattern.
#[derive(Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, ExemptionError> {
        if !raw.starts_with('/') {
            return Err(ExemptionError::InvalidPattern(raw.to_string()));
        }

        let segments = split_path(raw)
            .map(|s| match s {
                "**" => Segment::AnyDepth,
                s if s.contains(['*', '?']) => Segment::Wildcard(s.chars().collect()),
                s => Segment::Literal(s.to_string()),
            })
            .collect();

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    glob_match(
        pattern,
        path,
        |segment| matches!(segment, Segment::AnyDepth),
        |segment, text| match segment {
            Segment::Literal(lit) => lit == *text,
            Segment::Wildcard(glob) => wildcard_match(glob, text),
            Segment::AnyDepth => true,
        },
    )
}

// Single-segment glob: `*` (any run) and `?` (one char).
fn wildcard_match(pattern: &[char], text: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    glob_match(pattern, &text, |&c| c == '*', |&c, &t| c == '?' || c == t)
}

// Greedy glob with one backtrack point (the last "match anything" token seen).
// Runs in O(pattern * text) whatever the number of wildcards.
fn glob_match<P, T>(
    pattern: &[P],
    text: &[T],
    is_any: impl Fn(&P) -> bool,
    matches_one: impl Fn(&P, &T) -> bool,
) -> bool {
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some(p) if is_any(p) => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(p) if matches_one(p, &text[ti]) => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    pi = sp + 1;
                    ti = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(is_any)
}

/// One exemption: a path pattern, optionally restricted to a single method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionRule {
    method: Option<Method>,
    pattern: PathPattern,
}

impl ExemptionRule {
    pub fn parse(rule: &str) -> Result<Self, ExemptionError> {
        let rule = rule.trim();
        if rule.is_empty() {
            return Err(ExemptionError::Empty);
        }

        let (method, pattern) = match rule.split_once(char::is_whitespace) {
            Some((method, pattern)) if !method.starts_with('/') => {
                (Some(parse_method(method)?), pattern.trim())
            }
            _ => (None, rule),
        };

        Ok(Self {
            method,
            pattern: PathPattern::parse(pattern)?,
        })
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(required) = &self.method
            && required != method
        {
            return false;
        }
        self.pattern.matches(path)
    }
}

fn parse_method(method: &str) -> Result<Method, ExemptionError> {
    if !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ExemptionError::InvalidMethod(method.to_string()));
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| ExemptionError::InvalidMethod(method.to_string()))
}

/// Ordered, immutable set of exemption rules.
#[derive(Debug, Clone, Default)]
pub struct ExemptionMatcher {
    rules: Vec<ExemptionRule>,
}

impl ExemptionMatcher {
    pub fn new(rules: Vec<ExemptionRule>) -> Self {
        Self { rules }
    }

    pub fn parse<I, S>(rules: I) -> Result<Self, ExemptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|r| ExemptionRule::parse(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Pre-flight (`OPTIONS`) requests are always exempt, whatever the path.
    pub fn is_exempt(&self, method: &Method, path: &str) -> bool {
        if method == Method::OPTIONS {
            return true;
        }
        self.rules.iter().any(|rule| rule.matches(method, path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(rules: &[&str]) -> ExemptionMatcher {
        ExemptionMatcher::parse(rules.iter().copied()).unwrap()
    }

    #[test]
    fn double_star_matches_any_suffix_including_the_base() {
        let m = matcher(&["/swagger-ui/**"]);

        assert!(m.is_exempt(&Method::GET, "/swagger-ui"));
        assert!(m.is_exempt(&Method::GET, "/swagger-ui/"));
        assert!(m.is_exempt(&Method::GET, "/swagger-ui/index.html"));
        assert!(m.is_exempt(&Method::POST, "/swagger-ui/a/b/c"));
        assert!(!m.is_exempt(&Method::GET, "/swagger-uix"));
        assert!(!m.is_exempt(&Method::GET, "/api/swagger-ui"));
    }

    #[test]
    fn double_star_in_the_middle_spans_segments() {
        let m = matcher(&["/files/**/raw"]);

        assert!(m.is_exempt(&Method::GET, "/files/raw"));
        assert!(m.is_exempt(&Method::GET, "/files/a/b/raw"));
        assert!(!m.is_exempt(&Method::GET, "/files/a/b/raw/x"));
    }

    #[test]
    fn single_star_matches_exactly_one_segment() {
        let m = matcher(&["/public/*"]);

        assert!(m.is_exempt(&Method::GET, "/public/logo"));
        assert!(!m.is_exempt(&Method::GET, "/public"));
        assert!(!m.is_exempt(&Method::GET, "/public/a/b"));
    }

    #[test]
    fn star_and_question_mark_inside_a_segment() {
        let m = matcher(&["/assets/*.png", "/v?/status"]);

        assert!(m.is_exempt(&Method::GET, "/assets/logo.png"));
        assert!(m.is_exempt(&Method::GET, "/assets/.png"));
        assert!(!m.is_exempt(&Method::GET, "/assets/logo.jpg"));
        assert!(m.is_exempt(&Method::GET, "/v1/status"));
        assert!(!m.is_exempt(&Method::GET, "/v10/status"));
    }

    #[test]
    fn literal_patterns_are_exact_and_case_sensitive() {
        let m = matcher(&["/member/logout"]);

        assert!(m.is_exempt(&Method::POST, "/member/logout"));
        assert!(!m.is_exempt(&Method::POST, "/member/logout/now"));
        assert!(!m.is_exempt(&Method::POST, "/Member/Logout"));
        assert!(!m.is_exempt(&Method::POST, "/member"));
    }

    #[test]
    fn method_constraint_limits_the_rule() {
        let m = matcher(&["POST /member/save"]);

        assert!(m.is_exempt(&Method::POST, "/member/save"));
        assert!(!m.is_exempt(&Method::GET, "/member/save"));
        assert!(!m.is_exempt(&Method::DELETE, "/member/save"));
    }

    #[test]
    fn options_is_always_exempt() {
        let m = ExemptionMatcher::default();

        assert!(m.is_empty());
        assert!(m.is_exempt(&Method::OPTIONS, "/anything/at/all"));
        assert!(!m.is_exempt(&Method::GET, "/anything/at/all"));
    }

    #[test]
    fn any_rule_in_the_list_may_match() {
        let m = matcher(&["/health", "/v3/api-docs/**", "GET /public/*"]);

        assert_eq!(m.len(), 3);
        assert!(m.is_exempt(&Method::GET, "/health"));
        assert!(m.is_exempt(&Method::GET, "/v3/api-docs/swagger-config"));
        assert!(m.is_exempt(&Method::GET, "/public/x"));
        assert!(!m.is_exempt(&Method::GET, "/api/v1/me"));
    }

    #[test]
    fn root_patterns() {
        assert!(matcher(&["/**"]).is_exempt(&Method::GET, "/"));
        assert!(matcher(&["/**"]).is_exempt(&Method::GET, "/deep/path"));
        assert!(matcher(&["/"]).is_exempt(&Method::GET, "/"));
        assert!(!matcher(&["/"]).is_exempt(&Method::GET, "/x"));
    }

    #[test]
    fn many_double_stars_stay_cheap_on_long_paths() {
        let m = matcher(&["/**/a/**/a/**/a/**/a/**/a/**/b"]);
        let mut path = "/a".repeat(5_000);

        assert!(!m.is_exempt(&Method::GET, &path));
        path.push_str("/b");
        assert!(m.is_exempt(&Method::GET, &path));
    }

    #[test]
    fn rejects_invalid_rules() {
        assert_eq!(ExemptionRule::parse("  "), Err(ExemptionError::Empty));
        assert_eq!(
            ExemptionRule::parse("member/save"),
            Err(ExemptionError::InvalidPattern("member/save".into()))
        );
        assert_eq!(
            ExemptionRule::parse("post /member/save"),
            Err(ExemptionError::InvalidMethod("post".into()))
        );
        assert_eq!(
            ExemptionRule::parse("GET member/save"),
            Err(ExemptionError::InvalidPattern("member/save".into()))
        );
    }
}
