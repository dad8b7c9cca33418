//! Ant-style path matching.
//!
//! # Pattern Syntax
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within a path segment
//! - `**` matches zero or more path segments
//! - `{name}` matches exactly one path segment
//!
//! # Example
//!
//! ```rust
//! use actix_bootstrap_core::http::security::ant_matcher::AntMatcher;
//!
//! let matcher = AntMatcher::new("/public/**");
//! assert!(matcher.matches("/public"));
//! assert!(matcher.matches("/public/data/2024"));
//! assert!(!matcher.matches("/private/data"));
//!
//! let matcher = AntMatcher::new("/users/*/profile");
//! assert!(matcher.matches("/users/123/profile"));
//! assert!(!matcher.matches("/users/123/456/profile"));
//! ```
//!
//! # Spring Equivalent
//!
//! `org.springframework.util.AntPathMatcher`

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` or `{name}`: any single segment.
    AnySegment,
    /// `**`: any number of segments, including none.
    AnyDepth,
    /// A segment containing `*` or `?`.
    Wildcard(Vec<char>),
}

/// A compiled Ant-style pattern.
#[derive(Debug, Clone)]
pub struct AntMatcher {
    pattern: String,
    segments: Vec<Segment>,
    case_sensitive: bool,
}

impl AntMatcher {
    pub fn new(pattern: &str) -> Self {
        AntMatcher {
            pattern: pattern.to_string(),
            segments: compile(pattern, true),
            case_sensitive: true,
        }
    }

    /// Makes literal and wildcard segments ignore ASCII case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self.segments = compile(&self.pattern, false);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<String> = split(path)
            .map(|s| {
                if self.case_sensitive {
                    s.to_string()
                } else {
                    s.to_ascii_lowercase()
                }
            })
            .collect();
        match_segments(&self.segments, &path)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn compile(pattern: &str, case_sensitive: bool) -> Vec<Segment> {
    split(pattern)
        .map(|part| {
            let part = if case_sensitive {
                part.to_string()
            } else {
                part.to_ascii_lowercase()
            };
            match part.as_str() {
                "**" => Segment::AnyDepth,
                "*" => Segment::AnySegment,
                p if p.starts_with('{') && p.ends_with('}') => Segment::AnySegment,
                p if p.contains(['*', '?']) => Segment::Wildcard(p.chars().collect()),
                _ => Segment::Literal(part),
            }
        })
        .collect()
}

fn match_segments(pattern: &[Segment], path: &[String]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            None => false,
            Some((head, tail)) => {
                let matched = match segment {
                    Segment::Literal(literal) => literal == head,
                    Segment::AnySegment => true,
                    Segment::Wildcard(chars) => match_wildcard(chars, head),
                    Segment::AnyDepth => unreachable!("handled above"),
                };
                matched && match_segments(rest, tail)
            }
        },
    }
}

/// Greedy wildcard match with single-star backtracking.
fn match_wildcard(pattern: &[char], text: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_wildcard_matches_any_depth() {
        let matcher = AntMatcher::new("/api/**");
        assert!(matcher.matches("/api"));
        assert!(matcher.matches("/api/"));
        assert!(matcher.matches("/api/properties/mail"));
        assert!(!matcher.matches("/apis/x"));
    }

    #[test]
    fn test_catch_all() {
        let matcher = AntMatcher::new("/**");
        assert!(matcher.matches("/"));
        assert!(matcher.matches("/anything/at/all"));
    }

    #[test]
    fn test_double_wildcard_in_the_middle() {
        let matcher = AntMatcher::new("/files/**/*.pdf");
        assert!(matcher.matches("/files/report.pdf"));
        assert!(matcher.matches("/files/2024/q1/report.pdf"));
        assert!(!matcher.matches("/files/2024/report.txt"));
    }

    #[test]
    fn test_exact_literal() {
        let matcher = AntMatcher::new("/doc.html");
        assert!(matcher.matches("/doc.html"));
        assert!(!matcher.matches("/doc.htm"));
        assert!(!matcher.matches("/doc.html/x"));
    }

    #[test]
    fn test_segment_wildcards() {
        assert!(AntMatcher::new("/file?.txt").matches("/file1.txt"));
        assert!(!AntMatcher::new("/file?.txt").matches("/file12.txt"));
        assert!(AntMatcher::new("/img/*.png").matches("/img/logo.png"));
        assert!(AntMatcher::new("/a*b*c").matches("/axxbyyc"));
        assert!(!AntMatcher::new("/a*b*c").matches("/axxbyy"));
    }

    #[test]
    fn test_variable_matches_one_segment() {
        let matcher = AntMatcher::new("/users/{id}");
        assert!(matcher.matches("/users/42"));
        assert!(!matcher.matches("/users"));
        assert!(!matcher.matches("/users/42/posts"));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = AntMatcher::new("/Public/**").case_insensitive();
        assert!(matcher.matches("/PUBLIC/Data"));
        assert!(!AntMatcher::new("/Public/**").matches("/public/data"));
    }
}
