//! Route pattern syntax.
//!
//! A pattern is a `/`-separated path where a segment starting with `:` is a
//! named parameter and a final segment starting with `*` is a wildcard that
//! swallows the rest of the request path:
//!
//! ```text
//! /users/:id/posts/:post      two parameters
//! /files/*path                trailing wildcard
//! ```
//!
//! Parsing splits a pattern into maximal static runs and dynamic segments.
//! A static run may span several path segments (`/users/` above).

use crate::routing::error::PatternError;

pub(crate) const PARAM_MARKER: u8 = b':';
pub(crate) const WILDCARD_MARKER: u8 = b'*';

/// One piece of a parsed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, matched byte for byte.
    Static(&'a str),
    /// `:name`, matches one non-empty path segment.
    Param(&'a str),
    /// `*name`, matches the non-empty remainder of the path.
    Wildcard(&'a str),
}

/// Split `pattern` into segments, rejecting anything the tree cannot hold.
pub fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, PatternError> {
    let bytes = pattern.as_bytes();
    if bytes.is_empty() {
        return Err(PatternError::Empty);
    }
    if bytes[0] != b'/' {
        return Err(PatternError::MissingLeadingSlash);
    }

    let mut segments = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let marker = bytes[i];
        if marker != PARAM_MARKER && marker != WILDCARD_MARKER {
            i += 1;
            continue;
        }
        if bytes[i - 1] != b'/' {
            return Err(PatternError::MarkerInsideSegment {
                marker: marker as char,
                offset: i,
            });
        }
        if start < i {
            segments.push(Segment::Static(&pattern[start..i]));
        }

        let end = bytes[i + 1..]
            .iter()
            .position(|&b| b == b'/')
            .map_or(bytes.len(), |p| i + 1 + p);
        let name = &pattern[i + 1..end];
        if name.is_empty() {
            return Err(PatternError::EmptyName(i));
        }
        if let Some(p) = name
            .bytes()
            .position(|b| b == PARAM_MARKER || b == WILDCARD_MARKER)
        {
            return Err(PatternError::MarkerInsideSegment {
                marker: name.as_bytes()[p] as char,
                offset: i + 1 + p,
            });
        }
        if names.contains(&name) {
            return Err(PatternError::DuplicateName(name.to_string()));
        }
        names.push(name);

        if marker == WILDCARD_MARKER {
            if end < bytes.len() {
                return Err(PatternError::WildcardNotLast(name.to_string()));
            }
            segments.push(Segment::Wildcard(name));
            return Ok(segments);
        }

        segments.push(Segment::Param(name));
        i = end;
        start = end;
    }

    if start < bytes.len() {
        segments.push(Segment::Static(&pattern[start..]));
    }
    Ok(segments)
}

/// Byte length of the longest common prefix, always on a char boundary.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}
