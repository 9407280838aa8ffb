//! Pattern dialect used by [`PatternFilter`](super::PatternFilter).
//!
//! Callers write patterns in the usual backtracking-engine dialect, where a
//! bare `$` also matches before a trailing newline, braces that do not form a
//! quantifier are literal, and `{,n}` means `{0,n}`. [`Pattern`] rewrites
//! those forms into `regex` syntax and iterates matches the same way such
//! engines do: an empty match may follow a non-empty one at the same
//! position, but two empty matches never share a position.
//!
//! Look-around and backreferences have no `regex` equivalent and still fail
//! to compile.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// Compiled program size cap for caller-supplied patterns (2 MiB).
const PATTERN_SIZE_LIMIT: usize = 2 * (1 << 20);

/// A caller pattern compiled for filtering.
#[derive(Debug)]
pub(super) struct Pattern {
    regex: Regex,
    /// The pattern contains a bare `$`, which must also match before a
    /// final `'\n'`.
    end_anchor: bool,
}

impl Pattern {
    pub(super) fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let (translated, end_anchor) = translate(pattern);
        let regex = RegexBuilder::new(&translated)
            .dot_matches_new_line(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex, end_anchor })
    }

    /// Byte ranges of successive non-overlapping matches in `text`.
    pub(super) fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while let Some(span) = self.find_from(text, pos) {
            pos = if span.is_empty() {
                match next_boundary(text, span.end) {
                    Some(next) => next,
                    None => {
                        spans.push(span);
                        break;
                    }
                }
            } else {
                span.end
            };
            spans.push(span);
        }

        spans
    }

    /// Remove every match from `text`.
    pub(super) fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for span in self.spans(text) {
            out.push_str(&text[last..span.start]);
            last = span.end;
        }
        out.push_str(&text[last..]);
        out
    }

    fn find_from(&self, text: &str, pos: usize) -> Option<Range<usize>> {
        if pos > text.len() {
            return None;
        }
        let full = self.regex.find_at(text, pos).map(|m| m.range());
        if !self.end_anchor {
            return full;
        }

        // `$` is `\z` in the compiled program, so a match that ends just
        // before a final newline is found by searching without it.
        let before_newline = text
            .strip_suffix('\n')
            .filter(|head| pos <= head.len())
            .and_then(|head| self.regex.find_at(head, pos))
            .map(|m| m.range());

        match (full, before_newline) {
            (Some(full), Some(head)) if head.start < full.start => Some(head),
            (Some(full), _) => Some(full),
            (None, head) => head,
        }
    }
}

fn next_boundary(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|c| pos + c.len_utf8())
}

/// Rewrite `pattern` into `regex` syntax.
///
/// Returns the rewritten pattern and whether it contains a bare `$`.
fn translate(pattern: &str) -> (String, bool) {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut end_anchor = false;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                match chars.get(i + 1) {
                    Some('Z') => out.push_str(r"\z"),
                    Some(&c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => out.push('\\'),
                }
                i += 2;
                // `\p{..}`, `\x{..}` and friends keep their braces.
                if matches!(chars.get(i - 1), Some('p' | 'P' | 'x' | 'u' | 'U'))
                    && chars.get(i) == Some(&'{')
                {
                    while let Some(&c) = chars.get(i) {
                        out.push(c);
                        i += 1;
                        if c == '}' {
                            break;
                        }
                    }
                }
            }
            '[' => i = copy_class(&chars, i, &mut out),
            '$' => {
                out.push_str(r"\z");
                end_anchor = true;
                i += 1;
            }
            '{' => match quantifier(&chars[i..]) {
                Some((len, repeat)) => {
                    out.push_str(&repeat);
                    i += len;
                }
                None => {
                    out.push_str(r"\{");
                    i += 1;
                }
            },
            '}' => {
                out.push_str(r"\}");
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    (out, end_anchor)
}

/// Copy the character class opening at `chars[start]`, returning the index
/// just past it.
///
/// `[`, `&`, `~` and a doubled `-` are set operators inside `regex` classes
/// and are escaped so they stay literal.
fn copy_class(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('[');
    let mut i = start + 1;
    if chars.get(i) == Some(&'^') {
        out.push('^');
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        out.push_str(r"\]");
        i += 1;
    }

    while i < chars.len() {
        match chars[i] {
            ']' => {
                out.push(']');
                return i + 1;
            }
            '\\' => {
                out.push('\\');
                if let Some(&c) = chars.get(i + 1) {
                    out.push(c);
                }
                i += 2;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                out.push_str(r"\-");
                i += 1;
            }
            c @ ('[' | '&' | '~') => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    // Unterminated: `regex` reports the error.
    i
}

/// Parse a counted repetition at the start of `rest` (which begins with `{`).
///
/// Returns the number of chars consumed and the `regex` form, or `None` when
/// the brace is literal.
fn quantifier(rest: &[char]) -> Option<(usize, String)> {
    let close = rest.iter().position(|&c| c == '}')?;
    let body: String = rest[1..close].iter().collect();
    let (min, max) = match body.split_once(',') {
        Some((min, max)) => (min, Some(max)),
        None => (body.as_str(), None),
    };

    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits(min) || !max.map_or(true, digits) {
        return None;
    }

    let repeat = match max {
        None if min.is_empty() => return None,
        None => format!("{{{}}}", min),
        Some(max) => {
            let min = if min.is_empty() { "0" } else { min };
            format!("{{{},{}}}", min, max)
        }
    };
    Some((close + 1, repeat))
}
