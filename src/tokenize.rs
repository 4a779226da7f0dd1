//! `strtok`-style tokenizing with call-site tracking.

use crate::failure::{fail_at_msg, Failure, SourceSite};

/// Tokenizes `input` on any character of `delimiters`, recording the call site.
#[macro_export]
macro_rules! strtok_safe {
    ($input:expr, $delimiters:expr $(,)?) => {
        $crate::tokenize::Tokens::new($input, $delimiters, $crate::site!())
    };
}

/// Iterator over the non-empty tokens of a string.
///
/// Any character of the delimiter set separates tokens and runs of delimiters
/// never produce empty tokens, as with C `strtok`.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
    delimiters: &'a str,
    site: SourceSite,
}

impl<'a> Tokens<'a> {
    /// Starts tokenizing `input`. Prefer [`strtok_safe!`](crate::strtok_safe).
    pub fn new(input: &'a str, delimiters: &'a str, site: SourceSite) -> Self {
        trace_event!(
            trace,
            file = site.file,
            line = site.line,
            function = site.function,
            "strtok_safe"
        );
        Self {
            rest: input,
            delimiters,
            site,
        }
    }

    /// The next token, failing when the input is exhausted.
    ///
    /// # Errors
    /// Returns an abort attributed to the tokenizer's call site.
    pub fn next_required(&mut self) -> Result<&'a str, Failure> {
        let site = self.site;
        self.next().ok_or_else(|| {
            fail_at_msg(site.file, site.line, format!("strtok failed in {}", site.function))
        })
    }

    /// The unconsumed remainder, leading delimiters included.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }

    fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(c)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest: &'a str = self.rest;
        let start = rest.find(|c: char| !self.is_delimiter(c))?;
        let rest = &rest[start..];
        match rest.char_indices().find(|&(_, c)| self.is_delimiter(c)) {
            Some((end, c)) => {
                self.rest = &rest[end + c.len_utf8()..];
                Some(&rest[..end])
            }
            None => {
                self.rest = "";
                Some(rest)
            }
        }
    }
}
