//! Repository list parsing.
//!
//! The input is a plain line format, one repository per line:
//!
//! ```text
//! <location> <name> [<folder>]   # comment
//! ```
//!
//! `#` starts a comment running to the end of the line; blank and
//! comment-only lines are skipped. `location` is handed to git verbatim
//! (URL, ssh/scp form, or local path). `name` becomes the remote alias,
//! the branch namespace, and the tag prefix, so it must not contain `/`.
//! `folder` is the subdirectory the repository's trees are grafted under
//! and defaults to `name`.
//!
//! Parsing is lazy: [`RepoList`] yields one [`RepoSpec`] at a time in
//! input order, which is also integration order.

use std::io::{BufRead, Lines};

use crate::error::{Error, Result};

/// One repository to be merged into the monorepo.
///
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    /// Where to fetch from, passed through to git untouched.
    pub location: String,
    /// Remote alias, branch namespace and tag prefix. Never contains `/`.
    pub name: String,
    /// Subdirectory prefix for this repository's trees.
    pub folder: String,
}

impl RepoSpec {
    /// Remote alias this repository is fetched under.
    ///
    /// Derived deterministically so replayed runs address the same remote.
    pub fn remote(&self) -> String {
        format!("{}-origin", self.name)
    }
}

/// Parse a single list line.
///
/// Returns `Ok(None)` for blank and comment-only lines. `line_no` is
/// 1-based and only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<RepoSpec>> {
    let data = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let mut fields = data.split_whitespace();

    let location = match fields.next() {
        Some(location) => location,
        None => return Ok(None),
    };
    let name = fields.next().ok_or_else(|| Error::InvalidSpec {
        line: line_no,
        message: format!("missing repository name after '{}'", location),
    })?;
    if name.contains('/') {
        return Err(Error::InvalidSpec {
            line: line_no,
            message: format!("repository name '{}' must not contain '/'", name),
        });
    }
    let folder = fields.next().unwrap_or(name);
    if let Some(extra) = fields.next() {
        return Err(Error::InvalidSpec {
            line: line_no,
            message: format!("unexpected trailing field '{}'", extra),
        });
    }

    Ok(Some(RepoSpec {
        location: location.to_string(),
        name: name.to_string(),
        folder: folder.to_string(),
    }))
}

/// Lazy iterator over the repositories described by a list stream.
pub struct RepoList<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> RepoList<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for RepoList<R> {
    type Item = Result<RepoSpec>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(&line, self.line_no) {
                Ok(Some(spec)) => return Some(Ok(spec)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
