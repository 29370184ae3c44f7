//! Inline markup
//!
//! The sign understands two-byte escape sequences embedded in page text: an
//! escape marker followed by one code byte. They take up no room on the
//! display, so layout rules measure text with [`visible_len`].

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Byte that introduces a markup sequence
pub const ESCAPE: char = '\x1c';

/// Markup codes understood by the sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Flashing text
    Flash,
    /// Bold text
    Bold,
    /// Red text
    Red,
    /// Green text
    Green,
    /// Yellow text
    Yellow,
    /// Multicolour text
    Rainbow,
    /// Back to the default style
    Default,
}

impl Markup {
    /// The escape sequence as it appears in page text
    pub fn as_str(&self) -> &'static str {
        match self {
            Markup::Flash => "\x1cF",
            Markup::Bold => "\x1cE",
            Markup::Red => "\x1cR",
            Markup::Green => "\x1cG",
            Markup::Yellow => "\x1cY",
            Markup::Rainbow => "\x1cM",
            Markup::Default => "\x1cD",
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn matcher() -> &'static Regex {
    static MATCHER: OnceLock<Regex> = OnceLock::new();
    MATCHER.get_or_init(|| Regex::new(r"\x1c.").expect("markup pattern is valid"))
}

/// Remove every markup sequence from `text`
pub fn strip(text: &str) -> String {
    matcher().replace_all(text, "").into_owned()
}

/// Number of characters the sign will actually display for `text`
pub fn visible_len(text: &str) -> usize {
    strip(text).chars().count()
}
