//! Page composition
//!
//! Builds the content bytes of a page or clock-set frame: flag bytes, the
//! page number and the laid-out message text.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::flags::{Function, PageStatus, SerialStatus, Tempo};
use super::markup::visible_len;
use super::ValidationError;

/// Page number field sent with clock-set commands
const CLOCK_PAGE_NUMBER: &[u8] = b"000";

/// Default page duration in seconds
pub const DEFAULT_DURATION: u8 = 3;

/// Effect used by the sign when switching to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    /// Let the sign pick
    #[default]
    Auto,
    /// Show at once
    Appear,
    /// Wipe across
    Wipe,
    /// Open from the middle
    Open,
    /// Lock into place
    Lock,
    /// Rotate in
    Rotate,
    /// Move in to the right
    Right,
    /// Move in to the left
    Left,
    /// Roll up
    RollUp,
    /// Roll down
    RollDown,
    /// Bounce between the edges
    PingPong,
    /// Fill from the bottom
    FillUp,
    /// Paint column by column
    Paint,
    /// Fade in
    FadeIn,
    /// Jump in
    Jump,
    /// Scrolls text wider than the display
    Slide,
}

impl Transition {
    /// All transitions in code order
    pub const ALL: [Transition; 16] = [
        Transition::Auto,
        Transition::Appear,
        Transition::Wipe,
        Transition::Open,
        Transition::Lock,
        Transition::Rotate,
        Transition::Right,
        Transition::Left,
        Transition::RollUp,
        Transition::RollDown,
        Transition::PingPong,
        Transition::FillUp,
        Transition::Paint,
        Transition::FadeIn,
        Transition::Jump,
        Transition::Slide,
    ];

    /// The 4-bit code carried in the function byte
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a transition by its 4-bit code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Kebab-case name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Transition::Auto => "auto",
            Transition::Appear => "appear",
            Transition::Wipe => "wipe",
            Transition::Open => "open",
            Transition::Lock => "lock",
            Transition::Rotate => "rotate",
            Transition::Right => "right",
            Transition::Left => "left",
            Transition::RollUp => "roll-up",
            Transition::RollDown => "roll-down",
            Transition::PingPong => "ping-pong",
            Transition::FillUp => "fill-up",
            Transition::Paint => "paint",
            Transition::FadeIn => "fade-in",
            Transition::Jump => "jump",
            Transition::Slide => "slide",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| format!("unknown transition '{}'", s))
    }
}

/// Content of a display line
///
/// In JSON a line is a plain string; `"time"` and `"temperature"` name the
/// live-data lines, and `{"text": "time"}` sends that word literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LineRepr", into = "LineRepr")]
pub enum PageLine {
    /// Caller-supplied text, possibly with markup
    Text(String),
    /// The sign's own clock
    Time,
    /// The sign's temperature sensor
    Temperature,
}

impl PageLine {
    /// True for lines the sign renders from live data
    pub fn is_special(&self) -> bool {
        !matches!(self, PageLine::Text(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LineRepr {
    Plain(String),
    Tagged { text: String },
}

impl From<LineRepr> for PageLine {
    fn from(repr: LineRepr) -> Self {
        match repr {
            LineRepr::Plain(s) => match s.as_str() {
                "time" => PageLine::Time,
                "temperature" => PageLine::Temperature,
                _ => PageLine::Text(s),
            },
            LineRepr::Tagged { text } => PageLine::Text(text),
        }
    }
}

impl From<PageLine> for LineRepr {
    fn from(line: PageLine) -> Self {
        match line {
            PageLine::Time => LineRepr::Plain("time".to_string()),
            PageLine::Temperature => LineRepr::Plain("temperature".to_string()),
            PageLine::Text(text) if text == "time" || text == "temperature" => {
                LineRepr::Tagged { text }
            }
            PageLine::Text(text) => LineRepr::Plain(text),
        }
    }
}

impl From<&str> for PageLine {
    fn from(text: &str) -> Self {
        PageLine::Text(text.to_string())
    }
}

impl From<String> for PageLine {
    fn from(text: String) -> Self {
        PageLine::Text(text)
    }
}

/// Per-page display options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Show the text as one continuous line; `None` joins single-line pages
    pub join: Option<bool>,
    /// Center line 1
    pub center: bool,
    /// Inverse video
    pub invert: bool,
    /// Last page of the set; the sign starts showing the set right away
    pub last: bool,
    /// Requested transition (may be overridden to `Slide`)
    pub transition: Transition,
    /// Display time in seconds (low 4 bits only)
    pub duration: u8,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            join: None,
            center: false,
            invert: false,
            last: false,
            transition: Transition::Auto,
            duration: DEFAULT_DURATION,
        }
    }
}

/// One page to send to the sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Text or live-data token for the first line
    pub line1: PageLine,
    /// Optional second line; text only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<PageLine>,
    /// Display options
    #[serde(default)]
    pub options: PageOptions,
}

impl PageRequest {
    /// A single-line page with default options
    pub fn new(line1: impl Into<PageLine>) -> Self {
        Self {
            line1: line1.into(),
            line2: None,
            options: PageOptions::default(),
        }
    }

    /// A two-line page with default options
    pub fn two_lines(line1: impl Into<PageLine>, line2: impl Into<PageLine>) -> Self {
        Self {
            line1: line1.into(),
            line2: Some(line2.into()),
            options: PageOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the lines are joined once defaults are applied
    pub fn joins(&self) -> bool {
        self.options.join.unwrap_or(self.line2.is_none())
    }
}

/// Display geometry used for layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Visible characters per line
    pub width: usize,
    /// Joined lines longer than this scroll
    pub joined_width: usize,
}

/// Build the content bytes of a page
pub fn compose_page(
    request: &PageRequest,
    layout: &PageLayout,
    page_number: u16,
) -> Result<Vec<u8>, ValidationError> {
    let join = request.joins();
    if join && request.line2.is_some() {
        return Err(ValidationError::JoinWithSecondLine);
    }

    let options = &request.options;
    let mut transition = options.transition;
    let mut message = String::new();

    // Time and temperature are drawn by the sign itself, so no text is sent
    if let PageLine::Text(line1) = &request.line1 {
        let length = visible_len(line1);
        if join {
            message.push_str(line1);
            if length > layout.joined_width {
                transition = Transition::Slide;
            }
        } else if length > layout.width {
            return Err(ValidationError::LineTooLong {
                width: layout.width,
                length,
            });
        } else if options.center {
            message.push_str(&center(line1, layout.width));
        } else {
            message.push_str(line1);
            message.push_str(&" ".repeat(layout.width - length));
        }
    }

    if let Some(line2) = &request.line2 {
        let PageLine::Text(line2) = line2 else {
            return Err(ValidationError::InvalidSecondLine);
        };
        // Time and temperature pages carry no text at all
        if !request.line1.is_special() {
            message.push_str(line2);
        }
        if visible_len(line2) > layout.width {
            transition = Transition::Slide;
        }
    }

    let mut serial = SerialStatus::BASE | SerialStatus::ACK_WANTED;
    if !options.last {
        serial |= SerialStatus::MORE_PAGES;
    }

    let tempo = Tempo::BASE | Tempo::duration(options.duration) | Tempo::ALWAYS_ON;

    let mut function = Function::BASE | Function::transition(transition.code());
    match request.line1 {
        PageLine::Time => function |= Function::TIME,
        PageLine::Temperature => function |= Function::TEMPERATURE,
        PageLine::Text(_) => {}
    }

    let mut status = PageStatus::BASE;
    if join {
        status |= PageStatus::JOIN_12;
    }
    if options.center {
        status |= PageStatus::CENTER;
    }
    if options.invert {
        status |= PageStatus::INVERT;
    }

    let mut content = Vec::with_capacity(7 + message.len());
    content.push(serial.bits());
    content.extend_from_slice(format!("{:03}", page_number).as_bytes());
    content.push(tempo.bits());
    content.push(function.bits());
    content.push(status.bits());
    content.extend_from_slice(message.as_bytes());

    Ok(content)
}

/// Build the content bytes of a clock-set command
pub fn compose_clock_set(time: &NaiveDateTime) -> Vec<u8> {
    let serial = SerialStatus::BASE | SerialStatus::ACK_WANTED | SerialStatus::MORE_PAGES;

    let fields = format!(
        "{:02}{:02}{:02}{:02}{:02}0{}",
        time.hour(),
        time.minute(),
        time.second(),
        time.day(),
        time.month(),
        time.weekday().num_days_from_sunday() + 1
    );

    let mut content = Vec::with_capacity(1 + CLOCK_PAGE_NUMBER.len() + fields.len());
    content.push(serial.bits());
    content.extend_from_slice(CLOCK_PAGE_NUMBER);
    content.extend_from_slice(fields.as_bytes());
    content
}

/// Pad `text` to `width` columns, extra space going on the right.
///
/// Measures the raw character count, markup included, so marked-up lines
/// end up slightly left of center.
fn center(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length >= width {
        return text.to_string();
    }
    let left = (width - length) / 2;
    let right = width - length - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const LAYOUT: PageLayout = PageLayout {
        width: 16,
        joined_width: 8,
    };

    fn message(content: &[u8]) -> &[u8] {
        &content[7..]
    }

    #[test]
    fn test_page_number_field() {
        let request = PageRequest::new("HI");
        for (number, expected) in [(1, "001"), (7, "007"), (42, "042"), (999, "999")] {
            let content = compose_page(&request, &LAYOUT, number).unwrap();
            assert_eq!(&content[1..4], expected.as_bytes());
        }
    }

    #[test]
    fn test_flag_bytes() {
        let request = PageRequest::two_lines("A", "B").with_options(PageOptions {
            center: true,
            invert: true,
            transition: Transition::PingPong,
            duration: 4,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();

        assert_eq!(content[0], 0b1100_1100);
        assert_eq!(content[4], 0b1110_0100);
        assert_eq!(content[5], 0b1100_1010);
        assert_eq!(content[6], 0b1101_0000);
    }

    #[test]
    fn test_last_page_clears_more_pages() {
        let request = PageRequest::new("END").with_options(PageOptions {
            last: true,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 3).unwrap();
        assert_eq!(content[0], 0b1100_1000);
    }

    #[test]
    fn test_left_justified_padding() {
        let request = PageRequest::new("HI").with_options(PageOptions {
            join: Some(false),
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(message(&content), b"HI              ");
    }

    #[test]
    fn test_padding_ignores_markup() {
        let line = format!("{}HI", crate::protocol::Markup::Red);
        let request = PageRequest::two_lines(line.as_str(), "X");
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        // 2 markup bytes + 2 visible + 14 padding + line 2
        assert_eq!(message(&content).len(), 2 + 2 + 14 + 1);
    }

    #[test]
    fn test_center_two_lines() {
        let request = PageRequest::two_lines("HELLO", "WORLD").with_options(PageOptions {
            center: true,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(message(&content), b"     HELLO      WORLD");
    }

    #[test]
    fn test_center_counts_markup_bytes() {
        let line = format!("{}HELLO{}", crate::protocol::Markup::Bold, crate::protocol::Markup::Default);
        let request = PageRequest::two_lines(line.as_str(), "").with_options(PageOptions {
            center: true,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        // Raw length 9, so 3 spaces left and 4 right, 2 columns short of a
        // visually centered line
        let expected = format!("   {}    ", line);
        assert_eq!(message(&content), expected.as_bytes());
    }

    #[test]
    fn test_join_with_second_line_is_rejected() {
        let request = PageRequest::two_lines("A", "B").with_options(PageOptions {
            join: Some(true),
            ..Default::default()
        });
        assert_eq!(
            compose_page(&request, &LAYOUT, 1),
            Err(ValidationError::JoinWithSecondLine)
        );
    }

    #[test]
    fn test_line_too_long() {
        let request = PageRequest::two_lines("ABCDEFGHIJKLMNOPQRST", "X");
        assert_eq!(
            compose_page(&request, &LAYOUT, 1),
            Err(ValidationError::LineTooLong {
                width: 16,
                length: 20
            })
        );
    }

    #[test]
    fn test_long_joined_line_slides() {
        let request = PageRequest::new("ABCDEFGHIJKLMNOPQRST").with_options(PageOptions {
            transition: Transition::Wipe,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(content[5] & 0x0f, Transition::Slide.code());
        assert_eq!(content[6] & 0x01, 0x01);
        assert_eq!(message(&content), b"ABCDEFGHIJKLMNOPQRST");
    }

    #[test]
    fn test_short_joined_line_keeps_transition() {
        let request = PageRequest::new("ABCDEFGH").with_options(PageOptions {
            transition: Transition::Wipe,
            ..Default::default()
        });
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(content[5] & 0x0f, Transition::Wipe.code());
        // Joined text is not padded
        assert_eq!(message(&content), b"ABCDEFGH");
    }

    #[test]
    fn test_long_second_line_slides() {
        let request = PageRequest::two_lines("TOP", "A SECOND LINE THAT SCROLLS");
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(Transition::from_code(content[5] & 0x0f), Some(Transition::Slide));
    }

    #[test]
    fn test_special_tokens() {
        let time = compose_page(&PageRequest::new(PageLine::Time), &LAYOUT, 1).unwrap();
        assert_eq!(time.len(), 7);
        assert_eq!(time[5], 0b1101_0000);

        let temp = compose_page(&PageRequest::new(PageLine::Temperature), &LAYOUT, 1).unwrap();
        assert_eq!(temp.len(), 7);
        assert_eq!(temp[5], 0b1110_0000);
    }

    #[test]
    fn test_special_token_drops_second_line_text() {
        let request = PageRequest::two_lines(PageLine::Time, "EXTRA");
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(content.len(), 7);

        // The second line still decides the transition
        let request = PageRequest::two_lines(PageLine::Temperature, "A SECOND LINE THAT SCROLLS");
        let content = compose_page(&request, &LAYOUT, 1).unwrap();
        assert_eq!(content.len(), 7);
        assert_eq!(content[5], 0b1110_1111);
    }

    #[test]
    fn test_special_token_on_second_line() {
        let request = PageRequest::two_lines("NOW", PageLine::Time);
        assert_eq!(
            compose_page(&request, &LAYOUT, 1),
            Err(ValidationError::InvalidSecondLine)
        );
    }

    #[test]
    fn test_clock_set() {
        // 2024-03-13 was a Wednesday
        let time = NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        let content = compose_clock_set(&time);
        assert_eq!(content[0], 0b1100_1100);
        assert_eq!(&content[1..], b"000090507130304" as &[u8]);
        assert_eq!(content.last(), Some(&b'4'));
    }

    #[test]
    fn test_clock_set_weekday_range() {
        // Sunday maps to 1, Saturday to 7
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(compose_clock_set(&sunday).last(), Some(&b'1'));
        assert_eq!(compose_clock_set(&saturday).last(), Some(&b'7'));
    }

    #[test]
    fn test_transition_names() {
        assert_eq!("ping-pong".parse::<Transition>(), Ok(Transition::PingPong));
        assert_eq!("Fade_In".parse::<Transition>(), Ok(Transition::FadeIn));
        assert!("sideways".parse::<Transition>().is_err());
        for t in Transition::ALL {
            assert_eq!(Transition::from_code(t.code()), Some(t));
            assert_eq!(t.to_string().parse::<Transition>(), Ok(t));
        }
    }

    #[test]
    fn test_page_request_json() {
        let json = r#"{"line1": {"text": "HELLO"}, "line2": {"text": "WORLD"}, "options": {"center": true, "transition": "roll-up"}}"#;
        let request: PageRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.line1, PageLine::from("HELLO"));
        assert!(request.options.center);
        assert_eq!(request.options.transition, Transition::RollUp);
        assert_eq!(request.options.duration, DEFAULT_DURATION);
        assert!(!request.joins());

        let time: PageRequest = serde_json::from_str(r#"{"line1": "time"}"#).unwrap();
        assert_eq!(time.line1, PageLine::Time);
        assert!(time.joins());
    }

    #[test]
    fn test_plain_string_lines() {
        let request: PageRequest = serde_json::from_str(r#"{"line1": "HELLO"}"#).unwrap();
        assert_eq!(request.line1, PageLine::from("HELLO"));

        let temp: PageRequest =
            serde_json::from_str(r#"{"line1": "temperature", "line2": "OUTSIDE"}"#).unwrap();
        assert_eq!(temp.line1, PageLine::Temperature);
        assert_eq!(temp.line2, Some(PageLine::from("OUTSIDE")));
    }

    #[test]
    fn test_page_line_serialization() {
        assert_eq!(serde_json::to_string(&PageLine::from("HI")).unwrap(), r#""HI""#);
        assert_eq!(serde_json::to_string(&PageLine::Time).unwrap(), r#""time""#);

        // Literal token words keep the tagged form so they read back as text
        let literal = PageLine::from("time");
        let json = serde_json::to_string(&literal).unwrap();
        assert_eq!(json, r#"{"text":"time"}"#);
        assert_eq!(serde_json::from_str::<PageLine>(&json).unwrap(), literal);
    }
}
