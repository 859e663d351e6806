//! Text formats of the bound input field.
//!
//! A format is either one of the ten named [`DateFormat`] aliases or a raw
//! token pattern. Tokens:
//!
//! | token | meaning                          |
//! |-------|----------------------------------|
//! | `d`   | day, two digits                  |
//! | `j`   | day, no padding                  |
//! | `m`   | month, two digits                |
//! | `n`   | month, no padding                |
//! | `Y`   | year, four digits                |
//! | `y`   | year, two digits                 |
//!
//! Any other letter is rejected, `\` escapes the next character and every
//! other character is matched literally.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_YEAR, MIN_YEAR, TWO_DIGIT_YEAR_PIVOT};
use crate::date::CalendarDate;
use crate::prelude::*;

/// The named formats accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[display(fmt = "yyyy-mm-dd")]
    #[serde(rename = "yyyy-mm-dd")]
    IsoDash,
    #[display(fmt = "yyyy/mm/dd")]
    #[serde(rename = "yyyy/mm/dd")]
    IsoSlash,
    #[display(fmt = "yy-mm-dd")]
    #[serde(rename = "yy-mm-dd")]
    ShortIsoDash,
    #[display(fmt = "yy/mm/dd")]
    #[serde(rename = "yy/mm/dd")]
    ShortIsoSlash,
    #[display(fmt = "dd-mm-yyyy")]
    #[serde(rename = "dd-mm-yyyy")]
    DayFirstDash,
    #[display(fmt = "dd/mm/yyyy")]
    #[serde(rename = "dd/mm/yyyy")]
    DayFirstSlash,
    #[display(fmt = "dd-mm-yy")]
    #[serde(rename = "dd-mm-yy")]
    ShortDayFirstDash,
    #[display(fmt = "dd/mm/yy")]
    #[serde(rename = "dd/mm/yy")]
    ShortDayFirstSlash,
    #[display(fmt = "mm/dd/yyyy")]
    #[serde(rename = "mm/dd/yyyy")]
    MonthFirstSlash,
    #[display(fmt = "mm-dd-yyyy")]
    #[serde(rename = "mm-dd-yyyy")]
    MonthFirstDash,
}

/// Error type for format configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown date format alias: {0}")]
    UnknownAlias(String),

    #[error("Unsupported token '{token}' in date pattern {pattern:?}")]
    UnsupportedToken { token: char, pattern: String },

    #[error("Date pattern {0:?} ends with a dangling escape")]
    DanglingEscape(String),

    #[error("Date pattern {pattern:?} has no {field} token")]
    MissingField { pattern: String, field: &'static str },
}

impl DateFormat {
    pub const ALL: [Self; 10] = [
        Self::IsoDash,
        Self::IsoSlash,
        Self::ShortIsoDash,
        Self::ShortIsoSlash,
        Self::DayFirstDash,
        Self::DayFirstSlash,
        Self::ShortDayFirstDash,
        Self::ShortDayFirstSlash,
        Self::MonthFirstSlash,
        Self::MonthFirstDash,
    ];

    /// The user-facing alias, e.g. `dd/mm/yyyy`
    pub const fn alias(self) -> &'static str {
        match self {
            Self::IsoDash => "yyyy-mm-dd",
            Self::IsoSlash => "yyyy/mm/dd",
            Self::ShortIsoDash => "yy-mm-dd",
            Self::ShortIsoSlash => "yy/mm/dd",
            Self::DayFirstDash => "dd-mm-yyyy",
            Self::DayFirstSlash => "dd/mm/yyyy",
            Self::ShortDayFirstDash => "dd-mm-yy",
            Self::ShortDayFirstSlash => "dd/mm/yy",
            Self::MonthFirstSlash => "mm/dd/yyyy",
            Self::MonthFirstDash => "mm-dd-yyyy",
        }
    }

    /// The token pattern the alias stands for, e.g. `d/m/Y`
    pub const fn tokens(self) -> &'static str {
        match self {
            Self::IsoDash => "Y-m-d",
            Self::IsoSlash => "Y/m/d",
            Self::ShortIsoDash => "y-m-d",
            Self::ShortIsoSlash => "y/m/d",
            Self::DayFirstDash => "d-m-Y",
            Self::DayFirstSlash => "d/m/Y",
            Self::ShortDayFirstDash => "d-m-y",
            Self::ShortDayFirstSlash => "d/m/y",
            Self::MonthFirstSlash => "m/d/Y",
            Self::MonthFirstDash => "m-d-Y",
        }
    }

    pub fn from_alias(alias: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.alias() == alias)
    }

    pub fn pattern(self) -> Pattern {
        Pattern {
            source: self.tokens().to_owned(),
            tokens: Pattern::tokenize(self.tokens()).unwrap_or_default(),
        }
    }
}

impl FromStr for DateFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s.trim()).ok_or_else(|| FormatError::UnknownAlias(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Day,
    DayUnpadded,
    Month,
    MonthUnpadded,
    Year,
    ShortYear,
    Literal(char),
}

/// A compiled token pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compiles a raw token pattern such as `d.m.Y`.
    ///
    /// # Errors
    /// Returns `FormatError` for unsupported letters, a trailing `\`, or a
    /// pattern missing its day, month or year.
    pub fn compile(source: &str) -> Result<Self, FormatError> {
        let tokens = Self::tokenize(source)?;

        let has = |wanted: &[Token]| tokens.iter().any(|t| wanted.contains(t));
        let required: [(&[Token], &'static str); 3] = [
            (&[Token::Day, Token::DayUnpadded], "day"),
            (&[Token::Month, Token::MonthUnpadded], "month"),
            (&[Token::Year, Token::ShortYear], "year"),
        ];
        for (wanted, field) in required {
            if !has(wanted) {
                return Err(FormatError::MissingField {
                    pattern: source.to_owned(),
                    field,
                });
            }
        }

        Ok(Self {
            source: source.to_owned(),
            tokens,
        })
    }

    /// Resolves a configured format: a named alias, or else a raw token pattern.
    ///
    /// # Errors
    /// Returns `FormatError` when the text is not an alias and does not compile.
    pub fn from_config(format: &str) -> Result<Self, FormatError> {
        match DateFormat::from_alias(format.trim()) {
            Some(named) => Ok(named.pattern()),
            None => Self::compile(format),
        }
    }

    fn tokenize(source: &str) -> Result<Vec<Token>, FormatError> {
        let mut tokens = Vec::with_capacity(source.len());
        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            let token = match c {
                'd' => Token::Day,
                'j' => Token::DayUnpadded,
                'm' => Token::Month,
                'n' => Token::MonthUnpadded,
                'Y' => Token::Year,
                'y' => Token::ShortYear,
                '\\' => Token::Literal(
                    chars
                        .next()
                        .ok_or_else(|| FormatError::DanglingEscape(source.to_owned()))?,
                ),
                c if c.is_ascii_alphabetic() => {
                    return Err(FormatError::UnsupportedToken {
                        token:   c,
                        pattern: source.to_owned(),
                    });
                },
                c => Token::Literal(c),
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// The pattern text as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders a date with this pattern.
    pub fn format(&self, date: CalendarDate) -> String {
        let mut out = String::with_capacity(self.tokens.len() * 2);
        for token in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match *token {
                Token::Day => write!(out, "{:02}", date.day()),
                Token::DayUnpadded => write!(out, "{}", date.day()),
                Token::Month => write!(out, "{:02}", date.month()),
                Token::MonthUnpadded => write!(out, "{}", date.month()),
                Token::Year => write!(out, "{:04}", date.year()),
                Token::ShortYear => write!(out, "{:02}", date.year() % 100),
                Token::Literal(c) => write!(out, "{c}"),
            };
        }
        out
    }

    /// Reads a date written with this pattern.
    ///
    /// Returns `None` when the text does not match the pattern as a whole or
    /// the fields do not make a valid date.
    pub fn parse(&self, text: &str) -> Option<CalendarDate> {
        let mut rest = text.trim();
        let mut year = None;
        let mut month = None;
        let mut day = None;

        for token in &self.tokens {
            let value = match *token {
                Token::Literal(c) => {
                    rest = rest.strip_prefix(c)?;
                    continue;
                },
                Token::Day | Token::DayUnpadded | Token::Month | Token::MonthUnpadded => {
                    Self::take_digits(&mut rest, 1, 2)?
                },
                Token::Year => Self::take_digits(&mut rest, 4, 4)?,
                Token::ShortYear => expand_short_year(Self::take_digits(&mut rest, 2, 2)?),
            };
            let slot = match *token {
                Token::Day | Token::DayUnpadded => &mut day,
                Token::Month | Token::MonthUnpadded => &mut month,
                _ => &mut year,
            };
            // A field repeated in the pattern must agree with itself.
            if slot.is_some_and(|prev| prev != value) {
                return None;
            }
            *slot = Some(value);
        }

        if !rest.is_empty() {
            return None;
        }

        let year = u16::try_from(year?).ok()?;
        let month = u8::try_from(month?).ok()?;
        let day = u8::try_from(day?).ok()?;
        if !is_valid_date(year, month, day) {
            return None;
        }
        CalendarDate::new(year, month, day).ok()
    }

    /// Consumes between `min` and `max` leading ASCII digits.
    fn take_digits(rest: &mut &str, min: usize, max: usize) -> Option<u32> {
        let len = rest.bytes().take(max).take_while(u8::is_ascii_digit).count();
        if len < min {
            return None;
        }
        let (digits, tail) = rest.split_at(len);
        *rest = tail;
        digits.parse().ok()
    }
}

impl Default for Pattern {
    fn default() -> Self {
        DateFormat::default().pattern()
    }
}

impl FromStr for Pattern {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Maps `00..=69` onto 2000-2069 and `70..=99` onto 1970-1999.
fn expand_short_year(two_digits: u32) -> u32 {
    if two_digits < u32::from(TWO_DIGIT_YEAR_PIVOT) {
        2000 + two_digits
    } else {
        1900 + two_digits
    }
}

/// Renders `date` with `pattern`.
pub fn format(date: CalendarDate, pattern: &Pattern) -> String {
    pattern.format(date)
}

/// Reads `text` with `pattern`, `None` when it does not hold a valid date.
pub fn parse(text: &str, pattern: &Pattern) -> Option<CalendarDate> {
    pattern.parse(text)
}

/// Four-digit year, month in 1-12 and day within the month.
pub fn is_valid_date(year: u16, month: u8, day: u8) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year) && CalendarDate::new(year, month, day).is_ok()
}
