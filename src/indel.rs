use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::constants::NULL_TOKEN;
use crate::errors::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Deletion,
    Insertion,
    Mixed,
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Frame {
    InFrame,
    OutOfFrame,
}

/// A single deletion or insertion, `D<size>_L<left>C<mh>[R<right>]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: Kind,
    pub size: u32,
    pub left: i32,
    pub microhomology: u32,
    pub right: Option<i32>,
}

impl Event {
    /// Signed change in sequence length caused by this event.
    pub fn net_size(&self) -> i64 {
        match self.kind {
            Kind::Insertion => i64::from(self.size),
            Kind::Deletion => -i64::from(self.size),
            Kind::Mixed | Kind::Null => 0,
        }
    }

    fn symbol(&self) -> char {
        match self.kind {
            Kind::Insertion => 'I',
            _ => 'D',
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}_L{}C{}",
            self.symbol(),
            self.size,
            self.left,
            self.microhomology
        )?;

        if let Some(right) = self.right {
            write!(f, "R{}", right)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Details {
    pub left: i32,
    pub microhomology: u32,
    pub right: Option<i32>,
    // Sub-events of mixed tokens, in order; empty otherwise
    pub muts: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndelToken {
    kind: Kind,
    size: u32,
    details: Details,
}

impl IndelToken {
    pub fn null() -> IndelToken {
        IndelToken {
            kind: Kind::Null,
            size: 0,
            details: Details::default(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Number of bases inserted or deleted; the absolute net change for
    /// mixed tokens.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn is_null(&self) -> bool {
        self.kind == Kind::Null
    }

    pub fn net_size(&self) -> i64 {
        match self.kind {
            Kind::Null => 0,
            Kind::Deletion => -i64::from(self.size),
            Kind::Insertion => i64::from(self.size),
            Kind::Mixed => self.details.muts.iter().map(Event::net_size).sum(),
        }
    }

    pub fn frame(&self) -> Frame {
        classify(self)
    }

    fn from_events(mut events: Vec<Event>) -> Option<IndelToken> {
        if events.len() == 1 {
            let event = events.remove(0);

            Some(IndelToken {
                kind: event.kind,
                size: event.size,
                details: Details {
                    left: event.left,
                    microhomology: event.microhomology,
                    right: event.right,
                    muts: Vec::new(),
                },
            })
        } else {
            let net: i64 = events.iter().map(Event::net_size).sum();
            let size = u32::try_from(net.abs()).ok()?;
            let first = &events[0];

            Some(IndelToken {
                kind: Kind::Mixed,
                size,
                details: Details {
                    left: first.left,
                    microhomology: first.microhomology,
                    right: first.right,
                    muts: events,
                },
            })
        }
    }
}

impl fmt::Display for IndelToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Kind::Null => write!(f, "{}", NULL_TOKEN),
            Kind::Mixed => {
                for (idx, event) in self.details.muts.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "_")?;
                    }
                    write!(f, "{}", event)?;
                }

                Ok(())
            }
            kind => write!(
                f,
                "{}",
                Event {
                    kind,
                    size: self.size,
                    left: self.details.left,
                    microhomology: self.details.microhomology,
                    right: self.details.right,
                }
            ),
        }
    }
}

impl FromStr for IndelToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<IndelToken> {
        parse(s)
    }
}

/// Splits a leading decimal number off `s`. Leading zeros and `-0` are
/// rejected so that every accepted string is the canonical encoding.
fn split_number(s: &str, signed: bool) -> Option<(&str, &str)> {
    let start = if signed && s.starts_with('-') { 1 } else { 0 };
    let end = s[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |idx| idx + start);

    let digits = &s[start..end];
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        None
    } else if start == 1 && digits == "0" {
        None
    } else {
        Some((&s[..end], &s[end..]))
    }
}

fn parse_event(head: &str, fields: &str) -> Option<Event> {
    let kind = match head.chars().next()? {
        'D' => Kind::Deletion,
        'I' => Kind::Insertion,
        _ => return None,
    };

    let (size, rest) = split_number(&head[1..], false)?;
    let size: u32 = size.parse().ok()?;
    if size == 0 || !rest.is_empty() {
        return None;
    }

    let rest = fields.strip_prefix('L')?;
    let (left, rest) = split_number(rest, true)?;
    let rest = rest.strip_prefix('C')?;
    let (microhomology, rest) = split_number(rest, false)?;

    let right = match rest.strip_prefix('R') {
        Some(rest) => {
            let (right, rest) = split_number(rest, true)?;
            if !rest.is_empty() {
                return None;
            }

            Some(right.parse().ok()?)
        }
        None if rest.is_empty() => None,
        None => return None,
    };

    Some(Event {
        kind,
        size,
        left: left.parse().ok()?,
        microhomology: microhomology.parse().ok()?,
        right,
    })
}

/// Parses the compact encoding of an indel outcome.
///
/// Accepts `-`, single events such as `D3_L-2C1` or `I1_L0C1R0`, and mixed
/// tokens joining two or more events with `_`.
pub fn parse(encoded: &str) -> Result<IndelToken> {
    if encoded == NULL_TOKEN {
        return Ok(IndelToken::null());
    }

    let malformed = || Error::from(ErrorKind::MalformedToken(encoded.to_owned()));
    let fields: Vec<&str> = encoded.split('_').collect();
    if fields.len() < 2 || fields.len() % 2 != 0 {
        return Err(malformed());
    }

    fields
        .chunks(2)
        .map(|pair| parse_event(pair[0], pair[1]))
        .collect::<Option<Vec<Event>>>()
        .and_then(IndelToken::from_events)
        .ok_or_else(malformed)
}

pub fn format(token: &IndelToken) -> String {
    token.to_string()
}

pub fn classify(token: &IndelToken) -> Frame {
    if token.net_size() % 3 == 0 {
        Frame::InFrame
    } else {
        Frame::OutOfFrame
    }
}
