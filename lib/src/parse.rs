use std::ops::Range;

use log::trace;
use thiserror::Error;

use crate::command::{Command, CommandKind};

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Byte {}: Invalid command {command:?}.", .span.start)]
    UnknownCommand { command: char, span: Range<usize> },
    #[error("Byte {}: Expected a command before the numbers {numbers:?}.", .span.start)]
    MissingCommand {
        numbers: Vec<f64>,
        span: Range<usize>,
    },
    #[error(
        "Byte {}: Command {command:?} takes {arity} numbers per segment, got {numbers:?}.",
        .span.start
    )]
    Arity {
        command: char,
        arity: usize,
        numbers: Vec<f64>,
        span: Range<usize>,
    },
    #[error("Byte {}: Expected number, got {src:?}.", .span.start)]
    Number { src: String, span: Range<usize> },
}

impl ParseError {
    /// Byte range of the input this error refers to
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::UnknownCommand { span, .. }
            | ParseError::MissingCommand { span, .. }
            | ParseError::Arity { span, .. }
            | ParseError::Number { span, .. } => span.clone(),
        }
    }
}

/// A command letter and the run of numbers that follows it
#[derive(Debug)]
struct Group {
    letter: char,
    kind: CommandKind,
    abs: bool,
    numbers: Vec<f64>,
    span: Range<usize>,
}

impl Group {
    /// Splits the numeric run into instructions of the command's arity
    fn into_commands(self, acc: &mut Vec<Command>) -> Result<(), ParseError> {
        let arity = self.kind.arity();
        let fits = if arity == 0 {
            self.numbers.is_empty()
        } else {
            !self.numbers.is_empty() && self.numbers.len() % arity == 0
        };
        if !fits {
            return Err(ParseError::Arity {
                command: self.letter,
                arity,
                numbers: self.numbers,
                span: self.span,
            });
        }

        if arity == 0 {
            acc.push(self.kind.build(self.abs, &[]));
            return Ok(());
        }

        for (i, chunk) in self.numbers.chunks(arity).enumerate() {
            // Extra coordinate pairs after a moveto are implicit linetos
            let kind = if i > 0 && self.kind == CommandKind::MoveTo {
                CommandKind::LineTo
            } else {
                self.kind
            };
            acc.push(kind.build(self.abs, chunk));
        }
        Ok(())
    }
}

struct Lexer<'input> {
    src: &'input str,
    bytes: &'input [u8],
    pos: usize,
}

impl<'input> Lexer<'input> {
    fn new(src: &'input str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while matches!(self.current(), Some(c) if c.is_ascii_whitespace() || c == b',') {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// A single `0` or `1`, as allowed for arc flags
    fn read_flag(&mut self) -> Option<f64> {
        match self.current()? {
            b'0' => {
                self.pos += 1;
                Some(0.)
            }
            b'1' => {
                self.pos += 1;
                Some(1.)
            }
            _ => None,
        }
    }

    /// A signed decimal with optional fraction and exponent.
    ///
    /// Stops at a second decimal point or sign, so `.5.5` and `1-2` are two numbers each.
    fn read_number(&mut self) -> Result<(f64, Range<usize>), ParseError> {
        let start = self.pos;
        if matches!(self.current(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut digits = self.skip_digits();
        if self.current() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            // Include the offending character in the error
            let end = (self.pos + 1).min(self.bytes.len());
            let end = (end..=self.bytes.len())
                .find(|i| self.src.is_char_boundary(*i))
                .unwrap_or(self.bytes.len());
            return Err(ParseError::Number {
                src: self.src[start..end].to_string(),
                span: start..end,
            });
        }
        if matches!(self.current(), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            if matches!(self.current(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                // Not an exponent after all
                self.pos = mantissa_end;
            }
        }

        let span = start..self.pos;
        self.src[span.clone()]
            .parse::<f64>()
            .map(|number| (number, span.clone()))
            .map_err(|_| ParseError::Number {
                src: self.src[span.clone()].to_string(),
                span,
            })
    }
}

/// Parses path data into an ordered list of [Command]s.
///
/// Each command letter starts a group, and every number up to the next letter
/// belongs to it. Groups may repeat their command any number of times, but the
/// run must be a whole multiple of the command's arity.
pub fn parse(data: &str) -> Result<Vec<Command>, ParseError> {
    let mut lexer = Lexer::new(data);
    let mut commands = vec![];
    let mut group: Option<Group> = None;
    let mut orphans: Option<(Vec<f64>, Range<usize>)> = None;

    loop {
        lexer.skip_separators();
        let Some(c) = lexer.current() else {
            break;
        };

        if c.is_ascii_alphabetic() {
            let start = lexer.pos;
            lexer.pos += 1;
            if let Some((numbers, span)) = orphans.take() {
                return Err(ParseError::MissingCommand { numbers, span });
            }
            let letter = char::from(c);
            let (kind, abs) =
                CommandKind::from_letter(letter).ok_or(ParseError::UnknownCommand {
                    command: letter,
                    span: start..lexer.pos,
                })?;
            if let Some(previous) = group.take() {
                previous.into_commands(&mut commands)?;
            }
            trace!("Command {letter:?} at byte {start}");
            group = Some(Group {
                letter,
                kind,
                abs,
                numbers: vec![],
                span: start..lexer.pos,
            });
        } else if c.is_ascii_digit() || matches!(c, b'.' | b'-' | b'+') {
            match group.as_mut() {
                Some(group) => {
                    let in_flag_slot = group.kind == CommandKind::ArcTo
                        && matches!(group.numbers.len() % 7, 3 | 4);
                    let number = match in_flag_slot.then(|| lexer.read_flag()).flatten() {
                        Some(flag) => flag,
                        None => lexer.read_number()?.0,
                    };
                    group.numbers.push(number);
                    group.span.end = lexer.pos;
                }
                None => {
                    let (number, span) = lexer.read_number()?;
                    let (numbers, run) = orphans.get_or_insert_with(|| (vec![], span.clone()));
                    numbers.push(number);
                    run.end = span.end;
                }
            }
        } else {
            let start = lexer.pos;
            // Point at the whole (possibly multi-byte) character
            let end = data[start..]
                .chars()
                .next()
                .map_or(start + 1, |ch| start + ch.len_utf8());
            return Err(ParseError::Number {
                src: data[start..end].to_string(),
                span: start..end,
            });
        }
    }

    if let Some((numbers, span)) = orphans {
        return Err(ParseError::MissingCommand { numbers, span });
    }
    if let Some(group) = group {
        group.into_commands(&mut commands)?;
    }
    Ok(commands)
}
