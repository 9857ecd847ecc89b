use std::fmt;

use svgtypes::PathSegment;

/// A single drawing instruction of the path-data mini-language.
///
/// `abs` is true for uppercase (absolute) commands and false for lowercase ones,
/// whose numbers are distances from the current point at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        abs: bool,
        x: f64,
    },
    VerticalLineTo {
        abs: bool,
        y: f64,
    },
    CubicCurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCurveTo {
        abs: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadraticCurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadraticTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    ArcTo {
        abs: bool,
        rx: f64,
        ry: f64,
        /// Degrees
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath {
        abs: bool,
    },
}

/// The kind of a [Command], independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicCurveTo,
    SmoothCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticTo,
    ArcTo,
    ClosePath,
}

impl CommandKind {
    /// Looks up a command letter, returning the kind and whether it is absolute
    pub fn from_letter(letter: char) -> Option<(Self, bool)> {
        use CommandKind::*;
        let kind = match letter.to_ascii_uppercase() {
            'M' => MoveTo,
            'L' => LineTo,
            'H' => HorizontalLineTo,
            'V' => VerticalLineTo,
            'C' => CubicCurveTo,
            'S' => SmoothCurveTo,
            'Q' => QuadraticCurveTo,
            'T' => SmoothQuadraticTo,
            'A' => ArcTo,
            'Z' => ClosePath,
            _ => return None,
        };
        Some((kind, letter.is_ascii_uppercase()))
    }

    /// Number of numbers consumed by one instruction of this kind
    pub fn arity(self) -> usize {
        use CommandKind::*;
        match self {
            ClosePath => 0,
            HorizontalLineTo | VerticalLineTo => 1,
            MoveTo | LineTo | SmoothQuadraticTo => 2,
            SmoothCurveTo | QuadraticCurveTo => 4,
            CubicCurveTo => 6,
            ArcTo => 7,
        }
    }

    /// Uppercase letter of this kind
    pub fn letter(self) -> char {
        use CommandKind::*;
        match self {
            MoveTo => 'M',
            LineTo => 'L',
            HorizontalLineTo => 'H',
            VerticalLineTo => 'V',
            CubicCurveTo => 'C',
            SmoothCurveTo => 'S',
            QuadraticCurveTo => 'Q',
            SmoothQuadraticTo => 'T',
            ArcTo => 'A',
            ClosePath => 'Z',
        }
    }

    /// Builds a command from exactly [CommandKind::arity] numbers.
    ///
    /// Arc flags are true for any non-zero number.
    pub(crate) fn build(self, abs: bool, n: &[f64]) -> Command {
        debug_assert_eq!(n.len(), self.arity());
        use CommandKind::*;
        match self {
            MoveTo => Command::MoveTo {
                abs,
                x: n[0],
                y: n[1],
            },
            LineTo => Command::LineTo {
                abs,
                x: n[0],
                y: n[1],
            },
            HorizontalLineTo => Command::HorizontalLineTo { abs, x: n[0] },
            VerticalLineTo => Command::VerticalLineTo { abs, y: n[0] },
            CubicCurveTo => Command::CubicCurveTo {
                abs,
                x1: n[0],
                y1: n[1],
                x2: n[2],
                y2: n[3],
                x: n[4],
                y: n[5],
            },
            SmoothCurveTo => Command::SmoothCurveTo {
                abs,
                x2: n[0],
                y2: n[1],
                x: n[2],
                y: n[3],
            },
            QuadraticCurveTo => Command::QuadraticCurveTo {
                abs,
                x1: n[0],
                y1: n[1],
                x: n[2],
                y: n[3],
            },
            SmoothQuadraticTo => Command::SmoothQuadraticTo {
                abs,
                x: n[0],
                y: n[1],
            },
            ArcTo => Command::ArcTo {
                abs,
                rx: n[0],
                ry: n[1],
                x_axis_rotation: n[2],
                large_arc: n[3] != 0.,
                sweep: n[4] != 0.,
                x: n[5],
                y: n[6],
            },
            ClosePath => Command::ClosePath { abs },
        }
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        use Command::*;
        match self {
            MoveTo { .. } => CommandKind::MoveTo,
            LineTo { .. } => CommandKind::LineTo,
            HorizontalLineTo { .. } => CommandKind::HorizontalLineTo,
            VerticalLineTo { .. } => CommandKind::VerticalLineTo,
            CubicCurveTo { .. } => CommandKind::CubicCurveTo,
            SmoothCurveTo { .. } => CommandKind::SmoothCurveTo,
            QuadraticCurveTo { .. } => CommandKind::QuadraticCurveTo,
            SmoothQuadraticTo { .. } => CommandKind::SmoothQuadraticTo,
            ArcTo { .. } => CommandKind::ArcTo,
            ClosePath { .. } => CommandKind::ClosePath,
        }
    }

    pub fn is_absolute(&self) -> bool {
        use Command::*;
        match *self {
            MoveTo { abs, .. }
            | LineTo { abs, .. }
            | HorizontalLineTo { abs, .. }
            | VerticalLineTo { abs, .. }
            | CubicCurveTo { abs, .. }
            | SmoothCurveTo { abs, .. }
            | QuadraticCurveTo { abs, .. }
            | SmoothQuadraticTo { abs, .. }
            | ArcTo { abs, .. }
            | ClosePath { abs } => abs,
        }
    }

    /// The letter this command is written with: uppercase when absolute
    pub fn letter(&self) -> char {
        let letter = self.kind().letter();
        if self.is_absolute() {
            letter
        } else {
            letter.to_ascii_lowercase()
        }
    }
}

/// Writes the command letter followed by its payload, e.g. `L 10 10`
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Command::*;
        write!(f, "{}", self.letter())?;
        match *self {
            MoveTo { x, y, .. } | LineTo { x, y, .. } | SmoothQuadraticTo { x, y, .. } => {
                write!(f, " {x} {y}")
            }
            HorizontalLineTo { x, .. } => write!(f, " {x}"),
            VerticalLineTo { y, .. } => write!(f, " {y}"),
            CubicCurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
                ..
            } => write!(f, " {x1} {y1} {x2} {y2} {x} {y}"),
            SmoothCurveTo { x2, y2, x, y, .. } => write!(f, " {x2} {y2} {x} {y}"),
            QuadraticCurveTo { x1, y1, x, y, .. } => write!(f, " {x1} {y1} {x} {y}"),
            ArcTo {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => write!(
                f,
                " {rx} {ry} {x_axis_rotation} {} {} {x} {y}",
                u8::from(large_arc),
                u8::from(sweep)
            ),
            ClosePath { .. } => Ok(()),
        }
    }
}

/// Re-serializes commands in the path-data grammar without evaluating them.
///
/// Never fails, even for commands that would degenerate during evaluation.
pub fn encode<'a>(commands: impl IntoIterator<Item = &'a Command>) -> String {
    commands
        .into_iter()
        .map(Command::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<PathSegment> for Command {
    fn from(segment: PathSegment) -> Self {
        use PathSegment::*;
        match segment {
            MoveTo { abs, x, y } => Command::MoveTo { abs, x, y },
            LineTo { abs, x, y } => Command::LineTo { abs, x, y },
            HorizontalLineTo { abs, x } => Command::HorizontalLineTo { abs, x },
            VerticalLineTo { abs, y } => Command::VerticalLineTo { abs, y },
            CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => Command::CubicCurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            },
            SmoothCurveTo { abs, x2, y2, x, y } => Command::SmoothCurveTo { abs, x2, y2, x, y },
            Quadratic { abs, x1, y1, x, y } => Command::QuadraticCurveTo { abs, x1, y1, x, y },
            SmoothQuadratic { abs, x, y } => Command::SmoothQuadraticTo { abs, x, y },
            EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => Command::ArcTo {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            },
            ClosePath { abs } => Command::ClosePath { abs },
        }
    }
}
