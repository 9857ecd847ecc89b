/// Converts endpoint-parameterized [elliptical arcs](https://www.w3.org/TR/SVG/paths.html#PathDataEllipticalArcCommands)
/// into their center parameterization and exact extent
pub mod arc;
/// Typed drawing commands and their direct re-serialization
mod command;
/// Evaluates commands into VML and a bounding box in a single pass
mod extrapolate;
/// Parses the path-data mini-language
mod parse;
/// Mutable command list with memoized encodings
mod path;
/// Provides an interface for walking a path's geometry.
/// This concept is referred to as [Turtle graphics](https://en.wikipedia.org/wiki/Turtle_graphics).
mod turtle;

pub use command::{Command, CommandKind, encode};
pub use extrapolate::{apply_path, extrapolate};
pub use parse::{ParseError, parse};
pub use path::Path;
pub use turtle::{BoundingBox, BoundsTurtle, Terrarium, Turtle, VmlConfig, VmlTurtle};
