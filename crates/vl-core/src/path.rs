//! Path geometry for path and clip-path layers.
//!
//! `PathData` wraps a `kurbo::BezPath`. It is read from SVG path strings
//! (`M m L l H h V v C c Q q Z z`) with a `winnow` parser and written back
//! in a canonical absolute form, so `"m10 10 h5"` emits as `"M 10 10 L 15 10"`.

use crate::error::LayerError;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Outline geometry of a path or clip-path layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData(BezPath);

impl PathData {
    pub fn new(path: BezPath) -> Self {
        Self(path)
    }

    /// Parse an SVG path string.
    pub fn parse(source: &str) -> Result<Self, LayerError> {
        parse_path_data(source)
    }

    pub fn as_bez_path(&self) -> &BezPath {
        &self.0
    }

    pub fn elements(&self) -> &[PathEl] {
        self.0.elements()
    }

    pub fn is_empty(&self) -> bool {
        self.0.elements().is_empty()
    }

    /// Return a copy of this path with every point mapped through `affine`.
    #[must_use]
    pub fn transform(&self, affine: Affine) -> Self {
        let mut path = self.0.clone();
        path.apply_affine(affine);
        Self(path)
    }

    /// Control-point-inclusive bounds, or `None` for an empty path.
    pub fn bounding_box(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(self.0.bounding_box())
    }
}

impl FromStr for PathData {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for el in self.0.elements() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match *el {
                PathEl::MoveTo(p) => write!(f, "M {} {}", num(p.x), num(p.y))?,
                PathEl::LineTo(p) => write!(f, "L {} {}", num(p.x), num(p.y))?,
                PathEl::QuadTo(p1, p2) => write!(
                    f,
                    "Q {} {} {} {}",
                    num(p1.x),
                    num(p1.y),
                    num(p2.x),
                    num(p2.y)
                )?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    f,
                    "C {} {} {} {} {} {}",
                    num(p1.x),
                    num(p1.y),
                    num(p2.x),
                    num(p2.y),
                    num(p3.x),
                    num(p3.y)
                )?,
                PathEl::ClosePath => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Normalize negative zero so emitted text is stable.
fn num(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

impl Serialize for PathData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PathData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PathData::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────

/// Pen state while walking the command stream.
struct PathBuilder {
    path: BezPath,
    cursor: Point,
    subpath_start: Point,
}

impl PathBuilder {
    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.cursor.x + x, self.cursor.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn apply(&mut self, cmd: char, first_group: bool, args: &[f64]) {
        let relative = cmd.is_ascii_lowercase();
        match cmd.to_ascii_uppercase() {
            // Extra coordinate pairs after a moveto are implicit linetos.
            'M' if first_group => {
                let p = self.resolve(relative, args[0], args[1]);
                self.path.move_to(p);
                self.cursor = p;
                self.subpath_start = p;
            }
            'M' | 'L' => {
                let p = self.resolve(relative, args[0], args[1]);
                self.path.line_to(p);
                self.cursor = p;
            }
            'H' => {
                let x = if relative { self.cursor.x + args[0] } else { args[0] };
                let p = Point::new(x, self.cursor.y);
                self.path.line_to(p);
                self.cursor = p;
            }
            'V' => {
                let y = if relative { self.cursor.y + args[0] } else { args[0] };
                let p = Point::new(self.cursor.x, y);
                self.path.line_to(p);
                self.cursor = p;
            }
            'Q' => {
                let p1 = self.resolve(relative, args[0], args[1]);
                let p2 = self.resolve(relative, args[2], args[3]);
                self.path.quad_to(p1, p2);
                self.cursor = p2;
            }
            'C' => {
                let p1 = self.resolve(relative, args[0], args[1]);
                let p2 = self.resolve(relative, args[2], args[3]);
                let p3 = self.resolve(relative, args[4], args[5]);
                self.path.curve_to(p1, p2, p3);
                self.cursor = p3;
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        self.path.close_path();
        self.cursor = self.subpath_start;
    }
}

fn parse_path_data(source: &str) -> Result<PathData, LayerError> {
    let mut input = source;
    let mut builder = PathBuilder {
        path: BezPath::new(),
        cursor: Point::ZERO,
        subpath_start: Point::ZERO,
    };
    let offset_of = |rest: &str| source.len() - rest.len();

    skip_separators(&mut input);
    while !input.is_empty() {
        let offset = offset_of(input);
        let cmd = parse_command
            .parse_next(&mut input)
            .map_err(|_| path_error(offset, "expected a path command"))?;
        if builder.path.elements().is_empty() && !matches!(cmd, 'M' | 'm') {
            return Err(path_error(offset, "path data must start with a moveto"));
        }

        let arity = match cmd.to_ascii_uppercase() {
            'Z' => 0,
            'H' | 'V' => 1,
            'M' | 'L' => 2,
            'Q' => 4,
            'C' => 6,
            _ => return Err(path_error(offset, "unsupported path command")),
        };
        if arity == 0 {
            builder.close();
            skip_separators(&mut input);
            continue;
        }

        let mut args = [0.0f64; 6];
        let mut first_group = true;
        loop {
            skip_separators(&mut input);
            if !first_group && !starts_number(input) {
                break;
            }
            for slot in args.iter_mut().take(arity) {
                skip_separators(&mut input);
                let offset = offset_of(input);
                *slot = parse_number
                    .parse_next(&mut input)
                    .map_err(|_| path_error(offset, "expected a number"))?;
            }
            builder.apply(cmd, first_group, &args[..arity]);
            first_group = false;
        }
    }

    Ok(PathData(builder.path))
}

fn path_error(offset: usize, message: &str) -> LayerError {
    LayerError::PathData {
        offset,
        message: message.to_string(),
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn skip_separators(input: &mut &str) {
    *input = input.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
}

fn starts_number(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
}

fn parse_command(input: &mut &str) -> ModalResult<char> {
    one_of([
        'M', 'm', 'L', 'l', 'H', 'h', 'V', 'v', 'C', 'c', 'Q', 'q', 'Z', 'z',
    ])
    .parse_next(input)
}

fn parse_sign(input: &mut &str) -> ModalResult<Option<char>> {
    opt(one_of(['+', '-'])).parse_next(input)
}

fn parse_digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// SVG number: optional sign, digits with optional fraction (`.5` allowed),
/// optional exponent.
fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    let _ = parse_sign(input)?;
    let int = parse_digits(input)?;
    let mut frac = "";
    if input.starts_with('.') {
        *input = &input[1..];
        frac = parse_digits(input)?;
    }
    if int.is_empty() && frac.is_empty() {
        *input = start;
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    if input.starts_with(['e', 'E']) {
        let before_exp = *input;
        *input = &input[1..];
        let _ = parse_sign(input)?;
        if parse_digits(input)?.is_empty() {
            *input = before_exp;
        }
    }
    let matched = &start[..start.len() - input.len()];
    matched.parse::<f64>().map_err(|_| {
        *input = start;
        ErrMode::Backtrack(ContextError::new())
    })
}
