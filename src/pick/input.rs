//! Typed point entry: validation and parsing of the numeric text channel.

use std::fmt;

use bevy::prelude::*;

use crate::geometry::Workplane;
use crate::snap::SnapResult;
use crate::view::SnapView;

/// Why typed input was rejected. The session stays open after any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    InvalidNumber,
    ThreeNumbersRequired,
    CannotInputSingleNumber,
    PointRejected,
    NotAccepting,
}

impl InputError {
    /// Message key for localized display.
    pub fn key(&self) -> &'static str {
        match self {
            InputError::InvalidNumber => "error.input.invalidNumber",
            InputError::ThreeNumbersRequired => "error.input.threeNumberCanBeInput",
            InputError::CannotInputSingleNumber => "error.input.cannotInputANumber",
            InputError::PointRejected => "error.input.pointRejected",
            InputError::NotAccepting => "error.input.notAccepting",
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InputError::InvalidNumber => "Enter one to three numbers separated by commas",
            InputError::ThreeNumbersRequired => "Enter x, y and z",
            InputError::CannotInputSingleNumber => "A single number needs a direction: move the pointer first",
            InputError::PointRejected => "That point is not allowed here",
            InputError::NotAccepting => "Not waiting for typed input",
        };
        f.write_str(message)
    }
}

impl std::error::Error for InputError {}

/// Turns submitted text into a point for a particular kind of pick.
pub trait PointInput: Send + Sync {
    /// Reject text before parsing, or `None` if it is acceptable.
    fn input_error(&self, text: &str, snapped: Option<&SnapResult>) -> Option<InputError>;

    fn point_from_input(
        &self,
        view: &dyn SnapView,
        text: &str,
        snapped: Option<&SnapResult>,
    ) -> Result<Vec3, InputError>;
}

/// Coordinate entry.
///
/// - `x,y[,z]` is relative to the reference point along the plane axes
/// - `#x,y,z` is absolute world coordinates
/// - `d` places the point `d` units from the reference towards the current snap
///
/// Without a reference point only three numbers are accepted.
#[derive(Debug, Clone, Default)]
pub struct CoordinateInput {
    pub reference_point: Option<Vec3>,
    pub plane: Option<Workplane>,
}

struct Parsed {
    absolute: bool,
    values: Vec<f32>,
}

fn parse(text: &str) -> Result<Parsed, InputError> {
    let text = text.trim();
    let (absolute, body) = match text.strip_prefix('#') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('@').unwrap_or(text)),
    };
    let values = body
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| InputError::InvalidNumber)?;
    if values.is_empty() || values.len() > 3 || values.iter().any(|v| !v.is_finite()) {
        return Err(InputError::InvalidNumber);
    }
    Ok(Parsed { absolute, values })
}

impl CoordinateInput {
    fn direction(&self, reference: Vec3, snapped: Option<&SnapResult>) -> Option<Vec3> {
        let direction = (snapped?.point - reference).normalize_or_zero();
        (direction != Vec3::ZERO).then_some(direction)
    }
}

impl PointInput for CoordinateInput {
    fn input_error(&self, text: &str, snapped: Option<&SnapResult>) -> Option<InputError> {
        let parsed = match parse(text) {
            Ok(parsed) => parsed,
            Err(e) => return Some(e),
        };
        match (parsed.absolute, self.reference_point, parsed.values.len()) {
            (_, _, 3) => None,
            (true, _, _) | (false, None, _) => Some(InputError::ThreeNumbersRequired),
            (false, Some(reference), 1) if self.direction(reference, snapped).is_none() => {
                Some(InputError::CannotInputSingleNumber)
            }
            _ => None,
        }
    }

    fn point_from_input(
        &self,
        view: &dyn SnapView,
        text: &str,
        snapped: Option<&SnapResult>,
    ) -> Result<Vec3, InputError> {
        if let Some(error) = self.input_error(text, snapped) {
            return Err(error);
        }
        let parsed = parse(text)?;
        let values = &parsed.values;

        if parsed.absolute || self.reference_point.is_none() {
            return Ok(Vec3::new(values[0], values[1], values[2]));
        }

        let reference = self.reference_point.unwrap_or_default();
        if let [distance] = values.as_slice() {
            let direction = self
                .direction(reference, snapped)
                .ok_or(InputError::CannotInputSingleNumber)?;
            return Ok(reference + direction * *distance);
        }

        let plane = self.plane.unwrap_or_else(|| view.workplane());
        let mut point = reference + plane.x_dir * values[0] + plane.y_dir * values[1];
        if let Some(z) = values.get(2) {
            point += plane.normal * *z;
        }
        Ok(point)
    }
}
