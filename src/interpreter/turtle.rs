use std::f64::consts::FRAC_PI_2;

use super::InterpError;

/// Default parameters for interpretation.
#[derive(Debug, Clone)]
pub struct TurtleConfig {
    /// Distance covered by `F`/`f` without a parameter.
    pub step: f64,
    /// Turn angle in degrees for `+`/`-` without a parameter.
    pub angle: f64,
    /// Initial stroke width.
    pub width: f64,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step: 10.0,
            angle: 90.0,
            width: 0.5,
        }
    }
}

/// Cursor state while interpreting a program.
///
/// Owned exclusively by one interpretation pass; branches push and pop
/// copies on the internal stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    pub position: (f64, f64),
    /// Heading in radians, counterclockwise; starts pointing up.
    pub heading: f64,
    pub color: (f64, f64, f64),
    pub width: f64,
    stack: Vec<State>,
}

#[derive(Debug, Clone, PartialEq)]
struct State {
    position: (f64, f64),
    heading: f64,
    color: (f64, f64, f64),
    width: f64,
}

impl Turtle {
    pub fn new(config: &TurtleConfig) -> Self {
        Self {
            position: (0.0, 0.0),
            heading: FRAC_PI_2,
            color: (0.5, 0.5, 0.5),
            width: config.width,
            stack: Vec::new(),
        }
    }

    /// Advance along the current heading, returning the new position.
    pub fn move_dist(&mut self, dist: f64) -> (f64, f64) {
        self.position.0 += self.heading.cos() * dist;
        self.position.1 += self.heading.sin() * dist;
        self.position
    }

    pub fn rotate(&mut self, by: f64) {
        self.heading += by;
    }

    /// Save the current state onto the stack.
    pub fn save(&mut self) {
        self.stack.push(State {
            position: self.position,
            heading: self.heading,
            color: self.color,
            width: self.width,
        });
    }

    /// Restore the most recently saved state.
    pub fn restore(&mut self) -> Result<(), InterpError> {
        let state = self.stack.pop().ok_or(InterpError::EmptyStack)?;
        self.position = state.position;
        self.heading = state.heading;
        self.color = state.color;
        self.width = state.width;
        Ok(())
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
