use std::fmt::Display;

use crate::tokens::{Bindings, Element, EvalError, Module, Program};

pub use surface::{BoundsSurface, Surface, VectorSurface, VoidSurface};
pub use turtle::{Turtle, TurtleConfig};

mod surface;
mod turtle;

/// A single drawing instruction as consumed by a renderer.
///
/// The textual form is the flat opcode format, each opcode followed by its
/// fixed number of arguments: `p`, `m x y`, `l x y`, `s`, `w n`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Instruction {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    Width(f64),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::BeginPath => write!(f, "p"),
            Instruction::MoveTo(x, y) => write!(f, "m {x} {y}"),
            Instruction::LineTo(x, y) => write!(f, "l {x} {y}"),
            Instruction::Stroke => write!(f, "s"),
            Instruction::Width(width) => write!(f, "w {width}"),
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InterpError {
    /// A restore with no saved state left. The parser's nesting invariant
    /// makes this unreachable for parsed programs; it can only fire through
    /// a hand-built `]` module.
    #[error("turtle state restored with no saved state")]
    EmptyStack,
    #[error("{0}")]
    Eval(#[from] EvalError),
}

/// Walks a program depth first, driving a turtle over a drawing surface.
///
/// The turtle survives between calls: interpreting `[from, mid)` and then
/// `[mid, to)` matches one pass over `[from, to)`, which is what lets a
/// caller render a long program progressively across frames.
pub struct Interpreter {
    config: TurtleConfig,
    turtle: Turtle,
}

impl Interpreter {
    pub fn new(config: TurtleConfig) -> Self {
        let turtle = Turtle::new(&config);
        Self { config, turtle }
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    /// Interpret the whole program.
    pub fn interpret(
        &mut self,
        program: &Program,
        surface: &mut impl Surface,
    ) -> Result<(), InterpError> {
        self.interpret_range(program, 0, program.len(), surface)
    }

    /// Interpret the top-level elements in `[from, to)`.
    pub fn interpret_range(
        &mut self,
        program: &Program,
        from: usize,
        to: usize,
        surface: &mut impl Surface,
    ) -> Result<(), InterpError> {
        for element in program.iter().take(to).skip(from) {
            self.element(element, surface)?;
        }
        Ok(())
    }

    fn element(
        &mut self,
        element: &Element,
        surface: &mut impl Surface,
    ) -> Result<(), InterpError> {
        match element {
            Element::Module(module) => self.module(module, surface)?,
            Element::Branch(branch) => {
                self.turtle.save();
                surface.save();
                for element in branch.iter() {
                    self.element(element, surface)?;
                }
                self.turtle.restore()?;
                surface.restore();
            }
        }
        Ok(())
    }

    fn module(&mut self, module: &Module, surface: &mut impl Surface) -> Result<(), InterpError> {
        match module.command {
            'F' => {
                let dist = self.param(module, self.config.step)?;
                let (x, y) = self.turtle.position;
                surface.begin_path();
                surface.move_to(x, y);
                let (x, y) = self.turtle.move_dist(dist);
                surface.line_to(x, y);
                surface.stroke();
            }
            'f' => {
                let dist = self.param(module, self.config.step)?;
                self.turtle.move_dist(dist);
            }
            '+' => {
                let angle = self.param(module, self.config.angle)?;
                self.turtle.rotate(angle.to_radians());
            }
            '-' => {
                let angle = self.param(module, self.config.angle)?;
                self.turtle.rotate(-angle.to_radians());
            }
            'w' => {
                let width = self.param(module, self.config.width)?;
                self.turtle.width = width;
                surface.set_width(width);
            }
            '[' => {
                self.turtle.save();
                surface.save();
            }
            ']' => {
                self.turtle.restore()?;
                surface.restore();
            }
            // unknown commands are ignored for forward compatibility
            _ => {}
        }
        Ok(())
    }

    fn param(&self, module: &Module, default: f64) -> Result<f64, InterpError> {
        match module.params.first() {
            Some(expr) => Ok(expr.eval_num(&Bindings::new())?),
            None => Ok(default),
        }
    }
}

/// Compile a program into renderer-agnostic drawing instructions.
pub fn vectorize(program: &Program, config: &TurtleConfig) -> Result<Vec<Instruction>, InterpError> {
    let mut surface = VectorSurface::default();
    Interpreter::new(config.clone()).interpret(program, &mut surface)?;
    Ok(surface.into_instructions())
}
