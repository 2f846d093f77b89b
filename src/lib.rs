use pos::Pos;
use prog::ParseError;

pub use interpreter::{
    BoundsSurface, Instruction, InterpError, Interpreter, Surface, Turtle, TurtleConfig,
    VectorSurface, VoidSurface, vectorize,
};
pub use prog::{parse_productions, parse_program};
pub use rewrite::{
    NoTrace, ProductionIndex, RewriteError, Trace, generate, generate_traced,
};
pub use tokens::{Element, Module, Production, Program};

pub mod interpreter;
pub mod pos;
pub mod prog;
pub mod rewrite;
pub mod tokens;

/// Things that can go wrong.
///
/// * Reading a rules file might return an error
/// * The program or production text might be malformed
/// * A rewrite pass might hit an unbound variable
/// * An interpretation pass might underflow the turtle stack
#[derive(Debug, thiserror::Error)]
pub enum LsysError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    ParseError(#[from] Pos<ParseError>),
    #[error("{0}")]
    RewriteError(#[from] RewriteError),
    #[error("{0}")]
    InterpError(#[from] InterpError),
}
