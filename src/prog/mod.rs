use crate::{
    pos::Pos,
    tokens::{Production, Program},
};

pub use parser::{ParseError, Parser};

mod parser;

/// Parse a program string into its module/branch sequence.
///
/// Empty input is an empty program, not an error.
pub fn parse_program(src: &str) -> Result<Program, Pos<ParseError>> {
    Parser::new(src).program()
}

/// Parse a production list, one rule per line (rules may also be separated
/// by `;`).
pub fn parse_productions(src: &str) -> Result<Vec<Production>, Pos<ParseError>> {
    Parser::new(src).productions()
}
