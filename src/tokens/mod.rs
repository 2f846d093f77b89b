use std::{fmt::Display, ops::Deref, str::FromStr};

use crate::{
    pos::Pos,
    prog::{self, ParseError},
};

pub use expr::{BiOperator, Bindings, EvalError, Expr, UnOperator, ValType, Value};

pub mod expr;

/// A single turtle instruction: a command symbol plus its parameters.
#[derive(Debug, PartialEq, Clone)]
pub struct Module {
    pub command: char,
    pub params: Vec<Expr>,
}

impl Module {
    pub fn new(command: char, params: Vec<Expr>) -> Self {
        Self { command, params }
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command)?;
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// One entry of a program: a module or a bracketed branch.
///
/// This is the single canonical program representation; there is no flat
/// variant with `[`/`]` pseudo-modules.
#[derive(Debug, PartialEq, Clone)]
pub enum Element {
    Module(Module),
    Branch(Program),
}

impl Element {
    /// The command symbol of a module, [`None`] for branches.
    pub fn command(&self) -> Option<char> {
        match self {
            Element::Module(module) => Some(module.command),
            Element::Branch(_) => None,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Module(module) => write!(f, "{module}"),
            Element::Branch(branch) => write!(f, "[{branch}]"),
        }
    }
}

/// An ordered sequence of modules and branches.
///
/// Produced by parsing a program string and by every rewrite generation.
/// [`Display`] renders the canonical text form, so parsing is a left inverse
/// of formatting.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program(pub Vec<Element>);

impl Deref for Program {
    type Target = [Element];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.0 {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl FromStr for Program {
    type Err = Pos<ParseError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        prog::parse_program(s)
    }
}

/// A rewrite rule.
///
/// `variables` are bound positionally from the triggering module's
/// parameters; `condition` must evaluate to `true` under those bindings for
/// the rule to apply; `pre`/`post` restrict the match to modules whose
/// neighbouring siblings carry the given commands.
#[derive(Debug, PartialEq, Clone)]
pub struct Production {
    pub command: char,
    pub variables: Vec<String>,
    pub condition: Option<Expr>,
    pub pre: Option<char>,
    pub post: Option<char>,
    pub successor: Program,
}

impl Production {
    /// Bind the module's actual parameters to this rule's variables.
    ///
    /// Parameters are evaluated without bindings of their own, so a module
    /// carrying symbolic parameters cannot trigger a parametric rule.
    /// Surplus parameters are dropped; a missing one only matters once the
    /// variable is referenced.
    pub fn bind(&self, module: &Module) -> Result<Bindings, EvalError> {
        let empty = Bindings::new();
        let mut bindings = Bindings::new();
        for (name, param) in self.variables.iter().zip(&module.params) {
            bindings.insert(name.clone(), param.eval_num(&empty)?);
        }
        Ok(bindings)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(pre) = self.pre {
            write!(f, "{pre} < ")?;
        }
        write!(f, "{}", self.command)?;
        if !self.variables.is_empty() {
            write!(f, "({})", self.variables.join(","))?;
        }
        if let Some(cond) = &self.condition {
            write!(f, " : {cond}")?;
        }
        if let Some(post) = self.post {
            write!(f, " > {post}")?;
        }
        write!(f, " -> {}", self.successor)
    }
}
