use indexmap::IndexMap;

use crate::{
    pos::Pos,
    prog::{self, ParseError},
    tokens::{Bindings, Element, EvalError, Expr, Module, Production, Program, Value},
};


/// Productions grouped by the command they rewrite, in declaration order.
///
/// Declaration order is the tie breaker: the first candidate whose guards
/// hold wins, later rules for the same command are never consulted.
#[derive(Debug, Default)]
pub struct ProductionIndex {
    rules: IndexMap<char, Vec<Production>>,
}

impl ProductionIndex {
    pub fn new(rules: impl IntoIterator<Item = Production>) -> Self {
        let mut index = IndexMap::<char, Vec<Production>>::new();
        for rule in rules {
            index.entry(rule.command).or_insert_with(Vec::new).push(rule);
        }
        Self { rules: index }
    }

    /// Parse and index a production list in one step.
    pub fn parse(src: &str) -> Result<Self, Pos<ParseError>> {
        Ok(Self::new(prog::parse_productions(src)?))
    }

    /// All candidates for a command, in declaration order.
    pub fn get(&self, command: char) -> &[Production] {
        self.rules
            .get(&command)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first declared rule matching the module in its sibling context.
    ///
    /// `pre` and `post` are the commands of the neighbouring siblings in the
    /// original sequence ([`None`] at the ends and next to branches). A rule
    /// matches when its context symbols agree and its condition evaluates to
    /// `true`; [`None`] means the module passes through unchanged.
    pub fn find_match(
        &self,
        module: &Module,
        pre: Option<char>,
        post: Option<char>,
    ) -> Result<Option<&Production>, RewriteError> {
        for rule in self.get(module.command) {
            if let Some(p) = rule.pre
                && pre != Some(p)
            {
                continue;
            }
            if let Some(p) = rule.post
                && post != Some(p)
            {
                continue;
            }
            if let Some(cond) = &rule.condition {
                let bindings = rule
                    .bind(module)
                    .map_err(|why| RewriteError::new(rule, module, why))?;
                match cond
                    .eval(&bindings)
                    .map_err(|why| RewriteError::new(rule, module, why))?
                {
                    Value::Boolean(true) => {}
                    _ => continue,
                }
            }
            return Ok(Some(rule));
        }
        Ok(None)
    }
}

/// Observer for a rewrite pass.
///
/// Replaces a global debug switch: pass an implementation to
/// [`generate_traced`] to watch a generation being built. All methods have
/// empty default bodies.
pub trait Trace {
    /// Called for every module of the original program, with the rule that
    /// matched it, if any.
    fn module(&mut self, _module: &Module, _production: Option<&Production>) {}
    fn enter_branch(&mut self) {}
    fn leave_branch(&mut self) {}
}

/// Ignores all trace points.
pub struct NoTrace;

impl Trace for NoTrace {}

/// Apply one generation of rewrites.
///
/// Matched modules are replaced by their instantiated successor, unmatched
/// modules pass through unchanged and branches are rewritten recursively.
/// Context symbols are checked against the original, pre-rewrite siblings.
/// Iterating this N times is the caller's loop.
pub fn generate(program: &Program, index: &ProductionIndex) -> Result<Program, RewriteError> {
    generate_traced(program, index, &mut NoTrace)
}

/// [`generate`] with an observer.
pub fn generate_traced(
    program: &Program,
    index: &ProductionIndex,
    trace: &mut impl Trace,
) -> Result<Program, RewriteError> {
    let mut result = Vec::new();
    for (i, element) in program.iter().enumerate() {
        match element {
            Element::Module(module) => {
                let pre = i
                    .checked_sub(1)
                    .and_then(|j| program.get(j))
                    .and_then(Element::command);
                let post = program.get(i + 1).and_then(Element::command);
                let production = index.find_match(module, pre, post)?;
                trace.module(module, production);
                match production {
                    Some(rule) => {
                        let bindings = rule
                            .bind(module)
                            .map_err(|why| RewriteError::new(rule, module, why))?;
                        result.extend(instantiate(&rule.successor, &bindings, rule, module)?.0);
                    }
                    None => result.push(element.clone()),
                }
            }
            Element::Branch(branch) => {
                trace.enter_branch();
                let rewritten = generate_traced(branch, index, trace)?;
                trace.leave_branch();
                result.push(Element::Branch(rewritten));
            }
        }
    }
    Ok(Program(result))
}

/// Clone a successor template with every parameter evaluated to a literal,
/// so the next generation is a concrete program again.
fn instantiate(
    template: &Program,
    bindings: &Bindings,
    rule: &Production,
    module: &Module,
) -> Result<Program, RewriteError> {
    let mut res = Vec::new();
    for element in template.iter() {
        res.push(match element {
            Element::Module(m) => {
                let params = m
                    .params
                    .iter()
                    .map(|param| param.eval_num(bindings).map(Expr::Number))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|why| RewriteError::new(rule, module, why))?;
                Element::Module(Module::new(m.command, params))
            }
            Element::Branch(branch) => {
                Element::Branch(instantiate(branch, bindings, rule, module)?)
            }
        });
    }
    Ok(Program(res))
}

/// A production failed to evaluate against a module.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("cannot rewrite `{module}` with `{production}`: {source}")]
pub struct RewriteError {
    pub production: String,
    pub module: String,
    pub source: EvalError,
}

impl RewriteError {
    fn new(rule: &Production, module: &Module, source: EvalError) -> Self {
        Self {
            production: rule.to_string(),
            module: module.to_string(),
            source,
        }
    }
}
