use crate::{
    pos::{FilePos, Pos, Positionable},
    tokens::{BiOperator, Element, Expr, Module, Production, Program, UnOperator},
};

#[cfg(test)]
mod test;

/// Characters with grammatical meaning that can never be command symbols.
const RESERVED: &[char] = &['(', ')', '[', ']', ',', ';', ':', '<', '>'];

/// Result of parsing a specific node
type PRes<T> = Result<T, Pos<ParseError>>;

/// What may end the element sequence currently being parsed.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Close {
    Eof,
    Bracket,
    Rule,
}

/// Recursive descent parser for programs and production lists.
///
/// Commands are single characters while variables inside parameter lists are
/// full identifiers, so tokenization depends on context; instead of a token
/// stream the parser works directly on characters with lookahead.
pub struct Parser {
    chars: Vec<char>,
    offset: usize,
    line: usize,
    column: usize,
    in_rule: bool,
}

impl Parser {
    pub fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            offset: 0,
            line: 1,
            column: 1,
            in_rule: false,
        }
    }

    // ######################
    //     entry points
    // ######################

    pub fn program(mut self) -> PRes<Program> {
        let elements = self.elements(Close::Eof)?;
        Ok(Program(elements))
    }

    pub fn productions(mut self) -> PRes<Vec<Production>> {
        self.in_rule = true;
        let mut rules = Vec::new();
        loop {
            while let Some(c) = self.lookahead() {
                if c.is_whitespace() || c == ';' {
                    self.next_char();
                } else {
                    break;
                }
            }
            if self.lookahead().is_none() {
                break;
            }
            rules.push(self.production()?);
        }
        if rules.is_empty() {
            return Err(ParseError::UnexpectedEnd.attach_pos(self.pos()));
        }
        Ok(rules)
    }

    // ######################
    //     programs
    // ######################

    fn elements(&mut self, close: Close) -> PRes<Vec<Element>> {
        let mut res = Vec::new();
        loop {
            self.skip();
            let pos = self.pos();
            let Some(c) = self.lookahead() else {
                return match close {
                    Close::Bracket => Err(ParseError::UnbalancedBracket.attach_pos(pos)),
                    _ => Ok(res),
                };
            };
            match c {
                '\n' | ';' if self.in_rule => {
                    return match close {
                        Close::Rule => Ok(res),
                        _ => Err(ParseError::UnbalancedBracket.attach_pos(pos)),
                    };
                }
                ']' => {
                    self.next_char();
                    return match close {
                        Close::Bracket => Ok(res),
                        _ => Err(ParseError::UnbalancedBracket.attach_pos(pos)),
                    };
                }
                '[' => {
                    self.next_char();
                    let inner = self.elements(Close::Bracket)?;
                    res.push(Element::Branch(Program(inner)));
                }
                c if RESERVED.contains(&c) => {
                    return Err(ParseError::UnexpectedChar(c).attach_pos(pos));
                }
                _ => res.push(Element::Module(self.module()?)),
            }
        }
    }

    fn module(&mut self) -> PRes<Module> {
        let pos = self.pos();
        let Some(command) = self.next_char() else {
            return Err(ParseError::UnexpectedEnd.attach_pos(pos));
        };
        let mut params = Vec::new();
        self.skip();
        if self.eat('(') {
            self.skip();
            if !self.eat(')') {
                loop {
                    params.push(self.expr()?);
                    self.skip();
                    if self.eat(')') {
                        break;
                    }
                    self.expect(',')?;
                }
            }
        }
        Ok(Module { command, params })
    }

    // ######################
    //     productions
    // ######################

    fn production(&mut self) -> PRes<Production> {
        let first = self.command_char()?;
        self.skip();
        let (pre, command) = if self.eat('<') {
            self.skip();
            (Some(first), self.command_char()?)
        } else {
            (None, first)
        };

        let mut variables = Vec::new();
        let mut condition = None;
        self.skip();
        let gpos = self.pos();
        if self.eat('(') {
            let mut exprs = self.group()?;
            let vars: Option<Vec<String>> = exprs
                .iter()
                .map(|expr| match expr {
                    Expr::Variable(name) => Some(name.clone()),
                    _ => None,
                })
                .collect();
            match vars {
                // `F(t,b)` declares variables; a second group is a guard
                Some(names) if !names.is_empty() => {
                    variables = names;
                    self.skip();
                    let gpos = self.pos();
                    if self.eat('(') {
                        let mut guard = self.group()?;
                        match (guard.pop(), guard.is_empty()) {
                            (Some(expr), true) => condition = Some(expr),
                            _ => {
                                return Err(ParseError::MultipleConditions.attach_pos(gpos));
                            }
                        }
                    }
                }
                // `F(t<5)` is a bare condition guard
                _ => match (exprs.pop(), exprs.is_empty()) {
                    (Some(expr), true) => condition = Some(expr),
                    _ => return Err(ParseError::MultipleConditions.attach_pos(gpos)),
                },
            }
        }

        // `: cond` and `> post` appear in either order
        let mut post = None;
        loop {
            self.skip();
            let cpos = self.pos();
            if self.eat(':') {
                if condition.is_some() {
                    return Err(ParseError::UnexpectedChar(':').attach_pos(cpos));
                }
                condition = Some(self.condition()?);
            } else if post.is_none() && self.eat('>') {
                self.skip();
                post = Some(self.command_char()?);
            } else {
                break;
            }
        }

        self.skip();
        self.arrow()?;
        let successor = Program(self.elements(Close::Rule)?);
        Ok(Production {
            command,
            variables,
            condition,
            pre,
            post,
            successor,
        })
    }

    fn command_char(&mut self) -> PRes<char> {
        let pos = self.pos();
        match self.next_char() {
            Some(c)
                if !RESERVED.contains(&c)
                    && !c.is_whitespace()
                    && !(c == '-' && self.lookahead() == Some('>')) =>
            {
                Ok(c)
            }
            _ => Err(ParseError::MissingCommand.attach_pos(pos)),
        }
    }

    fn arrow(&mut self) -> PRes<()> {
        let pos = self.pos();
        if self.eat('-') && self.eat('>') {
            Ok(())
        } else {
            Err(ParseError::MissingArrow.attach_pos(pos))
        }
    }

    /// Comma-separated expressions up to the closing parenthesis.
    /// Entries may be comparisons since the group might be a condition guard.
    fn group(&mut self) -> PRes<Vec<Expr>> {
        let mut res = Vec::new();
        self.skip();
        if self.eat(')') {
            return Ok(res);
        }
        loop {
            res.push(self.condition()?);
            self.skip();
            if self.eat(')') {
                return Ok(res);
            }
            self.expect(',')?;
        }
    }

    // ######################
    //     expressions
    // ######################

    /// An arithmetic expression with at most one trailing comparison.
    ///
    /// Limiting conditions to a single comparison keeps `F(t) : t>5 > B ->`
    /// unambiguous: the second `>` must be a context marker.
    pub fn condition(&mut self) -> PRes<Expr> {
        let lhs = self.expr()?;
        let Some(op) = self.match_comparison() else {
            return Ok(lhs);
        };
        let rhs = self.expr()?;
        Ok(Expr::BiOperation(Box::new(lhs), op, Box::new(rhs)))
    }

    pub fn expr(&mut self) -> PRes<Expr> {
        #[derive(Debug, PartialEq, Clone, Copy)]
        enum NodeKind {
            Start,
            Empty,
            Op(BiOperator),
        }

        enum Associativity {
            LeftToRight,
            RightToLeft,
        }

        const PRECEDENCE: [(&[BiOperator], Associativity); 3] = [
            (&[BiOperator::Exp], Associativity::RightToLeft),
            (
                &[BiOperator::Mul, BiOperator::Div],
                Associativity::LeftToRight,
            ),
            (
                &[BiOperator::Add, BiOperator::Sub],
                Associativity::LeftToRight,
            ),
        ];

        let base_expr = self.operand()?;
        let mut nodes = vec![(NodeKind::Start, Some(base_expr))];
        while let Some(op) = self.match_operator() {
            nodes.push((NodeKind::Op(op), Some(self.operand()?)));
        }
        for (ops, assoc) in PRECEDENCE {
            match assoc {
                Associativity::LeftToRight => {
                    for i in 0..nodes.len() - 1 {
                        if let NodeKind::Op(op) = nodes[i + 1].0
                            && ops.contains(&op)
                        {
                            let lhs = nodes[i].1.take().unwrap();
                            let rhs = nodes[i + 1].1.take().unwrap();
                            nodes[i + 1].1 =
                                Some(Expr::BiOperation(Box::new(lhs), op, Box::new(rhs)));
                            nodes[i + 1].0 = nodes[i].0;
                            nodes[i].0 = NodeKind::Empty;
                        }
                    }
                }
                Associativity::RightToLeft => {
                    for i in (1..nodes.len()).rev() {
                        if let NodeKind::Op(op) = nodes[i].0
                            && ops.contains(&op)
                        {
                            let lhs = nodes[i - 1].1.take().unwrap();
                            let rhs = nodes[i].1.take().unwrap();
                            nodes[i - 1].1 =
                                Some(Expr::BiOperation(Box::new(lhs), op, Box::new(rhs)));
                            nodes[i].0 = NodeKind::Empty;
                        }
                    }
                }
            }
            nodes.retain(|(op, _)| *op != NodeKind::Empty);
        }
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].0, NodeKind::Start);
        Ok(nodes[0].1.take().unwrap())
    }

    fn operand(&mut self) -> PRes<Expr> {
        self.skip();
        let pos = self.pos();
        match self.lookahead() {
            Some('(') => {
                self.next_char();
                let expr = self.expr()?;
                self.skip();
                self.expect(')')?;
                Ok(expr)
            }
            Some('-') => {
                self.next_char();
                // fold negated literals so `F(-17)` round trips
                Ok(match self.operand()? {
                    Expr::Number(num) => Expr::Number(-num),
                    expr => Expr::UnOperation(UnOperator::Negate, Box::new(expr)),
                })
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => Ok(Expr::Variable(self.identifier())),
            Some(c) => Err(ParseError::UnexpectedChar(c).attach_pos(pos)),
            None => Err(ParseError::UnexpectedEnd.attach_pos(pos)),
        }
    }

    fn number(&mut self) -> PRes<Expr> {
        let pos = self.pos();
        let mut str = String::new();
        let mut fraction = false;
        while let Some(c) = self.lookahead() {
            if c.is_ascii_digit() || (c == '.' && !fraction) {
                fraction |= c == '.';
                str.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        match str.parse::<f64>() {
            Ok(num) => Ok(Expr::Number(num)),
            Err(why) => Err(ParseError::Number(why).attach_pos(pos)),
        }
    }

    fn identifier(&mut self) -> String {
        let mut str = String::new();
        while let Some(c) = self.lookahead() {
            if c == '_' || c.is_alphanumeric() {
                str.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        str
    }

    fn match_operator(&mut self) -> Option<BiOperator> {
        self.skip();
        let op = match self.lookahead()? {
            '+' => BiOperator::Add,
            // `->` belongs to the enclosing rule
            '-' if self.lookahead_at(1) != Some('>') => BiOperator::Sub,
            '*' => BiOperator::Mul,
            '/' => BiOperator::Div,
            '^' => BiOperator::Exp,
            _ => return None,
        };
        self.next_char();
        Some(op)
    }

    fn match_comparison(&mut self) -> Option<BiOperator> {
        self.skip();
        match self.lookahead()? {
            '<' => {
                self.next_char();
                Some(if self.eat('=') {
                    BiOperator::LessEqual
                } else if self.eat('>') {
                    BiOperator::UnEqual
                } else {
                    BiOperator::Less
                })
            }
            '>' => {
                self.next_char();
                Some(if self.eat('=') {
                    BiOperator::GreaterEqual
                } else {
                    BiOperator::Greater
                })
            }
            '=' => {
                self.next_char();
                Some(BiOperator::Equal)
            }
            _ => None,
        }
    }

    // ######################
    //     char cursor
    // ######################

    fn next_char(&mut self) -> Option<char> {
        let c = self.lookahead()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn lookahead(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn lookahead_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.offset + n).copied()
    }

    fn pos(&self) -> FilePos {
        FilePos::new(self.line, self.column)
    }

    /// Skip insignificant whitespace. Inside a rule, newlines separate
    /// productions and stay put.
    fn skip(&mut self) {
        while let Some(c) = self.lookahead() {
            if c.is_whitespace() && !(self.in_rule && c == '\n') {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.lookahead() == Some(c) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> PRes<()> {
        let pos = self.pos();
        if self.eat(c) {
            Ok(())
        } else {
            Err(ParseError::Expected(c).attach_pos(pos))
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected `{0}`")]
    Expected(char),
    #[error("unbalanced brackets")]
    UnbalancedBracket,
    #[error("production rule has no command symbol")]
    MissingCommand,
    #[error("production rule has no `->`")]
    MissingArrow,
    #[error("condition guard must be a single expression")]
    MultipleConditions,
    #[error("{0}")]
    Number(#[from] std::num::ParseFloatError),
}
