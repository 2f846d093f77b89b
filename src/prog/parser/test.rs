use crate::{
    pos::{FilePos, Positionable as _},
    prog::{ParseError, parse_productions, parse_program},
    tokens::{BiOperator, Element, Expr, Module, Production, Program},
};

fn module(command: char, params: impl IntoIterator<Item = Expr>) -> Element {
    Element::Module(Module::new(command, params.into_iter().collect()))
}

fn branch(elements: impl IntoIterator<Item = Element>) -> Element {
    Element::Branch(Program(elements.into_iter().collect()))
}

fn num(val: f64) -> Expr {
    Expr::Number(val)
}

fn var(name: &str) -> Expr {
    Expr::Variable(name.to_string())
}

fn bi(lhs: Expr, op: BiOperator, rhs: Expr) -> Expr {
    Expr::BiOperation(Box::new(lhs), op, Box::new(rhs))
}

fn rule(command: char, successor: Vec<Element>) -> Production {
    Production {
        command,
        variables: Vec::new(),
        condition: None,
        pre: None,
        post: None,
        successor: Program(successor),
    }
}

#[test]
fn empty_program() {
    assert_eq!(parse_program("").unwrap(), Program::default());
    assert_eq!(parse_program("  \n ").unwrap(), Program::default());
}

#[test]
fn single_module() {
    assert_eq!(parse_program("F").unwrap(), Program(vec![module('F', [])]));
}

#[test]
fn literal_parameters() {
    assert_eq!(
        parse_program("F(17)").unwrap(),
        Program(vec![module('F', [num(17.0)])])
    );
    assert_eq!(
        parse_program("F(-17)").unwrap(),
        Program(vec![module('F', [num(-17.0)])])
    );
    assert_eq!(
        parse_program("F(9.3456789)").unwrap(),
        Program(vec![module('F', [num(9.3456789)])])
    );
    assert_eq!(
        parse_program("F(-0.145)").unwrap(),
        Program(vec![module('F', [num(-0.145)])])
    );
    assert_eq!(
        parse_program("F(3,90)").unwrap(),
        Program(vec![module('F', [num(3.0), num(90.0)])])
    );
}

#[test]
fn expression_parameters() {
    assert_eq!(
        parse_program("F(a)").unwrap(),
        Program(vec![module('F', [var("a")])])
    );
    assert_eq!(
        parse_program("F( (a + 1))").unwrap(),
        Program(vec![module('F', [bi(var("a"), BiOperator::Add, num(1.0))])])
    );
    assert_eq!(
        parse_program("F(a-1)").unwrap(),
        Program(vec![module('F', [bi(var("a"), BiOperator::Sub, num(1.0))])])
    );
    assert_eq!(
        parse_program("F((a* b))").unwrap(),
        Program(vec![module('F', [bi(var("a"), BiOperator::Mul, var("b"))])])
    );
    assert_eq!(
        parse_program("F(a^( b* 12))").unwrap(),
        Program(vec![module(
            'F',
            [bi(
                var("a"),
                BiOperator::Exp,
                bi(var("b"), BiOperator::Mul, num(12.0))
            )]
        )])
    );
}

#[test]
fn operator_precedence() {
    // a+b*c^d groups as a+(b*(c^d))
    assert_eq!(
        parse_program("F(a+b*c^d)").unwrap(),
        Program(vec![module(
            'F',
            [bi(
                var("a"),
                BiOperator::Add,
                bi(var("b"), BiOperator::Mul, bi(var("c"), BiOperator::Exp, var("d")))
            )]
        )])
    );
    // exponentiation is right associative
    assert_eq!(
        parse_program("F(2^3^x)").unwrap(),
        Program(vec![module(
            'F',
            [bi(num(2.0), BiOperator::Exp, bi(num(3.0), BiOperator::Exp, var("x")))]
        )])
    );
    // subtraction is left associative
    assert_eq!(
        parse_program("F(1-2-3)").unwrap(),
        Program(vec![module(
            'F',
            [bi(bi(num(1.0), BiOperator::Sub, num(2.0)), BiOperator::Sub, num(3.0))]
        )])
    );
}

#[test]
fn branches() {
    assert_eq!(
        parse_program("F(3)[+(-25.7)F(3)]F(3)").unwrap(),
        Program(vec![
            module('F', [num(3.0)]),
            branch([module('+', [num(-25.7)]), module('F', [num(3.0)])]),
            module('F', [num(3.0)]),
        ])
    );
}

#[test]
fn nested_branches() {
    assert_eq!(
        parse_program("F[[F]F]").unwrap(),
        Program(vec![
            module('F', []),
            branch([branch([module('F', [])]), module('F', [])]),
        ])
    );
}

#[test]
fn unbalanced_brackets() {
    assert_eq!(
        parse_program("F[F").unwrap_err(),
        ParseError::UnbalancedBracket.attach_pos(FilePos::new(1, 4))
    );
    assert_eq!(
        parse_program("F]").unwrap_err(),
        ParseError::UnbalancedBracket.attach_pos(FilePos::new(1, 2))
    );
}

#[test]
fn malformed_parameters() {
    assert!(matches!(
        *parse_program("F(.)").unwrap_err(),
        ParseError::Number(_)
    ));
    assert_eq!(
        *parse_program("F(1 2)").unwrap_err(),
        ParseError::Expected(',')
    );
    assert_eq!(*parse_program("F(1,").unwrap_err(), ParseError::UnexpectedEnd);
}

#[test]
fn deterministic_production() {
    assert_eq!(
        parse_productions("F -> F").unwrap(),
        vec![rule('F', vec![module('F', [])])]
    );
    assert_eq!(
        parse_productions("F->FF").unwrap(),
        vec![rule('F', vec![module('F', []), module('F', [])])]
    );
}

#[test]
fn contextual_productions() {
    assert_eq!(
        parse_productions("A < F -> F").unwrap(),
        vec![Production {
            pre: Some('A'),
            ..rule('F', vec![module('F', [])])
        }]
    );
    assert_eq!(
        parse_productions("F > B -> F").unwrap(),
        vec![Production {
            post: Some('B'),
            ..rule('F', vec![module('F', [])])
        }]
    );
    assert_eq!(
        parse_productions("A < F > B -> F").unwrap(),
        vec![Production {
            pre: Some('A'),
            post: Some('B'),
            ..rule('F', vec![module('F', [])])
        }]
    );
}

#[test]
fn conditional_productions() {
    assert_eq!(
        parse_productions("F(t) : t>5 -> F(t)").unwrap(),
        vec![Production {
            variables: vec!["t".to_string()],
            condition: Some(bi(var("t"), BiOperator::Greater, num(5.0))),
            ..rule('F', vec![module('F', [var("t")])])
        }]
    );
    assert_eq!(
        parse_productions("F(t,b) : t>5 -> F(t)").unwrap(),
        vec![Production {
            variables: vec!["t".to_string(), "b".to_string()],
            condition: Some(bi(var("t"), BiOperator::Greater, num(5.0))),
            ..rule('F', vec![module('F', [var("t")])])
        }]
    );
}

#[test]
fn parenthesized_condition() {
    assert_eq!(
        parse_productions("F(t)(t<5) -> F(t+1)").unwrap(),
        vec![Production {
            variables: vec!["t".to_string()],
            condition: Some(bi(var("t"), BiOperator::Less, num(5.0))),
            ..rule('F', vec![module('F', [bi(var("t"), BiOperator::Add, num(1.0))])])
        }]
    );
}

#[test]
fn contextual_conditional_production() {
    assert_eq!(
        parse_productions("A < F(t) : t>5 > B -> F").unwrap(),
        vec![Production {
            variables: vec!["t".to_string()],
            condition: Some(bi(var("t"), BiOperator::Greater, num(5.0))),
            pre: Some('A'),
            post: Some('B'),
            ..rule('F', vec![module('F', [])])
        }]
    );
}

#[test]
fn multiple_productions() {
    let rules = parse_productions("A < F(t) : t>5 -> F\nF(t) > B : t>5 -> F;A < F(t) > B : t>5 -> F")
        .unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].pre, Some('A'));
    assert_eq!(rules[0].post, None);
    assert_eq!(rules[1].pre, None);
    assert_eq!(rules[1].post, Some('B'));
    assert_eq!(rules[2].pre, Some('A'));
    assert_eq!(rules[2].post, Some('B'));
}

#[test]
fn separators_and_blank_lines() {
    let rules = parse_productions("F -> FF\n\n  \nG -> F;;H -> G\n").unwrap();
    assert_eq!(
        rules.iter().map(|r| r.command).collect::<Vec<_>>(),
        vec!['F', 'G', 'H']
    );
}

#[test]
fn erasing_production() {
    assert_eq!(parse_productions("F -> ").unwrap(), vec![rule('F', vec![])]);
}

#[test]
fn successor_with_branches() {
    assert_eq!(
        parse_productions("F -> F[+F]F").unwrap(),
        vec![rule(
            'F',
            vec![
                module('F', []),
                branch([module('+', []), module('F', [])]),
                module('F', []),
            ]
        )]
    );
}

#[test]
fn missing_arrow() {
    assert_eq!(
        parse_productions("F").unwrap_err(),
        ParseError::MissingArrow.attach_pos(FilePos::new(1, 2))
    );
    assert_eq!(*parse_productions("F = FF").unwrap_err(), ParseError::MissingArrow);
}

#[test]
fn missing_command() {
    assert_eq!(*parse_productions("-> F").unwrap_err(), ParseError::MissingCommand);
    assert_eq!(*parse_productions("( -> F").unwrap_err(), ParseError::MissingCommand);
}

#[test]
fn empty_production_list() {
    assert_eq!(*parse_productions("").unwrap_err(), ParseError::UnexpectedEnd);
    assert_eq!(*parse_productions(" \n ").unwrap_err(), ParseError::UnexpectedEnd);
}

#[test]
fn condition_stops_before_context_marker() {
    let rules = parse_productions("F(t) : t>5 > B -> F").unwrap();
    assert_eq!(
        rules[0].condition,
        Some(bi(var("t"), BiOperator::Greater, num(5.0)))
    );
    assert_eq!(rules[0].post, Some('B'));
}

#[test]
fn comparison_operators() {
    for (src, op) in [
        ("F(t) : t<5 -> F", BiOperator::Less),
        ("F(t) : t<=5 -> F", BiOperator::LessEqual),
        ("F(t) : t>5 -> F", BiOperator::Greater),
        ("F(t) : t>=5 -> F", BiOperator::GreaterEqual),
        ("F(t) : t=5 -> F", BiOperator::Equal),
        ("F(t) : t<>5 -> F", BiOperator::UnEqual),
    ] {
        let rules = parse_productions(src).unwrap();
        assert_eq!(rules[0].condition, Some(bi(var("t"), op, num(5.0))), "{src}");
    }
}

#[test]
fn unbalanced_bracket_in_rule() {
    assert_eq!(
        *parse_productions("F -> F[F").unwrap_err(),
        ParseError::UnbalancedBracket
    );
    assert_eq!(
        *parse_productions("F -> F[F\nG -> G").unwrap_err(),
        ParseError::UnbalancedBracket
    );
}
