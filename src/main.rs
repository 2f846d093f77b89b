use clap::Parser;
use lsys::{
    BoundsSurface, Interpreter, LsysError, Module, Production, ProductionIndex, Program, Trace,
    TurtleConfig, generate, generate_traced, parse_program, vectorize,
};

use cli::*;

mod cli;

impl Source {
    fn load(&self) -> Result<(Program, ProductionIndex), LsysError> {
        let program = parse_program(&self.axiom)?;
        let rules = self.rules.text()?;
        Ok((program, ProductionIndex::parse(&rules)?))
    }
}

impl Rules {
    fn text(&self) -> Result<String, LsysError> {
        match (&self.rules, &self.file) {
            (Some(rules), _) => Ok(rules.clone()),
            (_, Some(file)) => Ok(std::fs::read_to_string(file)?),
            _ => unreachable!("clap enforces the rule source group"),
        }
    }
}

impl TurtleOpt {
    fn config(&self) -> TurtleConfig {
        TurtleConfig {
            step: self.step,
            angle: self.angle,
            width: self.width,
        }
    }
}

/// Prints every rewrite decision to stderr, indented by branch depth.
#[derive(Default)]
struct StderrTrace {
    depth: usize,
}

impl Trace for StderrTrace {
    fn module(&mut self, module: &Module, production: Option<&Production>) {
        let indent = self.depth * 2;
        match production {
            Some(rule) => eprintln!("{:indent$}{module} => {}", "", rule.successor),
            None => eprintln!("{:indent$}{module}", ""),
        }
    }

    fn enter_branch(&mut self) {
        let indent = self.depth * 2;
        eprintln!("{:indent$}[", "");
        self.depth += 1;
    }

    fn leave_branch(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        let indent = self.depth * 2;
        eprintln!("{:indent$}]", "");
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(why) = run(cli.command) {
        eprintln!("{why}");
        std::process::exit(1);
    }
}

fn run(command: LCommand) -> Result<(), LsysError> {
    match command {
        LCommand::Grow { source, all, trace } => {
            let (mut program, index) = source.load()?;
            for _ in 0..source.iterations {
                program = if trace {
                    generate_traced(&program, &index, &mut StderrTrace::default())?
                } else {
                    generate(&program, &index)?
                };
                if all {
                    println!("{program}");
                }
            }
            if !all {
                println!("{program}");
            }
            Ok(())
        }
        LCommand::Vector {
            source,
            turtle,
            bounds,
        } => {
            let (mut program, index) = source.load()?;
            for _ in 0..source.iterations {
                program = generate(&program, &index)?;
            }
            let config = turtle.config();
            if bounds {
                let mut surface = BoundsSurface::default();
                Interpreter::new(config).interpret(&program, &mut surface)?;
                match surface.rect() {
                    Some((min_x, min_y, max_x, max_y)) => {
                        println!("{min_x} {min_y} {max_x} {max_y}");
                    }
                    None => println!("empty"),
                }
            } else {
                for instruction in vectorize(&program, &config)? {
                    println!("{instruction}");
                }
            }
            Ok(())
        }
        LCommand::Check { source } => source.load().map(|_| ()),
    }
}
