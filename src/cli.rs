use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: LCommand,
}

#[derive(Subcommand)]
pub enum LCommand {
    /// Rewrite an axiom and print the resulting program
    Grow {
        #[command(flatten)]
        source: Source,
        /// print every generation, not only the last
        #[arg(short, long)]
        all: bool,
        /// trace rewrite decisions to stderr
        #[arg(short, long)]
        trace: bool,
    },
    /// Rewrite an axiom and print the drawing instructions
    Vector {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        turtle: TurtleOpt,
        /// print the bounding box instead of the instructions
        #[arg(short, long)]
        bounds: bool,
    },
    /// Check syntax of axiom and rules
    Check {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args)]
#[group()]
pub struct Source {
    /// starting program (axiom)
    pub axiom: String,
    #[command(flatten)]
    pub rules: Rules,
    /// number of rewrite iterations
    #[arg(short = 'n', long, default_value_t = 1)]
    pub iterations: usize,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Rules {
    /// production rules, inline
    #[arg(short, long)]
    pub rules: Option<String>,
    /// file containing production rules
    #[arg(short, long)]
    pub file: Option<String>,
}

#[derive(Args)]
#[group()]
pub struct TurtleOpt {
    /// default step length for `F`/`f`
    #[arg(long, default_value_t = 10.0)]
    pub step: f64,
    /// default turn angle in degrees for `+`/`-`
    #[arg(long, default_value_t = 90.0)]
    pub angle: f64,
    /// initial stroke width
    #[arg(long, default_value_t = 0.5)]
    pub width: f64,
}
