//! Argument model for `sci`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sci_common::OutputFormat;
use sci_math::Branch;

use crate::logging::LogFormat;

/// Evaluate special functions from the command line.
#[derive(Parser, Debug)]
#[command(name = "sci", version, about)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Solver config file (overrides SCI_CONFIG and the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Lambert W / inverse gamma branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BranchArg {
    #[default]
    Principal,
    Secondary,
}

impl From<BranchArg> for Branch {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::Principal => Branch::Principal,
            BranchArg::Secondary => Branch::Secondary,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Error function erf(x)
    Erf {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Inverse error function, defined on [-1, 1]
    InvErf {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Gamma function Γ(x)
    Gamma {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Natural log of Γ(x), x > 0
    LnGamma {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Digamma function ψ(x)
    Digamma {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Solve Γ(t) = x for t on one side of the gamma minimum
    InvGamma {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        /// principal: t above the minimum; secondary: t below it
        #[arg(long, value_enum, default_value_t = BranchArg::Principal)]
        branch: BranchArg,
    },
    /// Lambert W: solve w·e^w = x
    LambertW {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(long, value_enum, default_value_t = BranchArg::Principal)]
        branch: BranchArg,
    },
    /// Lower incomplete gamma γ(s, x)
    LowerGamma {
        #[arg(allow_negative_numbers = true)]
        s: f64,
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Upper incomplete gamma Γ(s, x)
    UpperGamma {
        #[arg(allow_negative_numbers = true)]
        s: f64,
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Solve γ(s, x) = y for x
    InvLowerGamma {
        #[arg(allow_negative_numbers = true)]
        s: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Beta function B(a, b)
    Beta {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Regularized incomplete beta I_x(a, b)
    IncBeta {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Solve I_x(a, b) = p for x
    InvIncBeta {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        #[arg(allow_negative_numbers = true)]
        p: f64,
    },
    /// Inspect or check solver configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the active solver settings and where they came from
    Show,
    /// Check a config file without using it
    Validate {
        path: PathBuf,
    },
}
