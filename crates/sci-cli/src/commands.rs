//! Command dispatch and rendering.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use sci_common::{Error, OutputFormat, SCHEMA_VERSION};
use sci_config::{resolve_config, validate_config, SolverConfig, ValidationError};
use sci_math::{
    beta, digamma, erf, gamma, inv_erf, inv_gamma_with, inv_lower_gamma_with,
    inv_regularized_incomplete_beta_with, lambert_w_with, ln_gamma, lower_gamma,
    regularized_incomplete_beta_with, upper_gamma, Branch, Estimate, SolverSettings, Status,
};

use crate::cli::{Cli, Commands, ConfigArgs, ConfigCommands};
use crate::exit_codes::ExitCode;

/// One function evaluation, as rendered on stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub schema_version: &'static str,
    pub function: &'static str,
    /// Operands in call order; serialized as a JSON object.
    #[serde(serialize_with = "serialize_args")]
    pub args: Vec<(&'static str, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    /// Non-finite values serialize as `null`.
    pub value: f64,
    pub status: Status,
    pub iterations: u32,
}

impl Evaluation {
    fn new(
        function: &'static str,
        args: &[(&'static str, f64)],
        branch: Option<Branch>,
        estimate: Estimate,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            function,
            args: args.to_vec(),
            branch,
            value: estimate.value,
            status: estimate.status,
            iterations: estimate.iterations,
        }
    }

    fn render_text(&self) -> String {
        let mut operands: Vec<String> =
            self.args.iter().map(|(_, v)| format!("{v:?}")).collect();
        if let Some(branch) = self.branch {
            operands.push(branch.to_string());
        }
        let mut line = format!("{}({}) = {}", self.function, operands.join(", "), self.value);
        match self.status {
            Status::Converged => {}
            Status::Exhausted => {
                line.push_str(&format!("  [exhausted after {} iterations]", self.iterations))
            }
            Status::OutOfDomain => line.push_str("  [out of domain]"),
        }
        line
    }

    fn estimate(&self) -> Estimate {
        Estimate {
            value: self.value,
            iterations: self.iterations,
            status: self.status,
        }
    }
}

fn serialize_args<S: Serializer>(
    args: &[(&'static str, f64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(args.len()))?;
    for (name, value) in args {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

/// Closed-form functions signal a domain error with NaN.
fn closed_form(value: f64) -> Estimate {
    if value.is_nan() {
        Estimate::out_of_domain()
    } else {
        Estimate::exact(value)
    }
}

/// Evaluate a function subcommand. `None` for non-evaluating commands.
pub fn evaluate(command: &Commands, settings: &SolverSettings) -> Option<Evaluation> {
    let eval = match *command {
        Commands::Erf { x } => Evaluation::new("erf", &[("x", x)], None, closed_form(erf(x))),
        Commands::InvErf { x } => {
            Evaluation::new("inv_erf", &[("x", x)], None, closed_form(inv_erf(x)))
        }
        Commands::Gamma { x } => {
            Evaluation::new("gamma", &[("x", x)], None, closed_form(gamma(x)))
        }
        Commands::LnGamma { x } => {
            Evaluation::new("ln_gamma", &[("x", x)], None, closed_form(ln_gamma(x)))
        }
        Commands::Digamma { x } => {
            Evaluation::new("digamma", &[("x", x)], None, closed_form(digamma(x)))
        }
        Commands::InvGamma { x, branch } => {
            let branch = Branch::from(branch);
            Evaluation::new(
                "inv_gamma",
                &[("x", x)],
                Some(branch),
                inv_gamma_with(x, branch, settings),
            )
        }
        Commands::LambertW { x, branch } => {
            let branch = Branch::from(branch);
            Evaluation::new(
                "lambert_w",
                &[("x", x)],
                Some(branch),
                lambert_w_with(x, branch, settings),
            )
        }
        Commands::LowerGamma { s, x } => Evaluation::new(
            "lower_gamma",
            &[("s", s), ("x", x)],
            None,
            closed_form(lower_gamma(s, x)),
        ),
        Commands::UpperGamma { s, x } => Evaluation::new(
            "upper_gamma",
            &[("s", s), ("x", x)],
            None,
            closed_form(upper_gamma(s, x)),
        ),
        Commands::InvLowerGamma { s, y } => Evaluation::new(
            "inv_lower_gamma",
            &[("s", s), ("y", y)],
            None,
            inv_lower_gamma_with(s, y, settings),
        ),
        Commands::Beta { a, b } => Evaluation::new(
            "beta",
            &[("a", a), ("b", b)],
            None,
            closed_form(beta(a, b)),
        ),
        Commands::IncBeta { a, b, x } => Evaluation::new(
            "regularized_incomplete_beta",
            &[("a", a), ("b", b), ("x", x)],
            None,
            regularized_incomplete_beta_with(a, b, x, settings),
        ),
        Commands::InvIncBeta { a, b, p } => Evaluation::new(
            "inv_regularized_incomplete_beta",
            &[("a", a), ("b", b), ("p", p)],
            None,
            inv_regularized_incomplete_beta_with(a, b, p, settings),
        ),
        Commands::Config(_) => return None,
    };
    Some(eval)
}

/// Run the parsed command line and report how it went.
pub fn run(cli: &Cli) -> ExitCode {
    match &cli.command {
        Commands::Config(args) => run_config(cli, args),
        command => {
            let resolved = match resolve_config(cli.config.as_deref()) {
                Ok(r) => r,
                Err(e) => return report_validation_error(cli.format, "evaluate", &e),
            };
            debug!(source = %resolved.source, "solver settings loaded");

            let Some(eval) = evaluate(command, &resolved.config.solvers) else {
                return ExitCode::InternalError;
            };
            if let Err(err) = eval.estimate().into_result(eval.function) {
                let err = Error::from(err);
                warn!(code = err.code(), "{err}");
            }
            emit_evaluation(cli.format, &eval)
        }
    }
}

fn emit_evaluation(format: OutputFormat, eval: &Evaluation) -> ExitCode {
    match format {
        OutputFormat::Json => {
            if let Err(e) = print_json(eval) {
                return report_output_error(&e);
            }
        }
        OutputFormat::Text => println!("{}", eval.render_text()),
    }
    ExitCode::from_status(eval.status)
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => run_config_show(cli),
        ConfigCommands::Validate { path } => run_config_validate(cli.format, path),
    }
}

fn run_config_show(cli: &Cli) -> ExitCode {
    let resolved = match resolve_config(cli.config.as_deref()) {
        Ok(r) => r,
        Err(e) => return report_validation_error(cli.format, "config show", &e),
    };

    match cli.format {
        OutputFormat::Json => {
            let output = json!({
                "schema_version": SCHEMA_VERSION,
                "command": "config show",
                "source": resolved.source,
                "config": resolved.config,
            });
            print_json(&output).map_or_else(|e| report_output_error(&e), |()| ExitCode::Ok)
        }
        OutputFormat::Text => {
            println!("# Solver settings ({})", resolved.source);
            if let Some(desc) = &resolved.config.description {
                println!("# {desc}");
            }
            println!();
            for (name, policy) in resolved.config.solvers.policies() {
                println!(
                    "  {name}: max_iterations={} tolerance={:e}",
                    policy.max_iterations, policy.tolerance
                );
            }
            ExitCode::Ok
        }
    }
}

fn run_config_validate(format: OutputFormat, path: &std::path::Path) -> ExitCode {
    let checked = SolverConfig::from_file(path).and_then(|cfg| {
        validate_config(&cfg)?;
        Ok(cfg)
    });

    match checked {
        Ok(cfg) => match format {
            OutputFormat::Json => {
                let output = json!({
                    "schema_version": SCHEMA_VERSION,
                    "command": "config validate",
                    "status": "valid",
                    "path": path.display().to_string(),
                    "config_schema_version": cfg.schema_version,
                });
                print_json(&output).map_or_else(|e| report_output_error(&e), |()| ExitCode::Ok)
            }
            OutputFormat::Text => {
                println!("Solver config is valid");
                println!("  Path: {}", path.display());
                ExitCode::Ok
            }
        },
        Err(e) => report_validation_error(format, "config validate", &e),
    }
}

fn report_validation_error(format: OutputFormat, command: &str, err: &ValidationError) -> ExitCode {
    let common = Error::from(err.clone());
    let code = ExitCode::from_error(&common);
    match format {
        OutputFormat::Json => {
            let output = json!({
                "schema_version": SCHEMA_VERSION,
                "command": command,
                "status": "error",
                "error": {
                    "code": common.code(),
                    "message": err.to_string(),
                },
            });
            // The error exit code wins over any serialization failure.
            let _ = print_json(&output);
        }
        OutputFormat::Text => eprintln!("sci: {err}"),
    }
    code
}

fn report_output_error(err: &Error) -> ExitCode {
    eprintln!("sci: failed to write output: {err}");
    ExitCode::from_error(err)
}

fn print_json<T: Serialize>(value: &T) -> sci_common::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BranchArg;

    fn eval(command: Commands) -> Evaluation {
        evaluate(&command, &SolverSettings::default()).unwrap()
    }

    #[test]
    fn closed_form_nan_is_out_of_domain() {
        let e = eval(Commands::LnGamma { x: -1.0 });
        assert_eq!(e.status, Status::OutOfDomain);
        assert_eq!(ExitCode::from_status(e.status), ExitCode::OutOfDomain);

        let e = eval(Commands::Gamma { x: 5.0 });
        assert_eq!(e.status, Status::Converged);
        assert_eq!(e.iterations, 0);
        assert!((e.value - 24.0).abs() < 1e-6);
    }

    #[test]
    fn infinite_values_are_not_domain_errors() {
        let e = eval(Commands::InvErf { x: 1.0 });
        assert_eq!(e.value, f64::INFINITY);
        assert_eq!(e.status, Status::Converged);
    }

    #[test]
    fn args_are_named_in_order() {
        let e = eval(Commands::IncBeta {
            a: 2.0,
            b: 3.0,
            x: 0.4,
        });
        assert_eq!(e.function, "regularized_incomplete_beta");
        let names: Vec<&str> = e.args.iter().map(|&(name, _)| name).collect();
        assert_eq!(names, ["a", "b", "x"]);
    }

    #[test]
    fn args_keep_call_order_in_json_and_text() {
        let e = Evaluation::new(
            "inv_lower_gamma",
            &[("y", 1.5), ("s", 3.0)],
            None,
            Estimate::exact(2.0),
        );
        let s = serde_json::to_string(&e).unwrap();
        assert!(s.contains(r#""args":{"y":1.5,"s":3.0}"#), "{s}");
        assert!(e.render_text().starts_with("inv_lower_gamma(1.5, 3.0) = 2"), "{}", e.render_text());

        let e = eval(Commands::InvLowerGamma { s: 3.0, y: 1.5 });
        let s = serde_json::to_string(&e).unwrap();
        assert!(s.contains(r#""args":{"s":3.0,"y":1.5}"#), "{s}");
    }

    #[test]
    fn estimate_round_trips_through_evaluation() {
        let e = eval(Commands::InvGamma {
            x: 0.5,
            branch: BranchArg::Principal,
        });
        assert_eq!(e.estimate().status, Status::OutOfDomain);
        let err = Error::from(e.estimate().into_result(e.function).unwrap_err());
        assert_eq!(ExitCode::from_error(&err), ExitCode::OutOfDomain);
        assert!(err.to_string().contains("inv_gamma"), "{err}");
    }

    #[test]
    fn json_shape_is_stable() {
        let e = eval(Commands::LambertW {
            x: 1.0,
            branch: BranchArg::Principal,
        });
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["schema_version"], SCHEMA_VERSION);
        assert_eq!(v["function"], "lambert_w");
        assert_eq!(v["args"]["x"], 1.0);
        assert_eq!(v["branch"], "principal");
        assert_eq!(v["status"], "converged");
        assert!(v["iterations"].as_u64().unwrap() > 0);
        assert!((v["value"].as_f64().unwrap() - 0.567_143_29).abs() < 1e-6);
    }

    #[test]
    fn nan_value_serializes_as_null() {
        let e = eval(Commands::Erf { x: f64::NAN });
        let v = serde_json::to_value(&e).unwrap();
        assert!(v["value"].is_null());
        assert_eq!(v["status"], "out_of_domain");
        assert!(v.get("branch").is_none());
    }

    #[test]
    fn tight_budget_is_reported_as_exhausted() {
        let mut settings = SolverSettings::default();
        settings.inv_incomplete_beta.max_iterations = 1;
        let e = evaluate(
            &Commands::InvIncBeta {
                a: 2.0,
                b: 5.0,
                p: 0.3,
            },
            &settings,
        )
        .unwrap();
        assert_eq!(e.status, Status::Exhausted);
        assert!(e.render_text().contains("exhausted after 1 iterations"));
    }

    #[test]
    fn text_rendering() {
        let e = eval(Commands::Beta { a: 2.0, b: 3.0 });
        assert!(e.render_text().starts_with("beta(2.0, 3.0) = 0.0833"), "{}", e.render_text());

        let e = eval(Commands::InvLowerGamma { s: 2.0, y: -1.0 });
        assert!(e.render_text().ends_with("[out of domain]"));
    }
}
