mod error_formatter;
mod formatter;
mod interactive;

use anyhow::{bail, Context, Result};
use chaining::{
    Engine, EngineConfig, EngineError, FiringStrategy, Goal, OrderingStrategy, Strictness,
    TraceEvent,
};
use clap::{Args, Parser, Subcommand};
use error_formatter::SourcedError;
use formatter::Formatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "chaining")]
#[command(about = "Forward and backward chaining over attribute=value rules.")]
#[command(
    long_about = "Loads a JSON knowledge base of facts and production rules, then derives facts by forward chaining,\nproves goals by backward chaining, resolves rules by dependency groups, or checks the base for incoherence."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Print every step taken by the engine
    #[arg(short = 't', long)]
    trace: bool,
    /// Output the result as JSON
    #[arg(long, conflicts_with = "trace")]
    json: bool,
    /// Refuse to run when the facts already contradict the rules
    #[arg(long)]
    check: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive facts by forward chaining
    ///
    /// Without a goal the rules fire until nothing more can be derived.
    Forward {
        /// Knowledge base file (JSON)
        file: PathBuf,
        /// Stop as soon as this fact holds (format: attribute=value)
        #[arg(short, long, value_parser = parse_goal)]
        goal: Option<Goal>,
        /// Fire every eligible rule per round (breadth) or only the first (depth)
        #[arg(short, long, default_value = "breadth")]
        firing: FiringStrategy,
        /// Conflict resolution ordering
        ///
        /// One of: none, premise-count-asc, premise-count-desc, most-recent-premise, oldest-premise
        #[arg(short, long, default_value = "none")]
        order: OrderingStrategy,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Prove a goal by backward chaining and show the proof tree
    Backward {
        /// Knowledge base file (JSON)
        file: PathBuf,
        /// Goal to prove (format: attribute=value)
        #[arg(short, long, value_parser = parse_goal)]
        goal: Goal,
        /// Order in which candidate rules are tried
        #[arg(short, long, default_value = "none")]
        order: OrderingStrategy,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Layer rules by dependency and fire the groups in order
    Groups {
        /// Knowledge base file (JSON)
        file: PathBuf,
        /// Stop after the first group that makes this fact hold
        #[arg(short, long, value_parser = parse_goal)]
        goal: Option<Goal>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check the rules, and the facts against the rules, for incoherence
    ///
    /// Rule conflicts are advisory. A fact contradicted by the rules makes the command fail.
    Check {
        /// Knowledge base file (JSON)
        file: PathBuf,
        /// Also report conflicts between derivations that only can hold together
        #[arg(short, long)]
        strict: bool,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the facts and rules of a knowledge base
    Show {
        /// Knowledge base file (JSON)
        file: PathBuf,
    },
    /// Choose the algorithm, strategies and goal through prompts
    Interactive {
        /// Knowledge base file (JSON), asked for when omitted
        file: Option<PathBuf>,
    },
}

/// What to run on a loaded knowledge base
pub enum Request {
    Forward {
        goal: Option<Goal>,
        firing: FiringStrategy,
        ordering: OrderingStrategy,
    },
    Backward {
        goal: Goal,
        ordering: OrderingStrategy,
    },
    Groups {
        goal: Option<Goal>,
    },
    Check {
        strictness: Strictness,
    },
}

/// How a request is run and presented
#[derive(Default)]
pub struct RunOptions {
    pub trace: bool,
    pub json: bool,
    pub check_facts: bool,
}

impl From<&OutputArgs> for RunOptions {
    fn from(args: &OutputArgs) -> Self {
        Self {
            trace: args.trace,
            json: args.json,
            check_facts: args.check,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Forward {
            file,
            goal,
            firing,
            order,
            output,
        } => run_file(
            &file,
            Request::Forward {
                goal,
                firing,
                ordering: order,
            },
            (&output).into(),
        ),
        Commands::Backward {
            file,
            goal,
            order,
            output,
        } => run_file(
            &file,
            Request::Backward {
                goal,
                ordering: order,
            },
            (&output).into(),
        ),
        Commands::Groups { file, goal, output } => {
            run_file(&file, Request::Groups { goal }, (&output).into())
        }
        Commands::Check { file, strict, json } => {
            let strictness = if strict {
                Strictness::Compatible
            } else {
                Strictness::Subsumption
            };
            run_file(
                &file,
                Request::Check { strictness },
                RunOptions {
                    json,
                    ..RunOptions::default()
                },
            )
        }
        Commands::Show { file } => show_command(&file),
        Commands::Interactive { file } => interactive_command(file),
    };

    if let Err(e) = result {
        if let Some(sourced) = e.downcast_ref::<SourcedError>() {
            eprintln!(
                "{}",
                error_formatter::format_error(&sourced.error, Some(sourced.source_text.as_str()))
            );
        } else if let Some(engine_err) = e.downcast_ref::<EngineError>() {
            eprintln!("{}", error_formatter::format_error(engine_err, None));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run_file(path: &Path, request: Request, options: RunOptions) -> Result<()> {
    let engine = load_engine(path)?;
    run_request(engine, request, &options)
}

/// Run one request and print its result on stdout
pub fn run_request(mut engine: Engine, request: Request, options: &RunOptions) -> Result<()> {
    let formatter = Formatter::default();
    let mut tracer = |event: &TraceEvent<'_>| {
        if options.trace {
            println!("{}", formatter.format_event(event));
        }
    };
    engine.config_mut().check_facts_first = options.check_facts;

    match request {
        Request::Forward {
            goal,
            firing,
            ordering,
        } => {
            let config = engine
                .config()
                .clone()
                .with_firing(firing)
                .with_ordering(ordering);
            *engine.config_mut() = config;
            let outcome = engine.forward_traced(goal.as_ref(), &mut tracer)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!(
                    "{}",
                    formatter.format_forward(&outcome, engine.facts(), goal.as_ref())
                );
            }
        }
        Request::Backward { goal, ordering } => {
            engine.config_mut().ordering = ordering;
            let (provable, proof) = engine.backward_traced(&goal, &mut tracer)?;
            if options.json {
                let value = serde_json::json!({ "provable": provable, "proof": proof });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", formatter.format_proof(&proof));
            }
        }
        Request::Groups { goal } => {
            let outcome = engine.grouped_traced(goal.as_ref(), &mut tracer)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!(
                    "{}",
                    formatter.format_grouped(&outcome, engine.facts(), goal.as_ref())
                );
            }
        }
        Request::Check { strictness } => {
            engine.config_mut().strictness = strictness;
            let report = engine.check_rules();
            let fact_incoherence = engine.check_facts();
            if options.json {
                let value = serde_json::json!({ "rules": report, "facts": fact_incoherence });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!(
                    "{}",
                    formatter.format_check(&report, fact_incoherence.as_ref())
                );
            }
            if let Some(found) = fact_incoherence {
                return Err(EngineError::from(found).into());
            }
        }
    }

    Ok(())
}

fn show_command(path: &Path) -> Result<()> {
    let engine = load_engine(path)?;
    let formatter = Formatter::default();
    print!("{}", formatter.format_knowledge(engine.knowledge()));
    Ok(())
}

fn interactive_command(file: Option<PathBuf>) -> Result<()> {
    let path = match file {
        Some(path) => path,
        None => interactive::prompt_file()?,
    };
    let engine = load_engine(&path)?;
    let (request, options) = interactive::run_interactive(&engine)?;
    run_request(engine, request, &options)
}

/// Read and decode a knowledge base, keeping the text for error reports
fn load_engine(path: &Path) -> Result<Engine> {
    let source_id = path.display().to_string();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read knowledge base '{}'", source_id))?;

    let knowledge = chaining::load_json(&text, &source_id).map_err(|error| SourcedError {
        error,
        source_text: text.clone(),
    })?;
    debug!(
        source = %source_id,
        rules = knowledge.rules.len(),
        facts = knowledge.facts.len(),
        "loaded"
    );

    Ok(Engine::with_config(knowledge, EngineConfig::default()))
}

/// Parse "attribute=value" into a goal
pub fn parse_goal(input: &str) -> Result<Goal, String> {
    let Some((attribute, value)) = input.split_once('=') else {
        return Err(format!("expected attribute=value, got '{}'", input));
    };
    let (attribute, value) = (attribute.trim(), value.trim());
    if attribute.is_empty() || value.is_empty() {
        return Err(format!("expected attribute=value, got '{}'", input));
    }
    Ok(Goal::new(attribute, value))
}

/// Goal entered at a prompt, empty means none
pub fn parse_optional_goal(input: &str) -> Result<Option<Goal>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match parse_goal(input) {
        Ok(goal) => Ok(Some(goal)),
        Err(message) => bail!(message),
    }
}
