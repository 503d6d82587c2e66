use crate::{parse_optional_goal, Request, RunOptions};
use anyhow::{Context, Result};
use chaining::{Engine, FiringStrategy, Goal, OrderingStrategy, Strictness};
use inquire::{Confirm, Select, Text};
use std::path::PathBuf;

const FORWARD: &str = "Forward chaining";
const BACKWARD: &str = "Backward chaining";
const GROUPS: &str = "Resolution by rule groups";
const CHECK: &str = "Consistency check";

pub fn prompt_file() -> Result<PathBuf> {
    let path = Text::new("Knowledge base file:")
        .with_help_message("Path to a JSON file with facts and rules")
        .prompt()
        .context("Failed to get knowledge base path")?;
    Ok(PathBuf::from(path.trim()))
}

/// Ask for the algorithm and its settings
pub fn run_interactive(engine: &Engine) -> Result<(Request, RunOptions)> {
    println!(
        "Loaded {} facts and {} rules\n",
        engine.facts().len(),
        engine.rules().len()
    );

    let algorithm = Select::new(
        "Select an algorithm:",
        vec![FORWARD, BACKWARD, GROUPS, CHECK],
    )
    .with_help_message("Use arrow keys to navigate, Enter to select")
    .prompt()
    .context("Failed to get algorithm selection")?;

    if algorithm == CHECK {
        let strict = Confirm::new("Also flag derivations that can only hold together?")
            .with_default(false)
            .prompt()
            .context("Failed to get strictness")?;
        let strictness = if strict {
            Strictness::Compatible
        } else {
            Strictness::Subsumption
        };
        return Ok((Request::Check { strictness }, RunOptions::default()));
    }

    let check_facts = Confirm::new("Check the facts against the rules first?")
        .with_default(true)
        .prompt()
        .context("Failed to get fact check choice")?;
    let trace = Confirm::new("Show a trace of the run?")
        .with_default(false)
        .prompt()
        .context("Failed to get trace choice")?;
    let options = RunOptions {
        trace,
        json: false,
        check_facts,
    };

    let request = match algorithm {
        FORWARD => Request::Forward {
            goal: prompt_optional_goal()?,
            firing: select_firing()?,
            ordering: select_ordering()?,
        },
        BACKWARD => Request::Backward {
            goal: prompt_goal()?,
            ordering: select_ordering()?,
        },
        _ => Request::Groups {
            goal: prompt_optional_goal()?,
        },
    };

    Ok((request, options))
}

fn prompt_optional_goal() -> Result<Option<Goal>> {
    let input = Text::new("Goal (attribute=value):")
        .with_help_message("Leave empty to run until nothing more can be derived")
        .prompt()
        .context("Failed to get goal")?;
    parse_optional_goal(&input)
}

fn prompt_goal() -> Result<Goal> {
    loop {
        let input = Text::new("Goal to prove (attribute=value):")
            .prompt()
            .context("Failed to get goal")?;
        match parse_optional_goal(&input) {
            Ok(Some(goal)) => return Ok(goal),
            Ok(None) => println!("A goal is required"),
            Err(e) => println!("{}", e),
        }
    }
}

fn select_firing() -> Result<FiringStrategy> {
    let names: Vec<&str> = FiringStrategy::ALL.iter().map(|f| f.name()).collect();
    let selected = Select::new("Firing strategy:", names)
        .with_help_message("breadth fires every eligible rule per round, depth only the first")
        .prompt()
        .context("Failed to get firing strategy")?;
    Ok(selected.parse()?)
}

fn select_ordering() -> Result<OrderingStrategy> {
    let options: Vec<String> = OrderingStrategy::ALL
        .iter()
        .map(|o| format!("{} - {}", o.name(), o.description()))
        .collect();
    let selected = Select::new("Ordering strategy:", options.clone())
        .prompt()
        .context("Failed to get ordering strategy")?;

    let index = options
        .iter()
        .position(|o| o == &selected)
        .context("Failed to find selected ordering")?;
    Ok(OrderingStrategy::ALL[index])
}
