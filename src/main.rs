use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use obograph::construct::RelationTypeId;
use obograph::ontology::{Ontology, TermView};
use obograph::settings::Settings;

/// Load an OBO ontology, close it under its transitive relation types and query it
#[derive(Parser, Debug)]
#[command(name = "obograph")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a settings file (defaults to ./obograph.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the transitive closure
    #[arg(long)]
    no_close: bool,

    /// The OBO document to load
    obo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count terms, relation types and facts
    Stats,
    /// Show a term with its parents and outgoing relations
    Term {
        /// Prefixed term id, such as GO:0000001
        id: String,
    },
    /// List the terms a term reaches through a relation type
    Related {
        id: String,
        relation: String,
    },
    /// Check whether a fact holds, exiting with 1 when it does not
    Check {
        subject: String,
        relation: String,
        object: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("obograph: {e}");
            return ExitCode::from(2);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args, &settings) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "obograph failed");
            eprintln!("obograph: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args, settings: &Settings) -> obograph::Result<ExitCode> {
    let mut options = settings.ontology_options();
    if args.no_close {
        options.close = false;
    }
    let ontology = Ontology::load_path(&args.obo, options)?;

    match &args.command {
        Command::Stats => {
            println!("terms:          {}", ontology.term_count());
            println!("relation types: {}", ontology.relation_type_count());
            println!("facts:          {}", ontology.fact_count());
            match ontology.closure() {
                Some(closure) => println!(
                    "closure:        {} derived in {} passes{}",
                    closure.derived,
                    closure.passes,
                    if closure.converged { "" } else { " (stopped early)" }
                ),
                None => println!("closure:        not run"),
            }
        }
        Command::Term { id } => {
            let id = ontology.parse_term_id(id)?;
            let Some(term) = ontology.find_term(id) else {
                println!("{} not found", ontology.format_term_id(id));
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", describe(&term));
            if let Some(namespace) = term.namespace() {
                println!("  namespace: {namespace}");
            }
            let mut parents: Vec<_> = term.parents().collect();
            parents.sort_by_key(|parent| parent.id());
            for parent in parents {
                println!("  is_a {}", describe(&parent));
            }
            let mut relations: Vec<_> = term.relations().collect();
            relations.sort_by(|a, b| (a.0.id(), a.1.id()).cmp(&(b.0.id(), b.1.id())));
            for (relation, object) in relations {
                println!("  {relation} {}", describe(&object));
            }
        }
        Command::Related { id, relation } => {
            let id = ontology.parse_term_id(id)?;
            let relation = RelationTypeId::new(relation.as_str());
            if let Some(term) = ontology.find_term(id) {
                let mut related: Vec<_> = term.related_objects(&relation).collect();
                related.sort_by_key(|object| object.id());
                for object in related {
                    println!("{}", describe(&object));
                }
            }
        }
        Command::Check { subject, relation, object } => {
            let subject = ontology.parse_term_id(subject)?;
            let object = ontology.parse_term_id(object)?;
            let holds = ontology.contains_fact(&subject, &RelationTypeId::new(relation.as_str()), &object);
            println!("{holds}");
            if !holds {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(term: &TermView) -> String {
    match term.name() {
        Some(name) => format!("{term} {name}"),
        None => term.to_string(),
    }
}
