mod demo;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cmdtree_core::{Model, Node, ProgramSettings, outline};
use cmdtree_engine::Program;
use tracing::debug;

/// Output format for the model outline.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutlineFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Run and inspect the sample command tree")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the sample program with the arguments after `--`.
    Run(RunArgs),
    /// Print help for a group or command of the sample program.
    Help(HelpArgs),
    /// Export the sample program's command tree.
    Outline(OutlineArgs),
    /// Validate the sample program's command tree.
    Check,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Settings file (.json, .yaml or .yml) with exit codes and help options.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Arguments handed to the sample program.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Group and command names leading to the node, e.g. `remote add`.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct OutlineArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutlineFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run_program(args),
        Command::Help(args) => run_help(args),
        Command::Outline(args) => run_outline(args),
        Command::Check => run_check(),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn load_model() -> Result<Model, String> {
    demo::model().map_err(|err| format!("Invalid command tree: {err}"))
}

fn run_program(args: RunArgs) -> Result<i32, String> {
    let settings = match &args.settings {
        Some(path) => ProgramSettings::load(path).map_err(|err| {
            format!("Failed to load settings '{}': {err}", path.display())
        })?,
        None => ProgramSettings::default(),
    };
    debug!(?settings, args = ?args.args, "Running sample program");

    let program = Program::new(load_model()?).with_settings(settings);
    program.run(args.args).map_err(|err| err.to_string())
}

fn run_help(args: HelpArgs) -> Result<i32, String> {
    let model = load_model()?;
    let node = find_node(&model, &args.path)?;
    let program = Program::new(model);
    print!("{}", program.help(node));
    Ok(0)
}

/// Walks group names from the root; only the last name may be a command.
fn find_node(model: &Model, path: &[String]) -> Result<Node, String> {
    let mut group = model.root();
    for (i, name) in path.iter().enumerate() {
        if let Some(child) = model.find_group(group, name) {
            group = child;
            continue;
        }
        match model.find_command(group, name) {
            Some(cmd) if i + 1 == path.len() => return Ok(Node::Command(cmd)),
            Some(_) => {
                return Err(format!("'{name}' is a command and has no subcommands"));
            }
            None => {
                return Err(format!(
                    "No group or command named '{name}' in '{}'",
                    model.group(group).id
                ));
            }
        }
    }
    Ok(Node::Group(group))
}

fn run_outline(args: OutlineArgs) -> Result<i32, String> {
    let model = load_model()?;
    let tree = outline(&model);
    let rendered = match args.format {
        OutlineFormat::Json => serde_json::to_string_pretty(&tree)
            .map_err(|err| format!("Failed to serialize outline: {err}"))?,
        OutlineFormat::Yaml => serde_yaml::to_string(&tree)
            .map_err(|err| format!("Failed to serialize outline: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(0)
}

fn run_check() -> Result<i32, String> {
    let model = load_model()?;
    println!(
        "ok: {} groups, {} commands",
        model.group_ids().count(),
        model.command_ids().count()
    );
    Ok(0)
}
