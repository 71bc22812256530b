use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dashvar_cli::{apply, load_config, CommandError, Dashboard, Operation};
use dashvar_editor::{EditorError, VariableCollectionEditor};
use dashvar_model::VariableKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status for an operation the editor rejected
const EXIT_REJECTED: u8 = 2;

fn dashboard_arg() -> Arg {
    Arg::new("dashboard")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Dashboard file (.json, .yaml or .yml)")
}

fn name_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).required(true).help(help)
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .required(true)
        .value_parser(value_parser!(VariableKind))
        .help("Variable type: query, custom, textbox, constant, datasource, interval, adhoc")
}

fn cli() -> Command {
    Command::new("dashvar")
        .version(dashvar_cli::VERSION)
        .about("Edit the template variables of a dashboard")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Editor configuration (TOML)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Write the result here instead of in place"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("list")
                .about("List variables in display order")
                .arg(dashboard_arg()),
        )
        .subcommand(
            Command::new("kinds")
                .about("List available variable types")
                .arg(dashboard_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Append a new variable of a type")
                .arg(dashboard_arg())
                .arg(kind_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a variable")
                .arg(dashboard_arg())
                .arg(name_arg("name", "Variable to delete")),
        )
        .subcommand(
            Command::new("duplicate")
                .about("Insert a copy of a variable after it")
                .arg(dashboard_arg())
                .arg(name_arg("name", "Variable to copy")),
        )
        .subcommand(
            Command::new("move")
                .about("Move a variable to another position")
                .arg(dashboard_arg())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Current position"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Target position"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a variable")
                .arg(dashboard_arg())
                .arg(name_arg("name", "Variable to rename"))
                .arg(name_arg("new-name", "New name")),
        )
        .subcommand(
            Command::new("change-type")
                .about("Replace a variable with a fresh one of another type")
                .arg(dashboard_arg())
                .arg(name_arg("name", "Variable to convert"))
                .arg(kind_arg()),
        )
        .subcommand(
            Command::new("label")
                .about("Set or clear a variable's label")
                .arg(dashboard_arg())
                .arg(name_arg("name", "Variable to label"))
                .arg(Arg::new("label").help("New label; omit to clear")),
        )
}

fn init_tracing(verbose: bool, log_json: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn string_arg(args: &ArgMatches, id: &str) -> Result<String> {
    args.get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing argument <{id}>"))
}

fn operation(name: &str, args: &ArgMatches) -> Result<Operation> {
    let kind = || {
        args.get_one::<VariableKind>("kind")
            .copied()
            .context("missing argument <kind>")
    };
    Ok(match name {
        "list" => Operation::List,
        "kinds" => Operation::Kinds,
        "add" => Operation::Add(kind()?),
        "delete" => Operation::Delete(string_arg(args, "name")?),
        "duplicate" => Operation::Duplicate(string_arg(args, "name")?),
        "move" => Operation::Move {
            from: *args.get_one::<usize>("from").context("missing --from")?,
            to: *args.get_one::<usize>("to").context("missing --to")?,
        },
        "rename" => Operation::Rename {
            from: string_arg(args, "name")?,
            to: string_arg(args, "new-name")?,
        },
        "change-type" => Operation::ChangeType {
            name: string_arg(args, "name")?,
            kind: kind()?,
        },
        "label" => Operation::SetLabel {
            name: string_arg(args, "name")?,
            label: args.get_one::<String>("label").cloned(),
        },
        other => anyhow::bail!("unknown command '{other}'"),
    })
}

fn run(matches: &ArgMatches) -> Result<()> {
    let Some((command, args)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    let operation = operation(command, args)?;
    let path = args
        .get_one::<PathBuf>("dashboard")
        .context("missing argument <dashboard>")?;
    let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    let mut dashboard = Dashboard::load(path)?;
    let mut editor = VariableCollectionEditor::with_config(dashboard.variables()?, config)?;

    let summary = apply(&mut editor, &operation)?;
    print!("{summary}");
    if !summary.ends_with('\n') {
        println!();
    }

    if operation.is_mutating() && editor.revision() > 0 {
        let target: &Path = args
            .get_one::<PathBuf>("output")
            .map_or(path.as_path(), PathBuf::as_path);
        dashboard.set_variables(editor.list())?;
        dashboard.save(target)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let args = matches.subcommand().map(|(_, args)| args);
    let flag = |id: &str| args.is_some_and(|a| a.get_flag(id));
    init_tracing(flag("verbose"), flag("log-json"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let rejected = err
                .downcast_ref::<CommandError>()
                .is_some_and(CommandError::is_recoverable)
                || err
                    .downcast_ref::<EditorError>()
                    .is_some_and(EditorError::is_recoverable);
            if rejected {
                ExitCode::from(EXIT_REJECTED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
