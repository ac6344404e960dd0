use clap::{Parser, Subcommand};
use mercury::MercuryConfig;
use mercury::commands::{self, compile, repl, run, translate};
use tracing_subscriber::EnvFilter;

/// Compile and run Mercury scripts.
#[derive(Parser)]
#[command(name = "mercury", version, about)]
struct Cli {
    /// Enable debug logging (overrides MERCURY_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate Mercury files into sibling .py files
    Compile(compile::CompileArgs),
    /// Translate a Mercury file to stdout or a file
    Translate(translate::TranslateArgs),
    /// Translate a Mercury file and execute it
    Run(run::RunArgs),
    /// Start an interactive session
    Repl,
}

/// Log to stderr. `MERCURY_LOG` takes an env-filter directive; default `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MERCURY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let config = MercuryConfig::load(&root);
    let translator = commands::translator(&config);

    let code = match cli.command {
        Command::Compile(args) => compile::run(args, &translator),
        Command::Translate(args) => translate::run(args, &translator),
        Command::Run(args) => run::run(args, &translator, &config),
        Command::Repl => repl::run(&translator, &config),
    };
    std::process::exit(code);
}
