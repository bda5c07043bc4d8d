mod commands;

use clap::Parser;

pub fn run_from_env() -> i32 {
    init_tracing();
    run(std::env::args().skip(1))
}

pub fn run<I, S>(args: I) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("eri3".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    match Cli::try_parse_from(&full_args) {
        Ok(cli) => match dispatch_parsed(cli.command) {
            Ok(code) => code,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{err}");
                0
            }
            _ => {
                eprintln!("{err}");
                2
            }
        },
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(name = "eri3", about = "Three-center Gaussian repulsion integrals")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Evaluate a job file and print the scattered tensor entries
    Evaluate(commands::EvaluateArgs),
}

fn dispatch_parsed(command: CliCommand) -> anyhow::Result<i32> {
    match command {
        CliCommand::Evaluate(args) => commands::run_evaluate_command(args),
    }
}
