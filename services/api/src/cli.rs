use crate::assess::{run_assess, run_questions, run_stack, AssessArgs, QuestionsArgs, StackArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use persona_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "persona-api",
    about = "Score personality assessments and serve type reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a set of answers and print the resulting report
    Assess(AssessArgs),
    /// Print the cognitive function stack for a type code
    Stack(StackArgs),
    /// List the question battery, optionally one page at a time
    Questions(QuestionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args).await,
        Command::Stack(args) => run_stack(args),
        Command::Questions(args) => run_questions(args),
    }
}
