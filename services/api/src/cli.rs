use crate::estimate::{run_estimate, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cleanquote::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "CleanQuote",
    about = "Price commercial cleaning quotes and deliver quote notifications",
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
    /// Work with quotes offline
    Quote {
        #[command(subcommand)]
        command: QuoteCommand,
    },
}

#[derive(Subcommand, Debug)]
enum QuoteCommand {
    /// Print the cost breakdown for a property without sending any email
    Estimate(EstimateArgs),
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
        Command::Quote {
            command: QuoteCommand::Estimate(args),
        } => run_estimate(args),
    }
}
