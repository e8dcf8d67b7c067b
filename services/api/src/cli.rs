use crate::demo::{run_demo, run_next_enrollment, DemoArgs, NextEnrollmentArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gym_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Gym Desk",
    about = "Run the gym front-desk service or exercise its workflows from the command line",
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
    /// Enrollment number utilities
    Enrollment {
        #[command(subcommand)]
        command: EnrollmentCommand,
    },
    /// Run an in-memory walkthrough of registration, issuance and assignment
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum EnrollmentCommand {
    /// Print the identifier the next issuance would produce
    Next(NextEnrollmentArgs),
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
        Command::Enrollment {
            command: EnrollmentCommand::Next(args),
        } => run_next_enrollment(args),
        Command::Demo(args) => run_demo(args),
    }
}
