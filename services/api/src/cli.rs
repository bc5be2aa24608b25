use crate::predict::{run_predict, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_eligibility::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Eligibility Service",
    about = "Check housing loan eligibility against a trained classifier",
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
    /// Assess a single application from the command line
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured classifier artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["loan-eligibility-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_model_override() {
        let cli = Cli::try_parse_from([
            "loan-eligibility-api",
            "serve",
            "--port",
            "8080",
            "--model",
            "/srv/models/loan.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.model, Some(PathBuf::from("/srv/models/loan.json")));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn predict_requires_numeric_answers() {
        let result = Cli::try_parse_from([
            "loan-eligibility-api",
            "predict",
            "--gender",
            "Male",
            "--loan-amount-term",
            "many",
        ]);
        assert!(result.is_err());
    }
}
