use clap::{Parser, Subcommand};

mod db;
mod pass;
mod secret;

#[derive(Debug, Parser)]
#[command(name = "passgate-app", about = "Passgate CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Pass(pass::PassCommand),
    Secret(secret::SecretCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Pass(command) => pass::run(command).await,
            Commands::Secret(command) => secret::run(command),
            Commands::Db(command) => db::run(command).await,
        }
    }
}
