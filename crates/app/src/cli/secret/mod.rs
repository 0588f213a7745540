use clap::{Args, Subcommand};
use passgate_app::domain::qr::SigningSecret;

#[derive(Debug, Args)]
pub(crate) struct SecretCommand {
    #[command(subcommand)]
    command: SecretSubcommand,
}

#[derive(Debug, Subcommand)]
enum SecretSubcommand {
    /// Print a fresh random QR signing secret
    Generate,
}

pub(crate) fn run(command: SecretCommand) -> Result<(), String> {
    match command.command {
        SecretSubcommand::Generate => {
            println!("QR_SIGNING_SECRET={}", SigningSecret::generate().to_hex());
            println!("store this secret now; every issued code depends on it");

            Ok(())
        }
    }
}
