use std::fmt;

use clap::{Args, Subcommand};
use passgate_app::{
    context::AppContext,
    domain::{passes::records::PassRecord, qr::SigningSecret},
};

mod issue;
mod refresh;
mod revoke;
mod show;
mod temporary_code;

#[derive(Debug, Args)]
pub(crate) struct PassCommand {
    #[command(subcommand)]
    command: PassSubcommand,
}

#[derive(Debug, Subcommand)]
enum PassSubcommand {
    Issue(issue::IssuePassArgs),
    Revoke(revoke::RevokePassArgs),
    TemporaryCode(temporary_code::TemporaryCodeArgs),
    Refresh(refresh::RefreshPassArgs),
    Show(show::ShowPassArgs),
}

pub(crate) async fn run(command: PassCommand) -> Result<(), String> {
    match command.command {
        PassSubcommand::Issue(args) => issue::run(args).await,
        PassSubcommand::Revoke(args) => revoke::run(args).await,
        PassSubcommand::TemporaryCode(args) => temporary_code::run(args).await,
        PassSubcommand::Refresh(args) => refresh::run(args).await,
        PassSubcommand::Show(args) => show::run(args).await,
    }
}

#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Hex HMAC key used to sign pass QR codes
    #[arg(long, env = "QR_SIGNING_SECRET", hide_env_values = true)]
    qr_signing_secret: String,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs").finish_non_exhaustive()
    }
}

impl ConnectionArgs {
    pub(crate) async fn context(self) -> Result<AppContext, String> {
        let secret = SigningSecret::try_from(self.qr_signing_secret)
            .map_err(|error| format!("invalid QR_SIGNING_SECRET: {error}"))?;

        AppContext::from_database_url(&self.database_url, secret)
            .await
            .map_err(|error| error.to_string())
    }
}

pub(crate) fn print_pass(pass: &PassRecord) {
    println!("pass_uuid: {}", pass.uuid);
    println!("pass_number: {}", pass.pass_number);
    println!("student_uuid: {}", pass.student_uuid);
    println!("school_uuid: {}", pass.school_uuid);
    println!("pass_type: {}", pass.pass_type);
    println!("status: {}", pass.status);
    println!("issued_at: {}", pass.issued_at);
    println!("expires_at: {}", pass.expires_at);
    if let Some(revoked_at) = pass.revoked_at {
        println!("revoked_at: {revoked_at}");
    }
    if let Some(reason) = &pass.revocation_reason {
        println!("revocation_reason: {reason}");
    }
    println!("qr_code: {}", pass.qr_code);
}
