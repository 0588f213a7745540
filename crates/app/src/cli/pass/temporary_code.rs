use clap::Args;
use jiff::{SignedDuration, Timestamp};
use passgate_app::domain::passes::records::PassUuid;
use uuid::Uuid;

use super::ConnectionArgs;

#[derive(Debug, Args)]
pub(crate) struct TemporaryCodeArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Pass the code stands in for
    #[arg(long)]
    pass_uuid: Uuid,

    /// Minutes until the code stops working (at most 1440)
    #[arg(long, default_value_t = 15)]
    valid_minutes: u32,
}

pub(crate) async fn run(args: TemporaryCodeArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let code = context
        .passes
        .issue_temporary_code(
            PassUuid::from_uuid(args.pass_uuid),
            SignedDuration::from_mins(i64::from(args.valid_minutes)),
            Timestamp::now(),
        )
        .await
        .map_err(|error| format!("failed to issue temporary code: {error}"))?;

    println!("pass_uuid: {}", code.pass_uuid);
    println!("expires_at: {}", code.expires_at);
    println!("qr_code: {}", code.qr_code);

    Ok(())
}
