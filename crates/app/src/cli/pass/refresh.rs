use clap::Args;
use jiff::Timestamp;
use passgate_app::domain::passes::records::PassUuid;
use uuid::Uuid;

use super::{ConnectionArgs, print_pass};

#[derive(Debug, Args)]
pub(crate) struct RefreshPassArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Pass whose QR code should be re-signed
    #[arg(long)]
    pass_uuid: Uuid,
}

pub(crate) async fn run(args: RefreshPassArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let pass = context
        .passes
        .refresh_qr_code(PassUuid::from_uuid(args.pass_uuid), Timestamp::now())
        .await
        .map_err(|error| format!("failed to refresh pass: {error}"))?;

    print_pass(&pass);

    Ok(())
}
