use clap::Args;
use passgate_app::domain::passes::records::PassUuid;
use uuid::Uuid;

use super::{ConnectionArgs, print_pass};

#[derive(Debug, Args)]
pub(crate) struct ShowPassArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[arg(long)]
    pass_uuid: Uuid,
}

pub(crate) async fn run(args: ShowPassArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let pass = context
        .passes
        .get_pass(PassUuid::from_uuid(args.pass_uuid))
        .await
        .map_err(|error| format!("failed to load pass: {error}"))?;

    print_pass(&pass);

    Ok(())
}
