use clap::Args;
use jiff::Timestamp;
use passgate_app::domain::{
    cache::VERIFICATION_CACHE_TTL,
    passes::{data::RevokePass, records::PassUuid},
    users::UserUuid,
};
use uuid::Uuid;

use super::{ConnectionArgs, print_pass};

#[derive(Debug, Args)]
pub(crate) struct RevokePassArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Pass to revoke
    #[arg(long)]
    pass_uuid: Uuid,

    /// Staff member revoking the pass
    #[arg(long)]
    revoked_by: Uuid,

    /// Why the pass is being revoked
    #[arg(long)]
    reason: String,
}

pub(crate) async fn run(args: RevokePassArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let pass = context
        .passes
        .revoke_pass(
            PassUuid::from_uuid(args.pass_uuid),
            RevokePass {
                revoked_by: UserUuid::from_uuid(args.revoked_by),
                reason: args.reason,
            },
            Timestamp::now(),
        )
        .await
        .map_err(|error| format!("failed to revoke pass: {error}"))?;

    print_pass(&pass);
    println!(
        "running servers may accept cached copies of this pass for up to {} minutes; \
         revoke through the API for immediate effect",
        VERIFICATION_CACHE_TTL.as_secs() / 60
    );

    Ok(())
}
