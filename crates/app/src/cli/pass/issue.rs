use clap::Args;
use jiff::Timestamp;
use passgate_app::domain::{
    passes::data::{DEFAULT_PASS_TYPE, NewPass},
    students::records::StudentUuid,
    users::UserUuid,
};
use uuid::Uuid;

use super::{ConnectionArgs, print_pass};

#[derive(Debug, Args)]
pub(crate) struct IssuePassArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Student receiving the pass
    #[arg(long)]
    student_uuid: Uuid,

    /// Staff member issuing the pass
    #[arg(long)]
    issued_by: Uuid,

    /// Pass type label
    #[arg(long, default_value = DEFAULT_PASS_TYPE)]
    pass_type: String,
}

pub(crate) async fn run(args: IssuePassArgs) -> Result<(), String> {
    let context = args.connection.context().await?;

    let pass = context
        .passes
        .issue_pass(
            NewPass {
                student_uuid: StudentUuid::from_uuid(args.student_uuid),
                pass_type: args.pass_type,
                issued_by: UserUuid::from_uuid(args.issued_by),
            },
            Timestamp::now(),
        )
        .await
        .map_err(|error| format!("failed to issue pass: {error}"))?;

    print_pass(&pass);

    Ok(())
}
