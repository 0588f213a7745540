//! App Router

use salvo::Router;

use crate::{access, passes};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("access/verify")
                .post(access::verify::handler)
                .push(Router::with_path("batch").post(access::batch::handler)),
        )
        .push(
            Router::with_path("passes").post(passes::issue::handler).push(
                Router::with_path("{pass}")
                    .get(passes::get::handler)
                    .push(Router::with_path("revoke").post(passes::revoke::handler))
                    .push(Router::with_path("refresh").post(passes::refresh::handler))
                    .push(
                        Router::with_path("temporary-code")
                            .post(passes::temporary_code::handler),
                    )
                    .push(Router::with_path("access-logs").get(passes::access_logs::handler)),
            ),
        )
}
