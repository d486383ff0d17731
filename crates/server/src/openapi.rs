use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Account as returned by every read and write endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AccountDoc {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

/// Create/update body. `id` is accepted but ignored.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AccountPayloadDoc {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::accounts::list,
        crate::routes::accounts::get,
        crate::routes::accounts::create,
        crate::routes::accounts::update,
        crate::routes::accounts::delete,
        crate::routes::accounts::search,
    ),
    components(
        schemas(
            HealthResponse,
            AccountDoc,
            AccountPayloadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "accounts")
    )
)]
pub struct ApiDoc;
