use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored user as returned by every users endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UserInputDoc {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`; at creation the user must have reached the configured minimum age.
    pub birth_date: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Error body. `error` or `errors` is present depending on the failure.
#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub error: Option<String>,
    pub errors: Option<Vec<String>>,
    /// e.g. `400 Bad Request`
    pub status: String,
    pub message: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::update_all,
        crate::routes::users::delete,
        crate::routes::users::search,
    ),
    components(
        schemas(
            HealthResponse,
            UserDoc,
            UserInputDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
