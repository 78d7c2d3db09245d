//! Account CRUD request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ACCOUNT_TAG;
use crate::api::dto::{
    AccountListQuery, AccountResponse, ApiResponse, CreateAccountRequest, ErrorResponse,
    UpdateAccountRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{JsonBody, QueryParams};

/// Routes:
/// - GET /accounts          - List accounts
/// - POST /accounts         - Create account
/// - GET /accounts/{id}     - Get account
/// - PATCH /accounts/{id}   - Update account
/// - DELETE /accounts/{id}  - Delete account
pub fn account_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_accounts, create_account))
        .routes(routes!(get_account, update_account, delete_account))
}

/// POST /api/accounts - Create account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = ACCOUNT_TAG,
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    )
)]
async fn create_account(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateAccountRequest>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let account = state.services.accounts.create(payload.into()).await?;
    Ok(ApiResponse::created(account.into()))
}

/// GET /api/accounts - List accounts
///
/// Filters match case-insensitive substrings; empty filters are ignored.
#[utoipa::path(
    get,
    path = "/accounts",
    tag = ACCOUNT_TAG,
    params(AccountListQuery),
    responses(
        (status = 200, description = "One page of accounts", body = ApiResponse<Vec<AccountResponse>>)
    )
)]
async fn list_accounts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AccountListQuery>,
) -> AppResult<ApiResponse<Vec<AccountResponse>>> {
    let page = state
        .services
        .accounts
        .list(&query.filter(), query.page, query.limit)
        .await?;
    Ok(ApiResponse::paged(page, AccountResponse::from))
}

/// GET /api/accounts/{id} - Get account
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let account = state.services.accounts.get(&id).await?;
    Ok(ApiResponse::ok(account.into()))
}

/// PATCH /api/accounts/{id} - Update account
///
/// Only the fields present in the body are written.
#[utoipa::path(
    patch,
    path = "/accounts/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = String, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    )
)]
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateAccountRequest>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let account = state.services.accounts.update(&id, payload.into()).await?;
    Ok(ApiResponse::ok(account.into()))
}

/// DELETE /api/accounts/{id} - Delete account
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = ACCOUNT_TAG,
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.accounts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::test_support::TestApp;
    use crate::models::AccountFilter;
    use axum::http::StatusCode;
    use serde_json::json;

    fn ada() -> serde_json::Value {
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "5550001",
            "password": "correct-horse"
        })
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let app = TestApp::new();
        let (status, created) = app.post("/api/accounts", ada()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], 201);
        assert!(created["data"].get("password").is_none());
        assert!(created.get("meta").is_none());

        let id = created["data"]["id"].as_str().unwrap();
        let (status, fetched) = app.get(&format!("/api/accounts/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        let app = TestApp::new();
        let (status, err) = app
            .post("/api/accounts", json!({"first_name": "Ada"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_ERROR");
        assert!(err["request_id"].is_string());
        assert_eq!(app.services().accounts.count(&AccountFilter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let app = TestApp::new();
        let (status, err) = app.post_raw("/api/accounts", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = TestApp::new();
        app.post("/api/accounts", ada()).await;

        let mut twin = ada();
        twin["phone"] = json!("5550002");
        let (status, err) = app.post("/api/accounts", twin).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["code"], "DUPLICATE_ENTRY");
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let app = TestApp::new();
        app.post("/api/accounts", ada()).await;

        let (status, list) = app.get("/api/accounts?first_name=ad&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["data"].as_array().unwrap().len(), 1);
        assert_eq!(list["meta"]["per_page"], 5);
        assert_eq!(list["meta"]["total_count"], 1);

        let (_, none) = app.get("/api/accounts?email=nobody").await;
        assert_eq!(none["data"], json!([]));
        assert_eq!(none["meta"]["page_count"], 0);
        assert_eq!(none["meta"]["page"], 1);
    }

    #[tokio::test]
    async fn test_patch_then_delete_twice() {
        let app = TestApp::new();
        let (_, created) = app.post("/api/accounts", ada()).await;
        let uri = format!("/api/accounts/{}", created["data"]["id"].as_str().unwrap());

        let (status, updated) = app.patch(&uri, json!({"first_name": "Augusta"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["first_name"], "Augusta");
        assert_eq!(updated["data"]["last_name"], "Lovelace");

        let (status, _) = app.delete(&uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, err) = app.delete(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (status, err) = TestApp::new().get("/api/accounts/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["status"], 404);
    }
}
