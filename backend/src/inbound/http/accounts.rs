//! Account API handlers.
//!
//! ```text
//! GET    /api/v1/accounts
//! POST   /api/v1/accounts {"email":"a@x.com","username":"alice","nickname":"Al","password":"p"}
//! POST   /api/v1/login {"email":"a@x.com","password":"p"}
//! PUT    /api/v1/accounts/{id}
//! DELETE /api/v1/accounts/{id}
//! ```

use std::collections::BTreeSet;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AccountSummary;
use crate::domain::{
    AccountId, AccountValidationError, CreateAccountRequest, Email, Error, LoginCredentials,
    Nickname, Profile, ProfileReplacement, Role, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    account_validation_error, login_validation_error, registration_validation_error,
};

/// Public listing entry: email and nickname only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountSummaryBody {
    /// Account email.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
}

impl From<AccountSummary> for AccountSummaryBody {
    fn from(value: AccountSummary) -> Self {
        Self {
            email: value.email.into(),
            nickname: value.nickname.into(),
        }
    }
}

/// Request body for `POST /api/v1/accounts`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountBody {
    /// Unique email address.
    pub email: String,
    /// Unique username.
    pub username: String,
    /// Display nickname.
    pub nickname: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Requested roles such as `USER` or `ADMIN`; empty means `USER`.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TryFrom<CreateAccountBody> for CreateAccountRequest {
    type Error = Error;

    fn try_from(value: CreateAccountBody) -> Result<Self, Self::Error> {
        let roles = value
            .roles
            .iter()
            .map(|raw| raw.parse::<Role>())
            .collect::<Result<BTreeSet<Role>, _>>()
            .map_err(|err| account_validation_error(&err))?;
        Self::try_from_parts(
            &value.email,
            &value.username,
            &value.nickname,
            &value.password,
            roles,
        )
        .map_err(|err| registration_validation_error(&err))
    }
}

/// Request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"email":"a@x.com","password":"p"}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginBody {
    /// Registered email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Full profile replacement for `PUT /api/v1/accounts/{id}`.
///
/// Every field is written; omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateAccountBody {
    /// New username.
    pub username: String,
    /// New nickname.
    pub nickname: String,
    /// New email address.
    pub email: String,
    /// Personal website.
    #[serde(default)]
    pub website: Option<String>,
    /// Short self description.
    #[serde(default)]
    pub description: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Option<String>,
}

impl TryFrom<UpdateAccountBody> for ProfileReplacement {
    type Error = Error;

    fn try_from(value: UpdateAccountBody) -> Result<Self, Self::Error> {
        let map = |err: AccountValidationError| account_validation_error(&err);
        Ok(Self {
            username: Username::new(value.username).map_err(map)?,
            nickname: Nickname::new(value.nickname).map_err(map)?,
            email: Email::new(value.email).map_err(map)?,
            profile: Profile::new(value.website, value.description, value.phone, value.gender)
                .map_err(map)?,
        })
    }
}

/// Identifier returned by create and login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountIdBody {
    /// Store-assigned identifier.
    pub id: i64,
}

impl From<AccountId> for AccountIdBody {
    fn from(value: AccountId) -> Self {
        Self { id: value.get() }
    }
}

fn parse_id(raw: i64) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|err| account_validation_error(&err))
}

/// List the email and nickname of every listed account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use account_backend::inbound::http::accounts::list_accounts;
///
/// let app = App::new().service(list_accounts);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Accounts", body = [AccountSummaryBody]),
        (status = 503, description = "Account store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "listAccounts"
)]
#[get("/accounts")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AccountSummaryBody>>> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(web::Json(
        accounts.into_iter().map(AccountSummaryBody::from).collect(),
    ))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountBody,
    responses(
        (status = 201, description = "Account created", body = AccountIdBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Json<CreateAccountBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateAccountRequest::try_from(payload.into_inner())?;
    let id = state.commands.create_account(request).await?;
    Ok(HttpResponse::Created().json(AccountIdBody::from(id)))
}

/// Authenticate by email and password and record the account in the session.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountIdBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Password mismatch", body = Error),
        (status = 404, description = "Email not registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<AccountIdBody>> {
    let LoginBody { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| login_validation_error(&err))?;
    let id = state.login.login(&credentials, &session).await?;
    Ok(web::Json(AccountIdBody::from(id)))
}

/// Overwrite the profile of an active account.
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    request_body = UpdateAccountBody,
    responses(
        (status = 204, description = "Account updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No active account with this id", body = Error),
        (status = 409, description = "Email or username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "updateAccount"
)]
#[put("/accounts/{id}")]
pub async fn update_account(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateAccountBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(path.into_inner())?;
    let replacement = ProfileReplacement::try_from(payload.into_inner())?;
    state.commands.update_account(id, replacement).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete an active account.
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No active account with this id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccount"
)]
#[delete("/accounts/{id}")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(path.into_inner())?;
    state.commands.delete_account(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
