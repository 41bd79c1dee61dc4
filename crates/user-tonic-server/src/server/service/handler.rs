//! gRPC service implementation for user records.
//!
//! This module defines [`UserRpcHandler`], the concrete implementation of the
//! `user.UserService` gRPC service. Every RPC is unary and follows the same
//! shape:
//!
//! 1. Validate the request's primitive fields. The first failing rule is
//!    returned as `INVALID_ARGUMENT` and nothing else happens.
//! 2. Call [`UserService`].
//! 3. Map the result: absence becomes `NOT_FOUND` (get/update only), any
//!    service failure becomes `INTERNAL`, and domain users are converted to
//!    [`UserResponse`].

use crate::server::{
    service::convert::{list_users_response, user_response},
    telemetry::{increment_errors, increment_requests, record_request_duration},
    users::UserService,
};
use std::time::Instant;
use tonic::{Request, Response, Status};
use user_tonic_core::{
    Error, Result,
    proto::{
        CreateUserRequest, DeleteUserRequest, DeleteUserResponse, GetUserRequest,
        ListUsersRequest, ListUsersResponse, UpdateUserRequest, UserResponse,
        user_service_server::UserService as UserServiceRpc,
    },
    types::{MAX_AGE, MIN_AGE, UserId},
};

const DELETED: &str = "User deleted successfully";
const NOT_DELETED: &str = "User not found";

/// gRPC entry point for `user.UserService`.
///
/// Holds no state of its own beyond the shared [`UserService`]; clones are
/// interchangeable.
#[derive(Clone)]
pub struct UserRpcHandler {
    users: UserService,
}

impl UserRpcHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    /// Releases the underlying gateway. Called once during shutdown.
    pub async fn shutdown(&self) {
        self.users.close().await;
    }

    async fn fetch(&self, req: GetUserRequest) -> Result<UserResponse> {
        let id = validate_id(req.id)?;
        let user = self
            .users
            .get_user_by_id(id)
            .await
            .map_err(internal)?
            .ok_or(Error::NotFound { id })?;
        Ok(user_response(&user))
    }

    async fn create(&self, req: CreateUserRequest) -> Result<UserResponse> {
        if req.name.is_empty() {
            return Err(Error::invalid_argument("Name is required"));
        }
        if req.email.is_empty() {
            return Err(Error::invalid_argument("Email is required"));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&req.age) {
            return Err(Error::invalid_argument(format!(
                "Age must be between {MIN_AGE} and {MAX_AGE}"
            )));
        }

        let user = self
            .users
            .create_user(req.name, req.email, Some(req.age))
            .await
            .map_err(internal)?;
        Ok(user_response(&user))
    }

    async fn update(&self, req: UpdateUserRequest) -> Result<UserResponse> {
        let id = validate_id(req.id)?;
        // Proto3 cannot tell 0 from "not sent", so non-positive means
        // "leave the age alone".
        let age = (req.age > 0).then_some(req.age);

        let user = self
            .users
            .update_user(id, req.name, req.email, age)
            .await
            .map_err(internal)?
            .ok_or(Error::NotFound { id })?;
        Ok(user_response(&user))
    }

    async fn delete(&self, req: DeleteUserRequest) -> Result<DeleteUserResponse> {
        let id = validate_id(req.id)?;
        let deleted = self.users.delete_user(id).await.map_err(internal)?;
        Ok(DeleteUserResponse {
            success: deleted,
            message: if deleted { DELETED } else { NOT_DELETED }.to_string(),
        })
    }

    async fn list(&self, req: ListUsersRequest) -> Result<ListUsersResponse> {
        let page = self
            .users
            .list_users(req.page, req.size)
            .await
            .map_err(internal)?;
        Ok(list_users_response(&page))
    }
}

fn validate_id(id: i64) -> Result<UserId> {
    if id <= 0 {
        return Err(Error::invalid_argument("User ID must be positive"));
    }
    Ok(id)
}

fn internal(err: anyhow::Error) -> Error {
    Error::Internal {
        message: err.to_string(),
    }
}

/// Records telemetry for a finished RPC and converts it to its wire result.
fn finish<T>(
    method: &'static str,
    start: Instant,
    result: Result<T>,
) -> core::result::Result<Response<T>, Status> {
    increment_requests(method);
    record_request_duration(method, start.elapsed().as_secs_f64() * 1000.0);
    match result {
        Ok(message) => Ok(Response::new(message)),
        Err(err) => {
            increment_errors(method, err.code());
            match &err {
                Error::Internal { .. } => tracing::error!(method, error = %err, "request failed"),
                _ => tracing::debug!(method, error = %err, "request rejected"),
            }
            Err(err.into())
        }
    }
}

#[tonic::async_trait]
impl UserServiceRpc for UserRpcHandler {
    #[tracing::instrument(skip_all, fields(id = req.get_ref().id))]
    async fn get_user(
        &self,
        req: Request<GetUserRequest>,
    ) -> core::result::Result<Response<UserResponse>, Status> {
        let start = Instant::now();
        let result = self.fetch(req.into_inner()).await;
        finish("GetUser", start, result)
    }

    #[tracing::instrument(skip_all)]
    async fn create_user(
        &self,
        req: Request<CreateUserRequest>,
    ) -> core::result::Result<Response<UserResponse>, Status> {
        let start = Instant::now();
        let result = self.create(req.into_inner()).await;
        if let Ok(user) = &result {
            tracing::info!(id = user.id, "user created");
        }
        finish("CreateUser", start, result)
    }

    #[tracing::instrument(skip_all, fields(id = req.get_ref().id))]
    async fn update_user(
        &self,
        req: Request<UpdateUserRequest>,
    ) -> core::result::Result<Response<UserResponse>, Status> {
        let start = Instant::now();
        let result = self.update(req.into_inner()).await;
        finish("UpdateUser", start, result)
    }

    #[tracing::instrument(skip_all, fields(id = req.get_ref().id))]
    async fn delete_user(
        &self,
        req: Request<DeleteUserRequest>,
    ) -> core::result::Result<Response<DeleteUserResponse>, Status> {
        let start = Instant::now();
        let result = self.delete(req.into_inner()).await;
        if let Ok(DeleteUserResponse { success: true, .. }) = &result {
            tracing::info!("user deleted");
        }
        finish("DeleteUser", start, result)
    }

    #[tracing::instrument(skip_all, fields(page = req.get_ref().page, size = req.get_ref().size))]
    async fn list_users(
        &self,
        req: Request<ListUsersRequest>,
    ) -> core::result::Result<Response<ListUsersResponse>, Status> {
        let start = Instant::now();
        let result = self.list(req.into_inner()).await;
        finish("ListUsers", start, result)
    }
}
