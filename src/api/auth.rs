use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::app_data::AppData;
use crate::coordinators::{LoginCoordinator, RegistrationCoordinator};
use crate::types::dto::auth::{LoginApiResponse, LoginRequest, RegisterApiResponse, RegisterRequest};

/// Authentication API endpoints
pub struct AuthenticationApi {
    login_coordinator: LoginCoordinator,
    registration_coordinator: RegistrationCoordinator,
}

impl AuthenticationApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            login_coordinator: LoginCoordinator::new(Arc::clone(&app_data)),
            registration_coordinator: RegistrationCoordinator::new(app_data),
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Login and registration
    Authentication,
}

#[OpenApi(prefix_path = "/authentication")]
impl AuthenticationApi {
    /// Log in with a username or email address and a password
    ///
    /// Returns 200 with a signed token on success, 401 with the reason otherwise.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> LoginApiResponse {
        self.login_coordinator.authenticate(body.0.into()).await.into()
    }

    /// Register a new account and sign it in
    ///
    /// Returns 200 with a signed token on success, 400 with the reason and any
    /// field errors otherwise.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> RegisterApiResponse {
        self.registration_coordinator.register(body.0.into()).await.into()
    }
}
