use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::user::UserService;
use crate::config::Config;
use crate::db::models::user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::validate;

/// JWT Claims used for authentication.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject - User ID
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration timestamp (UNIX TIME)
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt_secret: String,
    jwt_expiry: Duration,
}

impl AuthService {
    pub fn new(users: UserService, config: &Config) -> Self {
        Self {
            users,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry: config.jwt_expiry,
        }
    }

    /// Public sign-up. Admin accounts are only accepted while the store holds
    /// no users at all, which is how the first admin gets bootstrapped.
    pub async fn register(&self, payload: RegisterRequest) -> Result<User, AppError> {
        if payload.role == Role::Admin && self.users.any_users().await? {
            warn!("Refused admin self-registration for {}", payload.email);
            return Err(AppError::Forbidden("admin accounts cannot self-register".into()));
        }

        let user = self
            .users
            .insert(
                payload.role,
                NewUser {
                    email: payload.email,
                    password: payload.password,
                    name: payload.name,
                    phone: payload.phone,
                    department: payload.department,
                    company: payload.company,
                    address: payload.address,
                    ..Default::default()
                },
            )
            .await?;
        info!("Registered {} {}", user.role, user.id);
        Ok(user)
    }

    pub async fn login(&self, payload: LoginRequest) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::Unauthorized("invalid email or password".into());

        let email = validate::email(&payload.email).map_err(|_| invalid())?;
        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Login attempt for unknown email: {email}");
            invalid()
        })?;

        if !verify_password(&payload.password, &user.password_hash)? {
            warn!("Invalid password for {}", user.id);
            return Err(invalid());
        }

        // Deny login if the account is inactive
        if !user.is_active() {
            warn!("Login attempt for inactive account: {}", user.id);
            return Err(AppError::Forbidden("account is inactive".into()));
        }

        let token = self.issue_token(&user)?;
        info!("Login successful for user: {}", user.id);
        Ok(LoginResponse { token, user })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let exp = Utc::now().timestamp() as usize + self.jwt_expiry.as_secs() as usize;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Repositories;
    use crate::error::ErrorKind;
    use crate::db::models::user::{UpdateUser, UserStatus};
    use crate::services::Actor;
    use tokio_test::assert_ok;

    fn services() -> (AuthService, UserService) {
        let config = Config::for_tests("test-secret");
        let users = UserService::new(Repositories::in_memory(), config.bcrypt_cost);
        (AuthService::new(users.clone(), &config), users)
    }

    fn register(email: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "secret1".into(),
            name: "Test".into(),
            role,
            phone: None,
            department: None,
            company: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn first_admin_bootstraps_then_admin_signup_closes() {
        let (auth, _) = services();
        let admin = assert_ok!(auth.register(register("root@agency.io", Role::Admin)).await);
        assert_eq!(admin.role, Role::Admin);

        let err = auth.register(register("second@agency.io", Role::Admin)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_ok!(auth.register(register("client@corp.io", Role::Client)).await);
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let (auth, _) = services();
        let user = assert_ok!(auth.register(register("client@corp.io", Role::Client)).await);

        let response = assert_ok!(
            auth.login(LoginRequest { email: "Client@Corp.io".into(), password: "secret1".into() }).await
        );
        let claims = assert_ok!(auth.verify_token(&response.token));
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Client);

        let err = auth
            .login(LoginRequest { email: "client@corp.io".into(), password: "wrong-password".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn inactive_accounts_cannot_log_in() {
        let (auth, users) = services();
        let admin = assert_ok!(auth.register(register("root@agency.io", Role::Admin)).await);
        let employee = assert_ok!(auth.register(register("dev@agency.io", Role::Employee)).await);
        let patch = UpdateUser { status: Some(UserStatus::Inactive), ..Default::default() };
        assert_ok!(users.update(&Actor::from(&admin), &employee.id, None, patch).await);

        let err = auth
            .login(LoginRequest { email: "dev@agency.io".into(), password: "secret1".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let (auth, _) = services();
        let other = AuthService::new(
            UserService::new(Repositories::in_memory(), 4),
            &Config::for_tests("other-secret"),
        );
        let user = User {
            id: "USER01".into(),
            email: "a@b.io".into(),
            password_hash: String::new(),
            name: "A".into(),
            phone: None,
            role: Role::Admin,
            status: UserStatus::Active,
            department: None,
            salary: None,
            company: None,
            address: None,
            hide: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = other.issue_token(&user).unwrap();
        assert_eq!(auth.verify_token(&token).unwrap_err().kind(), ErrorKind::Unauthorized);
    }
}
