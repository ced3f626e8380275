use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::{self, Role};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::{AuthRepository, NewAccount};

pub const PASSWORD_ALGORITHM: &str = "argon2";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Issue an HS256 token for `user` valid for `ttl_hours`.
pub fn issue_token(user: &AuthUser, secret: &str, ttl_hours: i64) -> Result<(String, i64), AuthError> {
    let now = Utc::now();
    let exp = (now + Duration::hours(ttl_hours)).timestamp();
    let claims = Claims { sub: user.username.clone(), uid: user.id, role: user.role, iat: now.timestamp(), exp };
    let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok((token, exp))
}

/// Verify signature and expiry of `token` and return its claims.
///
/// # Examples
/// ```
/// use service::auth::{decode_token, service::issue_token, domain::AuthUser};
/// use models::user::Role;
/// let user = AuthUser { id: uuid::Uuid::new_v4(), username: "alice".into(), full_name: "Alice".into(), email: "a@campus.edu".into(), role: Role::Faculty, enabled: true };
/// let (token, _) = issue_token(&user, "secret", 1).unwrap();
/// let claims = decode_token(&token, "secret").unwrap();
/// assert_eq!(claims.role, Role::Faculty);
/// assert!(decode_token(&token, "other-secret").is_err());
/// ```
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new student account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1 });
    /// let input = RegisterInput { username: "jdoe".into(), full_name: "J Doe".into(), email: "jdoe@campus.edu".into(), phone: None, password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.role, models::user::Role::Student);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        user::validate_username(&input.username)?;
        user::validate_full_name(&input.full_name)?;
        user::validate_email(&input.email)?;
        let hash = hash_password(&input.password)?;

        if self.repo.find_user_by_username(input.username.trim()).await?.is_some() {
            debug!("username taken");
            return Err(AuthError::Conflict(format!("username {}", input.username.trim())));
        }
        if self.repo.find_user_by_email(input.email.trim()).await?.is_some() {
            debug!("email taken");
            return Err(AuthError::Conflict(format!("email {}", input.email.trim())));
        }

        let user = self
            .repo
            .create_user(NewAccount {
                username: input.username.trim(),
                full_name: &input.full_name,
                email: input.email.trim(),
                phone: input.phone.as_deref(),
                role: Role::Student,
            })
            .await?;
        self.repo.upsert_password(user.id, hash, PASSWORD_ALGORITHM.to_string()).await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "user1".into(), full_name: "N".into(), email: "u@e.com".into(), phone: None, password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "user1".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let login = input.username.trim();
        let found = if login.contains('@') {
            self.repo.find_user_by_email(login).await?
        } else {
            self.repo.find_user_by_username(login).await?
        };
        let user = found.ok_or(AuthError::Unauthorized)?;

        let cred = self.repo.get_credentials(user.id).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &cred.password_hash)? {
            warn!(user_id = %user.id, "login_failed");
            return Err(AuthError::Unauthorized);
        }
        if !user.enabled {
            return Err(AuthError::Disabled);
        }

        let (token, expires_at) = issue_token(&user, &self.cfg.jwt_secret, self.cfg.token_ttl_hours)?;
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 2 });
        (repo, svc)
    }

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            full_name: "Test Student".into(),
            email: email.into(),
            phone: None,
            password: "CorrectHorse1".into(),
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let (_, svc) = svc();
        svc.register(input("alice", "alice@campus.edu")).await.unwrap();
        let dup_name = svc.register(input("alice", "other@campus.edu")).await;
        assert!(matches!(dup_name, Err(AuthError::Conflict(_))));
        let dup_mail = svc.register(input("alice2", "ALICE@campus.edu")).await;
        assert!(matches!(dup_mail, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let (_, svc) = svc();
        let mut i = input("bob", "bob@campus.edu");
        i.password = "short".into();
        assert!(matches!(svc.register(i).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_issues_decodable_token() {
        let (_, svc) = svc();
        let user = svc.register(input("carol", "carol@campus.edu")).await.unwrap();
        let session = svc
            .login(LoginInput { username: "carol@campus.edu".into(), password: "CorrectHorse1".into() })
            .await
            .unwrap();
        let claims = decode_token(&session.token, "test-secret").unwrap();
        assert_eq!(claims.uid, user.id);
        assert_eq!(claims.sub, "carol");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.exp, session.expires_at);
        assert!(claims.exp - claims.iat == 2 * 3600);
    }

    #[tokio::test]
    async fn wrong_password_and_disabled_account_are_rejected() {
        let (repo, svc) = svc();
        svc.register(input("dave", "dave@campus.edu")).await.unwrap();
        let bad = svc.login(LoginInput { username: "dave".into(), password: "nope-nope".into() }).await;
        assert!(matches!(bad, Err(AuthError::Unauthorized)));

        repo.set_enabled("dave", false);
        let disabled = svc.login(LoginInput { username: "dave".into(), password: "CorrectHorse1".into() }).await;
        assert!(matches!(disabled, Err(AuthError::Disabled)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = AuthUser {
            id: uuid::Uuid::new_v4(),
            username: "eve".into(),
            full_name: "Eve".into(),
            email: "eve@campus.edu".into(),
            role: Role::Admin,
            enabled: true,
        };
        let (token, _) = issue_token(&user, "s", -1).unwrap();
        assert!(matches!(decode_token(&token, "s"), Err(AuthError::TokenError(_))));
    }
}
