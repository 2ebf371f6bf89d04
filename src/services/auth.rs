//! Credential verification, sign-in and principal resolution

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::{JwtResponse, SignInRequest},
        Principal, User,
    },
    repository::Repository,
};

use super::token::TokenService;

const BAD_CREDENTIALS: &str = "Bad credentials";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        let tokens = TokenService::new(&config);
        Self { repository, config, tokens }
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .repository
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(BAD_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// Authenticate and issue a bearer token
    pub async fn sign_in(&self, request: SignInRequest) -> AppResult<JwtResponse> {
        let user = match self.authenticate(&request.username, &request.password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Sign-in rejected for '{}'", request.username);
                return Err(e);
            }
        };

        let access_token = self.tokens.generate_access_token(&user.username)?;
        tracing::info!("User '{}' signed in", user.username);

        Ok(JwtResponse { access_token })
    }

    /// Resolve a presented token to the stored user it was issued for
    pub async fn resolve_principal(&self, token: &str) -> AppResult<Principal> {
        let username = self.tokens.validate_token(token)?;

        let user = self
            .repository
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        Ok(Principal::from(user))
    }

    /// Create the configured bootstrap accounts that do not exist yet.
    /// Returns how many were created.
    pub async fn bootstrap_users(&self) -> AppResult<usize> {
        let mut created = 0;

        for account in &self.config.bootstrap_users {
            if self
                .repository
                .users
                .find_by_username(&account.username)
                .await?
                .is_some()
            {
                continue;
            }

            self.repository
                .users
                .insert(User {
                    id: None,
                    username: account.username.clone(),
                    password: hash_password(&account.password)?,
                    role: account.role,
                })
                .await?;

            tracing::info!("Created bootstrap user '{}' ({})", account.username, account.role);
            created += 1;
        }

        Ok(created)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::BootstrapUser,
        models::UserRole,
        repository::{MockAuthorStore, MockBookStore, MockGenreStore, MockUserStore},
    };
    use mockall::predicate::eq;

    fn service(users: MockUserStore, config: AuthConfig) -> AuthService {
        let repository = Repository::mocked(
            MockBookStore::new(),
            MockAuthorStore::new(),
            MockGenreStore::new(),
            users,
        );
        AuthService::new(repository, config)
    }

    fn stored_user(password: &str, role: UserRole) -> User {
        User {
            id: Some(1),
            username: "admin".to_string(),
            password: hash_password(password).unwrap(),
            role,
        }
    }

    #[tokio::test]
    async fn sign_in_issues_token_resolving_to_the_user() {
        let user = stored_user("pass1", UserRole::Admin);
        let mut users = MockUserStore::new();
        users
            .expect_find_by_username()
            .with(eq("admin"))
            .times(2)
            .returning(move |_| Ok(Some(user.clone())));
        let auth = service(users, AuthConfig::default());

        let response = auth
            .sign_in(SignInRequest { username: "admin".into(), password: "pass1".into() })
            .await
            .unwrap();

        let principal = auth.resolve_principal(&response.access_token).await.unwrap();
        assert_eq!(principal.username, "admin");
        assert!(principal.is_admin());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let user = stored_user("pass1", UserRole::User);
        let mut users = MockUserStore::new();
        users
            .expect_find_by_username()
            .with(eq("admin"))
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_find_by_username()
            .with(eq("ghost"))
            .returning(|_| Ok(None));
        let auth = service(users, AuthConfig::default());

        let wrong = auth.authenticate("admin", "nope").await.unwrap_err();
        let unknown = auth.authenticate("ghost", "pass1").await.unwrap_err();
        assert!(matches!(wrong, AppError::Authentication(_)));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        let mut users = MockUserStore::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        let auth = service(users, AuthConfig::default());

        let token = auth.tokens.generate_access_token("gone").unwrap();
        let err = auth.resolve_principal(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn bootstrap_only_creates_missing_users() {
        let existing = stored_user("pass1", UserRole::Admin);
        let mut users = MockUserStore::new();
        users
            .expect_find_by_username()
            .with(eq("admin"))
            .returning(move |_| Ok(Some(existing.clone())));
        users
            .expect_find_by_username()
            .with(eq("user"))
            .returning(|_| Ok(None));
        users
            .expect_insert()
            .withf(|u| u.username == "user" && u.role == UserRole::User && u.password != "pass2")
            .times(1)
            .returning(|u| Ok(User { id: Some(2), ..u }));

        let config = AuthConfig {
            bootstrap_users: vec![
                BootstrapUser { username: "admin".into(), password: "pass1".into(), role: UserRole::Admin },
                BootstrapUser { username: "user".into(), password: "pass2".into(), role: UserRole::User },
            ],
            ..AuthConfig::default()
        };

        assert_eq!(service(users, config).bootstrap_users().await.unwrap(), 1);
    }
}
