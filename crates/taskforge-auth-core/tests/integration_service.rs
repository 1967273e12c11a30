//! End-to-end flows through the auth service over the in-memory store

use std::sync::Arc;
use std::time::Duration;

use taskforge_auth_core::{
    AuthConfig, AuthError, AuthService, ClientMeta, LoginOutcome, NewAccount,
};
use taskforge_store::{AccountRepository, MemoryAccountRepository};

const PASSWORD: &str = "Valid123!";

fn config() -> AuthConfig {
    AuthConfig::new("integration-test-secret-0123456789ab").unwrap()
}

fn service() -> AuthService<MemoryAccountRepository> {
    AuthService::new(config(), Arc::new(MemoryAccountRepository::new()))
}

fn service_with_repo() -> (AuthService<MemoryAccountRepository>, MemoryAccountRepository) {
    let repo = MemoryAccountRepository::new();
    let service = AuthService::new(config(), Arc::new(repo.clone()));
    (service, repo)
}

fn new_account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: "Developer".to_string(),
    }
}

async fn register_and_login(
    service: &AuthService<MemoryAccountRepository>,
    email: &str,
) -> LoginOutcome {
    service.register(new_account(email)).await.unwrap();
    service
        .login(email, PASSWORD, ClientMeta::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_login_authenticate() {
    let service = service();

    let registered = service.register(new_account("ada@example.com")).await.unwrap();
    assert_eq!(registered.user.email, "ada@example.com");
    assert!(!registered.verification_token.is_empty());

    let login = service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();
    assert_eq!(login.tokens.token_type, "bearer");
    assert_eq!(login.tokens.expires_in, 30 * 60);
    assert!(login.session.is_current);
    assert!(login.user.last_login_at.is_some());

    let user = service.authenticate(&login.tokens.access_token).await.unwrap();
    assert_eq!(user.id, registered.user.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let service = service();
    service.register(new_account("ada@example.com")).await.unwrap();

    let unknown_email = service
        .login("nobody@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap_err();
    let wrong_password = service
        .login("ada@example.com", "Wrong123!", ClientMeta::default())
        .await
        .unwrap_err();

    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_weak_password() {
    let service = service();
    service.register(new_account("ada@example.com")).await.unwrap();

    let duplicate = service.register(new_account("ada@example.com")).await;
    assert!(matches!(duplicate, Err(AuthError::EmailTaken)));

    let mut weak = new_account("grace@example.com");
    weak.password = "nosymbol123".to_string();
    assert!(matches!(
        service.register(weak).await,
        Err(AuthError::WeakPassword)
    ));
}

#[tokio::test]
async fn test_refresh_mints_usable_access_token() {
    let service = service();
    let login = register_and_login(&service, "ada@example.com").await;

    let refreshed = service.refresh(&login.tokens.refresh_token).await.unwrap();
    assert_eq!(refreshed.expires_in, 30 * 60);
    service.authenticate(&refreshed.access_token).await.unwrap();

    // An access token is not accepted where a refresh token is expected
    assert!(matches!(
        service.refresh(&login.tokens.access_token).await,
        Err(AuthError::WrongTokenType)
    ));
}

#[tokio::test]
async fn test_refresh_rejected_for_deactivated_account() {
    let (service, repo) = service_with_repo();
    let login = register_and_login(&service, "ada@example.com").await;

    repo.set_active(login.user.id.0, false).await.unwrap();
    assert!(matches!(
        service.refresh(&login.tokens.refresh_token).await,
        Err(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_logout_blacklists_token_and_drops_session() {
    let service = service();
    let login = register_and_login(&service, "ada@example.com").await;
    let user_id = login.user.id;

    service.logout(user_id, Some(&login.tokens.access_token)).await;

    assert!(matches!(
        service.authenticate(&login.tokens.access_token).await,
        Err(AuthError::InvalidToken)
    ));
    assert!(service.list_sessions(user_id).is_empty());
}

#[tokio::test]
async fn test_logout_without_token_still_drops_session() {
    let service = service();
    let login = register_and_login(&service, "ada@example.com").await;

    service.logout(login.user.id, None).await;
    assert!(service.list_sessions(login.user.id).is_empty());
}

#[tokio::test]
async fn test_change_password_keeps_current_session_only() {
    let service = service();
    service.register(new_account("ada@example.com")).await.unwrap();

    let phone = service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();
    let laptop = service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();
    let user_id = laptop.user.id;

    service
        .change_password(user_id, PASSWORD, "Changed456!")
        .await
        .unwrap();

    let sessions = service.list_sessions(user_id);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, laptop.session.id);
    assert_ne!(sessions[0].id, phone.session.id);

    // Old password no longer works, the new one does
    assert!(matches!(
        service
            .login("ada@example.com", PASSWORD, ClientMeta::default())
            .await,
        Err(AuthError::InvalidCredentials)
    ));
    service
        .login("ada@example.com", "Changed456!", ClientMeta::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_change_password_rejects_wrong_current_and_weak_new() {
    let service = service();
    let login = register_and_login(&service, "ada@example.com").await;
    let user_id = login.user.id;

    assert!(matches!(
        service.change_password(user_id, "Wrong123!", "Changed456!").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        service.change_password(user_id, PASSWORD, "weak").await,
        Err(AuthError::WeakPassword)
    ));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let service = service();
    register_and_login(&service, "ada@example.com").await;

    // Anti-enumeration: unknown email yields no token, not an error
    assert!(service.forgot_password("nobody@example.com").await.unwrap().is_none());

    let token = service
        .forgot_password("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    service.reset_password(&token, "AfterReset1!").await.unwrap();

    // Every session is gone and the new password is live
    let relogin = service
        .login("ada@example.com", "AfterReset1!", ClientMeta::default())
        .await
        .unwrap();
    assert_eq!(service.list_sessions(relogin.user.id).len(), 1);

    // Single use
    assert!(matches!(
        service.reset_password(&token, "Another123!").await,
        Err(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_weak_reset_password_does_not_burn_token() {
    let service = service();
    register_and_login(&service, "ada@example.com").await;

    let token = service
        .forgot_password("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(
        service.reset_password(&token, "weak").await,
        Err(AuthError::WeakPassword)
    ));
    // Retry with a compliant password still succeeds
    service.reset_password(&token, "AfterReset1!").await.unwrap();
}

#[tokio::test]
async fn test_expired_reset_token_rejected() {
    let repo = MemoryAccountRepository::new();
    let config = config().with_reset_token_ttl(Duration::ZERO);
    let service = AuthService::new(config, Arc::new(repo));

    service.register(new_account("ada@example.com")).await.unwrap();
    let token = service
        .forgot_password("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(
        service.reset_password(&token, "AfterReset1!").await,
        Err(AuthError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_email_verification_reactivates_account() {
    let (service, repo) = service_with_repo();
    let registered = service.register(new_account("ada@example.com")).await.unwrap();

    repo.set_active(registered.user.id.0, false).await.unwrap();
    assert!(matches!(
        service
            .login("ada@example.com", PASSWORD, ClientMeta::default())
            .await,
        Err(AuthError::AccountInactive)
    ));

    service.verify_email(&registered.verification_token).await.unwrap();
    service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();

    // Single use
    assert!(matches!(
        service.verify_email(&registered.verification_token).await,
        Err(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_resend_verification() {
    let service = service();
    service.register(new_account("ada@example.com")).await.unwrap();

    assert!(service
        .resend_verification("nobody@example.com")
        .await
        .unwrap()
        .is_none());

    let token = service
        .resend_verification("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    service.verify_email(&token).await.unwrap();
}

#[tokio::test]
async fn test_session_listing_and_revocation() {
    let service = service();
    service.register(new_account("ada@example.com")).await.unwrap();

    let first = service
        .login(
            "ada@example.com",
            PASSWORD,
            ClientMeta {
                ip_address: Some("10.0.0.1".to_string()),
                user_agent: Some("cli/1.0".to_string()),
            },
        )
        .await
        .unwrap();
    let second = service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();
    let user_id = second.user.id;

    let sessions = service.list_sessions(user_id);
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].ip_address.as_deref(), Some("10.0.0.1"));
    assert!(!sessions[0].is_current);
    assert!(sessions[1].is_current);

    service.revoke_session(user_id, &first.session.id).unwrap();
    assert_eq!(service.list_sessions(user_id).len(), 1);

    assert!(matches!(
        service.revoke_session(user_id, &first.session.id),
        Err(AuthError::SessionNotFound)
    ));
}

#[tokio::test]
async fn test_authenticate_rejects_inactive_account() {
    let (service, repo) = service_with_repo();
    let login = register_and_login(&service, "ada@example.com").await;

    repo.set_active(login.user.id.0, false).await.unwrap();
    assert!(matches!(
        service.authenticate(&login.tokens.access_token).await,
        Err(AuthError::AccountInactive)
    ));
}

#[tokio::test]
async fn test_authenticate_rejects_refresh_token() {
    let service = service();
    let login = register_and_login(&service, "ada@example.com").await;

    assert!(matches!(
        service.authenticate(&login.tokens.refresh_token).await,
        Err(AuthError::WrongTokenType)
    ));
}

#[tokio::test]
async fn test_expired_access_token_rejected() {
    let repo = MemoryAccountRepository::new();
    let config = config().with_access_token_ttl(Duration::ZERO);
    let service = AuthService::new(config, Arc::new(repo));

    service.register(new_account("ada@example.com")).await.unwrap();
    let login = service
        .login("ada@example.com", PASSWORD, ClientMeta::default())
        .await
        .unwrap();

    assert!(matches!(
        service.authenticate(&login.tokens.access_token).await,
        Err(AuthError::TokenExpired)
    ));
}
