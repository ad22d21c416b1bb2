use super::*;
use crate::services::credentials::Credential;

#[test]
fn from_config_carries_login_delay() {
    let config = ServerConfig { login_delay: Duration::from_millis(250), ..ServerConfig::default() };
    let state = AppState::from_config(&config);
    assert_eq!(state.login_delay, Duration::from_millis(250));
}

#[test]
fn from_config_carries_token_ttl() {
    let config = ServerConfig { token_ttl: Duration::from_secs(90), ..ServerConfig::default() };
    let state = AppState::from_config(&config);
    assert_eq!(state.issuer.validity(), Duration::from_secs(90));
}

#[tokio::test]
async fn from_config_uses_configured_account() {
    let mut config = ServerConfig::default();
    config.account.email = "ops@example.com".into();
    config.account.password = "s3cret".into();
    config.account.name = "Ops".into();
    let state = AppState::from_config(&config);

    let issued = state
        .issuer
        .issue(&Credential::new("ops@example.com", "s3cret"))
        .await
        .unwrap();
    assert_eq!(issued.user.name, "Ops");

    assert!(
        state
            .issuer
            .issue(&Credential::new("academy@gmail.com", "academy123"))
            .await
            .is_err()
    );
}

#[test]
fn clones_share_issuer() {
    let state = test_helpers::test_app_state();
    let cloned = state.clone();
    assert!(Arc::ptr_eq(&state.issuer, &cloned.issuer));
}
