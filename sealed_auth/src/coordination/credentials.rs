//! Credentials signin, signup and linking flows.

use crate::adapter::{Account, AccountFilter, Adapter, NewAccount, NewUser};
use crate::config::{AuthConfig, Provider, ProviderType};
use crate::credentials::{
    Credentials, CredentialsAccountData, CredentialsProvider, PrecheckFailure, hash_password,
    verify_password,
};
use crate::session::{Session, SessionState, SessionStore, SessionUser, commit_session};

use super::errors::AuthError;
use super::{Completed, CookieUpdate};

pub(super) async fn signin(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    sessions: &dyn SessionStore,
    provider: &Provider,
    session: &mut Session,
    payload: &serde_json::Value,
) -> Result<Completed, AuthError> {
    // Require users to be signed out before signing in again.
    SessionState::of(session).require_anonymous()?;

    match provider {
        Provider::Credentials(provider) => {
            let credentials = provider
                .precheck(payload)
                .map_err(|_| AuthError::BadRequest("Invalid credentials".to_string()).log())?;

            let account = adapter
                .find_account(&account_filter(provider, &credentials))
                .await?;

            // Missing account, missing or malformed hash, and a wrong
            // password are one indistinguishable failure class.
            let account = account
                .filter(|account| {
                    stored_hash(account).is_some_and(|hash| {
                        verify_password(&credentials.password, &hash, config.secret())
                    })
                })
                .ok_or_else(|| {
                    AuthError::Unauthorized("Invalid credentials".to_string()).log()
                })?;

            if account.user.id <= 0 {
                return Err(AuthError::Unauthorized("Invalid credentials".to_string()).log());
            }

            let user = SessionUser::from(account.user);
            let sealed = commit_session(sessions, session, user.clone()).await?;
            tracing::debug!(user_id = user.id, "Signed in");
            Ok(Completed {
                data: serde_json::to_value(&user)?,
                cookie: CookieUpdate::Set(sealed),
            })
        }
    }
}

pub(super) async fn signup(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    sessions: &dyn SessionStore,
    provider: &Provider,
    session: &mut Session,
    payload: &serde_json::Value,
) -> Result<Completed, AuthError> {
    match provider {
        Provider::Credentials(provider) => {
            let credentials = provider.precheck(payload).map_err(|failure| {
                let message = match failure {
                    PrecheckFailure::MissingCredentials => "Invalid credentials",
                    PrecheckFailure::InvalidEmail => "Invalid email",
                    PrecheckFailure::InvalidPassword => "Invalid password",
                };
                AuthError::BadRequest(message.to_string()).log()
            })?;

            match SessionState::of(session) {
                // Signing up with an active session attaches the new account
                // to the signed-in user when linking is enabled. The response
                // echoes the session user and no cookie is issued.
                SessionState::Authenticated(user) => {
                    if !config.account_linking_on_signup() {
                        return Err(AuthError::BadRequest("Already signed in".to_string()).log());
                    }
                    ensure_account_free(adapter, provider, &credentials).await?;
                    create_credentials_account(config, adapter, user.id, provider, &credentials)
                        .await?;
                    tracing::debug!(user_id = user.id, "Linked account on signup");
                    Ok(Completed {
                        data: serde_json::to_value(&user)?,
                        cookie: CookieUpdate::Unchanged,
                    })
                }
                SessionState::Anonymous => {
                    ensure_account_free(adapter, provider, &credentials).await?;
                    let user = adapter
                        .create_user(NewUser::from_email(credentials.email.as_str()))
                        .await?;
                    create_credentials_account(config, adapter, user.id, provider, &credentials)
                        .await?;
                    let user = SessionUser::from(user);
                    let sealed = commit_session(sessions, session, user.clone()).await?;
                    tracing::debug!(user_id = user.id, "Signed up");
                    Ok(Completed {
                        data: serde_json::to_value(&user)?,
                        cookie: CookieUpdate::Set(sealed),
                    })
                }
            }
        }
    }
}

pub(super) async fn link_account(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    provider: &Provider,
    session: &Session,
    payload: &serde_json::Value,
) -> Result<Completed, AuthError> {
    let state = SessionState::of(session);
    let user = state.require_authenticated()?.clone();

    match provider {
        Provider::Credentials(provider) => {
            let credentials = provider
                .precheck(payload)
                .map_err(|_| AuthError::BadRequest("Invalid credentials".to_string()).log())?;

            // One account per provider per user.
            let owned = adapter.find_accounts_by_user(user.id).await?;
            if owned.iter().any(|account| {
                account.provider_type == ProviderType::Credentials
                    && account.provider_id == provider.id()
            }) {
                return Err(AuthError::BadRequest("Account already exists".to_string()).log());
            }

            ensure_account_free(adapter, provider, &credentials).await?;
            create_credentials_account(config, adapter, user.id, provider, &credentials).await?;

            // The session is untouched and no cookie is issued; the response
            // echoes the existing session user, not the linked identity.
            tracing::debug!(user_id = user.id, provider_id = provider.id(), "Linked account");
            Ok(Completed {
                data: serde_json::to_value(&user)?,
                cookie: CookieUpdate::Unchanged,
            })
        }
    }
}

fn account_filter(provider: &CredentialsProvider, credentials: &Credentials) -> AccountFilter {
    AccountFilter::new(
        ProviderType::Credentials,
        provider.id(),
        credentials.email.as_str(),
    )
}

fn stored_hash(account: &Account) -> Option<String> {
    account
        .provider_account_data
        .as_deref()
        .and_then(|raw| serde_json::from_str::<CredentialsAccountData>(raw).ok())
        .map(|data| data.hash)
}

async fn ensure_account_free(
    adapter: &dyn Adapter,
    provider: &CredentialsProvider,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    if adapter
        .find_account(&account_filter(provider, credentials))
        .await?
        .is_some()
    {
        return Err(AuthError::BadRequest("Account already exists".to_string()).log());
    }
    Ok(())
}

async fn create_credentials_account(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    user_id: i64,
    provider: &CredentialsProvider,
    credentials: &Credentials,
) -> Result<Account, AuthError> {
    let hash = hash_password(&credentials.password, config.secret())?;
    let data = serde_json::to_string(&CredentialsAccountData { hash })?;
    let account = adapter
        .create_account(NewAccount {
            user_id,
            provider_type: ProviderType::Credentials,
            provider_id: provider.id().to_string(),
            account_id: credentials.email.clone(),
            provider_account_data: Some(data),
        })
        .await?;
    Ok(account)
}
