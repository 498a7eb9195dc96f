use api_types::auth::{
    AuthSession, LoginRequest, LoginResponse, LogoutRequest, ProfileUpdate, RegisterRequest,
    RegisterResponse, Tokens, User,
};

use crate::{
    error::{ClientError, Result},
    transport::Transport,
};

const REGISTER_PATH: &str = "/auth/register/";
const LOGIN_PATH: &str = "/auth/login/";
const LOGOUT_PATH: &str = "/auth/logout/";
const PROFILE_PATH: &str = "/auth/profile/";
const PROFILE_UPDATE_PATH: &str = "/auth/profile/update/";

/// Result of [`AuthClient::logout`].
///
/// The local clear always happens; `server_invalidated` tells whether the
/// refresh token was also revoked server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub server_invalidated: bool,
    pub local_cleared: bool,
}

pub struct AuthClient<'a> {
    transport: &'a Transport,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Creates the account and stores the returned credential pair.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession> {
        let res: RegisterResponse = self.transport.post(REGISTER_PATH, request).await?;
        self.store(&res.tokens).await?;
        tracing::info!(username = %res.user.username, "registered");

        Ok(AuthSession {
            user: Some(res.user),
            tokens: res.tokens,
        })
    }

    /// Exchanges credentials for a token pair and stores it in the session.
    ///
    /// The token endpoint usually omits the user; `AuthSession::user` is then
    /// `None` and the profile has to be fetched with [`AuthClient::profile`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res: LoginResponse = self.transport.post(LOGIN_PATH, &request).await?;

        let tokens = Tokens {
            access: res.access,
            refresh: res.refresh,
        };
        self.store(&tokens).await?;

        if res.user.is_none() {
            tracing::warn!(username, "login response carried no user");
        }
        tracing::info!(username, "logged in");

        Ok(AuthSession {
            user: res.user,
            tokens,
        })
    }

    /// Revokes the refresh token server-side (best effort) and clears the
    /// local session unconditionally.
    pub async fn logout(&self) -> LogoutOutcome {
        let session = self.transport.session();

        let server_invalidated = match session.refresh().await {
            Some(refresh_token) => match self
                .transport
                .post_unit(LOGOUT_PATH, &LogoutRequest { refresh_token })
                .await
            {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!("server-side logout failed, clearing locally: {err}");
                    false
                }
            },
            None => false,
        };

        if let Err(err) = session.clear().await {
            tracing::error!("failed to remove persisted session: {err}");
        }
        tracing::info!(server_invalidated, "logged out");

        LogoutOutcome {
            server_invalidated,
            local_cleared: true,
        }
    }

    pub async fn profile(&self) -> Result<User> {
        self.transport.get(PROFILE_PATH, &[]).await
    }

    /// Partial profile update; password changes are not accepted here.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        if update.is_empty() {
            return Err(ClientError::InvalidRequest(
                "profile update has no fields".to_string(),
            ));
        }
        self.transport.patch(PROFILE_UPDATE_PATH, update).await
    }

    async fn store(&self, tokens: &Tokens) -> Result<()> {
        if tokens.access.is_empty() || tokens.refresh.is_empty() {
            return Err(ClientError::InvalidResponse(
                "server returned an empty token".to_string(),
            ));
        }
        self.transport
            .session()
            .set(tokens.access.clone(), tokens.refresh.clone())
            .await?;
        Ok(())
    }
}
