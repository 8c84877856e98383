use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult,
    accounts::{self, Role, UserAccount},
};

/// Key the signed-in identity is stored under.
pub const IDENTITY: &str = "identity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&UserAccount> for Identity {
    fn from(account: &UserAccount) -> Self {
        Identity {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
        }
    }
}

/// Where a client stands in the login state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    /// Reads the session and checks it against the store. A session whose
    /// account is gone is cleared; one whose account was renamed elsewhere
    /// picks up the new name.
    pub async fn load(session: &Session, db_pool: &SqlitePool) -> AppResult<Self> {
        let Some(stored) = session.get::<Identity>(IDENTITY).await? else {
            return Ok(SessionState::Anonymous);
        };

        let Some(account) = accounts::find_by_id(db_pool, stored.id).await? else {
            tracing::info!(username = %stored.username, "session outlived its account");
            return Ok(SessionState::logout(session).await);
        };

        let identity = Identity::from(&account);
        if identity != stored {
            session.insert(IDENTITY, &identity).await?;
        }
        Ok(SessionState::Authenticated(identity))
    }

    /// Anonymous → Authenticated. Rotates the session id.
    pub async fn login(
        session: &Session,
        account: &UserAccount,
    ) -> Result<Self, tower_sessions::session::Error> {
        let identity = Identity::from(account);
        session.cycle_id().await?;
        session.insert(IDENTITY, &identity).await?;
        tracing::info!(username = %identity.username, role = %identity.role, "logged in");
        Ok(SessionState::Authenticated(identity))
    }

    /// Authenticated → Anonymous.
    pub async fn logout(session: &Session) -> Self {
        session.clear().await;
        SessionState::Anonymous
    }

    /// Keeps the session in step with a renamed account.
    pub async fn rename(
        &mut self,
        session: &Session,
        username: &str,
    ) -> Result<(), tower_sessions::session::Error> {
        if let SessionState::Authenticated(identity) = self {
            identity.username = username.to_owned();
            session.insert(IDENTITY, &*identity).await?;
        }
        Ok(())
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.identity().is_some_and(|identity| identity.role == Role::Doctor)
    }
}
