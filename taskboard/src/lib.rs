//! Normalized board/task state and its synchronization with the Taskboard API
//!
//! This crate is the stateful half of the Taskboard client. The network half
//! lives in `taskboard-client`.
//!
//! ## Overview
//!
//! - [`store`] - [`BoardStore`], plain data with pure transitions, shared
//!   through a persisted [`StoreHandle`]
//! - [`sync`] - operations that call the API and, on success, apply the
//!   matching store transition while tracking `loading`/`error`
//! - [`guard`] - local checks that refuse an operation before any request
//! - [`derive`] - values computed from the store (effective status, column
//!   views)
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard::Taskboard;
//! use taskboard_client::types::CreateTaskInput;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = taskboard_config::load_configuration()?;
//! let board = Taskboard::connect(&config).await?;
//!
//! board.boards.load_boards().await;
//! let created = board
//!     .tasks
//!     .create_task(&CreateTaskInput::new("Write release notes", "b1", "col-plan"))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&created)?);
//! # Ok(())
//! # }
//! ```

pub mod derive;
mod error;
pub mod guard;
pub mod store;
pub mod sync;

pub use error::{Result, StoreError, TaskboardError};
pub use guard::{BoardDeletion, GuardRejection};
pub use store::{BoardStore, StoreHandle};
pub use sync::{
    BoardSync, BoardTaskSync, ColumnSync, StatisticsSync, SyncContext, SyncOutcome, SyncState,
    TaskSync,
};

use std::sync::Arc;
use taskboard_client::{ApiClient, AuthToken, HttpApis};
use taskboard_config::TaskboardConfig;
use tracing::debug;

/// One store plus every sync instance, all sharing it
pub struct Taskboard {
    pub boards: BoardSync,
    pub columns: ColumnSync,
    pub tasks: BoardTaskSync,
    pub statistics: StatisticsSync,
    ctx: SyncContext,
    auth: AuthToken,
}

impl Taskboard {
    /// `auth` should be the token the clients behind `apis` read from
    pub fn new(store: StoreHandle, apis: HttpApis, auth: AuthToken) -> Self {
        let ctx = SyncContext::new(store);
        Self {
            boards: BoardSync::new(ctx.clone(), apis.boards),
            columns: ColumnSync::new(ctx.clone(), apis.columns),
            tasks: BoardTaskSync::new(ctx.clone(), apis.tasks),
            statistics: StatisticsSync::new(ctx.clone(), apis.statistics),
            ctx,
            auth,
        }
    }

    /// Build the HTTP client from configuration and rehydrate the store from
    /// its snapshot, if one is configured.
    ///
    /// The configured token, if any, seeds [`auth`](Self::auth); signing in
    /// later replaces it.
    pub async fn connect(config: &TaskboardConfig) -> Result<Self> {
        config.validate()?;
        let auth = config
            .auth
            .token
            .clone()
            .map(AuthToken::with_token)
            .unwrap_or_default();
        let client = ApiClient::new(&config.api, Arc::new(auth.clone()))?;
        let store = match config.storage.resolved_snapshot_path() {
            Some(path) => StoreHandle::open(path).await,
            None => StoreHandle::in_memory(),
        };
        debug!(
            base_url = client.base_url(),
            persisted = store.snapshot_path().is_some(),
            "Taskboard connected"
        );
        Ok(Self::new(store, HttpApis::new(client), auth))
    }

    pub fn store(&self) -> &StoreHandle {
        self.ctx.store()
    }

    /// The bearer token every request carries; set it after signing in
    pub fn auth(&self) -> &AuthToken {
        &self.auth
    }

    /// Forget the token and the signed-in user
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.clear_auth_token();
        self.store()
            .apply(|store| {
                store.clear_user();
                Ok(())
            })
            .await?;
        Ok(())
    }
}
