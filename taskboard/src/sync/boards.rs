//! Board operations

use super::{reject, run, SyncContext, SyncOutcome, SyncState};
use crate::derive::{self, ColumnView};
use crate::guard::{self, BoardDeletion, GuardRejection};
use serde_json::Value;
use std::sync::Arc;
use taskboard_client::api::BoardsApi;
use taskboard_client::types::{Board, BoardId, BoardPatch, BoardStatistics, CreateBoardInput};

/// Loads and edits boards, keeping the store's board collection current
#[derive(Clone)]
pub struct BoardSync {
    ctx: SyncContext,
    api: Arc<dyn BoardsApi>,
    state: SyncState,
}

impl BoardSync {
    pub fn new(ctx: SyncContext, api: Arc<dyn BoardsApi>) -> Self {
        Self {
            ctx,
            api,
            state: SyncState::new(),
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Fetch every board and replace the collection
    pub async fn load_boards(&self) -> SyncOutcome<Vec<Board>> {
        run(
            &self.ctx,
            &self.state,
            "load_boards",
            Some("boards".to_string()),
            self.api.get_boards(),
            |store, boards| {
                store.replace_all_boards(boards.cloned().unwrap_or_default());
                Ok(())
            },
        )
        .await
    }

    /// Fetch one board and make it current
    pub async fn load_board(&self, id: &BoardId) -> SyncOutcome<Board> {
        run(
            &self.ctx,
            &self.state,
            "load_board",
            Some(format!("board:{id}")),
            self.api.get_board(id),
            |store, board| match board {
                Some(board) => store.set_current_board(Some(board.clone())),
                None => Ok(()),
            },
        )
        .await
    }

    /// Fetch a board and return its columns as they should be displayed now
    pub async fn load_board_view(&self, id: &BoardId) -> SyncOutcome<Vec<ColumnView>> {
        let loaded = self.load_board(id).await;
        if !loaded.success {
            return loaded.map(|_| Vec::new());
        }
        let views = self
            .ctx
            .store()
            .read()
            .await
            .column_views(id, derive::now_ms());
        match views {
            Ok(views) => SyncOutcome::ok(views),
            Err(e) => {
                let message = e.to_string();
                self.state.fail(&message);
                SyncOutcome::failed(message)
            }
        }
    }

    pub async fn create_board(&self, input: &CreateBoardInput) -> SyncOutcome<Board> {
        if let Err(rejection) = guard::require_text("board title", &input.title) {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "create_board",
            None,
            self.api.create_board(input),
            |store, board| match board {
                Some(board) => store.add_board(board.clone()),
                None => Ok(()),
            },
        )
        .await
    }

    /// Update board fields; the store takes the server's version when one is
    /// returned, otherwise the patch itself
    pub async fn update_board(&self, id: &BoardId, patch: &BoardPatch) -> SyncOutcome<Board> {
        if let Some(ref title) = patch.title {
            if let Err(rejection) = guard::require_text("board title", title) {
                return reject(&self.state, rejection);
            }
        }
        run(
            &self.ctx,
            &self.state,
            "update_board",
            Some(format!("board:{id}")),
            self.api.update_board(id, patch),
            |store, board| match board {
                Some(board) => store.update_board(id, &BoardPatch::from(board)),
                None => store.update_board(id, patch),
            },
        )
        .await
    }

    /// Delete a board after checking the typed confirmation.
    ///
    /// The board must be in the store; an unknown board is refused.
    pub async fn delete_board(
        &self,
        id: &BoardId,
        deletion: &BoardDeletion,
    ) -> SyncOutcome<Value> {
        let check = {
            let store = self.ctx.store().read().await;
            match store.find_board(id) {
                Some(board) => guard::check_board_delete(board, deletion, store.boards().len()),
                None => Err(GuardRejection::UnknownBoard { id: id.to_string() }),
            }
        };
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "delete_board",
            Some(format!("board:{id}")),
            self.api.delete_board(id),
            |store, _| store.delete_board(id).map(|_| ()),
        )
        .await
    }

    pub async fn toggle_favorite(&self, id: &BoardId) -> SyncOutcome<Board> {
        run(
            &self.ctx,
            &self.state,
            "toggle_favorite",
            Some(format!("favorite:{id}")),
            self.api.toggle_favorite(id),
            |store, board| match board {
                Some(board) => store.update_board(id, &BoardPatch::from(board)),
                None => store.toggle_favorite(id).map(|_| ()),
            },
        )
        .await
    }

    pub async fn load_board_statistics(&self, id: &BoardId) -> SyncOutcome<BoardStatistics> {
        run(
            &self.ctx,
            &self.state,
            "load_board_statistics",
            Some(format!("board-statistics:{id}")),
            self.api.get_board_statistics(id),
            |store, statistics| match statistics {
                Some(statistics) => store.set_board_statistics(id, statistics.clone()),
                None => Ok(()),
            },
        )
        .await
    }

    /// Make a board the current one without a request
    pub async fn select_board(&self, id: &BoardId) -> SyncOutcome<Board> {
        let selected = self
            .ctx
            .store()
            .apply(|store| {
                store.select_board(id)?;
                Ok(store.current_board().cloned())
            })
            .await;
        match selected {
            Ok(board) => SyncOutcome::cached(board),
            Err(e) => {
                let message = e.to_string();
                self.state.fail(&message);
                SyncOutcome::failed(message)
            }
        }
    }
}
