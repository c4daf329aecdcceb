//! Column operations

use super::{reject, run, SyncContext, SyncOutcome, SyncState};
use crate::guard;
use serde_json::Value;
use std::sync::Arc;
use taskboard_client::api::ColumnsApi;
use taskboard_client::types::{BoardId, Column, ColumnId, ColumnPatch, CreateColumnInput};

/// Adds, edits and removes columns, refusing changes to standard columns
#[derive(Clone)]
pub struct ColumnSync {
    ctx: SyncContext,
    api: Arc<dyn ColumnsApi>,
    state: SyncState,
}

impl ColumnSync {
    pub fn new(ctx: SyncContext, api: Arc<dyn ColumnsApi>) -> Self {
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

    pub async fn add_column(
        &self,
        board_id: &BoardId,
        input: &CreateColumnInput,
    ) -> SyncOutcome<Column> {
        if let Err(rejection) = guard::require_text("column title", &input.title) {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "add_column",
            None,
            self.api.create_column(board_id, input),
            |store, column| match column {
                Some(column) => store.add_column(board_id, column.clone()),
                None => Ok(()),
            },
        )
        .await
    }

    /// Update a column. Standard columns keep their title.
    pub async fn update_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> SyncOutcome<Column> {
        let check = self
            .ctx
            .store()
            .read()
            .await
            .find_column(column_id)
            .map(|column| guard::check_column_update(column, patch));
        if let Some(Err(rejection)) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "update_column",
            Some(format!("column:{column_id}")),
            self.api.update_column(board_id, column_id, patch),
            |store, column| match column {
                Some(column) => {
                    store.update_column(board_id, column_id, &ColumnPatch::from(column))
                }
                None => store.update_column(board_id, column_id, patch),
            },
        )
        .await
    }

    /// Delete an empty, non-standard column
    pub async fn delete_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
    ) -> SyncOutcome<Value> {
        let check = self
            .ctx
            .store()
            .read()
            .await
            .find_column(column_id)
            .map(guard::check_column_delete);
        if let Some(Err(rejection)) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "delete_column",
            Some(format!("column:{column_id}")),
            self.api.delete_column(board_id, column_id),
            |store, _| store.delete_column(board_id, column_id).map(|_| ()),
        )
        .await
    }
}
