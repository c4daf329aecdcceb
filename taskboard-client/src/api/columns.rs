//! Columns: `/boards/{id}/columns`

use super::{encode, segment, typed, ApiResult};
use crate::client::ApiClient;
use crate::types::{BoardId, Column, ColumnId, ColumnPatch, CreateColumnInput};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ColumnsApi: Send + Sync {
    /// `POST /boards/{id}/columns`
    async fn create_column(&self, board_id: &BoardId, input: &CreateColumnInput)
        -> ApiResult<Column>;

    /// `PUT /boards/{id}/columns/{colId}`
    async fn update_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> ApiResult<Column>;

    /// `DELETE /boards/{id}/columns/{colId}`
    async fn delete_column(&self, board_id: &BoardId, column_id: &ColumnId) -> ApiResult<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpColumnsApi {
    client: ApiClient,
}

impl HttpColumnsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ColumnsApi for HttpColumnsApi {
    async fn create_column(
        &self,
        board_id: &BoardId,
        input: &CreateColumnInput,
    ) -> ApiResult<Column> {
        let body = encode(input)?;
        typed(
            self.client
                .post(&format!("/boards/{}/columns", segment(board_id)), Some(&body))
                .await,
        )
    }

    async fn update_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> ApiResult<Column> {
        let body = encode(patch)?;
        typed(
            self.client
                .put(&column_path(board_id, column_id), Some(&body))
                .await,
        )
    }

    async fn delete_column(&self, board_id: &BoardId, column_id: &ColumnId) -> ApiResult<Value> {
        self.client.delete(&column_path(board_id, column_id)).await
    }
}

fn column_path(board_id: &BoardId, column_id: &ColumnId) -> String {
    format!("/boards/{}/columns/{}", segment(board_id), segment(column_id))
}
