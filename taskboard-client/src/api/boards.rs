//! Boards: `/boards`

use super::{encode, segment, typed, ApiResult};
use crate::client::ApiClient;
use crate::types::{Board, BoardId, BoardPatch, BoardStatistics, CreateBoardInput};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait BoardsApi: Send + Sync {
    /// `GET /boards`
    async fn get_boards(&self) -> ApiResult<Vec<Board>>;

    /// `GET /boards/{id}`
    async fn get_board(&self, id: &BoardId) -> ApiResult<Board>;

    /// `POST /boards`
    async fn create_board(&self, input: &CreateBoardInput) -> ApiResult<Board>;

    /// `PUT /boards/{id}`
    async fn update_board(&self, id: &BoardId, patch: &BoardPatch) -> ApiResult<Board>;

    /// `DELETE /boards/{id}`
    async fn delete_board(&self, id: &BoardId) -> ApiResult<Value>;

    /// `PATCH /boards/{id}/toggle-favorite`
    async fn toggle_favorite(&self, id: &BoardId) -> ApiResult<Board>;

    /// `GET /boards/{id}/statistics`
    async fn get_board_statistics(&self, id: &BoardId) -> ApiResult<BoardStatistics>;
}

#[derive(Debug, Clone)]
pub struct HttpBoardsApi {
    client: ApiClient,
}

impl HttpBoardsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BoardsApi for HttpBoardsApi {
    async fn get_boards(&self) -> ApiResult<Vec<Board>> {
        typed(self.client.get("/boards").await)
    }

    async fn get_board(&self, id: &BoardId) -> ApiResult<Board> {
        typed(self.client.get(&format!("/boards/{}", segment(id))).await)
    }

    async fn create_board(&self, input: &CreateBoardInput) -> ApiResult<Board> {
        let body = encode(input)?;
        typed(self.client.post("/boards", Some(&body)).await)
    }

    async fn update_board(&self, id: &BoardId, patch: &BoardPatch) -> ApiResult<Board> {
        let body = encode(patch)?;
        typed(self.client.put(&format!("/boards/{}", segment(id)), Some(&body)).await)
    }

    async fn delete_board(&self, id: &BoardId) -> ApiResult<Value> {
        self.client.delete(&format!("/boards/{}", segment(id))).await
    }

    async fn toggle_favorite(&self, id: &BoardId) -> ApiResult<Board> {
        typed(
            self.client
                .patch(&format!("/boards/{}/toggle-favorite", segment(id)), None)
                .await,
        )
    }

    async fn get_board_statistics(&self, id: &BoardId) -> ApiResult<BoardStatistics> {
        typed(self.client.get(&format!("/boards/{}/statistics", segment(id))).await)
    }
}
