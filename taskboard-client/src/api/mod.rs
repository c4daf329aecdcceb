//! Resource API modules
//!
//! One trait per resource family, each method a 1:1 mapping onto a REST call.
//! The `Http*` types are the implementations backed by [`ApiClient`]; the
//! traits exist so the sync layer can be driven by in-memory fakes.

mod boards;
mod columns;
mod statistics;
mod tasks;

pub use boards::{BoardsApi, HttpBoardsApi};
pub use columns::{ColumnsApi, HttpColumnsApi};
pub use statistics::{HttpStatisticsApi, StatisticsApi, StatisticsKind};
pub use tasks::{HttpTasksApi, TasksApi};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Result of a resource call: a typed envelope, or a transport error
pub type ApiResult<T> = Result<ApiResponse<T>, ClientError>;

/// An id as one percent-encoded path segment, so `/`, `?` or `#` in it
/// cannot change the route
pub(crate) fn segment(id: &impl AsRef<str>) -> Cow<'_, str> {
    urlencoding::encode(id.as_ref())
}

pub(crate) fn encode<T: Serialize>(payload: &T) -> Result<Value, ClientError> {
    serde_json::to_value(payload).map_err(|e| ClientError::Encode(e.to_string()))
}

pub(crate) fn typed<T: DeserializeOwned>(
    response: Result<ApiResponse, ClientError>,
) -> ApiResult<T> {
    response?.into_typed()
}

/// All four HTTP resource modules over one shared client
#[derive(Clone)]
pub struct HttpApis {
    pub boards: Arc<dyn BoardsApi>,
    pub columns: Arc<dyn ColumnsApi>,
    pub tasks: Arc<dyn TasksApi>,
    pub statistics: Arc<dyn StatisticsApi>,
}

impl HttpApis {
    pub fn new(client: ApiClient) -> Self {
        Self {
            boards: Arc::new(HttpBoardsApi::new(client.clone())),
            columns: Arc::new(HttpColumnsApi::new(client.clone())),
            tasks: Arc::new(HttpTasksApi::new(client.clone())),
            statistics: Arc::new(HttpStatisticsApi::new(client)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskId;

    #[test]
    fn test_segment_escapes_route_characters() {
        assert_eq!(segment(&TaskId::from("t1")), "t1");
        assert_eq!(segment(&TaskId::from("a/b?c#d")), "a%2Fb%3Fc%23d");
        assert_eq!(segment(&TaskId::from("two words")), "two%20words");
    }
}
