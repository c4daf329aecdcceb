//! Statistics: `/statistics/{kind}/`

use super::ApiResult;
use crate::client::ApiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which aggregate report to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsKind {
    User,
    Boards,
    Tasks,
    Activity,
    Performance,
    Time,
    Teams,
    Projects,
}

impl StatisticsKind {
    pub const ALL: [StatisticsKind; 8] = [
        Self::User,
        Self::Boards,
        Self::Tasks,
        Self::Activity,
        Self::Performance,
        Self::Time,
        Self::Teams,
        Self::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Boards => "boards",
            Self::Tasks => "tasks",
            Self::Activity => "activity",
            Self::Performance => "performance",
            Self::Time => "time",
            Self::Teams => "teams",
            Self::Projects => "projects",
        }
    }

    /// Endpoint path, including the trailing slash the backend expects
    pub fn path(&self) -> String {
        format!("/statistics/{}/", self.as_str())
    }
}

impl fmt::Display for StatisticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown statistics kind '{s}'"))
    }
}

#[async_trait]
pub trait StatisticsApi: Send + Sync {
    /// `GET /statistics/{kind}/`; report shapes vary, so data stays untyped
    async fn get_statistics(&self, kind: StatisticsKind) -> ApiResult<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpStatisticsApi {
    client: ApiClient,
}

impl HttpStatisticsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatisticsApi for HttpStatisticsApi {
    async fn get_statistics(&self, kind: StatisticsKind) -> ApiResult<Value> {
        self.client.get(&kind.path()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_paths() {
        assert_eq!(StatisticsKind::User.path(), "/statistics/user/");
        assert_eq!(StatisticsKind::Performance.path(), "/statistics/performance/");
        assert_eq!("teams".parse::<StatisticsKind>(), Ok(StatisticsKind::Teams));
        assert!("weather".parse::<StatisticsKind>().is_err());
    }
}
