//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RegistryError;

/// 参加者登録時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Registry への登録に失敗（ID 重複などの不変条件違反）
    #[error("failed to register peer: {0}")]
    Registry(#[from] RegistryError),
}
