//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// レスポンスからJSONを取り出せない
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSONは読めたが期待するスキーマと一致しない
    #[error("Schema error: {0}")]
    Schema(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
