use thiserror::Error;

/// レスポンス表示用に残す最大文字数
const RAW_PREVIEW_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum AsanaError {
    /// API呼び出しが完了しなかった（ネットワーク・認証・レート制限）
    #[error("API通信エラー: {0}")]
    Transport(String),

    /// APIは応答したがフィードバック形式として読めなかった
    #[error("APIレスポンスが不正です ({reason}): {raw}")]
    MalformedResponse { reason: String, raw: String },

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。GOOGLE_API_KEY を設定するか `asana-sense config --set-api-key` を実行してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フレームがありません: {0}")]
    NoFrameAvailable(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl AsanaError {
    /// 生レスポンスを切り詰めて MalformedResponse を作る
    pub fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        let mut preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
        if raw.chars().count() > RAW_PREVIEW_CHARS {
            preview.push('…');
        }
        AsanaError::MalformedResponse {
            reason: reason.into(),
            raw: preview,
        }
    }

    /// 1回の撮影サイクルを終わらせるエラーか
    pub fn is_capture_failure(&self) -> bool {
        matches!(
            self,
            AsanaError::Transport(_) | AsanaError::MalformedResponse { .. }
        )
    }
}

impl From<reqwest::Error> for AsanaError {
    fn from(e: reqwest::Error) -> Self {
        AsanaError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AsanaError>;
