use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asana-sense")]
#[command(about = "ヨガポーズAIコーチ（撮影・フィードバック）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 使用モデル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を1枚撮影してフィードバックを取得
    Capture {
        /// 画像ファイル、またはフレームフォルダ（最新画像を使用）
        #[arg(required = true)]
        image: PathBuf,

        /// 取っているポーズ名（例: "Warrior II"）
        #[arg(short, long)]
        pose: Option<String>,

        /// 読み上げテキストの出力先
        #[arg(long)]
        speak_to: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 書き起こしを監視し、ウェイクワードで撮影
    Listen {
        /// フレームフォルダ（最新画像を使用）または画像ファイル
        #[arg(short, long, required = true)]
        frames: PathBuf,

        /// 書き起こしファイル（省略時は標準入力、1発話1行）
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// ウェイクワード（省略時は設定値）
        #[arg(short, long)]
        wake_word: Option<String>,

        /// 取っているポーズ名
        #[arg(short, long)]
        pose: Option<String>,

        /// 読み上げテキストの出力先
        #[arg(long)]
        speak_to: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定（値を省略すると入力を求める）
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        set_api_key: Option<String>,

        /// 既定モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 既定ウェイクワードを設定
        #[arg(long)]
        set_wake_word: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
