//! AsanaSense - ハンズフリー ヨガポーズコーチ
//!
//! フレームを撮影してマルチモーダルAPIに送り、
//! JSONフィードバックを表示・読み上げ用テキストにする

pub mod cli;
pub mod coach;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod listen;
pub mod session;
pub mod wake;

pub use asana_sense_common::{FeedbackResult, Score};
