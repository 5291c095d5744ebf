//! AsanaSense Common Library
//!
//! CLIとコーチング処理で共有される型とユーティリティ（I/Oなし）

pub mod types;
pub mod error;
pub mod parser;
pub mod prompts;

pub use types::{FeedbackResult, Score, MAX_SCORE};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_feedback_response};
pub use prompts::{build_coaching_prompt, COACHING_PROMPT};
