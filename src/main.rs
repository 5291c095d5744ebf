use asana_sense::{cli, config, display, error, frame, listen, session, wake};
use asana_sense_common::build_coaching_prompt;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{AsanaError, Result};
use frame::FrameSource;
use indicatif::{ProgressBar, ProgressStyle};
use session::{CaptureTrigger, FeedbackSession};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env があれば読み込む（GOOGLE_API_KEY）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    match cli.command {
        Commands::Capture { image, pose, speak_to, json } => {
            println!("🧘 asana-sense - ポーズ解析\n");

            let client = asana_sense::coach::GeminiClient::from_config(&config)?;
            let mut session = FeedbackSession::new(client, build_coaching_prompt(pose.as_deref()));

            // 1. 撮影
            println!("[1/2] フレームを取得中...");
            let source = frame::frame_source_for(&image, config.max_image_size)?;
            let frame = source.capture()?;
            println!("✔ {} ({} bytes)\n", frame.source, frame.bytes.len());

            // 2. AI解析
            println!("[2/2] AI解析中... ({})", config.model);
            let spinner = spinner("フィードバックを待っています");
            let outcome = session.capture(frame, CaptureTrigger::Button).await;
            spinner.finish_and_clear();
            let latest = outcome?;

            if json {
                println!("{}", serde_json::to_string_pretty(&latest.result)?);
            } else {
                println!("{}", display::format_feedback(latest));
                println!("\n🔊 {}", latest.result.spoken_text());
            }

            if let Some(path) = speak_to {
                display::write_speech_text(&path, latest)?;
                println!("✔ 読み上げテキストを保存: {}", path.display());
            }
        }

        Commands::Listen { frames, transcript, wake_word, pose, speak_to } => {
            let word = wake_word.unwrap_or_else(|| config.wake_word.clone());
            let detector = wake::WakeWordDetector::new(&word)?;
            let source = frame::frame_source_for(&frames, config.max_image_size)?;

            let client = asana_sense::coach::GeminiClient::from_config(&config)?;
            let mut session = FeedbackSession::new(client, build_coaching_prompt(pose.as_deref()));

            println!("🧘 asana-sense - ハンズフリー");
            println!("  フレーム: {}", source.describe());
            println!("  「{}」と言うか Enter で撮影します\n", detector.word());

            let options = listen::ListenOptions { detector, speak_to };
            let mut out = std::io::stdout();

            let summary = match transcript {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .map_err(|_| AsanaError::FileNotFound(path.display().to_string()))?;
                    let reader = tokio::io::BufReader::new(file);
                    listen::run_listen(&mut session, source.as_ref(), &options, reader, &mut out).await?
                }
                None => {
                    let reader = tokio::io::BufReader::new(tokio::io::stdin());
                    listen::run_listen(&mut session, source.as_ref(), &options, reader, &mut out).await?
                }
            };

            println!(
                "\n✅ 終了（撮影 {}回 / 失敗 {}回）",
                summary.captures, summary.failures
            );
        }

        Commands::Config { set_api_key, set_model, set_wake_word, show } => {
            if let Some(key) = set_api_key {
                let key = if key.is_empty() {
                    dialoguer::Password::new()
                        .with_prompt("Google APIキー")
                        .interact()
                        .map_err(|e| AsanaError::Config(e.to_string()))?
                } else {
                    key
                };
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.model = model;
                config.save()?;
                println!("✔ モデルを設定しました");
            }

            if let Some(word) = set_wake_word {
                // 検出器が作れない語は保存しない
                let detector = wake::WakeWordDetector::new(&word)?;
                config.wake_word = detector.word().to_string();
                config.save()?;
                println!("✔ ウェイクワードを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ウェイクワード: {}", config.wake_word);
                println!("  APIキー: {}", if config.has_api_key() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
