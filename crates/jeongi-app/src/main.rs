//! jeongi terminal client - composition root.
//!
//! Wires the conversation controllers to the HTTP transports and the SQLite
//! snapshot store:
//! 1. Load configuration from TOML
//! 2. Open the snapshot database
//! 3. Run the selected session loop (chat or document QA) over stdin

mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;

use jeongi_chat::{ChatController, DocumentQaController};
use jeongi_core::types::{Message, Role};
use jeongi_core::JeongiConfig;
use jeongi_storage::SqliteStore;
use jeongi_transport::{DocumentFile, HttpChatTransport, HttpDocumentQaTransport};

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = CliArgs::parse();
    let config = JeongiConfig::load_or_default(&args.resolve_config_path());
    let base_url = args.resolve_server(&config.server.base_url);
    tracing::info!(server = %base_url, "Starting jeongi v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Chat => run_chat(&args, &config, &base_url).await?,
        Command::Doc { ref file } => run_doc(file, &config, &base_url).await?,
    }
    Ok(())
}

async fn run_chat(
    args: &CliArgs,
    config: &JeongiConfig,
    base_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&args.resolve_data_dir().join("snapshots.db"))?;
    let controller = ChatController::new(
        HttpChatTransport::new(base_url),
        Arc::new(store),
        config.chat.clone(),
    );
    controller.initialize();

    for message in &controller.snapshot().messages {
        print_message(message);
    }
    print_suggestions(&controller.snapshot().suggestions);
    println!("(/reset 새 대화, /quit 종료, 번호 입력으로 추천 질문 선택)");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "/quit" | "/exit" => break,
            "/reset" => {
                controller.reset_session();
                print_message(&controller.snapshot().messages[0]);
                print_suggestions(&controller.snapshot().suggestions);
                continue;
            }
            _ => {}
        }

        let before = controller.snapshot().messages.len();
        // A bare number picks the corresponding suggestion.
        let suggestions = controller.snapshot().suggestions;
        match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= suggestions.len() => {
                controller.select_suggestion(&suggestions[n - 1]).await;
            }
            _ => controller.submit(input).await,
        }

        let view = controller.snapshot();
        for message in &view.messages[before..] {
            print_message(message);
        }
        print_suggestions(&view.suggestions);
    }
    Ok(())
}

async fn run_doc(
    file: &std::path::Path,
    config: &JeongiConfig,
    base_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = DocumentQaController::new(
        HttpDocumentQaTransport::new(base_url),
        config.document.clone(),
    );

    let document = DocumentFile::from_path(file)?;
    if let Err(e) = controller.bind_document(document) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    println!("{}", controller.snapshot().status);
    println!("(/quit 종료)");

    let stdin = io::stdin();
    loop {
        print!("ask> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input == "/quit" || input == "/exit" {
            break;
        }

        let before = controller.snapshot().messages.len();
        controller.ask(input).await;

        let view = controller.snapshot();
        for message in &view.messages[before..] {
            print_message(message);
        }
    }
    Ok(())
}

fn print_message(message: &Message) {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "jeongi",
    };
    println!("[{}] {}", speaker, message.content);
    for source in &message.sources {
        match source.page {
            Some(page) => println!("        (p.{}) {}", page, source.source),
            None => println!("        (p.?) {}", source.source),
        }
    }
}

fn print_suggestions(suggestions: &[String]) {
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, suggestion);
    }
}
