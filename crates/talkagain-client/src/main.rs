//! Terminal client for a running TalkAgain server.
//!
//! Text mode only: pick a character, then type. `/new` starts over,
//! `/coach on|off` toggles coaching, `/say <path>` saves the last reply as
//! MP3, `/quit` exits.

use async_trait::async_trait;
use std::sync::Arc;
use talkagain_client::{AudioPlayer, ClientError, Conversation, ServerApi, SessionState};
use talkagain_types::{ChatMode, Character, Role};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// A terminal has no speaker; replies are saved with `/say` instead.
struct NoPlayback;

#[async_trait]
impl AudioPlayer for NoPlayback {
    async fn play(&self, _audio: Vec<u8>) -> Result<(), ClientError> {
        Ok(())
    }

    fn halt(&self) {}
}

fn resolve_server_url() -> String {
    if let Some(url) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return url;
    }
    match std::env::var("TALKAGAIN_SERVER_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_SERVER_URL.to_string(),
    }
}

fn print_message(role: Role, content: &str) {
    let who = match role {
        Role::User => "you",
        Role::Assistant => "them",
    };
    println!("[{}] {}\n", who, content);
}

async fn choose_character(
    lines: &mut Lines<BufReader<Stdin>>,
    characters: &[Character],
) -> Result<Option<Character>, ClientError> {
    println!("Who would you like to practice with?");
    for (i, c) in characters.iter().enumerate() {
        println!("  {}. {} ({}) - {}", i + 1, c.name, c.age, c.personality);
    }
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 && n <= characters.len() => {
                return Ok(Some(characters[n - 1].clone()));
            }
            _ => println!("Enter a number between 1 and {}.", characters.len()),
        }
    }
    Ok(None)
}

async fn run(api: ServerApi) -> Result<(), ClientError> {
    let characters = api.characters().await?;
    if characters.is_empty() {
        println!("The server has no characters configured.");
        return Ok(());
    }

    let backend = Arc::new(api);
    let mut conversation = Conversation::new(
        SessionState::new(ChatMode::Text, true),
        backend,
        Arc::new(NoPlayback),
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    'session: loop {
        let Some(character) = choose_character(&mut lines, &characters).await? else {
            break;
        };
        conversation.start(character);
        for m in &conversation.state().messages {
            print_message(m.role, &m.content);
        }

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            match line.split_once(' ').unwrap_or((line, "")) {
                ("/quit", _) => break 'session,
                ("/new", _) => {
                    conversation.new_session();
                    continue 'session;
                }
                ("/coach", arg) => {
                    let state = conversation.state_mut();
                    match arg.trim() {
                        "on" => state.coaching_enabled = true,
                        "off" => state.coaching_enabled = false,
                        _ => {}
                    }
                    println!(
                        "Coaching is {}.",
                        if state.coaching_enabled { "on" } else { "off" }
                    );
                }
                ("/say", path) if !path.trim().is_empty() => {
                    match conversation.last_reply_audio().await {
                        Ok(Some(audio)) => {
                            tokio::fs::write(path.trim(), &audio).await?;
                            println!("Saved {} bytes to {}.", audio.len(), path.trim());
                        }
                        Ok(None) => println!("Nothing to say yet."),
                        Err(e) => println!("Could not synthesize speech: {}", e),
                    }
                }
                _ => match conversation.send_message(line).await {
                    Ok(Some(reply)) => {
                        print_message(Role::Assistant, &reply);
                        if let Some(notice) = conversation.take_notice() {
                            println!("({})", notice);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "reply failed");
                        print_message(Role::Assistant, talkagain_client::APOLOGY_REPLY);
                        println!("({})", e);
                    }
                },
            }
        }
        break;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let server_url = resolve_server_url();
    tracing::info!(%server_url, "connecting to talkagain server");

    let api = ServerApi::new(server_url).expect("failed to build HTTP client");
    if let Err(e) = run(api).await {
        eprintln!("talkagain: {}", e);
        std::process::exit(1);
    }
}
