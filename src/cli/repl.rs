use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::connector::api::controller::{ChatController, ChatEvent, ChatState};
use crate::connector::api::Container;
use crate::domain::ModelIdentifier;

const HELP: &str = "\
Type a question and press enter. Commands:
  /history          show this session's messages
  /models           list allowed and downloadable models
  /use <model>      switch model
  /pull <model>     download an allowed model (restarts the session)
  /upload <file>    chat about another file (starts a new session)
  /quit             leave";

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Event(ChatEvent),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> Option<ReplInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(ReplInput::Event(ChatEvent::Ask(line.to_string())));
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (line, ""),
    };

    let input = match command {
        "/quit" | "/exit" => ReplInput::Quit,
        "/help" => ReplInput::Help,
        "/history" => ReplInput::Event(ChatEvent::History),
        "/models" => ReplInput::Event(ChatEvent::Models),
        "/pull" | "/use" => match ModelIdentifier::new(arg) {
            Ok(model) if command == "/pull" => ReplInput::Event(ChatEvent::Pull(model)),
            Ok(model) => ReplInput::Event(ChatEvent::UseModel(model)),
            Err(_) => ReplInput::Invalid(format!("usage: {command} <model>")),
        },
        "/upload" if !arg.is_empty() => ReplInput::Event(ChatEvent::Upload(PathBuf::from(arg))),
        "/upload" => ReplInput::Invalid("usage: /upload <file>".to_string()),
        other => ReplInput::Invalid(format!("unknown command {other}, try /help")),
    };
    Some(input)
}

/// Read lines from stdin and feed them to the chat controller until `/quit`
/// or end of input. Each line is handled to completion before the next is read.
pub async fn run(container: &Container, file: PathBuf, model: Option<ModelIdentifier>) -> Result<()> {
    let controller = ChatController::new(container);
    let (mut state, started): (ChatState, _) = controller.start(&file, model).await?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{}\n", started.render()).as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_line(&line) {
            None => continue,
            Some(ReplInput::Quit) => break,
            Some(ReplInput::Help) => HELP.to_string(),
            Some(ReplInput::Invalid(msg)) => msg,
            Some(ReplInput::Event(event)) => controller.dispatch(&mut state, event).await.render(),
        };
        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }

    Ok(())
}
