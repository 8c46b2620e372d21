use std::io::{
    self,
    Write,
};

use tokio::io::{
    AsyncBufReadExt,
    BufReader,
};
use tracing::debug;

use super::speak_record;
use crate::{
    app::{
        render::render_view,
        App,
        Notice,
        Tab,
        TutorContext,
    },
    core::GengoError,
    model::ModelGateway,
    persistence::SnapshotStore,
    speech::CommandSpeaker,
};

pub const HELP: &str = "\
Type a sentence to analyze it.
  ?<question>      ask the tutor about the current sentence
  :tab <name>      switch to analyze, tutor, history or vocab
  :search <term>   filter the history or vocabulary tab (empty clears)
  :show <id>       open a history record
  :delete <id>     remove a history record
  :speak [id]      read the current (or given) sentence aloud
  :clear           remove every history record
  :help            show this help
  :quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Analyze(String),
    Ask(String),
    Tab(Tab),
    Search(String),
    Show(String),
    Delete(String),
    Speak(Option<String>),
    Clear,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, GengoError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Empty);
        }
        if let Some(question) = line.strip_prefix('?') {
            return Ok(ShellCommand::Ask(question.trim().to_string()));
        }
        let Some(command) = line.strip_prefix(':') else {
            return Ok(ShellCommand::Analyze(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        let required = |what: &str| {
            if arg.is_empty() {
                Err(GengoError::InvalidInput(format!(":{name} needs {what}")))
            } else {
                Ok(arg.to_string())
            }
        };

        match name.to_lowercase().as_str() {
            "tab" | "t" => Ok(ShellCommand::Tab(required("a tab name")?.parse()?)),
            "search" | "s" => Ok(ShellCommand::Search(arg.to_string())),
            "show" => Ok(ShellCommand::Show(required("a record id")?)),
            "delete" | "rm" => Ok(ShellCommand::Delete(required("a record id")?)),
            "speak" => Ok(ShellCommand::Speak(Some(arg.to_string()).filter(|a| !a.is_empty()))),
            "clear" => Ok(ShellCommand::Clear),
            "help" | "h" => Ok(ShellCommand::Help),
            "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
            other => {
                Err(GengoError::InvalidInput(format!("unknown command ':{other}', try :help")))
            }
        }
    }
}

async fn execute<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    speaker: &CommandSpeaker,
    command: ShellCommand,
) -> Result<(), GengoError> {
    match command {
        ShellCommand::Analyze(sentence) => app.analyze(&sentence).await.map(|_| ()),
        ShellCommand::Ask(question) => {
            let context = match app.state().selected {
                Some(id) => TutorContext::Record(id),
                None => TutorContext::MostRecent,
            };
            app.ask(&question, context).await.map(|_| ())
        }
        ShellCommand::Tab(tab) => {
            app.set_tab(tab);
            Ok(())
        }
        ShellCommand::Search(term) => {
            app.set_search(&term);
            Ok(())
        }
        ShellCommand::Show(key) => app.select(&key).map(|_| ()),
        ShellCommand::Delete(key) => {
            let id = app.history().find(&key)?.id;
            app.delete(&id).map(|_| ())
        }
        ShellCommand::Speak(key) => speak_record(app, speaker, key.as_deref()).await,
        ShellCommand::Clear => app.clear_history().map(|_| ()),
        ShellCommand::Help | ShellCommand::Quit | ShellCommand::Empty => Ok(()),
    }
}

pub async fn run_shell<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    speaker: &CommandSpeaker,
    styled: bool,
) -> Result<(), GengoError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render_view(app, styled));

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Empty => continue,
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            command => {
                if let Err(e) = execute(app, speaker, command).await {
                    debug!("Shell command failed: {}", e);
                    app.state_mut().notice = Some(Notice::error(e.user_message()));
                }
            }
        }

        println!("{}", render_view(app, styled));
    }

    Ok(())
}
