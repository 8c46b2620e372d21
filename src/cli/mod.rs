//! Command-line surface: one-shot subcommands and the interactive shell.

use std::{
    fs::File,
    io::{
        self,
        BufWriter,
        IsTerminal,
    },
    path::PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};
use tracing::{
    debug,
    info,
};

use crate::{
    app::{
        render::{
            render_answer,
            render_history,
            render_record,
            render_vocabulary,
        },
        App,
        TutorContext,
    },
    core::{
        Config,
        GengoError,
        Overrides,
    },
    history::HistoryStore,
    model::{
        GeminiGateway,
        ModelGateway,
    },
    persistence::{
        FileStore,
        SnapshotStore,
    },
    speech::{
        CommandSpeaker,
        SpeechRequest,
    },
    vocabulary,
};

pub mod shell;

#[derive(Parser, Debug)]
#[command(name = "gengo")]
#[command(about = "Sentence breakdowns and a language tutor backed by a generative model")]
#[command(version)]
pub struct Cli {
    /// Directory holding settings.json and the history snapshot
    #[arg(long, global = true, env = "GENGO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Model credential (falls back to API_KEY)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name, overriding settings.json
    #[arg(long, global = true, env = "GENGO_MODEL")]
    pub model: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Break a sentence down and add it to history
    Analyze {
        #[arg(required = true, num_args = 1..)]
        sentence: Vec<String>,
    },

    /// Ask the tutor a question, by default about the most recent sentence
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Record id (or its short form) to ask about
        #[arg(long, conflicts_with = "no_context")]
        about: Option<String>,

        /// Ask without any sentence context
        #[arg(long)]
        no_context: bool,
    },

    /// List analyzed sentences, newest first
    History {
        #[arg(long, short)]
        search: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record in full
    Show { id: String },

    /// Remove one record from history
    Delete { id: String },

    /// Remove every record from history
    Clear {
        #[arg(long)]
        yes: bool,
    },

    /// List the vocabulary collected across history
    Vocab {
        #[arg(long, short)]
        search: Option<String>,

        /// Write the (filtered) list as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Read a recorded sentence aloud through the configured speech command
    Speak { id: String },

    /// Interactive session (the default)
    Shell,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
        }
    }
}

/// Line shown on stderr when a command fails. The full error only goes to the debug log.
pub fn failure_message(error: &GengoError) -> String {
    debug!("Command failed: {}", error);
    error.user_message()
}

pub async fn run(cli: Cli) -> Result<(), GengoError> {
    let config = Config::resolve(cli.overrides());

    let history = HistoryStore::open(FileStore::new(&config.data_dir), config.history_key.clone());
    info!(
        "History '{}' stored in {}",
        history.key(),
        history.storage().dir().display()
    );
    let gateway = GeminiGateway::new(&config)?;
    info!("Using {} model {}", gateway.name(), gateway.model());
    let speaker = CommandSpeaker::new(config.speech_command.clone());
    let mut app = App::new(gateway, history);
    let styled = io::stdout().is_terminal();

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Analyze { sentence } => cmd_analyze(&mut app, &sentence.join(" "), styled).await,
        Commands::Ask { question, about, no_context } => {
            cmd_ask(&mut app, &question.join(" "), about.as_deref(), no_context, styled).await
        }
        Commands::History { search, json } => cmd_history(&app, search.as_deref(), json, styled),
        Commands::Show { id } => cmd_show(&app, &id, styled),
        Commands::Delete { id } => cmd_delete(&mut app, &id),
        Commands::Clear { yes } => cmd_clear(&mut app, yes),
        Commands::Vocab { search, export } => cmd_vocab(&app, search.as_deref(), export, styled),
        Commands::Speak { id } => cmd_speak(&app, &speaker, &id).await,
        Commands::Shell => shell::run_shell(&mut app, &speaker, styled).await,
    }
}

async fn cmd_analyze<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    sentence: &str,
    styled: bool,
) -> Result<(), GengoError> {
    let record = app.analyze(sentence).await?;
    println!("{}", render_record(&record, styled));
    Ok(())
}

fn tutor_context<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    about: Option<&str>,
    no_context: bool,
) -> Result<TutorContext, GengoError> {
    if no_context {
        return Ok(TutorContext::Nothing);
    }
    match about {
        Some(key) => Ok(TutorContext::Record(app.history().find(key)?.id)),
        None => Ok(TutorContext::MostRecent),
    }
}

async fn cmd_ask<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    question: &str,
    about: Option<&str>,
    no_context: bool,
    styled: bool,
) -> Result<(), GengoError> {
    let context = tutor_context(app, about, no_context)?;
    let answer = app.ask(question, context).await?;
    println!("{}", render_answer(&answer, styled));
    Ok(())
}

fn cmd_history<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    search: Option<&str>,
    json: bool,
    styled: bool,
) -> Result<(), GengoError> {
    let records = app.history().search(search.unwrap_or_default());
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", render_history(&records, styled));
    }
    Ok(())
}

fn cmd_show<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    id: &str,
    styled: bool,
) -> Result<(), GengoError> {
    let record = app.history().find(id)?;
    println!("{}", render_record(record, styled));
    Ok(())
}

fn cmd_delete<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    id: &str,
) -> Result<(), GengoError> {
    let record = app.history().find(id)?.clone();
    app.delete(&record.id)?;
    println!("Deleted [{}] {}", record.short_id(), record.original_text);
    Ok(())
}

fn cmd_clear<G: ModelGateway, S: SnapshotStore>(
    app: &mut App<G, S>,
    yes: bool,
) -> Result<(), GengoError> {
    if !yes {
        return Err(GengoError::InvalidInput(
            "clearing history cannot be undone, pass --yes to confirm".to_string(),
        ));
    }
    let removed = app.clear_history()?;
    println!("Removed {removed} record(s).");
    Ok(())
}

fn cmd_vocab<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    search: Option<&str>,
    export: Option<PathBuf>,
    styled: bool,
) -> Result<(), GengoError> {
    let entries = vocabulary::build(app.history().all());
    let entries = vocabulary::filter(&entries, search.unwrap_or_default());

    match export {
        Some(path) => {
            let file = File::create(&path)?;
            let written = vocabulary::export_csv(&entries, BufWriter::new(file))?;
            println!("Exported {} word(s) to {}", written, path.display());
        }
        None => println!("{}", render_vocabulary(&entries, styled)),
    }
    Ok(())
}

pub(crate) async fn speak_record<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    speaker: &CommandSpeaker,
    id: Option<&str>,
) -> Result<(), GengoError> {
    let record = match id {
        Some(key) => app.history().find(key)?,
        None => app
            .current_record()
            .ok_or_else(|| GengoError::InvalidInput("there is nothing to speak yet".to_string()))?,
    };
    let request = SpeechRequest::new(record.original_text.clone(), &record.detected_language);
    speaker.speak(&request).await
}

async fn cmd_speak<G: ModelGateway, S: SnapshotStore>(
    app: &App<G, S>,
    speaker: &CommandSpeaker,
    id: &str,
) -> Result<(), GengoError> {
    speak_record(app, speaker, Some(id)).await
}
