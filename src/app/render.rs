use std::{
    fmt::Write as _,
    sync::OnceLock,
};

use regex::Regex;

use super::{
    App,
    Notice,
    NoticeLevel,
    Tab,
};
use crate::{
    core::{
        AnalysisRecord,
        TutorAnswer,
    },
    model::ModelGateway,
    persistence::SnapshotStore,
    vocabulary::VocabEntry,
};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn bold_span() -> Option<&'static Regex> {
    static BOLD_SPAN: OnceLock<Option<Regex>> = OnceLock::new();
    BOLD_SPAN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").ok()).as_ref()
}

fn emphasize(text: &str, styled: bool) -> String {
    if styled {
        format!("{BOLD}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn dim(text: &str, styled: bool) -> String {
    if styled {
        format!("{DIM}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Turns the tutor's lightweight markup into terminal text: `**bold**` spans and
/// `* ` / `- ` bullet lines.
pub fn render_markup(text: &str, styled: bool) -> String {
    let replacement = if styled { format!("{BOLD}$1{RESET}") } else { "$1".to_string() };

    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            let line = match trimmed.strip_prefix("* ").or_else(|| trimmed.strip_prefix("- ")) {
                Some(rest) => format!("{indent}• {rest}"),
                None => line.to_string(),
            };
            match bold_span() {
                Some(re) => re.replace_all(&line, replacement.as_str()).into_owned(),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_record(record: &AnalysisRecord, styled: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        dim(
            &format!(
            "[{}] {} · {}",
            record.short_id(),
            record.format_created_at(),
            record.detected_language
        ),
            styled
        )
    );
    let _ = writeln!(out, "{}", emphasize(&record.original_text, styled));
    let _ = writeln!(out, "{}", record.translation);

    if !record.grammar_points.is_empty() {
        let _ = writeln!(out, "\n{}", emphasize("Grammar", styled));
        for point in &record.grammar_points {
            let _ = writeln!(
                out,
                "  • {}: {}",
                emphasize(&point.pattern, styled),
                point.explanation
            );
        }
    }

    if !record.vocabulary.is_empty() {
        let _ = writeln!(out, "\n{}", emphasize("Vocabulary", styled));
        for item in &record.vocabulary {
            let _ = writeln!(
                out,
                "  • {} ({}) {} {}",
                emphasize(&item.word, styled),
                item.reading,
                item.meaning,
                dim(&format!("[{}]", item.part_of_speech), styled)
            );
        }
    }

    out.trim_end().to_string()
}

pub fn render_history(records: &[&AnalysisRecord], styled: bool) -> String {
    if records.is_empty() {
        return "No history yet.".to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "{} {} {}  →  {}",
                dim(&record.short_id(), styled),
                dim(&format!("{:<10}", record.detected_language), styled),
                record.original_text,
                record.translation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_vocabulary(entries: &[VocabEntry], styled: bool) -> String {
    if entries.is_empty() {
        return "No vocabulary yet.".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            emphasize(&entry.word, styled),
            entry.reading,
            entry.meaning,
            dim(&format!("[{} · {}]", entry.part_of_speech, entry.language), styled)
        );
    }
    let _ = write!(out, "{}", dim(&format!("{} word(s)", entries.len()), styled));
    out
}

pub fn render_answer(answer: &TutorAnswer, styled: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", emphasize("Q:", styled), answer.question);
    if let Some(sentence) = &answer.related_sentence {
        let _ = writeln!(out, "{}", dim(&format!("(about \"{sentence}\")"), styled));
    }
    let _ = writeln!(out);
    out.push_str(&render_markup(answer.answer.trim_end(), styled));
    out
}

pub fn render_notice(notice: &Notice, styled: bool) -> String {
    match (notice.level, styled) {
        (NoticeLevel::Error, true) => format!("{RED}! {}{RESET}", notice.message),
        (NoticeLevel::Error, false) => format!("! {}", notice.message),
        (NoticeLevel::Info, _) => dim(&notice.message, styled),
    }
}

fn render_tab_bar(current: Tab, styled: bool) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == current {
                emphasize(&format!("[{}]", tab.title()), styled)
            } else {
                dim(&format!(" {} ", tab.title()), styled)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full screen for the current tab, with the tab bar on top and the notice, if any, at the bottom.
pub fn render_view<G: ModelGateway, S: SnapshotStore>(app: &App<G, S>, styled: bool) -> String {
    let state = app.state();
    let body = match state.tab {
        Tab::Analyze => match app.current_record() {
            Some(record) => render_record(record, styled),
            None => "Type a sentence to analyze it.".to_string(),
        },
        Tab::Tutor => match &state.current_answer {
            Some(answer) => render_answer(answer, styled),
            None => "Ask the tutor a question with ?<question>.".to_string(),
        },
        Tab::History => render_history(&app.history_view(), styled),
        Tab::Vocabulary => render_vocabulary(&app.vocabulary(), styled),
    };

    let mut out = render_tab_bar(state.tab, styled);
    out.push_str("\n\n");
    out.push_str(&body);
    if let Some(notice) = &state.notice {
        out.push_str("\n\n");
        out.push_str(&render_notice(notice, styled));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AnalysisPayload,
        GrammarPoint,
        VocabularyItem,
    };

    fn record() -> AnalysisRecord {
        AnalysisRecord::from_payload(
            AnalysisPayload {
                language: "Japanese".to_string(),
                translation: "The cat is sleeping on the bed".to_string(),
                grammar_points: vec![GrammarPoint {
                    pattern: "〜ています".to_string(),
                    explanation: "Ongoing action".to_string(),
                }],
                vocabulary: vec![VocabularyItem {
                    word: "猫".to_string(),
                    reading: "ねこ".to_string(),
                    meaning: "cat".to_string(),
                    part_of_speech: "noun".to_string(),
                }],
            },
            "猫はベッドで寝ています",
        )
    }

    #[test]
    fn test_render_markup_plain() {
        let text = "**は** marks the topic.\n* first\n  - nested **point**\nplain line";
        assert_eq!(
            render_markup(text, false),
            "は marks the topic.\n• first\n  • nested point\nplain line"
        );
    }

    #[test]
    fn test_render_markup_styled() {
        assert_eq!(render_markup("**は**", true), format!("{BOLD}は{RESET}"));
        assert_eq!(render_markup("a ** b", true), "a ** b");
    }

    #[test]
    fn test_render_record_plain() {
        let record = record();
        let text = render_record(&record, false);
        assert!(text.starts_with(&format!("[{}]", record.short_id())));
        assert!(text.contains("猫はベッドで寝ています\nThe cat is sleeping on the bed"));
        assert!(text.contains("  • 〜ています: Ongoing action"));
        assert!(text.contains("  • 猫 (ねこ) cat [noun]"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_empty_lists() {
        assert_eq!(render_history(&[], false), "No history yet.");
        assert_eq!(render_vocabulary(&[], false), "No vocabulary yet.");
    }

    #[test]
    fn test_render_answer_with_context() {
        let answer =
            TutorAnswer::new("What is は?", "* **topic** marker", Some("猫は".to_string()));
        assert_eq!(
            render_answer(&answer, false),
            "Q: What is は?\n(about \"猫は\")\n\n• topic marker"
        );
    }

    #[test]
    fn test_render_notice() {
        assert_eq!(render_notice(&Notice::error("boom"), false), "! boom");
        assert_eq!(render_notice(&Notice::info("done"), false), "done");
    }
}
