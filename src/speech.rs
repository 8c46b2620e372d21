use tokio::process::Command;
use tracing::debug;

use crate::core::GengoError;

pub const DEFAULT_LOCALE: &str = "en-US";

// Order matters: "cantonese" must be checked before the generic "chinese".
const LOCALES: &[(&str, &str)] = &[
    ("japanese", "ja-JP"),
    ("cantonese", "zh-HK"),
    ("chinese", "zh-CN"),
    ("mandarin", "zh-CN"),
    ("korean", "ko-KR"),
    ("spanish", "es-ES"),
    ("french", "fr-FR"),
    ("german", "de-DE"),
    ("italian", "it-IT"),
    ("portuguese", "pt-BR"),
    ("russian", "ru-RU"),
    ("arabic", "ar-SA"),
    ("hindi", "hi-IN"),
    ("thai", "th-TH"),
    ("vietnamese", "vi-VN"),
    ("indonesian", "id-ID"),
    ("dutch", "nl-NL"),
    ("turkish", "tr-TR"),
    ("polish", "pl-PL"),
    ("swedish", "sv-SE"),
    ("greek", "el-GR"),
    ("english", "en-US"),
];

pub fn locale_for_language(language: &str) -> &'static str {
    let language = language.to_lowercase();
    LOCALES
        .iter()
        .find(|(name, _)| language.contains(name))
        .map(|(_, locale)| *locale)
        .unwrap_or(DEFAULT_LOCALE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub locale: &'static str,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, language: &str) -> Self {
        Self { text: text.into(), locale: locale_for_language(language) }
    }

    /// Primary language subtag, e.g. `ja` for `ja-JP`.
    pub fn lang(&self) -> &'static str {
        self.locale.split('-').next().unwrap_or(self.locale)
    }
}

/// Plays speech through an external program described by an argv template with
/// `{locale}`, `{lang}` and `{text}` placeholders.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    template: Option<Vec<String>>,
}

impl CommandSpeaker {
    pub fn new(template: Option<Vec<String>>) -> Self {
        Self { template: template.filter(|argv| !argv.is_empty()) }
    }

    pub fn command_line(&self, request: &SpeechRequest) -> Result<Vec<String>, GengoError> {
        let template = self.template.as_ref().ok_or_else(|| {
            GengoError::Configuration("no speech_command configured in settings.json".to_string())
        })?;

        Ok(template
            .iter()
            .map(|arg| {
                arg.replace("{locale}", request.locale)
                    .replace("{lang}", request.lang())
                    .replace("{text}", &request.text)
            })
            .collect())
    }

    pub async fn speak(&self, request: &SpeechRequest) -> Result<(), GengoError> {
        let argv = self.command_line(request)?;
        let Some((program, args)) = argv.split_first() else {
            return Err(GengoError::Configuration("speech_command is empty".to_string()));
        };

        debug!("Speaking via {} ({})", program, request.locale);
        let status = Command::new(program).args(args).status().await?;
        if !status.success() {
            return Err(GengoError::Service(format!("{program} exited with {status}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_for_language() {
        assert_eq!(locale_for_language("Japanese"), "ja-JP");
        assert_eq!(locale_for_language("japanese (casual)"), "ja-JP");
        assert_eq!(locale_for_language("Chinese (Mandarin)"), "zh-CN");
        assert_eq!(locale_for_language("Cantonese Chinese"), "zh-HK");
        assert_eq!(locale_for_language("Brazilian Portuguese"), "pt-BR");
        assert_eq!(locale_for_language("Klingon"), DEFAULT_LOCALE);
        assert_eq!(locale_for_language(""), DEFAULT_LOCALE);
    }

    #[test]
    fn test_command_line_substitutes_placeholders() {
        let speaker = CommandSpeaker::new(Some(vec![
            "espeak-ng".to_string(),
            "-v".to_string(),
            "{lang}".to_string(),
            "{text}".to_string(),
        ]));
        let request = SpeechRequest::new("猫はベッドで寝ています", "Japanese");
        assert_eq!(
            speaker.command_line(&request).unwrap(),
            vec!["espeak-ng", "-v", "ja", "猫はベッドで寝ています"]
        );
    }

    #[test]
    fn test_missing_template_is_configuration_error() {
        let request = SpeechRequest::new("hola", "Spanish");
        assert!(matches!(
            CommandSpeaker::new(None).command_line(&request),
            Err(GengoError::Configuration(_))
        ));
        assert!(matches!(
            CommandSpeaker::new(Some(Vec::new())).command_line(&request),
            Err(GengoError::Configuration(_))
        ));
    }
}
