use crate::core::{
    AnalysisPayload,
    GengoError,
};

pub fn parse_analysis(raw: &str) -> Result<AnalysisPayload, GengoError> {
    if raw.trim().is_empty() {
        return Err(GengoError::MalformedResponse("no analysis was returned".to_string()));
    }

    serde_json::from_str(raw).map_err(|e| {
        GengoError::MalformedResponse(format!("analysis does not match schema: {e}"))
    })
}

pub fn parse_tutor_answer(raw: Option<&str>) -> Result<String, GengoError> {
    match raw {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(GengoError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn well_formed() -> serde_json::Value {
        json!({
            "language": "Japanese",
            "translation": "The cat is sleeping on the bed",
            "grammarPoints": [
                { "pattern": "〜ています", "explanation": "Ongoing action" }
            ],
            "vocabulary": [
                { "word": "猫", "reading": "ねこ", "meaning": "cat", "partOfSpeech": "noun" },
                {
                    "word": "寝る",
                    "reading": "ねる",
                    "meaning": "to sleep",
                    "partOfSpeech": "verb"
                }
            ]
        })
    }

    #[test]
    fn test_parse_well_formed_analysis() {
        let payload = parse_analysis(&well_formed().to_string()).unwrap();
        assert_eq!(payload.language, "Japanese");
        assert_eq!(payload.translation, "The cat is sleeping on the bed");
        assert_eq!(payload.grammar_points.len(), 1);
        assert_eq!(payload.grammar_points[0].pattern, "〜ています");
        assert_eq!(payload.vocabulary[1].part_of_speech, "verb");
    }

    #[test]
    fn test_parse_tolerates_extra_fields() {
        let mut value = well_formed();
        value["formality"] = json!("casual");
        assert!(parse_analysis(&value.to_string()).is_ok());
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let mut value = well_formed();
        value.as_object_mut().unwrap().remove("vocabulary");
        let err = parse_analysis(&value.to_string()).unwrap_err();
        assert!(matches!(err, GengoError::MalformedResponse(_)));
        assert!(err.to_string().contains("vocabulary"));
    }

    #[test]
    fn test_parse_wrong_type_is_malformed() {
        let mut value = well_formed();
        value["grammarPoints"] = json!("none");
        assert!(matches!(
            parse_analysis(&value.to_string()),
            Err(GengoError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_free_text_is_malformed() {
        assert!(matches!(
            parse_analysis("Sure! Here is the breakdown: ..."),
            Err(GengoError::MalformedResponse(_))
        ));
        assert!(matches!(parse_analysis(""), Err(GengoError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_accepts_empty_translation() {
        let raw = r#"{"language":"English","translation":"","grammarPoints":[],"vocabulary":[]}"#;
        let payload = parse_analysis(raw).unwrap();
        assert_eq!(payload.language, "English");
        assert_eq!(payload.translation, "");

        let mut value = well_formed();
        value["translation"] = json!("  ");
        assert_eq!(parse_analysis(&value.to_string()).unwrap().translation, "  ");
    }

    #[test]
    fn test_parse_tutor_answer() {
        let answer = parse_tutor_answer(Some("**は** marks the topic")).unwrap();
        assert_eq!(answer, "**は** marks the topic");
        assert!(matches!(parse_tutor_answer(Some("  \n")), Err(GengoError::EmptyResponse)));
        assert!(matches!(parse_tutor_answer(None), Err(GengoError::EmptyResponse)));
    }
}
