/*!
 * Tests for application configuration
 */

use std::path::PathBuf;
use asscribe::app_config::{CaptionStyle, Config, LogLevel};

/// Test the built-in defaults
#[test]
fn test_default_config_shouldUseBuiltInValues() {
    let config = Config::default();

    assert_eq!(config.template_dir, PathBuf::from("ass-config-templates"));
    assert_eq!(config.brand, "codify");
    assert_eq!(config.style, CaptionStyle::Clean);
    assert_eq!(config.karaoke.style_name, "karaoke");
    assert_eq!(config.karaoke.word_duration_cs, 50);
    assert_eq!(config.transcription.command, "whisper-ctranslate2");
    assert_eq!(config.transcription.model, "small");
    assert_eq!(config.transcription.beam_size, 5);
    assert_eq!(config.probe.command, "ffprobe");
    assert_eq!(config.filter.font_name, "Roboto Medium");
    assert_eq!(config.filter.font_size, 48);
    assert!(config.parallel_orientations);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a sparse JSON file is completed with defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "brand": "fancy",
        "style": "karaoke",
        "karaoke": { "word_duration_cs": 0 },
        "parallel_orientations": false
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.brand, "fancy");
    assert_eq!(config.style, CaptionStyle::Karaoke);
    assert_eq!(config.karaoke.word_duration_cs, 0);
    assert_eq!(config.karaoke.style_name, "karaoke");
    assert!(!config.parallel_orientations);
    assert_eq!(config.transcription.model, "small");
    assert!(config.validate().is_ok());
}

#[test]
fn test_serialize_roundtrip_shouldPreserveOverrides() {
    let mut config = Config::default();
    config.brand = "fancy".to_string();
    config.transcription.language = Some("de".to_string());

    let json = serde_json::to_string_pretty(&config).unwrap();
    let back: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(back.brand, "fancy");
    assert_eq!(back.transcription.language.as_deref(), Some("de"));
}

/// Test validation failures
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.brand = "../escape".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.transcription.beam_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.probe.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.karaoke.style_name = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_caption_style_from_str_shouldBeCaseInsensitive() {
    assert_eq!("Social".parse::<CaptionStyle>().unwrap(), CaptionStyle::Social);
    assert_eq!("HIGHLIGHT".parse::<CaptionStyle>().unwrap(), CaptionStyle::Highlight);
    assert!("neon".parse::<CaptionStyle>().is_err());
    assert_eq!(CaptionStyle::Karaoke.to_string(), "karaoke");
}

/// Test that karaoke follows the resolved style name
#[test]
fn test_caption_options_shouldEnableKaraokeOnlyForKaraokeStyle() {
    let config = Config::default();

    let karaoke = config.karaoke.caption_options("karaoke");
    assert!(karaoke.karaoke);
    assert_eq!(karaoke.word_duration_cs, 50);
    assert_eq!(karaoke.max_lines, 2);

    assert!(!config.karaoke.caption_options("clean").karaoke);
    assert!(!config.karaoke.caption_options("Karaoke").karaoke);
}
