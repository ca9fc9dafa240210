/*!
 * Tests for the caption engine public API
 */

use asscribe::captions::{CaptionOptions, SubtitleEmitter, Template, resolve_style};
use asscribe::captions::karaoke::annotate;
use asscribe::captions::timestamp::encode;
use asscribe::captions::wrap::wrap_text;
use asscribe::errors::{StyleError, TemplateError};
use asscribe::transcript::TranscriptSegment;
use crate::common;

/// Test template parsing on a realistic template
#[test]
fn test_template_parse_withTwoStyles_shouldExposeSections() {
    let template = Template::parse(common::CLEAN_TEMPLATE).unwrap();

    assert_eq!(template.declared_styles(), &["clean".to_string(), "bold".to_string()]);
    assert!(template.header().starts_with("[Script Info]"));
    assert!(!template.header().contains("[Events]"));
    assert!(template.events_format().starts_with("Format: Layer, Start, End"));

    let (metadata, styles, format) = template.sections();
    assert!(metadata.contains("PlayResY: 1920"));
    assert!(styles.starts_with("[V4+ Styles]"));
    assert_eq!(format, template.events_format());
}

#[test]
fn test_template_parse_withoutEvents_shouldFail() {
    let content = common::CLEAN_TEMPLATE.replace("[Events]", "[Eventz]");
    assert_eq!(Template::parse(&content).unwrap_err(), TemplateError::MissingEventsSection);
}

#[test]
fn test_template_parse_withoutStyleSection_shouldFail() {
    let content = common::CLEAN_TEMPLATE.replace("[V4+ Styles]", "[Fonts]");
    assert_eq!(Template::parse(&content).unwrap_err(), TemplateError::MissingStyleSection);
}

#[test]
fn test_template_parse_withTrailingEventsMarker_shouldUseDefaultFormat() {
    let content = "[Script Info]\n[V4 Styles]\nStyle: a,Arial,20\n[Events]";
    let template = Template::parse(content).unwrap();
    assert_eq!(
        template.events_format(),
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
    );
    assert_eq!(template.declared_styles(), &["a".to_string()]);
}

/// Test style fallback is deterministic
#[test]
fn test_resolve_style_withUnknownStyle_shouldFallBackToFirstDeclared() {
    let template = Template::parse(common::CLEAN_TEMPLATE).unwrap();

    let exact = resolve_style(&template, "bold").unwrap();
    assert_eq!(exact.name, "bold");
    assert!(!exact.is_fallback());

    let fallback = resolve_style(&template, "neon").unwrap();
    assert_eq!(fallback.name, "clean");
    assert_eq!(fallback.fallback_from.as_deref(), Some("neon"));
}

#[test]
fn test_resolve_style_withNoStyles_shouldFail() {
    let template = Template::parse(common::STYLELESS_TEMPLATE).unwrap();
    assert_eq!(resolve_style(&template, "clean").unwrap_err(), StyleError::NoStylesAvailable);
}

#[test]
fn test_timestamp_encode_shouldTruncateCentiseconds() {
    assert_eq!(encode(125.456), "0:02:05.45");
    assert_eq!(encode(0.0), "0:00:00.00");
    assert_eq!(encode(3600.0), "1:00:00.00");
}

#[test]
fn test_wrap_text_withPunctuationNearMiddle_shouldBreakAfterIt() {
    assert_eq!(
        wrap_text("We went there, but nobody was at home today", 2),
        "We went there,\\Nbut nobody was at home today"
    );
    assert_eq!(wrap_text("Hello there friend", 2), "Hello there friend");
}

#[test]
fn test_karaoke_annotate_withFixedDuration_shouldTagEveryWord() {
    assert_eq!(
        annotate("one two three", 0.0, 3.0, 50),
        "{\\k50}one {\\k50}two {\\k50}three"
    );
}

/// Test a complete document emission
#[test]
fn test_emit_withCleanStyle_shouldRenderHeaderAndRecords() {
    let template = Template::parse(common::CLEAN_TEMPLATE).unwrap();
    let emitter = SubtitleEmitter::new(CaptionOptions::default());

    let document = emitter.emit(&common::sample_segments(), &template, "clean").unwrap();
    let dialogues = common::dialogue_lines(&document);

    assert!(document.starts_with(template.header()));
    assert!(document.contains("\n[Events]\nFormat: Layer, Start, End"));
    assert_eq!(dialogues.len(), 2);
    assert_eq!(dialogues[0], "Dialogue: 0,0:00:00.00,0:00:02.50,clean,,0,0,0,,Hello there friend");
    assert_eq!(
        dialogues[1],
        "Dialogue: 0,0:00:02.50,0:00:06.00,clean,,0,0,0,,This is a longer\\Ncaption that needs wrapping now"
    );
}

#[test]
fn test_emit_withKaraoke_shouldPrefixHighlightTag() {
    let template = Template::parse(common::CLEAN_TEMPLATE).unwrap();
    let options = CaptionOptions {
        karaoke: true,
        ..CaptionOptions::default()
    };
    let emitter = SubtitleEmitter::new(options);
    let segments = vec![TranscriptSegment::new(1.0, 2.0, "go now")];

    let document = emitter.emit(&segments, &template, "bold").unwrap();
    let dialogues = common::dialogue_lines(&document);

    assert_eq!(
        dialogues[0],
        "Dialogue: 0,0:00:01.00,0:00:02.00,bold,,0,0,0,,{\\1c&H0000FFFF&}{\\k50}go {\\k50}now"
    );
}

#[test]
fn test_emit_withNoSegments_shouldOnlyRenderHeaders() {
    let template = Template::parse(common::CLEAN_TEMPLATE).unwrap();
    let document = SubtitleEmitter::new(CaptionOptions::default())
        .emit(&[], &template, "clean")
        .unwrap();

    assert!(common::dialogue_lines(&document).is_empty());
    assert!(document.ends_with("Effect, Text\n"));
}
