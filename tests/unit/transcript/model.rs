use super::*;

#[test]
fn parses_segments_and_ignores_extra_keys() {
    let t = Transcript::from_json_str(
        r#"{
            "text": "hi there",
            "segments": [
                {"id": 0, "text": "hi", "words": [{"word": " hi", "start": 0.0, "end": 0.4, "probability": 0.9}]},
                {"words": [{"word": "there", "start": 0.4, "end": 0.9}]}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(t.word_count(), 2);
    let words = t.flatten_words();
    assert_eq!(words[0].text, " hi");
    assert_eq!(words[0].display_text(), "hi");
    assert_eq!(words[1], Word::new("there", 0.4, 0.9));
}

#[test]
fn missing_keys_fail_fast() {
    let err = Transcript::from_json_str(r#"{"chunks": []}"#).unwrap_err();
    assert!(err.to_string().contains("parse error"));
    assert!(err.to_string().contains("segments"));

    let err = Transcript::from_json_str(r#"{"segments": [{"text": "x"}]}"#).unwrap_err();
    assert!(err.to_string().contains("words"));

    assert!(Transcript::from_json_str("{not json").is_err());
}

#[test]
fn inverted_interval_is_rejected() {
    let err = Transcript::from_json_str(
        r#"{"segments": [{"words": [{"word": "x", "start": 2.0, "end": 1.0}]}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("segments[0].words[0]"));
}

#[test]
fn overlapping_words_are_tolerated() {
    let t = Transcript::from_json_str(
        r#"{"segments": [{"words": [
            {"word": "a", "start": 0.0, "end": 1.0},
            {"word": "b", "start": 0.5, "end": 1.5}
        ]}]}"#,
    )
    .unwrap();
    assert_eq!(t.word_count(), 2);
}

#[test]
fn empty_transcript_is_valid() {
    let t = Transcript::from_json_str(r#"{"segments": []}"#).unwrap();
    assert!(t.flatten_words().is_empty());
}

#[test]
fn word_containment_is_inclusive() {
    let w = Word::new("go", 1.0, 2.0);
    assert!(w.contains(1.0));
    assert!(w.contains(2.0));
    assert!(!w.contains(2.0001));
}
