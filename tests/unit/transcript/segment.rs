use super::*;

fn w(text: &str, start: f64, end: f64) -> Word {
    Word::new(text, start, end)
}

fn lines(max_line_chars: usize, multi_line: bool) -> SegmentPolicy {
    SegmentPolicy::CharBudget {
        max_line_chars,
        multi_line,
    }
}

fn sample_words(n: usize) -> Vec<Word> {
    let vocab = [
        "the", "quick", "brown", "fox", "jumps", "over", "a", "lazy", "dog", "while",
        "extraordinarily", "caffeinated", "reporters", "watch",
    ];
    (0..n)
        .map(|i| {
            let start = i as f64 * 0.3 + (i / 7) as f64 * 0.8;
            w(vocab[i % vocab.len()], start, start + 0.25)
        })
        .collect()
}

fn concat(units: &[DisplayUnit]) -> Vec<Word> {
    units.iter().flat_map(|u| u.words.iter().cloned()).collect()
}

#[test]
fn end_to_end_scenario_forms_single_line() {
    let words = vec![w("hi", 0.0, 0.4), w("there", 0.4, 0.9), w("friend", 1.0, 1.6)];
    let units = segment_words(&words, lines(40, false));
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text, "hi there friend");
    assert_eq!(units[0].start, 0.0);
    assert_eq!(units[0].end, 1.6);
}

#[test]
fn empty_input_yields_no_units() {
    assert!(segment_words(&[], lines(40, false)).is_empty());
    assert!(segment_words(&[], SegmentPolicy::SilenceGap).is_empty());
}

#[test]
fn coverage_holds_for_both_policies() {
    for n in [1usize, 2, 5, 17, 60] {
        let words = sample_words(n);
        for policy in [
            lines(40, false),
            lines(40, true),
            lines(8, false),
            SegmentPolicy::SilenceGap,
        ] {
            let units = segment_words(&words, policy);
            assert_eq!(concat(&units), words, "policy {policy:?}, n {n}");
            for u in &units {
                assert_eq!(u.start, u.words.first().unwrap().start);
                assert_eq!(u.end, u.words.last().unwrap().end);
            }
        }
    }
}

#[test]
fn character_budget_is_respected() {
    let words = sample_words(80);
    for multi_line in [false, true] {
        for u in segment_words(&words, lines(40, multi_line)) {
            let len = u.text.chars().count();
            assert!(
                len <= 40 || u.words.len() == 1,
                "unit {:?} exceeds budget",
                u.text
            );
        }
    }
}

#[test]
fn single_line_closes_when_budget_reached() {
    // "aaaa bbbb" is exactly 9 chars.
    let words = vec![w("aaaa", 0.0, 0.1), w("bbbb", 0.1, 0.2), w("cc", 0.2, 0.3)];
    let units = segment_words(&words, lines(9, false));
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].text, "aaaa bbbb");
    assert_eq!(units[1].text, "cc");

    // Multi-line only closes once the budget is exceeded.
    let units = segment_words(&words, lines(9, true));
    assert_eq!(units[0].text, "aaaa bbbb");
    assert_eq!(units[1].text, "cc");

    let units = segment_words(&words[..2], lines(9, true));
    assert_eq!(units.len(), 1);
}

#[test]
fn long_word_forms_its_own_unit() {
    let long = "pneumonoultramicroscopicsilicovolcanoconiosis";
    let words = vec![w("a", 0.0, 0.1), w(long, 0.1, 0.5), w("b", 0.5, 0.6)];
    let units = segment_words(&words, lines(40, false));
    let texts: Vec<_> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["a", long, "b"]);
}

#[test]
fn whitespace_in_word_text_is_not_counted() {
    let words = vec![w(" hi", 0.0, 0.4), w(" there ", 0.4, 0.9)];
    let units = segment_words(&words, lines(40, false));
    assert_eq!(units[0].text, "hi there");
    assert_eq!(units[0].words[0].text, " hi");
}

#[test]
fn silence_gap_splits_on_long_pauses_only() {
    let words = vec![
        w("one", 0.0, 0.5),
        w("two", 1.0, 1.4), // gap 0.5: same unit
        w("three", 1.91, 2.2), // gap 0.51: new unit
        w("four", 2.1, 2.5), // overlap: same unit
    ];
    let units = segment_words(&words, SegmentPolicy::SilenceGap);
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].text, "one two");
    assert_eq!(units[1].text, "three four");
}

#[test]
fn silence_gap_property_holds() {
    let words = sample_words(70);
    let units = segment_words(&words, SegmentPolicy::SilenceGap);
    for u in &units {
        for pair in u.words.windows(2) {
            assert!(pair[1].start - pair[0].end <= SILENCE_GAP_SECS);
        }
    }
    for pair in units.windows(2) {
        let prev = pair[0].words.last().unwrap();
        let next = pair[1].words.first().unwrap();
        assert!(next.start - prev.end > SILENCE_GAP_SECS);
    }
}

#[test]
fn units_keep_input_order() {
    let units = segment_words(&sample_words(50), lines(12, false));
    for pair in units.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}
