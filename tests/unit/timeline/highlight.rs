use super::*;

fn words() -> Vec<Word> {
    vec![
        Word::new("go", 1.0, 2.0),
        Word::new("team", 2.0, 3.0),
        Word::new("go", 3.0, 4.0),
    ]
}

fn step(state: &mut HighlightState, words: &[Word], t: f64) -> Vec<bool> {
    let active = words.iter().position(|w| w.contains(t));
    state.advance(words, t, active)
}

#[test]
fn repeated_text_is_tracked_by_index() {
    let ws = words();
    let mut state = HighlightState::new();
    state.enter_unit(0);
    assert_eq!(step(&mut state, &ws, 1.5), vec![true, false, false]);
    assert_eq!(step(&mut state, &ws, 3.5), vec![false, false, true]);
    assert!(state.is_spent(0));
    assert!(!state.is_spent(2));
}

#[test]
fn highlight_stays_on_through_interval() {
    let ws = words();
    let mut state = HighlightState::new();
    state.enter_unit(0);
    for t in [1.0, 1.3, 1.7, 1.99] {
        assert!(step(&mut state, &ws, t)[0], "t={t}");
    }
}

#[test]
fn finished_word_never_rehighlights_in_same_unit() {
    let ws = words();
    let mut state = HighlightState::new();
    state.enter_unit(0);
    step(&mut state, &ws, 1.5);
    step(&mut state, &ws, 2.5);
    assert!(state.is_spent(0));
    assert_eq!(step(&mut state, &ws, 1.5), vec![false, false, false]);
}

#[test]
fn boundary_time_highlights_both_neighbours() {
    let ws = words();
    let mut state = HighlightState::new();
    state.enter_unit(0);
    assert_eq!(step(&mut state, &ws, 2.0), vec![true, true, false]);
}

#[test]
fn no_active_word_means_no_highlight() {
    let ws = words();
    let mut state = HighlightState::new();
    state.enter_unit(0);
    assert_eq!(state.advance(&ws, 1.5, None), vec![false, false, false]);
}

#[test]
fn unit_change_resets_history() {
    let ws = words();
    let mut state = HighlightState::new();
    assert!(state.enter_unit(0));
    step(&mut state, &ws, 1.5);
    step(&mut state, &ws, 2.5);
    assert!(!state.enter_unit(0));
    assert!(state.is_spent(0));

    assert!(state.enter_unit(1));
    assert_eq!(state.unit(), Some(1));
    assert!(!state.is_spent(0));
    assert_eq!(step(&mut state, &ws, 1.5), vec![true, false, false]);

    state.reset();
    assert_eq!(state.unit(), None);
}
