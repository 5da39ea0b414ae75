use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use lesson_player::{
    Answer, Completion, EngineConfig, EngineError, Host, LessonEngine, NoopHost, Recordings,
    Severity, Slide, SlideIdentity, Step, TickResult,
};
use serde_json::json;

fn slides(value: serde_json::Value) -> Vec<Slide> {
    serde_json::from_value(value).unwrap()
}

fn scenario_a() -> Vec<Slide> {
    slides(json!([
        { "id": "intro", "kind": "text", "content": "Welcome" },
        {
            "id": "capital",
            "kind": "quiz",
            "question": "Capital of France?",
            "options": ["Berlin", "Paris", "Rome"],
            "correct": 1
        },
        { "id": "outro", "kind": "text", "content": "Bye" }
    ]))
}

#[derive(Default)]
struct CountingHost {
    celebrations: usize,
    fullscreen: Option<bool>,
}

impl Host for CountingHost {
    fn celebrate(&mut self) {
        self.celebrations += 1;
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = Some(enabled);
    }
}

#[test]
fn scenario_a_quiz_gates_then_auto_advances() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");

    assert_eq!(engine.next(0), Step::Moved { from: 0, to: 1 });

    assert!(!engine.check_answer(&quiz, Some(&Answer::Choice(0)), None, 1_000).unwrap());
    assert_eq!(engine.validation_result(&quiz).unwrap().severity, Severity::Error);
    assert_eq!(engine.gate_completion_map().get(&quiz), Some(&false));
    assert!(!engine.can_advance());

    assert_eq!(engine.next(1_500), Step::Blocked);
    assert_eq!(engine.current_slide_index(), 1);
    let blocked = engine.validation_result(&quiz).unwrap();
    assert_eq!(blocked.severity, Severity::Warning);

    assert!(engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 2_000).unwrap());
    assert_eq!(engine.validation_result(&quiz).unwrap().severity, Severity::Success);
    assert_eq!(engine.gate_completion_map().get(&quiz), Some(&true));
    assert!(engine.satisfied_slides().contains(&1));

    // success stays up until the transition starts
    engine.tick(4_000);
    assert!(engine.is_feedback_visible(&quiz));
    assert_eq!(engine.current_slide_index(), 1);

    assert_eq!(engine.tick(4_500), TickResult::RenderRequested);
    assert!(!engine.is_feedback_visible(&quiz));
    assert_eq!(engine.current_slide_index(), 1);

    engine.tick(5_000);
    assert_eq!(engine.current_slide_index(), 2);
    assert!(engine.is_last_slide());
    assert_eq!(engine.pending_timers(), 0);
}

#[test]
fn late_tick_runs_both_transition_steps() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();
    engine.tick(10_000);

    assert_eq!(engine.current_slide_index(), 2);
}

#[test]
fn gate_invariant_holds_for_next() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    for (choice, now) in [(2, 100), (1, 200), (0, 300)] {
        engine.check_answer(&quiz, Some(&Answer::Choice(choice)), None, now).unwrap();
        let passed = engine.gate_completion_map().get(&quiz) == Some(&true);

        let mut probe = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
        probe.next(0);
        probe.check_answer(&quiz, Some(&Answer::Choice(choice)), None, now).unwrap();
        let moved = matches!(probe.next(now), Step::Moved { .. });

        assert_eq!(moved, passed);
    }
}

#[test]
fn at_most_one_transition_per_identity() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    for now in [0, 100, 200, 2_000] {
        engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, now).unwrap();
        assert_eq!(engine.pending_transitions(&quiz), 1);
    }

    // only the last schedule survives
    engine.tick(4_400);
    assert!(engine.is_feedback_visible(&quiz));
    engine.tick(4_500);
    assert!(!engine.is_feedback_visible(&quiz));
    assert_eq!(engine.pending_transitions(&quiz), 1);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 4_600).unwrap();
    assert_eq!(engine.pending_transitions(&quiz), 1);
}

#[test]
fn wrong_answer_cancels_pending_transition() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();
    engine.check_answer(&quiz, Some(&Answer::Choice(0)), None, 1_000).unwrap();

    assert_eq!(engine.pending_transitions(&quiz), 0);
    engine.tick(10_000);
    assert_eq!(engine.current_slide_index(), 1);
}

#[test]
fn regression_revokes_satisfaction() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();
    assert!(engine.satisfied_slides().contains(&1));

    engine.check_answer(&quiz, Some(&Answer::Choice(2)), None, 100).unwrap();
    assert_eq!(engine.gate_completion_map().get(&quiz), Some(&false));
    assert!(!engine.satisfied_slides().contains(&1));
}

#[test]
fn error_feedback_hides_after_four_seconds() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(0)), None, 0).unwrap();
    engine.tick(3_999);
    assert!(engine.is_feedback_visible(&quiz));
    engine.tick(4_000);
    assert!(!engine.is_feedback_visible(&quiz));
}

#[test]
fn leaving_a_slide_cancels_its_transition() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();
    assert_eq!(engine.next(100), Step::Moved { from: 1, to: 2 });
    assert_eq!(engine.pending_transitions(&quiz), 0);

    engine.previous();
    engine.tick(10_000);
    assert_eq!(engine.current_slide_index(), 1);
}

#[test]
fn scenario_b_partial_drag_drop_warns() {
    let lesson = slides(json!([
        {
            "id": "animals",
            "kind": "interactive",
            "interaction": {
                "type": "drag-drop",
                "items": [
                    { "text": "cat", "target": "mammal" },
                    { "text": "eagle", "target": "bird" },
                    { "text": "shark", "target": "fish" }
                ]
            }
        }
    ]));
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let drag = SlideIdentity::new("interactive-drag-drop-animals");
    let partial = Answer::Mapping(BTreeMap::from([
        ("cat".to_string(), "mammal".to_string()),
        ("eagle".to_string(), "bird".to_string()),
    ]));

    assert!(!engine.check_answer(&drag, Some(&partial), None, 0).unwrap());
    let result = engine.validation_result(&drag).unwrap();
    assert_eq!(result.severity, Severity::Warning);
    assert!(result.message.contains("match all 3 items"));
    assert!(result.message.contains("2 matched"));

    engine.tick(3_000);
    assert!(!engine.is_feedback_visible(&drag));
}

#[test]
fn wrong_drag_drop_resets_the_answer() {
    let lesson = slides(json!([
        {
            "id": "animals",
            "kind": "interactive",
            "interaction": {
                "type": "drag-drop",
                "items": [
                    { "text": "cat", "target": "mammal" },
                    { "text": "eagle", "target": "bird" }
                ]
            }
        },
        { "id": "end", "kind": "text", "content": "Done" }
    ]));
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let drag = SlideIdentity::new("interactive-drag-drop-animals");
    let swapped = Answer::Mapping(BTreeMap::from([
        ("cat".to_string(), "bird".to_string()),
        ("eagle".to_string(), "mammal".to_string()),
    ]));

    engine.set_answer(&drag, swapped).unwrap();
    assert!(!engine.submit(0).unwrap());
    assert_eq!(
        engine.validation_result(&drag).unwrap().message,
        "Some items are in the wrong place. Try again!"
    );
    assert!(engine.answer(&drag).is_some());

    engine.tick(4_000);
    assert!(engine.answer(&drag).is_none());

    // non-quiz slides never block and never auto-advance
    assert_eq!(engine.pending_transitions(&drag), 0);
    assert_eq!(engine.next(5_000), Step::Moved { from: 0, to: 1 });
}

#[test]
fn scenario_c_pronunciation_succeeds_with_one_recording() {
    let lesson = slides(json!([
        {
            "id": "speak",
            "kind": "interactive",
            "interaction": {
                "type": "pronunciation",
                "items": [
                    { "id": "a", "text": "Hola" },
                    { "id": "b", "text": "Adios" },
                    { "id": "c", "text": "Gracias" }
                ]
            }
        },
        { "id": "end", "kind": "text", "content": "Done" }
    ]));
    let mut engine = LessonEngine::new(&lesson, CountingHost::default(), || {}).unwrap();
    let speak = SlideIdentity::new("interactive-pronunciation-speak");

    assert!(engine.satisfied_slides().contains(&0));
    assert!(engine.gate_completion_map().is_empty());

    let answer = Answer::Recordings(Recordings {
        recordings: BTreeMap::from([("a".to_string(), "blob:1".to_string())]),
        completed: true,
    });
    assert!(engine.check_answer(&speak, Some(&answer), None, 0).unwrap());

    let result = engine.validation_result(&speak).unwrap();
    assert_eq!(result.severity, Severity::Success);
    assert!(result.message.contains("recorded 1 item"));
    assert_eq!(engine.host().celebrations, 1);
    assert_eq!(engine.pending_transitions(&speak), 0);
}

#[test]
fn scenario_d_previous_at_start_changes_nothing() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let before = engine.satisfied_slides();

    assert_eq!(engine.previous(), Step::AtBoundary);
    assert_eq!(engine.current_slide_index(), 0);
    assert_eq!(engine.satisfied_slides(), before);
    assert!(engine.validation_result(engine.current_identity()).is_none());
}

#[test]
fn scenario_e_completion_blocked_by_unpassed_quiz() {
    let lesson = slides(json!([
        { "id": "q1", "kind": "quiz", "question": "1?", "options": ["a", "b"], "correct": 0 },
        { "id": "q2", "kind": "quiz", "question": "2?", "options": ["a", "b"], "correct": 1 }
    ]));
    let completed = Cell::new(0);
    let mut engine = LessonEngine::new(&lesson, NoopHost, || completed.set(completed.get() + 1))
        .unwrap();

    engine
        .check_answer(&SlideIdentity::new("quiz-q1"), Some(&Answer::Choice(0)), None, 0)
        .unwrap();

    match engine.complete(100) {
        Completion::Blocked { pending, .. } => assert_eq!(pending, vec![1]),
        Completion::Completed => panic!("completion should be blocked"),
    }
    drop(engine);
    assert_eq!(completed.get(), 0);
}

#[test]
fn every_successful_complete_calls_back_once() {
    let lesson = slides(json!([
        { "id": "q1", "kind": "quiz", "question": "1?", "options": ["a", "b"], "correct": 0 }
    ]));
    let completed = Cell::new(0);
    let mut engine = LessonEngine::new(&lesson, CountingHost::default(), || {
        completed.set(completed.get() + 1)
    })
    .unwrap();

    engine
        .check_answer(&SlideIdentity::new("quiz-q1"), Some(&Answer::Choice(0)), None, 0)
        .unwrap();
    // last slide: success stays, nothing scheduled to move
    assert_eq!(engine.pending_transitions(&SlideIdentity::new("quiz-q1")), 0);

    assert_eq!(engine.complete(10), Completion::Completed);
    assert_eq!(engine.complete(20), Completion::Completed);
    assert_eq!(engine.host().celebrations, 3);
    drop(engine);
    assert_eq!(completed.get(), 2);
}

#[test]
fn dispose_drops_pending_timers() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);
    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();

    engine.dispose();

    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(engine.tick(10_000), TickResult::NoRender);
    assert_eq!(engine.current_slide_index(), 1);
    assert!(engine.validation_result(&quiz).is_none());
}

#[test]
fn loading_a_new_lesson_discards_state() {
    let first = scenario_a();
    let second = slides(json!([
        { "id": "only", "kind": "text", "content": "Fresh" }
    ]));
    let mut engine = LessonEngine::new(&first, NoopHost, || {}).unwrap();
    engine.next(0);
    engine
        .check_answer(&SlideIdentity::new("quiz-capital"), Some(&Answer::Choice(1)), None, 0)
        .unwrap();

    engine.load_lesson(&second).unwrap();

    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(engine.current_slide_index(), 0);
    assert_eq!(engine.satisfied_slides(), BTreeSet::from([0]));
    assert!(engine.gate_completion_map().is_empty());
    assert_eq!(engine.progress_percent(), 100.0);
}

#[test]
fn precondition_violations_are_errors() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();

    assert_eq!(
        engine.check_answer(&SlideIdentity::new("quiz-missing"), None, None, 0),
        Err(EngineError::UnknownIdentity(SlideIdentity::new("quiz-missing")))
    );
    assert_eq!(
        engine.set_answer(&SlideIdentity::new("text-intro"), Answer::Choice(0)),
        Err(EngineError::NotAnswerable(SlideIdentity::new("text-intro")))
    );

    let empty: Vec<Slide> = Vec::new();
    assert!(matches!(
        LessonEngine::new(&empty, NoopHost, || {}),
        Err(EngineError::EmptyLesson)
    ));
}

#[test]
fn fullscreen_is_forwarded_to_the_host() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, CountingHost::default(), || {}).unwrap();

    assert!(engine.toggle_fullscreen());
    assert_eq!(engine.host().fullscreen, Some(true));
    assert!(!engine.toggle_fullscreen());
    assert_eq!(engine.host().fullscreen, Some(false));
    assert!(engine.can_advance());
}

#[test]
fn caller_supplied_correct_answer_wins() {
    let lesson = slides(json!([
        {
            "id": "order",
            "kind": "interactive",
            "interaction": { "type": "sentence-builder", "words": ["I", "am", "here"] }
        }
    ]));
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let builder = SlideIdentity::new("interactive-sentence-builder-order");
    let answer = Answer::Sequence(vec!["here".into(), "I".into(), "am".into()]);

    assert!(!engine.check_answer(&builder, Some(&answer), None, 0).unwrap());
    assert!(engine.check_answer(&builder, Some(&answer), Some(&answer), 100).unwrap());
}

#[test]
fn ids_that_slug_alike_get_distinct_identities() {
    let lesson = slides(json!([
        { "id": "Q1", "kind": "quiz", "question": "1?", "options": ["a", "b"], "correct": 0 },
        { "id": "q1", "kind": "quiz", "question": "2?", "options": ["a", "b"], "correct": 1 },
        { "id": "q.1", "kind": "text", "content": "one" },
        { "id": "q1!", "kind": "text", "content": "two" }
    ]));
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();

    assert_eq!(engine.slide_index(&SlideIdentity::new("quiz-q1")), Some(0));
    assert_eq!(engine.slide_index(&SlideIdentity::new("quiz-q1-1")), Some(1));
    assert_eq!(engine.slide_index(&SlideIdentity::new("text-q1-1")), Some(3));

    assert!(engine
        .check_answer(&SlideIdentity::new("quiz-q1-1"), Some(&Answer::Choice(1)), None, 0)
        .unwrap());
    assert_eq!(engine.gate_completion_map().get(&SlideIdentity::new("quiz-q1")), None);
}

#[test]
fn leaving_a_slide_hides_its_success_feedback() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 0).unwrap();
    assert!(engine.is_feedback_visible(&quiz));

    engine.next(100);
    assert!(!engine.is_feedback_visible(&quiz));

    engine.tick(100_000);
    engine.previous();
    assert_eq!(engine.current_slide_index(), 1);
    assert!(!engine.is_feedback_visible(&quiz));
    assert_eq!(engine.gate_completion_map().get(&quiz), Some(&true));
}

#[test]
fn leaving_a_slide_drops_its_hide_timer() {
    let lesson = scenario_a();
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(0)), None, 0).unwrap();
    engine.previous();

    assert!(!engine.is_feedback_visible(&quiz));
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn huge_delays_do_not_overflow() {
    let lesson = scenario_a();
    let config = EngineConfig {
        quiz_advance_ms: u64::MAX,
        settle_ms: u64::MAX,
        warning_hide_ms: u64::MAX,
        error_hide_ms: u64::MAX,
    };
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {})
        .unwrap()
        .with_config(config);
    let quiz = SlideIdentity::new("quiz-capital");
    engine.next(0);

    engine.check_answer(&quiz, Some(&Answer::Choice(0)), None, 10).unwrap();
    assert!(engine.check_answer(&quiz, Some(&Answer::Choice(1)), None, 10).unwrap());
    assert_eq!(engine.next_deadline(), Some(u64::MAX));

    engine.tick(1_000_000);
    assert_eq!(engine.current_slide_index(), 1);
    assert!(engine.is_feedback_visible(&quiz));

    engine.tick(u64::MAX);
    assert_eq!(engine.current_slide_index(), 2);
}

#[test]
fn new_attempt_survives_the_pending_reset() {
    let lesson = slides(json!([
        {
            "id": "animals",
            "kind": "interactive",
            "interaction": {
                "type": "drag-drop",
                "items": [
                    { "text": "cat", "target": "mammal" },
                    { "text": "eagle", "target": "bird" }
                ]
            }
        }
    ]));
    let mut engine = LessonEngine::new(&lesson, NoopHost, || {}).unwrap();
    let drag = SlideIdentity::new("interactive-drag-drop-animals");
    let swapped = Answer::Mapping(BTreeMap::from([
        ("cat".to_string(), "bird".to_string()),
        ("eagle".to_string(), "mammal".to_string()),
    ]));
    let retry = Answer::Mapping(BTreeMap::from([("cat".to_string(), "mammal".to_string())]));

    assert!(!engine.check_answer(&drag, Some(&swapped), None, 0).unwrap());
    engine.set_answer(&drag, retry.clone()).unwrap();

    engine.tick(4_000);
    assert_eq!(engine.answer(&drag), Some(&retry));
    assert!(!engine.is_feedback_visible(&drag));
}
