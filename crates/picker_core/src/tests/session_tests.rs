use super::*;
use crate::random::FixedSource;

fn session_with(indices: Vec<usize>) -> PickerSession {
    PickerSession::new(Box::new(FixedSource::new(indices)))
}

#[test]
fn draw_then_remove_drops_the_drawn_item() {
    let mut session = session_with(vec![1]);
    session.add_lines("Eat\nSleep\nCode").expect("add");

    let reveal = session.draw_now().expect("draw");
    assert_eq!(reveal.item, "Sleep");
    assert_eq!(session.phase(), Phase::Showing);

    session.remove_result().expect("remove");
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.active().to_strings(), vec!["Eat", "Code"]);
}

#[test]
fn keep_leaves_collection_unchanged() {
    let mut session = session_with(vec![2]);
    session.add_lines("Eat\nSleep\nCode").expect("add");
    let before = session.active().clone();

    session.draw_now().expect("draw");
    let kept = session.keep().expect("keep");
    assert_eq!(kept.item, "Code");
    assert_eq!(session.active(), &before);
    assert!(session.result().is_none());
}

#[test]
fn remove_result_takes_one_duplicate_only() {
    let mut session = session_with(vec![2]);
    session.add_lines("x\ny\nx").expect("add");
    let reveal = session.draw_now().expect("draw");
    assert_eq!(reveal.item, "x");

    session.remove_result().expect("remove");
    assert_eq!(session.active().to_strings(), vec!["y", "x"]);
}

#[test]
fn refused_draw_keeps_session_idle() {
    let mut session = session_with(vec![0]);
    let err = session.begin_draw().expect_err("empty jar");
    assert!(matches!(err, PickError::InsufficientItems { .. }));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.active().is_empty());
    assert!(!session.can_draw());
    assert!(session.draw_warning().is_some());
}

#[test]
fn wheel_needs_two_options() {
    let mut session = session_with(vec![0]);
    session.set_mode(Mode::Wheel).expect("mode");
    session.add("only").expect("add");
    assert!(!session.can_draw());
    assert_eq!(
        session.draw_warning().as_deref(),
        Some("Please add at least two items to the wheel!")
    );
    assert!(matches!(
        session.begin_draw(),
        Err(PickError::InsufficientItems { required: 2, available: 1, .. })
    ));

    session.add("another").expect("add");
    assert!(session.can_draw());
    assert!(session.draw_warning().is_none());
}

#[test]
fn pools_are_locked_while_drawing() {
    let mut session = session_with(vec![0]);
    session.add("a").expect("add");
    session.begin_draw().expect("begin");

    assert_eq!(session.add("b"), Err(PickError::DrawInProgress));
    assert_eq!(session.clear(), Err(PickError::DrawInProgress));
    assert_eq!(session.set_mode(Mode::Wheel), Err(PickError::DrawInProgress));
    assert_eq!(session.begin_draw(), Err(PickError::DrawInProgress));
    assert_eq!(session.keep(), Err(PickError::NoResult));
    assert_eq!(session.phase(), Phase::Drawing);

    session.complete_draw().expect("complete");
    assert_eq!(session.phase(), Phase::Showing);
}

#[test]
fn showing_result_blocks_new_draw_and_mode_switch() {
    let mut session = session_with(vec![0]);
    session.add("a").expect("add");
    session.draw_now().expect("draw");

    assert_eq!(session.begin_draw(), Err(PickError::ResultPending));
    assert_eq!(session.set_mode(Mode::Wheel), Err(PickError::ResultPending));
    session.add("b").expect("items stay editable while showing");
    assert_eq!(session.complete_draw(), Err(PickError::NotDrawing));
}

#[test]
fn leaving_wheel_resets_it_but_jar_persists() {
    let mut session = session_with(vec![0]);
    session.add("jar item").expect("add");
    session.set_mode(Mode::Wheel).expect("wheel");
    session.add_lines("red\nblue").expect("add");
    assert_eq!(session.collection(Mode::Wheel).size(), 2);

    session.set_mode(Mode::Jar).expect("jar");
    assert!(session.collection(Mode::Wheel).is_empty());
    assert_eq!(session.active().to_strings(), vec!["jar item"]);
}

#[test]
fn keep_without_result_is_rejected() {
    let mut session = session_with(vec![0]);
    assert_eq!(session.keep(), Err(PickError::NoResult));
    assert_eq!(session.remove_result(), Err(PickError::NoResult));
}

#[test]
fn view_reflects_showing_state() {
    let mut session = session_with(vec![0]);
    session.add_lines("Eat\nSleep").expect("add");
    session.draw_now().expect("draw");

    let session_id = SessionId::new_v4();
    let view = session.view(session_id);
    assert_eq!(view.session_id, session_id);
    assert_eq!(view.phase, Phase::Showing);
    assert_eq!(view.jar, vec!["Eat", "Sleep"]);
    assert!(!view.can_draw);
    let result = view.result.expect("result");
    assert_eq!(result.item, "Eat");
    assert_eq!(result.mode, Mode::Jar);
}

#[test]
fn remove_value_targets_active_pool() {
    let mut session = session_with(vec![0]);
    session.add_lines("a\nb\na").expect("add");
    assert_eq!(session.remove_value("a"), Ok(true));
    assert_eq!(session.remove_value("zzz"), Ok(false));
    assert_eq!(session.active().to_strings(), vec!["b", "a"]);
}
