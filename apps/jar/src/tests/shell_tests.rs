use super::*;
use picker_core::FixedSource;
use std::io::Cursor;

fn run_script(indices: Vec<usize>, script: &str) -> (PickerSession, String) {
    let mut session = PickerSession::new(Box::new(FixedSource::new(indices)));
    let mut out = Vec::new();
    run(
        &mut session,
        Cursor::new(script.to_string()),
        &mut out,
        Duration::ZERO,
        false,
    )
    .expect("shell");
    (session, String::from_utf8(out).expect("utf8"))
}

#[test]
fn parses_commands_and_bare_items() {
    assert_eq!(parse_command("   "), Ok(None));
    assert_eq!(
        parse_command("add  Eat  "),
        Ok(Some(ShellCommand::Add("Eat".into())))
    );
    assert_eq!(
        parse_command("Go for a walk"),
        Ok(Some(ShellCommand::Add("Go for a walk".into())))
    );
    assert_eq!(parse_command("rm 2"), Ok(Some(ShellCommand::RemoveAt(1))));
    assert_eq!(
        parse_command("MODE wheel"),
        Ok(Some(ShellCommand::Mode(Mode::Wheel)))
    );
    assert!(parse_command("rm 0").is_err());
}

#[test]
fn items_starting_with_a_keyword_stay_items() {
    for line in [
        "Keep calm",
        "Quit smoking",
        "Draw a comic",
        "Clear the garage",
        "List taxes",
        "Remove weeds",
        "rm two",
        "mode dice",
    ] {
        assert_eq!(
            parse_command(line),
            Ok(Some(ShellCommand::Add(line.into()))),
            "{line}"
        );
    }
    assert_eq!(parse_command("keep"), Ok(Some(ShellCommand::Keep)));
    assert_eq!(parse_command("  QUIT "), Ok(Some(ShellCommand::Quit)));
}

#[test]
fn keyword_items_do_not_end_the_shell() {
    let (session, _) = run_script(vec![0], "Eat out\nQuit smoking\nCook\nKeep calm\n");
    assert_eq!(
        session.active().to_strings(),
        vec!["Eat out", "Quit smoking", "Cook", "Keep calm"]
    );
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn draw_and_remove_session() {
    let (session, out) = run_script(vec![1], "Eat\nSleep\nCode\ndraw\nremove\nquit\nadd ignored\n");
    assert!(out.contains("The jar has spoken: SLEEP"));
    assert!(out.contains("removed Sleep"));
    assert_eq!(session.active().to_strings(), vec!["Eat", "Code"]);
}

#[test]
fn keep_leaves_items() {
    let (session, out) = run_script(vec![0], "add a\nadd b\ndraw\nkeep\n");
    assert!(out.contains("kept a"));
    assert_eq!(session.active().size(), 2);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn refused_draw_warns_instead_of_failing() {
    let (session, out) = run_script(vec![0], "mode wheel\nonly one\ndraw\n");
    assert!(out.contains("Please add at least two items to the wheel!"));
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.active().size(), 1);
}

#[test]
fn bad_index_is_reported_and_ignored() {
    let (session, out) = run_script(vec![0], "a\nrm 5\nlist\n");
    assert!(out.contains("there is no item 5, the jar holds 1"));
    assert!(out.contains("  1. a"));
    assert_eq!(session.active().size(), 1);
}

#[test]
fn second_draw_waits_for_decision() {
    let (session, out) = run_script(vec![0], "a\ndraw\ndraw\n");
    assert!(out.contains("a result is waiting to be kept or removed"));
    assert_eq!(session.phase(), Phase::Showing);
}
