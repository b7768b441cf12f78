//! Experiment sessions driven through whole steps with a simulated clock.
//!
//! Run with: cargo test --test session_flow

use std::time::Duration;
use virtual_lab::catalog::{ActionKind, Catalog, Difficulty, Experiment, ExperimentStep, StepAction};
use virtual_lab::props::{apply_key, PropKind, PropRegistry};
use virtual_lab::progression::{Phase, Session};
use virtual_lab::view::TableView;

fn step(id: u32, kind: Option<ActionKind>, duration: Option<u64>) -> ExperimentStep {
    ExperimentStep {
        id,
        instruction: format!("Step {id}"),
        action: kind.map(|kind| StepAction { kind, duration }),
        observation: Some(format!("Observation {id}")),
        visual: None,
    }
}

fn experiment(steps: Vec<ExperimentStep>) -> Experiment {
    Experiment {
        id: "flow".into(),
        title: "Flow".into(),
        category: "Chemistry".into(),
        description: String::new(),
        difficulty: Difficulty::Easy,
        duration: "5 mins".into(),
        materials: vec!["Water".into()],
        steps,
        fun_fact: String::new(),
        safety_tips: Vec::new(),
    }
}

#[test]
fn heat_step_resolves_exactly_at_its_duration() {
    let mut session = Session::new(experiment(vec![step(7, Some(ActionKind::Heat), Some(3000))]));

    session.perform_action();
    session.advance(Duration::from_millis(2999));
    assert!(session.is_animating());
    assert!(!session.show_visual());
    assert!(!session.is_step_completed(7));

    assert!(session.advance(Duration::from_millis(1)));
    assert!(!session.is_animating());
    assert!(session.show_visual());
    assert!(session.is_step_completed(7));
    assert_eq!(session.phase(), Phase::Resolved);
}

#[test]
fn completing_four_steps_completes_the_experiment() {
    let mut session = Session::new(experiment(vec![
        step(1, Some(ActionKind::Measure), None),
        step(2, Some(ActionKind::Mix), None),
        step(3, Some(ActionKind::Shake), Some(1500)),
        step(4, None, None),
    ]));

    for i in 0..4 {
        assert!(!session.all_complete());
        session.perform_action();
        session.advance(Duration::from_secs(5));
        if i < 3 {
            session.next_step();
        }
    }

    assert_eq!(session.completed().len(), 4);
    assert!(session.all_complete());
    assert_eq!(session.progress(), (4, 4));
}

#[test]
fn repeating_a_step_counts_it_once() {
    let mut session = Session::new(experiment(vec![step(1, Some(ActionKind::Mix), None), step(2, None, None)]));

    session.perform_action();
    session.advance(Duration::from_secs(3));
    session.next_step();
    session.prev_step();
    session.perform_action();
    session.advance(Duration::from_secs(3));

    assert_eq!(session.completed().len(), 1);
}

#[test]
fn navigation_always_lands_in_browsing() {
    let mut session = Session::new(experiment(vec![
        step(1, Some(ActionKind::Heat), None),
        step(2, Some(ActionKind::Cool), None),
    ]));

    session.perform_action();
    session.next_step();
    assert!(!session.is_animating() && !session.show_visual());

    session.perform_action();
    session.advance(Duration::from_secs(3));
    session.prev_step();
    assert!(!session.is_animating() && !session.show_visual());
}

#[test]
fn table_follows_the_session() {
    let catalog = Catalog::builtin().unwrap();
    let volcano = catalog.get("volcano").unwrap().clone();
    let mut session = Session::new(volcano);
    let mut table = TableView::new();

    assert!(table.sync(session.prop_key()));
    assert!(!table.sync(session.prop_key()));

    session.perform_action();
    assert!(table.sync(session.prop_key()));
    assert!(table.props().find(PropKind::ResultGlow).is_none());

    session.advance(Duration::from_secs(10));
    assert!(table.sync(session.prop_key()));
    assert!(table.props().find(PropKind::ResultGlow).is_some());
    assert_eq!(table.hand_position(), table.hand_rest());
}

#[test]
fn same_key_rebuilds_identically() {
    let mut session = Session::new(experiment(vec![step(1, Some(ActionKind::Heat), None)]));
    session.perform_action();
    let key = session.prop_key();

    let mut first = PropRegistry::new();
    let mut second = PropRegistry::new();
    apply_key(key, &mut first);
    apply_key(key, &mut second);
    apply_key(key, &mut second);

    assert_eq!(first.kinds(), second.kinds());
}
