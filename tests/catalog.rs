//! Load-time checks on the shipped catalog and on malformed catalogs.
//!
//! Run with: cargo test --test catalog

use std::collections::HashSet;
use virtual_lab::catalog::{Catalog, CatalogError, CatalogFilter, Difficulty};

fn experiment_json(id: &str, steps: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "Title {id}",
            "category": "Physics",
            "description": "A test experiment",
            "difficulty": "Easy",
            "duration": "5 mins",
            "materials": [],
            "steps": [{steps}],
            "fun_fact": "",
            "safety_tips": []
        }}"#
    )
}

#[test]
fn builtin_catalog_upholds_step_invariants() {
    let catalog = Catalog::builtin().unwrap();
    assert!(!catalog.is_empty());

    for experiment in catalog.experiments() {
        assert!(!experiment.steps.is_empty(), "{} has no steps", experiment.id);
        let ids: HashSet<u32> = experiment.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), experiment.steps.len(), "{} reuses a step id", experiment.id);
    }
}

#[test]
fn builtin_experiment_ids_are_unique() {
    let catalog = Catalog::builtin().unwrap();
    let ids: HashSet<&str> = catalog.experiments().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.len());
}

#[test]
fn empty_catalog_is_rejected() {
    assert!(matches!(Catalog::from_json("empty", "[]"), Err(CatalogError::Empty)));
}

#[test]
fn experiment_without_steps_is_rejected() {
    let json = format!("[{}]", experiment_json("bare", ""));
    match Catalog::from_json("bare", &json) {
        Err(CatalogError::NoSteps(id)) => assert_eq!(id, "bare"),
        other => panic!("expected NoSteps, got {other:?}"),
    }
}

#[test]
fn reused_step_id_is_rejected() {
    let steps = r#"{ "id": 1, "instruction": "a" }, { "id": 1, "instruction": "b" }"#;
    let json = format!("[{}]", experiment_json("twice", steps));
    match Catalog::from_json("twice", &json) {
        Err(CatalogError::DuplicateStep { experiment, step }) => {
            assert_eq!(experiment, "twice");
            assert_eq!(step, 1);
        }
        other => panic!("expected DuplicateStep, got {other:?}"),
    }
}

#[test]
fn duplicate_experiment_id_is_rejected() {
    let step = r#"{ "id": 1, "instruction": "a" }"#;
    let json = format!("[{}, {}]", experiment_json("same", step), experiment_json("same", step));
    assert!(matches!(
        Catalog::from_json("dupes", &json),
        Err(CatalogError::DuplicateExperiment(_))
    ));
}

#[test]
fn malformed_json_names_its_source() {
    let err = Catalog::from_json("broken.json", "{ not json").unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn filters_combine() {
    let catalog = Catalog::builtin().unwrap();

    let everything = CatalogFilter::new();
    assert_eq!(catalog.filter(&everything).count(), catalog.len());

    let easy_physics = CatalogFilter::new()
        .category("Physics")
        .difficulty(Some(Difficulty::Easy));
    let hits: Vec<_> = catalog.filter(&easy_physics).collect();
    assert!(!hits.is_empty());
    assert!(hits
        .iter()
        .all(|e| e.category == "Physics" && e.difficulty == Difficulty::Easy));

    let search = CatalogFilter::new().search("VOLCANIC");
    assert!(catalog.filter(&search).any(|e| e.id == "volcano"));
}
