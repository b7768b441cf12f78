//! Experiment catalog
//!
//! Static experiment data embedded at build time, checked once on load.
//! Everything downstream may assume the catalog is non-empty and that step
//! ids are unique within each experiment.

mod experiment;
mod filter;

pub use experiment::{
    ActionKind, Difficulty, Experiment, ExperimentStep, StepAction, StepVisual, NO_ACTION_GLYPH,
};
pub use filter::{CatalogFilter, CATEGORIES};

use std::collections::HashSet;

const GENERAL_EXPERIMENTS: &str = include_str!("../../data/experiments.json");
const NCERT_EXPERIMENTS: &str = include_str!("../../data/ncert_experiments.json");

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse {source_name}: {source}")]
    Parse {
        source_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog contains no experiments")]
    Empty,

    #[error("experiment id {0:?} appears more than once")]
    DuplicateExperiment(String),

    #[error("experiment {0:?} has no steps")]
    NoSteps(String),

    #[error("experiment {experiment:?} reuses step id {step}")]
    DuplicateStep { experiment: String, step: u32 },
}

/// Validated, immutable experiment list.
#[derive(Debug, Clone)]
pub struct Catalog {
    experiments: Vec<Experiment>,
}

impl Catalog {
    /// The general and NCERT experiment sets shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut experiments = parse("experiments.json", GENERAL_EXPERIMENTS)?;
        experiments.extend(parse("ncert_experiments.json", NCERT_EXPERIMENTS)?);
        Self::new(experiments)
    }

    pub fn from_json(source_name: &'static str, json: &str) -> Result<Self, CatalogError> {
        Self::new(parse(source_name, json)?)
    }

    pub fn new(experiments: Vec<Experiment>) -> Result<Self, CatalogError> {
        validate(&experiments)?;
        log::info!("catalog loaded with {} experiments", experiments.len());
        Ok(Self { experiments })
    }

    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Experiment> {
        self.experiments.iter().find(|e| e.id == id)
    }

    pub fn filter<'a>(&'a self, filter: &'a CatalogFilter) -> impl Iterator<Item = &'a Experiment> + 'a {
        filter.apply(&self.experiments)
    }
}

fn parse(source_name: &'static str, json: &str) -> Result<Vec<Experiment>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        source_name,
        source,
    })
}

fn validate(experiments: &[Experiment]) -> Result<(), CatalogError> {
    if experiments.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut ids = HashSet::new();
    for experiment in experiments {
        if !ids.insert(experiment.id.as_str()) {
            return Err(CatalogError::DuplicateExperiment(experiment.id.clone()));
        }
        if experiment.steps.is_empty() {
            return Err(CatalogError::NoSteps(experiment.id.clone()));
        }
        let mut step_ids = HashSet::new();
        for step in &experiment.steps {
            if !step_ids.insert(step.id) {
                return Err(CatalogError::DuplicateStep {
                    experiment: experiment.id.clone(),
                    step: step.id,
                });
            }
        }
    }
    Ok(())
}
