use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Kind of hands-on action a step asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Mix,
    Heat,
    Cool,
    Shake,
    Wait,
    Observe,
    Measure,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Mix,
        ActionKind::Heat,
        ActionKind::Cool,
        ActionKind::Shake,
        ActionKind::Wait,
        ActionKind::Observe,
        ActionKind::Measure,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            ActionKind::Mix => "🥄",
            ActionKind::Heat => "🔥",
            ActionKind::Cool => "❄️",
            ActionKind::Shake => "💨",
            ActionKind::Wait => "⏰",
            ActionKind::Observe => "👀",
            ActionKind::Measure => "📏",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Mix => "mix",
            ActionKind::Heat => "heat",
            ActionKind::Cool => "cool",
            ActionKind::Shake => "shake",
            ActionKind::Wait => "wait",
            ActionKind::Observe => "observe",
            ActionKind::Measure => "measure",
        }
    }
}

/// Glyph shown for steps without a declared action.
pub const NO_ACTION_GLYPH: &str = "🔬";

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StepAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Before/after depiction revealed once a step resolves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepVisual {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExperimentStep {
    /// Completion key, unique within the owning experiment.
    pub id: u32,
    pub instruction: String,
    #[serde(default)]
    pub action: Option<StepAction>,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub visual: Option<StepVisual>,
}

impl ExperimentStep {
    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action.map(|a| a.kind)
    }

    /// How long performing this step takes, falling back to `default`.
    pub fn action_duration(&self, default: Duration) -> Duration {
        self.action
            .and_then(|a| a.duration)
            .map(Duration::from_millis)
            .unwrap_or(default)
    }

    pub fn glyph(&self) -> &'static str {
        self.action_kind().map_or(NO_ACTION_GLYPH, ActionKind::glyph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Display string such as "10 mins".
    pub duration: String,
    pub materials: Vec<String>,
    pub steps: Vec<ExperimentStep>,
    pub fun_fact: String,
    pub safety_tips: Vec<String>,
}

impl Experiment {
    pub fn step(&self, index: usize) -> Option<&ExperimentStep> {
        self.steps.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_defaults_missing_fields() {
        let step: ExperimentStep =
            serde_json::from_str(r#"{ "id": 3, "instruction": "Look closely" }"#).unwrap();
        assert_eq!(step.action_kind(), None);
        assert_eq!(step.glyph(), NO_ACTION_GLYPH);
        assert_eq!(
            step.action_duration(Duration::from_millis(2000)),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn declared_duration_overrides_default() {
        let step: ExperimentStep = serde_json::from_str(
            r#"{ "id": 1, "instruction": "Heat it", "action": { "type": "heat", "duration": 3000 } }"#,
        )
        .unwrap();
        assert_eq!(step.action_kind(), Some(ActionKind::Heat));
        assert_eq!(
            step.action_duration(Duration::from_millis(2000)),
            Duration::from_millis(3000)
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        let parsed = serde_json::from_str::<StepAction>(r#"{ "type": "boil" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn every_action_has_a_distinct_glyph() {
        let mut glyphs: Vec<_> = ActionKind::ALL.iter().map(|a| a.glyph()).collect();
        glyphs.push(NO_ACTION_GLYPH);
        let count = glyphs.len();
        glyphs.sort();
        glyphs.dedup();
        assert_eq!(glyphs.len(), count);
    }
}
