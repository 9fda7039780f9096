//! Core domain types for Ironlog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Sets, exercises and their equipment configuration
//! - Live session mode and time breakdown
//! - Persisted workout records, feed posts and templates
//! - User profile, level tiers and streak reporting

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Set and Equipment Types
// ============================================================================

/// Classification of a completed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    WarmUp,
    Approach,
    Effective,
}

/// Equipment category an exercise is performed with
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
}

/// Barbell variants and their fixed bar weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BarbellVariant {
    /// Olympic 20 kg bar
    Standard,
    /// 15 kg bar
    Compact,
    /// 10 kg EZ curl bar
    Ez,
}

impl BarbellVariant {
    pub fn bar_weight_kg(&self) -> f64 {
        match self {
            BarbellVariant::Standard => 20.0,
            BarbellVariant::Compact => 15.0,
            BarbellVariant::Ez => 10.0,
        }
    }
}

/// Equipment configuration for one exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquipmentConfig {
    pub kind: EquipmentKind,
    /// Only meaningful when `kind` is `Barbell`
    pub barbell: Option<BarbellVariant>,
}

impl EquipmentConfig {
    pub fn new(kind: EquipmentKind) -> Self {
        Self {
            kind,
            barbell: None,
        }
    }

    pub fn barbell(variant: BarbellVariant) -> Self {
        Self {
            kind: EquipmentKind::Barbell,
            barbell: Some(variant),
        }
    }

    /// Fixed load the equipment itself contributes (the bar weight)
    pub fn fixed_weight_kg(&self) -> f64 {
        match self.kind {
            EquipmentKind::Barbell => self
                .barbell
                .unwrap_or(BarbellVariant::Standard)
                .bar_weight_kg(),
            _ => 0.0,
        }
    }
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self::new(EquipmentKind::Bodyweight)
    }
}

/// Target muscle group for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    FullBody,
    Other(String),
}

/// One recorded repetition block. Immutable once created by the session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedSet {
    /// Weight the user entered (plates only, for barbell work)
    pub nominal_kg: f64,
    /// Nominal weight plus any fixed equipment load
    pub real_kg: f64,
    pub reps: u32,
    pub duration_seconds: u32,
    pub kind: SetKind,
    pub equipment: EquipmentKind,
}

// ============================================================================
// Exercise Types
// ============================================================================

/// An exercise in progress: mutated only by appending sets
#[derive(Clone, Debug)]
pub struct Exercise {
    pub name: String,
    pub muscle: MuscleGroup,
    pub equipment: EquipmentConfig,
    pub sets: Vec<CompletedSet>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, muscle: MuscleGroup, equipment: EquipmentConfig) -> Self {
        Self {
            name: name.into(),
            muscle,
            equipment,
            sets: Vec::new(),
        }
    }
}

/// A frozen exercise: produced once, never mutated afterwards
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedExercise {
    pub name: String,
    pub muscle: MuscleGroup,
    pub equipment: EquipmentConfig,
    pub sets: Vec<CompletedSet>,
}

impl From<Exercise> for CompletedExercise {
    fn from(ex: Exercise) -> Self {
        Self {
            name: ex.name,
            muscle: ex.muscle,
            equipment: ex.equipment,
            sets: ex.sets,
        }
    }
}

impl CompletedExercise {
    /// Volume over all sets, using each set's real weight
    pub fn volume_kg(&self) -> f64 {
        crate::metrics::total_volume(&self.sets)
    }

    /// Highest real weight among effective sets, if any
    pub fn max_effective_kg(&self) -> Option<f64> {
        self.sets
            .iter()
            .filter(|s| s.kind == SetKind::Effective)
            .map(|s| s.real_kg)
            .fold(None, |acc, w| match acc {
                Some(m) if m >= w => Some(m),
                _ => Some(w),
            })
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// How the session is being driven
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Real execution against the wall clock
    Live,
    /// Building a routine ahead of time; no durations accrue
    Plan,
}

/// Where the session's time went
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBreakdown {
    pub series_seconds: u32,
    pub rest_seconds: u32,
    pub skipped_rest_seconds: u32,
}

// ============================================================================
// Persisted Record Types
// ============================================================================

/// A newly achieved personal record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PrEvent {
    pub exercise: String,
    pub weight_kg: f64,
}

/// Mapping from normalized exercise name to max effective weight ever recorded
pub type PrTable = HashMap<String, f64>;

/// Immutable snapshot of a finished workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub name: String,
    pub workout_type: String,
    pub date: DateTime<Utc>,
    pub duration_seconds: u32,
    pub exercises: Vec<CompletedExercise>,
    pub total_volume_kg: f64,
    pub total_sets: u32,
    pub exercise_count: u32,
    pub time_breakdown: TimeBreakdown,
    pub new_prs: Vec<PrEvent>,
}

/// A comment on a feed post
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// Social feed entry mirroring a workout's headline metrics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub author: String,
    pub posted_at: DateTime<Utc>,
    pub workout_name: String,
    pub workout_type: String,
    pub total_volume_kg: f64,
    pub total_sets: u32,
    pub duration_seconds: u32,
    pub likes: u32,
    pub comments: Vec<Comment>,
}

// ============================================================================
// Template Types
// ============================================================================

/// One planned exercise inside a template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseBlueprint {
    pub name: String,
    pub muscle: MuscleGroup,
    pub equipment: EquipmentConfig,
    pub estimated_sets: u32,
    pub estimated_weight_kg: f64,
}

/// Reusable exercise plan, created from a plan-mode session snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub workout_type: String,
    pub rest_seconds: u32,
    pub exercises: Vec<ExerciseBlueprint>,
}

// ============================================================================
// User Types
// ============================================================================

/// Persistent user profile
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "athlete".into(),
            created_at: Utc::now(),
        }
    }
}

/// User level tier names
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Rookie,
    Apprentice,
    Intermediate,
    Advanced,
    Elite,
}

/// Level computed from lifetime workout count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u8,
    pub tier: Tier,
}

/// One day of the Monday-anchored weekly streak report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekdayStatus {
    pub day: Weekday,
    pub trained: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barbell_fixed_weight() {
        let eq = EquipmentConfig::barbell(BarbellVariant::Standard);
        assert_eq!(eq.fixed_weight_kg(), 20.0);

        let eq = EquipmentConfig::barbell(BarbellVariant::Ez);
        assert_eq!(eq.fixed_weight_kg(), 10.0);
    }

    #[test]
    fn test_barbell_without_variant_defaults_to_standard_bar() {
        let eq = EquipmentConfig::new(EquipmentKind::Barbell);
        assert_eq!(eq.fixed_weight_kg(), 20.0);
    }

    #[test]
    fn test_non_barbell_has_no_fixed_weight() {
        assert_eq!(EquipmentConfig::new(EquipmentKind::Dumbbell).fixed_weight_kg(), 0.0);
        assert_eq!(EquipmentConfig::new(EquipmentKind::Bodyweight).fixed_weight_kg(), 0.0);
    }

    #[test]
    fn test_max_effective_ignores_warmups() {
        let ex = CompletedExercise {
            name: "Bench Press".into(),
            muscle: MuscleGroup::Chest,
            equipment: EquipmentConfig::barbell(BarbellVariant::Standard),
            sets: vec![
                CompletedSet {
                    nominal_kg: 40.0,
                    real_kg: 60.0,
                    reps: 10,
                    duration_seconds: 30,
                    kind: SetKind::WarmUp,
                    equipment: EquipmentKind::Barbell,
                },
                CompletedSet {
                    nominal_kg: 80.0,
                    real_kg: 100.0,
                    reps: 5,
                    duration_seconds: 40,
                    kind: SetKind::Effective,
                    equipment: EquipmentKind::Barbell,
                },
            ],
        };

        assert_eq!(ex.max_effective_kg(), Some(100.0));
    }

    #[test]
    fn test_set_kind_serde_snake_case() {
        let json = serde_json::to_string(&SetKind::WarmUp).unwrap();
        assert_eq!(json, "\"warm_up\"");
    }
}
