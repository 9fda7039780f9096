//! Built-in exercise catalog.
//!
//! A small library of common exercises with their muscle group and default
//! equipment, used to pre-fill `begin_exercise` and template blueprints.

use crate::types::{BarbellVariant, EquipmentConfig, EquipmentKind, MuscleGroup};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One catalog entry
#[derive(Clone, Debug)]
pub struct ExerciseDef {
    pub id: String,
    pub name: String,
    pub muscle: MuscleGroup,
    pub equipment: EquipmentConfig,
}

/// The complete catalog, keyed by id
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDef>,
}

impl Catalog {
    /// Look an exercise up by display name, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&ExerciseDef> {
        let needle = name.trim().to_lowercase();
        self.exercises
            .values()
            .find(|e| e.name.to_lowercase() == needle)
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of common exercises
pub fn build_default_catalog() -> Catalog {
    let mut exercises = HashMap::new();

    let mut add = |id: &str, name: &str, muscle: MuscleGroup, equipment: EquipmentConfig| {
        exercises.insert(
            id.to_string(),
            ExerciseDef {
                id: id.to_string(),
                name: name.to_string(),
                muscle,
                equipment,
            },
        );
    };

    add(
        "bench_press",
        "Bench Press",
        MuscleGroup::Chest,
        EquipmentConfig::barbell(BarbellVariant::Standard),
    );
    add(
        "incline_db_press",
        "Incline Dumbbell Press",
        MuscleGroup::Chest,
        EquipmentConfig::new(EquipmentKind::Dumbbell),
    );
    add(
        "squat",
        "Squat",
        MuscleGroup::Legs,
        EquipmentConfig::barbell(BarbellVariant::Standard),
    );
    add(
        "deadlift",
        "Deadlift",
        MuscleGroup::Back,
        EquipmentConfig::barbell(BarbellVariant::Standard),
    );
    add(
        "overhead_press",
        "Overhead Press",
        MuscleGroup::Shoulders,
        EquipmentConfig::barbell(BarbellVariant::Standard),
    );
    add(
        "barbell_row",
        "Barbell Row",
        MuscleGroup::Back,
        EquipmentConfig::barbell(BarbellVariant::Standard),
    );
    add(
        "ez_curl",
        "EZ Bar Curl",
        MuscleGroup::Arms,
        EquipmentConfig::barbell(BarbellVariant::Ez),
    );
    add(
        "lat_pulldown",
        "Lat Pulldown",
        MuscleGroup::Back,
        EquipmentConfig::new(EquipmentKind::Cable),
    );
    add(
        "leg_press",
        "Leg Press",
        MuscleGroup::Legs,
        EquipmentConfig::new(EquipmentKind::Machine),
    );
    add(
        "pull_up",
        "Pull Up",
        MuscleGroup::Back,
        EquipmentConfig::new(EquipmentKind::Bodyweight),
    );
    add(
        "plank",
        "Plank",
        MuscleGroup::Core,
        EquipmentConfig::new(EquipmentKind::Bodyweight),
    );

    Catalog { exercises }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_case_insensitive() {
        let catalog = get_default_catalog();
        let def = catalog.find_by_name("bench press").unwrap();
        assert_eq!(def.id, "bench_press");
        assert_eq!(def.muscle, MuscleGroup::Chest);
    }

    #[test]
    fn test_barbell_defaults_carry_variant() {
        let catalog = get_default_catalog();
        let curl = catalog.find_by_name("EZ Bar Curl").unwrap();
        assert_eq!(curl.equipment.barbell, Some(BarbellVariant::Ez));
        assert_eq!(curl.equipment.fixed_weight_kg(), 10.0);
    }

    #[test]
    fn test_unknown_name_returns_none() {
        let catalog = get_default_catalog();
        assert!(catalog.find_by_name("underwater basket press").is_none());
    }
}
