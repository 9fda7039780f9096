//! Derived-metrics engine: volume, personal records, level, weekly streak.
//!
//! Everything in this module is a pure function over already-recorded data;
//! no I/O and no session state.

use crate::{
    CompletedExercise, CompletedSet, LevelInfo, PrEvent, PrTable, SetKind, Tier, WeekdayStatus,
    WorkoutRecord,
};
use chrono::{Datelike, Duration, NaiveDate, TimeZone};

/// Lifetime workout counts at which the user's level steps up
const LEVEL_THRESHOLDS: [u32; 5] = [0, 8, 20, 50, 100];

/// Total volume over a slice of sets: Σ(real weight × reps).
///
/// Non-finite weights contribute nothing, so a corrupt record can never
/// poison an aggregate.
pub fn total_volume(sets: &[CompletedSet]) -> f64 {
    sets.iter()
        .map(|s| {
            if s.real_kg.is_finite() {
                s.real_kg * f64::from(s.reps)
            } else {
                0.0
            }
        })
        .sum()
}

/// Volume restricted to effective sets (warm-up and approach excluded)
pub fn effective_volume(sets: &[CompletedSet]) -> f64 {
    let effective: Vec<CompletedSet> = sets
        .iter()
        .filter(|s| s.kind == SetKind::Effective)
        .cloned()
        .collect();
    total_volume(&effective)
}

/// PR table key: case- and whitespace-folded exercise name
pub fn normalize_exercise_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True iff an effective set at `weight_kg` strictly beats the stored max.
///
/// Warm-up and approach sets never qualify, and a missing table entry
/// counts as zero.
pub fn is_personal_record(name: &str, weight_kg: f64, table: &PrTable, kind: SetKind) -> bool {
    if kind != SetKind::Effective {
        return false;
    }
    let current = table
        .get(&normalize_exercise_name(name))
        .copied()
        .unwrap_or(0.0);
    weight_kg > current
}

/// Fold a workout's exercises into the PR table.
///
/// For each exercise the maximum effective-set weight is compared against
/// the stored value; a strict improvement updates the table and emits one
/// event. At most one event per exercise per call, and stored values never
/// decrease.
pub fn update_personal_records(
    exercises: &[CompletedExercise],
    table: &mut PrTable,
) -> Vec<PrEvent> {
    let mut events = Vec::new();

    for exercise in exercises {
        let Some(best) = exercise.max_effective_kg() else {
            continue;
        };

        let key = normalize_exercise_name(&exercise.name);
        let current = table.get(&key).copied().unwrap_or(0.0);

        if best > current {
            table.insert(key, best);
            tracing::debug!("New PR for {}: {} kg (was {} kg)", exercise.name, best, current);
            events.push(PrEvent {
                exercise: exercise.name.clone(),
                weight_kg: best,
            });
        }
    }

    events
}

/// Level tier as a step function over lifetime workout count
pub fn compute_level(workout_count: u32) -> LevelInfo {
    let level = LEVEL_THRESHOLDS
        .iter()
        .filter(|&&t| workout_count >= t)
        .count() as u8;

    let tier = match level {
        1 => Tier::Rookie,
        2 => Tier::Apprentice,
        3 => Tier::Intermediate,
        4 => Tier::Advanced,
        _ => Tier::Elite,
    };

    LevelInfo { level, tier }
}

/// Mark each day of the current Monday-anchored calendar week as trained
/// iff any workout's date falls on that day.
///
/// The week always starts on Monday regardless of locale, and matching is
/// by calendar day, not exact timestamp. Stored timestamps are UTC, so they
/// are shifted into `tz` before taking the day; `today` must already be a
/// date in that zone. An evening workout near a zone boundary lands on the
/// day the athlete actually trained.
pub fn weekly_streak<Tz: TimeZone>(
    workouts: &[WorkoutRecord],
    today: NaiveDate,
    tz: &Tz,
) -> [WeekdayStatus; 7] {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    std::array::from_fn(|i| {
        let day = monday + Duration::days(i as i64);
        let trained = workouts
            .iter()
            .any(|w| w.date.with_timezone(tz).date_naive() == day);
        WeekdayStatus {
            day: day.weekday(),
            trained,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EquipmentConfig, EquipmentKind, MuscleGroup, TimeBreakdown};
    use chrono::{FixedOffset, TimeZone, Utc, Weekday};
    use uuid::Uuid;

    fn set(real_kg: f64, reps: u32, kind: SetKind) -> CompletedSet {
        CompletedSet {
            nominal_kg: real_kg,
            real_kg,
            reps,
            duration_seconds: 30,
            kind,
            equipment: EquipmentKind::Barbell,
        }
    }

    fn exercise(name: &str, sets: Vec<CompletedSet>) -> CompletedExercise {
        CompletedExercise {
            name: name.into(),
            muscle: MuscleGroup::Chest,
            equipment: EquipmentConfig::new(EquipmentKind::Barbell),
            sets,
        }
    }

    fn workout_on(date: NaiveDate) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            name: "test".into(),
            workout_type: "push".into(),
            date: Utc.from_utc_datetime(&date.and_hms_opt(18, 30, 0).unwrap()),
            duration_seconds: 3600,
            exercises: vec![],
            total_volume_kg: 0.0,
            total_sets: 0,
            exercise_count: 0,
            time_breakdown: TimeBreakdown::default(),
            new_prs: vec![],
        }
    }

    #[test]
    fn test_total_volume() {
        let sets = vec![
            set(100.0, 5, SetKind::Effective),
            set(90.0, 8, SetKind::Effective),
        ];
        assert_eq!(total_volume(&sets), 1220.0);
    }

    #[test]
    fn test_total_volume_empty() {
        assert_eq!(total_volume(&[]), 0.0);
    }

    #[test]
    fn test_non_finite_weight_counts_as_zero() {
        let sets = vec![set(f64::NAN, 5, SetKind::Effective), set(50.0, 2, SetKind::Effective)];
        assert_eq!(total_volume(&sets), 100.0);
    }

    #[test]
    fn test_effective_volume_excludes_warmups() {
        let sets = vec![
            set(40.0, 10, SetKind::WarmUp),
            set(70.0, 3, SetKind::Approach),
            set(100.0, 5, SetKind::Effective),
        ];
        assert_eq!(effective_volume(&sets), 500.0);
        assert_eq!(total_volume(&sets), 400.0 + 210.0 + 500.0);
    }

    #[test]
    fn test_normalize_exercise_name() {
        assert_eq!(normalize_exercise_name("  Bench   Press "), "bench press");
        assert_eq!(normalize_exercise_name("SQUAT"), "squat");
    }

    #[test]
    fn test_pr_requires_effective_set() {
        let table = PrTable::new();
        assert!(is_personal_record("Bench Press", 100.0, &table, SetKind::Effective));
        assert!(!is_personal_record("Bench Press", 100.0, &table, SetKind::WarmUp));
        assert!(!is_personal_record("Bench Press", 100.0, &table, SetKind::Approach));
    }

    #[test]
    fn test_pr_strict_improvement() {
        let mut table = PrTable::new();
        table.insert("bench press".into(), 100.0);

        assert!(!is_personal_record("Bench Press", 100.0, &table, SetKind::Effective));
        assert!(is_personal_record("Bench Press", 100.5, &table, SetKind::Effective));
    }

    #[test]
    fn test_update_prs_monotone() {
        let mut table = PrTable::new();

        // Weight sequence 80, 75, 90, 85: PR events only at 80 and 90
        let mut events = Vec::new();
        for w in [80.0, 75.0, 90.0, 85.0] {
            let ex = exercise("Squat", vec![set(w, 5, SetKind::Effective)]);
            events.extend(update_personal_records(&[ex], &mut table));
        }

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].weight_kg, 80.0);
        assert_eq!(events[1].weight_kg, 90.0);
        assert_eq!(table["squat"], 90.0);
    }

    #[test]
    fn test_update_prs_one_event_per_exercise() {
        let mut table = PrTable::new();
        let ex = exercise(
            "Deadlift",
            vec![
                set(120.0, 5, SetKind::Effective),
                set(140.0, 3, SetKind::Effective),
                set(130.0, 4, SetKind::Effective),
            ],
        );

        let events = update_personal_records(&[ex], &mut table);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].weight_kg, 140.0);
    }

    #[test]
    fn test_update_prs_ignores_warmup_only_exercise() {
        let mut table = PrTable::new();
        let ex = exercise("Row", vec![set(60.0, 10, SetKind::WarmUp)]);

        let events = update_personal_records(&[ex], &mut table);
        assert!(events.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_compute_level_thresholds() {
        assert_eq!(compute_level(0), LevelInfo { level: 1, tier: Tier::Rookie });
        assert_eq!(compute_level(7), LevelInfo { level: 1, tier: Tier::Rookie });
        assert_eq!(compute_level(8), LevelInfo { level: 2, tier: Tier::Apprentice });
        assert_eq!(compute_level(20), LevelInfo { level: 3, tier: Tier::Intermediate });
        assert_eq!(compute_level(50), LevelInfo { level: 4, tier: Tier::Advanced });
        assert_eq!(compute_level(100), LevelInfo { level: 5, tier: Tier::Elite });
        assert_eq!(compute_level(500), LevelInfo { level: 5, tier: Tier::Elite });
    }

    #[test]
    fn test_weekly_streak_monday_and_thursday() {
        // 2024-01-17 is a Wednesday; its week runs Mon 15th .. Sun 21st
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let workouts = vec![
            workout_on(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()), // Monday
            workout_on(NaiveDate::from_ymd_opt(2024, 1, 18).unwrap()), // Thursday
            workout_on(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),  // previous week
        ];

        let streak = weekly_streak(&workouts, today, &Utc);

        assert_eq!(streak[0].day, Weekday::Mon);
        assert_eq!(streak.iter().filter(|d| d.trained).count(), 2);
        assert!(streak[0].trained); // Monday
        assert!(streak[3].trained); // Thursday
        assert!(!streak[6].trained); // Sunday
    }

    #[test]
    fn test_weekly_streak_anchors_on_monday_even_on_sunday() {
        // 2024-01-21 is a Sunday; the week still starts Mon 15th
        let today = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let workouts = vec![workout_on(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())];

        let streak = weekly_streak(&workouts, today, &Utc);

        assert_eq!(streak[0].day, Weekday::Mon);
        assert!(streak[0].trained);
    }

    #[test]
    fn test_weekly_streak_uses_local_calendar_day() {
        // Monday 21:00 in UTC-5 is stored as Tuesday 02:00 UTC; the streak
        // must still mark Monday
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let mut workout = workout_on(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        workout.date = Utc.with_ymd_and_hms(2024, 1, 16, 2, 0, 0).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(); // local Monday
        let streak = weekly_streak(&[workout], today, &tz);

        assert!(streak[0].trained); // Monday
        assert!(!streak[1].trained); // Tuesday
    }
}
