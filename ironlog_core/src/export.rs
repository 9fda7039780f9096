//! CSV export of the workout history.

use crate::{Result, WorkoutRecord};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    name: String,
    workout_type: String,
    date: String,
    duration_seconds: u32,
    exercises: u32,
    sets: u32,
    volume_kg: f64,
    series_seconds: u32,
    rest_seconds: u32,
    skipped_rest_seconds: u32,
    new_prs: usize,
}

impl From<&WorkoutRecord> for CsvRow {
    fn from(w: &WorkoutRecord) -> Self {
        CsvRow {
            id: w.id.to_string(),
            name: w.name.clone(),
            workout_type: w.workout_type.clone(),
            date: w.date.to_rfc3339(),
            duration_seconds: w.duration_seconds,
            exercises: w.exercise_count,
            sets: w.total_sets,
            volume_kg: w.total_volume_kg,
            series_seconds: w.time_breakdown.series_seconds,
            rest_seconds: w.time_breakdown.rest_seconds,
            skipped_rest_seconds: w.time_breakdown.skipped_rest_seconds,
            new_prs: w.new_prs.len(),
        }
    }
}

/// Write the workout history to a CSV file, one row per workout.
/// Returns the number of rows written.
pub fn export_history_csv(workouts: &[WorkoutRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_path(path)?;
    for workout in workouts {
        writer.serialize(CsvRow::from(workout))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} workouts to {:?}", workouts.len(), path);
    Ok(workouts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeBreakdown;
    use chrono::Utc;
    use uuid::Uuid;

    fn workout(name: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            workout_type: "push".into(),
            date: Utc::now(),
            duration_seconds: 3600,
            exercises: vec![],
            total_volume_kg: 1220.0,
            total_sets: 12,
            exercise_count: 4,
            time_breakdown: TimeBreakdown {
                series_seconds: 900,
                rest_seconds: 2400,
                skipped_rest_seconds: 300,
            },
            new_prs: vec![],
        }
    }

    #[test]
    fn test_export_writes_headers_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let workouts = vec![workout("Push Day"), workout("Pull Day")];
        let count = export_history_csv(&workouts, &csv_path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("id,name,workout_type"));
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("Push Day"));
    }

    #[test]
    fn test_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let count = export_history_csv(&[], &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
