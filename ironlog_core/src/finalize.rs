//! Workout finalizer.
//!
//! Consumes a completed session: freezes final durations, computes the
//! aggregate totals, folds new PRs into the persisted table, writes the
//! immutable workout record plus its feed post, and resets the session.
//! Plan-mode sessions are saved back into their template instead.

use crate::config::PlanSetPolicy;
use crate::error::{Rejection, Result};
use crate::metrics::{self, normalize_exercise_name};
use crate::session::Session;
use crate::store::Store;
use crate::types::{
    CompletedExercise, ExerciseBlueprint, FeedPost, PrEvent, SessionMode, Template, WorkoutRecord,
};
use uuid::Uuid;

/// What finishing a session produced
#[derive(Clone, Debug)]
pub enum FinishOutcome {
    /// A live workout was recorded and posted to the feed
    Recorded {
        workout: WorkoutRecord,
        new_prs: Vec<PrEvent>,
    },
    /// A plan-mode session was saved into its template
    TemplateSaved { template_id: Uuid },
}

/// Finish the in-flight workout.
///
/// An open exercise with at least one set is auto-closed first. A workout
/// with zero completed exercises is rejected with no persistence. The
/// `policy` decides whether zero-duration sets count toward the aggregate
/// volume and set totals.
pub fn finish_workout(
    session: &mut Session,
    store: &mut dyn Store,
    policy: PlanSetPolicy,
) -> Result<FinishOutcome> {
    session.close_open_exercise_if_any();

    if session.completed_exercises().is_empty() {
        return Err(Rejection::EmptyWorkout.into());
    }

    if session.mode() == SessionMode::Plan {
        return save_into_template(session, store);
    }

    let duration_seconds = session.stop_all_timers();
    let exercises: Vec<CompletedExercise> = session.completed_exercises().to_vec();

    let (total_volume_kg, total_sets) = aggregate_totals(&exercises, policy);

    let mut table = store.pr_table()?;
    let new_prs = metrics::update_personal_records(&exercises, &mut table);
    store.save_pr_table(&table)?;

    let now = session.now();
    let exercise_count = exercises.len() as u32;
    let workout = WorkoutRecord {
        id: Uuid::new_v4(),
        name: session.name().to_string(),
        workout_type: session.workout_type().to_string(),
        date: now,
        duration_seconds,
        exercises,
        total_volume_kg,
        total_sets,
        exercise_count,
        time_breakdown: session.time_breakdown(),
        new_prs: new_prs.clone(),
    };

    let profile = store.profile()?;
    let post = FeedPost {
        id: Uuid::new_v4(),
        workout_id: workout.id,
        author: profile.name,
        posted_at: now,
        workout_name: workout.name.clone(),
        workout_type: workout.workout_type.clone(),
        total_volume_kg,
        total_sets,
        duration_seconds,
        likes: 0,
        comments: Vec::new(),
    };

    store.append_workout(&workout)?;
    store.append_post(&post)?;

    tracing::info!(
        "Recorded workout '{}': {} exercises, {} sets, {:.0} kg, {} new PRs",
        workout.name,
        workout.exercise_count,
        workout.total_sets,
        workout.total_volume_kg,
        new_prs.len()
    );

    session.reset();
    Ok(FinishOutcome::Recorded { workout, new_prs })
}

/// Aggregate volume and set count, honoring the plan-set policy
fn aggregate_totals(exercises: &[CompletedExercise], policy: PlanSetPolicy) -> (f64, u32) {
    let mut volume = 0.0;
    let mut sets = 0u32;

    for exercise in exercises {
        for set in &exercise.sets {
            if policy == PlanSetPolicy::Exclude && set.duration_seconds == 0 {
                continue;
            }
            if set.real_kg.is_finite() {
                volume += set.real_kg * f64::from(set.reps);
            }
            sets += 1;
        }
    }

    (volume, sets)
}

/// Plan mode: the exercise list becomes the template's blueprint, matched
/// by the session's source template id or, failing that, by name.
fn save_into_template(session: &mut Session, store: &mut dyn Store) -> Result<FinishOutcome> {
    let blueprints: Vec<ExerciseBlueprint> = session
        .completed_exercises()
        .iter()
        .map(|ex| ExerciseBlueprint {
            name: ex.name.clone(),
            muscle: ex.muscle.clone(),
            equipment: ex.equipment,
            estimated_sets: ex.sets.len() as u32,
            estimated_weight_kg: ex
                .sets
                .iter()
                .map(|s| s.nominal_kg)
                .fold(0.0, f64::max),
        })
        .collect();

    let templates = store.templates()?;
    let existing = session
        .source_template()
        .and_then(|id| templates.iter().find(|t| t.id == id))
        .or_else(|| {
            let key = normalize_exercise_name(session.name());
            templates
                .iter()
                .find(|t| normalize_exercise_name(&t.name) == key)
        });

    let template = match existing {
        Some(t) => Template {
            id: t.id,
            name: t.name.clone(),
            workout_type: session.workout_type().to_string(),
            rest_seconds: session.rest_duration_seconds(),
            exercises: blueprints,
        },
        None => Template {
            id: Uuid::new_v4(),
            name: session.name().to_string(),
            workout_type: session.workout_type().to_string(),
            rest_seconds: session.rest_duration_seconds(),
            exercises: blueprints,
        },
    };

    let template_id = template.id;
    store.upsert_template(&template)?;
    tracing::info!("Saved plan session into template '{}'", template.name);

    session.reset();
    Ok(FinishOutcome::TemplateSaved { template_id })
}
