use chrono::Local;
use clap::{Parser, Subcommand};
use ironlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Strength training session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a training session interactively (default)
    Log {
        /// Workout name
        #[arg(long, default_value = "Workout")]
        name: String,

        /// Workout type (push, pull, legs, full body, ...)
        #[arg(long = "type", default_value = "general")]
        workout_type: String,

        /// Rest interval in seconds (default from config)
        #[arg(long)]
        rest: Option<u32>,

        /// Plan mode: build a routine template without real execution
        #[arg(long)]
        plan: bool,
    },

    /// Show recent workout history
    History {
        /// Maximum number of workouts to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Export workout history to CSV
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Show this week's training streak
    Streak,

    /// Show the personal record table
    Prs,

    /// Show user level
    Level,

    /// Manage saved templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List saved templates
    List,
    /// Delete a template by id
    Delete { id: String },
}

fn main() -> Result<()> {
    ironlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Using data directory {}", data_dir.display());

    let mut store = FileStore::new(&data_dir);

    match cli.command {
        Some(Commands::Log {
            name,
            workout_type,
            rest,
            plan,
        }) => cmd_log(&mut store, &config, name, workout_type, rest, plan),
        Some(Commands::History { limit }) => cmd_history(&store, limit),
        Some(Commands::Export { output }) => cmd_export(&store, &output),
        Some(Commands::Streak) => cmd_streak(&store),
        Some(Commands::Prs) => cmd_prs(&store),
        Some(Commands::Level) => cmd_level(&store),
        Some(Commands::Templates { command }) => match command {
            TemplateCommands::List => cmd_templates_list(&store),
            TemplateCommands::Delete { id } => cmd_templates_delete(&mut store, &id),
        },
        None => cmd_log(
            &mut store,
            &config,
            "Workout".into(),
            "general".into(),
            None,
            false,
        ),
    }
}

fn cmd_log(
    store: &mut FileStore,
    config: &Config,
    name: String,
    workout_type: String,
    rest: Option<u32>,
    plan: bool,
) -> Result<()> {
    let mode = if plan {
        SessionMode::Plan
    } else {
        SessionMode::Live
    };
    let rest_seconds = rest.unwrap_or(config.session.default_rest_seconds);

    let mut session = Session::new(Box::new(SystemClock));
    session.start(mode);
    session.configure(name, workout_type, rest_seconds)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} SESSION", if plan { "PLAN" } else { "LIVE" });
    println!("╰─────────────────────────────────────────╯");

    let catalog = get_default_catalog();
    let pr_table = store.pr_table()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'workout: loop {
        print!("\nExercise name (blank to finish): ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break 'workout;
        };
        let exercise_name = line?.trim().to_string();
        if exercise_name.is_empty() {
            break 'workout;
        }

        let (muscle, equipment) = match catalog.find_by_name(&exercise_name) {
            Some(def) => (def.muscle.clone(), Some(def.equipment)),
            None => (MuscleGroup::Other("unspecified".into()), None),
        };
        session.begin_exercise(exercise_name.as_str(), muscle, equipment)?;

        if let Some(ex) = session.current_exercise() {
            if ex.equipment.fixed_weight_kg() > 0.0 {
                println!(
                    "  Barbell setup: +{} kg bar weight",
                    ex.equipment.fixed_weight_kg()
                );
            }
        }

        loop {
            if session.state() == SessionState::ExercisePreview {
                session.begin_set()?;
            }
            print!("  Set (WEIGHTxREPS, suffix w/a for warm-up/approach; c=close, f=finish): ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break 'workout;
            };
            let entry = line?.trim().to_lowercase();

            match entry.as_str() {
                "c" => match session.close_exercise() {
                    Ok(closed) => {
                        println!(
                            "  ✓ {} closed: {} sets, {} total ({} effective)",
                            closed.name,
                            closed.sets.len(),
                            format::format_volume(closed.volume_kg()),
                            format::format_volume(metrics::effective_volume(&closed.sets))
                        );
                        break;
                    }
                    Err(e) if e.is_rejection() => {
                        println!("  ! {}", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                },
                "f" => {
                    break 'workout;
                }
                _ => match parse_set_entry(&entry) {
                    Some((weight, reps, kind)) => {
                        match session.finish_set(weight, reps, kind) {
                            Ok(set) => {
                                let (real_kg, set_reps, set_kind) =
                                    (set.real_kg, set.reps, set.kind);
                                println!("  ✓ {} kg x {} reps recorded", real_kg, set_reps);
                                if metrics::is_personal_record(
                                    &exercise_name,
                                    real_kg,
                                    &pr_table,
                                    set_kind,
                                ) {
                                    println!("  ★ PR territory: beats your stored best!");
                                }
                            }
                            Err(e) if e.is_rejection() => {
                                println!("  ! {}", e);
                                continue;
                            }
                            Err(e) => return Err(e),
                        }
                        if session.state() == SessionState::Resting {
                            print!(
                                "  Resting {}s — Enter to skip: ",
                                session.rest_remaining_seconds()
                            );
                            io::stdout().flush()?;
                            if lines.next().is_none() {
                                break 'workout;
                            }
                            if session.poll().is_none() && session.state() == SessionState::Resting
                            {
                                session.skip_rest()?;
                            }
                        }
                    }
                    None => {
                        println!("  ! Could not parse set entry '{}'", entry);
                    }
                },
            }
        }
    }

    match finish_workout(&mut session, store, config.session.plan_sets) {
        Ok(FinishOutcome::Recorded { workout, new_prs }) => {
            println!("\n✓ Workout recorded!");
            println!("  Duration: {}", format::format_duration(workout.duration_seconds));
            println!("  Volume:   {}", format::format_volume(workout.total_volume_kg));
            println!(
                "  Sets:     {} across {} exercises",
                workout.total_sets, workout.exercise_count
            );
            for pr in &new_prs {
                println!("  ★ New PR: {} @ {} kg", pr.exercise, pr.weight_kg);
            }
        }
        Ok(FinishOutcome::TemplateSaved { .. }) => {
            println!("\n✓ Routine saved as template!");
        }
        Err(e) if e.is_rejection() => {
            println!("\n! {}", e);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Parse a set entry like "80x5", "60x10 w" or "100x3 a"
fn parse_set_entry(entry: &str) -> Option<(f64, u32, SetKind)> {
    let mut parts = entry.split_whitespace();
    let body = parts.next()?;

    let kind = match parts.next() {
        Some("w") => SetKind::WarmUp,
        Some("a") => SetKind::Approach,
        Some("e") | None => SetKind::Effective,
        Some(_) => return None,
    };

    let (weight_str, reps_str) = body.split_once('x')?;
    let weight: f64 = weight_str.trim().parse().ok()?;
    let reps: u32 = reps_str.trim().parse().ok()?;
    if !weight.is_finite() || weight < 0.0 {
        return None;
    }

    Some((weight, reps, kind))
}

fn cmd_history(store: &FileStore, limit: usize) -> Result<()> {
    let history = store.workout_history()?;

    if history.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    println!("Recent workouts:");
    for workout in history.iter().take(limit) {
        println!(
            "  {}  {:<20} {:>10}  {} sets  {}",
            format::format_date(workout.date),
            workout.name,
            format::format_volume(workout.total_volume_kg),
            workout.total_sets,
            format::format_duration(workout.duration_seconds),
        );
    }

    Ok(())
}

fn cmd_export(store: &FileStore, output: &PathBuf) -> Result<()> {
    let history = store.workout_history()?;
    let count = export_history_csv(&history, output)?;
    println!("✓ Exported {} workouts to {}", count, output.display());
    Ok(())
}

fn cmd_streak(store: &FileStore) -> Result<()> {
    let history = store.workout_history()?;
    let today = Local::now().date_naive();
    let streak = metrics::weekly_streak(&history, today, &Local);

    println!("This week:");
    for status in &streak {
        println!(
            "  {:?}  {}",
            status.day,
            if status.trained { "●" } else { "─" }
        );
    }
    let trained = streak.iter().filter(|d| d.trained).count();
    println!("{} of 7 days trained", trained);

    Ok(())
}

fn cmd_prs(store: &FileStore) -> Result<()> {
    let table = store.pr_table()?;

    if table.is_empty() {
        println!("No personal records yet.");
        return Ok(());
    }

    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    println!("Personal records:");
    for (exercise, weight) in entries {
        println!("  {:<25} {} kg", exercise, weight);
    }

    Ok(())
}

fn cmd_level(store: &FileStore) -> Result<()> {
    let count = store.workout_history()?.len() as u32;
    let info = metrics::compute_level(count);
    println!(
        "Level {} ({:?}) — {} workouts logged",
        info.level, info.tier, count
    );
    Ok(())
}

fn cmd_templates_list(store: &FileStore) -> Result<()> {
    let templates = store.templates()?;

    if templates.is_empty() {
        println!("No templates saved.");
        return Ok(());
    }

    println!("Templates:");
    for template in templates {
        println!(
            "  {}  {:<20} {} exercises, rest {}s",
            template.id,
            template.name,
            template.exercises.len(),
            template.rest_seconds
        );
    }

    Ok(())
}

fn cmd_templates_delete(store: &mut FileStore, id: &str) -> Result<()> {
    match uuid::Uuid::parse_str(id) {
        Ok(id) => {
            // Stale ids are a silent no-op in the store
            store.delete_template(id)?;
            println!("✓ Deleted (if it existed)");
        }
        Err(_) => {
            println!("! '{}' is not a valid template id", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_entry() {
        assert_eq!(
            parse_set_entry("80x5"),
            Some((80.0, 5, SetKind::Effective))
        );
        assert_eq!(
            parse_set_entry("60x10 w"),
            Some((60.0, 10, SetKind::WarmUp))
        );
        assert_eq!(
            parse_set_entry("100x3 a"),
            Some((100.0, 3, SetKind::Approach))
        );
        assert_eq!(
            parse_set_entry("82.5x8"),
            Some((82.5, 8, SetKind::Effective))
        );
    }

    #[test]
    fn test_parse_set_entry_rejects_garbage() {
        assert_eq!(parse_set_entry("banana"), None);
        assert_eq!(parse_set_entry("80x"), None);
        assert_eq!(parse_set_entry("x5"), None);
        assert_eq!(parse_set_entry("-10x5"), None);
        assert_eq!(parse_set_entry("80x5 z"), None);
    }
}
