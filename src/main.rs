//src/main.rs
mod cli;
mod compose;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::EnvFilter;

use workout_composer_lib::{
    CatalogExercise, ComposerService, ExerciseEntry, Goal, StudentProfile, SuggestionError,
    Workout, WorkoutDraft,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("workout_composer=info,workout_composer_lib=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    match cli_args.command {
        cli::Commands::GenerateCompletion { shell } => {
            let mut cmd = cli::build_cli_command();
            let bin_name = cmd.get_name().to_string();
            eprintln!("Generating completion script for {}...", shell);
            clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
            return Ok(());
        }
        cli::Commands::ConfigPath => {
            let path = workout_composer_lib::get_config_path_util()
                .context("Failed to determine configuration file path")?;
            println!("{}", path.display());
            return Ok(());
        }
        _ => {}
    }

    let service = ComposerService::initialize().context("Failed to initialize application service")?;
    let header_color = service.config.theme.header();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } | cli::Commands::ConfigPath => {
            unreachable!("Handled before service initialization");
        }
        cli::Commands::Exercises { name } => {
            let exercises = service
                .client()
                .list_exercises(name.as_deref())
                .await
                .context("Failed to list exercises")?;
            if export_csv {
                print_catalog_csv(&exercises)?;
            } else if exercises.is_empty() {
                println!("No exercises found.");
            } else {
                print_catalog_table(&exercises, header_color);
            }
        }
        cli::Commands::Exercise { id } => {
            let exercise = service
                .client()
                .get_exercise(&id)
                .await
                .with_context(|| format!("Failed to load exercise '{}'", id))?;
            if export_csv {
                print_catalog_csv(std::slice::from_ref(&exercise))?;
            } else {
                print_catalog_detail(&exercise);
            }
        }
        cli::Commands::Workout { workout_id, student_id } => {
            let workout = service
                .client()
                .fetch_workout(&workout_id, &student_id)
                .await
                .with_context(|| format!("Failed to load workout '{}'", workout_id))?;
            if export_csv {
                print_entries_csv(&workout.exercises)?;
            } else {
                print_workout_header(&workout);
                print_entries_table(&workout.exercises, header_color);
            }
        }
        cli::Commands::Suggest { student, name, goal } => {
            let student: StudentProfile = student.into();
            let mut draft = WorkoutDraft::new();
            draft.name = name;
            draft.goal = Goal::from_type_label(&goal);
            match service
                .apply_suggestions(&mut draft, &student, Local::now().date_naive())
                .await
            {
                Ok(count) => {
                    if export_csv {
                        print_entries_csv(draft.exercises())?;
                    } else {
                        println!("{} exercises suggested for '{}':", count, draft.name);
                        print_entries_table(draft.exercises(), header_color);
                    }
                }
                Err(SuggestionError::Input(e)) => bail!("{}", e),
                Err(SuggestionError::Remote(e)) => bail!("AI suggestion failed: {}", e),
            }
        }
        cli::Commands::Compose { student, workout_id } => {
            compose::run(&service, student.into(), workout_id, header_color).await?;
        }
    }

    Ok(())
}

pub(crate) fn print_catalog_table(exercises: &[CatalogExercise], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Category").fg(header_color),
            Cell::new("Muscles").fg(header_color),
        ]);

    for (idx, ex) in exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&ex.id),
            Cell::new(&ex.name),
            Cell::new(&ex.category),
            Cell::new(ex.muscle_group.join(", ")),
        ]);
    }
    println!("{table}");
}

fn print_catalog_detail(exercise: &CatalogExercise) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let rows = [
        ("ID", exercise.id.clone()),
        ("Name", exercise.name.clone()),
        ("Category", exercise.category.clone()),
        ("Muscles", exercise.muscle_group.join(", ")),
        ("Description", exercise.description.clone()),
        ("Images", exercise.images.len().to_string()),
        ("Video", exercise.video.clone().unwrap_or_else(|| "N/A".to_string())),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{table}");
}

fn print_workout_header(workout: &Workout) {
    println!(
        "\n--- {} ({}) for {} ---",
        workout.name_workout,
        if workout.workout_type.is_empty() { "no type" } else { workout.workout_type.as_str() },
        if workout.student_name.is_empty() { &workout.student_id } else { &workout.student_name },
    );
    if let Some(updated) = workout.updated_at.or(workout.created_at) {
        println!("Last saved: {}", updated.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    }
}

pub(crate) fn print_entries_table(entries: &[ExerciseEntry], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Linked").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Rest").fg(header_color),
            Cell::new("Notes").fg(header_color),
        ]);

    for (idx, entry) in entries.iter().enumerate() {
        let linked = if entry.is_linked() {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(entry.name()),
            linked,
            Cell::new(&entry.sets),
            Cell::new(&entry.repetitions),
            Cell::new(&entry.rest_time),
            Cell::new(&entry.observations),
        ]);
    }
    println!("{table}");
}

fn print_catalog_csv(exercises: &[CatalogExercise]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Name", "Category", "Muscles", "Description"])?;
    for ex in exercises {
        let muscles = ex.muscle_group.join(";");
        writer.write_record([
            ex.id.as_str(),
            ex.name.as_str(),
            ex.category.as_str(),
            muscles.as_str(),
            ex.description.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_entries_csv(entries: &[ExerciseEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Position", "Exercise", "Exercise_ID", "Sets", "Reps", "Rest", "Notes"])?;
    for (idx, entry) in entries.iter().enumerate() {
        let id = match &entry.exercise_id_ref {
            workout_composer_lib::ExerciseRef::Linked(ex) => ex.id.as_str(),
            workout_composer_lib::ExerciseRef::Unlinked(_) => "",
        };
        let position = (idx + 1).to_string();
        writer.write_record([
            position.as_str(),
            entry.name(),
            id,
            entry.sets.as_str(),
            entry.repetitions.as_str(),
            entry.rest_time.as_str(),
            entry.observations.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
