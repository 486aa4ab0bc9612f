// src/compose.rs
// Interactive, stdin-driven walk through the composition steps.
use anyhow::{bail, Result};
use chrono::Local;
use comfy_table::Color;
use std::io::{stdin, stdout, Write};
use strum::IntoEnumIterator;

use workout_composer_lib::{
    ComposerService, CompositionMethod, ExerciseEntry, Goal, PresetGoal, Step, StepController,
    StepError, StudentProfile, SubmitError, SuggestionError, WorkoutDraft, CUSTOM_GOAL_LABEL,
};

use crate::{print_catalog_table, print_entries_table};

enum Flow {
    Continue,
    Quit,
    Submitted,
}

pub async fn run(
    service: &ComposerService,
    student: StudentProfile,
    workout_id: Option<String>,
    header_color: Color,
) -> Result<()> {
    let mut draft = WorkoutDraft::new();
    let mut stepper = StepController::new();

    if let Some(id) = workout_id.as_deref() {
        loop {
            match service.hydrate_draft(&mut draft, Some(id), &student.id).await {
                Ok(_) => {
                    println!("Editing '{}' ({} exercises).", draft.name, draft.exercises().len());
                    break;
                }
                Err(e) => {
                    eprintln!("Could not load workout {}: {}", id, e);
                    if !confirm("Try again?")? {
                        return Ok(());
                    }
                }
            }
        }
    }

    loop {
        println!("\n=== Step {} ===", stepper.step());
        let flow = match stepper.step() {
            Step::TrainingData => training_data_step(&mut draft, &mut stepper)?,
            Step::MethodChoice => method_step(&draft, &mut stepper)?,
            Step::ManualExercises => manual_step(service, &mut draft, &mut stepper, header_color).await?,
            Step::AiExercises => {
                ai_step(service, &student, &mut draft, &mut stepper, header_color).await?
            }
            Step::Review => {
                review_step(service, &student, workout_id.as_deref(), &draft, &mut stepper, header_color)
                    .await?
            }
        };
        match flow {
            Flow::Continue => {}
            Flow::Quit => {
                println!("Leaving without saving.");
                return Ok(());
            }
            Flow::Submitted => return Ok(()),
        }
    }
}

fn training_data_step(draft: &mut WorkoutDraft, stepper: &mut StepController) -> Result<Flow> {
    let name = prompt(&format!("Workout name [{}] (q to quit): ", draft.name))?;
    if name.eq_ignore_ascii_case("q") {
        return Ok(Flow::Quit);
    }
    if !name.is_empty() {
        draft.name = name;
    }

    let presets: Vec<PresetGoal> = PresetGoal::iter().collect();
    println!("Goals:");
    for (idx, preset) in presets.iter().enumerate() {
        println!("  {}. {}", idx + 1, preset);
    }
    println!("  {}. {}", presets.len() + 1, CUSTOM_GOAL_LABEL);
    let current = draft.goal.as_ref().map(ToString::to_string).unwrap_or_default();
    let choice = prompt(&format!("Goal [{}]: ", current))?;
    if !choice.is_empty() {
        match choice.parse::<usize>() {
            Ok(n) if (1..=presets.len()).contains(&n) => draft.goal = Some(Goal::Preset(presets[n - 1])),
            Ok(n) if n == presets.len() + 1 => {
                let text = prompt("Custom goal: ")?;
                draft.goal = Some(Goal::Custom(text));
            }
            _ => println!("Unknown goal '{}'.", choice),
        }
    }

    report(stepper.next_step(draft));
    Ok(Flow::Continue)
}

fn method_step(draft: &WorkoutDraft, stepper: &mut StepController) -> Result<Flow> {
    let choice = prompt("[m]anual, [a]i, [b]ack, [q]uit: ")?;
    match choice.to_lowercase().as_str() {
        "m" => report(stepper.choose_method(CompositionMethod::Manual, draft)),
        "a" => report(stepper.choose_method(CompositionMethod::Ai, draft)),
        "b" => {
            stepper.prev_step();
        }
        "q" => return Ok(Flow::Quit),
        _ => println!("Unknown option."),
    }
    Ok(Flow::Continue)
}

async fn manual_step(
    service: &ComposerService,
    draft: &mut WorkoutDraft,
    stepper: &mut StepController,
    header_color: Color,
) -> Result<Flow> {
    show_draft(draft, header_color);
    let input = prompt("[a]dd, [e]dit N, [r]emove N, [n]ext, [b]ack, [q]uit: ")?;
    let (command, index) = split_command(&input);
    match command.as_str() {
        "a" => add_from_catalog(service, draft, header_color).await?,
        "e" => edit_entry(draft, index)?,
        "r" => remove_entry(draft, index),
        // The AI step does not apply to a manual workout
        "n" => report(stepper.go_to_step(Step::Review.index(), draft)),
        "b" => report(stepper.go_to_step(Step::MethodChoice.index(), draft)),
        "q" => return Ok(Flow::Quit),
        _ => println!("Unknown option."),
    }
    Ok(Flow::Continue)
}

async fn ai_step(
    service: &ComposerService,
    student: &StudentProfile,
    draft: &mut WorkoutDraft,
    stepper: &mut StepController,
    header_color: Color,
) -> Result<Flow> {
    show_draft(draft, header_color);
    if draft.unlinked_count() > 0 {
        println!("{} exercise(s) not linked to the catalog.", draft.unlinked_count());
    }
    let input = prompt("[g]enerate, [m]atch N, [e]dit N, [r]emove N, [n]ext, [b]ack, [q]uit: ")?;
    let (command, index) = split_command(&input);
    match command.as_str() {
        "g" => {
            if !draft.exercises().is_empty() && !confirm("Replace the current exercises?")? {
                return Ok(Flow::Continue);
            }
            match service
                .apply_suggestions(draft, student, Local::now().date_naive())
                .await
            {
                Ok(count) => println!("{} exercises suggested.", count),
                Err(SuggestionError::Input(e)) => println!("{}", e),
                Err(SuggestionError::Remote(e)) => println!("Could not get suggestions: {}", e),
            }
        }
        "m" => match_entry(service, draft, index).await?,
        "e" => edit_entry(draft, index)?,
        "r" => remove_entry(draft, index),
        "n" => report(stepper.next_step(draft)),
        "b" => report(stepper.go_to_step(Step::MethodChoice.index(), draft)),
        "q" => return Ok(Flow::Quit),
        _ => println!("Unknown option."),
    }
    Ok(Flow::Continue)
}

async fn review_step(
    service: &ComposerService,
    student: &StudentProfile,
    workout_id: Option<&str>,
    draft: &WorkoutDraft,
    stepper: &mut StepController,
    header_color: Color,
) -> Result<Flow> {
    println!(
        "Workout: {}\nGoal: {}\nStudent: {}",
        draft.name,
        draft.goal.as_ref().map(ToString::to_string).unwrap_or_default(),
        if student.name.is_empty() { student.id.as_str() } else { student.name.as_str() },
    );
    show_draft(draft, header_color);

    let input = prompt("[s]ubmit, [b]ack, [q]uit: ")?;
    match input.to_lowercase().as_str() {
        "s" => match service.submit(stepper, draft, student, workout_id).await {
            Ok(workout) => {
                println!("Saved workout '{}' (id {}).", workout.name_workout, workout.id);
                return Ok(Flow::Submitted);
            }
            Err(SubmitError::Remote(e)) => println!("Could not save the workout, try again: {}", e),
            Err(e) => println!("{}", e),
        },
        "b" => {
            let back_to = stepper
                .method()
                .map_or(Step::MethodChoice, CompositionMethod::exercise_step);
            report(stepper.go_to_step(back_to.index(), draft));
        }
        "q" => return Ok(Flow::Quit),
        _ => println!("Unknown option."),
    }
    Ok(Flow::Continue)
}

async fn add_from_catalog(
    service: &ComposerService,
    draft: &mut WorkoutDraft,
    header_color: Color,
) -> Result<()> {
    let query = prompt("Search catalog by name (blank for all): ")?;
    let filter = if query.is_empty() { None } else { Some(query.as_str()) };
    let exercises = service.load_catalog_or_empty(filter).await;
    if exercises.is_empty() {
        println!("No exercises found.");
        return Ok(());
    }
    print_catalog_table(&exercises, header_color);

    let choice = prompt("Pick #: ")?;
    let Some(exercise) = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| exercises.get(idx))
    else {
        println!("Invalid selection.");
        return Ok(());
    };

    let existing = draft.get(&ExerciseEntry::linked(exercise.clone()).identity_key()).cloned();
    let base = existing.unwrap_or_else(|| ExerciseEntry::linked(exercise.clone()));
    let entry = prompt_params(base)?;
    draft.add_or_update(entry);
    Ok(())
}

async fn match_entry(service: &ComposerService, draft: &mut WorkoutDraft, index: Option<usize>) -> Result<()> {
    let Some(entry) = pick(draft, index) else {
        return Ok(());
    };
    if entry.is_linked() {
        println!("'{}' is already linked.", entry.name());
        return Ok(());
    }
    let key = entry.identity_key();
    match service.find_match(entry.name()).await {
        Ok(Some(found)) => {
            println!("Best match: {} ({}) [{}]", found.name, found.id, found.category);
            if confirm("Link this exercise?")? {
                service.link(draft, &key, found);
            }
        }
        Ok(None) => println!("No catalog exercise matches '{}'.", entry.name()),
        Err(e) => println!("Catalog lookup failed: {}", e),
    }
    Ok(())
}

fn edit_entry(draft: &mut WorkoutDraft, index: Option<usize>) -> Result<()> {
    let Some(entry) = pick(draft, index) else {
        return Ok(());
    };
    let updated = prompt_params(entry)?;
    draft.add_or_update(updated);
    Ok(())
}

fn remove_entry(draft: &mut WorkoutDraft, index: Option<usize>) {
    if let Some(entry) = pick(draft, index) {
        draft.remove(&entry.identity_key());
    }
}

/// Clone of the entry at 1-based `index`, printing a hint when it is missing.
fn pick(draft: &WorkoutDraft, index: Option<usize>) -> Option<ExerciseEntry> {
    let found = index
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| draft.exercises().get(idx))
        .cloned();
    if found.is_none() {
        println!("Give the exercise number, e.g. 'e 2'.");
    }
    found
}

fn prompt_params(mut entry: ExerciseEntry) -> Result<ExerciseEntry> {
    println!("Editing '{}' (enter keeps the current value)", entry.name());
    for (label, field) in [
        ("Sets", &mut entry.sets),
        ("Repetitions", &mut entry.repetitions),
        ("Rest time", &mut entry.rest_time),
        ("Observations", &mut entry.observations),
    ] {
        let value = prompt(&format!("{} [{}]: ", label, field))?;
        if !value.is_empty() {
            *field = value;
        }
    }
    Ok(entry)
}

fn show_draft(draft: &WorkoutDraft, header_color: Color) {
    if draft.exercises().is_empty() {
        println!("No exercises yet.");
    } else {
        print_entries_table(draft.exercises(), header_color);
    }
}

fn report(result: Result<Step, StepError>) {
    if let Err(e) = result {
        println!("{}", e);
    }
}

fn split_command(input: &str) -> (String, Option<usize>) {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let index = parts.next().and_then(|n| n.parse().ok());
    (command, index)
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    stdout().flush()?;
    let mut input = String::new();
    if stdin().read_line(&mut input)? == 0 {
        bail!("Input closed before the workout was finished.");
    }
    Ok(input.trim().to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N]: ", question))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
