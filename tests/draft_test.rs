use std::collections::HashSet;
use workout_composer_lib::{
    CatalogExercise, ExerciseEntry, ExerciseRef, Goal, IdentityKey, LinkPlacement, PresetGoal,
    StudentProfile, Workout, WorkoutDraft,
};

fn catalog(id: &str, name: &str) -> CatalogExercise {
    CatalogExercise {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        category: "Pernas".to_string(),
        muscle_group: vec!["quadriceps".to_string()],
        images: Vec::new(),
        video: None,
    }
}

fn linked(id: &str, name: &str) -> ExerciseEntry {
    ExerciseEntry::linked(catalog(id, name)).with_params("10", "3", "60s")
}

fn names(draft: &WorkoutDraft) -> Vec<&str> {
    draft.exercises().iter().map(|e| e.name()).collect()
}

#[test]
fn test_add_single_linked_exercise() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(ExerciseEntry::linked(catalog("ex1", "Squat")).with_params("10", "3", "60s"));

    assert_eq!(draft.exercises().len(), 1);
    let entry = &draft.exercises()[0];
    assert_eq!(entry.identity_key(), IdentityKey::Id("ex1".to_string()));
    assert_eq!(entry.name(), "Squat");
    assert_eq!(entry.repetitions, "10");
    assert_eq!(entry.sets, "3");
    assert_eq!(entry.rest_time, "60s");
    assert_eq!(entry.observations, "");

    let json = serde_json::to_value(entry).unwrap();
    assert_eq!(json["exerciseIdRef"]["id"], "ex1");
    assert_eq!(json["exerciseIdRef"]["name"], "Squat");
    assert_eq!(json["restTime"], "60s");
    assert_eq!(json["observations"], "");
}

#[test]
fn test_update_preserves_position() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(linked("ex2", "Bench Press"));
    draft.add_or_update(linked("ex3", "Deadlift"));

    let mut updated = linked("ex2", "Bench Press");
    updated.sets = "5".to_string();
    draft.add_or_update(updated);

    assert_eq!(names(&draft), vec!["Squat", "Bench Press", "Deadlift"]);
    assert_eq!(draft.exercises()[1].sets, "5");
    assert_eq!(draft.exercises()[0].sets, "3");
}

#[test]
fn test_new_key_is_appended() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(ExerciseEntry::unlinked("Plank").with_params("30s", "3", "30s"));
    draft.add_or_update(linked("ex2", "Row"));

    assert_eq!(names(&draft), vec!["Squat", "Plank", "Row"]);
}

#[test]
fn test_identity_keys_stay_unique() {
    let mut draft = WorkoutDraft::new();
    let sequence = [
        linked("ex1", "Squat"),
        ExerciseEntry::unlinked("Squat"),
        linked("ex1", "Squat (renamed)"),
        ExerciseEntry::unlinked("Squat").with_params("12", "4", "90s"),
        linked("ex2", "Row"),
        linked("ex1", "Squat"),
    ];
    for entry in sequence {
        draft.add_or_update(entry);
    }

    // ex1 by id, "Squat" by name, ex2 by id
    assert_eq!(draft.exercises().len(), 3);
    let keys: HashSet<IdentityKey> = draft.exercises().iter().map(|e| e.identity_key()).collect();
    assert_eq!(keys.len(), draft.exercises().len());
    let unlinked = draft.get(&IdentityKey::Name("Squat".to_string())).unwrap();
    assert_eq!(unlinked.repetitions, "12");
}

#[test]
fn test_linked_with_empty_id_is_keyed_by_name() {
    let entry = ExerciseEntry::linked(catalog("  ", "Lunge"));
    assert_eq!(entry.identity_key(), IdentityKey::Name("Lunge".to_string()));
}

#[test]
fn test_remove_is_idempotent() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(linked("ex2", "Row"));

    assert!(!draft.remove(&IdentityKey::Id("missing".to_string())));
    assert_eq!(draft.exercises().len(), 2);

    let key = IdentityKey::Id("ex1".to_string());
    assert!(draft.remove(&key));
    let after_once = draft.clone();
    assert!(!draft.remove(&key));
    assert_eq!(draft, after_once);
    assert_eq!(names(&draft), vec!["Row"]);
}

#[test]
fn test_link_appends_by_default_placement() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(ExerciseEntry::unlinked("Leg Press").with_params("12", "4", "90s"));
    draft.add_or_update(linked("ex3", "Calf Raise"));

    let linked_ok = draft.link(
        &IdentityKey::Name("Leg Press".to_string()),
        catalog("ex9", "Leg Press"),
        LinkPlacement::default(),
    );

    assert!(linked_ok);
    assert_eq!(names(&draft), vec!["Squat", "Calf Raise", "Leg Press"]);
    let last = &draft.exercises()[2];
    assert_eq!(last.identity_key(), IdentityKey::Id("ex9".to_string()));
    assert!(last.is_linked());
    assert_eq!(last.repetitions, "12");
    assert_eq!(last.sets, "4");
    assert_eq!(last.rest_time, "90s");
}

#[test]
fn test_link_in_place_keeps_position() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(ExerciseEntry::unlinked("Leg Press").with_params("12", "4", "90s"));
    draft.add_or_update(linked("ex3", "Calf Raise"));

    assert!(draft.link(
        &IdentityKey::Name("Leg Press".to_string()),
        catalog("ex9", "Leg Press"),
        LinkPlacement::InPlace,
    ));

    assert_eq!(names(&draft), vec!["Squat", "Leg Press", "Calf Raise"]);
    assert_eq!(draft.exercises()[1].identity_key(), IdentityKey::Id("ex9".to_string()));
}

#[test]
fn test_link_onto_existing_id_keeps_keys_unique() {
    for placement in [LinkPlacement::Append, LinkPlacement::InPlace] {
        let mut draft = WorkoutDraft::new();
        draft.add_or_update(linked("ex9", "Leg Press"));
        draft.add_or_update(ExerciseEntry::unlinked("leg press machine").with_params("8", "3", "2min"));

        assert!(draft.link(
            &IdentityKey::Name("leg press machine".to_string()),
            catalog("ex9", "Leg Press"),
            placement,
        ));

        assert_eq!(draft.exercises().len(), 1, "placement {placement:?}");
        assert_eq!(draft.exercises()[0].repetitions, "8");
    }
}

#[test]
fn test_link_unknown_key_is_noop() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    let before = draft.clone();

    assert!(!draft.link(
        &IdentityKey::Name("Nope".to_string()),
        catalog("ex9", "Leg Press"),
        LinkPlacement::Append,
    ));
    assert_eq!(draft, before);
}

#[test]
fn test_replace_exercises_discards_previous_list() {
    let mut draft = WorkoutDraft::new();
    draft.add_or_update(linked("ex1", "Squat"));
    draft.add_or_update(linked("ex2", "Row"));

    draft.replace_exercises(vec![
        ExerciseEntry::unlinked("Push-up"),
        ExerciseEntry::unlinked("Burpee"),
    ]);

    assert_eq!(names(&draft), vec!["Push-up", "Burpee"]);
    assert_eq!(draft.unlinked_count(), 2);
}

#[test]
fn test_training_data_and_exercise_validity() {
    let mut draft = WorkoutDraft::new();
    assert!(draft.training_data_complete().is_err());

    draft.name = "Treino A".to_string();
    assert!(draft.training_data_complete().is_err());

    draft.goal = Some(Goal::Custom("   ".to_string()));
    assert!(draft.training_data_complete().is_err());

    draft.goal = Some(Goal::Custom("Pré-temporada".to_string()));
    assert!(draft.training_data_complete().is_ok());

    assert!(draft.exercises_complete().is_err());
    draft.add_or_update(ExerciseEntry::unlinked("Plank").with_params("", "3", "30s"));
    assert!(draft.exercises_complete().is_err());
    draft.add_or_update(ExerciseEntry::unlinked("Plank").with_params("45s", "3", "30s"));
    assert!(draft.exercises_complete().is_ok());
}

#[test]
fn test_payload_type_follows_goal() {
    let student = StudentProfile::new("s1", "Ana");
    let mut draft = WorkoutDraft::new();
    draft.name = "  Treino A ".to_string();
    draft.goal = Some(Goal::Preset(PresetGoal::Strength));
    draft.add_or_update(linked("ex1", "Squat"));

    let payload = draft.to_payload(&student);
    assert_eq!(payload.workout_type, "Força");
    assert_eq!(payload.name_workout, "Treino A");
    assert_eq!(payload.student_id, "s1");
    assert_eq!(payload.student_name, "Ana");
    assert_eq!(payload.exercises.len(), 1);

    draft.goal = Some(Goal::Custom("Reabilitação de joelho".to_string()));
    let json = serde_json::to_value(draft.to_payload(&student)).unwrap();
    assert_eq!(json["type"], "Reabilitação de joelho");
    assert_eq!(json["nameWorkout"], "Treino A");
    assert_eq!(json["studentId"], "s1");
}

#[test]
fn test_hydrate_from_stored_workout() {
    let workout: Workout = serde_json::from_value(serde_json::json!({
        "_id": "w1",
        "nameWorkout": "Treino B",
        "type": "hipertrofia",
        "studentId": "s1",
        "studentName": "Ana",
        "exercises": [
            {
                "exerciseIdRef": { "_id": "ex1", "name": "Squat", "muscleGroup": ["glutes"] },
                "repetitions": 10,
                "sets": "3",
                "restTime": "60s"
            },
            {
                "exerciseIdRef": { "name": "Farmer Walk", "description": "" },
                "repetitions": "40m",
                "sets": 2,
                "restTime": "90s",
                "observations": "heavy"
            }
        ]
    }))
    .unwrap();

    let draft = WorkoutDraft::from_workout(&workout);
    assert_eq!(draft.name, "Treino B");
    assert_eq!(draft.goal, Some(Goal::Preset(PresetGoal::Hypertrophy)));
    assert_eq!(names(&draft), vec!["Squat", "Farmer Walk"]);
    assert_eq!(draft.exercises()[0].repetitions, "10");
    assert!(matches!(draft.exercises()[0].exercise_id_ref, ExerciseRef::Linked(_)));
    assert!(matches!(draft.exercises()[1].exercise_id_ref, ExerciseRef::Unlinked(_)));
    assert_eq!(draft.exercises()[1].sets, "2");
}

#[test]
fn test_goal_from_type_label() {
    assert_eq!(Goal::from_type_label(""), None);
    assert_eq!(Goal::from_type_label("Mobilidade"), Some(Goal::Preset(PresetGoal::Mobility)));
    assert_eq!(
        Goal::from_type_label("Corrida 10k"),
        Some(Goal::Custom("Corrida 10k".to_string()))
    );
    assert_eq!("forca".parse::<PresetGoal>().ok(), Some(PresetGoal::Strength));
    assert_eq!(Goal::from_type_label("Forca"), Some(Goal::Preset(PresetGoal::Strength)));
    assert_eq!(
        Goal::from_type_label(" resistencia "),
        Some(Goal::Preset(PresetGoal::Endurance))
    );
}

#[test]
fn test_reference_with_both_id_keys_stays_linked() {
    let entry: ExerciseEntry = serde_json::from_value(serde_json::json!({
        "exerciseIdRef": { "_id": "ex1", "id": "ex1", "name": "Squat" },
        "repetitions": "10",
        "restTime": "60s"
    }))
    .unwrap();

    assert!(entry.is_linked());
    assert_eq!(entry.identity_key(), IdentityKey::Id("ex1".to_string()));
}

#[test]
fn test_reference_with_null_collections_stays_linked() {
    let entry: ExerciseEntry = serde_json::from_value(serde_json::json!({
        "exerciseIdRef": {
            "_id": "ex1",
            "name": "Squat",
            "description": null,
            "muscleGroup": null,
            "images": null
        },
        "repetitions": "10",
        "restTime": "60s"
    }))
    .unwrap();

    assert_eq!(entry.identity_key(), IdentityKey::Id("ex1".to_string()));
    match entry.exercise_id_ref {
        ExerciseRef::Linked(ex) => {
            assert!(ex.muscle_group.is_empty());
            assert!(ex.images.is_empty());
        }
        ExerciseRef::Unlinked(_) => panic!("expected a linked reference"),
    }
}

#[test]
fn test_malformed_linked_reference_is_an_error() {
    let result: Result<ExerciseEntry, _> = serde_json::from_value(serde_json::json!({
        "exerciseIdRef": { "_id": "ex1", "name": "Squat", "muscleGroup": "legs" },
        "repetitions": "10",
        "restTime": "60s"
    }));
    assert!(result.is_err());
}

#[test]
fn test_linked_reference_round_trips_as_linked() {
    let entry = linked("ex1", "Squat");
    let decoded: ExerciseEntry = serde_json::from_value(serde_json::to_value(&entry).unwrap()).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn test_student_age_on_date() {
    let mut student = StudentProfile::new("s1", "Ana");
    let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
    assert_eq!(student.age_on(today), None);

    student.birth_date = chrono::NaiveDate::from_ymd_opt(2000, 5, 20);
    assert_eq!(student.age_on(today), Some(23));
    student.birth_date = chrono::NaiveDate::from_ymd_opt(2000, 5, 19);
    assert_eq!(student.age_on(today), Some(24));
    student.birth_date = chrono::NaiveDate::from_ymd_opt(2030, 1, 1);
    assert_eq!(student.age_on(today), None);
}
