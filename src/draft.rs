// src/draft.rs
use crate::config::LinkPlacement;
use crate::model::{
    CatalogExercise, ExerciseEntry, ExerciseRef, Goal, IdentityKey, StudentProfile, Workout,
    WorkoutPayload,
};

/// In-memory workout being composed. Lives for one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub name: String,
    pub goal: Option<Goal>,
    exercises: Vec<ExerciseEntry>,
}

impl WorkoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    pub fn position_of(&self, key: &IdentityKey) -> Option<usize> {
        self.exercises.iter().position(|e| &e.identity_key() == key)
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&ExerciseEntry> {
        self.exercises.iter().find(|e| &e.identity_key() == key)
    }

    /// Replaces the entry sharing `entry`'s identity key in place, or appends it.
    pub fn add_or_update(&mut self, entry: ExerciseEntry) {
        let key = entry.identity_key();
        match self.position_of(&key) {
            Some(idx) => self.exercises[idx] = entry,
            None => self.exercises.push(entry),
        }
    }

    /// Removes the entry with `key`. Returns whether something was removed.
    pub fn remove(&mut self, key: &IdentityKey) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| &e.identity_key() != key);
        self.exercises.len() != before
    }

    /// Drops the current list and takes `entries` instead, keeping the
    /// one-entry-per-key rule (later duplicates overwrite earlier ones).
    pub fn replace_exercises(&mut self, entries: Vec<ExerciseEntry>) {
        self.exercises.clear();
        for entry in entries {
            self.add_or_update(entry);
        }
    }

    /// Points the entry at `old_key` to a catalog exercise, keeping its parameters.
    ///
    /// With [`LinkPlacement::Append`] the entry is removed and re-added, so it ends
    /// up last. With [`LinkPlacement::InPlace`] it stays where it was. Any other
    /// entry already holding the catalog id is dropped so keys stay unique.
    /// Returns `false` and leaves the draft alone if `old_key` is absent.
    pub fn link(
        &mut self,
        old_key: &IdentityKey,
        catalog_match: CatalogExercise,
        placement: LinkPlacement,
    ) -> bool {
        let Some(idx) = self.position_of(old_key) else {
            return false;
        };

        let mut linked = self.exercises[idx].clone();
        linked.exercise_id_ref = ExerciseRef::Linked(catalog_match);
        let new_key = linked.identity_key();

        match placement {
            LinkPlacement::Append => {
                self.remove(old_key);
                self.add_or_update(linked);
            }
            LinkPlacement::InPlace => {
                self.exercises[idx] = linked;
                let mut pos = 0;
                self.exercises.retain(|e| {
                    let keep = pos == idx || e.identity_key() != new_key;
                    pos += 1;
                    keep
                });
            }
        }
        true
    }

    /// Loads metadata and exercises from a stored workout.
    pub fn hydrate_from(&mut self, workout: &Workout) {
        self.name = workout.name_workout.clone();
        self.goal = Goal::from_type_label(&workout.workout_type);
        self.replace_exercises(workout.exercises.clone());
    }

    pub fn from_workout(workout: &Workout) -> Self {
        let mut draft = Self::new();
        draft.hydrate_from(workout);
        draft
    }

    /// Name present, goal chosen, custom goal text filled in when needed.
    pub fn training_data_complete(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("workout name is required");
        }
        match &self.goal {
            None => Err("a goal must be selected"),
            Some(goal) if !goal.is_complete() => Err("custom goal text is required"),
            Some(_) => Ok(()),
        }
    }

    /// At least one exercise and every entry has repetitions and rest time.
    pub fn exercises_complete(&self) -> Result<(), String> {
        if self.exercises.is_empty() {
            return Err("add at least one exercise".to_string());
        }
        match self.exercises.iter().find(|e| !e.is_valid()) {
            Some(entry) => Err(format!(
                "'{}' needs repetitions and rest time",
                entry.name()
            )),
            None => Ok(()),
        }
    }

    pub fn unlinked_count(&self) -> usize {
        self.exercises.iter().filter(|e| !e.is_linked()).count()
    }

    pub fn to_payload(&self, student: &StudentProfile) -> WorkoutPayload {
        WorkoutPayload {
            workout_type: self.goal.as_ref().map(Goal::type_label).unwrap_or_default(),
            exercises: self.exercises.clone(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            name_workout: self.name.trim().to_string(),
        }
    }
}
