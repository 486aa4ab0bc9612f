// src/suggestion.rs
use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::api_client::{ApiClient, RemoteFetchError};
use crate::draft::WorkoutDraft;
use crate::model::{lenient_string, ExerciseEntry, StudentProfile};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionInputError {
    #[error("Student {0} is required to request AI suggestions.")]
    MissingStudentField(&'static str),
    #[error("Workout {0} is required to request AI suggestions.")]
    MissingWorkoutField(&'static str),
}

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error(transparent)]
    Input(#[from] SuggestionInputError),
    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
}

/// Body for the AI suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub age: u32,
    pub gender: String,
    #[serde(rename = "type")]
    pub goal: String,
    pub name_workout: String,
    pub level: String,
}

impl SuggestionRequest {
    /// Builds the request from the student's attributes and the draft's training data.
    pub fn for_student(
        student: &StudentProfile,
        draft: &WorkoutDraft,
        today: NaiveDate,
    ) -> Result<Self, SuggestionInputError> {
        let age = student
            .age_on(today)
            .ok_or(SuggestionInputError::MissingStudentField("birth date"))?;
        let gender = non_empty(student.gender.as_deref())
            .ok_or(SuggestionInputError::MissingStudentField("gender"))?;
        let level = non_empty(student.level.as_deref())
            .ok_or(SuggestionInputError::MissingStudentField("level"))?;
        let goal = draft
            .goal
            .as_ref()
            .filter(|g| g.is_complete())
            .ok_or(SuggestionInputError::MissingWorkoutField("goal"))?;
        let name_workout = non_empty(Some(draft.name.as_str()))
            .ok_or(SuggestionInputError::MissingWorkoutField("name"))?;

        Ok(Self {
            age,
            gender,
            goal: goal.type_label(),
            name_workout,
            level,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Exercise proposed by the AI endpoint; not tied to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedExercise {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sets: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repetitions: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rest_time: String,
}

impl SuggestedExercise {
    pub fn into_entry(self) -> ExerciseEntry {
        ExerciseEntry::unlinked(self.name).with_params(self.repetitions, self.sets, self.rest_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestedWorkout {
    #[serde(default)]
    pub exercises: Vec<SuggestedExercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestionResponse {
    pub treino: SuggestedWorkout,
}

impl SuggestionResponse {
    pub fn into_entries(self) -> Vec<ExerciseEntry> {
        self.treino
            .exercises
            .into_iter()
            .map(SuggestedExercise::into_entry)
            .collect()
    }
}

impl ApiClient {
    pub async fn suggest_workout(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionResponse, RemoteFetchError> {
        let response: SuggestionResponse = self
            .send_json(Method::POST, "/gemini/workouts", request)
            .await?;
        info!(
            "Received {} suggested exercises for '{}'",
            response.treino.exercises.len(),
            request.name_workout
        );
        Ok(response)
    }
}
