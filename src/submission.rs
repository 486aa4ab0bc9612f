// src/submission.rs
use reqwest::Method;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::info;

use crate::api_client::{ApiClient, RemoteFetchError};
use crate::model::{Workout, WorkoutPayload};
use crate::stepper::StepError;

impl ApiClient {
    /// Fetches a stored workout for editing.
    pub async fn fetch_workout(
        &self,
        workout_id: &str,
        student_id: &str,
    ) -> Result<Workout, RemoteFetchError> {
        self.get_json(&format!("/workouts/{workout_id}/students/{student_id}"), &[])
            .await
    }

    /// Updates `workout_id` when given, creates a new workout otherwise.
    pub async fn submit_workout(
        &self,
        workout_id: Option<&str>,
        payload: &WorkoutPayload,
    ) -> Result<Workout, RemoteFetchError> {
        let teacher_id = &self.session().teacher_id;
        let student_id = &payload.student_id;
        let workout: Workout = match workout_id {
            Some(id) => {
                let path = format!("/workouts/{id}/students/{student_id}/teacher/{teacher_id}");
                self.send_json(Method::PATCH, &path, payload).await?
            }
            None => {
                let path = format!("/workouts/teachers/{teacher_id}/students/{student_id}");
                self.send_json(Method::POST, &path, payload).await?
            }
        };
        info!(
            "Workout '{}' saved with {} exercises (id {})",
            workout.name_workout,
            workout.exercises.len(),
            workout.id
        );
        Ok(workout)
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A submission is already in progress.")]
    InFlight,
    #[error("Workout is not ready to submit: {0}")]
    Incomplete(#[from] StepError),
    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
}

/// Marks a submission as pending for as long as it is alive.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Returns `None` if another submission already holds the flag.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
