use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::{error, info, warn};

// --- Declare modules ---
pub mod api_client;
mod catalog;
mod config;
pub mod draft;
pub mod model;
mod reconcile;
pub mod session;
pub mod stepper;
mod submission;
pub mod suggestion;

// --- Expose public types ---
pub use api_client::{ApiClient, RemoteFetchError};
pub use config::{
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    Config,
    ConfigError,
    LinkPlacement,
    StandardColor,
    ThemeConfig,
};
pub use draft::WorkoutDraft;
pub use model::{
    CatalogExercise, ExerciseEntry, ExerciseRef, Goal, IdentityKey, PresetGoal, StudentProfile,
    UnlinkedExercise, Workout, WorkoutPayload, CUSTOM_GOAL_LABEL,
};
pub use session::Session;
pub use stepper::{CompositionMethod, Step, StepController, StepError};
pub use submission::SubmitError;
pub use suggestion::{
    SuggestedExercise, SuggestionError, SuggestionInputError, SuggestionRequest,
    SuggestionResponse,
};

use submission::InFlightGuard;

/// Entry point for the composition workflow: owns the config, the
/// authenticated client and the submission guard.
pub struct ComposerService {
    pub config: Config,
    pub config_path: PathBuf,
    client: ApiClient,
    submitting: AtomicBool,
}

impl ComposerService {
    /// Loads config (plus env overrides) and builds the session from it.
    /// # Errors
    /// Returns `anyhow::Error` if the config cannot be loaded, the session is
    /// incomplete, or the HTTP client cannot be built.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let mut config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        config.apply_env_overrides();

        let session = Session::from_config(&config, &config_path)?;
        Self::new(config, config_path, session)
    }

    /// Builds a service from explicit parts; nothing is read from the environment.
    /// # Errors
    /// Returns `anyhow::Error` if the HTTP client cannot be built.
    pub fn new(config: Config, config_path: PathBuf, session: Session) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
        let client = ApiClient::new(&config.api_url, session, timeout)
            .context("Failed to create API client")?;
        Ok(Self {
            config,
            config_path,
            client,
            submitting: AtomicBool::new(false),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Catalog listing that degrades to an empty list on failure.
    pub async fn load_catalog_or_empty(&self, name_filter: Option<&str>) -> Vec<CatalogExercise> {
        match self.client.list_exercises(name_filter).await {
            Ok(exercises) => exercises,
            Err(e) => {
                warn!("Catalog unavailable, showing an empty list: {}", e);
                Vec::new()
            }
        }
    }

    /// Fills `draft` from the stored workout when editing. Does nothing without
    /// a `workout_id`. On failure the draft is left as it was.
    /// # Errors
    /// Returns the `RemoteFetchError` from the fetch.
    pub async fn hydrate_draft(
        &self,
        draft: &mut WorkoutDraft,
        workout_id: Option<&str>,
        student_id: &str,
    ) -> Result<bool, RemoteFetchError> {
        let Some(workout_id) = workout_id else {
            return Ok(false);
        };
        match self.client.fetch_workout(workout_id, student_id).await {
            Ok(workout) => {
                draft.hydrate_from(&workout);
                info!(
                    "Loaded workout '{}' with {} exercises for editing",
                    workout.name_workout,
                    workout.exercises.len()
                );
                Ok(true)
            }
            Err(e) => {
                error!("Failed to load workout {}: {}", workout_id, e);
                Err(e)
            }
        }
    }

    /// Asks the AI endpoint for exercises and replaces the draft's list with them.
    /// The previous list is kept if anything fails.
    /// # Errors
    /// Returns `SuggestionError::Input` when student or workout data is missing,
    /// `SuggestionError::Remote` when the call fails.
    pub async fn apply_suggestions(
        &self,
        draft: &mut WorkoutDraft,
        student: &StudentProfile,
        today: NaiveDate,
    ) -> Result<usize, SuggestionError> {
        let request = SuggestionRequest::for_student(student, draft, today)?;
        let response = self.client.suggest_workout(&request).await.map_err(|e| {
            error!("AI suggestion failed for '{}': {}", request.name_workout, e);
            e
        })?;
        let entries = response.into_entries();
        draft.replace_exercises(entries);
        Ok(draft.exercises().len())
    }

    /// Best catalog candidate for an unlinked exercise name.
    /// # Errors
    /// Returns the `RemoteFetchError` from the catalog query.
    pub async fn find_match(&self, name: &str) -> Result<Option<CatalogExercise>, RemoteFetchError> {
        self.client.find_match(name).await
    }

    /// Links one entry to a catalog exercise using the configured placement.
    pub fn link(
        &self,
        draft: &mut WorkoutDraft,
        old_key: &IdentityKey,
        catalog_match: CatalogExercise,
    ) -> bool {
        draft.link(old_key, catalog_match, self.config.link_placement)
    }

    /// Validates and sends the draft. Only one submission may be pending at a time.
    /// # Errors
    /// `SubmitError::InFlight` if another submission is pending,
    /// `SubmitError::Incomplete` if a step is not valid,
    /// `SubmitError::Remote` if the backend call fails.
    pub async fn submit(
        &self,
        stepper: &StepController,
        draft: &WorkoutDraft,
        student: &StudentProfile,
        workout_id: Option<&str>,
    ) -> Result<Workout, SubmitError> {
        let _guard = InFlightGuard::acquire(&self.submitting).ok_or_else(|| {
            warn!("Ignoring submission while another one is pending");
            SubmitError::InFlight
        })?;
        stepper.ensure_ready(draft)?;

        let payload = draft.to_payload(student);
        self.client
            .submit_workout(workout_id, &payload)
            .await
            .map_err(|e| {
                error!("Failed to save workout '{}': {}", payload.name_workout, e);
                SubmitError::Remote(e)
            })
    }
}
