// src/model.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Label the backend uses for a goal typed in by the teacher.
pub const CUSTOM_GOAL_LABEL: &str = "Personalizado";

/// Exercise as stored in the canonical catalog. Read-only from our side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub muscle_group: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

/// Name-only placeholder for an exercise that is not linked to the catalog yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlinkedExercise {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// What an entry points at: a catalog exercise (strong) or just a name (weak).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExerciseRef {
    Linked(CatalogExercise),
    Unlinked(UnlinkedExercise),
}

// A reference carrying an `_id` or `id` is always decoded as a catalog exercise.
// Its decode errors are returned instead of degrading to a name-only reference.
impl<'de> Deserialize<'de> for ExerciseRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(de::Error::custom(format!(
                    "expected an exercise reference object, found {other}"
                )))
            }
        };

        let mongo_id = map.remove("_id").filter(|value| !value.is_null());
        let plain_id = map.remove("id").filter(|value| !value.is_null());
        let id = mongo_id.or(plain_id);

        match id {
            Some(id) => {
                map.insert("id".to_string(), id);
                serde_json::from_value(serde_json::Value::Object(map))
                    .map(ExerciseRef::Linked)
                    .map_err(|e| de::Error::custom(format!("invalid catalog exercise reference: {e}")))
            }
            None => serde_json::from_value(serde_json::Value::Object(map))
                .map(ExerciseRef::Unlinked)
                .map_err(de::Error::custom),
        }
    }
}

impl ExerciseRef {
    pub fn unlinked(name: impl Into<String>) -> Self {
        ExerciseRef::Unlinked(UnlinkedExercise {
            name: name.into(),
            description: String::new(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ExerciseRef::Linked(ex) => &ex.name,
            ExerciseRef::Unlinked(ex) => &ex.name,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, ExerciseRef::Linked(_))
    }

    /// Catalog id if present and non-empty, else the name.
    pub fn identity_key(&self) -> IdentityKey {
        match self {
            ExerciseRef::Linked(ex) if !ex.id.trim().is_empty() => IdentityKey::Id(ex.id.clone()),
            other => IdentityKey::Name(other.name().to_string()),
        }
    }
}

/// Key that makes an entry unique within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Id(String),
    Name(String),
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Id(id) => write!(f, "id:{id}"),
            IdentityKey::Name(name) => write!(f, "name:{name}"),
        }
    }
}

/// One exercise slot in a workout, with its free-form parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub exercise_id_ref: ExerciseRef,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repetitions: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sets: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rest_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub observations: String,
}

impl ExerciseEntry {
    pub fn new(exercise_id_ref: ExerciseRef) -> Self {
        Self {
            exercise_id_ref,
            repetitions: String::new(),
            sets: String::new(),
            rest_time: String::new(),
            observations: String::new(),
        }
    }

    pub fn linked(exercise: CatalogExercise) -> Self {
        Self::new(ExerciseRef::Linked(exercise))
    }

    pub fn unlinked(name: impl Into<String>) -> Self {
        Self::new(ExerciseRef::unlinked(name))
    }

    pub fn with_params(
        mut self,
        repetitions: impl Into<String>,
        sets: impl Into<String>,
        rest_time: impl Into<String>,
    ) -> Self {
        self.repetitions = repetitions.into();
        self.sets = sets.into();
        self.rest_time = rest_time.into();
        self
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = observations.into();
        self
    }

    pub fn identity_key(&self) -> IdentityKey {
        self.exercise_id_ref.identity_key()
    }

    pub fn name(&self) -> &str {
        self.exercise_id_ref.name()
    }

    pub fn is_linked(&self) -> bool {
        self.exercise_id_ref.is_linked()
    }

    /// Repetitions and rest time must be filled in; nothing else is checked.
    pub fn is_valid(&self) -> bool {
        !self.repetitions.trim().is_empty() && !self.rest_time.trim().is_empty()
    }
}

/// Goals offered in the workout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PresetGoal {
    #[strum(to_string = "Hipertrofia")]
    Hypertrophy,
    #[strum(to_string = "Emagrecimento")]
    WeightLoss,
    #[strum(to_string = "Força", serialize = "Forca")]
    Strength,
    #[strum(to_string = "Resistência", serialize = "Resistencia")]
    Endurance,
    #[strum(to_string = "Condicionamento")]
    Conditioning,
    #[strum(to_string = "Mobilidade")]
    Mobility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
    Preset(PresetGoal),
    Custom(String),
}

impl Goal {
    /// Value sent as the workout `type`.
    pub fn type_label(&self) -> String {
        match self {
            Goal::Preset(preset) => preset.to_string(),
            Goal::Custom(text) => text.trim().to_string(),
        }
    }

    /// Maps a stored `type` back to a goal. Unknown labels become custom goals.
    pub fn from_type_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<PresetGoal>() {
            Ok(preset) => Some(Goal::Preset(preset)),
            Err(_) => Some(Goal::Custom(trimmed.to_string())),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Goal::Preset(_) => true,
            Goal::Custom(text) => !text.trim().is_empty(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Preset(preset) => write!(f, "{preset}"),
            Goal::Custom(text) => write!(f, "{CUSTOM_GOAL_LABEL}: {}", text.trim()),
        }
    }
}

/// Student attributes the workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentProfile {
    pub id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

impl StudentProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Completed years on `today`. `None` without a birth date or when it lies in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| today.years_since(birth))
    }
}

/// Workout document as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name_workout: String,
    #[serde(rename = "type", default)]
    pub workout_type: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for the create and update workout endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    #[serde(rename = "type")]
    pub workout_type: String,
    pub exercises: Vec<ExerciseEntry>,
    pub student_id: String,
    pub student_name: String,
    pub name_workout: String,
}

/// Accepts strings, numbers or null for fields the backend and the AI endpoint
/// are not consistent about.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// Treats a null collection the same as a missing one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
