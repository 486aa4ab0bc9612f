// src/stepper.rs
use std::fmt;
use thiserror::Error;

use crate::draft::WorkoutDraft;

/// Screens of the composition flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    TrainingData = 1,
    MethodChoice = 2,
    ManualExercises = 3,
    AiExercises = 4,
    Review = 5,
}

impl Step {
    pub const FIRST: Step = Step::TrainingData;
    pub const LAST: Step = Step::Review;

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(n: u8) -> Option<Step> {
        match n {
            1 => Some(Step::TrainingData),
            2 => Some(Step::MethodChoice),
            3 => Some(Step::ManualExercises),
            4 => Some(Step::AiExercises),
            5 => Some(Step::Review),
            _ => None,
        }
    }

    /// Following step, saturating at the last one.
    pub fn next(self) -> Step {
        Step::from_index(self.index() + 1).unwrap_or(Step::LAST)
    }

    /// Previous step, saturating at the first one.
    pub fn prev(self) -> Step {
        Step::from_index(self.index().saturating_sub(1)).unwrap_or(Step::FIRST)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::TrainingData => "Training data",
            Step::MethodChoice => "Method",
            Step::ManualExercises => "Exercises",
            Step::AiExercises => "AI exercises",
            Step::Review => "Review",
        };
        write!(f, "{}. {}", self.index(), label)
    }
}

/// How the exercise list gets built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMethod {
    Manual,
    Ai,
}

impl CompositionMethod {
    /// Step where this method's exercises are edited.
    pub fn exercise_step(self) -> Step {
        match self {
            CompositionMethod::Manual => Step::ManualExercises,
            CompositionMethod::Ai => Step::AiExercises,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("Step '{step}' is incomplete: {reason}")]
    Incomplete { step: Step, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    step: Step,
    method: Option<CompositionMethod>,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            step: Step::FIRST,
            method: None,
        }
    }
}

impl StepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn method(&self) -> Option<CompositionMethod> {
        self.method
    }

    /// Checks whether `step` holds valid data for the current draft and method.
    /// The exercise step of the method that was not chosen counts as complete.
    pub fn check_step(&self, step: Step, draft: &WorkoutDraft) -> Result<(), StepError> {
        let incomplete = |reason: String| StepError::Incomplete { step, reason };
        match step {
            Step::TrainingData => draft
                .training_data_complete()
                .map_err(|reason| incomplete(reason.to_string())),
            Step::MethodChoice => match self.method {
                Some(_) => Ok(()),
                None => Err(incomplete("choose manual or AI composition".to_string())),
            },
            Step::ManualExercises | Step::AiExercises => match self.method {
                Some(method) if method.exercise_step() == step => {
                    draft.exercises_complete().map_err(incomplete)
                }
                _ => Ok(()),
            },
            Step::Review => Ok(()),
        }
    }

    /// Advances one step if the current one is complete. No-op on the last step.
    pub fn next_step(&mut self, draft: &WorkoutDraft) -> Result<Step, StepError> {
        if self.step == Step::LAST {
            return Ok(self.step);
        }
        self.check_step(self.step, draft)?;
        self.step = self.step.next();
        Ok(self.step)
    }

    /// Goes back one step. No-op on the first step.
    pub fn prev_step(&mut self) -> Step {
        self.step = self.step.prev();
        self.step
    }

    /// Jumps to step `n`. Out-of-range targets are ignored. Moving forward
    /// requires every step before the target to be complete.
    pub fn go_to_step(&mut self, n: u8, draft: &WorkoutDraft) -> Result<Step, StepError> {
        let Some(target) = Step::from_index(n) else {
            return Ok(self.step);
        };
        if target > self.step {
            for index in Step::FIRST.index()..target.index() {
                if let Some(step) = Step::from_index(index) {
                    self.check_step(step, draft)?;
                }
            }
        }
        self.step = target;
        Ok(self.step)
    }

    /// Records the composition method and jumps to its exercise step.
    pub fn choose_method(
        &mut self,
        method: CompositionMethod,
        draft: &WorkoutDraft,
    ) -> Result<Step, StepError> {
        let previous = self.method;
        self.method = Some(method);
        let result = self.go_to_step(method.exercise_step().index(), draft);
        if result.is_err() {
            self.method = previous;
        }
        result
    }

    /// Checks every step; used right before submission.
    pub fn ensure_ready(&self, draft: &WorkoutDraft) -> Result<(), StepError> {
        for index in Step::FIRST.index()..=Step::LAST.index() {
            if let Some(step) = Step::from_index(index) {
                self.check_step(step, draft)?;
            }
        }
        Ok(())
    }
}
