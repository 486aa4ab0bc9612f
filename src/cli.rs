// src/cli.rs
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use workout_composer_lib::StudentProfile;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compose student workouts against the coaching backend", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print tables as CSV on stdout
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StudentArgs {
    /// Backend id of the student
    #[arg(long)]
    pub student_id: String,
    /// Student display name, stored with the workout
    #[arg(long, default_value = "")]
    pub student_name: String,
    /// Birth date (YYYY-MM-DD), used to compute the age sent to the AI
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
    #[arg(long)]
    pub gender: Option<String>,
    /// Training level (e.g., "Iniciante", "Intermediário")
    #[arg(long)]
    pub level: Option<String>,
}

impl From<StudentArgs> for StudentProfile {
    fn from(args: StudentArgs) -> Self {
        StudentProfile {
            id: args.student_id,
            name: args.student_name,
            birth_date: args.birth_date,
            gender: args.gender,
            level: args.level,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog exercises
    Exercises {
        /// Only exercises whose name matches
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show a single catalog exercise
    Exercise {
        id: String,
    },
    /// Show a stored workout
    Workout {
        workout_id: String,
        #[arg(long)]
        student_id: String,
    },
    /// Ask the AI for exercises without saving anything
    Suggest {
        #[command(flatten)]
        student: StudentArgs,
        /// Workout name
        #[arg(short, long)]
        name: String,
        /// Goal: one of the preset goals, or any other text for a custom goal
        #[arg(short, long)]
        goal: String,
    },
    /// Build a workout step by step and submit it
    Compose {
        #[command(flatten)]
        student: StudentArgs,
        /// Edit this workout instead of creating a new one
        #[arg(long)]
        workout_id: Option<String>,
    },
    /// Show the path to the config file
    ConfigPath,
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
