//! Exercise catalog: built-in reference data plus CSV import.
//!
//! The catalog is static reference data. The planner only ever reads it and
//! refers to exercises by ID.

use crate::types::*;
use crate::{Error, ExerciseRepository, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// The set of exercises available for planning, in a stable order
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn exercise(
    id: &str,
    name: &str,
    category: Category,
    exercise_type: ExerciseType,
    primary: &[&str],
    secondary: &[&str],
    description: &str,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        category,
        exercise_type,
        primary_muscles: primary.iter().map(|m| m.to_string()).collect(),
        secondary_muscles: secondary.iter().map(|m| m.to_string()).collect(),
        description: description.into(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    use Category::*;
    use ExerciseType::*;

    let exercises = vec![
        // ====================================================================
        // Upper body
        // ====================================================================
        exercise(
            "bench_press",
            "Bench Press",
            Upper,
            Weighted,
            &["Chest", "Triceps"],
            &["Shoulders"],
            "Lower the bar to mid-chest, press back to lockout.",
        ),
        exercise(
            "incline_dumbbell_press",
            "Incline Dumbbell Press",
            Upper,
            Weighted,
            &["Chest", "Shoulders"],
            &["Triceps"],
            "Press dumbbells from a 30-degree incline.",
        ),
        exercise(
            "barbell_row",
            "Barbell Row",
            Upper,
            Weighted,
            &["Back", "Biceps"],
            &["Shoulders"],
            "Hinge to roughly 45 degrees and row the bar to the lower ribs.",
        ),
        exercise(
            "overhead_press",
            "Overhead Press",
            Upper,
            Weighted,
            &["Shoulders", "Triceps"],
            &["Chest"],
            "Press the bar from the front rack to overhead lockout.",
        ),
        exercise(
            "lat_pulldown",
            "Lat Pulldown",
            Upper,
            Weighted,
            &["Back"],
            &["Biceps"],
            "Pull the bar to the upper chest, control the return.",
        ),
        exercise(
            "dumbbell_curl",
            "Dumbbell Curl",
            Upper,
            Weighted,
            &["Biceps"],
            &[],
            "Curl with elbows pinned to the sides.",
        ),
        exercise(
            "triceps_pushdown",
            "Triceps Pushdown",
            Upper,
            Weighted,
            &["Triceps"],
            &[],
            "Extend the elbows fully against the cable.",
        ),
        exercise(
            "lateral_raise",
            "Lateral Raise",
            Upper,
            Weighted,
            &["Shoulders"],
            &[],
            "Raise dumbbells to shoulder height with soft elbows.",
        ),
        exercise(
            "push_up",
            "Push-up",
            Upper,
            Bodyweight,
            &["Chest", "Triceps"],
            &["Shoulders"],
            "Keep a rigid plank and touch the chest to the floor.",
        ),
        exercise(
            "pull_up",
            "Pull-up",
            Upper,
            Bodyweight,
            &["Back", "Biceps"],
            &[],
            "From a dead hang, pull until the chin clears the bar.",
        ),
        exercise(
            "dips",
            "Dips",
            Upper,
            Bodyweight,
            &["Chest", "Triceps"],
            &["Shoulders"],
            "Lower until the shoulders are just below the elbows.",
        ),
        // ====================================================================
        // Lower body
        // ====================================================================
        exercise(
            "back_squat",
            "Back Squat",
            Lower,
            Weighted,
            &["Quadriceps", "Glutes"],
            &["Hamstrings"],
            "Squat to at least parallel with the bar on the upper back.",
        ),
        exercise(
            "romanian_deadlift",
            "Romanian Deadlift",
            Lower,
            Weighted,
            &["Hamstrings", "Glutes"],
            &["Back"],
            "Hinge with soft knees until the hamstrings stop the descent.",
        ),
        exercise(
            "leg_press",
            "Leg Press",
            Lower,
            Weighted,
            &["Quadriceps", "Glutes"],
            &[],
            "Lower the sled until the knees reach about 90 degrees.",
        ),
        exercise(
            "leg_curl",
            "Leg Curl",
            Lower,
            Weighted,
            &["Hamstrings"],
            &[],
            "Curl the pad toward the glutes without lifting the hips.",
        ),
        exercise(
            "hip_thrust",
            "Hip Thrust",
            Lower,
            Weighted,
            &["Glutes"],
            &["Hamstrings"],
            "Drive the hips up from a bench until the torso is level.",
        ),
        exercise(
            "standing_calf_raise",
            "Standing Calf Raise",
            Lower,
            Weighted,
            &["Calves"],
            &[],
            "Rise onto the toes and pause at the top.",
        ),
        exercise(
            "walking_lunge",
            "Walking Lunge",
            Lower,
            Bodyweight,
            &["Quadriceps", "Glutes"],
            &["Hamstrings"],
            "Step long and drop the back knee toward the floor.",
        ),
        exercise(
            "bodyweight_squat",
            "Bodyweight Squat",
            Lower,
            Bodyweight,
            &["Quadriceps"],
            &["Glutes"],
            "Squat as deep as mobility allows, arms forward for balance.",
        ),
        exercise(
            "single_leg_calf_raise",
            "Single-leg Calf Raise",
            Lower,
            Bodyweight,
            &["Calves"],
            &[],
            "Full range calf raise on one leg off a step.",
        ),
        // ====================================================================
        // Full body
        // ====================================================================
        exercise(
            "deadlift",
            "Deadlift",
            FullBody,
            Weighted,
            &["Hamstrings", "Glutes", "Back"],
            &["Quadriceps"],
            "Pull the bar from the floor to a tall lockout.",
        ),
        exercise(
            "kettlebell_swing",
            "Kettlebell Swing",
            FullBody,
            Weighted,
            &["Glutes", "Hamstrings"],
            &["Shoulders", "Back"],
            "Hike the bell back and snap the hips to float it to chest height.",
        ),
        exercise(
            "thruster",
            "Thruster",
            FullBody,
            Weighted,
            &["Quadriceps", "Shoulders"],
            &["Glutes", "Triceps"],
            "Front squat straight into an overhead press.",
        ),
        exercise(
            "burpee",
            "Burpee",
            FullBody,
            Bodyweight,
            &["Chest", "Quadriceps"],
            &["Shoulders"],
            "Drop to a push-up, jump the feet in and jump up.",
        ),
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Look up an exercise by ID
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.is_empty() {
            errors.push("Catalog has no exercises".to_string());
        }
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            } else if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.primary_muscles.is_empty() {
                errors.push(format!(
                    "Exercise '{}' has no primary muscle groups",
                    exercise.id
                ));
            }
        }

        errors
    }
}

impl ExerciseRepository for Catalog {
    fn list(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }
}

/// CSV row format for exercise import
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    category: String,
    exercise_type: String,
    primary_muscles: String,
    secondary_muscles: Option<String>,
    description: Option<String>,
}

fn split_muscles(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

impl TryFrom<CsvRow> for Exercise {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let exercise_type = match row.exercise_type.trim().to_lowercase().as_str() {
            "weighted" => ExerciseType::Weighted,
            "bodyweight" => ExerciseType::Bodyweight,
            other => {
                return Err(Error::CatalogValidation(format!(
                    "'{}' has unknown exercise type '{}'",
                    row.id, other
                )))
            }
        };

        Ok(Exercise {
            category: Category::from_label(&row.category),
            exercise_type,
            primary_muscles: split_muscles(&row.primary_muscles),
            secondary_muscles: row
                .secondary_muscles
                .as_deref()
                .map(split_muscles)
                .unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            id: row.id,
            name: row.name,
        })
    }
}

/// Load a catalog from a CSV file
///
/// Muscle lists are `;`-separated. Rows that fail to parse are skipped with
/// a warning; the resulting catalog must still validate.
pub fn load_catalog_csv(path: &Path) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut exercises = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match Exercise::try_from(row) {
                Ok(exercise) => exercises.push(exercise),
                Err(e) => {
                    tracing::warn!("Failed to parse catalog row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize catalog row: {}", e);
            }
        }
    }

    let catalog = Catalog { exercises };
    let errors = catalog.validate();
    if !errors.is_empty() {
        return Err(Error::CatalogValidation(errors.join("; ")));
    }

    tracing::info!("Loaded {} exercises from {:?}", catalog.len(), path);
    Ok(catalog)
}
