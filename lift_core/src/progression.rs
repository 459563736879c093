//! Progression logic for planning the next session's sets.
//!
//! Each exercise is progressed on its own, from its most recent attempt:
//! - No history: default sets at the default rep target
//! - Beginners: linear progression driven by the last attempt's outcome
//! - Experienced: undulating periodization across strength, hypertrophy
//!   and endurance rep ranges
//!
//! The most recent difficulty rating is applied last, except for "too easy",
//! which replaces normal progression outright.

use crate::config::ProgressionConfig;
use crate::{Adjustment, Exercise, ExerciseSet, ExerciseType, FeedbackLevel, HistoryIndex, Load, Set};

pub const DEFAULT_SETS: usize = 3;
pub const DEFAULT_REPS: u32 = 8;
/// Training age (days since the first completed session) below which a user is a beginner
pub const BEGINNER_DAYS: i64 = 90;
pub const WEIGHT_INCREMENT_KG: f64 = 2.5;
pub const TOO_EASY_INCREMENT_KG: f64 = 5.0;
pub const TOO_EASY_REP_BUMP: u32 = 2;
/// Fraction of load dropped after a failed attempt
pub const FAILURE_REDUCTION: f64 = 0.10;
pub const BODYWEIGHT_REP_STEP: u32 = 2;
pub const BODYWEIGHT_REP_CEILING: u32 = 15;
pub const BODYWEIGHT_SET_CEILING: usize = 5;
pub const BODYWEIGHT_REP_FLOOR: u32 = 5;
pub const BODYWEIGHT_SET_FLOOR: usize = 2;
pub const BODYWEIGHT_RESTART_REPS: u32 = 8;
/// Consecutive max-rep attempts needed before moving to the next phase
pub const PHASE_STREAK: usize = 2;
/// "Too difficult" drops a set only while more than this many remain
pub const MAX_SETS_BEFORE_DROP: usize = 3;

/// Training age bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Experience {
    Beginner,
    Experienced,
}

/// Position in the undulating cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Strength,
    Hypertrophy,
    Endurance,
}

impl Phase {
    /// Phase implied by a rep range
    ///
    /// Ranges topping out at 6 or below are strength work, ranges starting at
    /// 12 or above are endurance, everything else is hypertrophy.
    pub fn from_range(min_reps: u32, max_reps: u32) -> Phase {
        if max_reps <= 6 {
            Phase::Strength
        } else if min_reps >= 12 {
            Phase::Endurance
        } else {
            Phase::Hypertrophy
        }
    }

    /// Phase of an attempt, judged by its first set
    pub fn infer(exercise_set: &ExerciseSet) -> Option<Phase> {
        exercise_set
            .sets
            .first()
            .map(|s| Phase::from_range(s.min_reps, s.max_reps))
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Strength => Phase::Hypertrophy,
            Phase::Hypertrophy => Phase::Endurance,
            Phase::Endurance => Phase::Strength,
        }
    }

    pub fn rep_range(self) -> (u32, u32) {
        match self {
            Phase::Strength => (3, 6),
            Phase::Hypertrophy => (8, 12),
            Phase::Endurance => (12, 15),
        }
    }

    /// Multiplier applied to the previous weight when entering this phase
    pub fn entry_factor(self) -> f64 {
        match self {
            Phase::Strength => 1.3,
            Phase::Hypertrophy => 0.85,
            Phase::Endurance => 0.8,
        }
    }
}

/// How the last attempt went
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    /// Some set has no recorded reps
    Incomplete,
    /// Some set fell below its min reps
    Failed,
    /// Every set reached its max reps
    CompletedMax,
    Partial,
}

impl Outcome {
    fn of(exercise_set: &ExerciseSet) -> Outcome {
        let sets = &exercise_set.sets;
        if sets.iter().any(|s| s.completed_reps.is_none()) {
            Outcome::Incomplete
        } else if sets.iter().any(Set::failed) {
            Outcome::Failed
        } else if sets.iter().all(Set::hit_max) {
            Outcome::CompletedMax
        } else {
            Outcome::Partial
        }
    }
}

/// Plans sets for one exercise at a time against a fixed history
pub struct ProgressionEngine<'a> {
    config: &'a ProgressionConfig,
    history: &'a HistoryIndex<'a>,
    experience: Experience,
}

impl<'a> ProgressionEngine<'a> {
    pub fn new(config: &'a ProgressionConfig, history: &'a HistoryIndex<'a>) -> Self {
        let experience = history.experience(config.beginner_days);
        tracing::debug!("Training age bucket: {:?}", experience);
        Self {
            config,
            history,
            experience,
        }
    }

    pub fn experience(&self) -> Experience {
        self.experience
    }

    /// Plan sets for `exercise` from its own history in the index
    pub fn plan(&self, exercise: &Exercise) -> Vec<Set> {
        self.plan_sets(
            exercise,
            self.history.latest_exercise_set(&exercise.id),
            self.history.latest_feedback(&exercise.id),
        )
    }

    /// Plan the next sets for `exercise` given its last attempt and rating
    ///
    /// The output is always a fresh plan: no completed reps or timestamps.
    pub fn plan_sets(
        &self,
        exercise: &Exercise,
        last: Option<&ExerciseSet>,
        feedback: Option<FeedbackLevel>,
    ) -> Vec<Set> {
        let last = match last.filter(|es| !es.sets.is_empty()) {
            Some(last) => last,
            None => {
                tracing::debug!("{}: no history, using defaults", exercise.id);
                return self.initial_sets(exercise.exercise_type);
            }
        };

        let kind = exercise.exercise_type;
        let mut sets: Vec<Set> = last.sets.iter().map(|s| prior_targets(s, kind)).collect();

        let adjustment = feedback.map(FeedbackLevel::adjustment);
        if adjustment == Some(Adjustment::ForceIncrease) {
            tracing::debug!("{}: rated too easy, forcing increase", exercise.id);
            self.force_increase(&mut sets, kind);
            return sets;
        }

        let outcome = Outcome::of(last);
        match self.experience {
            Experience::Beginner => self.linear(&mut sets, kind, outcome),
            Experience::Experienced => self.undulating(&mut sets, exercise, last, outcome),
        }
        tracing::debug!(
            "{}: {:?} progression after {:?} attempt",
            exercise.id,
            self.experience,
            outcome
        );

        match adjustment {
            Some(Adjustment::ReduceVolume) => self.reduce_volume(&mut sets, kind),
            // A failed attempt has already been pulled back; don't undo it.
            Some(Adjustment::StandardIncrement) if outcome != Outcome::Failed => {
                self.increment(&mut sets, kind)
            }
            Some(Adjustment::StandardIncrement) | Some(Adjustment::ForceIncrease) | None => {}
        }

        sets
    }

    fn initial_sets(&self, kind: ExerciseType) -> Vec<Set> {
        let reps = self.config.default_reps;
        vec![Set::planned(Load::initial(kind), reps, reps); self.config.default_sets]
    }

    fn linear(&self, sets: &mut Vec<Set>, kind: ExerciseType, outcome: Outcome) {
        match outcome {
            Outcome::Incomplete | Outcome::Partial => {}
            Outcome::Failed => self.reduce_load(sets, kind),
            Outcome::CompletedMax => self.increment(sets, kind),
        }
    }

    fn undulating(
        &self,
        sets: &mut Vec<Set>,
        exercise: &Exercise,
        last: &ExerciseSet,
        outcome: Outcome,
    ) {
        match outcome {
            Outcome::Failed => {
                self.reduce_load(sets, exercise.exercise_type);
                return;
            }
            Outcome::Incomplete | Outcome::Partial => return,
            Outcome::CompletedMax => {}
        }

        let phase = Phase::infer(last).unwrap_or(Phase::Hypertrophy);
        // The attempt we were handed counts even if it isn't in the index.
        let streak = self.history.max_streak(&exercise.id, phase).max(1);

        if streak < self.config.phase_streak {
            self.increment(sets, exercise.exercise_type);
            return;
        }

        let next = phase.next();
        let (min_reps, max_reps) = next.rep_range();
        tracing::debug!(
            "{}: {} max-rep sessions in {:?}, moving to {:?}",
            exercise.id,
            streak,
            phase,
            next
        );

        for set in sets.iter_mut() {
            set.min_reps = min_reps;
            set.max_reps = max_reps;
            if let Load::Weighted(kg) = set.load {
                set.load = Load::Weighted(round_kg(kg * next.entry_factor()));
            }
        }
    }

    /// One standard step up: weight for weighted work, reps then sets for bodyweight
    fn increment(&self, sets: &mut Vec<Set>, kind: ExerciseType) {
        match kind {
            ExerciseType::Weighted => add_weight(sets, self.config.weight_increment_kg),
            ExerciseType::Bodyweight => self.escalate_bodyweight(sets),
        }
    }

    fn force_increase(&self, sets: &mut [Set], kind: ExerciseType) {
        match kind {
            ExerciseType::Weighted => add_weight(sets, self.config.too_easy_increment_kg),
            ExerciseType::Bodyweight => {
                let bump = self.config.too_easy_rep_bump;
                for set in sets.iter_mut() {
                    set.min_reps = set.min_reps.saturating_add(bump);
                    set.max_reps = set.max_reps.saturating_add(bump);
                }
            }
        }
    }

    fn reduce_load(&self, sets: &mut Vec<Set>, kind: ExerciseType) {
        match kind {
            ExerciseType::Weighted => {
                let factor = 1.0 - self.config.failure_reduction;
                for set in sets.iter_mut() {
                    if let Load::Weighted(kg) = set.load {
                        set.load = Load::Weighted(round_kg((kg * factor).max(0.0)));
                    }
                }
            }
            ExerciseType::Bodyweight => self.reduce_bodyweight(sets),
        }
    }

    fn reduce_volume(&self, sets: &mut Vec<Set>, kind: ExerciseType) {
        if sets.len() > self.config.max_sets_before_drop {
            sets.pop();
        } else {
            self.reduce_load(sets, kind);
        }
    }

    /// Add reps up to the ceiling, then add a set and restart the reps
    ///
    /// Experienced lifters escalate inside the band of their current phase,
    /// so only a max-rep streak can move them to the next one.
    fn escalate_bodyweight(&self, sets: &mut Vec<Set>) {
        let band = match self.experience {
            Experience::Beginner => None,
            Experience::Experienced => sets
                .first()
                .map(|s| Phase::from_range(s.min_reps, s.max_reps)),
        };
        let (restart, ceiling) = match band {
            Some(phase) => {
                let (low, high) = phase.rep_range();
                (low, high.min(self.config.bodyweight_rep_ceiling).max(low))
            }
            None => (
                self.config.bodyweight_restart_reps,
                self.config.bodyweight_rep_ceiling,
            ),
        };
        let step = self.config.bodyweight_rep_step;

        if sets.iter().any(|s| s.max_reps < ceiling) {
            for set in sets.iter_mut() {
                let max_reps = set.max_reps.saturating_add(step).min(ceiling).max(set.max_reps);
                let min_reps = set.min_reps.saturating_add(step).min(max_reps);
                set.max_reps = max_reps;
                if band.map_or(true, |phase| Phase::from_range(min_reps, max_reps) == phase) {
                    set.min_reps = min_reps;
                }
            }
            return;
        }

        if sets.len() >= self.config.bodyweight_set_ceiling {
            return;
        }

        for set in sets.iter_mut() {
            let width = set.max_reps.saturating_sub(set.min_reps);
            set.min_reps = restart;
            set.max_reps = restart.saturating_add(width).min(ceiling).max(restart);
        }
        if let Some(last) = sets.last().cloned() {
            sets.push(last);
        }
    }

    /// Take reps off down to the floor, then drop sets down to the floor
    fn reduce_bodyweight(&self, sets: &mut Vec<Set>) {
        let floor = self.config.bodyweight_rep_floor;
        let step = self.config.bodyweight_rep_step;

        if sets.iter().any(|s| s.max_reps > floor) {
            for set in sets.iter_mut() {
                if set.min_reps > floor {
                    set.min_reps = set.min_reps.saturating_sub(step).max(floor);
                }
                if set.max_reps > floor {
                    set.max_reps = set.max_reps.saturating_sub(step).max(floor);
                }
                set.max_reps = set.max_reps.max(set.min_reps);
            }
            return;
        }

        if sets.len() > self.config.bodyweight_set_floor {
            sets.pop();
        }
    }
}

/// Previous targets as a fresh set, with the load shape matching the exercise
fn prior_targets(set: &Set, kind: ExerciseType) -> Set {
    let load = match (kind, set.load) {
        (ExerciseType::Weighted, Load::Weighted(kg)) => Load::Weighted(kg.max(0.0)),
        (ExerciseType::Weighted, Load::Bodyweight) => Load::Weighted(0.0),
        (ExerciseType::Bodyweight, _) => Load::Bodyweight,
    };
    Set::planned(load, set.min_reps, set.max_reps.max(set.min_reps))
}

fn add_weight(sets: &mut [Set], delta: f64) {
    for set in sets.iter_mut() {
        if let Load::Weighted(kg) = set.load {
            set.load = Load::Weighted(round_kg((kg + delta).max(0.0)));
        }
    }
}

/// Round to the nearest 10 g so scaled weights stay readable
fn round_kg(kg: f64) -> f64 {
    (kg * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Session};
    use chrono::{Duration, NaiveDate, Utc};

    // 2024-06-03 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn bench_press() -> Exercise {
        Exercise {
            id: "bench_press".into(),
            name: "Bench Press".into(),
            category: Category::Upper,
            exercise_type: ExerciseType::Weighted,
            primary_muscles: vec!["Chest".into(), "Triceps".into()],
            secondary_muscles: vec!["Shoulders".into()],
            description: String::new(),
        }
    }

    fn push_up() -> Exercise {
        Exercise {
            id: "push_up".into(),
            name: "Push-up".into(),
            category: Category::Upper,
            exercise_type: ExerciseType::Bodyweight,
            primary_muscles: vec!["Chest".into(), "Triceps".into()],
            secondary_muscles: vec![],
            description: String::new(),
        }
    }

    fn attempt(id: &str, load: Load, range: (u32, u32), reps: &[Option<u32>]) -> ExerciseSet {
        ExerciseSet {
            exercise_id: id.into(),
            sets: reps
                .iter()
                .map(|r| {
                    let mut set = Set::planned(load, range.0, range.1);
                    set.completed_reps = *r;
                    set.completed_at = r.map(|_| Utc::now());
                    set
                })
                .collect(),
            warmup_completed_at: None,
        }
    }

    fn completed(date: NaiveDate, sets: Vec<ExerciseSet>) -> Session {
        let mut session = Session::planned(date, sets);
        session.completed_at = Some(Utc::now());
        session
    }

    /// A history whose first session is old enough to count as experienced
    fn veteran(mut sessions: Vec<Session>) -> Vec<Session> {
        sessions.push(completed(monday() - Duration::days(365), vec![]));
        sessions
    }

    fn weights(sets: &[Set]) -> Vec<f64> {
        sets.iter().filter_map(|s| s.load.kg()).collect()
    }

    fn assert_fresh(sets: &[Set]) {
        for set in sets {
            assert!(set.completed_reps.is_none());
            assert!(set.completed_at.is_none());
            assert!(set.min_reps <= set.max_reps);
        }
    }

    #[test]
    fn test_no_history_defaults() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let sets = engine.plan(&bench_press());
        assert_eq!(sets.len(), 3);
        for set in &sets {
            assert_eq!(set.load, Load::Weighted(0.0));
            assert_eq!((set.min_reps, set.max_reps), (8, 8));
        }

        let sets = engine.plan(&push_up());
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| s.load == Load::Bodyweight));
        assert_fresh(&sets);
    }

    #[test]
    fn test_beginner_incomplete_repeats_targets() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt(
            "bench_press",
            Load::Weighted(60.0),
            (8, 12),
            &[Some(12), Some(12), None],
        );
        let sets = engine.plan_sets(&bench_press(), Some(&last), None);

        assert_eq!(weights(&sets), vec![60.0; 3]);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 12)));
        assert_fresh(&sets);
    }

    #[test]
    fn test_beginner_failure_reduces_weight() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt(
            "bench_press",
            Load::Weighted(100.0),
            (8, 12),
            &[Some(10), Some(8), Some(6)],
        );
        let sets = engine.plan_sets(&bench_press(), Some(&last), None);
        assert_eq!(weights(&sets), vec![90.0; 3]);
    }

    #[test]
    fn test_beginner_max_adds_increment() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(12); 3]);
        let sets = engine.plan_sets(&bench_press(), Some(&last), None);
        assert_eq!(weights(&sets), vec![102.5; 3]);

        let partial = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(10); 3]);
        let sets = engine.plan_sets(&bench_press(), Some(&partial), None);
        assert_eq!(weights(&sets), vec![100.0; 3]);
    }

    #[test]
    fn test_beginner_bodyweight_escalation() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt("push_up", Load::Bodyweight, (8, 8), &[Some(8); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (10, 10)));

        let last = attempt("push_up", Load::Bodyweight, (14, 14), &[Some(14); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (15, 15)));

        // At the rep ceiling: add a set and restart reps
        let last = attempt("push_up", Load::Bodyweight, (15, 15), &[Some(15); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 4);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 8)));

        // At both ceilings: hold
        let last = attempt("push_up", Load::Bodyweight, (15, 15), &[Some(15); 5]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 5);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (15, 15)));
    }

    #[test]
    fn test_beginner_bodyweight_regression() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt("push_up", Load::Bodyweight, (8, 10), &[Some(6); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (6, 8)));

        let last = attempt("push_up", Load::Bodyweight, (6, 6), &[Some(3); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (5, 5)));

        // Rep floor reached: drop a set
        let last = attempt("push_up", Load::Bodyweight, (5, 5), &[Some(3); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 2);

        // Both floors reached: hold
        let last = attempt("push_up", Load::Bodyweight, (5, 5), &[Some(3); 2]);
        let sets = engine.plan_sets(&push_up(), Some(&last), None);
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn test_too_easy_overrides_everything() {
        let config = ProgressionConfig::default();

        let failed = attempt(
            "bench_press",
            Load::Weighted(80.0),
            (8, 12),
            &[Some(4), Some(4), Some(4)],
        );
        let maxed = attempt("bench_press", Load::Weighted(80.0), (8, 12), &[Some(12); 3]);

        let beginner_history: Vec<Session> = vec![];
        let veteran_history = veteran(vec![
            completed(monday() - Duration::days(14), vec![maxed.clone()]),
            completed(monday() - Duration::days(7), vec![maxed.clone()]),
        ]);

        for history in [&beginner_history, &veteran_history] {
            let index = HistoryIndex::build(history, monday());
            let engine = ProgressionEngine::new(&config, &index);
            for last in [&failed, &maxed] {
                let sets =
                    engine.plan_sets(&bench_press(), Some(last), Some(FeedbackLevel::TooEasy));
                assert_eq!(weights(&sets), vec![85.0; 3]);
                assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 12)));
                assert_fresh(&sets);
            }
        }

        let index = HistoryIndex::build(&beginner_history, monday());
        let engine = ProgressionEngine::new(&config, &index);
        let last = attempt("push_up", Load::Bodyweight, (15, 15), &[Some(15); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), Some(FeedbackLevel::TooEasy));
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (17, 17)));
    }

    #[test]
    fn test_too_difficult_drops_set_or_weight() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let four_sets = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(10); 4]);
        let sets =
            engine.plan_sets(&bench_press(), Some(&four_sets), Some(FeedbackLevel::TooDifficult));
        assert_eq!(sets.len(), 3);
        assert_eq!(weights(&sets), vec![100.0; 3]);

        let three_sets = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(10); 3]);
        let sets =
            engine.plan_sets(&bench_press(), Some(&three_sets), Some(FeedbackLevel::TooDifficult));
        assert_eq!(sets.len(), 3);
        assert_eq!(weights(&sets), vec![90.0; 3]);
    }

    #[test]
    fn test_optimal_feedback_stacks_an_increment() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let maxed = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(12); 3]);
        let sets = engine.plan_sets(&bench_press(), Some(&maxed), Some(FeedbackLevel::Optimal));
        assert_eq!(weights(&sets), vec![105.0; 3]);

        // A failure stays below the previous weight
        let failed = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(5); 3]);
        let sets = engine.plan_sets(&bench_press(), Some(&failed), Some(FeedbackLevel::Hard));
        assert_eq!(weights(&sets), vec![90.0; 3]);
    }

    #[test]
    fn test_experienced_not_maxed_repeats() {
        let config = ProgressionConfig::default();
        let last = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(11); 3]);
        let history = veteran(vec![completed(monday() - Duration::days(7), vec![last.clone()])]);
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);
        assert_eq!(engine.experience(), Experience::Experienced);

        let sets = engine.plan(&bench_press());
        assert_eq!(weights(&sets), vec![100.0; 3]);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 12)));
    }

    #[test]
    fn test_experienced_single_max_stays_in_phase() {
        let config = ProgressionConfig::default();
        let history = veteran(vec![
            completed(
                monday() - Duration::days(14),
                vec![attempt("bench_press", Load::Weighted(97.5), (8, 12), &[Some(10); 3])],
            ),
            completed(
                monday() - Duration::days(7),
                vec![attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(12); 3])],
            ),
        ]);
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let sets = engine.plan(&bench_press());
        assert_eq!(weights(&sets), vec![102.5; 3]);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 12)));
    }

    #[test]
    fn test_experienced_phase_cycle() {
        let config = ProgressionConfig::default();
        let cases = [
            ((3, 6), 100.0, (8, 12), 85.0),
            ((8, 12), 100.0, (12, 15), 80.0),
            ((12, 15), 100.0, (3, 6), 130.0),
        ];

        for (range, kg, next_range, next_kg) in cases {
            let maxed = attempt("bench_press", Load::Weighted(kg), range, &[Some(range.1); 3]);
            let history = veteran(vec![
                completed(monday() - Duration::days(14), vec![maxed.clone()]),
                completed(monday() - Duration::days(7), vec![maxed.clone()]),
            ]);
            let index = HistoryIndex::build(&history, monday());
            let engine = ProgressionEngine::new(&config, &index);

            let sets = engine.plan(&bench_press());
            assert_eq!(weights(&sets), vec![next_kg; 3], "from {:?}", range);
            assert!(sets
                .iter()
                .all(|s| (s.min_reps, s.max_reps) == next_range));
        }
    }

    #[test]
    fn test_experienced_bodyweight_adopts_phase_range() {
        let config = ProgressionConfig::default();
        let maxed = attempt("push_up", Load::Bodyweight, (8, 12), &[Some(12); 3]);
        let history = veteran(vec![
            completed(monday() - Duration::days(14), vec![maxed.clone()]),
            completed(monday() - Duration::days(7), vec![maxed]),
        ]);
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let sets = engine.plan(&push_up());
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| s.load == Load::Bodyweight));
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (12, 15)));
    }

    #[test]
    fn test_experienced_failure_reduces_weight() {
        let config = ProgressionConfig::default();
        let failed = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(5); 3]);
        let history = veteran(vec![completed(monday() - Duration::days(7), vec![failed])]);
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);
        assert_eq!(engine.experience(), Experience::Experienced);

        let sets = engine.plan(&bench_press());
        assert_eq!(weights(&sets), vec![90.0; 3]);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (8, 12)));

        // Optimal feedback does not claw the reduction back
        let last = attempt("bench_press", Load::Weighted(100.0), (8, 12), &[Some(12), Some(7), Some(9)]);
        let sets = engine.plan_sets(&bench_press(), Some(&last), Some(FeedbackLevel::Optimal));
        assert!(weights(&sets).iter().all(|kg| *kg < 100.0));
    }

    #[test]
    fn test_experienced_bodyweight_escalates_within_phase() {
        let config = ProgressionConfig::default();
        let cases = [
            ((3, 6), Phase::Strength),
            ((4, 5), Phase::Strength),
            ((8, 8), Phase::Hypertrophy),
            ((10, 12), Phase::Hypertrophy),
            ((10, 14), Phase::Hypertrophy),
            ((12, 14), Phase::Endurance),
        ];

        for (range, phase) in cases {
            let maxed = attempt("push_up", Load::Bodyweight, range, &[Some(range.1); 3]);
            let history = veteran(vec![completed(monday() - Duration::days(7), vec![maxed])]);
            let index = HistoryIndex::build(&history, monday());
            let engine = ProgressionEngine::new(&config, &index);

            let sets = engine.plan(&push_up());
            assert_fresh(&sets);
            for set in &sets {
                assert_eq!(
                    Phase::from_range(set.min_reps, set.max_reps),
                    phase,
                    "from {:?} got {}-{}",
                    range,
                    set.min_reps,
                    set.max_reps
                );
            }
        }
    }

    #[test]
    fn test_experienced_strength_bodyweight_adds_set_at_band_top() {
        let config = ProgressionConfig::default();
        let maxed = attempt("push_up", Load::Bodyweight, (3, 6), &[Some(6); 3]);
        let history = veteran(vec![completed(monday() - Duration::days(7), vec![maxed])]);
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let sets = engine.plan(&push_up());
        assert_eq!(sets.len(), 4);
        assert!(sets.iter().all(|s| (s.min_reps, s.max_reps) == (3, 6)));
    }

    #[test]
    fn test_too_easy_bump_saturates() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt("push_up", Load::Bodyweight, (u32::MAX - 1, u32::MAX), &[Some(u32::MAX); 3]);
        let sets = engine.plan_sets(&push_up(), Some(&last), Some(FeedbackLevel::TooEasy));
        assert!(sets.iter().all(|s| s.max_reps == u32::MAX && s.min_reps == u32::MAX));
    }

    #[test]
    fn test_load_shape_follows_exercise_type() {
        let config = ProgressionConfig::default();
        let history: Vec<Session> = vec![];
        let index = HistoryIndex::build(&history, monday());
        let engine = ProgressionEngine::new(&config, &index);

        let last = attempt("bench_press", Load::Bodyweight, (8, 12), &[Some(12); 3]);
        let sets = engine.plan_sets(&bench_press(), Some(&last), None);
        assert_eq!(weights(&sets), vec![2.5; 3]);
    }

    #[test]
    fn test_phase_inference() {
        assert_eq!(Phase::from_range(3, 6), Phase::Strength);
        assert_eq!(Phase::from_range(8, 8), Phase::Hypertrophy);
        assert_eq!(Phase::from_range(8, 12), Phase::Hypertrophy);
        assert_eq!(Phase::from_range(12, 15), Phase::Endurance);
        assert_eq!(Phase::Endurance.next(), Phase::Strength);
    }
}
