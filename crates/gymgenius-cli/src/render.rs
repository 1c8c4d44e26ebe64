//! Plain-text rendering of a workout with its completion state.

use std::fmt::Write;

use gymgenius_core::Workout;

/// Render every day with numbered exercises and set checkboxes.
///
/// Day and exercise numbers are 1-based and match what the interactive
/// session accepts.
pub fn render_workout(workout: &Workout) -> String {
    let plan = workout.plan();
    if plan.is_empty() {
        return "La rutina está vacía.\n".to_string();
    }

    let mut out = String::new();
    for (d, day) in plan.days().iter().enumerate() {
        let progress = workout.day_progress(&day.label).unwrap_or_default();
        let _ = writeln!(
            out,
            "[{}] {}  ({}/{} series)",
            d + 1,
            day.label,
            progress.completed,
            progress.total
        );

        if day.exercises.is_empty() {
            out.push_str("    (sin ejercicios)\n");
            continue;
        }

        let name_w = day
            .exercises
            .iter()
            .map(|ex| ex.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(9);
        for (e, ex) in day.exercises.iter().enumerate() {
            let boxes: String = workout
                .tracking()
                .flags(ex.id())
                .unwrap_or_default()
                .iter()
                .map(|done| if *done { "[x]" } else { "[ ]" })
                .collect();
            let name = if ex.name.is_empty() { "(sin nombre)" } else { ex.name.as_str() };
            let _ = writeln!(
                out,
                "    {:>2}. {:<name_w$}  {:>2} x {:<8} {}",
                e + 1,
                name,
                ex.sets,
                ex.rep_range,
                boxes,
            );
        }
    }
    out
}
