use crate::event::Event;
use crate::model::matrix::TransitionMatrix;
use std::collections::BTreeMap;

/// Whether runs get synthetic entry and exit transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Bracketing {
    /// Only transitions between real events.
    #[default]
    Bare,
    /// Also count `start -> first` and `last -> stop` for every run.
    Bracketed { start: String, stop: String },
}

impl Bracketing {
    pub fn bracketed(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self::Bracketed {
            start: start.into(),
            stop: stop.into(),
        }
    }
}

/// Group events by run id, each run in chronological order.
///
/// The sort is stable, so events sharing a timestamp keep their input order.
pub fn group_runs(events: &[Event]) -> BTreeMap<i64, Vec<&Event>> {
    let mut runs: BTreeMap<i64, Vec<&Event>> = BTreeMap::new();
    for ev in events {
        runs.entry(ev.run_id).or_default().push(ev);
    }
    for run in runs.values_mut() {
        run.sort_by_key(|ev| ev.timestamp);
    }
    runs
}

/// Count adjacent transitions within every run.
pub fn build_transition_matrix(events: &[Event], bracketing: &Bracketing) -> TransitionMatrix {
    let mut matrix = TransitionMatrix::new();

    for run in group_runs(events).values() {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };

        if let Bracketing::Bracketed { start, .. } = bracketing {
            matrix.increment(start, &first.name);
        }
        for pair in run.windows(2) {
            matrix.increment(&pair[0].name, &pair[1].name);
        }
        if let Bracketing::Bracketed { stop, .. } = bracketing {
            matrix.increment(&last.name, stop);
        }
    }

    log::trace!(
        "built transition matrix from {} events: {} distinct names, {} transitions",
        events.len(),
        matrix.names().len(),
        matrix.total()
    );
    matrix
}
