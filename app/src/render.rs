use std::fmt::{self, Display, Formatter};

use featsel::{SearchDirection, SearchReport, Trial};

/// Percentage with one decimal.
struct Percent(f64);

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// A search report displayed as the narrated console trace.
pub struct Trace<'a>(pub &'a SearchReport);

impl Trace<'_> {
    fn write_trial(
        f: &mut Formatter<'_>,
        trial: &Trial,
        direction: SearchDirection,
    ) -> fmt::Result {
        match (trial.pruned, trial.feature) {
            (true, Some(feature)) => {
                let action = match direction {
                    SearchDirection::Forward => "adding",
                    SearchDirection::Backward => "removing",
                };
                writeln!(
                    f,
                    "\tAccuracy of {} feature {} is determined to be lower than current best \
                     accuracy, so we skip calculating its accuracy.",
                    action, feature
                )
            }
            _ => writeln!(
                f,
                "\tUsing feature(s) {} accuracy is {}",
                trial.subset,
                Percent(trial.accuracy)
            ),
        }
    }
}

impl Display for Trace<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let direction = report.strategy.direction();
        writeln!(f, "Beginning search.\n")?;

        if let Some(baseline) = &report.baseline {
            writeln!(
                f,
                "Using all features {} accuracy is {}\n",
                baseline.subset,
                Percent(baseline.accuracy)
            )?;
        }

        for round in &report.rounds {
            for trial in &round.trials {
                Self::write_trial(f, trial, direction)?;
            }
            if round.accuracy_decreased {
                writeln!(
                    f,
                    "\n(Warning, Accuracy has decreased! Continuing search in case of local maxima)"
                )?;
            } else {
                writeln!(f)?;
            }
            writeln!(
                f,
                "Feature set {} was best, accuracy is {}\n",
                round.subset,
                Percent(round.accuracy)
            )?;
        }

        writeln!(
            f,
            "Finished search!! The best feature subset is {}, which has an accuracy of {}",
            report.best_subset,
            Percent(report.best_accuracy)
        )?;
        writeln!(
            f,
            "({} subsets evaluated, {} skipped early)",
            report.evaluations(),
            report.pruned()
        )
    }
}
