//! Writes statistics as `{prefix} {name}={value}` lines, followed by an optional closing line.

use std::fmt::Display;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// How statistic lines look.
#[derive(Clone, Copy, Debug)]
pub struct StatisticFormat {
    /// Starts every statistic line.
    pub prefix: &'static str,
    /// Written after the statistics of a run.
    pub closing_line: Option<&'static str>,
    /// The casing of the statistic names. Without one, names are written as they are.
    pub casing: Option<Case>,
}

impl StatisticFormat {
    fn line(&self, name: impl Display, value: impl Display) -> String {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        format!("{} {name}={value}", self.prefix)
    }
}

struct StatisticSink {
    format: StatisticFormat,
    writer: Box<dyn Write + Send>,
}

static STATISTIC_SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

/// Enables the logging of statistics in the given `format`. Only the first call has an effect.
///
/// Without a `writer`, statistics go to stdout, next to the schedules.
pub fn configure_statistic_logging(
    format: StatisticFormat,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            format,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Some(Ok(mut sink)) = STATISTIC_SINK.get().map(Mutex::lock) {
        action(&mut *sink);
    }
}

/// Logs the statistic `name` with `value`; does nothing until logging is configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let line = sink.format.line(name, value);
        let _ = writeln!(sink.writer, "{line}");
    });
}

/// Writes the closing line, if the format has one.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(closing_line) = sink.format.closing_line {
            let _ = writeln!(sink.writer, "{closing_line}");
        }
    });
}

/// Whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_SINK.get().is_some()
}

#[cfg(test)]
mod tests {
    use convert_case::Case;

    use super::StatisticFormat;

    #[test]
    fn names_are_recased_behind_the_prefix() {
        let format = StatisticFormat {
            prefix: "%%%migsched-stat:",
            closing_line: None,
            casing: Some(Case::Camel),
        };
        assert_eq!(
            "%%%migsched-stat: taskSchedulerNumRounds=12",
            format.line("task_scheduler_num_rounds", 12)
        );
    }

    #[test]
    fn names_are_kept_without_a_casing() {
        let format = StatisticFormat {
            prefix: "stat",
            closing_line: None,
            casing: None,
        };
        assert_eq!("stat peak_depth=3", format.line("peak_depth", 3));
    }
}
