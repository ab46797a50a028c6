mod instance;
mod os_signal_termination;
mod result;
mod schedule;

use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use instance::Instance;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use migsched_solver::branching::branchers::BranchingStrategy;
use migsched_solver::convert_case::Case;
use migsched_solver::options::SolverOptions;
use migsched_solver::options::TaskSchedulerOptions;
use migsched_solver::statistics::configure_statistic_logging;
use migsched_solver::statistics::StatisticFormat;
use migsched_solver::termination::SearchBudget;
use migsched_solver::termination::TimeBudget;
use migsched_solver::Solver;
use os_signal_termination::OsSignal;
use result::MigschedError;
use result::MigschedResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The reconfiguration to schedule, as a '*.json' file.
    ///
    /// The file lists the resources with their capacities, the entities with their current
    /// resource and their candidate resources, and the placement rules between entities.
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// The time budget for the solver, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The number of conflicts after which the solver gives up.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "conflict-limit", verbatim_doc_comment)]
    conflict_limit: Option<u64>,

    /// Prints every schedule instead of the first one.
    ///
    /// Possible values: bool
    #[arg(short = 'a', long = "all-solutions", verbatim_doc_comment)]
    all_solutions: bool,

    /// How the search picks the next variable and the value it tries first.
    #[arg(long, value_enum, default_value_t)]
    branching: BranchingStrategy,

    /// The random seed to use for the Pseudo Random Number Generator.
    ///
    /// Only the random value selection of "--branching first-fail-random" uses it.
    ///
    /// Possible values: u64
    #[arg(
        short = 'r',
        long = "random-seed",
        default_value_t = 42,
        verbatim_doc_comment
    )]
    random_seed: u64,

    /// Keeps every start of an arriving entity, instead of dropping starts which are later than
    /// needed. With "--all-solutions" this prints schedules which only differ in such starts.
    ///
    /// Possible values: bool
    #[arg(long = "no-start-dominance", verbatim_doc_comment)]
    no_start_dominance: bool,

    /// Always tightens the starts of arriving entities, even when the free capacity of their
    /// resource already admits all of them.
    ///
    /// Possible values: bool
    #[arg(long = "no-fast-path", verbatim_doc_comment)]
    no_fast_path: bool,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging(
            StatisticFormat {
                prefix: "%%%migsched-stat:",
                closing_line: Some("%%%migsched-stat-end"),
                casing: Some(Case::Camel),
            },
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "% {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> MigschedResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    if args.instance_path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return Err(MigschedError::invalid_instance(args.instance_path.display()));
    }

    if migsched_solver::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION
        >= migsched_solver::asserts::MIGSCHED_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active.",
            migsched_solver::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION
        );
    }

    let instance: Instance =
        serde_json::from_reader(BufReader::new(File::open(&args.instance_path)?))?;

    let mut solver = Solver::with_options(SolverOptions {
        random_seed: args.random_seed,
        task_scheduler: TaskSchedulerOptions {
            start_upper_bound_dominance: !args.no_start_dominance,
            fast_path: !args.no_fast_path,
        },
    });
    let model = instance.compile(&mut solver)?;
    info!(
        "Compiled {} entities on {} resources into {} variables",
        model.entities.len(),
        model.resource_names.len(),
        solver.num_variables()
    );

    let brancher = args.branching.create_brancher(&model.decision_variables);
    let termination = (
        OsSignal::install()?,
        (
            args.time_limit
                .map(|time_limit| TimeBudget::starting_now(Duration::from_millis(time_limit))),
            args.conflict_limit.map(SearchBudget::conflicts),
        ),
    );

    schedule::solve(
        &mut solver,
        &model,
        brancher,
        termination,
        args.all_solutions,
    );
    Ok(())
}
