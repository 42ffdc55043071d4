use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bloc::{ConsoleReporter, DriverBuilder, DriverParams, Reporter};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

mod dry_run;

use dry_run::DryRunEngine;

const ABOUT: &str = "
Compresses a bloc against a wall, slides it along the wall and lets it relax, damping the velocity
of separated contact nodes after every explicit step.";

#[derive(Parser)]
#[clap(author, about = ABOUT, name = "bloc-friction")]
struct Opt {
    /// Path to a driver configuration file.
    ///
    /// The file is expected to be in `ron` format. If omitted, the built-in bloc friction
    /// scenario is used.
    #[clap(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Directory receiving one snapshot file per dump.
    ///
    /// Overrides the output directory of the configuration. If neither is given, dumps are only
    /// counted.
    #[clap(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Log file path.
    #[clap(short, long, parse(from_os_str))]
    logfile: Option<PathBuf>,

    /// Print carriage return progress lines instead of a spinner.
    #[clap(long)]
    plain: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

/// Reports progress on a single spinner line.
struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")?);
        Ok(SpinnerReporter { bar })
    }
}

impl Reporter for SpinnerReporter {
    fn time_step(&mut self, time_step: f64) {
        self.bar.println(format!("Time step: {}", time_step));
    }
    fn checkpoint(&mut self, phase: &str, step: u64) {
        self.bar.set_message(format!("{} step {}", phase, step));
        self.bar.tick();
    }
    fn phase_complete(&mut self, message: &str) {
        self.bar.println(message);
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

pub fn main() {
    if let Err(err) = try_main() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

pub fn try_main() -> Result<()> {
    let opt = Opt::parse();

    let _ = env_logger::Builder::new()
        .filter_level(opt.verbose.log_level_filter())
        .parse_env("BLOC_LOG")
        .try_init();

    let mut builder = match opt.config.as_ref() {
        Some(path) => match path.extension().and_then(|x| x.to_str()) {
            Some("ron") => DriverBuilder::from_config_file(path)?,
            Some(ext) => anyhow::bail!("Unsupported config extension: '.{}'", ext),
            None => anyhow::bail!("Missing file extension in config path: {}", path.display()),
        },
        None => DriverBuilder::new(DriverParams::default()),
    };

    if let Some(dir) = opt.output.as_ref() {
        builder.set_output(dir);
    }
    if let Some(dir) = builder.params().problem.output.as_ref() {
        std::fs::create_dir_all(dir)?;
    }

    // Pre-emptively create the log file. This way we can fail early.
    if let Some(logfile) = opt.logfile.as_ref() {
        let f = std::fs::File::create(logfile)?;
        let mut buf = std::io::BufWriter::new(f);
        writeln!(buf, "Config:\n")?;
        builder.params().write_as_ron(&mut buf)?;
        writeln!(buf)?;
    }

    let summary = if opt.plain {
        builder
            .load::<DryRunEngine, _>(ConsoleReporter::stdout())?
            .run()?
    } else {
        builder
            .load::<DryRunEngine, _>(SpinnerReporter::new()?)?
            .run()?
    };

    log::info!("{}", summary);
    if let Some(logfile) = opt.logfile.as_ref() {
        let mut f = std::fs::File::options().append(true).open(logfile)?;
        writeln!(f, "\nSummary:\n{}", summary)?;
    }
    Ok(())
}
