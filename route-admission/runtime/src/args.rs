use crate::{
    admission::{Admission, AdmissionReview},
    core::ValidationContext,
    log::{self, LogFormat},
    manifest,
    report::{OutputFormat, Report},
};
use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use std::{
    fs,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[clap(name = "route-admission", about = "Admission checks for traffic Routes")]
pub struct Args {
    #[clap(
        long,
        default_value = "route_admission=info,warn",
        env = "ROUTE_ADMISSION_LOG"
    )]
    log_level: String,

    #[clap(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    /// Rejects routes that set deprecated fields.
    #[clap(long)]
    disallow_deprecated_fields: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluates an AdmissionReview and prints the response review.
    Review {
        /// Path to an AdmissionReview JSON document. Read from stdin when
        /// omitted.
        file: Option<PathBuf>,
    },

    /// Validates Route manifests, failing if any route would be denied.
    Check {
        #[clap(long, value_enum, default_value = "plain")]
        output: OutputFormat,

        /// YAML or JSON manifests, possibly with multiple documents.
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            disallow_deprecated_fields,
            command,
        } = self;

        log::init(&log_level, log_format)?;

        let mut ctx = ValidationContext::default();
        if disallow_deprecated_fields {
            ctx = ctx.disallow_deprecated();
        }
        let admission = Admission::new(ctx);

        match command {
            Command::Review { file } => review(&admission, file.as_deref()),
            Command::Check { output, files } => check(&admission, output, &files),
        }
    }
}

fn review(admission: &Admission, file: Option<&Path>) -> Result<()> {
    let review = match file {
        Some(path) => {
            let f = fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            serde_json::from_reader::<_, AdmissionReview>(BufReader::new(f))
        }
        None => serde_json::from_reader::<_, AdmissionReview>(io::stdin().lock()),
    };

    let rsp = match review {
        Ok(review) => admission.review(review),
        Err(error) => {
            warn!(%error, "Failed to parse admission review");
            Admission::invalid(error)
        }
    };

    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, &rsp).context("failed to encode admission review")?;
    writeln!(out)?;
    Ok(())
}

fn check(admission: &Admission, output: OutputFormat, files: &[PathBuf]) -> Result<()> {
    let mut out = io::stdout().lock();
    let mut total = 0usize;
    let mut denied = 0usize;

    for path in files {
        let file = path.display().to_string();
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {file}"))?;
        let routes =
            manifest::parse_routes(&contents).with_context(|| format!("failed to parse {file}"))?;
        debug!(%file, routes = routes.len(), "Checking manifest");

        for route in &routes {
            let report = Report::new(&file, route, admission.check(route));
            total += 1;
            if !report.is_allowed() {
                denied += 1;
            }
            writeln!(out, "{}", report.render(output)?)?;
        }
    }

    ensure!(denied == 0, "{denied} of {total} routes denied");
    info!(total, "All routes admitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check() {
        let args = Args::try_parse_from([
            "route-admission",
            "--disallow-deprecated-fields",
            "check",
            "--output",
            "json",
            "a.yaml",
            "b.yaml",
        ])
        .unwrap();
        assert!(args.disallow_deprecated_fields);
        assert_eq!(args.log_format, LogFormat::Plain);
        match args.command {
            Command::Check { output, files } => {
                assert_eq!(output, OutputFormat::Json);
                assert_eq!(files, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
            }
            cmd => panic!("unexpected command: {cmd:?}"),
        }
    }

    #[test]
    fn parses_review_from_stdin() {
        let args = Args::try_parse_from(["route-admission", "--log-format", "json", "review"])
            .unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(matches!(args.command, Command::Review { file: None }));
    }

    #[test]
    fn check_requires_files() {
        assert!(Args::try_parse_from(["route-admission", "check"]).is_err());
    }
}
