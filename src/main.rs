// Entry point and terminal flow.
//
// The dataset is loaded and shaped once at startup, then the operator picks
// a school (by name or code) and receives three report sections:
// array information, the requested school's statistics, and statistics
// across all schools.
mod error;
mod index;
mod loader;
mod output;
mod reports;
mod shaper;
mod types;
mod util;

use anyhow::{bail, Context};
use clap::Parser;
use index::SchoolIndex;
use shaper::EnrollmentTensor;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};
use types::EnrollmentSummary;

const REQUEST_HEADER: &str = "\n***Requested School Statistics***\n";

#[derive(Parser)]
#[command(name = "school-enrollment")]
#[command(about = "Enrollment statistics for ten years of grade 10-12 data", long_about = None)]
struct Cli {
    /// CSV file with School Year, School Name, School Code and Grade 10-12 columns
    #[arg(long, default_value = "Assignment3Data.csv")]
    data: PathBuf,
    /// Report on this school (name or code) instead of prompting
    #[arg(long)]
    school: Option<String>,
    /// Also write the computed statistics as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Print the known schools and exit
    #[arg(long)]
    list_schools: bool,
}

fn init_tracing() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

/// Load, validate and shape the dataset. Runs once; everything it returns is
/// read-only afterwards.
fn build_dataset(path: &Path) -> Result<(EnrollmentTensor, SchoolIndex), error::DatasetError> {
    let dataset = loader::load_dataset(path)?;
    info!(
        "processing dataset... ({} rows, {} blank grade cells)",
        util::format_int(dataset.report.total_rows),
        util::format_int(dataset.report.missing_values)
    );
    let tensor = shaper::shape(&dataset.partitions, &dataset.schools)?;
    Ok((tensor, dataset.schools))
}

/// Ask for a school until the input resolves.
///
/// Each failed attempt prints the resolution error and asks again. Running
/// out of input is an error since no school can ever be selected.
fn prompt_school<R, W>(input: &mut R, out: &mut W, schools: &SchoolIndex) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "{}", REQUEST_HEADER)?;
        write!(out, "Enter the school name or numerical code: ")?;
        out.flush()?;

        let mut buf = String::new();
        if input.read_line(&mut buf)? == 0 {
            writeln!(out)?;
            bail!("input closed before a school was selected");
        }
        match schools.resolve(&buf) {
            Ok(offset) => return Ok(offset),
            Err(e) => {
                debug!(input = buf.trim(), "school lookup failed");
                writeln!(out, "{}", e)?;
            }
        }
    }
}

/// Pick the school to report on. A `--school` value must resolve as given;
/// without one the operator is prompted until an input resolves.
fn select_school<R, W>(
    cli_school: Option<&str>,
    input: &mut R,
    out: &mut W,
    schools: &SchoolIndex,
) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
{
    match cli_school {
        Some(school) => {
            writeln!(out, "{}", REQUEST_HEADER)?;
            let offset = schools
                .resolve(school)
                .with_context(|| format!("no school matches `{}`", school))?;
            Ok(offset)
        }
        None => prompt_school(input, out, schools),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (tensor, schools) = build_dataset(&cli.data).with_context(|| {
        format!(
            "failed to build enrollment array from {}",
            cli.data.display()
        )
    })?;

    if cli.list_schools {
        print!("{}", output::render_school_list(&schools));
        return Ok(());
    }

    println!("School Enrollment Statistics");
    println!("\n***Array Information***\n");
    print!("{}", reports::render_array_info(&tensor));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let offset = select_school(
        cli.school.as_deref(),
        &mut stdin.lock(),
        &mut stdout,
        &schools,
    )?;

    let school = reports::school_report(&tensor, &schools, offset);
    print!("{}", reports::render_school_report(&school));

    println!("\n***General Statistics for All Schools***\n");
    let global = reports::global_report(&tensor);
    print!("{}", reports::render_global_report(&global));

    if let Some(path) = &cli.json {
        let summary = EnrollmentSummary {
            shape: tensor.shape(),
            school: &school,
            global: &global,
        };
        output::write_json(path, &summary)?;
        info!(path = %path.display(), "statistics written");
    }

    Ok(())
}
