use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::constants::*;
use crate::errors::*;
use crate::table;
use crate::target::parse_pam_index;

#[derive(Debug)]
pub struct PredictArgs {
    pub model: String,
    pub features: Vec<String>,
    pub output: Option<String>,
    pub null: bool,
    pub scale: Option<f64>,
    pub reads: Vec<String>,
    pub reads_output: Option<String>,
    pub threads: usize,
}

#[derive(Debug)]
pub struct CompareArgs {
    pub expected: String,
    pub predicted: String,
    pub output: Option<String>,
    pub ignore_null: bool,
    pub threads: usize,
}

#[derive(Debug)]
pub struct SummarizeArgs {
    pub profiles: String,
    pub output: Option<String>,
}

#[derive(Debug)]
pub struct CandidatesArgs {
    pub target: String,
    pub pam_index: usize,
    pub indelgen: String,
    pub output: Option<String>,
}

pub enum Args {
    Predict(PredictArgs),
    Compare(CompareArgs),
    Summarize(SummarizeArgs),
    Candidates(CandidatesArgs),
    None,
}

pub struct Invocation {
    pub verbosity: u64,
    pub args: Args,
}

fn output_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("output")
        .long("output")
        .short("o")
        .takes_value(true)
        .help("Output file; defaults to STDOUT.")
}

fn threads_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("threads")
        .long("threads")
        .takes_value(true)
        .allow_hyphen_values(true)
        .number_of_values(1)
        .default_value("0")
        .help("Number of threads used for computation (0 for automatic).")
}

fn predict_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("predict")
        .about("Predict indel profiles from candidate feature tables")
        .arg(
            Arg::with_name("model")
                .help("Trained model file (feature column and coefficient per line).")
                .required(true),
        )
        .arg(
            Arg::with_name("features")
                .help("Feature tables, one per target; the file name is used as sample ID.")
                .required(true)
                .multiple(true),
        )
        .arg(output_arg())
        .arg(
            Arg::with_name("no-null")
                .long("no-null")
                .help("Do not add the unedited ('-') category to predictions."),
        )
        .arg(
            Arg::with_name("scale")
                .long("scale")
                .takes_value(true)
                .default_value("1000")
                .help("Total predicted reads; 0 to report raw log-linear weights."),
        )
        .arg(
            Arg::with_name("reads")
                .long("reads")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .requires("reads-output")
                .help("Candidate reads (output of 'candidates'), one per feature table."),
        )
        .arg(
            Arg::with_name("reads-output")
                .long("reads-output")
                .takes_value(true)
                .requires("reads")
                .help("Write the representative reads of predicted outcomes to this file."),
        )
        .arg(threads_arg())
}

fn compare_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("compare")
        .about("Symmetric KL divergence between observed and predicted profiles")
        .arg(
            Arg::with_name("expected")
                .help("Summary file with observed profiles.")
                .required(true),
        )
        .arg(
            Arg::with_name("predicted")
                .help("Summary file with predicted profiles.")
                .required(true),
        )
        .arg(output_arg())
        .arg(
            Arg::with_name("keep-null")
                .long("keep-null")
                .help("Include the unedited ('-') category in the comparison."),
        )
        .arg(threads_arg())
}

fn summarize_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("summarize")
        .about("Rank the outcomes of profiles and report their percentages")
        .arg(
            Arg::with_name("profiles")
                .help("Summary file with one or more profiles.")
                .required(true),
        )
        .arg(output_arg())
}

fn candidates_command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("candidates")
        .about("Enumerate candidate indels for a target using the external generator")
        .arg(
            Arg::with_name("target")
                .help("Target sequence (A, C, G, T).")
                .required(true),
        )
        .arg(
            Arg::with_name("pam_index")
                .help("Index of the NGG PAM in the target sequence.")
                .required(true),
        )
        .arg(
            Arg::with_name("indelgen")
                .long("indelgen")
                .takes_value(true)
                .env(INDELGEN_ENV)
                .required(true)
                .help("Path to the candidate generation executable."),
        )
        .arg(output_arg())
}

fn get_str<'a>(matches: &'a ArgMatches, key: &str) -> Result<&'a str> {
    match matches.value_of(key) {
        Some(value) => Ok(value),
        None => Err(format!("Required option {:?} not set", key).into()),
    }
}

fn get_string(matches: &ArgMatches, key: &str) -> Result<String> {
    get_str(matches, key).map(|v| v.into())
}

fn get_output(matches: &ArgMatches) -> Option<String> {
    matches.value_of("output").map(|s| s.to_string())
}

fn parse_threads(matches: &ArgMatches) -> Result<usize> {
    let s = get_str(matches, "threads")?;

    match usize::from_str_radix(s, 10) {
        Ok(v) => Ok(v),
        Err(err) => Err(format!("Invalid --threads ({:?}) value: {}", s, err).into()),
    }
}

fn parse_scale(matches: &ArgMatches) -> Result<Option<f64>> {
    let scale = table::parse_f64(get_str(matches, "scale")?, "--scale")?;

    if scale < 0.0 {
        Err(format!("Invalid --scale ({}) value: must not be negative", scale).into())
    } else if scale == 0.0 {
        Ok(None)
    } else {
        Ok(Some(scale))
    }
}

pub fn parse_args() -> Result<Invocation> {
    let matches = App::new("indelpred")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prediction and evaluation of CRISPR/Cas9 indel repair profiles")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase logging verbosity (-v info, -vv debug)."),
        )
        .subcommand(predict_command())
        .subcommand(compare_command())
        .subcommand(summarize_command())
        .subcommand(candidates_command())
        .get_matches();

    let args = if let Some(matches) = matches.subcommand_matches("predict") {
        Args::Predict(PredictArgs {
            model: get_string(matches, "model")?,
            features: matches
                .values_of("features")
                .map(|values| values.map(|v| v.to_string()).collect())
                .unwrap_or_default(),
            output: get_output(matches),
            null: !matches.is_present("no-null"),
            scale: parse_scale(matches)?,
            reads: matches
                .values_of("reads")
                .map(|values| values.map(|v| v.to_string()).collect())
                .unwrap_or_default(),
            reads_output: matches.value_of("reads-output").map(|s| s.to_string()),
            threads: parse_threads(matches)?,
        })
    } else if let Some(matches) = matches.subcommand_matches("compare") {
        Args::Compare(CompareArgs {
            expected: get_string(matches, "expected")?,
            predicted: get_string(matches, "predicted")?,
            output: get_output(matches),
            ignore_null: !matches.is_present("keep-null"),
            threads: parse_threads(matches)?,
        })
    } else if let Some(matches) = matches.subcommand_matches("summarize") {
        Args::Summarize(SummarizeArgs {
            profiles: get_string(matches, "profiles")?,
            output: get_output(matches),
        })
    } else if let Some(matches) = matches.subcommand_matches("candidates") {
        Args::Candidates(CandidatesArgs {
            target: get_str(matches, "target")?.to_ascii_uppercase(),
            pam_index: parse_pam_index(get_str(matches, "pam_index")?)?,
            indelgen: get_string(matches, "indelgen")?,
            output: get_output(matches),
        })
    } else {
        eprintln!("{}", matches.usage());

        Args::None
    };

    let verbosity = match matches.subcommand() {
        (_, Some(sub)) => sub.occurrences_of("verbose"),
        _ => matches.occurrences_of("verbose"),
    };

    Ok(Invocation { verbosity, args })
}
