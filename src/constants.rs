// Reserved token for unedited reads
pub const NULL_TOKEN: &str = "-";

// Pseudo-count assumed for outcomes missing from one of two compared profiles
pub const MISSING_PSEUDOCOUNT: f64 = 0.5;

// Weight given to the injected unedited category of predicted profiles
pub const NULL_REFERENCE_WEIGHT: f64 = 1000.0;

// Entries below this weight are not written to summary files
pub const DISPLAY_THRESHOLD: f64 = 0.5;

// Prefix of the line starting a new sample in summary files
pub const SAMPLE_MARKER: &str = "@@@";

// Column naming the candidate token in feature tables
pub const INDEL_COLUMN: &str = "Indel";

pub const MIN_TARGET_LEN: usize = 20;
pub const MIN_PAM_INDEX: usize = 13;
// Nucleotides required downstream of the PAM index
pub const MIN_PAM_TAIL: usize = 7;

pub const INDELGEN_ENV: &str = "INDELGENTARGET_EXE";
