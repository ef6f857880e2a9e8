use bio::alphabets::Alphabet;

use crate::constants::*;
use crate::errors::*;

// PAM recognised by Cas9, relative to the PAM index
const PAM: &[u8] = b"NGG";

// IUPAC codes as bitmasks over A, C, G and T
const CODES: [(u8, u8); 15] = [
    (b'A', 0b0001),
    (b'C', 0b0010),
    (b'G', 0b0100),
    (b'T', 0b1000),
    (b'R', 0b0101),
    (b'Y', 0b1010),
    (b'S', 0b0110),
    (b'W', 0b1001),
    (b'K', 0b1100),
    (b'M', 0b0011),
    (b'B', 0b1110),
    (b'D', 0b1101),
    (b'H', 0b1011),
    (b'V', 0b0111),
    (b'N', 0b1111),
];

lazy_static! {
    static ref MASKS: [u8; 256] = {
        let mut masks = [0; 256];
        for &(code, mask) in CODES.iter() {
            masks[code as usize] = mask;
            masks[code.to_ascii_lowercase() as usize] = mask;
        }

        masks
    };

    static ref NUCLEOTIDES: Alphabet = Alphabet::new(b"ACGT");
}

/// True if every nucleotide matched by `candidate` is matched by `query`.
fn iupac_matches(query: u8, candidate: u8) -> bool {
    let (query, candidate) = (MASKS[query as usize], MASKS[candidate as usize]);

    candidate != 0 && query & candidate == candidate
}

fn invalid(msg: String) -> Error {
    ErrorKind::InvalidTarget(msg).into()
}

/// Checks that candidates can be generated around the PAM at `pam_idx`: the
/// target is plain upper-case DNA, leaves at least 10 nt on either side of
/// the cut site, and carries an NGG PAM.
pub fn validate_target(target: &str, pam_idx: usize) -> Result<()> {
    let seq = target.as_bytes();
    if seq.len() < PAM.len() || pam_idx >= seq.len() - PAM.len() {
        return Err(invalid(format!("PAM index {} out of range", pam_idx)));
    }

    if !NUCLEOTIDES.is_word(seq) {
        return Err(invalid("sequence must be composed of A, C, G, or T only".into()));
    }

    if seq.len() < MIN_TARGET_LEN || pam_idx < MIN_PAM_INDEX || pam_idx > seq.len() - MIN_PAM_TAIL
    {
        return Err(invalid(
            "sequence too short or PAM too close to edge of sequence \
             (at least 10 nt required on either side of the cut site)"
                .into(),
        ));
    }

    let window = &seq[pam_idx..pam_idx + PAM.len()];
    if !PAM.iter().zip(window).all(|(&q, &c)| iupac_matches(q, c)) {
        return Err(invalid(format!(
            "non-NGG PAM {:?} at index {}",
            String::from_utf8_lossy(window),
            pam_idx
        )));
    }

    Ok(())
}

/// Parses a PAM index column strictly as a non-negative integer.
pub fn parse_pam_index(value: &str) -> Result<usize> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(idx) = value.parse() {
            return Ok(idx);
        }
    }

    Err(ErrorKind::MalformedNumber("PAM index".into(), value.to_owned()).into())
}
