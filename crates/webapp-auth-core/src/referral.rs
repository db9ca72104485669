//! Referral code helpers.
//!
//! Referral codes are a deterministic function of the user ID. They identify,
//! they do not authenticate: never accept one as a token.

/// Prefix of a start parameter that carries a referral code.
pub const REFERRAL_PREFIX: &str = "ref_";

/// Prefix of every generated referral code.
const CODE_PREFIX: &str = "CG";

/// Number of trailing ID digits embedded in a code.
const CODE_DIGITS: usize = 6;

/// Extract the referral code from a start parameter such as `ref_ABC123`.
///
/// Returns `None` when the parameter is absent or lacks the `ref_` prefix.
/// A bare `ref_` yields an empty code.
#[must_use]
pub fn extract_referral_code(start_param: Option<&str>) -> Option<String> {
    start_param?
        .strip_prefix(REFERRAL_PREFIX)
        .map(str::to_string)
}

/// Generate the referral code for a user ID.
///
/// Takes the last six decimal digits (left-padded with zeros), appends the
/// digit sum modulo 10 as a checksum and prefixes `CG`.
#[must_use]
pub fn generate_referral_code(user_id: u64) -> String {
    let digits = format!("{user_id:0width$}", width = CODE_DIGITS);
    let base = &digits[digits.len() - CODE_DIGITS..];

    let checksum = base
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .sum::<u32>()
        % 10;

    format!("{CODE_PREFIX}{base}{checksum}")
}
