use rand::Rng;

/// Generates a six-digit password-reset code.
///
/// Codes are drawn uniformly from 100000..=999999, so the string form is
/// always exactly six digits with no leading zero.
pub fn generate_reset_code() -> String {
    let mut rng = rand::thread_rng();
    let code: u32 = rng.gen_range(100_000..=999_999);
    code.to_string()
}
