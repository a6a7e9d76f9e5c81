const AUTHOR_ID_MODULUS: u64 = 100_000_000;

/// Display-only author ID: a positive integer below 10^8 derived from the name.
pub fn author_id(name: &str) -> u32 {
    let digest = md5::compute(name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.0[..8]);
    let id = u64::from_be_bytes(prefix) % AUTHOR_ID_MODULUS;
    // 0 is not a valid WordPress author ID
    id.max(1) as u32
}

pub fn author_login(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// First and last whitespace-delimited tokens. The last name is empty for
/// single-token names.
pub fn split_name(name: &str) -> (String, String) {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [first, .., last] => (first.to_string(), last.to_string()),
    }
}
