use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

pub const SESSION_TOKEN_LEN: usize = 64;

/// Opaque session token, 64 alphanumeric characters from the OS RNG.
pub fn generate_session_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_have_fixed_length_and_alphanumeric_charset() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate_session_token(), generate_session_token());
    }
}
