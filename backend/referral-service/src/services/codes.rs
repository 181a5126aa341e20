/// Referral code generation
use rand::Rng;

/// Charset for referral codes: uppercase letters and digits.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default code length.
pub const CODE_LENGTH: usize = 8;

/// Generate a referral code of the given length.
///
/// `thread_rng` is a CSPRNG, so codes are not guessable or
/// pre-registerable. Uniqueness is NOT guaranteed here; the users.code
/// unique constraint is the arbiter and the signup orchestrator retries
/// on collision.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate_code(CODE_LENGTH).len(), 8);
        assert_eq!(generate_code(12).len(), 12);
        assert_eq!(generate_code(0).len(), 0);
    }

    #[test]
    fn stays_within_charset() {
        for _ in 0..100 {
            let code = generate_code(CODE_LENGTH);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn consecutive_codes_differ() {
        // 36^8 keyspace; a back-to-back collision means the RNG is broken.
        let a = generate_code(CODE_LENGTH);
        let b = generate_code(CODE_LENGTH);
        assert_ne!(a, b);
    }
}
