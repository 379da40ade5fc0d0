//! Authenticity-code minting.
//!
//! Codes are `NFC-XXXX-XXXX` drawn from an alphabet without O/0/I/1 so
//! they survive being read off a physical tag and typed by hand. Minting
//! is admin tooling; the verifier never generates codes, it only consumes
//! them.

use rand::Rng;

/// Code alphabet: upper-case without the characters O, 0, I, 1.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of each random segment.
const SEGMENT_LEN: usize = 4;

/// Mint a fresh authenticity code using the thread-local RNG.
#[must_use]
pub fn mint_code() -> String {
    mint_code_with(&mut rand::rng())
}

/// Mint a fresh authenticity code from the given RNG.
#[must_use]
pub fn mint_code_with<R: Rng>(rng: &mut R) -> String {
    let segment = |rng: &mut R| -> String {
        (0..SEGMENT_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                char::from(ALPHABET[idx])
            })
            .collect()
    };
    let first = segment(rng);
    let second = segment(rng);
    format!("NFC-{first}-{second}")
}

/// Whether a string has the shape of a minted code.
///
/// Verification itself does not require this - unknown shapes simply
/// classify as not found - but the CLI uses it to warn on obvious typos.
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    let mut parts = code.split('-');
    let (Some(prefix), Some(a), Some(b), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == "NFC"
        && [a, b].into_iter().all(|segment| {
            segment.len() == SEGMENT_LEN && segment.bytes().all(|c| ALPHABET.contains(&c))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_codes_are_well_formed() {
        for _ in 0..100 {
            let code = mint_code();
            assert!(is_well_formed(&code), "bad code: {code}");
        }
    }

    #[test]
    fn test_minted_codes_avoid_ambiguous_characters() {
        for _ in 0..100 {
            let code = mint_code();
            assert!(!code.contains('O'));
            assert!(!code.contains('0'));
            assert!(!code.contains('I'));
            assert!(!code.contains('1'));
        }
    }

    #[test]
    fn test_well_formed_rejects_typos() {
        assert!(is_well_formed("NFC-ABCD-2345"));
        assert!(!is_well_formed("nfc-abcd-2345"));
        assert!(!is_well_formed("NFC-ABCD"));
        assert!(!is_well_formed("NFC-ABCD-2345-9999"));
        assert!(!is_well_formed("NFC-AB10-2345"));
        assert!(!is_well_formed(""));
    }
}
