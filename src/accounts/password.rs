use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::task::{self, JoinError};

const SCHEME: &str = "sha256";
const ROUNDS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// Hashes `password` with a fresh random salt.
///
/// Stored form: `sha256$<rounds>$<salt hex>$<digest hex>`.
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    encode(ROUNDS, &salt, &digest(ROUNDS, &salt, password))
}

/// Checks `password` against a value produced by [`hash`].
/// Anything malformed simply doesn't match.
pub fn matches(stored: &str, password: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(rounds), Some(salt), Some(expected), None) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
        return false;
    };

    let actual = digest(rounds, &salt, password);
    // compare every byte so timing doesn't depend on where the first mismatch is
    actual.len() == expected.len()
        && actual.iter().zip(&expected).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

/// [`hash`] on tokio's blocking pool, off the async workers.
pub async fn hash_blocking(password: &str) -> Result<String, JoinError> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash(&password)).await
}

/// [`matches`] on tokio's blocking pool.
pub async fn matches_blocking(stored: &str, password: &str) -> Result<bool, JoinError> {
    let (stored, password) = (stored.to_owned(), password.to_owned());
    task::spawn_blocking(move || matches(&stored, &password)).await
}

fn digest(rounds: u32, salt: &[u8], password: &str) -> Vec<u8> {
    let mut out = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..rounds {
        out = Sha256::new()
            .chain_update(salt)
            .chain_update(out)
            .finalize();
    }
    out.to_vec()
}

fn encode(rounds: u32, salt: &[u8], digest: &[u8]) -> String {
    format!("{SCHEME}${rounds}${}${}", hex::encode(salt), hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_match() {
        let stored = hash("hunter2");
        assert!(stored.starts_with("sha256$10000$"));
        assert!(matches(&stored, "hunter2"));
        assert!(!matches(&stored, "hunter3"));
        assert!(!matches(&stored, ""));
    }

    #[tokio::test]
    async fn blocking_pool_variants_agree() {
        let stored = hash_blocking("hunter2").await.unwrap();
        assert!(matches(&stored, "hunter2"));
        assert!(matches_blocking(&stored, "hunter2").await.unwrap());
        assert!(!matches_blocking(&stored, "hunter3").await.unwrap());
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash("same"), hash("same"));
    }

    #[test]
    fn never_stores_plaintext() {
        assert!(!hash("plaintext-secret").contains("plaintext-secret"));
    }

    #[test]
    fn malformed_never_matches() {
        assert!(!matches("", ""));
        assert!(!matches("hunter2", "hunter2"));
        assert!(!matches("sha256$abc$00$00", "x"));
        assert!(!matches("md5$1$00$00", "x"));
        assert!(!matches("sha256$1$zz$00", "x"));
    }
}
