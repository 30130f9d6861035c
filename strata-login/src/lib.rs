#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::single_call_fn, clippy::cargo_common_metadata)]

//! Player name validation and offline-mode UUID derivation.

use uuid::Uuid;

/// A valid player name is 3 to 16 characters of ASCII alphanumerics or
/// underscores, matching what vanilla clients allow at the login prompt.
#[must_use]
pub fn is_valid_player_name(name: &str) -> bool {
    (3..=16).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derives a deterministic UUID from a username for servers running
/// without Mojang authentication: the first 16 bytes of
/// `UTF-8("OfflinePlayer:" + username)`. Names are validated to be at
/// least 3 bytes, so `"OfflinePlayer:".len() + name.len()` is always >= 16.
pub fn offline_uuid(username: &str) -> Result<Uuid, uuid::Error> {
    let seed = format!("OfflinePlayer:{username}");
    Uuid::from_slice(&seed.as_bytes()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        assert!(is_valid_player_name("Notch"));
        assert!(is_valid_player_name("a_b_c"));
        assert!(is_valid_player_name("xyz"));
        assert!(is_valid_player_name("sixteen_chars_ok"));
    }

    #[test]
    fn rejects_bad_length() {
        assert!(!is_valid_player_name("ab"));
        assert!(!is_valid_player_name("this_name_is_seventeen"));
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(!is_valid_player_name("bad name"));
        assert!(!is_valid_player_name("bad-name"));
        assert!(!is_valid_player_name("bad!name"));
    }

    #[test]
    fn offline_uuid_is_deterministic() {
        let a = offline_uuid("Notch").unwrap();
        let b = offline_uuid("Notch").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn offline_uuid_differs_per_username() {
        let a = offline_uuid("Notch").unwrap();
        let b = offline_uuid("jeb_").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn offline_uuid_is_first_16_bytes_of_prefixed_name() {
        let uuid = offline_uuid("xyz").unwrap();
        let seed = b"OfflinePlayer:xyz";
        assert_eq!(uuid.as_bytes(), &seed[..16]);
    }
}
