//! The SHA-1 "server ID" digest Mojang's session server checks against,
//! per <https://wiki.vg/Protocol_Encryption#Server>.

use sha1::{Digest, Sha1};

/// `serverId` is always the empty string for modern clients; it, the shared
/// secret, and the server's DER public key are hashed together, then the
/// 20-byte digest is formatted as a signed big-endian hex integer.
#[must_use]
pub fn server_hash(server_id: &str, shared_secret: &[u8], public_key_der: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(server_id.as_bytes());
    hasher.update(shared_secret);
    hasher.update(public_key_der);
    let digest: [u8; 20] = hasher.finalize().into();
    format_signed_digest(digest)
}

/// Interprets `digest` as a signed big-endian integer and hex-formats it
/// without leading zeroes, matching `java.math.BigInteger(digest).toString(16)`.
fn format_signed_digest(mut digest: [u8; 20]) -> String {
    let negative = digest[0] & 0x80 != 0;
    if negative {
        two_complement_in_place(&mut digest);
    }

    let hex = hex::encode(digest);
    let trimmed = hex.trim_start_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };

    if negative {
        format!("-{trimmed}")
    } else {
        trimmed.to_owned()
    }
}

fn two_complement_in_place(bytes: &mut [u8]) {
    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        *byte = !*byte;
        if carry {
            carry = *byte == 0xff;
            *byte = byte.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(input: &str) -> String {
        let hash: [u8; 20] = Sha1::digest(input.as_bytes()).into();
        format_signed_digest(hash)
    }

    // wiki.vg's worked examples for the signed-hex formatting step.
    #[test]
    fn matches_notch_positive_vector() {
        assert_eq!(digest_of("Notch"), "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48");
    }

    #[test]
    fn matches_jeb_negative_vector() {
        assert_eq!(digest_of("jeb_"), "-7c9d5b0044c130109a5d7b5fb5c317c02b4e28c1");
    }

    #[test]
    fn matches_simon_positive_vector() {
        assert_eq!(digest_of("simon"), "88e16a1019277b15d58faf0541e11910eb756f6");
    }

    #[test]
    fn server_hash_mixes_all_three_inputs() {
        let a = server_hash("", &[1, 2, 3], &[4, 5, 6]);
        let b = server_hash("", &[1, 2, 3], &[4, 5, 7]);
        assert_ne!(a, b);
    }
}
