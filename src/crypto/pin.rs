use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 32;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

/// PINs are 4 to 6 ASCII digits.
pub fn pin_format_ok(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Fresh random salt for one hash.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Hash a PIN with a fresh salt.
/// Encoded as `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
pub fn hash_pin(pin: &str) -> String {
    let salt = generate_salt();
    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut derived);
    let encoded = format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        STANDARD.encode(salt),
        STANDARD.encode(derived),
    );
    derived.zeroize();
    encoded
}

/// Verify a PIN against an encoded hash in constant time.
/// Malformed encodings verify as false rather than erroring.
pub fn verify_pin(pin: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = STANDARD.decode(salt) else {
        return false;
    };
    let Ok(expected) = STANDARD.decode(hash) else {
        return false;
    };
    if expected.len() != HASH_LENGTH {
        return false;
    }

    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), &salt, iterations, &mut derived);
    let matched: bool = derived.ct_eq(&expected).into();
    derived.zeroize();
    matched
}
