//! CFB8 stream cipher over AES-128, RSA-PKCS1v15 encryption of the shared
//! secret, and Minecraft's signed-hex SHA-1 "server hash" (spec §4.4).

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use sha1::{Digest, Sha1};

use crate::error::CryptoError;

/// One direction's CFB8 keystream state: the AES block cipher plus the
/// 16-byte shift register ("IV"), mutated in place on every byte.
///
/// CFB8 is self-synchronizing after an 8-byte lag — Minecraft uses the same
/// 16-byte shared secret as both the AES key and the initial IV, so a
/// connection needs two independent instances (one per direction), each
/// owned by that direction's half of the connection.
struct Cfb8 {
    cipher: Aes128,
    shift_register: [u8; 16],
}

impl Cfb8 {
    fn new(key: &[u8; 16], iv: &[u8; 16]) -> Self {
        Self {
            cipher: Aes128::new_from_slice(key).expect("16-byte key"),
            shift_register: *iv,
        }
    }

    /// Encrypt the register under AES and return just the first output byte
    /// — the CFB8 keystream byte for the current position.
    fn keystream_byte(&self) -> u8 {
        let mut block = self.shift_register.into();
        self.cipher.encrypt_block(&mut block);
        block[0]
    }

    /// Shift `ciphertext_byte` into the register, dropping the oldest byte.
    fn shift_in(&mut self, ciphertext_byte: u8) {
        self.shift_register.rotate_left(1);
        self.shift_register[15] = ciphertext_byte;
    }
}

/// The write-direction CFB8 encryptor.
pub struct Aes128CfbEnc(Cfb8);

impl Aes128CfbEnc {
    fn new(key: &[u8; 16], iv: &[u8; 16]) -> Self {
        Self(Cfb8::new(key, iv))
    }

    /// Encrypt `data` in place.
    pub fn encrypt_in_place(&mut self, data: &mut [u8]) {
        for byte in data {
            let ciphertext = *byte ^ self.0.keystream_byte();
            self.0.shift_in(ciphertext);
            *byte = ciphertext;
        }
    }
}

/// The read-direction CFB8 decryptor.
pub struct Aes128CfbDec(Cfb8);

impl Aes128CfbDec {
    fn new(key: &[u8; 16], iv: &[u8; 16]) -> Self {
        Self(Cfb8::new(key, iv))
    }

    /// Decrypt `data` in place.
    pub fn decrypt_in_place(&mut self, data: &mut [u8]) {
        for byte in data {
            let ciphertext = *byte;
            let plaintext = ciphertext ^ self.0.keystream_byte();
            self.0.shift_in(ciphertext);
            *byte = plaintext;
        }
    }
}

/// Build the read/write CFB8 keystreams for a 16-byte shared secret, used as
/// both key and IV for both directions per spec §4.4.
#[must_use]
pub fn create_cipher(shared_secret: &[u8; 16]) -> (Aes128CfbEnc, Aes128CfbDec) {
    (
        Aes128CfbEnc::new(shared_secret, shared_secret),
        Aes128CfbDec::new(shared_secret, shared_secret),
    )
}

/// Parse a server's RSA public key from its SubjectPublicKeyInfo DER
/// encoding (as sent in the Encryption-Request packet).
pub fn parse_rsa_public_key_der(der: &[u8]) -> Result<RsaPublicKey, CryptoError> {
    use rsa::pkcs8::DecodePublicKey;
    RsaPublicKey::from_public_key_der(der).map_err(|e| CryptoError::KeyParse(e.to_string()))
}

/// RSA-PKCS1v15 encrypt `plaintext` under the server's public key.
pub fn rsa_encrypt(
    public_key: &RsaPublicKey,
    plaintext: &[u8],
    rng: &mut impl rand::RngCore,
) -> Result<Vec<u8>, CryptoError> {
    public_key
        .encrypt(rng, Pkcs1v15Encrypt, plaintext)
        .map_err(|_| CryptoError::Decrypt)
}

/// Compute Minecraft's "server hash": `SHA1(serverId ++ sharedSecret ++
/// serverPublicKeyDer)`, interpreted as a signed two's-complement big integer
/// and rendered as lowercase hex with no leading zeros, `-`-prefixed if
/// negative. Equivalent to Java's `new BigInteger(digest).toString(16)`.
#[must_use]
pub fn server_hash(server_id: &str, shared_secret: &[u8], public_key_der: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(server_id.as_bytes());
    hasher.update(shared_secret);
    hasher.update(public_key_der);
    let digest = hasher.finalize();

    signed_bigint_hex(&digest)
}

/// Convert a big-endian two's-complement byte string to the lowercase hex
/// representation Java's `BigInteger(bytes).toString(16)` would produce.
fn signed_bigint_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "0".to_string();
    }

    let is_negative = bytes[0] & 0x80 != 0;

    if is_negative {
        let mut magnitude: Vec<u8> = bytes.iter().map(|b| !b).collect();
        for byte in magnitude.iter_mut().rev() {
            let (result, carry) = byte.overflowing_add(1);
            *byte = result;
            if !carry {
                break;
            }
        }
        format!("-{}", trim_leading_zeros(&hex::encode(magnitude)))
    } else {
        trim_leading_zeros(&hex::encode(bytes))
    }
}

fn trim_leading_zeros(hex: &str) -> String {
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfb8_known_answer_test() {
        let key: [u8; 16] = hex_to_array("2b7e151628aed2a6abf7158809cf4f3c");
        let iv: [u8; 16] = hex_to_array("000102030405060708090a0b0c0d0e0f");
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let expected = hex::decode("3b79424c9c0dd436bace9e0ed4586a4f").unwrap();

        let mut enc = Aes128CfbEnc::new(&key, &iv);
        let mut data = plaintext.clone();
        enc.encrypt_in_place(&mut data);
        assert_eq!(data, expected);
    }

    #[test]
    fn cfb8_round_trip() {
        let key: [u8; 16] = hex_to_array("2b7e151628aed2a6abf7158809cf4f3c");
        let iv: [u8; 16] = hex_to_array("000102030405060708090a0b0c0d0e0f");
        let plaintext = b"the quick brown fox jumps over the lazy dog!!!!".to_vec();

        let (mut enc, mut dec) = create_cipher_for_test(&key, &iv);
        let mut ciphertext = plaintext.clone();
        enc.encrypt_in_place(&mut ciphertext);
        let mut roundtripped = ciphertext.clone();
        dec.decrypt_in_place(&mut roundtripped);
        assert_eq!(roundtripped, plaintext);
    }

    fn create_cipher_for_test(key: &[u8; 16], iv: &[u8; 16]) -> (Aes128CfbEnc, Aes128CfbDec) {
        (Aes128CfbEnc::new(key, iv), Aes128CfbDec::new(key, iv))
    }

    fn hex_to_array(s: &str) -> [u8; 16] {
        let bytes = hex::decode(s).unwrap();
        bytes.try_into().unwrap()
    }

    #[test]
    fn server_hash_fixed_vectors() {
        assert_eq!(
            server_hash("Notch", &[], &[]),
            "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48"
        );
        assert_eq!(
            server_hash("jeb_", &[], &[]),
            "-7c9d5b0044c130109a5d7b5fb5c317c02b4e28c1"
        );
        assert_eq!(
            server_hash("simon", &[], &[]),
            "88e16a1019277b15d58faf0541e11910eb756f6"
        );
    }
}
