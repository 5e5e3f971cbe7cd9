//! State OAuth2 (anti-CSRF)
//!
//! O state trafega pelo redirect como JSON em base64 URL-safe. A cópia
//! guardada no cache é o JSON puro, sem o base64.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::utils::{AppError, AppResult};

/// Codifica sem padding e aceita entrada com ou sem `=`
const STATE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const NONCE_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    /// Nonce aleatório
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl OAuthState {
    /// Novo state com nonce aleatório
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            state: generate_nonce(),
            user_id: user_id.into(),
            org_id: org_id.into(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::InvalidState(format!("JSON inválido: {}", e)))
    }

    /// Forma de transporte: base64 URL-safe do JSON
    pub fn encode(&self) -> AppResult<String> {
        Ok(STATE_ENGINE.encode(self.to_json()?))
    }

    pub fn decode(encoded: &str) -> AppResult<Self> {
        let bytes = STATE_ENGINE
            .decode(encoded.trim())
            .map_err(|e| AppError::InvalidState(format!("base64 inválido: {}", e)))?;

        let json = String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidState(format!("UTF-8 inválido: {}", e)))?;

        Self::from_json(&json)
    }

    /// Compara os nonces em tempo constante
    ///
    /// `user_id`/`org_id` já fazem parte da chave do cache de onde o state
    /// salvo foi lido
    pub fn matches(&self, other: &OAuthState) -> bool {
        self.state.as_bytes().ct_eq(other.state.as_bytes()).into()
    }
}

/// Equivalente a 32 bytes de `token_urlsafe`
pub fn generate_nonce() -> String {
    let mut random = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut random);
    STATE_ENGINE.encode(random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let original = OAuthState::new("TestUser", "TestOrg");
        let encoded = original.encode().unwrap();

        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));

        let decoded = OAuthState::decode(&encoded).unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.matches(&original));
    }

    #[test]
    fn test_decode_accepts_padded_input() {
        let padded = base64::engine::general_purpose::URL_SAFE
            .encode(r#"{"state":"abc","user_id":"u","org_id":"o"}"#);

        let decoded = OAuthState::decode(&padded).unwrap();
        assert_eq!(decoded.state, "abc");
        assert_eq!(decoded.org_id, "o");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = OAuthState::decode("!!not-base64!!").unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        // base64 válido, JSON inválido
        let err = OAuthState::decode(&STATE_ENGINE.encode("not json")).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        // JSON sem campos obrigatórios
        let err = OAuthState::decode(&STATE_ENGINE.encode(r#"{"state":"x"}"#)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn test_nonces_are_unique_and_url_safe() {
        let a = generate_nonce();
        let b = generate_nonce();

        assert_ne!(a, b);
        // 32 bytes -> 43 caracteres sem padding
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_matches_detects_tampered_nonce() {
        let original = OAuthState::new("u", "o");
        let mut tampered = original.clone();
        tampered.state.push('x');

        assert!(!original.matches(&tampered));

        // Mesmo comprimento, último caractere trocado
        let mut flipped = original.clone();
        let last = flipped.state.pop().unwrap();
        flipped.state.push(if last == 'A' { 'B' } else { 'A' });
        assert!(!original.matches(&flipped));
    }

    #[test]
    fn test_matches_compares_only_the_nonce() {
        let original = OAuthState::new("u", "o");
        let same_nonce = OAuthState {
            state: original.state.clone(),
            user_id: "outro".to_string(),
            org_id: "outra".to_string(),
        };

        assert!(original.matches(&same_nonce));
        assert!(!original.matches(&OAuthState::new("u", "o")));
    }
}
