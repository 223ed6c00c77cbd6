//! Local JWT expiry decoding
//!
//! Only the `exp` claim is read; the signature is not checked. A token that
//! does not decode is treated as opaque and left to the server to judge.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::store::Token;

/// Clock skew tolerated before a token counts as expired locally
const EXPIRY_LEEWAY_SECS: i64 = 30;

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

/// Decode base64url (URL-safe base64, padding optional)
fn base64_decode_url(input: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(input.trim_end_matches('=')).ok()
}

/// Expiry time from the token's `exp` claim, if it is a decodable JWT
pub fn token_expiry(token: &Token) -> Option<DateTime<Utc>> {
    // JWT format: header.payload.signature
    let mut parts = token.as_str().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = base64_decode_url(payload)?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

/// Whether the token is a JWT whose expiry has already passed at `now`
pub fn is_expired(token: &Token, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Some(expires_at) => expires_at <= now + Duration::seconds(EXPIRY_LEEWAY_SECS),
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn jwt_with_exp(exp: i64) -> Token {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"u1"}}"#, exp));
    Token::new(format!("{}.{}.signature", header, payload))
}
