use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::{AuthError, TokenError};
use crate::domain::auth::ports::{Clock, TokenClaims, TokenIssuer, TokenKind};
use crate::infrastructure::config::JwtConfig;

/// HS256 issuer for the dual-token scheme. Access and refresh tokens carry
/// the same claim set but are signed with independent secrets, so neither
/// key can forge the other kind even before the embedded kind check runs.
pub struct JwtTokenIssuer {
  access_encoding: EncodingKey,
  access_decoding: DecodingKey,
  refresh_encoding: EncodingKey,
  refresh_decoding: DecodingKey,
  access_ttl_seconds: u64,
  refresh_ttl_seconds: u64,
  clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
  pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
    Self {
      access_encoding: EncodingKey::from_secret(config.secret.as_bytes()),
      access_decoding: DecodingKey::from_secret(config.secret.as_bytes()),
      refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
      refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
      access_ttl_seconds: config.access_ttl_seconds,
      refresh_ttl_seconds: config.refresh_ttl_seconds,
      clock,
    }
  }

  fn sign(&self, user: &User, kind: TokenKind) -> Result<String, AuthError> {
    let (key, ttl) = match kind {
      TokenKind::Access => (&self.access_encoding, self.access_ttl_seconds),
      TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl_seconds),
    };

    let iat = self.clock.now().timestamp();
    let claims = TokenClaims {
      sub: user.id,
      email: user.email.clone(),
      role: user.role,
      kind,
      iat,
      exp: iat + ttl as i64,
    };

    encode(&Header::default(), &claims, key)
      .map_err(|e| AuthError::Token(TokenError::SigningFailed(e.to_string())))
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue_access(&self, user: &User) -> Result<String, AuthError> {
    self.sign(user, TokenKind::Access)
  }

  fn issue_refresh(&self, user: &User) -> Result<String, AuthError> {
    self.sign(user, TokenKind::Refresh)
  }

  /// Verifies signature and expiry with the expected kind's secret, then
  /// checks the embedded kind claim
  fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<TokenClaims, AuthError> {
    let key = match expected_kind {
      TokenKind::Access => &self.access_decoding,
      TokenKind::Refresh => &self.refresh_decoding,
    };

    let data = decode::<TokenClaims>(token, key, &Validation::default())
      .map_err(|e| AuthError::Token(TokenError::from(e)))?;

    if data.claims.kind != expected_kind {
      return Err(AuthError::Token(TokenError::KindMismatch));
    }

    Ok(data.claims)
  }

  fn access_ttl_seconds(&self) -> u64 {
    self.access_ttl_seconds
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::{NewUser, UserRole};
  use crate::domain::auth::services::test_support::FixedClock;
  use chrono::{Duration, Utc};

  fn test_config() -> JwtConfig {
    JwtConfig {
      secret: "access-secret-for-tests".to_string(),
      refresh_secret: "refresh-secret-for-tests".to_string(),
      access_ttl_seconds: 900,
      refresh_ttl_seconds: 604_800,
    }
  }

  fn test_user() -> User {
    User::new(
      NewUser {
        email: "a@x.com".to_string(),
        password_hash: "$argon2id$irrelevant".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        gdpr_consent: true,
        marketing_consent: false,
      },
      Utc::now(),
    )
  }

  fn issuer_at(now: chrono::DateTime<Utc>) -> JwtTokenIssuer {
    JwtTokenIssuer::new(&test_config(), Arc::new(FixedClock::new(now)))
  }

  #[test]
  fn test_access_token_round_trip() {
    let issuer = issuer_at(Utc::now());
    let user = test_user();

    let token = issuer.issue_access(&user).unwrap();
    let claims = issuer.verify(&token, TokenKind::Access).unwrap();

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.role, UserRole::User);
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.exp - claims.iat, 900);
  }

  #[test]
  fn test_refresh_token_is_not_an_access_token() {
    let issuer = issuer_at(Utc::now());
    let user = test_user();

    let refresh = issuer.issue_refresh(&user).unwrap();
    assert!(issuer.verify(&refresh, TokenKind::Refresh).is_ok());

    // Different secret, so the signature check already fails
    let err = issuer.verify(&refresh, TokenKind::Access).unwrap_err();
    assert!(matches!(err, AuthError::Token(_)));
  }

  #[test]
  fn test_kind_claim_is_checked_even_with_shared_secrets() {
    let mut config = test_config();
    config.refresh_secret = config.secret.clone();
    let issuer = JwtTokenIssuer::new(&config, Arc::new(FixedClock::new(Utc::now())));
    let user = test_user();

    let refresh = issuer.issue_refresh(&user).unwrap();
    let err = issuer.verify(&refresh, TokenKind::Access).unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::KindMismatch)));
  }

  #[test]
  fn test_expired_token_is_rejected() {
    let two_hours_ago = Utc::now() - Duration::hours(2);
    let issuer = issuer_at(two_hours_ago);
    let user = test_user();

    let token = issuer.issue_access(&user).unwrap();
    let err = issuer.verify(&token, TokenKind::Access).unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::Expired)));
  }

  #[test]
  fn test_garbage_token_is_invalid() {
    let issuer = issuer_at(Utc::now());
    let err = issuer
      .verify("not.a.token", TokenKind::Access)
      .unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::Invalid)));
  }

  #[test]
  fn test_tampered_token_is_rejected() {
    let issuer = issuer_at(Utc::now());
    let user = test_user();

    let mut token = issuer.issue_access(&user).unwrap();
    token.push('x');
    assert!(issuer.verify(&token, TokenKind::Access).is_err());
  }
}
