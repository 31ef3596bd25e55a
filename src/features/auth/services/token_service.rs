use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AccessTokenClaims, AuthenticatedUser};

/// Issues and validates locally signed HS256 access tokens.
pub struct TokenService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token for the given account.
    ///
    /// Returns the signed token and its lifetime in seconds.
    pub fn issue_token(&self, id: Uuid, email: &str, roles: &[String]) -> Result<(String, u64)> {
        let now = chrono::Utc::now().timestamp() as u64;
        let expires_in = self.config.token_ttl.as_secs();

        let claims = AccessTokenClaims {
            sub: id.to_string(),
            email: email.to_string(),
            roles: roles.to_vec(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now,
            exp: now + expires_in,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Validate a bearer token and recover the authenticated identity.
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.leeway = self.config.jwt_leeway.as_secs();

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a valid account id".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            email: claims.email,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "vademecum".to_string(),
            audience: "vademecum-admin".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
            totp_issuer: "Vademecum".to_string(),
        }
    }

    fn claims_with_exp(config: &AuthConfig, exp: u64) -> AccessTokenClaims {
        let now = chrono::Utc::now().timestamp() as u64;
        AccessTokenClaims {
            sub: Uuid::nil().to_string(),
            email: "ana@escritorio.br".to_string(),
            roles: vec!["editor".to_string()],
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now,
            exp,
        }
    }

    #[test]
    fn test_issue_then_validate_roundtrip() {
        let service = TokenService::new(test_config());
        let id = Uuid::new_v4();
        let roles = vec!["admin".to_string()];

        let (token, expires_in) = service.issue_token(id, "ana@escritorio.br", &roles).unwrap();
        assert_eq!(expires_in, 3600);

        let user = service.validate_token(&token).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "ana@escritorio.br");
        assert_eq!(user.roles, roles);
    }

    #[test]
    fn test_rejects_tampered_token() {
        let service = TokenService::new(test_config());
        let (token, _) = service
            .issue_token(Uuid::new_v4(), "ana@escritorio.br", &[])
            .unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let config = test_config();
        let service = TokenService::new(config.clone());

        let now = chrono::Utc::now().timestamp() as u64;
        let claims = claims_with_exp(&config, now - 3600);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_wrong_audience() {
        let config = test_config();
        let service = TokenService::new(config.clone());

        let now = chrono::Utc::now().timestamp() as u64;
        let mut claims = claims_with_exp(&config, now + 3600);
        claims.aud = "some-other-service".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_rejects_other_secret() {
        let service = TokenService::new(test_config());

        let mut other_config = test_config();
        other_config.jwt_secret = "ffffffffffffffffffffffffffffffff".to_string();
        let other = TokenService::new(other_config);

        let (token, _) = other
            .issue_token(Uuid::new_v4(), "ana@escritorio.br", &[])
            .unwrap();
        assert!(service.validate_token(&token).is_err());
    }
}
