//! 会话令牌解析
//!
//! 只在本地读取 JWT 载荷中的声明（主要是 `exp`），不校验签名。
//! 签名与吊销由后端负责，客户端只用过期时间避免无意义的网络请求。

use crate::Timestamp;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token payload is not valid JSON claims: {0}")]
    Claims(String),
}

/// JWT 载荷中客户端关心的声明
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Unix 秒，部分签发方会写成浮点数
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.exp
            .filter(|exp| exp.is_finite())
            .and_then(|exp| Timestamp::from_unix_secs(exp.floor() as i64))
    }

    /// 缺少 `exp` 的令牌不算过期，由后端判定
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at()
            .is_some_and(|expires_at| expires_at.is_before(&now))
    }
}

/// 解码令牌载荷（不校验签名）
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// 令牌在 `now` 时是否仍可用于请求后端
///
/// 无法解析的令牌与过期令牌同样返回 false。
pub fn is_usable_at(token: &str, now: Timestamp) -> bool {
    decode_claims(token)
        .map(|claims| !claims.is_expired_at(now))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn reads_expiry_and_metadata() {
        let token = token_with(r#"{"sub":"a@b.c","exp":1900000000,"is_superuser":true,"user_id":4}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("a@b.c"));
        assert_eq!(claims.is_superuser, Some(true));
        assert_eq!(claims.expires_at().unwrap().as_unix_secs(), 1_900_000_000);
    }

    #[test]
    fn expiry_is_compared_against_now() {
        let token = token_with(r#"{"exp":1700000000}"#);
        let before = Timestamp::from_unix_secs(1_699_999_999).unwrap();
        let after = Timestamp::from_unix_secs(1_700_000_001).unwrap();
        assert!(is_usable_at(&token, before));
        assert!(!is_usable_at(&token, after));
    }

    #[test]
    fn missing_expiry_is_left_to_the_server() {
        let token = token_with(r#"{"sub":"a@b.c"}"#);
        assert!(is_usable_at(&token, Timestamp::now()));
        assert!(!decode_claims(&token).unwrap().is_expired_at(Timestamp::now()));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(decode_claims("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.b.c.d"), Err(TokenError::Malformed));
        assert!(matches!(decode_claims("a.!!!.c"), Err(TokenError::Encoding(_))));
        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain"));
        assert!(matches!(decode_claims(&not_json), Err(TokenError::Claims(_))));
        assert!(!is_usable_at("not-a-jwt", Timestamp::now()));
    }
}
