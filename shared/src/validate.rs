//! 表单校验
//!
//! 在发出任何请求之前执行，错误信息直接展示在表单内。

use crate::RESERVED_ALIASES;
use thiserror::Error;

/// bcrypt 只使用密码的前 72 个字节，后端会拒绝更长的密码
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid http(s) URL")]
    InvalidUrl,
    #[error("Alias can only contain letters, numbers, '-' and '_'")]
    InvalidAlias,
    #[error("This alias is reserved")]
    ReservedAlias,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password cannot exceed 72 bytes")]
    PasswordTooLong,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Max clicks must be a positive number")]
    InvalidMaxClicks,
}

/// 只接受带主机名的 http/https 地址
pub fn validate_url(raw: &str) -> Result<(), ValidationError> {
    let raw = raw.trim();
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .ok_or(ValidationError::InvalidUrl)?;

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();

    if host.is_empty() || raw.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

pub fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty()
        || !alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidAlias);
    }
    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(ValidationError::ReservedAlias);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail),
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// 新密码与确认密码必须一致
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    validate_password(password)?;
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// 解析可选的最大点击次数输入框；空白表示不限制
pub fn parse_max_clicks(raw: &str) -> Result<Option<i64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ValidationError::InvalidMaxClicks),
    }
}
