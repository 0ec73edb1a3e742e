//! 时间类型模块
//!
//! 后端返回的时间既可能是带时区的 RFC 3339 字符串，也可能是不带时区的
//! ISO 8601 字符串（按 UTC 处理）。`Timestamp` 统一这两种格式。

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =========================================================
// Timestamp - 可传输的时间类型
// =========================================================

/// UTC 时间点，用于序列化传输和页面展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// 当前时间
    #[inline]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// 从 Unix 秒创建（JWT `exp` 声明使用该格式）
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// 获取 Unix 秒
    #[inline]
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// 内部的 chrono 时间
    #[inline]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// 解析 RFC 3339 或不带时区的 ISO 8601 字符串
    ///
    /// 返回 None 如果两种格式都无法解析
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    /// 表格中展示用的短日期，例如 `Mar 04, 2025`
    pub fn display_date(&self) -> String {
        self.0.format("%b %d, %Y").to_string()
    }

    /// 是否早于给定时间
    #[inline]
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
