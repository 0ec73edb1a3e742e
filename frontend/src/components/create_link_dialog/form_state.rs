//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `LinkFormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换（含客户端校验）

use super::alias_field::AliasStatus;
use leptos::prelude::*;
use shawty_shared::validate::{self, ValidationError};
use shawty_shared::{CreateLinkRequest, Timestamp};

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct LinkFormState {
    pub url: RwSignal<String>,
    pub alias: RwSignal<String>,
    pub alias_status: RwSignal<AliasStatus>,

    // 高级选项
    pub show_options: RwSignal<bool>,
    pub password: RwSignal<String>,
    /// `datetime-local` 输入框的原始值
    pub expires_at: RwSignal<String>,
    pub max_clicks: RwSignal<String>,
}

impl LinkFormState {
    /// 创建新的表单状态，所有字段使用默认值
    pub fn new() -> Self {
        Self {
            url: RwSignal::new(String::new()),
            alias: RwSignal::new(String::new()),
            alias_status: RwSignal::new(AliasStatus::Idle),
            show_options: RwSignal::new(false),
            password: RwSignal::new(String::new()),
            expires_at: RwSignal::new(String::new()),
            max_clicks: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.url.set(String::new());
        self.alias.set(String::new());
        self.alias_status.set(AliasStatus::Idle);
        self.show_options.set(false);
        self.password.set(String::new());
        self.expires_at.set(String::new());
        self.max_clicks.set(String::new());
    }

    /// 将表单状态转换为 API 请求对象
    pub fn to_request(&self) -> Result<CreateLinkRequest, String> {
        let url = self.url.get().trim().to_string();
        validate::validate_url(&url).map_err(|e| e.to_string())?;

        let alias = non_empty(self.alias.get());
        if let Some(alias) = &alias {
            validate::validate_alias(alias).map_err(|e| e.to_string())?;
            match self.alias_status.get() {
                AliasStatus::Taken => return Err("Custom alias is already taken".to_string()),
                AliasStatus::Checking => {
                    return Err("Still checking alias availability".to_string());
                }
                _ => {}
            }
        }

        let expires_at = match non_empty(self.expires_at.get()) {
            Some(raw) => Some(
                Timestamp::parse(&raw).ok_or_else(|| "Please enter a valid expiry date".to_string())?,
            ),
            None => None,
        };

        let max_clicks = validate::parse_max_clicks(&self.max_clicks.get())
            .map_err(|e: ValidationError| e.to_string())?;

        Ok(CreateLinkRequest {
            original_url: url,
            custom_alias: alias,
            password: non_empty(self.password.get()),
            expires_at,
            max_clicks,
        })
    }
}

impl Default for LinkFormState {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
