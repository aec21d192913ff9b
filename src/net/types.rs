//! Wire schema for the backend's JSON API.
//!
//! DESIGN
//! ======
//! Every response is an `{ code, data, msg }` envelope. Field names follow
//! the backend's camelCase. Numeric identifiers are read leniently (integer,
//! integral float, or numeric string) because Java `Long`s are sometimes
//! serialized as strings to survive JavaScript number precision.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Application status code; the backend sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(i64),
    Text(String),
}

impl ResponseCode {
    pub const SUCCESS: i64 = 200;
    pub const AUTH_EXPIRED: i64 = 401;

    /// True for `code` or its decimal string form.
    #[must_use]
    pub fn is(&self, code: i64) -> bool {
        match self {
            Self::Number(n) => *n == code,
            Self::Text(s) => *s == code.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.is(Self::SUCCESS)
    }

    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        self.is(Self::AUTH_EXPIRED)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: Option<ResponseCode>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Paged result (`records` plus paging counters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub records: Vec<T>,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub total: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub size: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub current: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub pages: u64,
}

// =============================================================================
// USER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCode {
    User,
    Admin,
}

impl RoleCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Cached profile of the logged-in user.
///
/// Fields the client does not model are kept in `extra` so a profile
/// written back to storage loses nothing. Decoding never fails for a JSON
/// object: a modelled field whose value has an unexpected type is moved to
/// `extra` under its own key instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "serde_json::Map<String, Value>")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Raw role code; codes other than `USER`/`ADMIN` are preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl From<serde_json::Map<String, Value>> for UserProfile {
    fn from(mut fields: serde_json::Map<String, Value>) -> Self {
        let id = take_field(&mut fields, "id", integer_from_value);
        let username = take_field(&mut fields, "username", text_from_value);
        let name = take_field(&mut fields, "name", text_from_value);
        let email = take_field(&mut fields, "email", text_from_value);
        let phone = take_field(&mut fields, "phone", text_from_value);
        let avatar = take_field(&mut fields, "avatar", text_from_value);
        let role_code = take_field(&mut fields, "roleCode", text_from_value);
        let status = take_field(&mut fields, "status", integer_from_value);
        Self { id, username, name, email, phone, avatar, role_code, status, extra: fields }
    }
}

/// Remove `key` when `convert` accepts its value; otherwise leave it in
/// `fields`. Null and blank strings are dropped as absent.
fn take_field<T>(
    fields: &mut serde_json::Map<String, Value>,
    key: &str,
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.get(key)?;
    if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
        fields.remove(key);
        return None;
    }
    let converted = convert(value)?;
    fields.remove(key);
    Some(converted)
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl UserProfile {
    #[must_use]
    pub fn role(&self) -> Option<RoleCode> {
        self.role_code.as_deref().and_then(RoleCode::parse)
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// ITEMS
// =============================================================================

/// Publication state shared by lost and found items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Claimed,
    Completed,
    Closed,
    Expired,
}

impl ItemStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Claimed),
            2 => Some(Self::Completed),
            3 => Some(Self::Closed),
            4 => Some(Self::Expired),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Claimed => 1,
            Self::Completed => 2,
            Self::Closed => 3,
            Self::Expired => 4,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Completed => "completed",
            Self::Closed => "closed",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItem {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Comma-separated image URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategory {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

// =============================================================================
// CLAIMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Lost => 0,
            Self::Found => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimApplication {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub item_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub item_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub audit_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAudit {
    pub id: i64,
    pub status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_remark: Option<String>,
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// 0 system, 1 application, 2 audit.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub r#type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub related_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_opt_i64_lenient")]
    pub is_read: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_description: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.is_read.unwrap_or(0) == 0
    }
}

/// Dashboard counters from `GET /lost-item/statistics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItemStatistics {
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub total_items: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub total_pending: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub total_claimed: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient")]
    pub total_users: u64,
}

// =============================================================================
// LENIENT NUMBERS
// =============================================================================

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Some(int);
            }
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn deserialize_opt_i64_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(ref s) if s.trim().is_empty() => Ok(None),
        other => integer_from_value(&other)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected integer-compatible number or string")),
    }
}

fn deserialize_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    integer_from_value(&value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| D::Error::custom("expected non-negative integer"))
}
