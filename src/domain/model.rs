use crate::utils::error::StoreError;
use crate::utils::validation::{parse_positive_int, scalar_text, FieldValidator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// 已付款並存檔的報名者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registrant {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub gender: Gender,
    pub category: String,
    pub payment_id: String,
    #[serde(rename = "chestNumber")]
    pub chest_number: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// 報名者的身分資料（不含付款資訊）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrantDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub gender: Gender,
    pub category: String,
}

impl RegistrantDetails {
    pub fn into_new_registrant(self, payment_id: String) -> NewRegistrant {
        NewRegistrant {
            name: self.name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            gender: self.gender,
            category: self.category,
            payment_id,
        }
    }
}

/// 尚未寫入的報名紀錄，由儲存層補上 id、號碼布與時間戳
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistrant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub gender: Gender,
    pub category: String,
    pub payment_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

fn text(value: &Option<Value>) -> Option<String> {
    value.as_ref().and_then(scalar_text)
}

/// `POST /api/auth/register` 的請求內容
///
/// 欄位保留原始 JSON 值：前端可能把電話或年齡送成數字。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationFields {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub gender: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

impl RegistrationFields {
    /// 下單前的完整欄位驗證，回傳所有不合格欄位
    pub fn validate(&self) -> Result<RegistrantDetails, Vec<FieldError>> {
        let (name, email, phone) = (text(&self.name), text(&self.email), text(&self.phone));
        let (gender, category) = (text(&self.gender), text(&self.category));
        let mut v = FieldValidator::new();

        let name = v.non_empty("name", name.as_deref(), "Name is required");
        let email = v.email("email", email.as_deref(), "Valid email is required");
        let phone = v.non_empty("phone", phone.as_deref(), "Phone number is required");
        let age = v.positive_int("age", self.age.as_ref(), "Valid age is required");
        let gender = v.parse::<Gender>("gender", gender.as_deref(), "Valid gender is required");
        let category = v.non_empty("category", category.as_deref(), "Category is required");

        match (name, email, phone, age, gender, category) {
            (Some(name), Some(email), Some(phone), Some(age), Some(gender), Some(category)) => {
                v.finish()?;
                Ok(RegistrantDetails {
                    name: name.to_string(),
                    email: email.trim().to_string(),
                    phone: phone.to_string(),
                    age,
                    gender,
                    category: category.to_string(),
                })
            }
            _ => Err(v.finish().err().unwrap_or_default()),
        }
    }

    /// 付款確認後組成紀錄；不做格式驗證，只檢查紀錄必要欄位
    pub fn record_details(&self) -> Result<RegistrantDetails, StoreError> {
        fn required(field: &str, value: &Option<Value>) -> Result<String, StoreError> {
            match text(value) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(StoreError::InvalidRecord {
                    field: field.to_string(),
                    reason: "is required".to_string(),
                }),
            }
        }

        let age = self
            .age
            .as_ref()
            .and_then(parse_positive_int)
            .ok_or_else(|| StoreError::InvalidRecord {
                field: "age".to_string(),
                reason: "must be a positive integer".to_string(),
            })?;

        let gender = required("gender", &self.gender)?
            .parse::<Gender>()
            .map_err(|reason| StoreError::InvalidRecord {
                field: "gender".to_string(),
                reason,
            })?;

        Ok(RegistrantDetails {
            name: required("name", &self.name)?,
            email: required("email", &self.email)?,
            phone: required("phone", &self.phone)?,
            age,
            gender,
            category: required("category", &self.category)?,
        })
    }
}

/// `POST /api/auth/verify-payment` 的請求內容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationFields {
    #[serde(flatten)]
    pub registrant: RegistrationFields,
    #[serde(default)]
    pub payment_id: Option<String>,
    /// 選填；有值時必須與付款所屬訂單一致
    #[serde(default)]
    pub order_id: Option<String>,
}

impl VerificationFields {
    pub fn validate_payment_id(&self) -> Result<String, Vec<FieldError>> {
        let mut v = FieldValidator::new();
        let payment_id = v.non_empty("payment_id", self.payment_id.as_deref(), "Payment ID is required");
        v.finish()?;
        Ok(payment_id.unwrap_or_default().trim().to_string())
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// 金流商回傳的訂單，原樣轉給前端
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub const PAYMENT_STATUS_CAPTURED: &str = "captured";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Payment {
    pub fn is_captured(&self) -> bool {
        self.status == PAYMENT_STATUS_CAPTURED
    }
}
