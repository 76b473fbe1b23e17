use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Payload for `POST /users` and `PUT /users/{id}`.
///
/// `valid()` passes the target API's validation. Each `with_*` override
/// corrupts or changes a single field so a scenario isolates one cause.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestUserFixture {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub personal_id_document: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalIdDocument {
    pub document_id: String,
    pub country_of_issue: String,
    pub valid_until: String,
}

impl PersonalIdDocument {
    pub fn valid() -> Self {
        Self {
            document_id: "AB123456".into(),
            country_of_issue: "US".into(),
            valid_until: format_date(date(2030, 12, 31)),
        }
    }
}

impl TestUserFixture {
    pub fn valid() -> Self {
        Self {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            date_of_birth: format_date(date(1999, 9, 30)),
            personal_id_document: serde_json::to_value(PersonalIdDocument::valid())
                .unwrap_or_default(),
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Replace the email with one no earlier run has used.
    pub fn with_unique_email(self) -> Self {
        self.with_email(unique_email("user"))
    }

    /// Raw override, not checked for being a real date.
    pub fn with_date_of_birth(mut self, date_of_birth: impl Into<String>) -> Self {
        self.date_of_birth = date_of_birth.into();
        self
    }

    pub fn born_on(self, date_of_birth: NaiveDate) -> Self {
        self.with_date_of_birth(format_date(date_of_birth))
    }

    pub fn with_personal_id_document(mut self, document: serde_json::Value) -> Self {
        self.personal_id_document = document;
        self
    }
}

/// `<prefix>-<uuid>@example.com`
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// Only called with literal, known-good dates.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
