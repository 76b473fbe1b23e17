mod user_fixture;

pub use user_fixture::{PersonalIdDocument, TestUserFixture, format_date, unique_email};
