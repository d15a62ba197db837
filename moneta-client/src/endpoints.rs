//! API paths, relative to the configured base URL.

use moneta_core::TransactionKind;

/// Hosted deployment of the Money Manager backend.
pub const DEFAULT_BASE_URL: &str = "https://moneymanager-qr5f.onrender.com/api/v1.0";

pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const PROFILE: &str = "/profile";
pub const CATEGORIES: &str = "/categories/";
pub const DASHBOARD: &str = "/dashboard/";
pub const FILTER: &str = "/filter/";

/// Paths that must go out without an Authorization header, matched by
/// prefix against the base-URL-relative path.
pub const SKIP_AUTH_PREFIXES: [&str; 5] = ["/login", "/register", "/health", "/activate", "/status"];

/// Whether `path` is on the unauthenticated allow-list.
pub fn skip_auth(path: &str) -> bool {
    SKIP_AUTH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

pub fn categories_by_type(kind: TransactionKind) -> String {
    format!("/categories/{}", kind.as_str())
}

pub fn category_by_id(id: i64) -> String {
    format!("/categories/{id}")
}

/// Collection path for income or expense records (`/incomes/`, `/expenses/`).
pub fn transactions(kind: TransactionKind) -> String {
    format!("/{}s/", kind.as_str())
}

pub fn transaction_by_id(kind: TransactionKind, id: i64) -> String {
    format!("/{}s/{id}", kind.as_str())
}

pub fn excel_download(kind: TransactionKind) -> String {
    format!("/excel/download/{}", kind.as_str())
}

/// Asks the server to email the spreadsheet to the account's address.
pub fn email_excel(kind: TransactionKind) -> String {
    format!("/email/{}/excel", kind.as_str())
}
