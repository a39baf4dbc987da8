//! Accepted key spellings for portfolio company fields
//!
//! Content-database exports are inconsistent about key names ("Company name"
//! vs "Company Name" vs "Name"). Each logical field has an ordered alias
//! list; the first alias with a non-empty value wins.

use std::collections::HashMap;

/// Logical fields of a portfolio company record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyField {
    Name,
    Sector,
    Stage,
    Status,
    Revenue,
    InvestedAmount,
    Website,
}

impl CompanyField {
    pub const ALL: [CompanyField; 7] = [
        CompanyField::Name,
        CompanyField::Sector,
        CompanyField::Stage,
        CompanyField::Status,
        CompanyField::Revenue,
        CompanyField::InvestedAmount,
        CompanyField::Website,
    ];

    /// Canonical name used in errors
    pub fn label(self) -> &'static str {
        match self {
            CompanyField::Name => "name",
            CompanyField::Sector => "sector",
            CompanyField::Stage => "stage",
            CompanyField::Status => "status",
            CompanyField::Revenue => "revenue",
            CompanyField::InvestedAmount => "investedAmount",
            CompanyField::Website => "website",
        }
    }

    /// Accepted keys, highest priority first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CompanyField::Name => &["Company name", "Company", "Name", "Title"],
            CompanyField::Sector => &["Sector", "Industry", "Category"],
            CompanyField::Stage => &["Stage", "Funding stage", "Round"],
            CompanyField::Status => &["Status", "Portfolio status"],
            CompanyField::Revenue => &["Revenue", "Annual revenue", "ARR"],
            CompanyField::InvestedAmount => &["Invested", "Investment amount", "Amount invested"],
            CompanyField::Website => &["Website", "URL", "Site"],
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve a field from a raw record.
///
/// Keys compare case-insensitively with whitespace collapsed, so
/// "Company Name" and "company  name" both match the "Company name" alias.
pub fn resolve(record: &HashMap<String, String>, field: CompanyField) -> Option<&str> {
    field.aliases().iter().find_map(|alias| {
        let wanted = normalize_key(alias);
        record
            .iter()
            .find(|(key, value)| normalize_key(key) == wanted && !value.trim().is_empty())
            .map(|(_, value)| value.trim())
    })
}
