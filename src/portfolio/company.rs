//! Portfolio company records resolved from loosely keyed content records

use super::aliases::{resolve, CompanyField};
use crate::error::{ProjectionError, Result};
use crate::sheet::parse_currency;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle status of a portfolio company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyStatus {
    Active,
    Exited,
    WrittenOff,
}

impl CompanyStatus {
    /// Parse a status label. Unknown or missing labels count as active.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "exited" || s == "acquired" || s == "ipo" => CompanyStatus::Exited,
            Some(s) if s == "written off" || s == "written-off" || s == "closed" || s == "defunct" => {
                CompanyStatus::WrittenOff
            }
            _ => CompanyStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CompanyStatus::Active)
    }
}

/// A portfolio company with every field resolved to one canonical key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioCompany {
    pub name: String,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub status: CompanyStatus,
    pub revenue: f64,
    pub invested_amount: f64,
    pub website: Option<String>,
}

impl PortfolioCompany {
    /// Resolve a raw record. `index` identifies the record in errors.
    pub fn from_record(record: &HashMap<String, String>, index: usize) -> Result<Self> {
        let name = resolve(record, CompanyField::Name).ok_or(ProjectionError::MissingField {
            field: CompanyField::Name.label(),
            record: index,
        })?;

        let text = |field| resolve(record, field).map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            sector: text(CompanyField::Sector),
            stage: text(CompanyField::Stage),
            status: CompanyStatus::from_label(resolve(record, CompanyField::Status)),
            revenue: resolve(record, CompanyField::Revenue).map(parse_currency).unwrap_or(0.0),
            invested_amount: resolve(record, CompanyField::InvestedAmount)
                .map(parse_currency)
                .unwrap_or(0.0),
            website: text(CompanyField::Website),
        })
    }
}

/// Portfolio-wide aggregates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub company_count: usize,
    pub active_count: usize,
    pub total_revenue: f64,
    pub total_invested: f64,
    /// Revenue of active companies over their count, with at least one assumed
    pub avg_revenue_per_active_company: f64,
}

impl PortfolioSummary {
    pub fn from_companies(companies: &[PortfolioCompany]) -> Self {
        let active: Vec<&PortfolioCompany> = companies.iter().filter(|c| c.status.is_active()).collect();
        let active_revenue: f64 = active.iter().map(|c| c.revenue).sum();

        Self {
            company_count: companies.len(),
            active_count: active.len(),
            total_revenue: companies.iter().map(|c| c.revenue).sum(),
            total_invested: companies.iter().map(|c| c.invested_amount).sum(),
            avg_revenue_per_active_company: active_revenue / active.len().max(1) as f64,
        }
    }
}
