//! Portfolio company records from the content database

mod aliases;
mod company;

pub use aliases::{resolve, CompanyField};
pub use company::{CompanyStatus, PortfolioCompany, PortfolioSummary};

use crate::error::{ProjectionError, Result};
use csv::Reader;
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Load portfolio companies from a CSV export with a header row
pub fn load_companies_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PortfolioCompany>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let companies = load_companies_from_reader(file)?;
    info!("loaded {} portfolio companies from {}", companies.len(), path.display());
    Ok(companies)
}

/// Load portfolio companies from any reader.
///
/// Records that cannot be resolved (no name under any alias) are logged and
/// skipped. Malformed CSV still fails the load.
pub fn load_companies_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PortfolioCompany>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut companies = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let record: HashMap<String, String> = result?;
        match PortfolioCompany::from_record(&record, index) {
            Ok(company) => companies.push(company),
            Err(e) => warn!("skipping portfolio record: {}", e),
        }
    }

    Ok(companies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mixed_headers() {
        let csv = "\
Company Name,Industry,Annual revenue,Status
Acme,Fintech,\"$2,000,000\",Active
Beta,Health,\"$500,000\",Acquired
";
        let companies = load_companies_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[0].revenue, 2_000_000.0);
        assert_eq!(companies[1].status, CompanyStatus::Exited);

        let summary = PortfolioSummary::from_companies(&companies);
        assert_eq!(summary.active_count, 1);
        assert_eq!(summary.avg_revenue_per_active_company, 2_000_000.0);
    }

    #[test]
    fn test_row_without_name_is_skipped() {
        let csv = "Name,Revenue\nAcme,100\n,200\nBeta,300\n";
        let companies = load_companies_from_reader(csv.as_bytes()).unwrap();
        let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta"]);
        assert_eq!(PortfolioSummary::from_companies(&companies).total_revenue, 400.0);
    }

    #[test]
    fn test_malformed_csv_still_fails() {
        let csv = "Name,Revenue\nAcme,100,extra\n";
        let err = load_companies_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectionError::Csv(_)));
    }
}
