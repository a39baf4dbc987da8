//! Column-to-field layout of the fund projection spreadsheet
//!
//! This is the single place that knows which spreadsheet column holds which
//! figure. Normalizers look fields up through these tables instead of
//! indexing rows directly.
//!
//! Yearly projection range (one row per year):
//!
//! | Column | Field                   | Kind       |
//! |--------|-------------------------|------------|
//! | A      | year                    | count      |
//! | B      | revenue                 | currency   |
//! | C      | profit                  | currency   |
//! | D      | distribution            | currency   |
//! | E      | cumulative distribution | currency   |
//! | F      | profit-share percentage | percentage |
//! | G      | equity value            | currency   |
//! | H      | total value             | currency   |
//!
//! Fund metrics row:
//!
//! | Column | Field                     | Kind       |
//! |--------|---------------------------|------------|
//! | B      | total invested            | currency   |
//! | C      | total distributions       | currency   |
//! | D      | total portfolio value     | currency   |
//! | E      | TVPI                      | currency   |
//! | F      | IRR                       | percentage |
//! | G      | capital returned          | percentage |
//! | K      | active companies          | count      |
//! | S      | total portfolio revenue   | currency   |

/// How a cell is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Count,
    Currency,
    Percentage,
}

/// One column of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding<F> {
    /// Spreadsheet column letter(s)
    pub column: &'static str,
    pub field: F,
    pub kind: CellKind,
}

/// Fields of a yearly projection row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearField {
    Year,
    Revenue,
    Profit,
    Distribution,
    CumulativeDistribution,
    ProfitSharePercentage,
    EquityValue,
    TotalValue,
}

/// Fields of the fund metrics row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundField {
    TotalInvested,
    TotalDistributions,
    PortfolioValue,
    Tvpi,
    Irr,
    CapitalReturned,
    ActiveCompanies,
    PortfolioRevenue,
}

const fn bind<F>(column: &'static str, field: F, kind: CellKind) -> ColumnBinding<F> {
    ColumnBinding { column, field, kind }
}

pub const YEAR_ROW_LAYOUT: [ColumnBinding<YearField>; 8] = [
    bind("A", YearField::Year, CellKind::Count),
    bind("B", YearField::Revenue, CellKind::Currency),
    bind("C", YearField::Profit, CellKind::Currency),
    bind("D", YearField::Distribution, CellKind::Currency),
    bind("E", YearField::CumulativeDistribution, CellKind::Currency),
    bind("F", YearField::ProfitSharePercentage, CellKind::Percentage),
    bind("G", YearField::EquityValue, CellKind::Currency),
    bind("H", YearField::TotalValue, CellKind::Currency),
];

pub const FUND_METRICS_LAYOUT: [ColumnBinding<FundField>; 8] = [
    bind("B", FundField::TotalInvested, CellKind::Currency),
    bind("C", FundField::TotalDistributions, CellKind::Currency),
    bind("D", FundField::PortfolioValue, CellKind::Currency),
    bind("E", FundField::Tvpi, CellKind::Currency),
    bind("F", FundField::Irr, CellKind::Percentage),
    bind("G", FundField::CapitalReturned, CellKind::Percentage),
    bind("K", FundField::ActiveCompanies, CellKind::Count),
    bind("S", FundField::PortfolioRevenue, CellKind::Currency),
];

/// Zero-based index of a column letter: `A` is 0, `Z` is 25, `AA` is 26.
/// Returns `None` for anything that is not ASCII letters.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut index = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1)
}

/// Cell text under a column letter; missing cells read as empty
pub fn cell<'a, S: AsRef<str>>(row: &'a [S], column: &str) -> &'a str {
    column_index(column)
        .and_then(|i| row.get(i))
        .map(|s| s.as_ref())
        .unwrap_or("")
}

/// Binding for a field in a layout
pub fn binding_for<F: PartialEq + Copy>(layout: &[ColumnBinding<F>], field: F) -> Option<ColumnBinding<F>> {
    layout.iter().find(|b| b.field == field).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("k"), Some(10));
        assert_eq!(column_index("S"), Some(18));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("AZ"), Some(51));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn test_cell_lookup() {
        let row = vec!["2027", "$1,000"];
        assert_eq!(cell(&row, "A"), "2027");
        assert_eq!(cell(&row, "B"), "$1,000");
        assert_eq!(cell(&row, "K"), "");
    }

    #[test]
    fn test_layouts_have_unique_columns_and_fields() {
        let columns: HashSet<_> = YEAR_ROW_LAYOUT.iter().map(|b| b.column).collect();
        let fields: HashSet<_> = YEAR_ROW_LAYOUT.iter().map(|b| b.field).collect();
        assert_eq!(columns.len(), YEAR_ROW_LAYOUT.len());
        assert_eq!(fields.len(), YEAR_ROW_LAYOUT.len());

        let columns: HashSet<_> = FUND_METRICS_LAYOUT.iter().map(|b| b.column).collect();
        let fields: HashSet<_> = FUND_METRICS_LAYOUT.iter().map(|b| b.field).collect();
        assert_eq!(columns.len(), FUND_METRICS_LAYOUT.len());
        assert_eq!(fields.len(), FUND_METRICS_LAYOUT.len());
    }

    #[test]
    fn test_documented_positions() {
        let active = binding_for(&FUND_METRICS_LAYOUT, FundField::ActiveCompanies).unwrap();
        assert_eq!(active.column, "K");
        assert_eq!(active.kind, CellKind::Count);

        let revenue = binding_for(&FUND_METRICS_LAYOUT, FundField::PortfolioRevenue).unwrap();
        assert_eq!(column_index(revenue.column), Some(18));

        let pct = binding_for(&YEAR_ROW_LAYOUT, YearField::ProfitSharePercentage).unwrap();
        assert_eq!(pct.kind, CellKind::Percentage);
    }
}
