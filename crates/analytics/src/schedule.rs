use crate::engine::{amortize_month, monthly_mortgage_payment, monthly_rate};
use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Totals for one year of a loan's life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    /// 1-based year of the loan.
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub ending_balance: f64,
}

/// Year-by-year amortization over the full term.
///
/// Uses the same monthly simulation as `yearly_principal_paydown`, so the first
/// row's `principal_paid` is that function's result.
pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
) -> Result<Vec<AmortizationYear>, AnalyticsError> {
    if years == 0 {
        return Err(AnalyticsError::InvalidTerm(years));
    }

    if annual_rate_pct == 0.0 {
        let per_year = principal / f64::from(years);
        return Ok((1..=years)
            .map(|year| AmortizationYear {
                year,
                principal_paid: per_year,
                interest_paid: 0.0,
                ending_balance: principal - per_year * f64::from(year),
            })
            .collect());
    }

    let payment = monthly_mortgage_payment(principal, annual_rate_pct, years);
    let monthly_rate = monthly_rate(annual_rate_pct);

    let mut balance = principal;
    let mut rows = Vec::with_capacity(years as usize);
    for year in 1..=years {
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;
        for _ in 0..12 {
            let (principal_part, interest) = amortize_month(balance, payment, monthly_rate);
            principal_paid += principal_part;
            interest_paid += interest;
            balance -= principal_part;
        }
        rows.push(AmortizationYear {
            year,
            principal_paid,
            interest_paid,
            ending_balance: balance,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::yearly_principal_paydown;

    #[test]
    fn first_year_matches_yearly_paydown() {
        let rows = amortization_schedule(400_000.0, 5.0, 25).unwrap();
        let payment = monthly_mortgage_payment(400_000.0, 5.0, 25);

        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0].principal_paid, yearly_principal_paydown(400_000.0, 5.0, 25, payment));
    }

    #[test]
    fn schedule_retires_the_loan() {
        let rows = amortization_schedule(400_000.0, 5.0, 25).unwrap();

        let last = rows.last().unwrap();
        assert!(last.ending_balance.abs() < 1e-4, "residual balance {}", last.ending_balance);

        let principal: f64 = rows.iter().map(|r| r.principal_paid).sum();
        assert!((principal - 400_000.0).abs() < 1e-4);

        // Principal share grows and interest share shrinks every year.
        for pair in rows.windows(2) {
            assert!(pair[1].principal_paid > pair[0].principal_paid);
            assert!(pair[1].interest_paid < pair[0].interest_paid);
        }
    }

    #[test]
    fn zero_rate_schedule_is_straight_line() {
        let rows = amortization_schedule(100_000.0, 0.0, 4).unwrap();

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.principal_paid == 25_000.0 && r.interest_paid == 0.0));
        assert_eq!(rows[3].ending_balance, 0.0);
    }

    #[test]
    fn zero_term_is_rejected() {
        assert_eq!(amortization_schedule(100_000.0, 5.0, 0), Err(AnalyticsError::InvalidTerm(0)));
    }
}
