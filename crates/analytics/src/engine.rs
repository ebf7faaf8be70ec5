use crate::breakdown::effective_rent;
use crate::report::CalculatedMetrics;
use core_types::{DownPaymentType, MortgageParams, OperatingExpenses, PropertyFinancials, RentUnit};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Cash put down at closing.
///
/// No clamping: a percentage above 100 or a negative value flows straight through.
pub fn down_payment(purchase_price: f64, kind: DownPaymentType, value: f64) -> f64 {
    match kind {
        DownPaymentType::Percent => purchase_price * value / 100.0,
        DownPaymentType::Fixed => value,
    }
}

/// Level monthly payment on a fixed-rate, fully amortizing loan.
///
/// A zero rate falls back to straight-line repayment. Nothing else is guarded:
/// a zero-year term yields a non-finite payment.
pub fn monthly_mortgage_payment(principal: f64, annual_rate_pct: f64, years: u32) -> f64 {
    let n = f64::from(years) * MONTHS_PER_YEAR;
    if annual_rate_pct == 0.0 {
        return principal / n;
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let growth = (1.0 + monthly_rate).powf(n);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Monthly rent across the rent roll; vacant units count at their projected rent.
pub fn total_monthly_rent(units: &[RentUnit]) -> f64 {
    units.iter().map(effective_rent).sum()
}

/// Sum of the nine expense lines. The inputs are annual, and so is the result.
pub fn total_operating_expenses(expenses: &OperatingExpenses) -> f64 {
    expenses.property_taxes
        + expenses.insurance
        + expenses.hydro
        + expenses.gas
        + expenses.water
        + expenses.waste_management
        + expenses.maintenance
        + expenses.management_fees
        + expenses.miscellaneous
}

/// Principal repaid over the first twelve months of the loan.
///
/// Simulates the schedule month by month; with a zero rate the paydown is the
/// straight-line `loan / years`.
pub fn yearly_principal_paydown(
    loan_amount: f64,
    annual_rate_pct: f64,
    years: u32,
    monthly_payment: f64,
) -> f64 {
    if annual_rate_pct == 0.0 {
        return loan_amount / f64::from(years);
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let mut balance = loan_amount;
    let mut paydown = 0.0;
    for _ in 0..12 {
        let (principal, _interest) = amortize_month(balance, monthly_payment, monthly_rate);
        paydown += principal;
        balance -= principal;
    }
    paydown
}

/// Total first-year return on the down payment: cash flow, principal paydown and
/// appreciation, in percent. Zero when nothing was put down.
pub fn full_yearly_roi(
    annual_cash_flow: f64,
    yearly_principal_paydown: f64,
    appreciation: f64,
    down_payment_amount: f64,
) -> f64 {
    if down_payment_amount > 0.0 {
        (annual_cash_flow + yearly_principal_paydown + appreciation) / down_payment_amount * 100.0
    } else {
        0.0
    }
}

pub(crate) fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / MONTHS_PER_YEAR
}

/// Splits one payment into its (principal, interest) parts for the given opening balance.
pub(crate) fn amortize_month(balance: f64, payment: f64, monthly_rate: f64) -> (f64, f64) {
    let interest = balance * monthly_rate;
    (payment - interest, interest)
}

/// The intermediate figures shared by the full bundle and the cash-flow-only path.
///
/// Both paths read their cash flow from here, so they agree bit for bit.
#[derive(Debug, Clone, Copy)]
struct CashFlowCore {
    total_rent: f64,
    annual_operating_expenses: f64,
    down_payment_amount: f64,
    loan_amount: f64,
    monthly_payment: f64,
    annual_rent: f64,
    annual_debt_service: f64,
    net_operating_income: f64,
    annual_cash_flow: f64,
}

impl CashFlowCore {
    fn compute(property: &PropertyFinancials, params: &MortgageParams) -> Self {
        let total_rent = total_monthly_rent(&property.units);
        let annual_operating_expenses = total_operating_expenses(&property.expenses);

        let down_payment_amount = down_payment(
            params.purchase_price,
            params.down_payment_type,
            params.down_payment_value,
        );
        let loan_amount = params.purchase_price - down_payment_amount;
        let monthly_payment =
            monthly_mortgage_payment(loan_amount, params.mortgage_rate, params.amortization_period);

        let annual_rent = total_rent * MONTHS_PER_YEAR;
        let annual_debt_service = monthly_payment * MONTHS_PER_YEAR;
        let net_operating_income = annual_rent - annual_operating_expenses;
        let annual_cash_flow = net_operating_income - annual_debt_service;

        Self {
            total_rent,
            annual_operating_expenses,
            down_payment_amount,
            loan_amount,
            monthly_payment,
            annual_rent,
            annual_debt_service,
            net_operating_income,
            annual_cash_flow,
        }
    }

    fn monthly_cash_flow(&self) -> f64 {
        self.annual_cash_flow / MONTHS_PER_YEAR
    }
}

/// A stateless calculator for deriving investment metrics from a property's
/// rent roll, operating expenses and financing assumptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating investment metrics.
    ///
    /// # Arguments
    ///
    /// * `property` - The rent roll, purchase price and annual operating expenses.
    /// * `params` - The financing assumptions to price the mortgage with.
    ///
    /// # Returns
    ///
    /// The full `CalculatedMetrics` bundle. Appreciation is taken as zero.
    pub fn compute_metrics(
        &self,
        property: &PropertyFinancials,
        params: &MortgageParams,
    ) -> CalculatedMetrics {
        self.compute_metrics_with_appreciation(property, params, 0.0)
    }

    /// Same as `compute_metrics`, with an explicit first-year appreciation amount
    /// folded into `full_yearly_roi`.
    pub fn compute_metrics_with_appreciation(
        &self,
        property: &PropertyFinancials,
        params: &MortgageParams,
        appreciation: f64,
    ) -> CalculatedMetrics {
        let core = CashFlowCore::compute(property, params);
        let mut report = CalculatedMetrics::new();

        self.fill_income(&core, &mut report);
        self.fill_financing(&core, &mut report);
        self.fill_returns(property, params, &core, appreciation, &mut report);

        report
    }

    /// Monthly cash flow alone, for re-filtering a list while search sliders move.
    ///
    /// Always equal to `compute_metrics(..).monthly_cash_flow` for the same inputs.
    pub fn dynamic_cash_flow(&self, property: &PropertyFinancials, params: &MortgageParams) -> f64 {
        CashFlowCore::compute(property, params).monthly_cash_flow()
    }

    fn fill_income(&self, core: &CashFlowCore, report: &mut CalculatedMetrics) {
        report.total_rent = core.total_rent;
        report.annual_rent = core.annual_rent;
        report.annual_operating_expenses = core.annual_operating_expenses;
        report.total_expenses = core.annual_operating_expenses / MONTHS_PER_YEAR;
        report.net_operating_income = core.net_operating_income;
    }

    fn fill_financing(&self, core: &CashFlowCore, report: &mut CalculatedMetrics) {
        report.down_payment_amount = core.down_payment_amount;
        report.loan_amount = core.loan_amount;
        report.monthly_payment = core.monthly_payment;
        report.annual_debt_service = core.annual_debt_service;
        report.annual_cash_flow = core.annual_cash_flow;
        report.monthly_cash_flow = core.monthly_cash_flow();
    }

    fn fill_returns(
        &self,
        property: &PropertyFinancials,
        params: &MortgageParams,
        core: &CashFlowCore,
        appreciation: f64,
        report: &mut CalculatedMetrics,
    ) {
        // Cap rate is a property yield, so it is taken against the listing price.
        if property.purchase_price > 0.0 {
            report.cap_rate = core.net_operating_income / property.purchase_price * 100.0;
        }

        if core.down_payment_amount > 0.0 {
            report.roi = core.annual_cash_flow / core.down_payment_amount * 100.0;
        }

        if core.annual_debt_service > 0.0 {
            report.debt_service_ratio = core.net_operating_income / core.annual_debt_service;
        }

        report.yearly_principal_paydown = yearly_principal_paydown(
            core.loan_amount,
            params.mortgage_rate,
            params.amortization_period,
            core.monthly_payment,
        );
        report.full_yearly_roi = full_yearly_roi(
            core.annual_cash_flow,
            report.yearly_principal_paydown,
            appreciation,
            core.down_payment_amount,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{UnitType, VacancyStatus};

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected} (±{tolerance}), got {actual}"
        );
    }

    fn params(rate: f64, kind: DownPaymentType, value: f64) -> MortgageParams {
        MortgageParams {
            purchase_price: 500_000.0,
            mortgage_rate: rate,
            amortization_period: 25,
            down_payment_type: kind,
            down_payment_value: value,
        }
    }

    fn duplex() -> PropertyFinancials {
        PropertyFinancials {
            purchase_price: 500_000.0,
            units: vec![
                RentUnit::occupied(UnitType::TwoBedroom, 2_000.0),
                RentUnit::vacant(UnitType::OneBedroom, 900.0, Some(1_400.0)),
            ],
            expenses: OperatingExpenses {
                property_taxes: 5_000.0,
                insurance: 1_400.0,
                maintenance: 2_000.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn percent_down_payment_scales_price() {
        assert_eq!(down_payment(500_000.0, DownPaymentType::Percent, 20.0), 100_000.0);
    }

    #[test]
    fn fixed_down_payment_is_taken_verbatim() {
        assert_eq!(down_payment(500_000.0, DownPaymentType::Fixed, 75_000.0), 75_000.0);
    }

    #[test]
    fn down_payment_is_not_clamped() {
        assert_eq!(down_payment(200_000.0, DownPaymentType::Percent, 150.0), 300_000.0);
        assert_eq!(down_payment(200_000.0, DownPaymentType::Percent, -10.0), -20_000.0);
    }

    #[test]
    fn zero_rate_payment_is_straight_line() {
        assert_eq!(monthly_mortgage_payment(300_000.0, 0.0, 25), 1_000.0);
    }

    #[test]
    fn zero_year_term_is_not_guarded() {
        assert!(!monthly_mortgage_payment(100_000.0, 5.0, 0).is_finite());
        assert!(!monthly_mortgage_payment(100_000.0, 0.0, 0).is_finite());
    }

    #[test]
    fn rent_roll_substitutes_projected_rent_for_vacant_units() {
        let mut vacant_without_projection = RentUnit::occupied(UnitType::Other, 700.0);
        vacant_without_projection.vacancy_status = VacancyStatus::Vacant;

        let units = vec![
            RentUnit::occupied(UnitType::Bachelor, 1_000.0),
            RentUnit::vacant(UnitType::Bachelor, 1_000.0, Some(1_500.0)),
            vacant_without_projection,
        ];
        assert_eq!(total_monthly_rent(&units), 2_500.0);
        assert_eq!(total_monthly_rent(&[]), 0.0);
    }

    #[test]
    fn operating_expenses_stay_annual() {
        let expenses = duplex().expenses;
        assert_eq!(total_operating_expenses(&expenses), 8_400.0);
    }

    #[test]
    fn monthly_expenses_are_the_annual_total_over_twelve() {
        let metrics = MetricsEngine::new().compute_metrics(
            &duplex(),
            &params(5.0, DownPaymentType::Percent, 20.0),
        );
        assert_eq!(metrics.annual_operating_expenses, 8_400.0);
        assert_eq!(metrics.total_expenses, 700.0);
    }

    #[test]
    fn zero_rate_paydown_is_loan_over_years() {
        assert_eq!(yearly_principal_paydown(250_000.0, 0.0, 25, 833.33), 10_000.0);
    }

    #[test]
    fn full_roi_includes_paydown_and_appreciation() {
        assert_close(full_yearly_roi(-1_000.0, 6_000.0, 5_000.0, 100_000.0), 10.0, 1e-12);
        assert_eq!(full_yearly_roi(10_000.0, 6_000.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn appreciation_only_moves_full_yearly_roi() {
        let engine = MetricsEngine::new();
        let p = params(5.0, DownPaymentType::Percent, 20.0);
        let base = engine.compute_metrics(&duplex(), &p);
        let appreciated = engine.compute_metrics_with_appreciation(&duplex(), &p, 10_000.0);

        assert_eq!(base.roi, appreciated.roi);
        assert_eq!(base.monthly_cash_flow, appreciated.monthly_cash_flow);
        assert_close(appreciated.full_yearly_roi - base.full_yearly_roi, 10.0, 1e-9);
    }

    #[test]
    fn zero_down_payment_zeroes_both_roi_figures() {
        let metrics = MetricsEngine::new().compute_metrics(
            &duplex(),
            &params(5.0, DownPaymentType::Fixed, 0.0),
        );
        assert_eq!(metrics.roi, 0.0);
        assert_eq!(metrics.full_yearly_roi, 0.0);
        assert_eq!(metrics.loan_amount, 500_000.0);
    }

    #[test]
    fn fully_paid_purchase_has_zero_dscr() {
        let metrics = MetricsEngine::new().compute_metrics(
            &duplex(),
            &params(5.0, DownPaymentType::Percent, 100.0),
        );
        assert_eq!(metrics.annual_debt_service, 0.0);
        assert_eq!(metrics.debt_service_ratio, 0.0);
    }

    #[test]
    fn cap_rate_is_zero_without_a_price() {
        let mut property = duplex();
        property.purchase_price = 0.0;
        let metrics = MetricsEngine::new().compute_metrics(
            &property,
            &params(5.0, DownPaymentType::Percent, 20.0),
        );
        assert_eq!(metrics.cap_rate, 0.0);
    }

    #[test]
    fn negative_noi_gives_negative_dscr() {
        let mut property = duplex();
        property.expenses.miscellaneous = 100_000.0;
        let metrics = MetricsEngine::new().compute_metrics(
            &property,
            &params(5.0, DownPaymentType::Percent, 20.0),
        );
        assert!(metrics.net_operating_income < 0.0);
        assert!(metrics.debt_service_ratio < 0.0);
    }

    #[test]
    fn dynamic_cash_flow_matches_full_bundle() {
        let engine = MetricsEngine::new();
        for (rate, kind, value) in [
            (5.0, DownPaymentType::Percent, 20.0),
            (0.0, DownPaymentType::Fixed, 50_000.0),
            (7.25, DownPaymentType::Percent, 0.0),
        ] {
            let p = params(rate, kind, value);
            assert_eq!(
                engine.dynamic_cash_flow(&duplex(), &p),
                engine.compute_metrics(&duplex(), &p).monthly_cash_flow
            );
        }
    }
}
