use analytics::{
    CalculatedMetrics, MetricsEngine, RoundedMetrics, UnitRentLine, amortization_schedule,
    down_payment, round_half_away, unit_rent_breakdown,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, MetricRange, SortKey, load_config};
use core_types::{DownPaymentType, MortgageParams, Property};
use rust_decimal::Decimal;
use screener::{FinancingOverrides, MetricFilters, Screener, resolve_financing};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Rentwise listing analysis tool.
fn main() -> Result<()> {
    // Load RENTWISE__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Metrics(args) => handle_metrics(args, &config),
        Commands::Schedule(args) => handle_schedule(args, &config),
        Commands::Screen(args) => handle_screen(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Investment metrics for rental property listings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (defaults to ./rentwise.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full metrics bundle and rent breakdown for one listing.
    Metrics(MetricsArgs),
    /// Print the yearly amortization schedule for one listing's mortgage.
    Schedule(ScheduleArgs),
    /// Filter and rank a set of listings.
    Screen(ScreenArgs),
}

/// Financing terms that override a listing's saved defaults.
#[derive(Args, Default)]
struct FinancingArgs {
    /// Annual mortgage rate in percent (e.g. 5.5).
    #[arg(long)]
    rate: Option<f64>,

    /// Amortization period in years.
    #[arg(long)]
    years: Option<u32>,

    /// How --down is interpreted: "percent" or "fixed".
    #[arg(long)]
    down_type: Option<DownPaymentType>,

    /// Down payment, as a percentage or a currency amount.
    #[arg(long)]
    down: Option<f64>,
}

impl FinancingArgs {
    fn overrides(&self) -> FinancingOverrides {
        FinancingOverrides {
            mortgage_rate: self.rate,
            amortization_period: self.years,
            down_payment_type: self.down_type,
            down_payment_value: self.down,
        }
    }
}

#[derive(Parser)]
struct MetricsArgs {
    /// JSON file holding a single listing.
    #[arg(long, short)]
    input: PathBuf,

    #[command(flatten)]
    financing: FinancingArgs,

    /// Expected first-year appreciation in currency, folded into the full-year ROI.
    #[arg(long, default_value_t = 0.0)]
    appreciation: f64,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ScheduleArgs {
    /// JSON file holding a single listing.
    #[arg(long, short)]
    input: PathBuf,

    #[command(flatten)]
    financing: FinancingArgs,
}

#[derive(Parser)]
struct ScreenArgs {
    /// JSON file holding an array of listings.
    #[arg(long, short)]
    input: PathBuf,

    #[command(flatten)]
    financing: FinancingArgs,

    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    /// Monthly cash flow bounds.
    #[arg(long, allow_hyphen_values = true)]
    min_cash_flow: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_cash_flow: Option<f64>,
    /// Cash-on-cash ROI bounds, in percent.
    #[arg(long, allow_hyphen_values = true)]
    min_roi: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_roi: Option<f64>,
    /// Cap rate bounds, in percent.
    #[arg(long, allow_hyphen_values = true)]
    min_cap_rate: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_cap_rate: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    min_dscr: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_dscr: Option<f64>,

    /// Ordering of the results (defaults to the configured sort).
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Show at most this many results.
    #[arg(long)]
    limit: Option<usize>,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl ScreenArgs {
    fn filters(&self) -> MetricFilters {
        MetricFilters {
            price: MetricRange::new(self.min_price, self.max_price),
            cash_flow: MetricRange::new(self.min_cash_flow, self.max_cash_flow),
            roi: MetricRange::new(self.min_roi, self.max_roi),
            cap_rate: MetricRange::new(self.min_cap_rate, self.max_cap_rate),
            dscr: MetricRange::new(self.min_dscr, self.max_dscr),
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

#[derive(Serialize)]
struct MetricsOutput<'a> {
    property_id: &'a str,
    params: MortgageParams,
    metrics: RoundedMetrics,
    units: Vec<UnitRentLine>,
}

#[derive(Serialize)]
struct ScreenRow<'a> {
    property_id: &'a str,
    title: &'a str,
    purchase_price: f64,
    params: MortgageParams,
    metrics: CalculatedMetrics,
}

/// Handles the `metrics` command.
fn handle_metrics(args: MetricsArgs, config: &Config) -> Result<()> {
    let property: Property = read_json(&args.input)?;
    warn_if_invalid(&property);

    let params = resolve_financing(&property, &args.financing.overrides(), &config.financing);
    let metrics = MetricsEngine::new().compute_metrics_with_appreciation(
        &property.financials,
        &params,
        args.appreciation,
    );
    let rounded = metrics.rounded().with_context(|| {
        format!("Metrics for '{}' are not finite; check its financing terms", property.id)
    })?;
    let units = unit_rent_breakdown(&property.financials.units);

    if args.json {
        let output = MetricsOutput {
            property_id: &property.id,
            params,
            metrics: rounded,
            units,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} ({})", property.title, property.id);
    println!(
        "Financing: {}% over {} years, {} down ({})",
        params.mortgage_rate,
        params.amortization_period,
        params.down_payment_value,
        params.down_payment_type
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    for (label, value) in [
        ("Total rent (monthly)", money(rounded.total_rent)),
        ("Operating expenses (monthly)", money(rounded.total_expenses)),
        ("Rent (annual)", money(rounded.annual_rent)),
        ("Operating expenses (annual)", money(rounded.annual_operating_expenses)),
        ("Net operating income (annual)", money(rounded.net_operating_income)),
        ("Down payment", money(rounded.down_payment_amount)),
        ("Loan amount", money(rounded.loan_amount)),
        ("Mortgage payment (monthly)", money(rounded.monthly_payment)),
        ("Debt service (annual)", money(rounded.annual_debt_service)),
        ("Cash flow (monthly)", money(rounded.monthly_cash_flow)),
        ("Cash flow (annual)", money(rounded.annual_cash_flow)),
        ("Cash-on-cash ROI", percent(rounded.roi)),
        ("Cap rate", percent(rounded.cap_rate)),
        ("DSCR", rounded.debt_service_ratio.to_string()),
        ("Principal paydown (year 1)", money(rounded.yearly_principal_paydown)),
        ("Full-year ROI", percent(rounded.full_yearly_roi)),
    ] {
        table.add_row(vec![label.to_string(), value]);
    }
    println!("{table}");

    if !units.is_empty() {
        let mut unit_table = Table::new();
        unit_table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Unit", "Status", "Category", "Rent"]);
        for line in &units {
            let rent = format_f64(line.effective_rent);
            let rent = if line.is_projected { format!("{rent} (projected)") } else { rent };
            unit_table.add_row(vec![
                line.unit_type.to_string(),
                line.vacancy_status.to_string(),
                line.rent_category.to_string(),
                rent,
            ]);
        }
        println!("{unit_table}");
    }

    Ok(())
}

/// Handles the `schedule` command.
fn handle_schedule(args: ScheduleArgs, config: &Config) -> Result<()> {
    let property: Property = read_json(&args.input)?;
    warn_if_invalid(&property);

    let params = resolve_financing(&property, &args.financing.overrides(), &config.financing);
    let loan = params.purchase_price
        - down_payment(
            params.purchase_price,
            params.down_payment_type,
            params.down_payment_value,
        );
    let rows = amortization_schedule(loan, params.mortgage_rate, params.amortization_period)
        .with_context(|| format!("Cannot build a schedule for '{}'", property.id))?;

    println!(
        "{}: {} borrowed at {}% over {} years",
        property.id,
        format_f64(loan),
        params.mortgage_rate,
        params.amortization_period
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Year", "Principal", "Interest", "Ending balance"]);
    for row in rows {
        table.add_row(vec![
            row.year.to_string(),
            format_f64(row.principal_paid),
            format_f64(row.interest_paid),
            format_f64(row.ending_balance.max(0.0)),
        ]);
    }
    println!("{table}");

    Ok(())
}

/// Handles the `screen` command.
fn handle_screen(args: ScreenArgs, config: &Config) -> Result<()> {
    let properties: Vec<Property> = read_json(&args.input)?;
    for property in &properties {
        warn_if_invalid(property);
    }

    let defaults = MetricFilters::from_settings(&config.screening);
    let screener = Screener::new(config)
        .with_filters(args.filters().or(defaults))
        .with_sort(args.sort.unwrap_or(config.screening.sort_by));

    let matches = screener
        .screen(&properties, &args.financing.overrides())
        .context("Screening failed")?;
    let shown = args.limit.unwrap_or(matches.len()).min(matches.len());

    if args.json {
        let rows: Vec<ScreenRow<'_>> = matches[..shown]
            .iter()
            .map(|m| ScreenRow {
                property_id: &m.property.id,
                title: &m.property.title,
                purchase_price: m.property.financials.purchase_price,
                params: m.params,
                metrics: m.metrics,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} of {} listings match", matches.len(), properties.len());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Listing",
        "Price",
        "Cash flow/mo",
        "ROI",
        "Cap rate",
        "DSCR",
    ]);
    for m in &matches[..shown] {
        let card = m.metrics.card_summary();
        table.add_row(vec![
            format!("{} ({})", m.property.title, m.property.id),
            format_f64(m.property.financials.purchase_price),
            format_f64(card.monthly_cash_flow),
            format!("{}%", format_f64(card.roi)),
            format!("{}%", format_f64(card.cap_rate)),
            format!("{:.4}", m.metrics.debt_service_ratio),
        ]);
    }
    println!("{table}");

    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Listings are still evaluated when they fail form validation; the numbers
/// just may not mean much.
fn warn_if_invalid(property: &Property) {
    if let Err(e) = property.validate() {
        tracing::warn!(property = %property.id, error = %e, "listing failed validation");
    }
}

fn money(value: Decimal) -> String {
    format!("${value:.2}")
}

fn percent(value: Decimal) -> String {
    format!("{value:.2}%")
}

/// Two-decimal display for raw engine values; non-finite values print as-is.
fn format_f64(value: f64) -> String {
    match round_half_away(value, 2) {
        Some(d) => format!("{d:.2}"),
        None => value.to_string(),
    }
}
