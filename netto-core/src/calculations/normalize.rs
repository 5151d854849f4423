//! Income normalizer: translates each employment regime's raw inputs into
//! the common annual pay profile consumed by the bracket tax calculator.
//!
//! This is the single point where regime differences are resolved:
//!
//! - salaried full-time gets 1 % ferietillæg and the full-time ATP amount;
//! - hourly work gets 12.5 % feriepenge (the larger holiday-pay rate instead
//!   of ferietillæg, never both) and ATP from the weekly-hours tier table;
//! - student jobs aggregate into one gross with feriepenge and no ATP.
//!
//! Validation happens here, before any computation: negative rates, hours,
//! or amounts fail fast and nothing is ever silently clamped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ValidationError, ensure_fraction, ensure_non_negative};
use crate::models::{EmploymentInput, GrossPay, PayAdjustments, StudentInput, TaxParameterSet};

use super::common::round_half_up;

/// Average weeks per month, used to derive weekly hours from monthly hours
/// for the ATP tier lookup.
fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

fn months() -> Decimal {
    Decimal::from(12u32)
}

/// The normalized, regime-agnostic intermediate form: everything annual,
/// everything in DKK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayProfile {
    pub gross_annual: Decimal,
    pub holiday_pay_annual: Decimal,
    pub employee_pension_annual: Decimal,
    /// Employer pension on top; reported but never taxed.
    pub employer_pension_annual: Decimal,
    pub atp_annual: Decimal,
    pub other_pay_annual: Decimal,
    pub taxable_benefits_annual: Decimal,
    pub pretax_deductions_annual: Decimal,
    pub aftertax_deductions_annual: Decimal,
    /// Carried through for the commuting deduction stage.
    pub transport_km_daily: Decimal,
    /// Carried through for the union-fee deduction stage.
    pub union_fees_annual: Decimal,
}

/// Normalizes an employment input into the common pay profile.
///
/// # Errors
///
/// Returns [`ValidationError`] for negative amounts or hours, or pension
/// rates outside `[0, 1]`.
pub fn normalize(
    input: &EmploymentInput,
    params: &TaxParameterSet,
) -> Result<PayProfile, ValidationError> {
    match input {
        EmploymentInput::FullTime { gross, adjustments } => {
            let gross_annual = match *gross {
                GrossPay::Annual(amount) => {
                    ensure_non_negative("gross_annual", amount)?;
                    amount
                }
                GrossPay::Monthly(amount) => {
                    ensure_non_negative("gross_monthly", amount)?;
                    amount * months()
                }
            };
            let atp_monthly = adjustments
                .atp_monthly_override
                .unwrap_or(params.atp.fulltime_monthly);
            build_profile(
                gross_annual,
                params.ferietillaeg_rate,
                atp_monthly,
                adjustments,
            )
        }
        EmploymentInput::Hourly {
            hourly_rate,
            hours_month,
            adjustments,
        } => {
            ensure_non_negative("hourly_rate", *hourly_rate)?;
            ensure_non_negative("hours_month", *hours_month)?;
            let gross_monthly = round_half_up(*hourly_rate * *hours_month);
            let gross_annual = gross_monthly * months();
            let atp_monthly = resolve_hourly_atp(*hours_month, adjustments, params);
            build_profile(
                gross_annual,
                params.feriepenge_rate,
                atp_monthly,
                adjustments,
            )
        }
    }
}

/// Aggregates a student's jobs into one hourly-style pay profile:
/// feriepenge holiday pay, the student's pension rates, no ATP.
pub fn normalize_student_work(
    input: &StudentInput,
    params: &TaxParameterSet,
) -> Result<PayProfile, ValidationError> {
    ensure_fraction("employee_pension_rate", input.employee_pension_rate)?;
    ensure_fraction("employer_pension_rate", input.employer_pension_rate)?;

    let mut gross_monthly = Decimal::ZERO;
    for job in &input.work {
        ensure_non_negative("hourly_rate", job.hourly_rate)?;
        ensure_non_negative("hours_month", job.hours_month)?;
        gross_monthly += round_half_up(job.hourly_rate * job.hours_month);
    }
    let gross_annual = gross_monthly * months();

    let adjustments = PayAdjustments {
        employee_pension_rate: input.employee_pension_rate,
        employer_pension_rate: input.employer_pension_rate,
        ..PayAdjustments::default()
    };
    build_profile(gross_annual, params.feriepenge_rate, Decimal::ZERO, &adjustments)
}

/// Resolves the default monthly ATP for hourly work from weekly hours,
/// unless an explicit override is given.
fn resolve_hourly_atp(
    hours_month: Decimal,
    adjustments: &PayAdjustments,
    params: &TaxParameterSet,
) -> Decimal {
    if let Some(explicit) = adjustments.atp_monthly_override {
        return explicit;
    }
    let weekly_hours = hours_month / weeks_per_month();
    let monthly = params.atp.monthly_for_weekly_hours(weekly_hours);
    if monthly.is_zero() && hours_month > Decimal::ZERO {
        debug!(%hours_month, %weekly_hours, "weekly hours below the ATP bands; no ATP contribution");
    }
    monthly
}

fn build_profile(
    gross_annual: Decimal,
    holiday_rate: Decimal,
    atp_monthly: Decimal,
    adjustments: &PayAdjustments,
) -> Result<PayProfile, ValidationError> {
    ensure_fraction("employee_pension_rate", adjustments.employee_pension_rate)?;
    ensure_fraction("employer_pension_rate", adjustments.employer_pension_rate)?;
    ensure_non_negative("other_pay_annual", adjustments.other_pay_annual)?;
    ensure_non_negative("taxable_benefits_annual", adjustments.taxable_benefits_annual)?;
    ensure_non_negative("pretax_deductions_annual", adjustments.pretax_deductions_annual)?;
    ensure_non_negative(
        "aftertax_deductions_annual",
        adjustments.aftertax_deductions_annual,
    )?;
    ensure_non_negative("transport_km_daily", adjustments.transport_km_daily)?;
    ensure_non_negative("union_fees_annual", adjustments.union_fees_annual)?;
    ensure_non_negative("atp_monthly", atp_monthly)?;

    // Pension applies to base salary only, not holiday pay or benefits.
    Ok(PayProfile {
        gross_annual,
        holiday_pay_annual: round_half_up(gross_annual * holiday_rate),
        employee_pension_annual: round_half_up(gross_annual * adjustments.employee_pension_rate),
        employer_pension_annual: round_half_up(gross_annual * adjustments.employer_pension_rate),
        atp_annual: round_half_up(atp_monthly * months()),
        other_pay_annual: adjustments.other_pay_annual,
        taxable_benefits_annual: adjustments.taxable_benefits_annual,
        pretax_deductions_annual: adjustments.pretax_deductions_annual,
        aftertax_deductions_annual: adjustments.aftertax_deductions_annual,
        transport_km_daily: adjustments.transport_km_daily,
        union_fees_annual: adjustments.union_fees_annual,
    })
}
