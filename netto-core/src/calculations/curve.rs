//! Curve generator: drives the normalizer and the calculators across a grid
//! of gross incomes or monthly hours to produce chart series.
//!
//! Every point is an independent computation against the shared read-only
//! parameter set, so the grid fans out across worker threads; the finished
//! series is re-sorted by ascending x before being returned, since clients
//! expect a monotonic axis. Amounts are rounded to whole kroner and rates to
//! two decimals here, at the presentation boundary.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ensure_non_negative};
use crate::models::{
    EmploymentInput, GrossPay, Municipality, PayAdjustments, StudentInput, TaxParameterSet,
    WorkIncome,
};

use super::common::{round_half_up, round_kroner};
use super::normalize::{PayProfile, normalize};
use super::student::StudentCalculator;
use super::tax::TaxCalculator;

/// One point of a net-vs-gross series. Whole kroner, rate in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub gross_monthly: Decimal,
    pub net_monthly: Decimal,
    pub effective_rate: Decimal,
}

/// One point of a net-vs-hours series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursCurvePoint {
    pub hours_month: Decimal,
    pub gross_monthly: Decimal,
    pub net_monthly: Decimal,
    pub effective_rate: Decimal,
}

/// The bracket thresholds as chart annotation lines. These are parameter
/// constants, exposed once alongside the metadata rather than recomputed
/// per curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMarkers {
    pub mellemskat_annual: Decimal,
    pub mellemskat_monthly: Decimal,
    pub topskat_annual: Decimal,
    pub topskat_monthly: Decimal,
    pub toptopskat_annual: Decimal,
    pub toptopskat_monthly: Decimal,
}

impl BracketMarkers {
    pub fn from_params(params: &TaxParameterSet) -> Self {
        let monthly = |annual: Decimal| round_kroner(annual / Decimal::from(12u32));
        Self {
            mellemskat_annual: params.mellemskat_threshold,
            mellemskat_monthly: monthly(params.mellemskat_threshold),
            topskat_annual: params.topskat_threshold,
            topskat_monthly: monthly(params.topskat_threshold),
            toptopskat_annual: params.toptopskat_threshold,
            toptopskat_monthly: monthly(params.toptopskat_threshold),
        }
    }
}

/// Everything that stays fixed across a gross-income grid.
#[derive(Debug, Clone)]
pub struct CurveBaseline<'a> {
    pub params: &'a TaxParameterSet,
    pub municipality: &'a Municipality,
    pub is_church: bool,
    /// Hourly semantics: feriepenge holiday pay, ATP only by explicit
    /// override (the tier table needs hours, which a gross grid lacks).
    pub is_hourly: bool,
    pub adjustments: PayAdjustments,
}

/// Net income as a function of gross income.
///
/// The grid runs from `min_gross_annual` to `max_gross_annual` in steps of
/// `step_monthly × 12`. A zero step degenerates to the single point at
/// `min_gross_annual`, identical to the direct single computation.
pub fn gross_curve(
    baseline: &CurveBaseline<'_>,
    min_gross_annual: Decimal,
    max_gross_annual: Decimal,
    step_monthly: Decimal,
) -> Result<Vec<CurvePoint>, ValidationError> {
    ensure_non_negative("min_gross", min_gross_annual)?;
    ensure_non_negative("max_gross", max_gross_annual)?;
    ensure_non_negative("step_monthly", step_monthly)?;
    if min_gross_annual > max_gross_annual {
        return Err(ValidationError::MalformedInput(format!(
            "min_gross {min_gross_annual} exceeds max_gross {max_gross_annual}"
        )));
    }

    let mut grid = Vec::new();
    if step_monthly.is_zero() {
        grid.push(min_gross_annual);
    } else {
        let step_annual = step_monthly * Decimal::from(12u32);
        let mut gross = min_gross_annual;
        while gross <= max_gross_annual {
            grid.push(gross);
            gross += step_annual;
        }
    }

    let calculator =
        TaxCalculator::new(baseline.params, baseline.municipality, baseline.is_church);
    let mut points = grid
        .into_par_iter()
        .map(|gross| {
            let profile = profile_for_gross(baseline, gross)?;
            let assessment = calculator.calculate(&profile);
            Ok(CurvePoint {
                gross_monthly: round_kroner(gross / Decimal::from(12u32)),
                net_monthly: round_kroner(assessment.net_annual / Decimal::from(12u32)),
                effective_rate: assessment.effective_tax_rate,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    points.sort_by(|a, b| a.gross_monthly.cmp(&b.gross_monthly));
    Ok(points)
}

/// Net income as a function of monthly hours at a fixed hourly rate.
pub fn hours_curve(
    params: &TaxParameterSet,
    municipality: &Municipality,
    is_church: bool,
    hourly_rate: Decimal,
    adjustments: &PayAdjustments,
    max_hours: u32,
    step_hours: u32,
) -> Result<Vec<HoursCurvePoint>, ValidationError> {
    ensure_non_negative("hourly_rate", hourly_rate)?;
    if step_hours == 0 {
        return Err(ValidationError::MalformedInput(
            "step_hours must be positive".to_string(),
        ));
    }

    let calculator = TaxCalculator::new(params, municipality, is_church);
    let grid: Vec<u32> = (0..=max_hours).step_by(step_hours as usize).collect();
    let mut points = grid
        .into_par_iter()
        .map(|hours| {
            let hours_month = Decimal::from(hours);
            let input = EmploymentInput::Hourly {
                hourly_rate,
                hours_month,
                adjustments: adjustments.clone(),
            };
            let profile = normalize(&input, params)?;
            let assessment = calculator.calculate(&profile);
            Ok(HoursCurvePoint {
                hours_month,
                gross_monthly: round_kroner(hourly_rate * hours_month),
                net_monthly: round_kroner(assessment.net_annual / Decimal::from(12u32)),
                effective_rate: assessment.effective_tax_rate,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    points.sort_by(|a, b| a.hours_month.cmp(&b.hours_month));
    Ok(points)
}

/// Net income as a function of monthly hours for a student, holding the SU
/// side of the baseline fixed.
pub fn student_hours_curve(
    params: &TaxParameterSet,
    municipality: &Municipality,
    is_church: bool,
    baseline: &StudentInput,
    hourly_rate: Decimal,
    max_hours: u32,
    step_hours: u32,
) -> Result<Vec<HoursCurvePoint>, ValidationError> {
    ensure_non_negative("hourly_rate", hourly_rate)?;
    if step_hours == 0 {
        return Err(ValidationError::MalformedInput(
            "step_hours must be positive".to_string(),
        ));
    }

    let calculator = StudentCalculator::new(params, municipality, is_church);
    let grid: Vec<u32> = (0..=max_hours).step_by(step_hours as usize).collect();
    let mut points = grid
        .into_par_iter()
        .map(|hours| {
            let hours_month = Decimal::from(hours);
            let input = StudentInput {
                work: vec![WorkIncome { hourly_rate, hours_month }],
                ..baseline.clone()
            };
            let assessment = calculator.calculate(&input)?;
            let inflows = assessment.su_received
                + assessment.work_gross_annual
                + assessment.work_feriepenge;
            let effective_rate = if inflows > Decimal::ZERO {
                round_half_up(assessment.total_deductions / inflows * Decimal::from(100u32))
            } else {
                Decimal::ZERO
            };
            Ok(HoursCurvePoint {
                hours_month,
                gross_monthly: round_kroner(hourly_rate * hours_month),
                net_monthly: round_kroner(assessment.net_annual / Decimal::from(12u32)),
                effective_rate,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    points.sort_by(|a, b| a.hours_month.cmp(&b.hours_month));
    Ok(points)
}

/// Synthesizes the pay profile for one gross-grid point. The salaried path
/// goes through the normalizer unchanged; the hourly path patches in the
/// hourly holiday-pay rate and override-only ATP.
fn profile_for_gross(
    baseline: &CurveBaseline<'_>,
    gross_annual: Decimal,
) -> Result<PayProfile, ValidationError> {
    let input = EmploymentInput::FullTime {
        gross: GrossPay::Annual(gross_annual),
        adjustments: baseline.adjustments.clone(),
    };
    let mut profile = normalize(&input, baseline.params)?;
    if baseline.is_hourly {
        profile.holiday_pay_annual =
            round_half_up(gross_annual * baseline.params.feriepenge_rate);
        let atp_monthly = baseline
            .adjustments
            .atp_monthly_override
            .unwrap_or(Decimal::ZERO);
        profile.atp_annual = round_half_up(atp_monthly * Decimal::from(12u32));
    }
    Ok(profile)
}
