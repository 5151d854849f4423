use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::EducationLevel;

/// Gross pay basis for a salaried position. Monthly amounts are normalized
/// to annual by ×12 before any calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrossPay {
    Annual(Decimal),
    Monthly(Decimal),
}

/// Optional pay components shared by every employment regime.
///
/// Pension rates are fractions of base salary. Plan-sane bounds (a pension
/// percentage is typically 0–20 %) are the caller's responsibility: the
/// engine rejects values outside `[0, 1]` but does not clamp within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayAdjustments {
    /// Employee pension, deducted from gross before tax.
    pub employee_pension_rate: Decimal,
    /// Employer pension on top of gross, never taxed.
    pub employer_pension_rate: Decimal,
    /// Extra cash pay (allowances, broadband, ...), annual.
    pub other_pay_annual: Decimal,
    /// Taxable non-cash benefits (free phone, health insurance, ...), annual.
    pub taxable_benefits_annual: Decimal,
    /// Employer deductions taken from pay before tax, annual.
    pub pretax_deductions_annual: Decimal,
    /// Deductions taken after tax (canteen, clubs, ...), annual.
    pub aftertax_deductions_annual: Decimal,
    /// Round-trip home-work distance per day in km.
    pub transport_km_daily: Decimal,
    /// Annual trade union + a-kasse fees.
    pub union_fees_annual: Decimal,
    /// Explicit monthly ATP contribution; `None` resolves the default from
    /// the weekly-hours tier table (full-time always uses the full amount).
    pub atp_monthly_override: Option<Decimal>,
}

impl Default for PayAdjustments {
    fn default() -> Self {
        Self {
            employee_pension_rate: Decimal::ZERO,
            employer_pension_rate: Decimal::ZERO,
            other_pay_annual: Decimal::ZERO,
            taxable_benefits_annual: Decimal::ZERO,
            pretax_deductions_annual: Decimal::ZERO,
            aftertax_deductions_annual: Decimal::ZERO,
            transport_km_daily: Decimal::ZERO,
            union_fees_annual: Decimal::ZERO,
            atp_monthly_override: None,
        }
    }
}

/// Employment regime, discriminated at the type level. The normalizer is the
/// single place that translates a variant into the common pay profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentInput {
    /// Salaried full-time position: 1 % ferietillæg, full-time ATP.
    FullTime {
        gross: GrossPay,
        adjustments: PayAdjustments,
    },
    /// Hourly position: 12.5 % feriepenge, ATP from the weekly-hours table.
    Hourly {
        hourly_rate: Decimal,
        hours_month: Decimal,
        adjustments: PayAdjustments,
    },
}

/// One student job, hourly rate × monthly hours. Multiple jobs are summed
/// into a single aggregate gross before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkIncome {
    pub hourly_rate: Decimal,
    pub hours_month: Decimal,
}

/// How the student's year splits across fribeløb tiers.
///
/// Months outside `enrolled_months` are outside the fribeløb system
/// altogether; this is an explicit input, never derived from the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCalendar {
    /// Months enrolled in an education this year (≤ 12).
    pub enrolled_months: u8,
    /// Months SU was actually received.
    pub su_months: u8,
    /// Months enrolled but opted out of SU.
    pub opted_out_months: u8,
}

impl EnrollmentCalendar {
    /// A full calendar year drawing SU every month.
    pub fn full_year_on_su() -> Self {
        Self {
            enrolled_months: 12,
            su_months: 12,
            opted_out_months: 0,
        }
    }

    /// Enrolled months that fall in the highest fribeløb tier.
    pub fn hoejeste_months(&self) -> u8 {
        let claimed = u16::from(self.su_months) + u16::from(self.opted_out_months);
        u16::from(self.enrolled_months).saturating_sub(claimed) as u8
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enrolled_months > 12 {
            return Err(ValidationError::MalformedInput(format!(
                "enrolled_months must be at most 12, got {}",
                self.enrolled_months
            )));
        }
        if u16::from(self.su_months) + u16::from(self.opted_out_months)
            > u16::from(self.enrolled_months)
        {
            return Err(ValidationError::MalformedInput(format!(
                "su_months ({}) + opted_out_months ({}) exceed enrolled_months ({})",
                self.su_months, self.opted_out_months, self.enrolled_months
            )));
        }
        Ok(())
    }
}

/// Student request: SU grant plus any number of part-time jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    /// Monthly SU before tax, for the months it is received.
    pub su_monthly: Decimal,
    pub work: Vec<WorkIncome>,
    /// Employee pension on work income, fraction (usually zero).
    pub employee_pension_rate: Decimal,
    /// Employer pension on top, fraction.
    pub employer_pension_rate: Decimal,
    pub calendar: EnrollmentCalendar,
    pub education: EducationLevel,
    /// Children under 18, each raising the annual fribeløb.
    pub children_count: u32,
}
