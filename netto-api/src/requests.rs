//! Request DTOs with the documented defaults.
//!
//! Percentages are plain numbers (`4` = 4 %), amounts are DKK, and monthly
//! amounts are normalized to annual at the service boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use netto_core::EducationLevel;

fn default_kommune() -> String {
    "København".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fulltime_pension_pct() -> Decimal {
    Decimal::from(4u32)
}

fn default_fulltime_employer_pension_pct() -> Decimal {
    Decimal::from(8u32)
}

fn default_su_monthly() -> Decimal {
    Decimal::from(7426u32)
}

fn default_max_gross() -> Decimal {
    Decimal::from(1_200_000u32)
}

fn default_max_hours() -> u32 {
    220
}

fn default_step_hours() -> u32 {
    5
}

fn default_twelve_months() -> u8 {
    12
}

/// Optional pay fields shared by the employment-style requests. Serialized
/// flat into the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayExtras {
    /// Extra monthly cash pay (broadband, allowances, ...).
    #[serde(default)]
    pub other_pay_monthly: Decimal,
    /// Monthly taxable non-cash benefits.
    #[serde(default)]
    pub taxable_benefits_monthly: Decimal,
    /// Monthly pre-tax employer deductions.
    #[serde(default)]
    pub pretax_deductions_monthly: Decimal,
    /// Monthly after-tax deductions.
    #[serde(default)]
    pub aftertax_deductions_monthly: Decimal,
    /// Round-trip daily commute in km.
    #[serde(default)]
    pub transport_km: Decimal,
    /// Annual trade union + a-kasse fees.
    #[serde(default)]
    pub union_fees_annual: Decimal,
    /// Monthly ATP contribution; omit to use the default for the regime
    /// (full-time amount, or the weekly-hours tier for hourly work).
    #[serde(default)]
    pub atp_monthly: Option<Decimal>,
}

/// Full-time salary calculation request. Supply exactly one of
/// `gross_annual` and `gross_monthly`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTimeRequest {
    #[serde(default)]
    pub gross_annual: Option<Decimal>,
    #[serde(default)]
    pub gross_monthly: Option<Decimal>,
    #[serde(default = "default_kommune")]
    pub kommune: String,
    /// Employee pension % (typically 0–15).
    #[serde(default = "default_fulltime_pension_pct")]
    pub pension_pct: Decimal,
    /// Employer pension % on top (typically 0–20).
    #[serde(default = "default_fulltime_employer_pension_pct")]
    pub employer_pension_pct: Decimal,
    /// Member of Folkekirken?
    #[serde(default = "default_true")]
    pub is_church: bool,
    #[serde(flatten)]
    pub extras: PayExtras,
}

/// Part-time / hourly calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTimeRequest {
    /// Hourly rate in DKK.
    pub hourly_rate: Decimal,
    /// Hours worked per month.
    pub hours_month: Decimal,
    #[serde(default = "default_kommune")]
    pub kommune: String,
    #[serde(default)]
    pub pension_pct: Decimal,
    #[serde(default)]
    pub employer_pension_pct: Decimal,
    #[serde(default = "default_true")]
    pub is_church: bool,
    #[serde(flatten)]
    pub extras: PayExtras,
}

/// One student job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkIncomeRequest {
    pub hourly_rate: Decimal,
    pub hours_month: Decimal,
}

/// Education category selecting the lowest fribeløb rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationRequest {
    /// Videregående uddannelse.
    #[default]
    Higher,
    /// Ungdomsuddannelse.
    Youth,
}

impl From<EducationRequest> for EducationLevel {
    fn from(value: EducationRequest) -> Self {
        match value {
            EducationRequest::Higher => EducationLevel::Higher,
            EducationRequest::Youth => EducationLevel::Youth,
        }
    }
}

/// Student (SU + work) calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequest {
    /// Monthly SU before tax.
    #[serde(default = "default_su_monthly")]
    pub su_monthly: Decimal,
    /// The student's jobs; aggregated before computation.
    #[serde(default)]
    pub work: Vec<WorkIncomeRequest>,
    #[serde(default = "default_kommune")]
    pub kommune: String,
    #[serde(default)]
    pub pension_pct: Decimal,
    #[serde(default)]
    pub employer_pension_pct: Decimal,
    #[serde(default = "default_true")]
    pub is_church: bool,
    /// Months enrolled this year.
    #[serde(default = "default_twelve_months")]
    pub enrolled_months: u8,
    /// Months SU was received.
    #[serde(default = "default_twelve_months")]
    pub su_months: u8,
    /// Months enrolled but opted out of SU.
    #[serde(default)]
    pub opted_out_months: u8,
    /// Children under 18.
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub education: EducationRequest,
}

/// Net-vs-gross curve request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveRequest {
    #[serde(default = "default_kommune")]
    pub kommune: String,
    #[serde(default = "default_fulltime_pension_pct")]
    pub pension_pct: Decimal,
    #[serde(default = "default_fulltime_employer_pension_pct")]
    pub employer_pension_pct: Decimal,
    #[serde(default = "default_true")]
    pub is_church: bool,
    /// Hourly semantics: feriepenge holiday pay instead of ferietillæg.
    #[serde(default)]
    pub is_hourly: bool,
    #[serde(flatten)]
    pub extras: PayExtras,
    /// Annual gross the grid starts at.
    #[serde(default)]
    pub min_gross: Decimal,
    /// Annual gross the grid stops at.
    #[serde(default = "default_max_gross")]
    pub max_gross: Decimal,
    /// Monthly step between points; 0 yields the single point at min_gross.
    #[serde(default)]
    pub step_monthly: Decimal,
}

/// Net-vs-hours curve request for hourly work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursCurveRequest {
    pub hourly_rate: Decimal,
    #[serde(default = "default_kommune")]
    pub kommune: String,
    #[serde(default)]
    pub pension_pct: Decimal,
    #[serde(default)]
    pub employer_pension_pct: Decimal,
    #[serde(default = "default_true")]
    pub is_church: bool,
    #[serde(flatten)]
    pub extras: PayExtras,
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
    #[serde(default = "default_step_hours")]
    pub step_hours: u32,
}

/// Net-vs-hours curve request for a student baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentHoursCurveRequest {
    /// Student hourly wage in DKK.
    pub hourly_rate: Decimal,
    #[serde(default = "default_su_monthly")]
    pub su_monthly: Decimal,
    #[serde(default = "default_kommune")]
    pub kommune: String,
    #[serde(default)]
    pub pension_pct: Decimal,
    #[serde(default)]
    pub employer_pension_pct: Decimal,
    #[serde(default = "default_true")]
    pub is_church: bool,
    #[serde(default = "default_twelve_months")]
    pub enrolled_months: u8,
    #[serde(default = "default_twelve_months")]
    pub su_months: u8,
    #[serde(default)]
    pub opted_out_months: u8,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub education: EducationRequest,
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
    #[serde(default = "default_step_hours")]
    pub step_hours: u32,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn fulltime_request_fills_the_documented_defaults() {
        let req: FullTimeRequest =
            serde_json::from_str(r#"{ "gross_annual": 504000 }"#).expect("deserialize");

        assert_eq!(req.gross_annual, Some(dec!(504000)));
        assert_eq!(req.kommune, "København");
        assert_eq!(req.pension_pct, dec!(4));
        assert_eq!(req.employer_pension_pct, dec!(8));
        assert!(req.is_church);
        assert_eq!(req.extras.atp_monthly, None);
        assert_eq!(req.extras.transport_km, dec!(0));
    }

    #[test]
    fn extras_deserialize_flat() {
        let req: PartTimeRequest = serde_json::from_str(
            r#"{ "hourly_rate": 180, "hours_month": 80, "union_fees_annual": 5400, "atp_monthly": 31.55 }"#,
        )
        .expect("deserialize");

        assert_eq!(req.extras.union_fees_annual, dec!(5400));
        assert_eq!(req.extras.atp_monthly, Some(dec!(31.55)));
        assert!(!req.kommune.is_empty());
    }

    #[test]
    fn student_request_defaults_to_a_full_su_year() {
        let req: StudentRequest = serde_json::from_str(
            r#"{ "work": [{ "hourly_rate": 140, "hours_month": 40 }] }"#,
        )
        .expect("deserialize");

        assert_eq!(req.su_monthly, dec!(7426));
        assert_eq!(req.enrolled_months, 12);
        assert_eq!(req.su_months, 12);
        assert_eq!(req.opted_out_months, 0);
        assert_eq!(req.education, EducationRequest::Higher);
    }

    #[test]
    fn education_uses_snake_case_tags() {
        let req: StudentRequest = serde_json::from_str(
            r#"{ "work": [], "education": "youth" }"#,
        )
        .expect("deserialize");

        assert_eq!(req.education, EducationRequest::Youth);
    }

    #[test]
    fn curve_request_defaults_mirror_the_fulltime_baseline() {
        let req: CurveRequest = serde_json::from_str("{}").expect("deserialize");

        assert_eq!(req.min_gross, dec!(0));
        assert_eq!(req.max_gross, dec!(1200000));
        assert_eq!(req.step_monthly, dec!(0));
        assert!(!req.is_hourly);
    }
}
