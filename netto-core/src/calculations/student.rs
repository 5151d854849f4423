//! Student benefit module: SU grant plus part-time work, the fribeløb
//! earning ceiling, and the repayment rule when it is exceeded.
//!
//! The year's fribeløb is the sum of twelve monthly tier amounts (lowest
//! while drawing SU, middle while enrolled but opted out, highest for
//! enrolled months with no SU entitlement) plus a per-child bonus. The
//! student's egenindkomst (work income after pension and AM-bidrag) is
//! measured against it; every krone above the ceiling is repaid
//! krone-for-krone, capped at the SU actually received, plus interest.
//!
//! Taxation runs on the combined personal income: SU is ordinary taxable
//! income (no AM-bidrag) and shares one personfradrag with the AM-reduced
//! work income. Employment deductions apply to the work portion only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ensure_non_negative};
use crate::models::{Municipality, StudentInput, TaxParameterSet};
use crate::models::{EducationLevel, EnrollmentCalendar, FribeloebTier};

use super::common::{max, round_half_up};
use super::normalize::{PayProfile, normalize_student_work};
use super::tax::TaxCalculator;

/// Outcome of measuring egenindkomst against the annual fribeløb.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use netto_core::calculations::FribeloebClawback;
///
/// let clawback = FribeloebClawback::assess(
///     dec!(327246.00), // egenindkomst
///     dec!(317246.00), // annual fribeløb
///     dec!(89112.00),  // SU received
///     dec!(0.0975),
/// );
///
/// assert!(clawback.over_limit);
/// assert_eq!(clawback.repayment, dec!(10000.00));
/// assert_eq!(clawback.interest, dec!(975.00));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FribeloebClawback {
    pub excess: Decimal,
    /// Krone-for-krone repayment, never more than the SU received.
    pub repayment: Decimal,
    pub interest: Decimal,
    pub over_limit: bool,
}

impl FribeloebClawback {
    pub fn assess(
        egenindkomst_annual: Decimal,
        annual_fribeloeb: Decimal,
        su_received: Decimal,
        interest_rate: Decimal,
    ) -> Self {
        let excess = max(egenindkomst_annual - annual_fribeloeb, Decimal::ZERO);
        let repayment = excess.min(su_received);
        Self {
            excess,
            repayment,
            interest: round_half_up(repayment * interest_rate),
            over_limit: excess > Decimal::ZERO,
        }
    }
}

/// Fully itemized student result: the SU side, the work side, and the
/// combined taxation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAssessment {
    /// SU paid out over the SU months, before tax.
    pub su_received: Decimal,
    /// SU kept after the fribeløb repayment.
    pub su_effective: Decimal,
    pub su_repayment: Decimal,
    pub su_repayment_interest: Decimal,
    pub annual_fribeloeb: Decimal,
    pub fribeloeb_excess: Decimal,
    pub over_fribeloeb: bool,
    pub work_gross_annual: Decimal,
    pub work_feriepenge: Decimal,
    pub work_employee_pension: Decimal,
    pub work_employer_pension: Decimal,
    pub work_total_pension: Decimal,
    pub work_am_basis: Decimal,
    pub work_am_bidrag: Decimal,
    /// Egenindkomst: work income after pension and AM-bidrag.
    pub work_after_am: Decimal,
    pub work_after_am_monthly: Decimal,
    /// Effective SU plus egenindkomst, the combined tax base.
    pub total_personal_income: Decimal,
    pub beskaeftigelsesfradrag: Decimal,
    pub jobfradrag: Decimal,
    pub bundskat: Decimal,
    pub kommuneskat: Decimal,
    pub kirkeskat: Decimal,
    pub mellemskat: Decimal,
    pub topskat: Decimal,
    pub toptopskat: Decimal,
    pub total_income_tax: Decimal,
    pub total_deductions: Decimal,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,
    /// Net contribution of the work feriepenge (difference method).
    pub net_holiday_pay: Decimal,
    pub net_holiday_pay_monthly: Decimal,
}

/// Calculator for student (SU + work) assessments.
#[derive(Debug, Clone)]
pub struct StudentCalculator<'a> {
    params: &'a TaxParameterSet,
    municipality: &'a Municipality,
    is_church: bool,
}

impl<'a> StudentCalculator<'a> {
    pub fn new(
        params: &'a TaxParameterSet,
        municipality: &'a Municipality,
        is_church: bool,
    ) -> Self {
        Self {
            params,
            municipality,
            is_church,
        }
    }

    /// Runs the full student assessment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an inconsistent enrollment calendar
    /// or negative amounts; in-range input always yields a result.
    pub fn calculate(&self, input: &StudentInput) -> Result<StudentAssessment, ValidationError> {
        input.calendar.validate()?;
        ensure_non_negative("su_monthly", input.su_monthly)?;
        let profile = normalize_student_work(input, self.params)?;

        let mut assessment = self.calculate_core(input, &profile);

        if profile.holiday_pay_annual > Decimal::ZERO {
            let mut without = profile.clone();
            without.holiday_pay_annual = Decimal::ZERO;
            let net_without = self.calculate_core(input, &without).net_annual;
            assessment.net_holiday_pay = assessment.net_annual - net_without;
            assessment.net_holiday_pay_monthly =
                round_half_up(assessment.net_holiday_pay / Decimal::from(12u32));
        }

        Ok(assessment)
    }

    fn calculate_core(&self, input: &StudentInput, profile: &PayProfile) -> StudentAssessment {
        let su = &self.params.su;

        // Work side up to the AM stage; student jobs carry no ATP.
        let work_am_basis = max(
            profile.gross_annual + profile.holiday_pay_annual - profile.employee_pension_annual,
            Decimal::ZERO,
        );
        let work_am_bidrag = round_half_up(work_am_basis * self.params.am_rate);
        let work_after_am = work_am_basis - work_am_bidrag;

        // Fribeløb ceiling and clawback.
        let annual_fribeloeb =
            self.annual_fribeloeb(&input.calendar, input.education, input.children_count);
        let su_received = round_half_up(
            input.su_monthly * Decimal::from(u32::from(input.calendar.su_months)),
        );
        let clawback = FribeloebClawback::assess(
            work_after_am,
            annual_fribeloeb,
            su_received,
            su.repayment_interest_rate,
        );
        let su_effective = su_received - clawback.repayment;

        // Combined personal income shares one personfradrag.
        let total_personal = su_effective + work_after_am;

        let tax = TaxCalculator::new(self.params, self.municipality, self.is_church);
        let (beskaeftigelsesfradrag, jobfradrag) = tax.employment_deductions(work_after_am);
        let bundskat = tax.bundskat_on(total_personal);
        let (kommuneskat, kirkeskat) =
            tax.municipal_taxes_on(total_personal, beskaeftigelsesfradrag + jobfradrag);
        let brackets = tax.progressive_taxes_on(total_personal);

        let total_income_tax = bundskat
            + kommuneskat
            + kirkeskat
            + brackets.mellemskat
            + brackets.topskat
            + brackets.toptopskat;
        let total_deductions = work_am_bidrag
            + profile.employee_pension_annual
            + total_income_tax
            + clawback.repayment
            + clawback.interest;
        let net_annual = su_received + profile.gross_annual + profile.holiday_pay_annual
            - total_deductions;

        StudentAssessment {
            su_received,
            su_effective,
            su_repayment: clawback.repayment,
            su_repayment_interest: clawback.interest,
            annual_fribeloeb,
            fribeloeb_excess: clawback.excess,
            over_fribeloeb: clawback.over_limit,
            work_gross_annual: profile.gross_annual,
            work_feriepenge: profile.holiday_pay_annual,
            work_employee_pension: profile.employee_pension_annual,
            work_employer_pension: profile.employer_pension_annual,
            work_total_pension: profile.employee_pension_annual
                + profile.employer_pension_annual,
            work_am_basis,
            work_am_bidrag,
            work_after_am,
            work_after_am_monthly: round_half_up(work_after_am / Decimal::from(12u32)),
            total_personal_income: total_personal,
            beskaeftigelsesfradrag,
            jobfradrag,
            bundskat,
            kommuneskat,
            kirkeskat,
            mellemskat: brackets.mellemskat,
            topskat: brackets.topskat,
            toptopskat: brackets.toptopskat,
            total_income_tax,
            total_deductions,
            net_annual,
            net_monthly: round_half_up(net_annual / Decimal::from(12u32)),
            net_holiday_pay: Decimal::ZERO,
            net_holiday_pay_monthly: Decimal::ZERO,
        }
    }

    /// The year's fribeløb: each enrolled month contributes its tier rate,
    /// plus the per-child bonus.
    pub fn annual_fribeloeb(
        &self,
        calendar: &EnrollmentCalendar,
        education: EducationLevel,
        children_count: u32,
    ) -> Decimal {
        let su = &self.params.su;
        let months = |count: u8| Decimal::from(u32::from(count));

        months(calendar.su_months) * su.fribeloeb_monthly(FribeloebTier::Laveste, education)
            + months(calendar.opted_out_months)
                * su.fribeloeb_monthly(FribeloebTier::Mellemste, education)
            + months(calendar.hoejeste_months())
                * su.fribeloeb_monthly(FribeloebTier::Hoejeste, education)
            + Decimal::from(children_count) * su.fribeloeb_parent_bonus
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::WorkIncome;
    use crate::testutil::{koebenhavn, test_params};

    use super::*;

    fn student_input(work: Vec<WorkIncome>, children_count: u32) -> StudentInput {
        StudentInput {
            su_monthly: dec!(7426),
            work,
            employee_pension_rate: dec!(0),
            employer_pension_rate: dec!(0),
            calendar: EnrollmentCalendar::full_year_on_su(),
            education: EducationLevel::Higher,
            children_count,
        }
    }

    // =========================================================================
    // FribeloebClawback tests
    // =========================================================================

    #[test]
    fn clawback_is_zero_at_or_below_the_limit() {
        let at_limit =
            FribeloebClawback::assess(dec!(317246), dec!(317246), dec!(89112), dec!(0.0975));

        assert!(!at_limit.over_limit);
        assert_eq!(at_limit.excess, dec!(0));
        assert_eq!(at_limit.repayment, dec!(0));
        assert_eq!(at_limit.interest, dec!(0));
    }

    #[test]
    fn clawback_is_krone_for_krone_above_the_limit() {
        let clawback =
            FribeloebClawback::assess(dec!(327246.00), dec!(317246.00), dec!(89112), dec!(0.0975));

        assert!(clawback.over_limit);
        assert_eq!(clawback.excess, dec!(10000.00));
        assert_eq!(clawback.repayment, dec!(10000.00));
        assert_eq!(clawback.interest, dec!(975.00));
    }

    #[test]
    fn clawback_scales_linearly_with_the_excess() {
        let base = dec!(317246);
        for excess in [dec!(1), dec!(2500.50), dec!(60000)] {
            let clawback =
                FribeloebClawback::assess(base + excess, base, dec!(89112), dec!(0.0975));
            assert_eq!(clawback.repayment, excess);
        }
    }

    #[test]
    fn repayment_never_exceeds_su_received() {
        let clawback =
            FribeloebClawback::assess(dec!(500000), dec!(317246), dec!(44556), dec!(0.0975));

        assert_eq!(clawback.excess, dec!(182754));
        assert_eq!(clawback.repayment, dec!(44556));
        assert_eq!(clawback.interest, dec!(4344.21)); // 44556 × 9.75 %
    }

    // =========================================================================
    // annual_fribeloeb tests
    // =========================================================================

    #[test]
    fn full_su_year_with_children() {
        let params = test_params();
        let kbh = koebenhavn();
        let calc = StudentCalculator::new(&params, &kbh, true);

        let fribeloeb = calc.annual_fribeloeb(
            &EnrollmentCalendar::full_year_on_su(),
            EducationLevel::Higher,
            2,
        );

        // 12 × 20 749 + 2 × 34 129
        assert_eq!(fribeloeb, dec!(317246));
    }

    #[test]
    fn partial_year_mixes_the_tiers() {
        let params = test_params();
        let kbh = koebenhavn();
        let calc = StudentCalculator::new(&params, &kbh, true);

        let calendar = EnrollmentCalendar {
            enrolled_months: 10,
            su_months: 6,
            opted_out_months: 2,
        };
        let fribeloeb = calc.annual_fribeloeb(&calendar, EducationLevel::Higher, 0);

        // 6 × 20 749 + 2 × 23 598 + 2 × 45 420
        assert_eq!(fribeloeb, dec!(262530));
    }

    #[test]
    fn youth_education_uses_the_lower_laveste_rate() {
        let params = test_params();
        let kbh = koebenhavn();
        let calc = StudentCalculator::new(&params, &kbh, true);

        let fribeloeb = calc.annual_fribeloeb(
            &EnrollmentCalendar::full_year_on_su(),
            EducationLevel::Youth,
            0,
        );

        assert_eq!(fribeloeb, dec!(183564)); // 12 × 15 297
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn student_over_fribeloeb_repays_the_excess_with_interest() {
        let params = test_params();
        let kbh = koebenhavn();
        // 185 kr/h × 142 h/month lands ~9 000 kr over the two-child limit.
        let input = student_input(
            vec![WorkIncome { hourly_rate: dec!(185), hours_month: dec!(142) }],
            2,
        );

        let a = StudentCalculator::new(&params, &kbh, true)
            .calculate(&input)
            .unwrap();

        assert_eq!(a.work_gross_annual, dec!(315240.00));
        assert_eq!(a.work_feriepenge, dec!(39405.00));
        assert_eq!(a.work_am_bidrag, dec!(28371.60));
        assert_eq!(a.work_after_am, dec!(326273.40));
        assert_eq!(a.annual_fribeloeb, dec!(317246));
        assert!(a.over_fribeloeb);
        assert_eq!(a.fribeloeb_excess, dec!(9027.40));
        assert_eq!(a.su_repayment, dec!(9027.40));
        assert_eq!(a.su_repayment_interest, dec!(880.17));
        assert_eq!(a.su_received, dec!(89112.00));
        assert_eq!(a.su_effective, dec!(80084.60));
        assert_eq!(a.total_personal_income, dec!(406358.00));
        assert_eq!(a.beskaeftigelsesfradrag, dec!(41599.86));
        assert_eq!(a.jobfradrag, dec!(3100.00));
        assert_eq!(a.bundskat, dec!(42306.19));
        assert_eq!(a.kommuneskat, dec!(71937.85));
        assert_eq!(a.kirkeskat, dec!(2460.47));
        assert_eq!(a.mellemskat, dec!(0));
        assert_eq!(a.total_income_tax, dec!(116704.51));
        assert_eq!(a.total_deductions, dec!(154983.68));
        assert_eq!(a.net_annual, dec!(288773.32));
        assert_eq!(a.net_monthly, dec!(24064.44));
    }

    #[test]
    fn student_under_fribeloeb_repays_nothing() {
        let params = test_params();
        let kbh = koebenhavn();
        let input = student_input(
            vec![WorkIncome { hourly_rate: dec!(140), hours_month: dec!(40) }],
            0,
        );

        let a = StudentCalculator::new(&params, &kbh, true)
            .calculate(&input)
            .unwrap();

        assert!(!a.over_fribeloeb);
        assert_eq!(a.work_after_am, dec!(69552.00));
        assert_eq!(a.annual_fribeloeb, dec!(248988)); // 12 × 20 749
        assert_eq!(a.su_repayment, dec!(0));
        assert_eq!(a.su_repayment_interest, dec!(0));
        assert_eq!(a.net_annual, dec!(123706.86));
    }

    #[test]
    fn su_and_work_share_one_personfradrag() {
        let params = test_params();
        let kbh = koebenhavn();
        let input = student_input(
            vec![WorkIncome { hourly_rate: dec!(140), hours_month: dec!(40) }],
            0,
        );

        let a = StudentCalculator::new(&params, &kbh, true)
            .calculate(&input)
            .unwrap();

        // Bundskat runs on the combined base, not per income source:
        // (su_effective + work_after_am − one personfradrag) × 12.01 %.
        let expected = round_half_up(
            (a.su_effective + a.work_after_am - params.personfradrag) * params.bundskat_rate,
        );
        assert_eq!(a.bundskat, expected);
    }

    #[test]
    fn conservation_holds_for_students() {
        let params = test_params();
        let kbh = koebenhavn();
        let calc = StudentCalculator::new(&params, &kbh, true);

        for hours in [dec!(0), dec!(40), dec!(100), dec!(160)] {
            let input = student_input(
                vec![WorkIncome { hourly_rate: dec!(165), hours_month: hours }],
                1,
            );
            let a = calc.calculate(&input).unwrap();

            assert_eq!(
                a.net_annual + a.total_deductions,
                a.su_received + a.work_gross_annual + a.work_feriepenge,
                "conservation failed at {hours} hours"
            );
        }
    }

    #[test]
    fn no_su_months_means_no_repayment_even_over_the_limit() {
        let params = test_params();
        let kbh = koebenhavn();
        let mut input = student_input(
            vec![WorkIncome { hourly_rate: dec!(300), hours_month: dec!(160) }],
            0,
        );
        input.calendar = EnrollmentCalendar {
            enrolled_months: 12,
            su_months: 0,
            opted_out_months: 0,
        };

        let a = StudentCalculator::new(&params, &kbh, true)
            .calculate(&input)
            .unwrap();

        assert_eq!(a.su_received, dec!(0));
        assert_eq!(a.annual_fribeloeb, dec!(545040)); // 12 × 45 420
        assert!(a.over_fribeloeb);
        assert_eq!(a.fribeloeb_excess, dec!(51120.00));
        // Nothing was granted, so nothing can be clawed back.
        assert_eq!(a.su_repayment, dec!(0));
        assert_eq!(a.su_repayment_interest, dec!(0));
    }

    #[test]
    fn student_with_nothing_yields_all_zero() {
        let params = test_params();
        let kbh = koebenhavn();
        let mut input = student_input(vec![], 0);
        input.su_monthly = dec!(0);

        let a = StudentCalculator::new(&params, &kbh, true)
            .calculate(&input)
            .unwrap();

        assert_eq!(a.total_personal_income, dec!(0));
        assert_eq!(a.total_income_tax, dec!(0));
        assert_eq!(a.net_annual, dec!(0));
    }

    #[test]
    fn invalid_calendar_is_rejected_before_computation() {
        let params = test_params();
        let kbh = koebenhavn();
        let mut input = student_input(vec![], 0);
        input.calendar = EnrollmentCalendar {
            enrolled_months: 8,
            su_months: 9,
            opted_out_months: 0,
        };

        let result = StudentCalculator::new(&params, &kbh, true).calculate(&input);

        assert!(matches!(result, Err(ValidationError::MalformedInput(_))));
    }
}
