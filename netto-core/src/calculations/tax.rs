//! Bracket tax calculator: one tax year's full assessment for a normalized
//! pay profile.
//!
//! The calculation runs on annual amounts, in this order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total gross: salary + holiday pay + other cash pay − pre-tax deductions + taxable benefits |
//! | 2    | AM-basis: total gross − employee pension − ATP |
//! | 3    | AM-bidrag (8 %); income after AM is the base for everything below |
//! | 4    | Beskæftigelsesfradrag (12.75 %, capped) and jobfradrag (4.50 %, capped) |
//! | 5    | Ligningsmæssige fradrag: befordringsfradrag + capped union fees |
//! | 6    | Bundskat on income after AM above personfradrag |
//! | 7    | Kommuneskat and kirkeskat on the fradrag-reduced base |
//! | 8    | Mellemskat/topskat/toptopskat on income after AM, ceiling-capped |
//! | 9    | Totals, net annual/monthly, effective rate |
//!
//! The skatteloft ceiling caps the combined marginal rate (bundskat +
//! kommuneskat + kirkeskat for members + progressive brackets): the
//! effective bracket rates are clamped in ascending order so the excess is
//! taken out of the highest applicable brackets first, and no bracket tax
//! ever goes negative.
//!
//! Each named component is rounded to øre as it is produced, and the totals
//! are sums of the rounded components, so the itemized lines always add up
//! exactly: `net_annual = gross + holiday pay + other pay − total deductions
//! − after-tax deductions`.
//!
//! Validation happens in the normalizer; `calculate` itself is total. A
//! zero profile yields an all-zero breakdown, never an error.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use netto_core::calculations::{TaxCalculator, normalize};
//! use netto_core::{EmploymentInput, GrossPay, Municipality, PayAdjustments};
//! # use netto_core::{AtpSchedule, AtpTier, BefordringParameters, SuParameters, TaxParameterSet};
//! # fn params_2026() -> TaxParameterSet {
//! #     TaxParameterSet {
//! #         tax_year: 2026,
//! #         am_rate: dec!(0.08),
//! #         personfradrag: dec!(54100),
//! #         bundskat_rate: dec!(0.1201),
//! #         mellemskat_threshold: dec!(641200),
//! #         mellemskat_rate: dec!(0.075),
//! #         topskat_threshold: dec!(777900),
//! #         topskat_rate: dec!(0.075),
//! #         toptopskat_threshold: dec!(2592700),
//! #         toptopskat_rate: dec!(0.05),
//! #         skatteloft: dec!(0.4457),
//! #         beskaeftigelsesfradrag_rate: dec!(0.1275),
//! #         beskaeftigelsesfradrag_max: dec!(63300),
//! #         jobfradrag_rate: dec!(0.045),
//! #         jobfradrag_max: dec!(3100),
//! #         ferietillaeg_rate: dec!(0.01),
//! #         feriepenge_rate: dec!(0.125),
//! #         fagforening_max: dec!(7000),
//! #         dkk_per_eur: dec!(7.45),
//! #         atp: AtpSchedule {
//! #             fulltime_monthly: dec!(94.65),
//! #             tiers: vec![
//! #                 AtpTier { min_weekly_hours: dec!(0), monthly_amount: dec!(0) },
//! #                 AtpTier { min_weekly_hours: dec!(9), monthly_amount: dec!(0) },
//! #                 AtpTier { min_weekly_hours: dec!(18), monthly_amount: dec!(31.55) },
//! #                 AtpTier { min_weekly_hours: dec!(27), monthly_amount: dec!(63.10) },
//! #                 AtpTier { min_weekly_hours: dec!(37), monthly_amount: dec!(94.65) },
//! #             ],
//! #         },
//! #         su: SuParameters {
//! #             udeboende_monthly: dec!(7426),
//! #             hjemmeboende_base_monthly: dec!(1154),
//! #             hjemmeboende_max_monthly: dec!(3797),
//! #             fribeloeb_laveste_higher: dec!(20749),
//! #             fribeloeb_laveste_youth: dec!(15297),
//! #             fribeloeb_mellemste: dec!(23598),
//! #             fribeloeb_hoejeste: dec!(45420),
//! #             fribeloeb_parent_bonus: dec!(34129),
//! #             repayment_interest_rate: dec!(0.0975),
//! #         },
//! #         befordring: BefordringParameters {
//! #             min_round_trip_km: dec!(24),
//! #             cutoff_round_trip_km: dec!(120),
//! #             rate_below_cutoff: dec!(1.98),
//! #             rate_above_cutoff: dec!(0.99),
//! #             work_days_per_year: 218,
//! #         },
//! #     }
//! # }
//!
//! let params = params_2026();
//! let koebenhavn = Municipality {
//!     name: "København".to_string(),
//!     kommuneskat: dec!(0.2339),
//!     kirkeskat: dec!(0.0080),
//! };
//!
//! let input = EmploymentInput::FullTime {
//!     gross: GrossPay::Annual(dec!(504000)),
//!     adjustments: PayAdjustments {
//!         employee_pension_rate: dec!(0.04),
//!         employer_pension_rate: dec!(0.08),
//!         ..PayAdjustments::default()
//!     },
//! };
//! let profile = normalize(&input, &params).unwrap();
//!
//! let assessment = TaxCalculator::new(&params, &koebenhavn, true).calculate(&profile);
//!
//! assert_eq!(assessment.am_bidrag, dec!(39019.54));
//! assert_eq!(assessment.net_annual, dec!(320460.10));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Municipality, TaxParameterSet};

use super::common::{max, round_half_up};
use super::normalize::PayProfile;

/// Fully itemized assessment for one year. Every intermediate the pipeline
/// produces is reported; the totals are exact sums of the line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub gross_annual: Decimal,
    pub holiday_pay: Decimal,
    pub other_pay: Decimal,
    pub taxable_benefits: Decimal,
    pub pretax_deductions: Decimal,
    pub aftertax_deductions: Decimal,
    /// Taxable gross: cash pay plus taxable benefits, after pre-tax deductions.
    pub total_gross: Decimal,
    pub employee_pension: Decimal,
    pub employer_pension: Decimal,
    pub total_pension: Decimal,
    pub atp_annual: Decimal,
    pub am_basis: Decimal,
    pub am_bidrag: Decimal,
    /// The base for every income-tax bracket below.
    pub income_after_am: Decimal,
    pub beskaeftigelsesfradrag: Decimal,
    pub jobfradrag: Decimal,
    pub befordringsfradrag: Decimal,
    pub union_deduction: Decimal,
    /// Befordringsfradrag + union deduction; reduces the municipal base only.
    pub ligningsmaessige_fradrag: Decimal,
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
    /// What the holiday pay contributes to net income (difference method:
    /// the same assessment without holiday pay, subtracted).
    pub net_holiday_pay: Decimal,
    pub net_holiday_pay_monthly: Decimal,
    /// Total deductions as a percentage of total gross.
    pub effective_tax_rate: Decimal,
}

/// The ceiling-capped progressive bracket taxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BracketTaxes {
    pub(crate) mellemskat: Decimal,
    pub(crate) topskat: Decimal,
    pub(crate) toptopskat: Decimal,
}

/// Calculator for one (parameter set, municipality, church membership)
/// combination. Stateless and cheap to construct per request.
#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    params: &'a TaxParameterSet,
    municipality: &'a Municipality,
    is_church: bool,
}

impl<'a> TaxCalculator<'a> {
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

    /// Runs the full assessment for a normalized pay profile.
    ///
    /// Total for every valid profile: degenerate inputs (zero income, zero
    /// hours) produce an all-zero breakdown rather than an error.
    pub fn calculate(&self, profile: &PayProfile) -> TaxAssessment {
        let mut assessment = self.calculate_core(profile);

        if profile.holiday_pay_annual > Decimal::ZERO {
            let mut without = profile.clone();
            without.holiday_pay_annual = Decimal::ZERO;
            let net_without = self.calculate_core(&without).net_annual;
            assessment.net_holiday_pay = assessment.net_annual - net_without;
            assessment.net_holiday_pay_monthly =
                round_half_up(assessment.net_holiday_pay / Decimal::from(12u32));
        }

        assessment
    }

    fn calculate_core(&self, profile: &PayProfile) -> TaxAssessment {
        // Step 1: taxable gross. Other cash pay and taxable benefits are
        // taxable income; pre-tax deductions leave the base before AM.
        let total_gross = profile.gross_annual + profile.holiday_pay_annual
            + profile.other_pay_annual
            - profile.pretax_deductions_annual
            + profile.taxable_benefits_annual;

        // Step 2: AM-basis. Pension and ATP leave the base before AM-bidrag.
        let am_basis = total_gross - profile.employee_pension_annual - profile.atp_annual;
        if am_basis < Decimal::ZERO {
            warn!(
                %am_basis,
                gross_annual = %profile.gross_annual,
                "AM-basis is negative; income taxes are computed as zero"
            );
        }
        let taxable_basis = max(am_basis, Decimal::ZERO);

        // Step 3: AM-bidrag.
        let am_bidrag = round_half_up(taxable_basis * self.params.am_rate);
        let income_after_am = taxable_basis - am_bidrag;

        // Step 4: employment deductions.
        let (beskaeftigelsesfradrag, jobfradrag) = self.employment_deductions(income_after_am);

        // Step 5: ligningsmæssige fradrag.
        let befordringsfradrag = self.commuting_deduction(profile.transport_km_daily);
        let union_deduction = self.union_deduction(profile.union_fees_annual);
        let ligningsmaessige_fradrag = befordringsfradrag + union_deduction;

        // Steps 6–8: the income-tax brackets, all on income after AM.
        let bundskat = self.bundskat_on(income_after_am);
        let (kommuneskat, kirkeskat) = self.municipal_taxes_on(
            income_after_am,
            beskaeftigelsesfradrag + jobfradrag + ligningsmaessige_fradrag,
        );
        let brackets = self.progressive_taxes_on(income_after_am);

        // Step 9: totals. Net is cash inflows minus everything withheld.
        let total_income_tax = bundskat
            + kommuneskat
            + kirkeskat
            + brackets.mellemskat
            + brackets.topskat
            + brackets.toptopskat;
        let total_deductions = am_bidrag
            + profile.employee_pension_annual
            + profile.atp_annual
            + total_income_tax
            + profile.pretax_deductions_annual;
        let net_annual = profile.gross_annual + profile.holiday_pay_annual
            + profile.other_pay_annual
            - total_deductions
            - profile.aftertax_deductions_annual;

        let effective_tax_rate = if total_gross > Decimal::ZERO {
            round_half_up(total_deductions / total_gross * Decimal::from(100u32))
        } else {
            Decimal::ZERO
        };

        TaxAssessment {
            gross_annual: profile.gross_annual,
            holiday_pay: profile.holiday_pay_annual,
            other_pay: profile.other_pay_annual,
            taxable_benefits: profile.taxable_benefits_annual,
            pretax_deductions: profile.pretax_deductions_annual,
            aftertax_deductions: profile.aftertax_deductions_annual,
            total_gross,
            employee_pension: profile.employee_pension_annual,
            employer_pension: profile.employer_pension_annual,
            total_pension: profile.employee_pension_annual + profile.employer_pension_annual,
            atp_annual: profile.atp_annual,
            am_basis,
            am_bidrag,
            income_after_am,
            beskaeftigelsesfradrag,
            jobfradrag,
            befordringsfradrag,
            union_deduction,
            ligningsmaessige_fradrag,
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
            effective_tax_rate,
        }
    }

    /// Beskæftigelsesfradrag and jobfradrag, both capped.
    pub(crate) fn employment_deductions(&self, income_after_am: Decimal) -> (Decimal, Decimal) {
        let beskaeftigelsesfradrag = round_half_up(
            income_after_am * self.params.beskaeftigelsesfradrag_rate,
        )
        .min(self.params.beskaeftigelsesfradrag_max);
        let jobfradrag = round_half_up(income_after_am * self.params.jobfradrag_rate)
            .min(self.params.jobfradrag_max);
        (beskaeftigelsesfradrag, jobfradrag)
    }

    /// Bundskat on personal income above personfradrag.
    pub(crate) fn bundskat_on(&self, personal_income: Decimal) -> Decimal {
        let base = max(personal_income - self.params.personfradrag, Decimal::ZERO);
        round_half_up(base * self.params.bundskat_rate)
    }

    /// Kommuneskat and kirkeskat. Both share the reduced municipal base:
    /// personal income less personfradrag and the given fradrag total.
    pub(crate) fn municipal_taxes_on(
        &self,
        personal_income: Decimal,
        fradrag: Decimal,
    ) -> (Decimal, Decimal) {
        let base = max(
            personal_income - self.params.personfradrag - fradrag,
            Decimal::ZERO,
        );
        let kommuneskat = round_half_up(base * self.municipality.kommuneskat);
        let kirkeskat = if self.is_church {
            round_half_up(base * self.municipality.kirkeskat)
        } else {
            Decimal::ZERO
        };
        (kommuneskat, kirkeskat)
    }

    /// Mellemskat, topskat, and toptopskat on personal income, with the
    /// skatteloft ceiling applied.
    ///
    /// The effective rate of each bracket is clamped so the running combined
    /// marginal (bundskat + municipal + church for members + brackets so
    /// far) never exceeds the ceiling; clamping in ascending bracket order
    /// removes the excess from the highest applicable brackets first.
    pub(crate) fn progressive_taxes_on(&self, personal_income: Decimal) -> BracketTaxes {
        let p = self.params;
        let mut running = self.base_marginal_rate();

        let eff_mellem = clamped_rate(p.mellemskat_rate, p.skatteloft, running);
        running += eff_mellem;
        let eff_top = clamped_rate(p.topskat_rate, p.skatteloft, running);
        running += eff_top;
        let eff_toptop = clamped_rate(p.toptopskat_rate, p.skatteloft, running);

        let mellem_base = max(
            personal_income.min(p.topskat_threshold) - p.mellemskat_threshold,
            Decimal::ZERO,
        );
        let top_base = max(
            personal_income.min(p.toptopskat_threshold) - p.topskat_threshold,
            Decimal::ZERO,
        );
        let toptop_base = max(personal_income - p.toptopskat_threshold, Decimal::ZERO);

        BracketTaxes {
            mellemskat: round_half_up(mellem_base * eff_mellem),
            topskat: round_half_up(top_base * eff_top),
            toptopskat: round_half_up(toptop_base * eff_toptop),
        }
    }

    /// Combined marginal rate before the progressive brackets. Kirkeskat
    /// counts toward the ceiling for church members.
    fn base_marginal_rate(&self) -> Decimal {
        let mut rate = self.params.bundskat_rate + self.municipality.kommuneskat;
        if self.is_church {
            rate += self.municipality.kirkeskat;
        }
        rate
    }

    /// Befordringsfradrag for a daily round-trip commute.
    ///
    /// Nothing below the minimum distance; the band up to the cutoff at the
    /// full per-km rate, km beyond the cutoff at the reduced rate, scaled by
    /// the yearly work days.
    fn commuting_deduction(&self, daily_km: Decimal) -> Decimal {
        let b = &self.params.befordring;
        if daily_km <= b.min_round_trip_km {
            return Decimal::ZERO;
        }
        let work_days = Decimal::from(b.work_days_per_year);
        if daily_km <= b.cutoff_round_trip_km {
            let deductible_km = daily_km - b.min_round_trip_km;
            return round_half_up(deductible_km * b.rate_below_cutoff * work_days);
        }
        let km_in_band = b.cutoff_round_trip_km - b.min_round_trip_km;
        let km_beyond = daily_km - b.cutoff_round_trip_km;
        round_half_up(
            (km_in_band * b.rate_below_cutoff + km_beyond * b.rate_above_cutoff) * work_days,
        )
    }

    /// Union + a-kasse fees, deductible up to the annual cap.
    fn union_deduction(&self, fees_annual: Decimal) -> Decimal {
        round_half_up(fees_annual.min(self.params.fagforening_max))
    }
}

fn clamped_rate(rate: Decimal, ceiling: Decimal, running: Decimal) -> Decimal {
    rate.min(max(ceiling - running, Decimal::ZERO))
}
