//! The per-tax-year parameter set: national rates, thresholds, caps, and the
//! tiered lookup tables (ATP by weekly hours, fribeløb by enrollment tier).
//!
//! All rates are stored as fractions in `[0, 1]`; all thresholds and amounts
//! are annual DKK unless a field name says otherwise. A set is validated once
//! when it is activated and treated as immutable afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a parameter set is missing or malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParameterError {
    /// The requested tax year has not been loaded into the store.
    /// There is deliberately no fallback to a different year.
    #[error("tax year {0} is not loaded")]
    YearNotLoaded(i32),

    /// No parameter set has been activated yet.
    #[error("no active tax year")]
    NoActiveYear,

    /// A rate field was outside the fraction range [0, 1].
    #[error("{field} must be a fraction between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// An amount or threshold field was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// The progressive bracket thresholds are not in ascending order.
    #[error("bracket thresholds must be ordered: {0}")]
    MisorderedThresholds(String),

    /// The ATP tier table is empty, unsorted, or carries a negative amount.
    #[error("ATP tier table must be non-empty, sorted by weekly hours, with non-negative amounts")]
    MalformedAtpTable,
}

/// One row of the ATP tier table: the contribution that applies from
/// `min_weekly_hours` up to the next row's bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtpTier {
    pub min_weekly_hours: Decimal,
    pub monthly_amount: Decimal,
}

/// ATP contribution schedule: a full-time amount plus an ordered range table
/// keyed by weekly hours for part-time work.
///
/// The published table carries two zero bands below 18 hours (`<9h` and
/// `9–17h`); both boundaries are kept as published rather than collapsed.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use netto_core::{AtpSchedule, AtpTier};
///
/// let schedule = AtpSchedule {
///     fulltime_monthly: dec!(94.65),
///     tiers: vec![
///         AtpTier { min_weekly_hours: dec!(0), monthly_amount: dec!(0) },
///         AtpTier { min_weekly_hours: dec!(9), monthly_amount: dec!(0) },
///         AtpTier { min_weekly_hours: dec!(18), monthly_amount: dec!(31.55) },
///         AtpTier { min_weekly_hours: dec!(27), monthly_amount: dec!(63.10) },
///         AtpTier { min_weekly_hours: dec!(37), monthly_amount: dec!(94.65) },
///     ],
/// };
///
/// assert_eq!(schedule.monthly_for_weekly_hours(dec!(18.5)), dec!(31.55));
/// assert_eq!(schedule.monthly_for_weekly_hours(dec!(8)), dec!(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtpSchedule {
    pub fulltime_monthly: Decimal,
    pub tiers: Vec<AtpTier>,
}

impl AtpSchedule {
    /// Resolves the monthly ATP amount for the given weekly hours.
    ///
    /// The last tier whose lower bound is at or below the hours wins; hours
    /// below the lowest bound resolve to zero.
    pub fn monthly_for_weekly_hours(&self, weekly_hours: Decimal) -> Decimal {
        self.tiers
            .iter()
            .rev()
            .find(|tier| weekly_hours >= tier.min_weekly_hours)
            .map(|tier| tier.monthly_amount)
            .unwrap_or(Decimal::ZERO)
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if self.tiers.is_empty() || self.fulltime_monthly < Decimal::ZERO {
            return Err(ParameterError::MalformedAtpTable);
        }
        for pair in self.tiers.windows(2) {
            if pair[0].min_weekly_hours >= pair[1].min_weekly_hours {
                return Err(ParameterError::MalformedAtpTable);
            }
        }
        if self.tiers.iter().any(|t| {
            t.monthly_amount < Decimal::ZERO || t.min_weekly_hours < Decimal::ZERO
        }) {
            return Err(ParameterError::MalformedAtpTable);
        }
        Ok(())
    }
}

/// Education category, which selects the lowest fribeløb rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    /// Videregående uddannelse (university, professional bachelor, ...).
    Higher,
    /// Ungdomsuddannelse (gymnasium, vocational, ...).
    Youth,
}

/// Monthly fribeløb tier for a given month of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FribeloebTier {
    /// Months where SU is received.
    Laveste,
    /// Months enrolled but opted out of SU (fravalg, leave, paid internship).
    Mellemste,
    /// Enrolled months with no SU entitlement left.
    Hoejeste,
}

/// SU grant amounts and the fribeløb/repayment rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuParameters {
    /// Monthly SU before tax, living away from home (videregående).
    pub udeboende_monthly: Decimal,
    /// Monthly SU base rate, living at home.
    pub hjemmeboende_base_monthly: Decimal,
    /// Monthly SU maximum with full supplement, living at home.
    pub hjemmeboende_max_monthly: Decimal,
    /// Lowest monthly fribeløb, higher education.
    pub fribeloeb_laveste_higher: Decimal,
    /// Lowest monthly fribeløb, youth education.
    pub fribeloeb_laveste_youth: Decimal,
    /// Middle monthly fribeløb (enrolled, no SU drawn).
    pub fribeloeb_mellemste: Decimal,
    /// Highest monthly fribeløb (enrolled, no SU entitlement).
    pub fribeloeb_hoejeste: Decimal,
    /// Annual fribeløb increase per child under 18.
    pub fribeloeb_parent_bonus: Decimal,
    /// Interest rate applied to SU that must be repaid.
    pub repayment_interest_rate: Decimal,
}

impl SuParameters {
    /// Monthly fribeløb rate for a tier; the lowest tier depends on the
    /// education category.
    pub fn fribeloeb_monthly(&self, tier: FribeloebTier, education: EducationLevel) -> Decimal {
        match tier {
            FribeloebTier::Laveste => match education {
                EducationLevel::Higher => self.fribeloeb_laveste_higher,
                EducationLevel::Youth => self.fribeloeb_laveste_youth,
            },
            FribeloebTier::Mellemste => self.fribeloeb_mellemste,
            FribeloebTier::Hoejeste => self.fribeloeb_hoejeste,
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        for (field, value) in [
            ("su.udeboende_monthly", self.udeboende_monthly),
            ("su.hjemmeboende_base_monthly", self.hjemmeboende_base_monthly),
            ("su.hjemmeboende_max_monthly", self.hjemmeboende_max_monthly),
            ("su.fribeloeb_laveste_higher", self.fribeloeb_laveste_higher),
            ("su.fribeloeb_laveste_youth", self.fribeloeb_laveste_youth),
            ("su.fribeloeb_mellemste", self.fribeloeb_mellemste),
            ("su.fribeloeb_hoejeste", self.fribeloeb_hoejeste),
            ("su.fribeloeb_parent_bonus", self.fribeloeb_parent_bonus),
        ] {
            if value < Decimal::ZERO {
                return Err(ParameterError::NegativeAmount { field, value });
            }
        }
        fraction("su.repayment_interest_rate", self.repayment_interest_rate)
    }
}

/// Befordringsfradrag (commuting deduction) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BefordringParameters {
    /// Round-trip km per day below which no deduction applies.
    pub min_round_trip_km: Decimal,
    /// Round-trip km per day above which the reduced rate applies.
    pub cutoff_round_trip_km: Decimal,
    /// DKK per km for the band between the two bounds.
    pub rate_below_cutoff: Decimal,
    /// DKK per km beyond the cutoff.
    pub rate_above_cutoff: Decimal,
    /// Working days per year the commute is counted for.
    pub work_days_per_year: u32,
}

impl BefordringParameters {
    fn validate(&self) -> Result<(), ParameterError> {
        for (field, value) in [
            ("befordring.min_round_trip_km", self.min_round_trip_km),
            ("befordring.cutoff_round_trip_km", self.cutoff_round_trip_km),
            ("befordring.rate_below_cutoff", self.rate_below_cutoff),
            ("befordring.rate_above_cutoff", self.rate_above_cutoff),
        ] {
            if value < Decimal::ZERO {
                return Err(ParameterError::NegativeAmount { field, value });
            }
        }
        if self.min_round_trip_km > self.cutoff_round_trip_km {
            return Err(ParameterError::MisorderedThresholds(
                "befordring min km above cutoff km".to_string(),
            ));
        }
        Ok(())
    }
}

/// One tax year's complete parameter set.
///
/// Exactly one set is active per computation; sets are shared read-only and
/// never mutated after activation (year rotation swaps the whole set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxParameterSet {
    pub tax_year: i32,
    /// AM-bidrag (labour-market contribution) rate.
    pub am_rate: Decimal,
    /// Annual personal allowance (personfradrag).
    pub personfradrag: Decimal,
    pub bundskat_rate: Decimal,
    /// Bracket thresholds are annual income after AM-bidrag.
    pub mellemskat_threshold: Decimal,
    pub mellemskat_rate: Decimal,
    pub topskat_threshold: Decimal,
    pub topskat_rate: Decimal,
    pub toptopskat_threshold: Decimal,
    pub toptopskat_rate: Decimal,
    /// Ceiling on the combined marginal state + municipal rate.
    pub skatteloft: Decimal,
    pub beskaeftigelsesfradrag_rate: Decimal,
    pub beskaeftigelsesfradrag_max: Decimal,
    pub jobfradrag_rate: Decimal,
    pub jobfradrag_max: Decimal,
    /// Holiday pay for salaried employees (ferietillæg).
    pub ferietillaeg_rate: Decimal,
    /// Holiday pay for hourly workers (feriepenge).
    pub feriepenge_rate: Decimal,
    /// Annual cap on deductible union + a-kasse fees.
    pub fagforening_max: Decimal,
    /// Fallback exchange rate, DKK per EUR.
    pub dkk_per_eur: Decimal,
    pub atp: AtpSchedule,
    pub su: SuParameters,
    pub befordring: BefordringParameters,
}

impl TaxParameterSet {
    /// Validates every rate, threshold, and tier table in the set.
    ///
    /// Called once on activation; a set that validates is safe to share
    /// across computations without further checks.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (field, value) in [
            ("am_rate", self.am_rate),
            ("bundskat_rate", self.bundskat_rate),
            ("mellemskat_rate", self.mellemskat_rate),
            ("topskat_rate", self.topskat_rate),
            ("toptopskat_rate", self.toptopskat_rate),
            ("skatteloft", self.skatteloft),
            ("beskaeftigelsesfradrag_rate", self.beskaeftigelsesfradrag_rate),
            ("jobfradrag_rate", self.jobfradrag_rate),
            ("ferietillaeg_rate", self.ferietillaeg_rate),
            ("feriepenge_rate", self.feriepenge_rate),
        ] {
            fraction(field, value)?;
        }
        for (field, value) in [
            ("personfradrag", self.personfradrag),
            ("mellemskat_threshold", self.mellemskat_threshold),
            ("topskat_threshold", self.topskat_threshold),
            ("toptopskat_threshold", self.toptopskat_threshold),
            ("beskaeftigelsesfradrag_max", self.beskaeftigelsesfradrag_max),
            ("jobfradrag_max", self.jobfradrag_max),
            ("fagforening_max", self.fagforening_max),
            ("dkk_per_eur", self.dkk_per_eur),
        ] {
            if value < Decimal::ZERO {
                return Err(ParameterError::NegativeAmount { field, value });
            }
        }
        if self.mellemskat_threshold > self.topskat_threshold
            || self.topskat_threshold > self.toptopskat_threshold
        {
            return Err(ParameterError::MisorderedThresholds(format!(
                "mellemskat {} / topskat {} / toptopskat {}",
                self.mellemskat_threshold, self.topskat_threshold, self.toptopskat_threshold
            )));
        }
        self.atp.validate()?;
        self.su.validate()?;
        self.befordring.validate()?;
        Ok(())
    }
}

fn fraction(field: &'static str, value: Decimal) -> Result<(), ParameterError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ParameterError::RateOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_atp() -> AtpSchedule {
        AtpSchedule {
            fulltime_monthly: dec!(94.65),
            tiers: vec![
                AtpTier { min_weekly_hours: dec!(0), monthly_amount: dec!(0) },
                AtpTier { min_weekly_hours: dec!(9), monthly_amount: dec!(0) },
                AtpTier { min_weekly_hours: dec!(18), monthly_amount: dec!(31.55) },
                AtpTier { min_weekly_hours: dec!(27), monthly_amount: dec!(63.10) },
                AtpTier { min_weekly_hours: dec!(37), monthly_amount: dec!(94.65) },
            ],
        }
    }

    fn test_su() -> SuParameters {
        SuParameters {
            udeboende_monthly: dec!(7426),
            hjemmeboende_base_monthly: dec!(1154),
            hjemmeboende_max_monthly: dec!(3797),
            fribeloeb_laveste_higher: dec!(20749),
            fribeloeb_laveste_youth: dec!(15297),
            fribeloeb_mellemste: dec!(23598),
            fribeloeb_hoejeste: dec!(45420),
            fribeloeb_parent_bonus: dec!(34129),
            repayment_interest_rate: dec!(0.0975),
        }
    }

    fn test_params() -> TaxParameterSet {
        TaxParameterSet {
            tax_year: 2026,
            am_rate: dec!(0.08),
            personfradrag: dec!(54100),
            bundskat_rate: dec!(0.1201),
            mellemskat_threshold: dec!(641200),
            mellemskat_rate: dec!(0.075),
            topskat_threshold: dec!(777900),
            topskat_rate: dec!(0.075),
            toptopskat_threshold: dec!(2592700),
            toptopskat_rate: dec!(0.05),
            skatteloft: dec!(0.4457),
            beskaeftigelsesfradrag_rate: dec!(0.1275),
            beskaeftigelsesfradrag_max: dec!(63300),
            jobfradrag_rate: dec!(0.045),
            jobfradrag_max: dec!(3100),
            ferietillaeg_rate: dec!(0.01),
            feriepenge_rate: dec!(0.125),
            fagforening_max: dec!(7000),
            dkk_per_eur: dec!(7.45),
            atp: test_atp(),
            su: test_su(),
            befordring: BefordringParameters {
                min_round_trip_km: dec!(24),
                cutoff_round_trip_km: dec!(120),
                rate_below_cutoff: dec!(1.98),
                rate_above_cutoff: dec!(0.99),
                work_days_per_year: 218,
            },
        }
    }

    // =========================================================================
    // AtpSchedule tests
    // =========================================================================

    #[test]
    fn atp_below_lowest_band_is_zero() {
        assert_eq!(test_atp().monthly_for_weekly_hours(dec!(5)), dec!(0));
    }

    #[test]
    fn atp_zero_band_boundaries_are_preserved() {
        let atp = test_atp();

        assert_eq!(atp.monthly_for_weekly_hours(dec!(8.99)), dec!(0));
        assert_eq!(atp.monthly_for_weekly_hours(dec!(9)), dec!(0));
        assert_eq!(atp.monthly_for_weekly_hours(dec!(17.99)), dec!(0));
    }

    #[test]
    fn atp_lower_tier_starts_at_18_hours() {
        let atp = test_atp();

        assert_eq!(atp.monthly_for_weekly_hours(dec!(18)), dec!(31.55));
        assert_eq!(atp.monthly_for_weekly_hours(dec!(26.99)), dec!(31.55));
    }

    #[test]
    fn atp_middle_tier_spans_27_to_36_hours() {
        let atp = test_atp();

        assert_eq!(atp.monthly_for_weekly_hours(dec!(27)), dec!(63.10));
        assert_eq!(atp.monthly_for_weekly_hours(dec!(36.9)), dec!(63.10));
    }

    #[test]
    fn atp_fulltime_tier_from_37_hours() {
        let atp = test_atp();

        assert_eq!(atp.monthly_for_weekly_hours(dec!(37)), dec!(94.65));
        assert_eq!(atp.monthly_for_weekly_hours(dec!(45)), dec!(94.65));
    }

    #[test]
    fn atp_unsorted_table_fails_validation() {
        let mut params = test_params();
        params.atp.tiers.swap(2, 3);

        assert_eq!(params.validate(), Err(ParameterError::MalformedAtpTable));
    }

    // =========================================================================
    // SuParameters tests
    // =========================================================================

    #[test]
    fn fribeloeb_laveste_depends_on_education() {
        let su = test_su();

        assert_eq!(
            su.fribeloeb_monthly(FribeloebTier::Laveste, EducationLevel::Higher),
            dec!(20749)
        );
        assert_eq!(
            su.fribeloeb_monthly(FribeloebTier::Laveste, EducationLevel::Youth),
            dec!(15297)
        );
    }

    #[test]
    fn fribeloeb_upper_tiers_ignore_education() {
        let su = test_su();

        assert_eq!(
            su.fribeloeb_monthly(FribeloebTier::Mellemste, EducationLevel::Higher),
            su.fribeloeb_monthly(FribeloebTier::Mellemste, EducationLevel::Youth)
        );
        assert_eq!(
            su.fribeloeb_monthly(FribeloebTier::Hoejeste, EducationLevel::Youth),
            dec!(45420)
        );
    }

    // =========================================================================
    // TaxParameterSet::validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_the_reference_set() {
        assert_eq!(test_params().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_percent_style_rate() {
        let mut params = test_params();
        params.am_rate = dec!(8);

        assert_eq!(
            params.validate(),
            Err(ParameterError::RateOutOfRange {
                field: "am_rate",
                value: dec!(8),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let mut params = test_params();
        params.personfradrag = dec!(-1);

        assert_eq!(
            params.validate(),
            Err(ParameterError::NegativeAmount {
                field: "personfradrag",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_misordered_brackets() {
        let mut params = test_params();
        params.topskat_threshold = dec!(600000);

        let err = params.validate().expect_err("thresholds are misordered");
        match err {
            ParameterError::MisorderedThresholds(_) => {}
            other => panic!("expected MisorderedThresholds, got {other:?}"),
        }
    }
}
