//! Tax year 2026 parameter constants.
//!
//! Sources: skat.dk/hjaelp/satser, su.dk/satser, and the published ATP
//! employee-share table. Rates are stored as fractions; amounts are annual
//! DKK unless named otherwise.

use rust_decimal_macros::dec;

use netto_core::{
    AtpSchedule, AtpTier, BefordringParameters, SuParameters, TaxParameterSet,
};

/// The 2026 parameter set.
pub fn parameter_set_2026() -> TaxParameterSet {
    TaxParameterSet {
        tax_year: 2026,
        am_rate: dec!(0.08),
        personfradrag: dec!(54100),
        bundskat_rate: dec!(0.1201),
        // Bracket thresholds apply to income after AM-bidrag.
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
        atp: AtpSchedule {
            fulltime_monthly: dec!(94.65),
            // Employee share by weekly hours. The published table lists two
            // zero bands below 18 hours; both are kept as published.
            tiers: vec![
                AtpTier { min_weekly_hours: dec!(0), monthly_amount: dec!(0) },
                AtpTier { min_weekly_hours: dec!(9), monthly_amount: dec!(0) },
                AtpTier { min_weekly_hours: dec!(18), monthly_amount: dec!(31.55) },
                AtpTier { min_weekly_hours: dec!(27), monthly_amount: dec!(63.10) },
                AtpTier { min_weekly_hours: dec!(37), monthly_amount: dec!(94.65) },
            ],
        },
        su: SuParameters {
            udeboende_monthly: dec!(7426),
            hjemmeboende_base_monthly: dec!(1154),
            hjemmeboende_max_monthly: dec!(3797),
            fribeloeb_laveste_higher: dec!(20749),
            fribeloeb_laveste_youth: dec!(15297),
            fribeloeb_mellemste: dec!(23598),
            fribeloeb_hoejeste: dec!(45420),
            fribeloeb_parent_bonus: dec!(34129),
            repayment_interest_rate: dec!(0.0975),
        },
        befordring: BefordringParameters {
            min_round_trip_km: dec!(24),
            cutoff_round_trip_km: dec!(120),
            rate_below_cutoff: dec!(1.98),
            rate_above_cutoff: dec!(0.99),
            // ≈ 52 weeks × 5 days − holidays and sick days.
            work_days_per_year: 218,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn the_2026_set_validates() {
        assert_eq!(parameter_set_2026().validate(), Ok(()));
    }

    #[test]
    fn headline_constants_match_the_published_figures() {
        let params = parameter_set_2026();

        assert_eq!(params.tax_year, 2026);
        assert_eq!(params.am_rate, dec!(0.08));
        assert_eq!(params.personfradrag, dec!(54100));
        assert_eq!(params.bundskat_rate, dec!(0.1201));
        assert_eq!(params.skatteloft, dec!(0.4457));
        assert_eq!(params.atp.fulltime_monthly, dec!(94.65));
        assert_eq!(params.su.repayment_interest_rate, dec!(0.0975));
    }
}
