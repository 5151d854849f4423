//! Shared test fixtures: the documented 2026 reference constants and a
//! couple of municipality rows.

use rust_decimal_macros::dec;

use crate::models::{
    AtpSchedule, AtpTier, BefordringParameters, Municipality, SuParameters, TaxParameterSet,
};

pub(crate) fn test_params() -> TaxParameterSet {
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
        atp: AtpSchedule {
            fulltime_monthly: dec!(94.65),
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
            work_days_per_year: 218,
        },
    }
}

/// København 2026 rates.
pub(crate) fn koebenhavn() -> Municipality {
    Municipality {
        name: "København".to_string(),
        kommuneskat: dec!(0.2339),
        kirkeskat: dec!(0.0080),
    }
}

/// The highest combined municipal + church rates in the 2026 table.
pub(crate) fn laesoe() -> Municipality {
    Municipality {
        name: "Læsø".to_string(),
        kommuneskat: dec!(0.2630),
        kirkeskat: dec!(0.0130),
    }
}
