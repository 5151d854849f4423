//! Response DTOs: the itemized assessments with the municipality echo, and
//! the metadata block the client uses for display and validation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use netto_core::calculations::{BracketMarkers, StudentAssessment, TaxAssessment};
use netto_core::{AtpTier, Municipality, MunicipalityTable, TaxParameterSet};

fn to_pct(fraction: Decimal) -> Decimal {
    fraction * Decimal::from(100u32)
}

/// Itemized employee result with the resolved municipality rates echoed
/// back as plain percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResponse {
    pub kommune: String,
    pub kommune_pct: Decimal,
    pub kirke_pct: Decimal,
    /// Echoed for hourly requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_month: Option<Decimal>,
    #[serde(flatten)]
    pub assessment: TaxAssessment,
}

impl TaxResponse {
    pub(crate) fn assemble(
        municipality: &Municipality,
        hourly: Option<(Decimal, Decimal)>,
        assessment: TaxAssessment,
    ) -> Self {
        Self {
            kommune: municipality.name.clone(),
            kommune_pct: to_pct(municipality.kommuneskat),
            kirke_pct: to_pct(municipality.kirkeskat),
            hourly_rate: hourly.map(|(rate, _)| rate),
            hours_month: hourly.map(|(_, hours)| hours),
            assessment,
        }
    }
}

/// Itemized student result with the municipality echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub kommune: String,
    pub kommune_pct: Decimal,
    pub kirke_pct: Decimal,
    #[serde(flatten)]
    pub assessment: StudentAssessment,
}

impl StudentResponse {
    pub(crate) fn assemble(municipality: &Municipality, assessment: StudentAssessment) -> Self {
        Self {
            kommune: municipality.name.clone(),
            kommune_pct: to_pct(municipality.kommuneskat),
            kirke_pct: to_pct(municipality.kirkeskat),
            assessment,
        }
    }
}

/// Municipality rates as plain percentages, for client display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityRates {
    pub kommuneskat: Decimal,
    pub kirkeskat: Decimal,
}

/// The constants block of the metadata response. Rates are fractions here,
/// exactly as the engine computes with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaConstants {
    pub am_rate: Decimal,
    pub personfradrag: Decimal,
    pub bundskat_rate: Decimal,
    pub mellemskat_threshold: Decimal,
    pub mellemskat_rate: Decimal,
    pub topskat_threshold: Decimal,
    pub topskat_rate: Decimal,
    pub toptopskat_threshold: Decimal,
    pub toptopskat_rate: Decimal,
    pub skatteloft: Decimal,
    pub beskaeftigelsesfradrag_rate: Decimal,
    pub beskaeftigelsesfradrag_max: Decimal,
    pub jobfradrag_rate: Decimal,
    pub jobfradrag_max: Decimal,
    pub ferietillaeg_rate: Decimal,
    pub feriepenge_rate: Decimal,
    pub fagforening_max: Decimal,
    pub atp_monthly_fulltime: Decimal,
    pub atp_tiers: Vec<AtpTier>,
    pub su_udeboende_month: Decimal,
    pub su_hjemmeboende_base: Decimal,
    pub su_hjemmeboende_max: Decimal,
    pub fribeloeb_laveste_higher: Decimal,
    pub fribeloeb_laveste_youth: Decimal,
    pub fribeloeb_mellemste: Decimal,
    pub fribeloeb_hoejeste: Decimal,
    pub fribeloeb_parent_bonus: Decimal,
    pub su_repayment_interest_rate: Decimal,
}

/// Reference data for the client: tax year, exchange rate, the municipality
/// table, the full constants block, and the bracket annotation markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaResponse {
    pub tax_year: i32,
    pub dkk_per_eur: Decimal,
    pub kommuner: BTreeMap<String, MunicipalityRates>,
    pub constants: MetaConstants,
    pub bracket_markers: BracketMarkers,
}

impl MetaResponse {
    pub(crate) fn assemble(params: &TaxParameterSet, municipalities: &MunicipalityTable) -> Self {
        let kommuner = municipalities
            .iter()
            .map(|m| {
                (
                    m.name.clone(),
                    MunicipalityRates {
                        kommuneskat: to_pct(m.kommuneskat),
                        kirkeskat: to_pct(m.kirkeskat),
                    },
                )
            })
            .collect();
        Self {
            tax_year: params.tax_year,
            dkk_per_eur: params.dkk_per_eur,
            kommuner,
            constants: MetaConstants {
                am_rate: params.am_rate,
                personfradrag: params.personfradrag,
                bundskat_rate: params.bundskat_rate,
                mellemskat_threshold: params.mellemskat_threshold,
                mellemskat_rate: params.mellemskat_rate,
                topskat_threshold: params.topskat_threshold,
                topskat_rate: params.topskat_rate,
                toptopskat_threshold: params.toptopskat_threshold,
                toptopskat_rate: params.toptopskat_rate,
                skatteloft: params.skatteloft,
                beskaeftigelsesfradrag_rate: params.beskaeftigelsesfradrag_rate,
                beskaeftigelsesfradrag_max: params.beskaeftigelsesfradrag_max,
                jobfradrag_rate: params.jobfradrag_rate,
                jobfradrag_max: params.jobfradrag_max,
                ferietillaeg_rate: params.ferietillaeg_rate,
                feriepenge_rate: params.feriepenge_rate,
                fagforening_max: params.fagforening_max,
                atp_monthly_fulltime: params.atp.fulltime_monthly,
                atp_tiers: params.atp.tiers.clone(),
                su_udeboende_month: params.su.udeboende_monthly,
                su_hjemmeboende_base: params.su.hjemmeboende_base_monthly,
                su_hjemmeboende_max: params.su.hjemmeboende_max_monthly,
                fribeloeb_laveste_higher: params.su.fribeloeb_laveste_higher,
                fribeloeb_laveste_youth: params.su.fribeloeb_laveste_youth,
                fribeloeb_mellemste: params.su.fribeloeb_mellemste,
                fribeloeb_hoejeste: params.su.fribeloeb_hoejeste,
                fribeloeb_parent_bonus: params.su.fribeloeb_parent_bonus,
                su_repayment_interest_rate: params.su.repayment_interest_rate,
            },
            bracket_markers: BracketMarkers::from_params(params),
        }
    }
}
