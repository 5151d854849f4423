//! Endpoint bodies: municipality resolution, percent-to-fraction conversion,
//! the engine pipeline, and response assembly.

use std::sync::Arc;

use rust_decimal::Decimal;

use netto_core::calculations::curve::{
    CurvePoint, HoursCurvePoint, gross_curve, hours_curve, student_hours_curve,
};
use netto_core::calculations::{
    CurveBaseline, StudentCalculator, TaxCalculator, normalize,
};
use netto_core::{
    EmploymentInput, EnrollmentCalendar, GrossPay, MunicipalityTable, ParameterStore,
    PayAdjustments, StudentInput, TaxParameterSet, ValidationError, WorkIncome,
};

use crate::error::ComputeError;
use crate::requests::{
    CurveRequest, FullTimeRequest, HoursCurveRequest, PartTimeRequest, PayExtras,
    StudentHoursCurveRequest, StudentRequest,
};
use crate::responses::{MetaResponse, StudentResponse, TaxResponse};

fn fraction(pct: Decimal) -> Decimal {
    pct / Decimal::from(100u32)
}

fn annual(monthly: Decimal) -> Decimal {
    monthly * Decimal::from(12u32)
}

fn adjustments(pension_pct: Decimal, employer_pension_pct: Decimal, extras: &PayExtras) -> PayAdjustments {
    PayAdjustments {
        employee_pension_rate: fraction(pension_pct),
        employer_pension_rate: fraction(employer_pension_pct),
        other_pay_annual: annual(extras.other_pay_monthly),
        taxable_benefits_annual: annual(extras.taxable_benefits_monthly),
        pretax_deductions_annual: annual(extras.pretax_deductions_monthly),
        aftertax_deductions_annual: annual(extras.aftertax_deductions_monthly),
        transport_km_daily: extras.transport_km,
        union_fees_annual: extras.union_fees_annual,
        atp_monthly_override: extras.atp_monthly,
    }
}

/// `GET meta`: reference data for the client.
pub fn meta(params: &TaxParameterSet, municipalities: &MunicipalityTable) -> MetaResponse {
    MetaResponse::assemble(params, municipalities)
}

/// `POST compute/fulltime`.
pub fn compute_fulltime(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &FullTimeRequest,
) -> Result<TaxResponse, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    let gross = match (req.gross_annual, req.gross_monthly) {
        (Some(gross_annual), None) => GrossPay::Annual(gross_annual),
        (None, Some(gross_monthly)) => GrossPay::Monthly(gross_monthly),
        (Some(_), Some(_)) => {
            return Err(ValidationError::MalformedInput(
                "supply either gross_annual or gross_monthly, not both".to_string(),
            )
            .into());
        }
        (None, None) => {
            return Err(ValidationError::MalformedInput(
                "one of gross_annual or gross_monthly is required".to_string(),
            )
            .into());
        }
    };

    let input = EmploymentInput::FullTime {
        gross,
        adjustments: adjustments(req.pension_pct, req.employer_pension_pct, &req.extras),
    };
    let profile = normalize(&input, params)?;
    let assessment = TaxCalculator::new(params, municipality, req.is_church).calculate(&profile);
    Ok(TaxResponse::assemble(municipality, None, assessment))
}

/// `POST compute/parttime`.
pub fn compute_parttime(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &PartTimeRequest,
) -> Result<TaxResponse, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    let input = EmploymentInput::Hourly {
        hourly_rate: req.hourly_rate,
        hours_month: req.hours_month,
        adjustments: adjustments(req.pension_pct, req.employer_pension_pct, &req.extras),
    };
    let profile = normalize(&input, params)?;
    let assessment = TaxCalculator::new(params, municipality, req.is_church).calculate(&profile);
    Ok(TaxResponse::assemble(
        municipality,
        Some((req.hourly_rate, req.hours_month)),
        assessment,
    ))
}

/// `POST compute/student`.
pub fn compute_student(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &StudentRequest,
) -> Result<StudentResponse, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    let input = student_input(req);
    let assessment =
        StudentCalculator::new(params, municipality, req.is_church).calculate(&input)?;
    Ok(StudentResponse::assemble(municipality, assessment))
}

/// `POST compute/curve`: net-vs-gross chart series.
pub fn compute_curve(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &CurveRequest,
) -> Result<Vec<CurvePoint>, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    let baseline = CurveBaseline {
        params,
        municipality,
        is_church: req.is_church,
        is_hourly: req.is_hourly,
        adjustments: adjustments(req.pension_pct, req.employer_pension_pct, &req.extras),
    };
    Ok(gross_curve(
        &baseline,
        req.min_gross,
        req.max_gross,
        req.step_monthly,
    )?)
}

/// `POST compute/hours-curve`: net-vs-hours chart series.
pub fn compute_hours_curve(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &HoursCurveRequest,
) -> Result<Vec<HoursCurvePoint>, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    Ok(hours_curve(
        params,
        municipality,
        req.is_church,
        req.hourly_rate,
        &adjustments(req.pension_pct, req.employer_pension_pct, &req.extras),
        req.max_hours,
        req.step_hours,
    )?)
}

/// `POST compute/student-hours-curve`: net-vs-hours for a student baseline.
pub fn compute_student_hours_curve(
    params: &TaxParameterSet,
    municipalities: &MunicipalityTable,
    req: &StudentHoursCurveRequest,
) -> Result<Vec<HoursCurvePoint>, ComputeError> {
    let municipality = municipalities.get(&req.kommune)?;
    let baseline = StudentInput {
        su_monthly: req.su_monthly,
        work: Vec::new(),
        employee_pension_rate: fraction(req.pension_pct),
        employer_pension_rate: fraction(req.employer_pension_pct),
        calendar: EnrollmentCalendar {
            enrolled_months: req.enrolled_months,
            su_months: req.su_months,
            opted_out_months: req.opted_out_months,
        },
        education: req.education.into(),
        children_count: req.children,
    };
    Ok(student_hours_curve(
        params,
        municipality,
        req.is_church,
        &baseline,
        req.hourly_rate,
        req.max_hours,
        req.step_hours,
    )?)
}

fn student_input(req: &StudentRequest) -> StudentInput {
    StudentInput {
        su_monthly: req.su_monthly,
        work: req
            .work
            .iter()
            .map(|job| WorkIncome {
                hourly_rate: job.hourly_rate,
                hours_month: job.hours_month,
            })
            .collect(),
        employee_pension_rate: fraction(req.pension_pct),
        employer_pension_rate: fraction(req.employer_pension_pct),
        calendar: EnrollmentCalendar {
            enrolled_months: req.enrolled_months,
            su_months: req.su_months,
            opted_out_months: req.opted_out_months,
        },
        education: req.education.into(),
        children_count: req.children,
    }
}

/// The engine behind the endpoints: the active parameter set plus the
/// municipality table, resolved per request.
#[derive(Debug)]
pub struct Service {
    store: Arc<ParameterStore>,
    municipalities: MunicipalityTable,
}

impl Service {
    pub fn new(store: Arc<ParameterStore>, municipalities: MunicipalityTable) -> Self {
        Self {
            store,
            municipalities,
        }
    }

    pub fn meta(&self) -> Result<MetaResponse, ComputeError> {
        let params = self.store.current()?;
        Ok(meta(&params, &self.municipalities))
    }

    pub fn compute_fulltime(&self, req: &FullTimeRequest) -> Result<TaxResponse, ComputeError> {
        let params = self.store.current()?;
        compute_fulltime(&params, &self.municipalities, req)
    }

    pub fn compute_parttime(&self, req: &PartTimeRequest) -> Result<TaxResponse, ComputeError> {
        let params = self.store.current()?;
        compute_parttime(&params, &self.municipalities, req)
    }

    pub fn compute_student(&self, req: &StudentRequest) -> Result<StudentResponse, ComputeError> {
        let params = self.store.current()?;
        compute_student(&params, &self.municipalities, req)
    }

    pub fn compute_curve(&self, req: &CurveRequest) -> Result<Vec<CurvePoint>, ComputeError> {
        let params = self.store.current()?;
        compute_curve(&params, &self.municipalities, req)
    }

    pub fn compute_hours_curve(
        &self,
        req: &HoursCurveRequest,
    ) -> Result<Vec<HoursCurvePoint>, ComputeError> {
        let params = self.store.current()?;
        compute_hours_curve(&params, &self.municipalities, req)
    }

    pub fn compute_student_hours_curve(
        &self,
        req: &StudentHoursCurveRequest,
    ) -> Result<Vec<HoursCurvePoint>, ComputeError> {
        let params = self.store.current()?;
        compute_student_hours_curve(&params, &self.municipalities, req)
    }
}
