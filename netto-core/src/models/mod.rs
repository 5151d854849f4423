mod employment;
mod municipality;
mod parameters;

pub use employment::{
    EmploymentInput, EnrollmentCalendar, GrossPay, PayAdjustments, StudentInput, WorkIncome,
};
pub use municipality::{Municipality, MunicipalityTable};
pub use parameters::{
    AtpSchedule, AtpTier, BefordringParameters, EducationLevel, FribeloebTier, ParameterError,
    SuParameters, TaxParameterSet,
};
