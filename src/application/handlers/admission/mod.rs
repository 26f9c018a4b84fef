//! Admission counting.

mod count_admissions;

pub use count_admissions::{
    CountAdmissionsHandler, CountAdmissionsQuery, DEFAULT_ADMISSION_FILTER,
};
