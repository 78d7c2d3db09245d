mod account;
mod course;
mod enrollment;
mod lifecycle;
mod patch;

pub use account::{
    Account, AccountChanges, AccountDraft, AccountField, AccountFilter, AccountPatch, NewAccount,
};
pub use course::{
    Course, CourseChanges, CourseDraft, CourseField, CourseFilter, CoursePatch, NewCourse,
};
pub use enrollment::{
    Enrollment, EnrollmentChanges, EnrollmentDraft, EnrollmentField, EnrollmentFilter,
    EnrollmentPatch, EnrollmentStatus, NewEnrollment,
};
pub use lifecycle::RecordState;
pub use patch::Patch;
