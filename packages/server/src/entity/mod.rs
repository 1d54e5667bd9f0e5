pub mod attendance_record;
pub mod student;
pub mod student_subject;
pub mod subject;
pub mod user;
