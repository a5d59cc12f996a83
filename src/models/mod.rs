pub mod career;
pub mod instructor;
pub mod laboratory;
pub mod period;
pub mod usage_record;

pub use career::Career;
pub use instructor::Instructor;
pub use laboratory::Laboratory;
pub use period::AcademicPeriod;
pub use usage_record::{NewUsageRecord, UsageRecord};
