pub mod due_dates;
pub mod generator;
pub mod rounding;

pub use due_dates::installment_due_dates;
pub use generator::ScheduleGenerator;
pub use rounding::split_even;
