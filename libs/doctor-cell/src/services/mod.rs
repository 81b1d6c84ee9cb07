pub mod availability;
pub mod doctor;
pub mod roster;
pub mod slots;
pub mod validation;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use roster::SlotRoster;
