pub mod destinations;
pub mod hotels;
pub mod mailer;

pub use destinations::DestinationService;
pub use hotels::HotelSearchService;
pub use mailer::Mailer;
