pub mod app;
pub mod glare_card;

pub use app::App;
