pub mod sina;
pub mod util;

pub use sina::SinaQuoteProvider;
