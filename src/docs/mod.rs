// Documentation generators besides the architecture diagram

pub mod glossary;
pub mod tour;
pub mod wordcloud;

pub use glossary::GlossaryGenerator;
pub use tour::{Tour, TourGenerator, TourStep};
pub use wordcloud::{WordBag, WordCloudGenerator};
