mod callouts;
mod headings;
mod lists;
mod tagging;

pub use callouts::{background_class, is_callout_class, CalloutPass, PALETTE};
pub use headings::{level_from_class, level_from_style, HeadingPass};
pub use lists::{list_kind, ListKind, ListPass};
pub use tagging::TaggingPass;
