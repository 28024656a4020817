//! Content module - post records, content blocks and the sources that supply them

mod block;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod source;

pub use block::{Block, BlockKind, SitePage};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::FileSource;
pub use markdown::BlockParser;
pub use post::{Category, PostRecord, PostSummary, Status};
pub use source::{ContentSource, PostFilter};
