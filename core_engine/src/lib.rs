pub mod accept;
pub mod extract;
pub mod navigate;
pub mod protocol;
pub mod render;
pub mod session;
pub mod suggestion;
pub mod trending;
mod util;

pub use extract::{extract, PrefixContext};
pub use navigate::{Key, Selection};
pub use render::{render, Dropdown, Row, RowKind};
pub use session::{Effect, Session, SessionConfig, SuggestQuery, View};
pub use suggestion::{parse_response, SuggestResult, Suggestion};
pub use util::CONTEXT_WINDOW;
