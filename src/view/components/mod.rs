pub mod compose;
pub mod footer;
pub mod header;
pub mod popup;
pub mod syntax;
pub mod thread_list;
pub mod transcript;

pub use compose::{compose_height, render_compose};
pub use footer::render_footer;
pub use header::render_header;
pub use popup::{centered_rect, render_confirm_popup};
pub use thread_list::render_thread_list;
pub use transcript::render_transcript;
