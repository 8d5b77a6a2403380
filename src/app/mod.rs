pub mod compose;
pub mod navigation;
pub mod state;
pub mod update;

pub use compose::ComposeBuffer;
pub use navigation::handle_key;
pub use state::{
    AppState, ConfirmPrompt, DomainState, InputMode, MetaState, PanelFocus, ThreadAction,
    ThreadEntry, UiState,
};
pub use update::update;
