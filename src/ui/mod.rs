pub mod background;
pub mod dialogs;
pub mod event_card;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;
