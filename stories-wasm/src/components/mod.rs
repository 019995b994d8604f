pub(crate) mod auth_panel;
pub(crate) mod compose_modal;
pub(crate) mod controls;
pub(crate) mod post_modal;
pub(crate) mod posts_panel;
