//! Fire-and-forget notifications the engine publishes to the UI.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipLevel {
    Info,
    Warning,
}

/// The UI side of a pick session.
///
/// `show_input` opens a text-entry channel; its submission comes back through
/// [`crate::pick::SnapEventHandler::submit_input`].
pub trait NotificationBus {
    fn show_float_tip(&mut self, level: TipLevel, message: &str);
    fn clear_float_tip(&mut self);
    fn show_input(&mut self, prefix: &str);
    fn clear_input(&mut self);
    fn show_toast(&mut self, message: &str);
}
