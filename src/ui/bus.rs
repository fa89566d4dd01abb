//! The notification bus as a resource the egui systems render from.

use bevy::prelude::*;

use crate::notify::{NotificationBus, TipLevel};

/// Seconds a toast stays on screen
pub const TOAST_SECONDS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatTip {
    pub level: TipLevel,
    pub message: String,
}

/// The open numeric entry box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBox {
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub remaining: f32,
}

#[derive(Resource, Debug, Default)]
pub struct UiBus {
    pub float_tip: Option<FloatTip>,
    pub input: Option<InputBox>,
    pub toasts: Vec<Toast>,
}

impl UiBus {
    /// Count toasts down and drop the expired ones.
    pub fn tick_toasts(&mut self, delta_seconds: f32) {
        for toast in &mut self.toasts {
            toast.remaining -= delta_seconds;
        }
        self.toasts.retain(|t| t.remaining > 0.0);
    }
}

impl NotificationBus for UiBus {
    fn show_float_tip(&mut self, level: TipLevel, message: &str) {
        self.float_tip = Some(FloatTip {
            level,
            message: message.to_string(),
        });
    }

    fn clear_float_tip(&mut self) {
        self.float_tip = None;
    }

    fn show_input(&mut self, prefix: &str) {
        self.input = Some(InputBox {
            buffer: prefix.to_string(),
        });
    }

    fn clear_input(&mut self) {
        self.input = None;
    }

    fn show_toast(&mut self, message: &str) {
        self.toasts.push(Toast {
            message: message.to_string(),
            remaining: TOAST_SECONDS,
        });
    }
}

/// Text submitted from the numeric entry box
#[derive(Message, Debug, Clone)]
pub struct InputSubmitted(pub String);

/// The numeric entry box was closed without submitting
#[derive(Message, Debug, Clone, Copy)]
pub struct InputDismissed;
