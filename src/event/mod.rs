//! Event system: input decoding, key binding dispatch, notifications.

pub mod binding;
pub mod bus;
pub mod decoder;
pub mod input;
pub mod message;

pub use binding::{Dispatch, HelpEntry, KeyBinding, KeyBindingRouter, Propagation, GLOBAL_CONTEXT};
pub use bus::{EventBus, SubscriptionId};
pub use decoder::KeyDecoder;
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
pub use message::{Notification, Topic};
