mod taskbar;
mod events;
mod history;
mod os_version;

pub use taskbar::*;
pub use events::*;
pub use history::*;
pub use os_version::*;
