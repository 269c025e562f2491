pub mod command_buffer;
pub mod navigation_state;

pub use command_buffer::CommandBuffer;
pub use navigation_state::NavigationState;
