pub mod dispatch;
pub mod gate;
pub mod poll;
pub mod pool;
pub mod selector;
