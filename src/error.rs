use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Notification error: {0}")]
    Notify(#[from] notify_rust::error::Error),

    #[error("Invalid schedule time {hour:02}:{minute:02}:{second:02}")]
    InvalidScheduleTime { hour: u32, minute: u32, second: u32 },
}
