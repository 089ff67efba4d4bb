//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::radio::CommandError;
use thiserror::Error;

/// The primary error type for the data bearer library.
/// 数据承载库的主要错误类型。
///
/// Bring-up failures are not reported through this type: they travel as a
/// [`SetupFailure`](crate::bearer::SetupFailure) through the request's own
/// completion sink.
#[derive(Debug, Error)]
pub enum Error {
    /// The bearer actor has stopped and its mailbox is closed.
    /// 承载actor已停止，其邮箱已关闭。
    #[error("Bearer actor mailbox is closed")]
    ChannelClosed,

    /// The actor dropped the reply channel of a query without answering.
    /// actor在未应答的情况下丢弃了查询的回复通道。
    #[error("Bearer actor dropped the response")]
    ResponseDropped,

    /// A radio command failed at the transport level.
    /// 无线电命令在传输层失败。
    #[error("Radio command failed: {0}")]
    Radio(#[from] CommandError),
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::ResponseDropped
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Error {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Error::ChannelClosed
    }
}
