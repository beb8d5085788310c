//! UseCase 層
//!
//! リレーのビジネスロジックを実装するレイヤー。
//! UI 層（ピアセッション）から呼び出され、Domain 層を操作します。

pub mod broadcast;
pub mod connect_peer;
pub mod disconnect_peer;
pub mod error;
pub mod send_message;

pub use broadcast::{BroadcastDispatcher, DeliveryReport};
pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::ConnectError;
pub use send_message::SendMessageUseCase;
