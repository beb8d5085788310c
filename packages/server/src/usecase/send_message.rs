//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者以外へのブロードキャスト、同一送信者のメッセージ順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数の受信者への配信
//! - エッジケース：送信者のみが接続している場合（配信先なし）

use std::sync::Arc;

use crate::domain::{BroadcastEvent, DisplayName, MessageContent, PeerId, PeerRegistry};

use super::broadcast::{BroadcastDispatcher, DeliveryReport};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    dispatcher: BroadcastDispatcher,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self {
            dispatcher: BroadcastDispatcher::new(registry),
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from_id` - 送信者の ID（配信対象から除外される）
    /// * `from_name` - 送信者の表示名
    /// * `content` - メッセージ内容
    pub async fn execute(
        &self,
        from_id: PeerId,
        from_name: &DisplayName,
        content: MessageContent,
    ) -> DeliveryReport {
        let event = BroadcastEvent::message(from_name.clone(), content);
        self.dispatcher.broadcast(&event, Some(from_id)).await
    }
}
