//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//! - Registry からの削除と退出通知（Left）の配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と残りの参加者への通知
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - エッジケース：既に削除済みの参加者（冪等、通知しない）

use std::sync::Arc;

use crate::domain::{BroadcastEvent, PeerId, PeerRegistry};

use super::broadcast::{BroadcastDispatcher, DeliveryReport};

/// 参加者切断のユースケース
pub struct DisconnectPeerUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    dispatcher: BroadcastDispatcher,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        let dispatcher = BroadcastDispatcher::new(registry.clone());
        Self {
            registry,
            dispatcher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(DeliveryReport)` - 削除して退出通知を配信した
    /// * `None` - 登録されていなかった（何もしない）
    pub async fn execute(&self, peer_id: PeerId) -> Option<DeliveryReport> {
        // 1. Registry から削除
        let peer = self.registry.remove(peer_id).await?;

        // 2. 残りの参加者へ退出通知を配信
        let event = BroadcastEvent::left(peer.name);
        Some(self.dispatcher.broadcast(&event, None).await)
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_peers(&self) -> usize {
        self.registry.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, Peer, Timestamp, sender::MockPeerSender},
        infrastructure::registry::InMemoryPeerRegistry,
    };

    fn peer(id: u64, name: &str, sender: MockPeerSender) -> Peer {
        Peer::new(
            PeerId::new(id),
            DisplayName::new(name).unwrap(),
            Timestamp::new(0),
            Arc::new(sender),
        )
    }

    fn silent() -> MockPeerSender {
        let mut sender = MockPeerSender::new();
        sender.expect_send().never();
        sender
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_peers() {
        // テスト項目: Alice の切断が Bob に "Alice has disconnected.\n" として通知される
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let mut bob = MockPeerSender::new();
        bob.expect_send()
            .withf(|text| text == "Alice has disconnected.\n")
            .times(1)
            .returning(|_| Ok(()));
        registry.add(peer(1, "Alice", silent())).await.unwrap();
        registry.add(peer(2, "Bob", bob)).await.unwrap();
        let usecase = DisconnectPeerUseCase::new(registry.clone());

        // when (操作):
        let report = usecase.execute(PeerId::new(1)).await;

        // then (期待する結果):
        assert_eq!(report.map(|r| r.delivered), Some(1));
        assert_eq!(usecase.count_remaining_peers().await, 1);
        let remaining = registry.snapshot().await;
        assert!(remaining.iter().all(|p| p.id != PeerId::new(1)));
    }

    #[tokio::test]
    async fn test_disconnect_last_peer() {
        // テスト項目: 最後の参加者が切断した場合、通知対象は空
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        registry.add(peer(1, "Alice", silent())).await.unwrap();
        let usecase = DisconnectPeerUseCase::new(registry);

        // when (操作):
        let report = usecase.execute(PeerId::new(1)).await;

        // then (期待する結果):
        assert_eq!(report, Some(DeliveryReport::default()));
        assert_eq!(usecase.count_remaining_peers().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 2 回目の切断は None を返し、退出通知を重複して送らない
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let mut bob = MockPeerSender::new();
        bob.expect_send().times(1).returning(|_| Ok(()));
        registry.add(peer(1, "Alice", silent())).await.unwrap();
        registry.add(peer(2, "Bob", bob)).await.unwrap();
        let usecase = DisconnectPeerUseCase::new(registry);
        assert!(usecase.execute(PeerId::new(1)).await.is_some());

        // when (操作):
        let second = usecase.execute(PeerId::new(1)).await;

        // then (期待する結果):
        assert!(second.is_none());
        assert_eq!(usecase.count_remaining_peers().await, 1);
    }
}
