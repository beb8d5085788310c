//! UseCase: 参加者登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - Registry への登録と参加通知（Joined）の配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者（通知先 0 人）、2 人目の参加者
//! - 異常系：ID 重複（不変条件違反）では通知を送らない

use std::sync::Arc;

use crate::domain::{BroadcastEvent, Peer, PeerRegistry};

use super::{
    broadcast::{BroadcastDispatcher, DeliveryReport},
    error::ConnectError,
};

/// 参加者登録のユースケース
pub struct ConnectPeerUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
    dispatcher: BroadcastDispatcher,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        let dispatcher = BroadcastDispatcher::new(registry.clone());
        Self {
            registry,
            dispatcher,
        }
    }

    /// 参加者登録を実行
    ///
    /// 登録に成功した場合のみ、本人以外の全員へ参加通知を配信します。
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryReport)` - 参加通知の配信結果
    /// * `Err(ConnectError)` - 登録失敗（通知は送られない）
    pub async fn execute(&self, peer: Peer) -> Result<DeliveryReport, ConnectError> {
        let peer_id = peer.id;
        let event = BroadcastEvent::joined(peer.name.clone());

        // 1. Registry に登録
        self.registry.add(peer).await?;

        // 2. 参加通知を配信（本人は除外）
        let report = self.dispatcher.broadcast(&event, Some(peer_id)).await;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DisplayName, PeerId, RegistryError, Timestamp, sender::MockPeerSender,
        },
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
    async fn test_first_peer_joins_with_no_recipients() {
        // テスト項目: 最初の参加者は登録され、参加通知の配信先は 0 人
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = ConnectPeerUseCase::new(registry.clone());

        // when (操作):
        let result = usecase.execute(peer(1, "Alice", silent())).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().attempted(), 0);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_second_peer_join_notifies_existing_peer() {
        // テスト項目: 2 人目の参加は既存の参加者にだけ通知される
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = ConnectPeerUseCase::new(registry.clone());
        let mut alice = MockPeerSender::new();
        alice
            .expect_send()
            .withf(|text| text == "Bob has connected\n")
            .times(1)
            .returning(|_| Ok(()));
        usecase.execute(peer(1, "Alice", alice)).await.unwrap();

        // when (操作):
        let report = usecase.execute(peer(2, "Bob", silent())).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected_without_broadcast() {
        // テスト項目: ID 重複時はエラーになり、参加通知は送られない
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = ConnectPeerUseCase::new(registry.clone());
        usecase.execute(peer(1, "Alice", silent())).await.unwrap();

        // when (操作):
        let result = usecase.execute(peer(1, "Impostor", silent())).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::Registry(RegistryError::DuplicateId(
                PeerId::new(1)
            )))
        );
        assert_eq!(registry.count().await, 1);
    }
}
