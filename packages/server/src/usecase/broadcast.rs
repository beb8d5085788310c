//! UseCase: ブロードキャスト配信
//!
//! イベントをワイヤ表現に変換し、Registry のスナップショットに含まれる
//! 全ピア（除外指定のピアを除く）へ送信します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastDispatcher::broadcast() メソッド
//! - 除外指定、送信失敗の隔離、0 人への配信
//!
//! ### なぜこのテストが必要か
//! - 1 つのピアへの送信失敗が他のピアへの配信を妨げないことを保証する
//! - 送信者自身にメッセージが返らないことを保証する

use std::sync::Arc;

use crate::domain::{BroadcastEvent, PeerId, PeerRegistry};

/// 1 回の配信結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// 送信チャンネルへ渡せたピア数
    pub delivered: usize,
    /// 送信に失敗したピア ID
    pub failed: Vec<PeerId>,
}

impl DeliveryReport {
    /// 配信を試みたピアの総数
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// ブロードキャスト配信
pub struct BroadcastDispatcher {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn PeerRegistry>,
}

impl BroadcastDispatcher {
    /// 新しい BroadcastDispatcher を作成
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self { registry }
    }

    /// イベントを配信
    ///
    /// # Arguments
    ///
    /// * `event` - 配信するイベント
    /// * `exclude` - 配信対象から除外するピア（通常は送信者）
    ///
    /// # Returns
    ///
    /// 配信結果。個々のピアへの送信失敗はログに記録するだけで、
    /// 残りのピアへの配信は継続します。
    pub async fn broadcast(
        &self,
        event: &BroadcastEvent,
        exclude: Option<PeerId>,
    ) -> DeliveryReport {
        let text = event.render();
        let mut report = DeliveryReport::default();

        // ロックはスナップショット取得時のみ。送信はロックの外で行う。
        let peers = self.registry.snapshot().await;
        for peer in peers.iter().filter(|peer| Some(peer.id) != exclude) {
            match peer.send(&text) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        peer_id = %peer.id,
                        peer_name = %peer.name,
                        "Failed to deliver {:?} event: {}",
                        event.kind,
                        e
                    );
                    report.failed.push(peer.id);
                }
            }
        }

        tracing::debug!(
            kind = ?event.kind,
            source = %event.source,
            delivered = report.delivered,
            failed = report.failed.len(),
            "Broadcast complete"
        );
        report
    }
}
