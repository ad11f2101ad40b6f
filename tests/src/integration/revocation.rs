//! # Revocation and Disputes
//!
//! `BlacklistUpdated` drives the moderation dispute lifecycle:
//!
//! | Transition | Disputes |
//! |------------|----------|
//! | not revoked → revoked | resolved → pending |
//! | revoked → not revoked | pending/contacted → resolved |
//! | unchanged | untouched |

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use shared_types::{AccountStore, Dispute, DisputeStatus, DisputeStore, ProfileOrigin};

    use crate::fixtures::*;

    fn statuses(node: &TestNode, b: u8) -> Vec<DisputeStatus> {
        node.store
            .disputes_for_wallet(&wallet(b))
            .unwrap()
            .into_iter()
            .map(|d| d.status)
            .collect()
    }

    fn dispute(b: u8, status: DisputeStatus, opened_at: u64) -> Dispute {
        let mut dispute = Dispute::open(wallet(b), "chargeback", opened_at);
        dispute.status = status;
        dispute
    }

    #[tokio::test]
    async fn test_revoke_reopens_and_unrevoke_resolves() {
        let (node, _, _) = TestNode::in_memory();
        node.store
            .open_dispute(dispute(0x01, DisputeStatus::Resolved, NOW - 100))
            .unwrap();
        node.store
            .open_dispute(dispute(0x01, DisputeStatus::Contacted, NOW - 50))
            .unwrap();
        node.store
            .open_dispute(dispute(0x02, DisputeStatus::Resolved, NOW - 10))
            .unwrap();

        let (status, _) = node
            .deliver(block_delivery(&[revocation(wallet(0x01), true, tx(1), 0)]))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            statuses(&node, 0x01),
            vec![DisputeStatus::Pending, DisputeStatus::Contacted]
        );
        assert_eq!(statuses(&node, 0x02), vec![DisputeStatus::Resolved]);

        node.deliver(block_delivery(&[revocation(wallet(0x01), false, tx(2), 0)]))
            .await;
        assert_eq!(
            statuses(&node, 0x01),
            vec![DisputeStatus::Resolved, DisputeStatus::Resolved]
        );
        assert!(!node.store.get_account(&wallet(0x01)).unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_revoking_unknown_wallet_creates_flagged_stand_in() {
        let (node, _, _) = TestNode::in_memory();

        let (_, report) = node
            .deliver(block_delivery(&[revocation(wallet(0x03), true, tx(3), 0)]))
            .await;
        assert_eq!(report["applied"], 1);

        let profile = node.store.get_account(&wallet(0x03)).unwrap().unwrap();
        assert!(profile.revoked);
        assert_eq!(profile.origin, ProfileOrigin::StandIn);
        assert!(statuses(&node, 0x03).is_empty());
    }

    #[tokio::test]
    async fn test_repeated_revocation_leaves_disputes_alone() {
        let (node, _, _) = TestNode::in_memory();
        node.deliver(block_delivery(&[revocation(wallet(0x04), true, tx(4), 0)]))
            .await;
        node.store
            .open_dispute(dispute(0x04, DisputeStatus::Resolved, NOW))
            .unwrap();

        let (_, report) = node
            .deliver(block_delivery(&[revocation(wallet(0x04), true, tx(5), 0)]))
            .await;
        assert_eq!(report["no_ops"], 1);
        assert_eq!(statuses(&node, 0x04), vec![DisputeStatus::Resolved]);
    }

    #[tokio::test]
    async fn test_revocation_log_order_within_transaction() {
        let (node, _, _) = TestNode::in_memory();
        let logs = [
            revocation(wallet(0x05), true, tx(6), 0),
            revocation(wallet(0x05), false, tx(6), 1),
        ];

        node.deliver(block_delivery(&logs)).await;
        assert!(!node.store.get_account(&wallet(0x05)).unwrap().unwrap().revoked);
    }
}
