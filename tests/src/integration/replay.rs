//! # Replay and Ordering
//!
//! At-least-once delivery: any delivery may arrive many times, in either
//! envelope shape, and logs of different transactions may interleave.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use shared_types::{
        AccountProfile, AccountStore, ContentId, ListingStore, ProfileOrigin, PurchaseId,
        ReceiptStore, U256,
    };

    use crate::fixtures::*;

    fn mixed_delivery(listing: &ContentId) -> Vec<shared_types::NormalizedLogEntry> {
        vec![
            registered(wallet(0x5E), 1, tx(0x10), 0),
            registered(wallet(0xB0), 2, tx(0x11), 0),
            pass_minted(wallet(0xB0), 2, false, tx(0x11), 1),
            pass_minted(wallet(0xAD), 3, true, tx(0x12), 0),
            purchase(wallet(0xB0), wallet(0x5E), listing, 1, tx(0x13), 0),
            purchase(wallet(0xB0), wallet(0x5E), listing, 2, tx(0x13), 1),
            revocation(wallet(0xAD), true, tx(0x14), 0),
        ]
    }

    fn snapshot(store: &dyn shared_types::ProjectionStore, listing: &ContentId) -> Vec<String> {
        let accounts: Vec<Option<AccountProfile>> = [0x5E, 0xB0, 0xAD]
            .into_iter()
            .map(|b| store.get_account(&wallet(b)).unwrap())
            .collect();
        vec![
            format!("{accounts:?}"),
            format!("{:?}", store.get_listing(listing).unwrap()),
            format!("{:?}", store.get_receipt(&PurchaseId::from(1)).unwrap()),
            format!("{:?}", store.get_receipt(&PurchaseId::from(2)).unwrap()),
        ]
    }

    #[tokio::test]
    async fn test_replaying_delivery_n_times_matches_single_pass() {
        let (once, once_store, _) = TestNode::in_memory();
        let (many, many_store, _) = TestNode::in_memory();
        let listing = ContentId::new_v4();
        let delivery = block_delivery(&mixed_delivery(&listing));

        let (status, report) = once.deliver(delivery.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["received"], 7);
        assert_eq!(report["applied"], 6, "ordinary mint after registration is a no-op");
        assert_eq!(report["no_ops"], 1);

        for round in 0..5 {
            let (status, report) = many.deliver(delivery.clone()).await;
            assert_eq!(status, StatusCode::OK);
            if round > 0 {
                assert_eq!(report["duplicates"], 7);
            }
        }

        assert_eq!(
            snapshot(once_store.as_ref(), &listing),
            snapshot(many_store.as_ref(), &listing)
        );
        assert_eq!(many_store.account_count(), 3);
        assert_eq!(many_store.receipt_count(), 2);
    }

    #[tokio::test]
    async fn test_same_log_in_either_shape_is_one_event() {
        let (node, store, _) = TestNode::in_memory();
        let listing = node.author_listing(wallet(0x5E));
        let logs = [purchase(wallet(0xB0), wallet(0x5E), &listing, 5, tx(0x20), 3)];

        let (status, report) = node.deliver(activity_delivery(&logs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 1);

        let (status, report) = node.deliver(block_delivery(&logs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["duplicates"], 1);

        assert_eq!(store.get_listing(&listing).unwrap().unwrap().sales_count, 1);
        // Activity envelopes carry no block time, so the receipt uses the clock
        assert_eq!(
            store.get_receipt(&PurchaseId::from(5)).unwrap().unwrap().purchased_at,
            NOW
        );
    }

    #[tokio::test]
    async fn test_n_purchases_increment_by_n_and_replayed_subset_adds_zero() {
        let (node, store, _) = TestNode::in_memory();
        let seller = wallet(0x5E);
        let listing = node.author_listing(seller);

        let logs: Vec<_> = (0..10u64)
            .map(|i| purchase(wallet(0xB0), seller, &listing, 100 + i, tx(0x30), i))
            .collect();
        let (status, report) = node.deliver(block_delivery(&logs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 10);

        let (_, report) = node.deliver(activity_delivery(&logs[2..6])).await;
        assert_eq!(report["duplicates"], 4);

        assert_eq!(store.get_listing(&listing).unwrap().unwrap().sales_count, 10);
        assert_eq!(store.get_account(&seller).unwrap().unwrap().sales_count, 10);
        assert_eq!(store.get_account(&wallet(0xB0)).unwrap().unwrap().purchase_count, 10);
    }

    #[tokio::test]
    async fn test_purchase_before_registration_is_completed_later() {
        let (node, store, _) = TestNode::in_memory();
        let buyer = wallet(0xB0);
        let listing = ContentId::new_v4();

        node.deliver(block_delivery(&[purchase(buyer, wallet(0x5E), &listing, 1, tx(0x40), 0)]))
            .await;
        let stand_in = store.get_account(&buyer).unwrap().unwrap();
        assert_eq!(stand_in.origin, ProfileOrigin::StandIn);
        assert_eq!(stand_in.external_id, None);

        let stand_in_listing = store.get_listing(&listing).unwrap().unwrap();
        assert!(stand_in_listing.is_stand_in);
        assert!(!stand_in_listing.active);

        let (_, report) = node
            .deliver(block_delivery(&[registered(buyer, 77, tx(0x41), 0)]))
            .await;
        assert_eq!(report["applied"], 1);

        let completed = store.get_account(&buyer).unwrap().unwrap();
        assert_eq!(completed.external_id, Some(U256::from(77u64)));
        assert_eq!(completed.purchase_count, 1, "counters survive completion");
    }

    #[tokio::test]
    async fn test_malformed_log_skipped_rest_applied() {
        let (node, store, _) = TestNode::in_memory();
        let mut broken = registered(wallet(0x01), 1, tx(0x50), 0);
        broken.topics.truncate(1);
        let logs = [broken, registered(wallet(0x02), 2, tx(0x50), 1)];

        let (status, report) = node.deliver(block_delivery(&logs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["decode_failures"], 1);
        assert_eq!(report["applied"], 1);
        assert!(store.get_account(&wallet(0x01)).unwrap().is_none());
        assert!(store.get_account(&wallet(0x02)).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_storage_outage_then_redelivery_completes() {
        let (node, store, processed) = TestNode::in_memory();
        let listing = ContentId::new_v4();
        let logs: Vec<_> = (0..3u64)
            .map(|i| purchase(wallet(0xB0), wallet(0x5E), &listing, i + 1, tx(0x60), i))
            .collect();
        let delivery = block_delivery(&logs);

        store.set_available(false);
        let (status, body) = node.deliver(delivery.clone()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "STORAGE_UNAVAILABLE");
        assert!(processed.is_empty(), "the failing log was released");

        store.set_available(true);
        let (status, report) = node.deliver(delivery).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 3);
        assert_eq!(store.get_listing(&listing).unwrap().unwrap().sales_count, 3);
    }

    #[tokio::test]
    async fn test_stale_or_unsigned_deliveries_change_nothing() {
        let (node, store, processed) = TestNode::in_memory();
        let delivery = block_delivery(&[registered(wallet(0x01), 1, tx(0x70), 0)]);

        let (status, body) = node.deliver_signed(delivery.clone(), "00").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        node.clock.advance(301);
        let (status, body) = node.deliver(delivery).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "STALE_EVENT");

        assert_eq!(store.account_count(), 0);
        assert!(processed.is_empty());
        let (_, metrics) = node.get("/metrics", None).await;
        assert_eq!(metrics["deliveries"]["rejected_auth"], 1);
        assert_eq!(metrics["deliveries"]["rejected_stale"], 1);
    }
}
