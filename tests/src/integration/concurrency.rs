//! # Concurrent Deliveries
//!
//! Overlapping deliveries of the same logs race on the idempotency ledger;
//! exactly one of them applies each log.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use std::sync::Arc;

    use shared_types::{AccountStore, ContentId, ListingStore, ReceiptStore};

    use crate::fixtures::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_redeliveries_apply_once() {
        let (node, store, _) = TestNode::in_memory();
        let node = Arc::new(node);
        let seller = wallet(0x5E);
        let listing = node.author_listing(seller);

        let logs: Vec<_> = (0..20u64)
            .map(|i| purchase(wallet(0xB0), seller, &listing, i + 1, tx(0x80), i))
            .collect();
        let delivery = block_delivery(&logs);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let node = Arc::clone(&node);
                let delivery = delivery.clone();
                tokio::spawn(async move { node.deliver(delivery).await })
            })
            .collect();

        let mut applied = 0;
        let mut duplicates = 0;
        for task in tasks {
            let (status, report) = task.await.unwrap();
            assert_eq!(status, StatusCode::OK);
            applied += report["applied"].as_u64().unwrap();
            duplicates += report["duplicates"].as_u64().unwrap();
        }

        assert_eq!(applied, 20);
        assert_eq!(duplicates, 20 * 7);
        assert_eq!(store.receipt_count(), 20);
        assert_eq!(store.get_listing(&listing).unwrap().unwrap().sales_count, 20);
        assert_eq!(store.get_account(&seller).unwrap().unwrap().sales_count, 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_purchases_from_many_deliveries() {
        let (node, store, _) = TestNode::in_memory();
        let node = Arc::new(node);
        let listing = ContentId::new_v4();

        let tasks: Vec<_> = (0..16u8)
            .map(|i| {
                let node = Arc::clone(&node);
                let body = block_delivery(&[purchase(
                    wallet(0xB0),
                    wallet(0x5E),
                    &listing,
                    u64::from(i) + 1,
                    tx(i),
                    0,
                )]);
                tokio::spawn(async move { node.deliver(body).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().0, StatusCode::OK);
        }

        assert_eq!(store.get_listing(&listing).unwrap().unwrap().sales_count, 16);
        assert_eq!(
            store.get_account(&wallet(0xB0)).unwrap().unwrap().purchase_count,
            16
        );
        assert!(store
            .get_receipt(&shared_types::PurchaseId::from(16))
            .unwrap()
            .is_some());
    }
}
