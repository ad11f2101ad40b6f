//! # End-to-End Purchase Flow
//!
//! ```text
//! buyer ──GET /purchase-identifier──→ gate ──→ id32
//! ledger ──ContentPurchased(id32)──→ POST /webhooks ──→ receipt + counters
//! ledger ──BlacklistUpdated(seller)──→ POST /webhooks ──→ gate refuses seller
//! ```

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use lp_01_content_codec::to_on_chain;
    use shared_types::{AccountStore, ListingStore, PurchaseId, ReceiptStore};

    use crate::fixtures::*;

    #[tokio::test]
    async fn test_purchase_then_revocation_flow() {
        let (node, store, _) = TestNode::in_memory();
        let seller = wallet(0x5E);
        let buyer = wallet(0xB0);
        let listing = node.author_listing(seller);

        // Step 1: buyer asks for the ledger identifier
        let (status, body) = node.purchase_identifier(&listing, &buyer).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contentId"], listing.to_string());
        assert_eq!(body["onChainContentId"], json!(to_on_chain(&listing)));

        // Step 2: the purchase log arrives
        let delivery = block_delivery(&[purchase(buyer, seller, &listing, 42, tx(0xAA), 0)]);
        let (status, report) = node.deliver(delivery.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 1);

        let receipt = store.get_receipt(&PurchaseId::from(42)).unwrap().unwrap();
        assert_eq!(receipt.buyer, buyer);
        assert_eq!(receipt.seller, seller);
        assert_eq!(receipt.content_id, listing);
        assert_eq!(receipt.tx_hash, tx(0xAA));
        assert_eq!(receipt.purchased_at, NOW);
        assert_eq!(node.store.get_listing(&listing).unwrap().unwrap().sales_count, 1);
        assert_eq!(node.store.get_account(&seller).unwrap().unwrap().sales_count, 1);
        assert_eq!(node.store.get_account(&buyer).unwrap().unwrap().purchase_count, 1);

        // Step 3: redelivery changes nothing
        let (status, report) = node.deliver(delivery).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["duplicates"], 1);
        assert_eq!(report["applied"], 0);
        assert_eq!(node.store.get_listing(&listing).unwrap().unwrap().sales_count, 1);
        assert_eq!(store.receipt_count(), 1);

        // Step 4: seller revoked
        let (status, _) = node
            .deliver(block_delivery(&[revocation(seller, true, tx(0xBB), 0)]))
            .await;
        assert_eq!(status, StatusCode::OK);

        let other_listing = node.author_listing(seller);
        let (status, body) = node.purchase_identifier(&other_listing, &buyer).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "SELLER_REVOKED");

        // The receipt is untouched and still visible to both parties
        assert_eq!(store.get_receipt(&PurchaseId::from(42)).unwrap().unwrap(), receipt);
        let (status, body) = node.receipt(42, &buyer).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["purchase_id"], "42");
        let (status, _) = node.receipt(42, &seller).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_purchase_recorded_even_after_seller_revoked() {
        let (node, store, _) = TestNode::in_memory();
        let seller = wallet(0x5E);
        let listing = node.author_listing(seller);

        node.deliver(block_delivery(&[revocation(seller, true, tx(1), 0)]))
            .await;
        let (status, report) = node
            .deliver(block_delivery(&[purchase(wallet(0xB0), seller, &listing, 7, tx(2), 0)]))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["applied"], 1);
        assert!(store.get_receipt(&PurchaseId::from(7)).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_eligibility_order_through_http() {
        let (node, _, _) = TestNode::in_memory();
        let seller = wallet(0x5E);
        let listing = node.author_listing(seller);

        // Missing listing wins over every other condition
        let (status, body) = node
            .purchase_identifier(&shared_types::ContentId::new_v4(), &seller)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        // Self-purchase wins over seller revocation
        node.deliver(block_delivery(&[revocation(seller, true, tx(3), 0)]))
            .await;
        let (status, body) = node.purchase_identifier(&listing, &seller).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "SELF_PURCHASE_FORBIDDEN");
    }

    #[tokio::test]
    async fn test_unauthenticated_and_foreign_requests() {
        let (node, _, _) = TestNode::in_memory();
        let listing = node.author_listing(wallet(0x5E));

        let (status, body) = node
            .get(&format!("/purchase-identifier/{listing}"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = node.receipt(42, &wallet(0x01)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = node.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_foreign_emitter_is_ignored() {
        let (node, store, _) = TestNode::in_memory();
        let listing = shared_types::ContentId::new_v4();
        let mut foreign = purchase(wallet(0xB0), wallet(0x5E), &listing, 9, tx(4), 0);
        foreign.contract_address = wallet(0xEE);

        let (status, report) = node.deliver(block_delivery(&[foreign])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["ignored"], 1);
        assert_eq!(store.receipt_count(), 0);
    }
}
