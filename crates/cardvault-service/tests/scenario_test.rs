//! End-to-end sharing and transfer scenarios.

mod helpers;

use cardvault_core::error::ErrorKind;
use cardvault_entity::permission::ResourcePermissions;
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::SharePermissions;

use helpers::{TestApp, ctx, edit_only};

#[tokio::test]
async fn test_card_share_grants_edit_without_delete() {
    let app = TestApp::new();
    let u1 = app.user("u1").await;
    let u2 = app.user("u2").await;
    let c1 = app.resource(ResourceKind::Card, &u1).await;

    app.share(&u1, &c1, &u2, edit_only()).await;

    let perms = app
        .resolver
        .resolve(u2.id, ResourceKind::Card, c1.id)
        .await
        .expect("grantee resolves");
    assert_eq!(
        perms,
        ResourcePermissions {
            can_view: true,
            can_edit: true,
            can_delete: false,
            can_edit_transactions: false,
            is_owner: false,
        }
    );
}

#[tokio::test]
async fn test_gift_card_share_grants_transactions_only() {
    let app = TestApp::new();
    let u1 = app.user("u1").await;
    let u3 = app.user("u3").await;
    let g1 = app.resource(ResourceKind::GiftCard, &u1).await;

    app.share(
        &u1,
        &g1,
        &u3,
        SharePermissions {
            can_edit_transactions: true,
            ..SharePermissions::VIEW_ONLY
        },
    )
    .await;

    let perms = app
        .resolver
        .resolve(u3.id, ResourceKind::GiftCard, g1.id)
        .await
        .expect("grantee resolves");
    assert!(perms.can_edit_transactions);
    assert!(!perms.can_edit);
}

#[tokio::test]
async fn test_voucher_share_drops_requested_edit() {
    let app = TestApp::new();
    let u1 = app.user("u1").await;
    let u4 = app.user("u4").await;
    let v1 = app.resource(ResourceKind::Voucher, &u1).await;

    let share = app.share(&u1, &v1, &u4, edit_only()).await;
    assert!(!share.can_edit);

    let perms = app
        .resolver
        .resolve(u4.id, ResourceKind::Voucher, v1.id)
        .await
        .expect("grantee resolves");
    assert!(perms.can_view);
    assert!(!perms.can_edit && !perms.can_delete);
}

#[tokio::test]
async fn test_transfer_revokes_previous_grantees() {
    let app = TestApp::new();
    let u1 = app.user("u1").await;
    let u2 = app.user("u2").await;
    let u5 = app.user("u5").await;
    let c2 = app.resource(ResourceKind::Card, &u1).await;

    app.share(&u1, &c2, &u2, SharePermissions::VIEW_ONLY).await;
    let revoked = app
        .transfers
        .transfer(&ctx(u1.id), ResourceKind::Card, c2.id, u5.id)
        .await
        .expect("transfer");
    assert_eq!(revoked, 1);

    let err = app
        .resolver
        .resolve(u2.id, ResourceKind::Card, c2.id)
        .await
        .expect_err("former grantee");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let perms = app
        .resolver
        .resolve(u5.id, ResourceKind::Card, c2.id)
        .await
        .expect("new owner resolves");
    assert!(perms.is_owner);

    let err = app
        .resolver
        .resolve(u1.id, ResourceKind::Card, c2.id)
        .await
        .expect_err("previous owner");
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_previous_owner_cannot_manage_shares_after_transfer() {
    let app = TestApp::new();
    let u1 = app.user("u1").await;
    let u2 = app.user("u2").await;
    let u5 = app.user("u5").await;
    let c2 = app.resource(ResourceKind::Card, &u1).await;

    app.transfers
        .transfer(&ctx(u1.id), ResourceKind::Card, c2.id, u5.id)
        .await
        .expect("transfer");

    let err = app
        .shares
        .create(
            &ctx(u1.id),
            ResourceKind::Card,
            helpers::create_request(c2.id, &u2.email, SharePermissions::VIEW_ONLY),
        )
        .await
        .expect_err("stale owner");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // The new owner starts from a clean slate and may share freely.
    app.share(&u5, &c2, &u2, edit_only()).await;
}
