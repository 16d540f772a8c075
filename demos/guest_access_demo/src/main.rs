use std::sync::Arc;

use coop_core::{model::SessionState, CoopCore};
use coop_providers::{
    chicken::sort::SortKey,
    common_models::{
        chicken::{Chicken, NumericValue},
        farm::FarmId,
        guest::GuestToken,
        user::UserId,
    },
    guest_access::error::GuestAccessError,
    key_path_store::imp::in_memory::InMemoryKeyPathStore,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(InMemoryKeyPathStore::new(json!({
        "farms": {
            "f1": {
                "name": "Hilltop",
                "type": "Free range",
                "guestAccess": {
                    "g1": {"token": "abc", "expiresAt": "2999-12-31T23:59:59Z"},
                    "g2": {"token": "stale", "expiresAt": "2020-01-01T00:00:00Z"}
                }
            },
            "f2": {"name": "Meadow", "type": "Barn"}
        },
        "users": {"u1": {"farms": {"f1": true, "f2": true}}},
        "chickens": {
            "f1": {
                "c1": {"name": "Henrietta", "type": "Leghorn", "currentWeight": 2.1},
                "c2": {"name": "Agnes", "type": "Silkie", "currentWeight": "1.4"}
            },
            "f2": {
                "c1": {"name": "Clucky", "type": "Orpington", "currentWeight": 3.2}
            }
        }
    })));
    let core = CoopCore::new(None, store);

    //
    // Guest links
    //

    let farm_id = core
        .guest_service
        .authenticate_guest(GuestToken::from("abc"))
        .await?;
    println!("Guest token `abc` grants access to farm {farm_id}");

    let result = core
        .guest_service
        .authenticate_guest(GuestToken::from("stale"))
        .await;
    assert!(
        matches!(result, Err(GuestAccessError::ExpiredGrant(_))),
        "expected the stale grant to be expired"
    );
    println!("Guest token `stale` rejected: {:?}", result.err());

    // the failed attempt leaves the earlier guest session in place
    let mut guest_session = core.chicken_session();
    guest_session.load().await;
    for record in guest_session.page(SortKey::Name, true, 0).items {
        println!("  guest sees {}/{}: {:?}", record.farm_id, record.id, record.chicken.name);
    }

    //
    // Owner view over all farms
    //

    core.context.login_success(UserId::from("u1"));
    let mut session = core.chicken_session();
    assert_eq!(session.load().await, &SessionState::Ready);

    let page = session.page(SortKey::CurrentWeight, false, 0);
    println!(
        "Owner sees {} chickens on {} page(s), heaviest first:",
        page.total_items, page.total_pages
    );
    for record in &page.items {
        println!("  {}/{}: {:?}", record.farm_id, record.id, record.chicken.name);
    }

    //
    // Live updates
    //

    session.watch().await?;

    let meadow = FarmId::from("f2");
    let chicken_id = core
        .chicken_service
        .add_chicken(
            &meadow,
            Chicken {
                name: Some("Pip".to_owned()),
                breed: Some("Bantam".to_owned()),
                current_weight: Some(NumericValue::from(0.9)),
                ..Default::default()
            },
        )
        .await?;
    println!("Added chicken {chicken_id} to farm {meadow}");

    session.refresh_on_change().await;
    println!("Owner now sees {} chickens", session.chickens().len());

    core.chicken_service
        .delete_chicken(&meadow, &chicken_id)
        .await?;
    session.refresh_on_change().await;
    println!("After removing {chicken_id}: {} chickens", session.chickens().len());

    session.close();
    Ok(())
}
