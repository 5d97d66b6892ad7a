use cucumber::{then, when};
use plantstore_test_utils::bdd::PlantStoreWorld;
use plantstore_test_utils::ResourceKind;

use super::{bounded, check, fixture_id};

#[when(expr = "I sell {int} unit(s) of the plant")]
async fn sell_plant(world: &mut PlantStoreWorld, quantity: i64) {
    let plant = fixture_id(world.fixtures().plant.as_ref(), "plant");
    bounded(world.step_budget(), async {
        let created = check(world.factory().create_sale(Some(plant), quantity).await);
        world.set_response(created.response);
    })
    .await;
}

#[when(expr = "I record a sale of {int} unit(s)")]
async fn record_sale(world: &mut PlantStoreWorld, quantity: i64) {
    bounded(world.step_budget(), async {
        let created = check(world.factory().create_sale(None, quantity).await);
        world.set_response(created.response);
    })
    .await;
}

#[then("no sale was recorded")]
async fn no_sale(world: &mut PlantStoreWorld) {
    let sales = world.created_resources(ResourceKind::Sale);
    assert!(sales.is_empty(), "unexpected sales {sales:?}");
    assert!(world.fixtures().sale.is_none());
}

#[then(expr = "{int} sale(s) was/were recorded")]
async fn sales_recorded(world: &mut PlantStoreWorld, expected: usize) {
    let sales = world.created_resources(ResourceKind::Sale);
    assert_eq!(sales.len(), expected, "sales {sales:?}");
}
