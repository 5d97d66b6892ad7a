//! World definition for plant store BDD tests

use cucumber::World;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::context::ScenarioContext;

/// Per-scenario world. Derefs to [`ScenarioContext`], so steps call the
/// factory, token cache and API context directly on it.
#[derive(World)]
#[world(init = Self::new)]
pub struct PlantStoreWorld {
    ctx: ScenarioContext,
}

impl PlantStoreWorld {
    /// Fresh state from the installed suite.
    ///
    /// Panics if no suite is installed and none can be built from the
    /// environment; cucumber gives the constructor no error channel.
    pub fn new() -> Self {
        let suite = match super::suite() {
            Ok(suite) => suite,
            Err(err) => panic!("plant store suite is not available: {err}"),
        };
        Self {
            ctx: suite.scenario(),
        }
    }
}

impl fmt::Debug for PlantStoreWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantStoreWorld")
            .field("acting_role", &self.ctx.acting_role())
            .field("ledger", self.ctx.ledger())
            .field("fixtures", self.ctx.fixtures())
            .field("last_status", &self.ctx.response().map(|r| r.status_code()))
            .finish()
    }
}

impl Deref for PlantStoreWorld {
    type Target = ScenarioContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for PlantStoreWorld {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}
